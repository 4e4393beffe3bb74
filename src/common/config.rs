use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static DEFAULT_CONFIG: Lazy<Config> =
    Lazy::new(|| Config::parse(include_str!("../../perch.default.toml")).unwrap());

pub fn data_dir() -> PathBuf { dirs::home_dir().unwrap().join(".perch") }
pub fn store_file() -> PathBuf { data_dir().join("store.json") }
pub fn config_file() -> PathBuf { dirs::home_dir().unwrap().join(".perch.toml") }

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub layout: LayoutSettings,
    #[serde(default)]
    pub store: StoreSettings,
}

/// Location of the keyed store document.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct StoreSettings {
    #[serde(default = "store_file")]
    pub path: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self { Self { path: store_file() } }
}

impl StoreSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.path.as_os_str().is_empty() {
            issues.push("store path must not be empty".to_string());
        }

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;

        if self.path.as_os_str().is_empty() {
            self.path = store_file();
            fixes += 1;
        }

        fixes
    }
}

/// Constants for the zone stacking algorithm, in layout units.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct LayoutSettings {
    /// Distance from the zone's anchor edge to the innermost surface.
    #[serde(default = "default_base_padding")]
    pub base_padding: f64,
    /// Space between stacked surfaces in the same zone.
    #[serde(default = "default_gap")]
    pub gap: f64,
    /// Fixed cross-axis inset from the zone's side edge.
    #[serde(default = "default_edge_margin")]
    pub edge_margin: f64,
    /// Substitute extent for non-positive caller-supplied dimensions.
    #[serde(default = "default_min_surface_extent")]
    pub min_surface_extent: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            base_padding: default_base_padding(),
            gap: default_gap(),
            edge_margin: default_edge_margin(),
            min_surface_extent: default_min_surface_extent(),
        }
    }
}

impl LayoutSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.base_padding < 0.0 {
            issues.push(format!(
                "base_padding must be non-negative, got {}",
                self.base_padding
            ));
        }
        if self.gap < 0.0 {
            issues.push(format!("gap must be non-negative, got {}", self.gap));
        }
        if self.edge_margin < 0.0 {
            issues.push(format!(
                "edge_margin must be non-negative, got {}",
                self.edge_margin
            ));
        }
        if self.min_surface_extent <= 0.0 {
            issues.push(format!(
                "min_surface_extent must be positive, got {}",
                self.min_surface_extent
            ));
        }

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;

        if self.base_padding < 0.0 {
            self.base_padding = default_base_padding();
            fixes += 1;
        }
        if self.gap < 0.0 {
            self.gap = default_gap();
            fixes += 1;
        }
        if self.edge_margin < 0.0 {
            self.edge_margin = default_edge_margin();
            fixes += 1;
        }
        if self.min_surface_extent <= 0.0 {
            self.min_surface_extent = default_min_surface_extent();
            fixes += 1;
        }

        fixes
    }
}

fn default_base_padding() -> f64 { 16.0 }

fn default_gap() -> f64 { 12.0 }

fn default_edge_margin() -> f64 { 16.0 }

fn default_min_surface_extent() -> f64 { 1.0 }

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)?;
        Self::parse(&buf)
    }

    pub fn default() -> Config { DEFAULT_CONFIG.clone() }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml_string.as_bytes())?;

        Ok(())
    }

    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        issues.extend(self.layout.validate());
        issues.extend(self.store.validate());

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        self.layout.auto_fix_values() + self.store.auto_fix_values()
    }

    fn parse(buf: &str) -> anyhow::Result<Config> {
        let config: Config = toml::from_str(buf)?;
        Ok(config)
    }
}
