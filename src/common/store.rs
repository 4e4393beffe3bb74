use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::common::collections::HashMap;

/// Simple keyed store persisted as a single JSON document, used by floating
/// surfaces for dismissed-item sets and feedback history.
///
/// Writes are explicit: mutate in memory, then [`KeyedStore::persist`].
#[derive(Debug)]
pub struct KeyedStore {
    path: PathBuf,
    entries: HashMap<String, Value>,
}

impl KeyedStore {
    /// Loads the store at `path`. A missing file yields an empty store; a
    /// corrupt one is discarded with a warning rather than failing startup.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(buf) => match serde_json::from_str(&buf) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(path = %path.display(), %err, "discarding unreadable store");
                    HashMap::default()
                }
            },
            Err(_) => HashMap::default(),
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn contains(&self, key: &str) -> bool { self.entries.contains_key(key) }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.entries.get(key)?;
        serde_json::from_value(value.clone()).ok()
    }

    pub fn set<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> anyhow::Result<()> {
        self.entries.insert(key.into(), serde_json::to_value(value)?);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> { self.entries.remove(key) }

    /// Adds `member` to the string set stored under `key`. Returns whether the
    /// set changed.
    pub fn add_to_set(&mut self, key: &str, member: &str) -> bool {
        let mut set: Vec<String> = self.get(key).unwrap_or_default();
        if set.iter().any(|m| m == member) {
            return false;
        }
        set.push(member.to_string());
        self.entries.insert(key.to_string(), serde_json::json!(set));
        true
    }

    pub fn set_contains(&self, key: &str, member: &str) -> bool {
        self.get::<Vec<String>>(key)
            .is_some_and(|set| set.iter().any(|m| m == member))
    }

    pub fn persist(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let buf = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, buf.as_bytes())?;
        Ok(())
    }
}
