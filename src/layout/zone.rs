use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// A named screen region a floating surface can request placement in.
///
/// Zones carry no geometry of their own beyond an anchor corner (or the
/// viewport center for [`Zone::Center`]); stacking within a zone is computed
/// independently of every other zone.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Zone {
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
    Center,
}

impl Zone {
    pub fn is_center(self) -> bool { matches!(self, Zone::Center) }

    /// Whether the zone's stacking axis grows away from the bottom edge.
    pub fn anchors_bottom(self) -> bool { matches!(self, Zone::BottomRight | Zone::BottomLeft) }

    /// Whether the zone's cross-axis inset is measured from the right edge.
    pub fn anchors_right(self) -> bool { matches!(self, Zone::BottomRight | Zone::TopRight) }
}
