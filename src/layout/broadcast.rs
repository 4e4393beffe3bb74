use serde::{Deserialize, Serialize};

use crate::layout::zone::Zone;

/// Notification that computed positions may have changed and consumers should
/// re-pull [`position_for`](crate::layout::LayoutCoordinator::position_for).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
#[serde(tag = "type")]
pub enum LayoutBroadcast {
    PositionsChanged { zone: Zone },
    ViewportChanged { width: f64, height: f64 },
}

pub type BroadcastSender = tokio::sync::broadcast::Sender<LayoutBroadcast>;
pub type BroadcastReceiver = tokio::sync::broadcast::Receiver<LayoutBroadcast>;
