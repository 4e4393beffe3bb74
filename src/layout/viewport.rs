use std::thread;

use crossbeam_channel::Receiver;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::layout::handle::LayoutHandle;

/// Current host-window size in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self { Self { width, height } }
}

/// Drains resize notifications from the host's native event source and applies
/// the latest size to the coordinator. No debounce: every event is re-read and
/// the latest value stored.
pub struct ViewportTracker;

impl ViewportTracker {
    /// Spawns the tracker thread. It exits once the sender side of `rx` is
    /// dropped, which is the host window going away.
    pub fn spawn(layout: LayoutHandle, rx: Receiver<Size>) -> thread::JoinHandle<()> {
        thread::Builder::new()
            .name("viewport-tracker".to_string())
            .spawn(move || {
                while let Ok(size) = rx.recv() {
                    debug!(width = size.width, height = size.height, "viewport resized");
                    layout.set_viewport(size);
                }
                info!("resize source closed, exiting");
            })
            .expect("failed to spawn viewport-tracker thread")
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::unbounded;

    use super::*;
    use crate::common::config::LayoutSettings;
    use crate::layout::coordinator::LayoutCoordinator;

    #[test]
    fn tracker_applies_latest_size() {
        let layout = LayoutHandle::new(LayoutCoordinator::new(LayoutSettings::default(), None));
        let (tx, rx) = unbounded();
        let tracker = ViewportTracker::spawn(layout.clone(), rx);

        tx.send(Size::new(1280.0, 800.0)).unwrap();
        tx.send(Size::new(1920.0, 1080.0)).unwrap();
        drop(tx);
        tracker.join().unwrap();

        assert_eq!(layout.viewport(), Size::new(1920.0, 1080.0));
    }
}
