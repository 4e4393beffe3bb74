use std::sync::Arc;

use parking_lot::Mutex;

use crate::layout::broadcast::BroadcastReceiver;
use crate::layout::coordinator::{LayoutCoordinator, Position};
use crate::layout::viewport::Size;
use crate::layout::zone::Zone;

/// Clonable handle to the session's single [`LayoutCoordinator`].
///
/// Created once at application start and passed to every consumer in place of
/// a module-level global. All registry access goes through the coordinator's
/// entry points; no consumer reads or writes registry entries directly.
#[derive(Clone)]
pub struct LayoutHandle {
    inner: Arc<Mutex<LayoutCoordinator>>,
}

impl LayoutHandle {
    pub fn new(coordinator: LayoutCoordinator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(coordinator)),
        }
    }

    /// Registers a surface and returns a guard that unregisters it when
    /// dropped, so teardown runs exactly once on every exit path.
    pub fn register(
        &self,
        id: impl Into<String>,
        zone: Zone,
        priority: i32,
        width: f64,
        height: f64,
    ) -> SurfaceGuard {
        let id = id.into();
        self.inner.lock().register(id.clone(), zone, priority, width, height);
        SurfaceGuard {
            id,
            layout: self.clone(),
        }
    }

    pub fn unregister(&self, id: &str) { self.inner.lock().unregister(id); }

    pub fn position_for(&self, id: &str) -> Option<Position> {
        self.inner.lock().position_for(id)
    }

    pub fn set_viewport(&self, size: Size) { self.inner.lock().set_viewport(size); }

    /// Applies freshly reloaded stacking constants to the live coordinator.
    pub fn apply_settings(&self, settings: crate::common::config::LayoutSettings) {
        self.inner.lock().apply_settings(settings);
    }

    pub fn viewport(&self) -> Size { self.inner.lock().viewport() }

    pub fn surface_count(&self) -> usize { self.inner.lock().surface_count() }

    /// A receiver of layout change broadcasts, or `None` when the coordinator
    /// was built without a broadcast channel.
    pub fn subscribe(&self) -> Option<BroadcastReceiver> { self.inner.lock().subscribe() }
}

/// Scoped registration: keeps the surface placed while alive, unregisters on
/// drop.
pub struct SurfaceGuard {
    id: String,
    layout: LayoutHandle,
}

impl SurfaceGuard {
    pub fn id(&self) -> &str { &self.id }

    pub fn position(&self) -> Option<Position> { self.layout.position_for(&self.id) }

    /// Re-registers the surface in place, e.g. after a content change alters
    /// its estimated footprint.
    pub fn update(&self, zone: Zone, priority: i32, width: f64, height: f64) {
        self.layout.inner.lock().register(self.id.clone(), zone, priority, width, height);
    }
}

impl Drop for SurfaceGuard {
    fn drop(&mut self) { self.layout.unregister(&self.id); }
}
