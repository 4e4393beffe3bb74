use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{trace, warn};

use crate::common::collections::HashMap;
use crate::common::config::LayoutSettings;
use crate::layout::broadcast::{BroadcastSender, LayoutBroadcast};
use crate::layout::registry::{Registration, SurfaceRegistry};
use crate::layout::viewport::Size;
use crate::layout::zone::Zone;

/// Computed placement for one surface, anchored to its zone.
///
/// Derived on demand from the current registry and viewport; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[serde(tag = "kind")]
pub enum Position {
    /// Offsets from the zone's anchor corner: `offset` along the stacking
    /// axis (from the top or bottom edge), `inset` along the cross axis
    /// (from the left or right edge).
    Anchored { zone: Zone, offset: f64, inset: f64 },
    /// Top-left placement centered in the current viewport.
    Centered { left: f64, top: f64 },
}

/// Owns the registry of active floating surfaces and assigns each a
/// non-overlapping offset within its zone, ordered by descending priority and
/// stacked outward from the zone's anchor edge.
///
/// All operations are synchronous and infallible: caller contract violations
/// are absorbed by clamping or replacement, never raised, since a degraded
/// position beats tearing down an unrelated overlay.
pub struct LayoutCoordinator {
    settings: LayoutSettings,
    registry: SurfaceRegistry,
    viewport: Size,
    positions: HashMap<String, Position>,
    broadcast_tx: Option<BroadcastSender>,
}

impl LayoutCoordinator {
    pub fn new(settings: LayoutSettings, broadcast_tx: Option<BroadcastSender>) -> Self {
        Self {
            settings,
            registry: SurfaceRegistry::new(),
            viewport: Size::default(),
            positions: HashMap::default(),
            broadcast_tx,
        }
    }

    /// Inserts or replaces the registration for `id` and recomputes every
    /// position in the affected zone(s). Duplicate ids are not an error:
    /// a surface that re-registers after a content change simply updates its
    /// slot, keeping its original tie-break order.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        zone: Zone,
        priority: i32,
        width: f64,
        height: f64,
    ) {
        let id = id.into();
        if id.is_empty() {
            warn!("ignoring registration with empty id");
            return;
        }
        let (width, height) = self.clamp_footprint(&id, width, height);
        let previous_zone = self.registry.insert(id.clone(), Registration {
            zone,
            priority,
            width,
            height,
        });
        trace!(%id, %zone, priority, "registered surface");

        if let Some(previous) = previous_zone
            && previous != zone
        {
            self.positions.remove(&id);
            self.recompute_zone(previous);
            self.notify(LayoutBroadcast::PositionsChanged { zone: previous });
        }
        self.recompute_zone(zone);
        self.notify(LayoutBroadcast::PositionsChanged { zone });
    }

    /// Removes `id` and shifts the remaining surfaces in its zone inward.
    /// Unknown ids are a no-op so defensive cleanup on unmount races stays
    /// harmless.
    pub fn unregister(&mut self, id: &str) {
        let Some(removed) = self.registry.remove(id) else {
            return;
        };
        self.positions.remove(id);
        trace!(%id, zone = %removed.zone, "unregistered surface");
        self.recompute_zone(removed.zone);
        self.notify(LayoutBroadcast::PositionsChanged { zone: removed.zone });
    }

    /// The currently computed placement for `id`, or `None` when the surface
    /// is not registered ("do not render yet"). Deterministic with respect to
    /// the current registry and viewport.
    pub fn position_for(&self, id: &str) -> Option<Position> { self.positions.get(id).copied() }

    pub fn is_registered(&self, id: &str) -> bool { self.registry.contains(id) }

    pub fn surface_count(&self) -> usize { self.registry.len() }

    pub fn viewport(&self) -> Size { self.viewport }

    /// Stores the new viewport size and recomputes all registered surfaces.
    /// Only center-zone placements actually move; corner stacking is
    /// resize-independent.
    pub fn set_viewport(&mut self, size: Size) {
        self.viewport = size;
        for zone in Zone::iter() {
            if self.recompute_zone(zone) > 0 {
                self.notify(LayoutBroadcast::PositionsChanged { zone });
            }
        }
        self.notify(LayoutBroadcast::ViewportChanged {
            width: size.width,
            height: size.height,
        });
    }

    /// Replaces the stacking constants and recomputes every zone, so a host
    /// reacting to a config reload can apply new settings to live surfaces.
    pub fn apply_settings(&mut self, settings: LayoutSettings) {
        trace!(?settings, "applying layout settings");
        self.settings = settings;
        for zone in Zone::iter() {
            if self.recompute_zone(zone) > 0 {
                self.notify(LayoutBroadcast::PositionsChanged { zone });
            }
        }
    }

    pub fn subscribe(&self) -> Option<crate::layout::broadcast::BroadcastReceiver> {
        self.broadcast_tx.as_ref().map(|tx| tx.subscribe())
    }

    /// Recomputes the stack for one zone; returns the number of members.
    ///
    /// Corner zones: walk members in priority order, accumulating
    /// `base_padding + Σ(height + gap)` along the stacking axis with a fixed
    /// cross-axis inset. Center is a degenerate single-occupant zone: every
    /// member maps to the same centered offset and concurrent occupants
    /// overlap by design.
    fn recompute_zone(&mut self, zone: Zone) -> usize {
        let members = self.registry.zone_members(zone);
        let count = members.len();

        if zone.is_center() {
            let updates: Vec<(String, Position)> = members
                .into_iter()
                .map(|(id, reg)| (id.to_string(), self.centered(reg)))
                .collect();
            for (id, position) in updates {
                self.positions.insert(id, position);
            }
            return count;
        }

        let mut offset = self.settings.base_padding;
        let inset = self.settings.edge_margin;
        let gap = self.settings.gap;
        let updates: Vec<(String, Position)> = members
            .into_iter()
            .map(|(id, reg)| {
                let position = Position::Anchored { zone, offset, inset };
                offset += reg.height + gap;
                (id.to_string(), position)
            })
            .collect();
        for (id, position) in updates {
            self.positions.insert(id, position);
        }
        count
    }

    fn centered(&self, reg: &Registration) -> Position {
        Position::Centered {
            left: ((self.viewport.width - reg.width) / 2.0).max(0.0),
            top: ((self.viewport.height - reg.height) / 2.0).max(0.0),
        }
    }

    fn clamp_footprint(&self, id: &str, width: f64, height: f64) -> (f64, f64) {
        let min = self.settings.min_surface_extent;
        let mut clamped = (width, height);
        if !(width > 0.0) {
            warn!(%id, width, "non-positive width clamped to minimal stacking unit");
            clamped.0 = min;
        }
        if !(height > 0.0) {
            warn!(%id, height, "non-positive height clamped to minimal stacking unit");
            clamped.1 = min;
        }
        clamped
    }

    fn notify(&self, event: LayoutBroadcast) {
        if let Some(tx) = &self.broadcast_tx {
            // Send errors just mean nobody is listening yet.
            _ = tx.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;

    fn coordinator() -> LayoutCoordinator {
        let mut c = LayoutCoordinator::new(LayoutSettings::default(), None);
        c.set_viewport(Size::new(1440.0, 900.0));
        c
    }

    fn anchored_offset(position: Position) -> f64 {
        match position {
            Position::Anchored { offset, .. } => offset,
            Position::Centered { .. } => panic!("expected anchored position, got {position:?}"),
        }
    }

    #[test]
    fn toast_stacks_outside_pill() {
        // A pill (priority 2, 44 tall) and a toast (priority 1, 150 tall)
        // share the bottom-right corner: the pill hugs the edge, the toast
        // sits beyond it.
        let mut c = coordinator();
        c.register("toast", Zone::BottomRight, 1, 360.0, 150.0);
        c.register("pill", Zone::BottomRight, 2, 200.0, 44.0);

        assert_eq!(anchored_offset(c.position_for("pill").unwrap()), 16.0);
        assert_eq!(anchored_offset(c.position_for("toast").unwrap()), 16.0 + 44.0 + 12.0);
    }

    #[test]
    fn equal_priority_breaks_ties_by_registration_order() {
        let mut c = coordinator();
        c.register("first", Zone::BottomRight, 1, 300.0, 100.0);
        c.register("second", Zone::BottomRight, 1, 300.0, 100.0);

        let first = anchored_offset(c.position_for("first").unwrap());
        let second = anchored_offset(c.position_for("second").unwrap());
        assert_eq!(first, 16.0);
        assert_eq!(second, 16.0 + 100.0 + 12.0);
    }

    #[test]
    fn stacked_surfaces_never_overlap() {
        let mut c = coordinator();
        c.register("a", Zone::TopLeft, 5, 300.0, 150.0);
        c.register("b", Zone::TopLeft, 3, 300.0, 44.0);
        c.register("c", Zone::TopLeft, 3, 300.0, 80.0);
        c.register("d", Zone::TopLeft, -2, 300.0, 200.0);

        let mut placed: Vec<(f64, f64)> = ["a", "b", "c", "d"]
            .iter()
            .map(|id| {
                let offset = anchored_offset(c.position_for(id).unwrap());
                let height = c.registry.get(id).unwrap().height;
                (offset, height)
            })
            .collect();
        placed.sort_by(|x, y| x.0.total_cmp(&y.0));
        for pair in placed.windows(2) {
            assert!(
                pair[0].0 + pair[0].1 <= pair[1].0,
                "surfaces overlap: {pair:?}"
            );
        }
    }

    #[test]
    fn position_for_is_deterministic() {
        let mut c = coordinator();
        c.register("a", Zone::BottomLeft, 1, 300.0, 120.0);
        c.register("b", Zone::BottomLeft, 4, 300.0, 60.0);

        let first = c.position_for("a").unwrap();
        let second = c.position_for("a").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unregister_is_idempotent() {
        let mut c = coordinator();
        c.register("a", Zone::BottomRight, 1, 300.0, 100.0);
        c.unregister("a");
        c.unregister("a");
        c.unregister("never-registered");
        assert_eq!(c.surface_count(), 0);
        assert_eq!(c.position_for("a"), None);
    }

    #[test]
    fn unregister_shifts_survivors_inward() {
        let mut c = coordinator();
        c.register("inner", Zone::BottomRight, 2, 300.0, 44.0);
        c.register("outer", Zone::BottomRight, 1, 300.0, 150.0);
        assert_eq!(anchored_offset(c.position_for("outer").unwrap()), 72.0);

        c.unregister("inner");
        assert_eq!(anchored_offset(c.position_for("outer").unwrap()), 16.0);
    }

    #[test]
    fn replace_uses_only_latest_dimensions() {
        let mut c = coordinator();
        c.register("toast", Zone::BottomRight, 2, 300.0, 44.0);
        c.register("card", Zone::BottomRight, 1, 300.0, 100.0);

        // Toast grows after a content change; the card must shift by the new
        // height only, with no stale double-counting.
        c.register("toast", Zone::BottomRight, 2, 300.0, 90.0);
        assert_eq!(c.surface_count(), 2);
        assert_eq!(anchored_offset(c.position_for("card").unwrap()), 16.0 + 90.0 + 12.0);
    }

    #[test]
    fn replace_across_zones_vacates_old_zone() {
        let mut c = coordinator();
        c.register("mover", Zone::BottomRight, 2, 300.0, 44.0);
        c.register("stay", Zone::BottomRight, 1, 300.0, 100.0);
        assert_eq!(anchored_offset(c.position_for("stay").unwrap()), 72.0);

        c.register("mover", Zone::TopLeft, 2, 300.0, 44.0);
        assert_eq!(anchored_offset(c.position_for("stay").unwrap()), 16.0);
        match c.position_for("mover").unwrap() {
            Position::Anchored { zone, offset, .. } => {
                assert_eq!(zone, Zone::TopLeft);
                assert_eq!(offset, 16.0);
            }
            other => panic!("unexpected position {other:?}"),
        }
    }

    #[test]
    fn zones_are_independent() {
        let mut c = coordinator();
        c.register("tl", Zone::TopLeft, 1, 300.0, 64.0);
        let before = c.position_for("tl").unwrap();

        c.register("br-1", Zone::BottomRight, 1, 300.0, 100.0);
        c.register("br-2", Zone::BottomRight, 7, 300.0, 44.0);
        c.unregister("br-1");

        assert_eq!(c.position_for("tl").unwrap(), before);
    }

    #[test]
    fn center_tracks_viewport_resizes() {
        let mut c = coordinator();
        c.register("modal", Zone::Center, 0, 400.0, 300.0);
        assert_eq!(c.position_for("modal").unwrap(), Position::Centered {
            left: (1440.0 - 400.0) / 2.0,
            top: (900.0 - 300.0) / 2.0,
        });

        c.set_viewport(Size::new(1920.0, 1080.0));
        assert_eq!(c.position_for("modal").unwrap(), Position::Centered {
            left: (1920.0 - 400.0) / 2.0,
            top: (1080.0 - 300.0) / 2.0,
        });
    }

    #[test]
    fn center_occupants_overlap_by_design() {
        // The center zone is single-occupant by convention; concurrent
        // registrations are accepted and simply coincide.
        let mut c = coordinator();
        c.register("modal-a", Zone::Center, 1, 400.0, 300.0);
        c.register("modal-b", Zone::Center, 2, 400.0, 300.0);
        assert_eq!(
            c.position_for("modal-a").unwrap(),
            c.position_for("modal-b").unwrap()
        );
    }

    #[test]
    fn centered_position_clamps_at_zero() {
        let mut c = coordinator();
        c.set_viewport(Size::new(320.0, 200.0));
        c.register("modal", Zone::Center, 0, 400.0, 300.0);
        assert_eq!(c.position_for("modal").unwrap(), Position::Centered { left: 0.0, top: 0.0 });
    }

    #[test]
    fn non_positive_dimensions_clamp_to_minimal_unit() {
        let mut c = coordinator();
        c.register("ghost", Zone::BottomRight, 2, 0.0, 0.0);
        c.register("toast", Zone::BottomRight, 1, 300.0, 100.0);

        // The zero-height surface occupies one minimal stacking unit.
        assert_eq!(anchored_offset(c.position_for("ghost").unwrap()), 16.0);
        assert_eq!(anchored_offset(c.position_for("toast").unwrap()), 16.0 + 1.0 + 12.0);
    }

    #[test]
    fn empty_id_is_ignored() {
        let mut c = coordinator();
        c.register("", Zone::BottomRight, 1, 300.0, 100.0);
        assert_eq!(c.surface_count(), 0);
    }

    #[test]
    fn cross_axis_inset_is_constant() {
        let mut c = coordinator();
        c.register("a", Zone::BottomRight, 1, 300.0, 100.0);
        c.register("b", Zone::BottomRight, 2, 120.0, 44.0);
        for id in ["a", "b"] {
            match c.position_for(id).unwrap() {
                Position::Anchored { inset, .. } => assert_eq!(inset, 16.0),
                other => panic!("unexpected position {other:?}"),
            }
        }
    }

    #[test]
    fn settings_reload_moves_stacked_surfaces() {
        let mut c = coordinator();
        c.register("pill", Zone::BottomRight, 2, 200.0, 44.0);
        c.register("toast", Zone::BottomRight, 1, 360.0, 150.0);
        assert_eq!(anchored_offset(c.position_for("toast").unwrap()), 16.0 + 44.0 + 12.0);

        let mut settings = LayoutSettings::default();
        settings.base_padding = 24.0;
        settings.gap = 20.0;
        c.apply_settings(settings);

        assert_eq!(anchored_offset(c.position_for("pill").unwrap()), 24.0);
        assert_eq!(anchored_offset(c.position_for("toast").unwrap()), 24.0 + 44.0 + 20.0);
    }

    #[test]
    fn settings_reload_broadcasts_occupied_zones() {
        let (tx, mut rx) = tokio::sync::broadcast::channel(64);
        let mut c = LayoutCoordinator::new(LayoutSettings::default(), Some(tx));
        c.register("toast", Zone::BottomRight, 1, 300.0, 100.0);
        rx.try_recv().unwrap();

        c.apply_settings(LayoutSettings::default());
        assert_eq!(rx.try_recv().unwrap(), LayoutBroadcast::PositionsChanged {
            zone: Zone::BottomRight
        });
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn mutations_broadcast_position_changes() {
        let (tx, mut rx) = tokio::sync::broadcast::channel(64);
        let mut c = LayoutCoordinator::new(LayoutSettings::default(), Some(tx));

        c.register("toast", Zone::BottomRight, 1, 300.0, 100.0);
        assert_eq!(rx.try_recv().unwrap(), LayoutBroadcast::PositionsChanged {
            zone: Zone::BottomRight
        });

        c.set_viewport(Size::new(1280.0, 720.0));
        assert_eq!(rx.try_recv().unwrap(), LayoutBroadcast::PositionsChanged {
            zone: Zone::BottomRight
        });
        assert_eq!(rx.try_recv().unwrap(), LayoutBroadcast::ViewportChanged {
            width: 1280.0,
            height: 720.0
        });

        c.unregister("toast");
        assert_eq!(rx.try_recv().unwrap(), LayoutBroadcast::PositionsChanged {
            zone: Zone::BottomRight
        });
    }
}
