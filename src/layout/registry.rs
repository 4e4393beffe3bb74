use crate::common::collections::HashMap;
use crate::layout::zone::Zone;

/// A floating surface's declared intent to occupy space in a zone.
///
/// Dimensions are caller-supplied estimates in layout units, not measured
/// from rendered content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Registration {
    pub zone: Zone,
    /// Higher priority sits closer to the zone's anchor edge.
    pub priority: i32,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone)]
struct Slot {
    reg: Registration,
    /// First-registration order, retained across replacement so equal-priority
    /// tie-breaking stays stable when a surface re-registers with new
    /// dimensions.
    seq: u64,
}

/// Mapping from surface id to its current registration.
///
/// Entries are added when a surface mounts and removed when it unmounts;
/// a second insert under the same id replaces the first (last-write-wins).
#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    slots: HashMap<String, Slot>,
    next_seq: u64,
}

impl SurfaceRegistry {
    pub fn new() -> Self { Self::default() }

    /// Inserts or replaces the registration for `id`. Returns the zone the
    /// previous registration occupied, if any.
    pub fn insert(&mut self, id: impl Into<String>, reg: Registration) -> Option<Zone> {
        let id = id.into();
        match self.slots.get_mut(&id) {
            Some(slot) => {
                let previous = slot.reg.zone;
                slot.reg = reg;
                Some(previous)
            }
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.slots.insert(id, Slot { reg, seq });
                None
            }
        }
    }

    /// Removes the registration for `id` if present. Unknown ids are a no-op
    /// so unmount races stay harmless.
    pub fn remove(&mut self, id: &str) -> Option<Registration> {
        self.slots.remove(id).map(|slot| slot.reg)
    }

    pub fn get(&self, id: &str) -> Option<&Registration> {
        self.slots.get(id).map(|slot| &slot.reg)
    }

    pub fn contains(&self, id: &str) -> bool { self.slots.contains_key(id) }

    pub fn len(&self) -> usize { self.slots.len() }

    pub fn is_empty(&self) -> bool { self.slots.is_empty() }

    /// Members of `zone` sorted descending by priority, equal priorities
    /// ordered by first registration.
    pub fn zone_members(&self, zone: Zone) -> Vec<(&str, &Registration)> {
        let mut members: Vec<(&str, &Registration, u64)> = self
            .slots
            .iter()
            .filter(|(_, slot)| slot.reg.zone == zone)
            .map(|(id, slot)| (id.as_str(), &slot.reg, slot.seq))
            .collect();
        members.sort_by_key(|&(_, reg, seq)| (std::cmp::Reverse(reg.priority), seq));
        members.into_iter().map(|(id, reg, _)| (id, reg)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reg(zone: Zone, priority: i32, height: f64) -> Registration {
        Registration {
            zone,
            priority,
            width: 320.0,
            height,
        }
    }

    #[test]
    fn insert_assigns_sequence_in_order() {
        let mut registry = SurfaceRegistry::new();
        registry.insert("a", reg(Zone::BottomRight, 1, 100.0));
        registry.insert("b", reg(Zone::BottomRight, 1, 100.0));

        let members = registry.zone_members(Zone::BottomRight);
        assert_eq!(members[0].0, "a");
        assert_eq!(members[1].0, "b");
    }

    #[test]
    fn replace_keeps_original_order() {
        let mut registry = SurfaceRegistry::new();
        registry.insert("a", reg(Zone::BottomRight, 1, 100.0));
        registry.insert("b", reg(Zone::BottomRight, 1, 100.0));

        // Re-registering "a" with new dimensions must not demote it behind "b".
        let previous = registry.insert("a", reg(Zone::BottomRight, 1, 220.0));
        assert_eq!(previous, Some(Zone::BottomRight));
        assert_eq!(registry.len(), 2);

        let members = registry.zone_members(Zone::BottomRight);
        assert_eq!(members[0].0, "a");
        assert_eq!(members[0].1.height, 220.0);
    }

    #[test]
    fn members_sorted_by_descending_priority() {
        let mut registry = SurfaceRegistry::new();
        registry.insert("low", reg(Zone::TopLeft, 1, 50.0));
        registry.insert("high", reg(Zone::TopLeft, 9, 50.0));
        registry.insert("mid", reg(Zone::TopLeft, 4, 50.0));

        let ids: Vec<&str> = registry.zone_members(Zone::TopLeft).iter().map(|m| m.0).collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
    }

    #[test]
    fn remove_unknown_is_noop() {
        let mut registry = SurfaceRegistry::new();
        registry.insert("a", reg(Zone::Center, 0, 80.0));
        assert!(registry.remove("ghost").is_none());
        assert_eq!(registry.len(), 1);
        assert!(registry.remove("a").is_some());
        assert!(registry.remove("a").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn zone_members_filters_other_zones() {
        let mut registry = SurfaceRegistry::new();
        registry.insert("a", reg(Zone::BottomRight, 1, 100.0));
        registry.insert("b", reg(Zone::TopRight, 1, 100.0));
        assert_eq!(registry.zone_members(Zone::BottomRight).len(), 1);
        assert_eq!(registry.zone_members(Zone::TopRight).len(), 1);
        assert!(registry.zone_members(Zone::Center).is_empty());
    }
}
