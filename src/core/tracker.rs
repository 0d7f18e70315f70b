use std::collections::HashSet;

use super::model::{CalledDrop, Caller, EntityId};

/// Lifecycle state for transient drop entities.
///
/// Owns the `dropped` / `landed` dedup sets and the table of player-called
/// drops. Nothing else mutates them. Events are assumed ordered per entity
/// (spawn, then landed, then destroyed); the tracker only deduplicates.
#[derive(Debug, Default)]
pub struct EntityLifecycleTracker {
    dropped: HashSet<EntityId>,
    landed: HashSet<EntityId>,
    called_drops: Vec<CalledDrop>,
}

impl EntityLifecycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time a drop is seen spawning.
    pub fn on_drop_spawned(&mut self, drop: EntityId) -> bool {
        self.dropped.insert(drop)
    }

    /// Returns true the first time a drop is seen landing.
    pub fn on_drop_landed(&mut self, drop: EntityId) -> bool {
        self.landed.insert(drop)
    }

    /// Forgets everything known about `drop`. Unknown ids are a no-op.
    /// Returns the called-drop entry that was removed, if any.
    pub fn on_drop_destroyed(&mut self, drop: EntityId) -> Option<CalledDrop> {
        let removed = self
            .called_drops
            .iter()
            .position(|c| c.matches(None, Some(drop)))
            .map(|idx| self.called_drops.swap_remove(idx));
        self.dropped.remove(&drop);
        self.landed.remove(&drop);
        removed
    }

    /// Drops a call whose aircraft despawned without releasing anything.
    /// Calls that already own a drop live on until that drop is destroyed,
    /// but stop answering to the aircraft id so a reused id starts clean.
    pub fn on_aircraft_destroyed(&mut self, aircraft: EntityId) -> Option<CalledDrop> {
        let removed = self
            .called_drops
            .iter()
            .position(|c| c.aircraft == Some(aircraft) && c.drop.is_none())
            .map(|idx| self.called_drops.swap_remove(idx));
        for entry in self.called_drops.iter_mut().filter(|c| c.aircraft == Some(aircraft)) {
            entry.aircraft = None;
        }
        removed
    }

    /// First called drop matching either identity.
    pub fn lookup_called_drop(
        &self,
        aircraft: Option<EntityId>,
        drop: Option<EntityId>,
    ) -> Option<&CalledDrop> {
        self.called_drops.iter().find(|c| c.matches(aircraft, drop))
    }

    /// Records a player-initiated call. An existing entry for the same
    /// aircraft is replaced, keeping one entry per aircraft/drop pair.
    pub fn register_called_drop(&mut self, aircraft: EntityId, player: Option<Caller>) {
        if let Some(existing) = self
            .called_drops
            .iter_mut()
            .find(|c| c.matches(Some(aircraft), None))
        {
            existing.player = player;
            return;
        }
        self.called_drops.push(CalledDrop {
            aircraft: Some(aircraft),
            drop: None,
            player,
        });
    }

    /// Links a spawned drop to the call made for the aircraft that released
    /// it. Only entries still waiting for their drop are linked.
    pub fn attach_drop(&mut self, aircraft: EntityId, drop: EntityId) -> bool {
        match self
            .called_drops
            .iter_mut()
            .find(|c| c.aircraft == Some(aircraft) && c.drop.is_none())
        {
            Some(entry) => {
                entry.drop = Some(drop);
                true
            }
            None => false,
        }
    }

    pub fn is_dropped(&self, id: EntityId) -> bool {
        self.dropped.contains(&id)
    }

    pub fn is_landed(&self, id: EntityId) -> bool {
        self.landed.contains(&id)
    }

    pub fn called_drop_count(&self) -> usize {
        self.called_drops.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(name: &str) -> Caller {
        Caller {
            id: format!("7656119{}", name.len()),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_spawn_deduplicated() {
        let mut tracker = EntityLifecycleTracker::new();
        assert!(tracker.on_drop_spawned(EntityId(10)));
        assert!(!tracker.on_drop_spawned(EntityId(10)));
        assert!(tracker.on_drop_spawned(EntityId(11)));
    }

    #[test]
    fn test_landed_deduplicated_independently() {
        let mut tracker = EntityLifecycleTracker::new();
        assert!(tracker.on_drop_landed(EntityId(10)));
        assert!(!tracker.on_drop_landed(EntityId(10)));
        // Landing does not count as spawning
        assert!(!tracker.is_dropped(EntityId(10)));
    }

    #[test]
    fn test_destroy_unknown_is_noop() {
        let mut tracker = EntityLifecycleTracker::new();
        assert!(tracker.on_drop_destroyed(EntityId(99)).is_none());
        assert!(tracker.on_drop_destroyed(EntityId(99)).is_none());
        assert_eq!(tracker.called_drop_count(), 0);
    }

    #[test]
    fn test_destroy_clears_both_sets_and_allows_reuse() {
        let mut tracker = EntityLifecycleTracker::new();
        tracker.on_drop_spawned(EntityId(5));
        tracker.on_drop_landed(EntityId(5));

        tracker.on_drop_destroyed(EntityId(5));
        assert!(!tracker.is_dropped(EntityId(5)));
        assert!(!tracker.is_landed(EntityId(5)));

        assert!(tracker.on_drop_spawned(EntityId(5)));
    }

    #[test]
    fn test_lookup_by_either_identity() {
        let mut tracker = EntityLifecycleTracker::new();
        tracker.register_called_drop(EntityId(1), Some(caller("Alice")));
        assert!(tracker.attach_drop(EntityId(1), EntityId(2)));

        let by_aircraft = tracker.lookup_called_drop(Some(EntityId(1)), None).cloned();
        let by_drop = tracker.lookup_called_drop(None, Some(EntityId(2))).cloned();
        assert!(by_aircraft.is_some());
        assert_eq!(by_aircraft, by_drop);
        assert_eq!(by_drop.unwrap().player.unwrap().name, "Alice");
    }

    #[test]
    fn test_destroy_removes_called_drop() {
        let mut tracker = EntityLifecycleTracker::new();
        tracker.register_called_drop(EntityId(1), None);
        tracker.attach_drop(EntityId(1), EntityId(2));

        let removed = tracker.on_drop_destroyed(EntityId(2));
        assert_eq!(removed.and_then(|c| c.aircraft), Some(EntityId(1)));
        assert!(tracker.lookup_called_drop(Some(EntityId(1)), None).is_none());
        assert!(tracker.lookup_called_drop(None, Some(EntityId(2))).is_none());
    }

    #[test]
    fn test_drop_destroy_ignores_aircraft_ids() {
        let mut tracker = EntityLifecycleTracker::new();
        tracker.register_called_drop(EntityId(1), None);
        assert!(tracker.on_drop_destroyed(EntityId(1)).is_none());
        assert_eq!(tracker.called_drop_count(), 1);
    }

    #[test]
    fn test_aircraft_destroyed_before_release_forgets_call() {
        let mut tracker = EntityLifecycleTracker::new();
        for id in 0..1000 {
            tracker.register_called_drop(EntityId(id), Some(caller("Ann")));
            assert!(tracker.on_aircraft_destroyed(EntityId(id)).is_some());
        }
        assert_eq!(tracker.called_drop_count(), 0);
        assert!(tracker.lookup_called_drop(Some(EntityId(5)), None).is_none());
    }

    #[test]
    fn test_aircraft_destroyed_after_release_keeps_drop_link() {
        let mut tracker = EntityLifecycleTracker::new();
        tracker.register_called_drop(EntityId(1), Some(caller("Ann")));
        tracker.attach_drop(EntityId(1), EntityId(2));

        assert!(tracker.on_aircraft_destroyed(EntityId(1)).is_none());
        assert_eq!(tracker.called_drop_count(), 1);
        assert!(tracker.lookup_called_drop(Some(EntityId(1)), None).is_none());
        assert!(tracker.lookup_called_drop(None, Some(EntityId(2))).is_some());

        tracker.on_drop_destroyed(EntityId(2));
        assert_eq!(tracker.called_drop_count(), 0);
    }

    #[test]
    fn test_register_twice_keeps_single_entry() {
        let mut tracker = EntityLifecycleTracker::new();
        tracker.register_called_drop(EntityId(1), None);
        tracker.register_called_drop(EntityId(1), Some(caller("Bob")));
        assert_eq!(tracker.called_drop_count(), 1);
        let entry = tracker.lookup_called_drop(Some(EntityId(1)), None).unwrap();
        assert_eq!(entry.player.as_ref().unwrap().name, "Bob");
    }

    #[test]
    fn test_attach_without_call_is_ignored() {
        let mut tracker = EntityLifecycleTracker::new();
        assert!(!tracker.attach_drop(EntityId(3), EntityId(4)));
        assert!(tracker.lookup_called_drop(None, Some(EntityId(4))).is_none());
    }
}
