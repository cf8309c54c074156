//! Entity identifiers
//!
//! Entities are generational indices: an index into the component tables
//! plus a generation counter for that slot. Despawning a slot bumps its
//! generation, so a stale handle to a destroyed enemy can never alias a
//! newly spawned one that reused the slot. Pending timers keyed by a stale
//! handle simply fail the liveness check and are dropped.

/// Handle to a game object. Cheap to copy, safe to hold across frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    slot: u32,
    generation: u32,
}

impl Entity {
    pub(crate) fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    /// Slot index, used by component tables.
    pub fn slot(&self) -> usize {
        self.slot as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Tracks which slots are live and hands out fresh handles.
pub struct Entities {
    /// Current generation per slot. Even = free, odd = live.
    generations: Vec<u32>,
    /// Slots available for reuse.
    free: Vec<u32>,
}

impl Entities {
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn spawn(&mut self) -> Entity {
        if let Some(slot) = self.free.pop() {
            let gen = &mut self.generations[slot as usize];
            *gen += 1; // even -> odd, slot becomes live
            Entity::new(slot, *gen)
        } else {
            let slot = self.generations.len() as u32;
            self.generations.push(1);
            Entity::new(slot, 1)
        }
    }

    /// Returns false if the handle was already dead.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        self.generations[entity.slot()] += 1; // odd -> even, slot freed
        self.free.push(entity.slot() as u32);
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.generations
            .get(entity.slot())
            .is_some_and(|&gen| gen == entity.generation() && gen % 2 == 1)
    }

    /// Number of slots ever allocated (live or not).
    pub fn slot_count(&self) -> usize {
        self.generations.len()
    }

    pub fn live_count(&self) -> usize {
        self.generations.len() - self.free.len()
    }

    /// Iterate over all live entities.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.generations
            .iter()
            .enumerate()
            .filter(|(_, &gen)| gen % 2 == 1)
            .map(|(slot, &gen)| Entity::new(slot as u32, gen))
    }

    /// Free every slot. Existing handles all become dead.
    pub fn clear(&mut self) {
        self.free.clear();
        for (slot, gen) in self.generations.iter_mut().enumerate() {
            if *gen % 2 == 1 {
                *gen += 1;
            }
            self.free.push(slot as u32);
        }
    }
}

impl Default for Entities {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_despawn_roundtrip() {
        let mut entities = Entities::new();
        let a = entities.spawn();
        let b = entities.spawn();
        assert!(entities.is_alive(a));
        assert!(entities.is_alive(b));
        assert_eq!(entities.live_count(), 2);

        assert!(entities.despawn(a));
        assert!(!entities.is_alive(a));
        assert!(entities.is_alive(b));
        assert!(!entities.despawn(a), "double despawn is a no-op");
    }

    #[test]
    fn stale_handle_does_not_alias_reused_slot() {
        let mut entities = Entities::new();
        let old = entities.spawn();
        entities.despawn(old);

        let new = entities.spawn();
        assert_eq!(new.slot(), old.slot());
        assert_ne!(new.generation(), old.generation());
        assert!(!entities.is_alive(old));
        assert!(entities.is_alive(new));
    }

    #[test]
    fn clear_kills_everything() {
        let mut entities = Entities::new();
        let handles: Vec<_> = (0..4).map(|_| entities.spawn()).collect();
        entities.clear();
        assert_eq!(entities.live_count(), 0);
        for h in handles {
            assert!(!entities.is_alive(h));
        }
        // Slots are reusable after a clear
        let fresh = entities.spawn();
        assert!(entities.is_alive(fresh));
    }
}
