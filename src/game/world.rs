//! Game World
//!
//! Central container for all per-scene state: entity allocation plus one
//! sparse table per component type. All component types are known at
//! compile time, so the tables are plain struct fields rather than a
//! type-erased map.
//!
//! Despawns are deferred: systems queue them mid-frame and the scene
//! flushes the queue once handlers have run, so iteration never observes
//! a half-removed entity.

use macroquad::math::Vec2;

use super::components::*;
use super::entity::{Entities, Entity};

/// Sparse component table indexed by entity slot.
pub struct Table<T> {
    slots: Vec<Option<T>>,
}

impl<T> Table<T> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn insert(&mut self, entity: Entity, value: T) {
        let slot = entity.slot();
        if slot >= self.slots.len() {
            self.slots.resize_with(slot + 1, || None);
        }
        self.slots[slot] = Some(value);
    }

    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        self.slots.get_mut(entity.slot()).and_then(Option::take)
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.slots.get(entity.slot()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.slots.get_mut(entity.slot()).and_then(Option::as_mut)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// All entities and components for the active scene.
#[derive(Default)]
pub struct World {
    entities: Entities,
    despawn_queue: Vec<Entity>,

    pub positions: Table<Vec2>,
    pub bodies: Table<Body>,
    pub colliders: Table<Collider>,
    pub sprites: Table<Sprite>,
    pub facings: Table<Facing>,
    pub healths: Table<Health>,
    pub jump_charges: Table<JumpCharges>,

    pub players: Table<Player>,
    pub enemies: Table<Enemy>,
    pub flames: Table<Flame>,
    pub guys: Table<Guy>,
    pub projectiles: Table<Projectile>,
    pub inhale_zones: Table<InhaleZone>,
    pub inhale_effects: Table<InhaleEffect>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self) -> Entity {
        self.entities.spawn()
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Queue an entity for removal at the end of the frame.
    pub fn despawn(&mut self, entity: Entity) {
        if self.entities.is_alive(entity) && !self.despawn_queue.contains(&entity) {
            self.despawn_queue.push(entity);
        }
    }

    pub fn is_despawning(&self, entity: Entity) -> bool {
        self.despawn_queue.contains(&entity)
    }

    /// Remove queued entities and their components. Returns the entities
    /// that were actually removed so the caller can cancel their pending
    /// timers and tweens.
    pub fn flush_despawns(&mut self) -> Vec<Entity> {
        let queued = std::mem::take(&mut self.despawn_queue);
        let mut removed = Vec::with_capacity(queued.len());
        for entity in queued {
            if self.entities.despawn(entity) {
                self.strip(entity);
                removed.push(entity);
            }
        }
        removed
    }

    fn strip(&mut self, entity: Entity) {
        self.positions.remove(entity);
        self.bodies.remove(entity);
        self.colliders.remove(entity);
        self.sprites.remove(entity);
        self.facings.remove(entity);
        self.healths.remove(entity);
        self.jump_charges.remove(entity);
        self.players.remove(entity);
        self.enemies.remove(entity);
        self.flames.remove(entity);
        self.guys.remove(entity);
        self.projectiles.remove(entity);
        self.inhale_zones.remove(entity);
        self.inhale_effects.remove(entity);
    }

    /// Iterate over all live entities.
    pub fn iter(&self) -> Vec<Entity> {
        self.entities.iter().collect()
    }

    /// The player entity, if one is alive in the scene.
    pub fn player(&self) -> Option<Entity> {
        self.entities.iter().find(|&e| self.players.contains(e))
    }

    /// All live entities carrying an `Enemy` component.
    pub fn enemy_list(&self) -> Vec<Entity> {
        self.entities
            .iter()
            .filter(|&e| self.enemies.contains(e))
            .collect()
    }

    /// All live entities whose collider carries the given tag.
    pub fn tagged(&self, tag: Tag) -> Vec<Entity> {
        self.entities
            .iter()
            .filter(|&e| self.colliders.get(e).is_some_and(|c| c.tag == tag))
            .collect()
    }

    pub fn live_count(&self) -> usize {
        self.entities.live_count()
    }

    /// Remove everything: entities, components, and pending despawns.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.despawn_queue.clear();

        self.positions.clear();
        self.bodies.clear();
        self.colliders.clear();
        self.sprites.clear();
        self.facings.clear();
        self.healths.clear();
        self.jump_charges.clear();
        self.players.clear();
        self.enemies.clear();
        self.flames.clear();
        self.guys.clear();
        self.projectiles.clear();
        self.inhale_zones.clear();
        self.inhale_effects.clear();
    }
}
