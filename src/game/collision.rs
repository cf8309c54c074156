//! Collision
//!
//! Two small pieces of glue over plain AABB tests:
//!
//! - `step_bodies`: gravity integration plus axis-separated move-and-slide
//!   of dynamic bodies against solid platform geometry. Landing on top of
//!   a platform sets the body's `grounded` flag.
//! - `ContactTracker`: overlap tracking for the handful of tag pairs the
//!   gameplay cares about, diffed frame-to-frame into begin/end events.
//!
//! The coordinate system is screen-style: y grows downward, gravity is
//! positive, jumps are negative velocity.

use std::collections::HashMap;

use macroquad::math::{Rect, Vec2};

use super::components::{Collider, Tag};
use super::entity::Entity;
use super::events::{Contact, Events};
use super::world::World;

/// Cap on downward speed so long falls stay resolvable.
pub const TERMINAL_VELOCITY: f32 = 1800.0;

/// World-space AABB for a collider attached at `pos` (box center).
pub fn collider_rect(pos: Vec2, collider: &Collider) -> Rect {
    Rect::new(
        pos.x + collider.offset.x - collider.size.x / 2.0,
        pos.y + collider.offset.y - collider.size.y / 2.0,
        collider.size.x,
        collider.size.y,
    )
}

/// Strict-inequality intersection test. `Rect::overlaps` counts shared
/// edges, which would make a body resting exactly on a floor "collide"
/// on the horizontal pass too; resolution only wants real penetration.
fn penetrates(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

fn solid_rects(world: &World) -> Vec<Rect> {
    world
        .tagged(Tag::Platform)
        .into_iter()
        .filter_map(|e| {
            let pos = world.positions.get(e)?;
            let col = world.colliders.get(e)?;
            Some(collider_rect(*pos, col))
        })
        .collect()
}

/// Integrate gravity and velocity for every dynamic body, resolving
/// against platform geometry one axis at a time.
pub fn step_bodies(world: &mut World, gravity: f32, dt: f32) {
    let solids = solid_rects(world);

    for entity in world.iter() {
        let Some(body) = world.bodies.get(entity).copied() else {
            continue;
        };
        let Some(mut pos) = world.positions.get(entity).copied() else {
            continue;
        };

        let mut velocity = body.velocity;
        velocity.y += gravity * body.gravity_scale * dt;
        velocity.y = velocity.y.min(TERMINAL_VELOCITY);

        let collider = world.colliders.get(entity).cloned();
        let resolve = body.collide_solids && collider.is_some();
        let mut grounded = false;

        // Horizontal pass
        pos.x += velocity.x * dt;
        if resolve {
            let col = collider.as_ref().unwrap();
            for solid in &solids {
                let rect = collider_rect(pos, col);
                if !penetrates(&rect, solid) {
                    continue;
                }
                if velocity.x > 0.0 {
                    pos.x -= rect.right() - solid.left();
                } else if velocity.x < 0.0 {
                    pos.x += solid.right() - rect.left();
                }
            }
        }

        // Vertical pass
        pos.y += velocity.y * dt;
        if resolve {
            let col = collider.as_ref().unwrap();
            for solid in &solids {
                let rect = collider_rect(pos, col);
                if !penetrates(&rect, solid) {
                    continue;
                }
                if velocity.y > 0.0 {
                    // Falling onto the platform top
                    pos.y -= rect.bottom() - solid.top();
                    velocity.y = 0.0;
                    grounded = true;
                } else if velocity.y < 0.0 {
                    // Bonking the platform underside
                    pos.y += solid.bottom() - rect.top();
                    velocity.y = 0.0;
                }
            }
        }

        world.positions.insert(entity, pos);
        if let Some(b) = world.bodies.get_mut(entity) {
            b.velocity = velocity;
            b.grounded = grounded;
        }
    }
}

/// Tag pairs that produce contact events. Everything else (including
/// enemy/enemy) is never reported.
const WATCHED_PAIRS: &[(Tag, Tag)] = &[
    (Tag::InhaleZone, Tag::Enemy),
    (Tag::Player, Tag::Enemy),
    (Tag::Star, Tag::Enemy),
    (Tag::Star, Tag::Platform),
    (Tag::Player, Tag::Exit),
];

/// Frame-to-frame overlap diffing for the watched tag pairs.
///
/// A pair present last frame but absent now yields a `contact_end` event;
/// that covers both "moved apart" and "one side despawned", which is what
/// the inhalable flag wants.
#[derive(Default)]
pub struct ContactTracker {
    overlapping: HashMap<(Entity, Entity), (Tag, Tag)>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, world: &World, events: &mut Events) {
        let mut current: HashMap<(Entity, Entity), (Tag, Tag)> = HashMap::new();

        for &(tag_a, tag_b) in WATCHED_PAIRS {
            for a in world.tagged(tag_a) {
                let (Some(pos_a), Some(col_a)) = (world.positions.get(a), world.colliders.get(a))
                else {
                    continue;
                };
                if col_a.ignores(tag_b) {
                    continue;
                }
                let rect_a = collider_rect(*pos_a, col_a);
                for b in world.tagged(tag_b) {
                    let (Some(pos_b), Some(col_b)) =
                        (world.positions.get(b), world.colliders.get(b))
                    else {
                        continue;
                    };
                    if col_b.ignores(tag_a) {
                        continue;
                    }
                    if rect_a.overlaps(&collider_rect(*pos_b, col_b)) {
                        current.insert((a, b), (tag_a, tag_b));
                    }
                }
            }
        }

        for (&(a, b), &(a_tag, b_tag)) in &current {
            if !self.overlapping.contains_key(&(a, b)) {
                events.contact_begin.push(Contact { a, a_tag, b, b_tag });
            }
        }
        for (&(a, b), &(a_tag, b_tag)) in &self.overlapping {
            if !current.contains_key(&(a, b)) {
                events.contact_end.push(Contact { a, a_tag, b, b_tag });
            }
        }

        self.overlapping = current;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::components::{Body, Enemy, EnemyKind};

    fn add_platform(world: &mut World, x: f32, y: f32, w: f32, h: f32) {
        let e = world.spawn();
        world.positions.insert(e, Vec2::new(x, y));
        world
            .colliders
            .insert(e, Collider::new(Vec2::new(w, h), Tag::Platform));
    }

    fn add_body(world: &mut World, x: f32, y: f32, tag: Tag) -> Entity {
        let e = world.spawn();
        world.positions.insert(e, Vec2::new(x, y));
        world.bodies.insert(e, Body::new());
        world
            .colliders
            .insert(e, Collider::new(Vec2::new(32.0, 40.0), tag));
        e
    }

    #[test]
    fn falling_body_lands_and_grounds() {
        let mut world = World::new();
        add_platform(&mut world, 0.0, 100.0, 400.0, 20.0);
        let e = add_body(&mut world, 0.0, 0.0, Tag::Enemy);

        for _ in 0..120 {
            step_bodies(&mut world, 2100.0, 1.0 / 60.0);
        }

        let body = world.bodies.get(e).unwrap();
        assert!(body.grounded);
        assert_eq!(body.velocity.y, 0.0);
        // Resting with the collider bottom on the platform top
        let pos = world.positions.get(e).unwrap();
        assert!((pos.y + 20.0 - 90.0).abs() < 0.01, "pos.y = {}", pos.y);
    }

    #[test]
    fn walking_into_a_wall_stops() {
        let mut world = World::new();
        // Tall wall to the right of the body
        add_platform(&mut world, 100.0, 0.0, 20.0, 400.0);
        let e = add_body(&mut world, 0.0, 0.0, Tag::Player);
        world.bodies.get_mut(e).unwrap().gravity_scale = 0.0;
        world.bodies.get_mut(e).unwrap().velocity.x = 300.0;

        for _ in 0..60 {
            world.bodies.get_mut(e).unwrap().velocity.x = 300.0;
            step_bodies(&mut world, 0.0, 1.0 / 60.0);
        }

        let pos = world.positions.get(e).unwrap();
        // Collider right edge pinned to the wall's left edge
        assert!((pos.x + 16.0 - 90.0).abs() < 0.01, "pos.x = {}", pos.x);
    }

    #[test]
    fn projectile_ignores_solids_in_the_step() {
        let mut world = World::new();
        add_platform(&mut world, 100.0, 0.0, 20.0, 400.0);
        let e = world.spawn();
        world.positions.insert(e, Vec2::ZERO);
        world
            .bodies
            .insert(e, Body::projectile(Vec2::new(800.0, 0.0)));
        world
            .colliders
            .insert(e, Collider::new(Vec2::new(24.0, 24.0), Tag::Star));

        for _ in 0..30 {
            step_bodies(&mut world, 2100.0, 1.0 / 60.0);
        }

        let pos = world.positions.get(e).unwrap();
        assert!(pos.x > 300.0, "star flew through the wall");
        assert_eq!(pos.y, 0.0, "no gravity on projectiles");
    }

    #[test]
    fn tracker_emits_begin_then_end() {
        let mut world = World::new();
        let mut events = Events::new();
        let mut tracker = ContactTracker::new();

        let zone = world.spawn();
        world.positions.insert(zone, Vec2::ZERO);
        world
            .colliders
            .insert(zone, Collider::new(Vec2::new(80.0, 16.0), Tag::InhaleZone));

        let enemy = world.spawn();
        world.positions.insert(enemy, Vec2::new(30.0, 0.0));
        world.enemies.insert(enemy, Enemy::new(EnemyKind::Flame));
        world
            .colliders
            .insert(enemy, Collider::new(Vec2::new(32.0, 40.0), Tag::Enemy));

        tracker.update(&world, &mut events);
        assert_eq!(events.contact_begin.len(), 1);
        assert!(events.contact_end.is_empty());
        events.clear();

        // Still overlapping: no repeat begin
        tracker.update(&world, &mut events);
        assert!(events.contact_begin.is_empty());

        // Move apart
        world.positions.insert(enemy, Vec2::new(500.0, 0.0));
        tracker.update(&world, &mut events);
        assert_eq!(events.contact_end.len(), 1);
        let contact = events.contact_end.iter().next().unwrap();
        assert!(contact.between(Tag::InhaleZone, Tag::Enemy).is_some());
    }

    #[test]
    fn tracker_ends_contact_when_one_side_despawns() {
        let mut world = World::new();
        let mut events = Events::new();
        let mut tracker = ContactTracker::new();

        let player = add_body(&mut world, 0.0, 0.0, Tag::Player);
        world.bodies.remove(player);
        let enemy = add_body(&mut world, 10.0, 0.0, Tag::Enemy);
        world.bodies.remove(enemy);

        tracker.update(&world, &mut events);
        assert_eq!(events.contact_begin.len(), 1);
        events.clear();

        world.despawn(enemy);
        world.flush_despawns();
        tracker.update(&world, &mut events);
        assert_eq!(events.contact_end.len(), 1);
    }

    #[test]
    fn ignore_list_suppresses_contacts() {
        let mut world = World::new();
        let mut events = Events::new();
        let mut tracker = ContactTracker::new();

        let star = world.spawn();
        world.positions.insert(star, Vec2::ZERO);
        world.colliders.insert(
            star,
            Collider::new(Vec2::new(24.0, 24.0), Tag::Star).ignoring(Tag::Enemy),
        );

        let enemy = world.spawn();
        world.positions.insert(enemy, Vec2::ZERO);
        world.enemies.insert(enemy, Enemy::new(EnemyKind::Guy));
        world
            .colliders
            .insert(enemy, Collider::new(Vec2::new(32.0, 40.0), Tag::Enemy));

        tracker.update(&world, &mut events);
        assert!(events.contact_begin.is_empty());
    }
}
