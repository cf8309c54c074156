//! Enemy behavior controllers
//!
//! Two archetypes, each a small state machine driven by scheduler
//! timers, plus the shared inhalable behavior: the flag tracks inhale
//! zone overlap, a shooting star destroys enemy and star together, and
//! while the player inhales a nearby inhalable enemy it is dragged in
//! against the player's facing.

use macroquad::math::Vec2;

use crate::game::components::*;
use crate::game::events::Events;
use crate::game::timers::{ScheduledAction, Scheduler};
use crate::game::world::World;
use crate::game::Entity;

pub const FLAME_JUMP: f32 = 1000.0;
pub const GUY_SPEED: f32 = 100.0;
/// Drag speed while being inhaled.
pub const SUCK_SPEED: f32 = 800.0;

/// Dwell in `idle` before the first move, both archetypes.
const IDLE_DWELL: f32 = 1.0;
/// Dwell per patrol leg for the guy.
const PATROL_DWELL: f32 = 2.0;

fn spawn_common(world: &mut World, x: f32, y: f32, kind: EnemyKind, size: Vec2) -> Entity {
    let enemy = world.spawn();
    world.positions.insert(enemy, Vec2::new(x, y));
    world.bodies.insert(enemy, Body::new());
    world
        .colliders
        .insert(enemy, Collider::new(size, Tag::Enemy).ignoring(Tag::Enemy));
    world.enemies.insert(enemy, Enemy::new(kind));
    enemy
}

/// A flame that sits for a second, then hops straight up, forever.
pub fn spawn_flame(world: &mut World, scheduler: &mut Scheduler, x: f32, y: f32) -> Entity {
    let flame = spawn_common(world, x, y, EnemyKind::Flame, Vec2::new(32.0, 40.0));
    world.sprites.insert(flame, Sprite::new(Look::Flame));
    world.flames.insert(
        flame,
        Flame {
            state: FlameState::Idle,
        },
    );
    scheduler.after(
        flame,
        IDLE_DWELL,
        ScheduledAction::FlameEnter(FlameState::Jump),
    );
    flame
}

/// A guy that pauses, then patrols left and right on a fixed cadence.
pub fn spawn_guy(world: &mut World, scheduler: &mut Scheduler, x: f32, y: f32) -> Entity {
    let guy = spawn_common(world, x, y, EnemyKind::Guy, Vec2::new(44.0, 44.0));
    world.sprites.insert(guy, Sprite::new(Look::Guy));
    world.facings.insert(guy, Facing::Left);
    world.guys.insert(
        guy,
        Guy {
            state: GuyState::Idle,
            speed: GUY_SPEED,
        },
    );
    scheduler.after(guy, IDLE_DWELL, ScheduledAction::GuyEnter(GuyState::Left));
    guy
}

/// Apply a fired dwell timer to the owning state machine.
pub fn apply_scheduled(
    world: &mut World,
    scheduler: &mut Scheduler,
    entity: Entity,
    action: ScheduledAction,
) {
    match action {
        ScheduledAction::FlameEnter(state) => enter_flame_state(world, scheduler, entity, state),
        ScheduledAction::GuyEnter(state) => enter_guy_state(world, scheduler, entity, state),
        ScheduledAction::SettlePose => {}
    }
}

fn enter_flame_state(world: &mut World, scheduler: &mut Scheduler, flame: Entity, state: FlameState) {
    let Some(data) = world.flames.get_mut(flame) else {
        return;
    };
    data.state = state;
    match state {
        FlameState::Idle => {
            scheduler.after(
                flame,
                IDLE_DWELL,
                ScheduledAction::FlameEnter(FlameState::Jump),
            );
        }
        FlameState::Jump => {
            if let Some(body) = world.bodies.get_mut(flame) {
                body.velocity.y = -FLAME_JUMP;
                body.grounded = false;
            }
        }
    }
}

fn enter_guy_state(world: &mut World, scheduler: &mut Scheduler, guy: Entity, state: GuyState) {
    let Some(data) = world.guys.get_mut(guy) else {
        return;
    };
    data.state = state;
    match state {
        GuyState::Idle => {
            scheduler.after(guy, IDLE_DWELL, ScheduledAction::GuyEnter(GuyState::Left));
        }
        GuyState::Left => {
            world.facings.insert(guy, Facing::Left);
            if let Some(sprite) = world.sprites.get_mut(guy) {
                sprite.flip_x = false;
            }
            scheduler.after(guy, PATROL_DWELL, ScheduledAction::GuyEnter(GuyState::Right));
        }
        GuyState::Right => {
            world.facings.insert(guy, Facing::Right);
            if let Some(sprite) = world.sprites.get_mut(guy) {
                sprite.flip_x = true;
            }
            scheduler.after(guy, PATROL_DWELL, ScheduledAction::GuyEnter(GuyState::Left));
        }
        // Never scheduled; holds the guy still.
        GuyState::Jump => {}
    }
}

/// Per-tick state behavior: patrol velocity for guys, landing detection
/// for flames.
pub fn update_state_machines(world: &mut World, scheduler: &mut Scheduler) {
    for enemy in world.enemy_list() {
        if let Some(guy) = world.guys.get(enemy).copied() {
            let vx = match guy.state {
                GuyState::Left => -guy.speed,
                GuyState::Right => guy.speed,
                GuyState::Idle | GuyState::Jump => 0.0,
            };
            if let Some(body) = world.bodies.get_mut(enemy) {
                body.velocity.x = vx;
            }
        }

        if let Some(flame) = world.flames.get(enemy).copied() {
            if let Some(body) = world.bodies.get_mut(enemy) {
                body.velocity.x = 0.0;
            }
            let landed = world.bodies.get(enemy).is_some_and(|b| b.grounded);
            if flame.state == FlameState::Jump && landed {
                enter_flame_state(world, scheduler, enemy, FlameState::Idle);
            }
        }
    }
}

/// While the player inhales, drag every inhalable enemy in against the
/// facing direction. Overrides whatever the state machine set this tick.
pub fn apply_inhale_suck(world: &mut World) {
    let Some(player) = world.player() else {
        return;
    };
    let inhaling = world
        .players
        .get(player)
        .is_some_and(|p| p.state == PuffState::Inhaling);
    if !inhaling {
        return;
    }
    let facing = world.facings.get(player).copied().unwrap_or_default();

    for enemy in world.enemy_list() {
        if world.enemies.get(enemy).is_some_and(|e| e.inhalable) {
            if let Some(body) = world.bodies.get_mut(enemy) {
                body.velocity.x = -facing.sign() * SUCK_SPEED;
            }
        }
    }
}

/// Shared contact handling: the inhalable flag and star hits.
pub fn handle_contacts(world: &mut World, events: &Events) {
    let begins: Vec<_> = events.contact_begin.iter().copied().collect();
    for contact in begins {
        if let Some((_zone, enemy)) = contact.between(Tag::InhaleZone, Tag::Enemy) {
            if let Some(data) = world.enemies.get_mut(enemy) {
                data.inhalable = true;
            }
        }
        if let Some((star, enemy)) = contact.between(Tag::Star, Tag::Enemy) {
            // Both go, unconditionally.
            world.despawn(star);
            world.despawn(enemy);
        }
        if let Some((star, _platform)) = contact.between(Tag::Star, Tag::Platform) {
            world.despawn(star);
        }
    }

    let ends: Vec<_> = events.contact_end.iter().copied().collect();
    for contact in ends {
        if let Some((_zone, enemy)) = contact.between(Tag::InhaleZone, Tag::Enemy) {
            if let Some(data) = world.enemies.get_mut(enemy) {
                data.inhalable = false;
            }
        }
    }
}
