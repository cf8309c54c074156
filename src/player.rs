//! Player controller
//!
//! Translates the input snapshot and contact events into player state:
//! movement, double jump, the inhale/spit cycle, health and the hit
//! flash, exit transitions, and the fall-out-of-bounds restart. Also
//! keeps the inhale zone and its visual effect parked on the correct
//! side of the player every tick.

use macroquad::math::Vec2;

use crate::controls::InputSnapshot;
use crate::game::components::*;
use crate::game::events::Events;
use crate::game::timers::{Easing, ScheduledAction, Scheduler, TweenField, TweenStage};
use crate::game::world::World;
use crate::game::Entity;
use crate::session::GameSession;

pub const PLAYER_SPEED: f32 = 300.0;
pub const PLAYER_JUMP: f32 = 700.0;
pub const JUMP_CHARGES: u8 = 2;
pub const STARTING_HEALTH: i32 = 3;

pub const STAR_SPEED: f32 = 800.0;
pub const STAR_OFFSET: f32 = 80.0;

/// Below this y the player has fallen out of the level.
pub const FALL_LIMIT: f32 = 2000.0;

const ZONE_OFFSET: Vec2 = Vec2::new(56.0, 8.0);
const ZONE_SIZE: Vec2 = Vec2::new(80.0, 16.0);
const EFFECT_OFFSET: f32 = 60.0;
const FLASH_SECONDS: f32 = 0.05;
/// Delay before the sprite settles back to idle after spitting a star.
const SETTLE_SECONDS: f32 = 1.0;

/// Spawn the player plus its inhale zone and inhale effect companions.
pub fn spawn(world: &mut World, x: f32, y: f32) -> Entity {
    let player = world.spawn();
    world.positions.insert(player, Vec2::new(x, y));
    world.bodies.insert(player, Body::new());
    world
        .colliders
        .insert(player, Collider::new(Vec2::new(32.0, 40.0), Tag::Player));
    world
        .sprites
        .insert(player, Sprite::new(Look::Puff(PuffPose::Idle)));
    world.facings.insert(player, Facing::Right);
    world.healths.insert(player, Health::new(STARTING_HEALTH));
    world
        .jump_charges
        .insert(player, JumpCharges::new(JUMP_CHARGES));
    world.players.insert(
        player,
        Player {
            speed: PLAYER_SPEED,
            state: PuffState::Idle,
        },
    );

    let zone = world.spawn();
    world.positions.insert(zone, Vec2::new(x, y) + ZONE_OFFSET);
    world
        .colliders
        .insert(zone, Collider::new(ZONE_SIZE, Tag::InhaleZone));
    world.inhale_zones.insert(zone, InhaleZone { owner: player });

    let effect = world.spawn();
    world
        .positions
        .insert(effect, Vec2::new(x + EFFECT_OFFSET, y));
    let mut plume = Sprite::new(Look::InhalePlume);
    plume.opacity = 0.0;
    world.sprites.insert(effect, plume);
    world
        .inhale_effects
        .insert(effect, InhaleEffect { owner: player });

    player
}

fn set_pose(world: &mut World, player: Entity, pose: PuffPose) {
    if let Some(sprite) = world.sprites.get_mut(player) {
        sprite.look = Look::Puff(pose);
    }
}

fn set_effect_opacity(world: &mut World, player: Entity, opacity: f32) {
    for e in world.iter() {
        if world
            .inhale_effects
            .get(e)
            .is_some_and(|fx| fx.owner == player)
        {
            if let Some(sprite) = world.sprites.get_mut(e) {
                sprite.opacity = opacity;
            }
        }
    }
}

/// Apply one frame of input to the player.
pub fn apply_controls(world: &mut World, scheduler: &mut Scheduler, input: &InputSnapshot) {
    let Some(player) = world.player() else {
        return;
    };

    // Horizontal movement: velocity is rewritten every frame, and when
    // both keys are held the right handler wins (last writer).
    if let Some(body) = world.bodies.get_mut(player) {
        body.velocity.x = 0.0;
    }
    if input.left_held {
        world.facings.insert(player, Facing::Left);
        if let Some(sprite) = world.sprites.get_mut(player) {
            sprite.flip_x = true;
        }
        if let Some(body) = world.bodies.get_mut(player) {
            body.velocity.x = -PLAYER_SPEED;
        }
    }
    if input.right_held {
        world.facings.insert(player, Facing::Right);
        if let Some(sprite) = world.sprites.get_mut(player) {
            sprite.flip_x = false;
        }
        if let Some(body) = world.bodies.get_mut(player) {
            body.velocity.x = PLAYER_SPEED;
        }
    }

    // Double jump: charges refill on the ground, jumping spends one.
    let grounded = world.bodies.get(player).is_some_and(|b| b.grounded);
    if grounded {
        if let Some(charges) = world.jump_charges.get_mut(player) {
            charges.refill();
        }
    }
    if input.jump_pressed {
        let can_jump = world
            .jump_charges
            .get_mut(player)
            .is_some_and(|c| c.spend());
        if can_jump {
            if let Some(body) = world.bodies.get_mut(player) {
                body.velocity.y = -PLAYER_JUMP;
                body.grounded = false;
            }
        }
    }

    if input.inhale_pressed {
        let state = world.players.get(player).map(|p| p.state);
        match state {
            Some(PuffState::Full) => {
                // Pressing inhale while full just shows the full pose;
                // it does not start a new inhale.
                set_pose(world, player, PuffPose::Full);
                set_effect_opacity(world, player, 0.0);
            }
            Some(_) => {
                if let Some(p) = world.players.get_mut(player) {
                    p.state = PuffState::Inhaling;
                }
                set_pose(world, player, PuffPose::Inhaling);
                set_effect_opacity(world, player, 1.0);
            }
            None => {}
        }
    }

    if input.inhale_released {
        let state = world.players.get(player).map(|p| p.state);
        match state {
            Some(PuffState::Full) => {
                set_pose(world, player, PuffPose::Inhaling);
                spawn_star(world, player);
                if let Some(p) = world.players.get_mut(player) {
                    p.state = PuffState::Idle;
                }
                scheduler.after(player, SETTLE_SECONDS, ScheduledAction::SettlePose);
            }
            Some(PuffState::Inhaling) => {
                if let Some(p) = world.players.get_mut(player) {
                    p.state = PuffState::Idle;
                }
                set_pose(world, player, PuffPose::Idle);
                set_effect_opacity(world, player, 0.0);
            }
            _ => {}
        }
    }
}

/// Spit a shooting star in the facing direction.
fn spawn_star(world: &mut World, player: Entity) {
    let Some(pos) = world.positions.get(player).copied() else {
        return;
    };
    let facing = world.facings.get(player).copied().unwrap_or_default();

    let star = world.spawn();
    world.positions.insert(
        star,
        Vec2::new(pos.x + facing.sign() * STAR_OFFSET, pos.y + 5.0),
    );
    world.bodies.insert(
        star,
        Body::projectile(Vec2::new(facing.sign() * STAR_SPEED, 0.0)),
    );
    world
        .colliders
        .insert(star, Collider::new(Vec2::new(24.0, 24.0), Tag::Star));
    let mut sprite = Sprite::new(Look::Star);
    sprite.flip_x = facing == Facing::Right;
    world.sprites.insert(star, sprite);
    world.projectiles.insert(star, Projectile);
}

/// The scheduled pose settle after spitting a star.
pub fn apply_scheduled(world: &mut World, entity: Entity, action: ScheduledAction) {
    if action == ScheduledAction::SettlePose && world.players.contains(entity) {
        set_pose(world, entity, PuffPose::Idle);
    }
}

/// Keep the inhale zone and effect on the facing side of the player.
/// Runs after the physics step so companions never lag a frame behind.
pub fn position_inhale_gear(world: &mut World) {
    let Some(player) = world.player() else {
        return;
    };
    let Some(pos) = world.positions.get(player).copied() else {
        return;
    };
    let facing = world.facings.get(player).copied().unwrap_or_default();

    for e in world.iter() {
        if world
            .inhale_zones
            .get(e)
            .is_some_and(|z| z.owner == player)
        {
            world.positions.insert(
                e,
                Vec2::new(pos.x + facing.sign() * ZONE_OFFSET.x, pos.y + ZONE_OFFSET.y),
            );
        }
        if world
            .inhale_effects
            .get(e)
            .is_some_and(|fx| fx.owner == player)
        {
            world
                .positions
                .insert(e, Vec2::new(pos.x + facing.sign() * EFFECT_OFFSET, pos.y));
            if let Some(sprite) = world.sprites.get_mut(e) {
                sprite.flip_x = facing == Facing::Left;
            }
        }
    }
}

/// React to this frame's contact events: enemy touches and exit touches.
pub fn handle_contacts(
    world: &mut World,
    scheduler: &mut Scheduler,
    events: &Events,
    session: &mut GameSession,
) {
    let contacts: Vec<_> = events.contact_begin.iter().copied().collect();
    for contact in contacts {
        if let Some((player, enemy)) = contact.between(Tag::Player, Tag::Enemy) {
            if !world.is_alive(player) || !world.is_alive(enemy) || world.is_despawning(enemy) {
                continue;
            }
            let inhaling = world
                .players
                .get(player)
                .is_some_and(|p| p.state == PuffState::Inhaling);
            let inhalable = world.enemies.get(enemy).is_some_and(|e| e.inhalable);

            if inhaling && inhalable {
                // Swallow the enemy whole. No projectile yet - that
                // happens on release.
                world.despawn(enemy);
                if let Some(p) = world.players.get_mut(player) {
                    p.state = PuffState::Full;
                }
                set_pose(world, player, PuffPose::Full);
                set_effect_opacity(world, player, 0.0);
                continue;
            }

            if world.healths.get(player).is_some_and(|h| h.is_empty()) {
                world.despawn(player);
                session.request_restart();
                continue;
            }

            if let Some(health) = world.healths.get_mut(player) {
                health.hurt();
            }
            // Hit feedback: opacity dips to zero and back, 50 ms each
            // way. A second hit mid-flash restarts the sequence.
            scheduler.animate(
                player,
                TweenField::Opacity,
                Easing::Linear,
                vec![
                    TweenStage {
                        from: 1.0,
                        to: 0.0,
                        duration: FLASH_SECONDS,
                    },
                    TweenStage {
                        from: 0.0,
                        to: 1.0,
                        duration: FLASH_SECONDS,
                    },
                ],
            );
        }

        if let Some((player, _exit)) = contact.between(Tag::Player, Tag::Exit) {
            if world.is_alive(player) {
                let next = session.next_scene().to_string();
                // No-op when the level never set a destination.
                session.request_scene(&next);
            }
        }
    }
}

/// Falling past the limit restarts the level from its entry point.
pub fn fall_check(world: &World, session: &mut GameSession) {
    let Some(player) = world.player() else {
        return;
    };
    if world
        .positions
        .get(player)
        .is_some_and(|pos| pos.y > FALL_LIMIT)
    {
        session.request_restart();
    }
}
