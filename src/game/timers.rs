//! Cooperative scheduler
//!
//! "Wait N seconds, then do X" and "animate a field from A to B" live
//! here, stored as plain data on a single-threaded queue rather than as
//! captured closures. Every entry is keyed by the owning entity, so
//! despawning an entity cancels its pending work deterministically, and
//! an entry whose entity died some other way is silently dropped on the
//! next tick.

use std::collections::VecDeque;

use super::components::{FlameState, GuyState};
use super::entity::Entity;
use super::world::World;

/// What a timer does when it fires. The scene update applies these;
/// the scheduler itself never touches gameplay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledAction {
    /// Dwell expired: move a hopping flame to the given state.
    FlameEnter(FlameState),
    /// Dwell expired: move a patrolling guy to the given state.
    GuyEnter(GuyState),
    /// Settle the player sprite back to the idle pose (after firing).
    SettlePose,
}

#[derive(Debug)]
struct Timer {
    entity: Entity,
    remaining: f32,
    action: ScheduledAction,
}

/// Interpolation curve for tweens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
}

impl Easing {
    fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
        }
    }
}

/// One leg of a tween: `from` to `to` over `duration` seconds.
#[derive(Debug, Clone, Copy)]
pub struct TweenStage {
    pub from: f32,
    pub to: f32,
    pub duration: f32,
}

/// Which field a tween writes. Only opacity is animated today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenField {
    Opacity,
}

#[derive(Debug)]
struct Tween {
    entity: Entity,
    field: TweenField,
    easing: Easing,
    stages: VecDeque<TweenStage>,
    elapsed: f32,
}

/// Pending timers and tweens for the active scene.
#[derive(Default)]
pub struct Scheduler {
    timers: Vec<Timer>,
    tweens: Vec<Tween>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` for `entity` after `seconds`.
    pub fn after(&mut self, entity: Entity, seconds: f32, action: ScheduledAction) {
        self.timers.push(Timer {
            entity,
            remaining: seconds,
            action,
        });
    }

    /// Animate a field through the given stages in order. Replaces any
    /// in-flight tween on the same entity and field, so a second hit
    /// restarts the flash instead of interleaving writes with it.
    pub fn animate(
        &mut self,
        entity: Entity,
        field: TweenField,
        easing: Easing,
        stages: Vec<TweenStage>,
    ) {
        self.tweens
            .retain(|t| !(t.entity == entity && t.field == field));
        if stages.is_empty() {
            return;
        }
        self.tweens.push(Tween {
            entity,
            field,
            easing,
            stages: stages.into(),
            elapsed: 0.0,
        });
    }

    /// Drop every pending entry owned by `entity`.
    pub fn cancel(&mut self, entity: Entity) {
        self.timers.retain(|t| t.entity != entity);
        self.tweens.retain(|t| t.entity != entity);
    }

    /// Number of pending entries for an entity (timers plus tweens).
    pub fn pending_for(&self, entity: Entity) -> usize {
        self.timers.iter().filter(|t| t.entity == entity).count()
            + self.tweens.iter().filter(|t| t.entity == entity).count()
    }

    /// Advance time. Applies tween values to the world, drops entries
    /// whose entity is no longer alive, and returns the timers that came
    /// due this tick.
    pub fn tick(&mut self, dt: f32, world: &mut World) -> Vec<(Entity, ScheduledAction)> {
        let mut fired = Vec::new();

        let mut index = 0;
        while index < self.timers.len() {
            if !world.is_alive(self.timers[index].entity) {
                self.timers.swap_remove(index);
                continue;
            }
            self.timers[index].remaining -= dt;
            if self.timers[index].remaining <= 0.0 {
                let timer = self.timers.swap_remove(index);
                fired.push((timer.entity, timer.action));
            } else {
                index += 1;
            }
        }

        let mut index = 0;
        while index < self.tweens.len() {
            let tween = &mut self.tweens[index];
            if !world.is_alive(tween.entity) {
                self.tweens.swap_remove(index);
                continue;
            }
            tween.elapsed += dt;
            let mut finished = false;
            loop {
                let Some(stage) = tween.stages.front().copied() else {
                    finished = true;
                    break;
                };
                if tween.elapsed < stage.duration {
                    let t = tween.easing.apply(tween.elapsed / stage.duration);
                    let value = stage.from + (stage.to - stage.from) * t;
                    write_field(world, tween.entity, tween.field, value);
                    break;
                }
                // Stage complete: land exactly on the target and roll
                // leftover time into the next stage.
                write_field(world, tween.entity, tween.field, stage.to);
                tween.elapsed -= stage.duration;
                tween.stages.pop_front();
            }
            if finished {
                self.tweens.swap_remove(index);
            } else {
                index += 1;
            }
        }

        fired
    }
}

fn write_field(world: &mut World, entity: Entity, field: TweenField, value: f32) {
    match field {
        TweenField::Opacity => {
            if let Some(sprite) = world.sprites.get_mut(entity) {
                sprite.opacity = value;
            }
        }
    }
}
