//! Scene composition
//!
//! Builds scenes by name - gameplay levels from embedded level data, UI
//! screens otherwise - and runs the fixed per-frame update order for
//! levels. Everything is single-threaded and cooperative: input first,
//! then timers, state machines, physics, contact tracking, gameplay
//! handlers, and finally deferred despawns and the camera.

use macroquad::logging::warn;
use macroquad::math::Vec2;

use crate::controls::InputSnapshot;
use crate::enemy;
use crate::game::collision::{self, ContactTracker};
use crate::game::components::{Collider, Tag};
use crate::game::timers::{ScheduledAction, Scheduler};
use crate::game::{Events, World};
use crate::level::{self, LevelData, Region};
use crate::player;
use crate::session::GameSession;
use crate::ui::MenuScreen;

pub enum Scene {
    Menu(MenuScreen),
    Level(LevelScene),
}

/// Tear down whatever was running and build the named scene. Falls back
/// to the start menu when level data fails to parse (which the startup
/// validation should have caught already).
pub fn enter(name: &str, session: &mut GameSession) -> Scene {
    session.set_current_scene(name);
    if level::is_level_scene(name) {
        match level::load(name) {
            Ok(data) => return Scene::Level(LevelScene::new(name, data, session)),
            Err(e) => {
                warn!("failed to load {}: {}", name, e);
            }
        }
    }
    Scene::Menu(MenuScreen::for_scene(name))
}

/// Where each level's exit leads.
fn exit_destination(name: &str) -> &'static str {
    match name {
        "level-1" => "level-2",
        "level-2" => "level-3",
        _ => "end",
    }
}

/// A gameplay level: the world, its pending timers, contact tracking,
/// and the camera.
pub struct LevelScene {
    pub name: String,
    pub level: LevelData,
    pub world: World,
    pub scheduler: Scheduler,
    pub events: Events,
    pub tracker: ContactTracker,
    pub camera: Vec2,
}

impl LevelScene {
    pub fn new(name: &str, level: LevelData, session: &mut GameSession) -> Self {
        let mut world = World::new();
        let mut scheduler = Scheduler::new();

        for region in &level.platforms {
            spawn_region(&mut world, region, Tag::Platform);
        }
        for region in &level.exits {
            spawn_region(&mut world, region, Tag::Exit);
        }

        let (px, py) = level.spawn.player;
        let player = player::spawn(&mut world, px, py);
        let camera = world
            .positions
            .get(player)
            .copied()
            .unwrap_or(Vec2::ZERO);

        for &(x, y) in &level.spawn.flames {
            enemy::spawn_flame(&mut world, &mut scheduler, x, y);
        }
        for &(x, y) in &level.spawn.guys {
            enemy::spawn_guy(&mut world, &mut scheduler, x, y);
        }

        session.set_next_scene(exit_destination(name));

        Self {
            name: name.to_string(),
            level,
            world,
            scheduler,
            events: Events::new(),
            tracker: ContactTracker::new(),
            camera,
        }
    }

    /// One frame of gameplay. `view` is the world-space size of the
    /// camera viewport, used for clamping the follow camera.
    pub fn update(
        &mut self,
        input: &InputSnapshot,
        session: &mut GameSession,
        dt: f32,
        view: Vec2,
    ) {
        player::apply_controls(&mut self.world, &mut self.scheduler, input);

        for (entity, action) in self.scheduler.tick(dt, &mut self.world) {
            match action {
                ScheduledAction::SettlePose => {
                    player::apply_scheduled(&mut self.world, entity, action);
                }
                ScheduledAction::FlameEnter(_) | ScheduledAction::GuyEnter(_) => {
                    enemy::apply_scheduled(&mut self.world, &mut self.scheduler, entity, action);
                }
            }
        }

        enemy::update_state_machines(&mut self.world, &mut self.scheduler);
        enemy::apply_inhale_suck(&mut self.world);

        collision::step_bodies(&mut self.world, self.level.gravity, dt);
        player::position_inhale_gear(&mut self.world);

        self.tracker.update(&self.world, &mut self.events);
        // Inhalable flags first, so a swallow and the zone-enter contact
        // landing on the same frame resolve in the enemy's favor.
        enemy::handle_contacts(&mut self.world, &self.events);
        player::handle_contacts(&mut self.world, &mut self.scheduler, &self.events, session);
        self.events.clear();

        player::fall_check(&self.world, session);

        for removed in self.world.flush_despawns() {
            self.scheduler.cancel(removed);
        }

        self.update_camera(view);
    }

    fn update_camera(&mut self, view: Vec2) {
        if let Some(player) = self.world.player() {
            if let Some(pos) = self.world.positions.get(player) {
                self.camera = *pos;
            }
        }
        let (bounds_x, bounds_y) = self.level.bounds;
        self.camera.x = clamp_axis(self.camera.x, view.x, bounds_x);
        self.camera.y = clamp_axis(self.camera.y, view.y, bounds_y);
    }
}

fn clamp_axis(center: f32, view: f32, bound: f32) -> f32 {
    if bound <= view {
        bound / 2.0
    } else {
        center.clamp(view / 2.0, bound - view / 2.0)
    }
}

fn spawn_region(world: &mut World, region: &Region, tag: Tag) {
    let e = world.spawn();
    world.positions.insert(e, Vec2::new(region.x, region.y));
    world
        .colliders
        .insert(e, Collider::new(Vec2::new(region.w, region.h), tag));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::components::*;

    const DT: f32 = 1.0 / 60.0;
    const VIEW: Vec2 = Vec2::new(2133.0, 1200.0);

    fn flat_level(flames: Vec<(f32, f32)>, guys: Vec<(f32, f32)>) -> LevelData {
        ron::from_str(&format!(
            r#"(
                background: (0, 0, 0),
                gravity: 2100.0,
                bounds: (4000.0, 1400.0),
                platforms: [(x: 2000.0, y: 860.0, w: 4000.0, h: 80.0)],
                exits: [(x: 3900.0, y: 760.0, w: 50.0, h: 120.0)],
                spawn: (player: (200.0, 780.0), flames: {:?}, guys: {:?}),
            )"#,
            flames, guys
        ))
        .unwrap()
    }

    fn scene_with(flames: Vec<(f32, f32)>, guys: Vec<(f32, f32)>) -> (LevelScene, GameSession) {
        let mut session = GameSession::new();
        session.set_current_scene("level-1");
        let scene = LevelScene::new("level-1", flat_level(flames, guys), &mut session);
        (scene, session)
    }

    fn run(scene: &mut LevelScene, session: &mut GameSession, input: InputSnapshot, seconds: f32) {
        let steps = (seconds / DT).round() as usize;
        for _ in 0..steps {
            scene.update(&input, session, DT, VIEW);
        }
    }

    fn idle() -> InputSnapshot {
        InputSnapshot::default()
    }

    #[test]
    fn entering_a_level_sets_session_scenes() {
        let (_, session) = scene_with(vec![], vec![]);
        assert_eq!(session.current_scene(), "level-1");
        assert_eq!(session.next_scene(), "level-2");
    }

    #[test]
    fn flame_hops_and_settles_back_to_idle() {
        let (mut scene, mut session) = scene_with(vec![(800.0, 780.0)], vec![]);
        let flame = scene.world.enemy_list()[0];

        // Let it settle onto the floor during the 1 s idle dwell
        run(&mut scene, &mut session, idle(), 0.5);
        assert_eq!(scene.world.flames.get(flame).unwrap().state, FlameState::Idle);

        run(&mut scene, &mut session, idle(), 0.6);
        assert_eq!(
            scene.world.flames.get(flame).unwrap().state,
            FlameState::Jump,
            "dwell expired, flame should be hopping"
        );
        assert!(!scene.world.bodies.get(flame).unwrap().grounded);

        // 1000 up against 2100 gravity: the hop lasts ~0.95 s, so one
        // more second lands it back in idle (the next hop is at ~2.95 s)
        run(&mut scene, &mut session, idle(), 1.0);
        assert_eq!(scene.world.flames.get(flame).unwrap().state, FlameState::Idle);
        assert!(scene.world.bodies.get(flame).unwrap().grounded);
    }

    #[test]
    fn guy_patrols_left_then_right_then_left() {
        let (mut scene, mut session) = scene_with(vec![], vec![(2000.0, 780.0)]);
        let guy = scene.world.enemy_list()[0];

        run(&mut scene, &mut session, idle(), 0.5);
        assert_eq!(scene.world.guys.get(guy).unwrap().state, GuyState::Idle);
        let start_x = scene.world.positions.get(guy).unwrap().x;

        run(&mut scene, &mut session, idle(), 0.6);
        assert_eq!(scene.world.guys.get(guy).unwrap().state, GuyState::Left);
        run(&mut scene, &mut session, idle(), 1.0);
        let mid_x = scene.world.positions.get(guy).unwrap().x;
        assert!(mid_x < start_x, "moving left while in Left");

        run(&mut scene, &mut session, idle(), 1.5);
        assert_eq!(scene.world.guys.get(guy).unwrap().state, GuyState::Right);
        run(&mut scene, &mut session, idle(), 1.0);
        assert!(scene.world.positions.get(guy).unwrap().x > mid_x);

        run(&mut scene, &mut session, idle(), 1.5);
        assert_eq!(
            scene.world.guys.get(guy).unwrap().state,
            GuyState::Left,
            "patrol cycles forever"
        );
    }

    #[test]
    fn inhalable_tracks_zone_overlap() {
        let (mut scene, mut session) = scene_with(vec![], vec![(2000.0, 780.0)]);
        let guy = scene.world.enemy_list()[0];

        // Park the guy just right of the player, inside the zone
        scene.world.positions.insert(guy, Vec2::new(270.0, 780.0));
        scene.world.guys.get_mut(guy).unwrap().state = GuyState::Jump; // hold still
        scene.scheduler.cancel(guy);

        run(&mut scene, &mut session, idle(), 0.1);
        assert!(scene.world.enemies.get(guy).unwrap().inhalable);

        // Face away: the zone flips to the other side, overlap ends
        let mut input = idle();
        input.left_held = true;
        run(&mut scene, &mut session, input, 0.1);
        assert!(!scene.world.enemies.get(guy).unwrap().inhalable);
    }

    #[test]
    fn inhaling_consumes_an_inhalable_enemy() {
        let (mut scene, mut session) = scene_with(vec![], vec![(2000.0, 780.0)]);
        let guy = scene.world.enemy_list()[0];
        scene.world.positions.insert(guy, Vec2::new(280.0, 780.0));
        scene.world.guys.get_mut(guy).unwrap().state = GuyState::Jump;
        scene.scheduler.cancel(guy);

        let mut press = idle();
        press.inhale_pressed = true;
        run(&mut scene, &mut session, press, DT);
        // Hold the inhale: the guy gets dragged in and swallowed
        run(&mut scene, &mut session, idle(), 0.5);

        let player = scene.world.player().unwrap();
        assert!(!scene.world.is_alive(guy), "enemy was consumed");
        assert_eq!(scene.world.players.get(player).unwrap().state, PuffState::Full);

        // Release: a star flies out and fullness clears
        let mut release = idle();
        release.inhale_released = true;
        run(&mut scene, &mut session, release, DT);
        assert_eq!(scene.world.players.get(player).unwrap().state, PuffState::Idle);
        assert_eq!(scene.world.tagged(Tag::Star).len(), 1);

        // The star dies against level geometry eventually (left wall or
        // flies off; here it despawns when it leaves through nothing, so
        // just check it moved)
        let star = scene.world.tagged(Tag::Star)[0];
        let x0 = scene.world.positions.get(star).unwrap().x;
        run(&mut scene, &mut session, idle(), 0.2);
        if scene.world.is_alive(star) {
            assert!(scene.world.positions.get(star).unwrap().x > x0);
        }
    }

    #[test]
    fn star_destroys_enemy_and_itself() {
        let (mut scene, mut session) = scene_with(vec![(600.0, 780.0)], vec![]);
        let flame = scene.world.enemy_list()[0];
        scene.scheduler.cancel(flame); // keep it parked on the ground
        let player = scene.world.player().unwrap();
        scene
            .world
            .players
            .get_mut(player)
            .unwrap()
            .state = PuffState::Full;

        let mut release = idle();
        release.inhale_released = true;
        run(&mut scene, &mut session, release, DT);
        run(&mut scene, &mut session, idle(), 1.0);

        assert!(!scene.world.is_alive(flame), "flame shot down");
        assert!(scene.world.tagged(Tag::Star).is_empty(), "star spent");
    }

    #[test]
    fn hits_drain_health_then_restart_the_level() {
        let (mut scene, mut session) = scene_with(vec![], vec![(2000.0, 780.0)]);
        let guy = scene.world.enemy_list()[0];
        scene.world.guys.get_mut(guy).unwrap().state = GuyState::Jump;
        scene.scheduler.cancel(guy);
        let player = scene.world.player().unwrap();
        scene.world.healths.get_mut(player).unwrap().current = 1;

        // Walk the guy onto the player
        scene.world.positions.insert(guy, Vec2::new(210.0, 780.0));
        run(&mut scene, &mut session, idle(), 0.1);
        assert_eq!(scene.world.healths.get(player).unwrap().current, 0);
        assert!(scene.world.is_alive(player), "0 hp player survives until the next hit");

        // Separate, then hit again: now it's lethal
        scene.world.positions.insert(guy, Vec2::new(600.0, 780.0));
        run(&mut scene, &mut session, idle(), 0.1);
        scene.world.positions.insert(guy, Vec2::new(210.0, 780.0));
        run(&mut scene, &mut session, idle(), 0.1);

        assert!(!scene.world.is_alive(player));
        assert_eq!(session.take_pending().as_deref(), Some("level-1"));
    }

    #[test]
    fn hit_flash_dips_and_restores_opacity() {
        let (mut scene, mut session) = scene_with(vec![], vec![(2000.0, 780.0)]);
        let guy = scene.world.enemy_list()[0];
        scene.world.guys.get_mut(guy).unwrap().state = GuyState::Jump;
        scene.scheduler.cancel(guy);
        let player = scene.world.player().unwrap();

        scene.world.positions.insert(guy, Vec2::new(210.0, 780.0));
        run(&mut scene, &mut session, idle(), 2.0 * DT);
        let mid = scene.world.sprites.get(player).unwrap().opacity;
        assert!(mid < 1.0, "flash in progress, opacity dipped: {mid}");

        run(&mut scene, &mut session, idle(), 0.2);
        assert_eq!(scene.world.sprites.get(player).unwrap().opacity, 1.0);
    }

    #[test]
    fn touching_the_exit_requests_the_next_scene() {
        let (mut scene, mut session) = scene_with(vec![], vec![]);
        let player = scene.world.player().unwrap();
        scene.world.positions.insert(player, Vec2::new(3900.0, 780.0));

        run(&mut scene, &mut session, idle(), 0.1);
        assert_eq!(session.take_pending().as_deref(), Some("level-2"));
    }

    #[test]
    fn falling_out_of_the_level_restarts_it() {
        let (mut scene, mut session) = scene_with(vec![], vec![]);
        let player = scene.world.player().unwrap();
        scene.world.positions.insert(player, Vec2::new(200.0, 2500.0));

        scene.update(&idle(), &mut session, DT, VIEW);
        assert_eq!(session.take_pending().as_deref(), Some("level-1"));
    }

    #[test]
    fn double_jump_allows_exactly_two_jumps() {
        let (mut scene, mut session) = scene_with(vec![], vec![]);
        let player = scene.world.player().unwrap();
        run(&mut scene, &mut session, idle(), 0.2); // settle on the floor

        let mut jump = idle();
        jump.jump_pressed = true;
        scene.update(&jump, &mut session, DT, VIEW);
        let v1 = scene.world.bodies.get(player).unwrap().velocity.y;
        assert!(v1 < 0.0);

        run(&mut scene, &mut session, idle(), 0.2);
        scene.update(&jump, &mut session, DT, VIEW);
        assert!(scene.world.bodies.get(player).unwrap().velocity.y < 0.0);

        // Third press mid-air: no charges left, keeps falling
        run(&mut scene, &mut session, idle(), 0.1);
        let before = scene.world.bodies.get(player).unwrap().velocity.y;
        scene.update(&jump, &mut session, DT, VIEW);
        let after = scene.world.bodies.get(player).unwrap().velocity.y;
        assert!(after >= before, "no jump impulse without charges");
    }

    #[test]
    fn camera_clamps_to_level_bounds() {
        let (mut scene, mut session) = scene_with(vec![], vec![]);
        let player = scene.world.player().unwrap();

        scene.world.positions.insert(player, Vec2::new(10.0, 780.0));
        scene.update(&idle(), &mut session, DT, VIEW);
        assert_eq!(scene.camera.x, VIEW.x / 2.0);

        scene.world.positions.insert(player, Vec2::new(3990.0, 780.0));
        scene.update(&idle(), &mut session, DT, VIEW);
        assert_eq!(scene.camera.x, 4000.0 - VIEW.x / 2.0);
    }
}
