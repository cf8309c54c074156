//! Puffball: a small inhale-and-spit platformer
//!
//! Gameplay is thin wiring over a handful of foundation pieces: a
//! component world, an AABB collision step, and a data-driven timer
//! scheduler. macroquad supplies the window, input, timing, and
//! drawing. Scenes are named and validated through a session object
//! that the frame loop threads everywhere by reference.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod controls;
mod enemy;
mod game;
mod level;
mod player;
mod render;
mod scene;
mod session;
mod ui;

use macroquad::prelude::*;

use controls::InputSnapshot;
use session::{GameSession, FIRST_SCENE, SCENES};

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Puffball v{}", VERSION),
        window_width: 1280,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging first (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    // Embedded level data is a build artifact; fail loudly at startup
    // rather than mid-transition.
    for name in SCENES {
        if level::is_level_scene(name) {
            if let Err(e) = level::load(name) {
                error!("{}", e);
                return;
            }
        }
    }

    let mut session = GameSession::new();
    let mut scene = scene::enter(FIRST_SCENE, &mut session);

    loop {
        let input = InputSnapshot::poll();
        // Clamp pathological frame spikes (window drags, tab switches)
        // so physics never tunnels.
        let dt = get_frame_time().min(1.0 / 20.0);
        let screen = vec2(screen_width(), screen_height());

        match &mut scene {
            scene::Scene::Menu(menu) => menu.update(&input, &mut session, screen),
            scene::Scene::Level(level) => {
                level.update(&input, &mut session, dt, screen / render::CAMERA_ZOOM)
            }
        }

        render::draw(&scene);

        if let Some(next) = session.take_pending() {
            scene = scene::enter(&next, &mut session);
        }

        next_frame().await;
    }
}
