//! Drawing
//!
//! Thin presentation over macroquad: a follow camera, shape-based
//! sprites for each `Look`, and a small HUD. Nothing here feeds back
//! into gameplay state.

use macroquad::prelude::*;

use crate::game::components::{Look, PuffPose, Tag};
use crate::scene::{LevelScene, Scene};

/// World-to-screen scale; < 1 zooms out so the player sees more level.
pub const CAMERA_ZOOM: f32 = 0.6;

pub fn draw(scene: &Scene) {
    match scene {
        Scene::Menu(menu) => menu.draw(),
        Scene::Level(level) => draw_level(level),
    }
}

fn draw_level(scene: &LevelScene) {
    let (r, g, b) = scene.level.background;
    clear_background(Color::from_rgba(r, g, b, 255));

    let camera = Camera2D {
        target: scene.camera,
        zoom: vec2(
            2.0 * CAMERA_ZOOM / screen_width(),
            2.0 * CAMERA_ZOOM / screen_height(),
        ),
        ..Default::default()
    };
    set_camera(&camera);

    for e in scene.world.tagged(Tag::Platform) {
        if let (Some(pos), Some(col)) = (scene.world.positions.get(e), scene.world.colliders.get(e))
        {
            let x = pos.x - col.size.x / 2.0;
            let y = pos.y - col.size.y / 2.0;
            draw_rectangle(x, y, col.size.x, col.size.y, Color::from_rgba(94, 72, 56, 255));
            draw_rectangle(x, y, col.size.x, 8.0, Color::from_rgba(122, 170, 92, 255));
        }
    }

    for e in scene.world.tagged(Tag::Exit) {
        if let (Some(pos), Some(col)) = (scene.world.positions.get(e), scene.world.colliders.get(e))
        {
            let x = pos.x - col.size.x / 2.0;
            let y = pos.y - col.size.y / 2.0;
            draw_rectangle(x, y, col.size.x, col.size.y, Color::from_rgba(70, 54, 42, 255));
            draw_circle(pos.x, pos.y, 6.0, GOLD);
        }
    }

    for e in scene.world.iter() {
        if let (Some(pos), Some(sprite)) = (scene.world.positions.get(e), scene.world.sprites.get(e))
        {
            draw_look(*pos, sprite.look, sprite.flip_x, sprite.opacity);
        }
    }

    set_default_camera();
    draw_hud(scene);
}

fn with_alpha(color: Color, alpha: f32) -> Color {
    Color::new(color.r, color.g, color.b, color.a * alpha)
}

fn draw_look(pos: Vec2, look: Look, flip_x: bool, opacity: f32) {
    if opacity <= 0.0 {
        return;
    }
    let dir = if flip_x { -1.0 } else { 1.0 };
    match look {
        Look::Puff(pose) => {
            let body = with_alpha(Color::from_rgba(245, 150, 170, 255), opacity);
            draw_circle(pos.x, pos.y, 20.0, body);
            // Feet
            let feet = with_alpha(Color::from_rgba(200, 60, 90, 255), opacity);
            draw_circle(pos.x - 10.0, pos.y + 16.0, 7.0, feet);
            draw_circle(pos.x + 10.0, pos.y + 16.0, 7.0, feet);
            // Eyes look in the facing direction
            let eye = with_alpha(BLACK, opacity);
            draw_circle(pos.x + dir * 6.0, pos.y - 6.0, 2.5, eye);
            draw_circle(pos.x + dir * 12.0, pos.y - 6.0, 2.5, eye);
            match pose {
                PuffPose::Idle => {
                    draw_circle(pos.x + dir * 9.0, pos.y + 4.0, 2.0, eye);
                }
                PuffPose::Inhaling => {
                    // Open mouth on the facing side
                    draw_circle(pos.x + dir * 12.0, pos.y + 4.0, 6.0, eye);
                }
                PuffPose::Full => {
                    // Puffed out
                    draw_circle_lines(pos.x, pos.y, 24.0, 3.0, feet);
                }
            }
        }
        Look::Flame => {
            let outer = with_alpha(Color::from_rgba(240, 120, 40, 255), opacity);
            let inner = with_alpha(Color::from_rgba(250, 210, 90, 255), opacity);
            draw_triangle(
                vec2(pos.x, pos.y - 22.0),
                vec2(pos.x - 14.0, pos.y + 14.0),
                vec2(pos.x + 14.0, pos.y + 14.0),
                outer,
            );
            draw_circle(pos.x, pos.y + 8.0, 9.0, inner);
        }
        Look::Guy => {
            let coat = with_alpha(Color::from_rgba(90, 120, 200, 255), opacity);
            let skin = with_alpha(Color::from_rgba(240, 200, 160, 255), opacity);
            draw_rectangle(pos.x - 14.0, pos.y - 8.0, 28.0, 30.0, coat);
            draw_circle(pos.x, pos.y - 12.0, 10.0, skin);
            let eye = with_alpha(BLACK, opacity);
            draw_circle(pos.x + dir * 4.0, pos.y - 14.0, 2.0, eye);
        }
        Look::Star => {
            draw_poly(pos.x, pos.y, 5, 14.0, if flip_x { 18.0 } else { 0.0 }, with_alpha(GOLD, opacity));
            draw_poly_lines(pos.x, pos.y, 5, 14.0, if flip_x { 18.0 } else { 0.0 }, 2.0, with_alpha(ORANGE, opacity));
        }
        Look::InhalePlume => {
            let swirl = with_alpha(Color::from_rgba(255, 255, 255, 160), opacity);
            draw_circle(pos.x, pos.y, 18.0, swirl);
            draw_circle(pos.x + dir * 0.0 - 12.0, pos.y - 6.0, 10.0, swirl);
            draw_circle(pos.x + 12.0, pos.y + 6.0, 10.0, swirl);
        }
    }
}

fn draw_hud(scene: &LevelScene) {
    let health = scene
        .world
        .player()
        .and_then(|p| scene.world.healths.get(p))
        .map(|h| h.current)
        .unwrap_or(0);
    for i in 0..crate::player::STARTING_HEALTH {
        let filled = i < health;
        let x = 24.0 + i as f32 * 34.0;
        let color = if filled {
            Color::from_rgba(230, 60, 90, 255)
        } else {
            Color::from_rgba(90, 90, 90, 120)
        };
        draw_circle(x, 30.0, 12.0, color);
    }
    draw_text(&scene.name, 24.0, 70.0, 24.0, DARKGRAY);
}
