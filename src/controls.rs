//! Input snapshot
//!
//! Raw keyboard/mouse state is polled from macroquad once per frame into
//! a plain struct with held/pressed/released edges. Gameplay systems
//! only ever see the snapshot, which keeps them runnable in tests
//! without a window.

use macroquad::prelude::*;

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    /// Direction keys, level-triggered.
    pub left_held: bool,
    pub right_held: bool,
    /// Jump is edge-triggered: holding the key does not bounce.
    pub jump_pressed: bool,
    /// Inhale cares about both edges of its key.
    pub inhale_pressed: bool,
    pub inhale_released: bool,
    /// Menu navigation.
    pub confirm_pressed: bool,
    pub back_pressed: bool,
    /// Left mouse button went down this frame, in screen coordinates.
    pub click: Option<Vec2>,
}

impl InputSnapshot {
    pub fn poll() -> Self {
        Self {
            left_held: is_key_down(KeyCode::Left) || is_key_down(KeyCode::A),
            right_held: is_key_down(KeyCode::Right) || is_key_down(KeyCode::D),
            jump_pressed: is_key_pressed(KeyCode::X) || is_key_pressed(KeyCode::Space),
            inhale_pressed: is_key_pressed(KeyCode::Z),
            inhale_released: is_key_released(KeyCode::Z),
            confirm_pressed: is_key_pressed(KeyCode::Enter),
            back_pressed: is_key_pressed(KeyCode::Escape),
            click: is_mouse_button_pressed(MouseButton::Left)
                .then(|| Vec2::from(mouse_position())),
        }
    }
}
