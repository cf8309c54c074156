//! Menu screens
//!
//! Start, controls, and end screens: a title, a column of buttons, and
//! the key listing. Buttons respond to mouse clicks; Enter triggers the
//! primary button and Escape backs out to the start screen.

use macroquad::prelude::*;

use crate::controls::InputSnapshot;
use crate::session::GameSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    Start,
    Controls,
    End,
}

struct Button {
    label: &'static str,
    target: &'static str,
}

pub struct MenuScreen {
    kind: MenuKind,
    buttons: Vec<Button>,
}

const BUTTON_SIZE: Vec2 = Vec2::new(320.0, 64.0);
const BUTTON_GAP: f32 = 24.0;

impl MenuScreen {
    pub fn for_scene(name: &str) -> Self {
        let kind = match name {
            "controls" => MenuKind::Controls,
            "end" => MenuKind::End,
            _ => MenuKind::Start,
        };
        let buttons = match kind {
            MenuKind::Start => vec![
                Button {
                    label: "Play",
                    target: "level-1",
                },
                Button {
                    label: "Controls",
                    target: "controls",
                },
            ],
            MenuKind::Controls => vec![Button {
                label: "Back",
                target: "start",
            }],
            MenuKind::End => vec![
                Button {
                    label: "Play again",
                    target: "level-1",
                },
                Button {
                    label: "Menu",
                    target: "start",
                },
            ],
        };
        Self { kind, buttons }
    }

    fn button_rect(&self, index: usize, screen: Vec2) -> Rect {
        let x = (screen.x - BUTTON_SIZE.x) / 2.0;
        let y = screen.y * 0.5 + index as f32 * (BUTTON_SIZE.y + BUTTON_GAP);
        Rect::new(x, y, BUTTON_SIZE.x, BUTTON_SIZE.y)
    }

    /// Route clicks and keys to scene transition requests.
    pub fn update(&self, input: &InputSnapshot, session: &mut GameSession, screen: Vec2) {
        if let Some(click) = input.click {
            for (i, button) in self.buttons.iter().enumerate() {
                if self.button_rect(i, screen).contains(click) {
                    session.request_scene(button.target);
                    return;
                }
            }
        }
        if input.confirm_pressed {
            if let Some(primary) = self.buttons.first() {
                session.request_scene(primary.target);
            }
        }
        if input.back_pressed && self.kind != MenuKind::Start {
            session.request_scene("start");
        }
    }

    pub fn draw(&self) {
        clear_background(Color::from_rgba(36, 32, 52, 255));
        let screen = vec2(screen_width(), screen_height());

        let (title, subtitle) = match self.kind {
            MenuKind::Start => ("PUFFBALL", "inhale everything"),
            MenuKind::Controls => ("CONTROLS", ""),
            MenuKind::End => ("THE END", "thanks for playing"),
        };
        draw_centered_text(title, screen.x / 2.0, screen.y * 0.28, 96.0, WHITE);
        if !subtitle.is_empty() {
            draw_centered_text(subtitle, screen.x / 2.0, screen.y * 0.36, 32.0, LIGHTGRAY);
        }

        if self.kind == MenuKind::Controls {
            let lines = [
                "Left / Right or A / D  -  move",
                "X or Space  -  jump (twice!)",
                "Z hold  -  inhale, release to spit",
                "Enter  -  confirm   Esc  -  back",
            ];
            for (i, line) in lines.iter().enumerate() {
                draw_centered_text(
                    line,
                    screen.x / 2.0,
                    screen.y * 0.42 + i as f32 * 36.0,
                    28.0,
                    LIGHTGRAY,
                );
            }
        }

        let mouse = Vec2::from(mouse_position());
        for (i, button) in self.buttons.iter().enumerate() {
            let rect = self.button_rect(i, screen);
            let hovered = rect.contains(mouse);
            let fill = if hovered {
                Color::from_rgba(245, 150, 170, 255)
            } else {
                Color::from_rgba(70, 62, 96, 255)
            };
            draw_rectangle(rect.x, rect.y, rect.w, rect.h, fill);
            draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 3.0, WHITE);
            draw_centered_text(
                button.label,
                rect.x + rect.w / 2.0,
                rect.y + rect.h / 2.0 + 10.0,
                36.0,
                WHITE,
            );
        }
    }
}

fn draw_centered_text(text: &str, cx: f32, baseline: f32, size: f32, color: Color) {
    let dims = measure_text(text, None, size as u16, 1.0);
    draw_text(text, cx - dims.width / 2.0, baseline, size, color);
}
