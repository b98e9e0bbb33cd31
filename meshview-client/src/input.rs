//! Turns SDL input into viewer actions.

use glam::Vec2;
use meshview_core::selection::ShadingStyle;
use sdl2::{event::Event, keyboard::Keycode, mouse::MouseButton};

/// Radians of orbit per pixel of mouse drag.
const ORBIT_SPEED: f32 = 0.01;
/// Distance units per wheel step.
const ZOOM_SPEED: f32 = 0.1;

/// What an input event asks the viewer to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    Resize(u32, u32),
    /// Yaw and pitch deltas in radians.
    Orbit(Vec2),
    Zoom(f32),
    Style(ShadingStyle),
    CycleModel(isize),
    CycleTexture,
    CycleLight,
}

const KEY_BINDINGS: [(Keycode, Action); 8] = [
    (Keycode::Escape, Action::Quit),
    (Keycode::Num1, Action::Style(ShadingStyle::Unlit)),
    (Keycode::Num2, Action::Style(ShadingStyle::Gouraud)),
    (Keycode::Num3, Action::Style(ShadingStyle::Phong)),
    (Keycode::M, Action::CycleModel(1)),
    (Keycode::N, Action::CycleModel(-1)),
    (Keycode::T, Action::CycleTexture),
    (Keycode::L, Action::CycleLight),
];

/// The state of the mouse buttons the viewer cares about.
#[derive(Debug, Default)]
pub struct MouseState {
    pub dragging: bool,
}

impl MouseState {
    /// Maps one event to an action, tracking the drag button along the way.
    pub fn handle(&mut self, event: &Event) -> Option<Action> {
        match *event {
            Event::Quit { .. } => Some(Action::Quit),
            Event::Window {
                win_event: sdl2::event::WindowEvent::Resized(width, height),
                ..
            } => Some(Action::Resize(width.max(0) as u32, height.max(0) as u32)),
            Event::MouseButtonDown {
                mouse_btn: MouseButton::Left,
                ..
            } => {
                self.dragging = true;
                None
            }
            Event::MouseButtonUp {
                mouse_btn: MouseButton::Left,
                ..
            } => {
                self.dragging = false;
                None
            }
            Event::MouseMotion { xrel, yrel, .. } if self.dragging => Some(Action::Orbit(
                Vec2::new(-xrel as f32, yrel as f32) * ORBIT_SPEED,
            )),
            Event::MouseWheel { y, .. } if y != 0 => Some(Action::Zoom(y as f32 * ZOOM_SPEED)),
            Event::KeyDown {
                keycode: Some(keycode),
                repeat: false,
                ..
            } => key_action(keycode),
            _ => None,
        }
    }
}

fn key_action(keycode: Keycode) -> Option<Action> {
    KEY_BINDINGS
        .iter()
        .find(|(key, _)| *key == keycode)
        .map(|(_, action)| *action)
}
