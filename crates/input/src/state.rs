use crate::Action;
use glam::Vec2;
use std::collections::HashSet;

/// Logical keys the game reacts to. The desktop app binds W/A/S/D and
/// left shift to these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Forward,
    Left,
    Back,
    Right,
    Sprint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Primary,
    Secondary,
}

/// Everything the kernel needs from input for a single frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    pub forward: bool,
    pub left: bool,
    pub back: bool,
    pub right: bool,
    pub sprint: bool,
    /// Accumulated mouse motion since the previous frame, in pixels.
    pub mouse_delta: Vec2,
    /// Discrete actions in the order they are applied.
    pub actions: Vec<Action>,
}

impl FrameInput {
    /// No keys, no motion, no actions.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn with_keys(mut self, keys: &[Key]) -> Self {
        for key in keys {
            match key {
                Key::Forward => self.forward = true,
                Key::Left => self.left = true,
                Key::Back => self.back = true,
                Key::Right => self.right = true,
                Key::Sprint => self.sprint = true,
            }
        }
        self
    }

    pub fn with_mouse_delta(mut self, dx: f32, dy: f32) -> Self {
        self.mouse_delta = Vec2::new(dx, dy);
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn is_moving(&self) -> bool {
        self.forward || self.left || self.back || self.right
    }
}

/// Raw input accumulated from window/device events between frames.
#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    mouse_delta: Vec2,
    scroll: f32,
    primary_clicked: bool,
    secondary_clicked: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_changed(&mut self, key: Key, pressed: bool) {
        if pressed {
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn mouse_moved(&mut self, dx: f32, dy: f32) {
        self.mouse_delta += Vec2::new(dx, dy);
    }

    /// Record a button edge. Only presses generate actions.
    pub fn button_changed(&mut self, button: MouseButton, pressed: bool) {
        if !pressed {
            return;
        }
        match button {
            MouseButton::Primary => self.primary_clicked = true,
            MouseButton::Secondary => self.secondary_clicked = true,
        }
    }

    /// Wheel motion in lines; positive is away from the user (scroll up).
    pub fn scrolled(&mut self, lines: f32) {
        self.scroll += lines;
    }

    /// Release every held key, e.g. when the window loses focus.
    pub fn clear_held(&mut self) {
        self.held.clear();
    }

    /// Fold the accumulated state into one frame and reset per-frame fields.
    /// A frame selects at most one slot step regardless of wheel distance.
    pub fn take_frame(&mut self) -> FrameInput {
        let mut actions = Vec::new();
        if std::mem::take(&mut self.primary_clicked) {
            actions.push(Action::Collect);
        }
        if std::mem::take(&mut self.secondary_clicked) {
            actions.push(Action::UseSelected);
        }
        let scroll = std::mem::take(&mut self.scroll);
        if scroll < 0.0 {
            actions.push(Action::SelectNext);
        } else if scroll > 0.0 {
            actions.push(Action::SelectPrevious);
        }

        let frame = FrameInput {
            forward: self.is_held(Key::Forward),
            left: self.is_held(Key::Left),
            back: self.is_held(Key::Back),
            right: self.is_held(Key::Right),
            sprint: self.is_held(Key::Sprint),
            mouse_delta: std::mem::take(&mut self.mouse_delta),
            actions,
        };
        if !frame.actions.is_empty() {
            tracing::trace!(actions = ?frame.actions, "frame actions");
        }
        frame
    }
}
