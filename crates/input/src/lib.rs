//! Input sampling: logical controls and pointer drag state.
//!
//! # Invariants
//! - Event callbacks are the only writers; the frame update only reads.
//! - Unrecognised keys never change state.

pub mod control;

pub use control::Control;
use glam::Vec2;

/// Held/released state for every [`Control`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    held: [bool; Control::ALL.len()],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Returns whether the key mapped to a control.
    pub fn key_down(&mut self, key: &str) -> bool {
        self.apply_key(key, true)
    }

    /// Record a key release. Returns whether the key mapped to a control.
    pub fn key_up(&mut self, key: &str) -> bool {
        self.apply_key(key, false)
    }

    fn apply_key(&mut self, key: &str, pressed: bool) -> bool {
        match Control::from_key_name(key) {
            Some(control) => {
                self.set(control, pressed);
                true
            }
            None => {
                tracing::trace!(key, "ignored unrecognised key");
                false
            }
        }
    }

    pub fn set(&mut self, control: Control, pressed: bool) {
        self.held[control.index()] = pressed;
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.held[control.index()]
    }

    /// Release every control. The desktop shell calls this on focus loss.
    pub fn clear(&mut self) {
        self.held = Default::default();
    }

    /// Directional intent: `x` is +1 right / -1 left, `y` is +1 forward /
    /// -1 back. With both of a pair held, back beats forward and right beats
    /// left.
    pub fn movement_axes(&self) -> Vec2 {
        let axis = |winner: Control, loser: Control, sign: f32| -> f32 {
            if self.is_held(winner) {
                sign
            } else if self.is_held(loser) {
                -sign
            } else {
                0.0
            }
        };
        Vec2::new(
            axis(Control::Right, Control::Left, 1.0),
            axis(Control::Back, Control::Forward, -1.0),
        )
    }
}

/// Pointer drag tracking for the orbit camera.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerDrag {
    dragging: bool,
}

impl PointerDrag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self) {
        self.dragging = true;
    }

    pub fn release(&mut self) {
        self.dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Motion only counts while the button is held.
    pub fn motion(&self, dx: f32, dy: f32) -> Option<Vec2> {
        self.dragging.then_some(Vec2::new(dx, dy))
    }
}

pub fn crate_info() -> &'static str {
    "pursuit-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_released() {
        let input = InputState::new();
        for c in Control::ALL {
            assert!(!input.is_held(c));
        }
        assert_eq!(input.movement_axes(), Vec2::ZERO);
    }

    #[test]
    fn key_down_and_up_toggle_control() {
        let mut input = InputState::new();
        assert!(input.key_down("W"));
        assert!(input.is_held(Control::Forward));
        assert!(input.key_up("w"));
        assert!(!input.is_held(Control::Forward));
    }

    #[test]
    fn unrecognised_key_is_ignored() {
        let mut input = InputState::new();
        input.key_down("w");
        let before = input;
        assert!(!input.key_down("x"));
        assert!(!input.key_up("Escape"));
        assert_eq!(input, before);
    }

    #[test]
    fn movement_axes_combine_held_controls() {
        let mut input = InputState::new();
        input.set(Control::Forward, true);
        input.set(Control::Right, true);
        assert_eq!(input.movement_axes(), Vec2::new(1.0, 1.0));

        input.set(Control::Left, true);
        input.set(Control::Right, false);
        assert_eq!(input.movement_axes(), Vec2::new(-1.0, 1.0));
    }

    #[test]
    fn opposite_controls_resolve_to_back_and_right() {
        let mut input = InputState::new();
        for key in ["w", "s", "a", "d"] {
            input.key_down(key);
        }
        assert_eq!(input.movement_axes(), Vec2::new(1.0, -1.0));

        input.key_up("s");
        input.key_up("d");
        assert_eq!(input.movement_axes(), Vec2::new(-1.0, 1.0));
    }

    #[test]
    fn clear_releases_everything() {
        let mut input = InputState::new();
        input.key_down("space");
        input.key_down("a");
        input.clear();
        assert_eq!(input, InputState::new());
    }

    #[test]
    fn pointer_motion_requires_drag() {
        let mut drag = PointerDrag::new();
        assert_eq!(drag.motion(3.0, 4.0), None);
        drag.press();
        assert_eq!(drag.motion(3.0, 4.0), Some(Vec2::new(3.0, 4.0)));
        drag.release();
        assert!(!drag.is_dragging());
        assert_eq!(drag.motion(1.0, 1.0), None);
    }
}
