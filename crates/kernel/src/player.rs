use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// The player's body: transform, vertical motion and health.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Vec3,
    pub vertical_velocity: f32,
    pub is_jumping: bool,
    /// Starts at the configured maximum; may dip below zero on the fatal hit.
    pub health: i32,
}

impl PlayerState {
    pub fn spawn(position: Vec3, health: i32) -> Self {
        Self {
            position,
            vertical_velocity: 0.0,
            is_jumping: false,
            health,
        }
    }

    /// Shift along the ground plane. Vertical motion belongs to [`Self::integrate_vertical`].
    pub fn translate(&mut self, delta: Vec3) {
        self.position.x += delta.x;
        self.position.z += delta.z;
    }

    /// Launch from the ground. Returns false (and does nothing) while airborne.
    pub fn try_jump(&mut self, launch_velocity: f32) -> bool {
        if self.is_jumping {
            return false;
        }
        self.vertical_velocity = launch_velocity;
        self.is_jumping = true;
        true
    }

    /// One explicit Euler step of the jump arc. Returns true on the frame the
    /// player lands.
    pub fn integrate_vertical(&mut self, gravity: f32, ground_height: f32) -> bool {
        if !self.is_jumping {
            return false;
        }
        self.position.y += self.vertical_velocity;
        self.vertical_velocity -= gravity;
        if self.position.y <= ground_height {
            self.position.y = ground_height;
            self.vertical_velocity = 0.0;
            self.is_jumping = false;
            return true;
        }
        false
    }
}

/// Planar displacement for one frame.
///
/// `axes.x` scales `right`, `axes.y` scales `forward`; each held axis moves
/// `speed` units, so diagonals are not normalised.
pub fn planar_delta(axes: Vec2, forward: Vec3, right: Vec3, speed: f32) -> Vec3 {
    let delta = (right * axes.x + forward * axes.y) * speed;
    Vec3::new(delta.x, 0.0, delta.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUND: f32 = 0.5;
    const GRAVITY: f32 = 0.02;

    fn grounded() -> PlayerState {
        PlayerState::spawn(Vec3::new(0.0, GROUND, 0.0), 100)
    }

    #[test]
    fn jump_from_ground_sets_launch_velocity() {
        let mut p = grounded();
        assert!(p.try_jump(0.2));
        assert!(p.is_jumping);
        assert_eq!(p.vertical_velocity, 0.2);
    }

    #[test]
    fn cannot_jump_while_airborne() {
        let mut p = grounded();
        p.try_jump(0.2);
        p.integrate_vertical(GRAVITY, GROUND);
        let v = p.vertical_velocity;
        assert!(!p.try_jump(0.2));
        assert_eq!(p.vertical_velocity, v);
    }

    #[test]
    fn jump_arc_never_ends_below_ground() {
        let mut p = grounded();
        p.try_jump(0.2);
        let mut peak = GROUND;
        let mut frames = 0;
        while p.is_jumping {
            p.integrate_vertical(GRAVITY, GROUND);
            assert!(p.position.y >= GROUND);
            peak = peak.max(p.position.y);
            frames += 1;
            assert!(frames < 100, "jump never landed");
        }
        assert_eq!(p.position.y, GROUND);
        assert_eq!(p.vertical_velocity, 0.0);
        assert!(peak > 1.5);
    }

    #[test]
    fn landing_is_reported_once() {
        let mut p = grounded();
        p.try_jump(0.2);
        let mut landings = 0;
        for _ in 0..50 {
            if p.integrate_vertical(GRAVITY, GROUND) {
                landings += 1;
            }
        }
        assert_eq!(landings, 1);
    }

    #[test]
    fn grounded_player_does_not_integrate() {
        let mut p = grounded();
        assert!(!p.integrate_vertical(GRAVITY, GROUND));
        assert_eq!(p.position.y, GROUND);
    }

    #[test]
    fn translate_keeps_height() {
        let mut p = grounded();
        p.translate(Vec3::new(0.1, 3.0, -0.1));
        assert_eq!(p.position, Vec3::new(0.1, GROUND, -0.1));
    }

    #[test]
    fn planar_delta_world_axes() {
        let d = planar_delta(Vec2::new(1.0, 1.0), Vec3::NEG_Z, Vec3::X, 0.1);
        assert!(d.abs_diff_eq(Vec3::new(0.1, 0.0, -0.1), 1e-6));
        let d = planar_delta(Vec2::new(-1.0, -1.0), Vec3::NEG_Z, Vec3::X, 0.1);
        assert!(d.abs_diff_eq(Vec3::new(-0.1, 0.0, 0.1), 1e-6));
    }

    #[test]
    fn planar_delta_idle_is_zero() {
        assert_eq!(planar_delta(Vec2::ZERO, Vec3::NEG_Z, Vec3::X, 0.1), Vec3::ZERO);
    }
}
