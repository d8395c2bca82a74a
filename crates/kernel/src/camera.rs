use glam::{Vec2, Vec3};
use pursuit_common::CameraConfig;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

/// Where the camera is and what it looks at. Recomputed every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraView {
    pub eye: Vec3,
    pub target: Vec3,
}

/// Camera held at a fixed offset from the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowRig {
    pub offset: Vec3,
}

/// Camera on a sphere around the player, steered by pointer drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitRig {
    pub yaw: f32,
    pub pitch: f32,
    pub radius: f32,
    pub sensitivity: f32,
}

impl OrbitRig {
    /// Apply a pointer delta in pixels. Pitch stays within ±π/2.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Unit offset from target to eye.
    fn direction(&self) -> Vec3 {
        Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        )
    }

    /// Horizontal forward, pointing from the camera towards the player.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y)
    }
}

/// The camera rig selected by the game variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraRig {
    Follow(FollowRig),
    Orbit(OrbitRig),
}

impl CameraRig {
    pub fn from_config(config: &CameraConfig) -> Self {
        match *config {
            CameraConfig::Follow { offset } => CameraRig::Follow(FollowRig { offset }),
            CameraConfig::Orbit {
                radius,
                sensitivity,
                yaw,
                pitch,
            } => CameraRig::Orbit(OrbitRig {
                yaw,
                pitch: pitch.clamp(-FRAC_PI_2, FRAC_PI_2),
                radius,
                sensitivity,
            }),
        }
    }

    /// Camera placement aimed at `target`.
    pub fn view_of(&self, target: Vec3) -> CameraView {
        let eye = match self {
            CameraRig::Follow(rig) => target + rig.offset,
            CameraRig::Orbit(rig) => target + rig.direction() * rig.radius,
        };
        CameraView { eye, target }
    }

    /// Forward and right movement directions on the ground plane.
    ///
    /// The follow rig uses world axes (forward is -Z); the orbit rig derives
    /// both from its yaw.
    pub fn planar_basis(&self) -> (Vec3, Vec3) {
        match self {
            CameraRig::Follow(_) => (Vec3::NEG_Z, Vec3::X),
            CameraRig::Orbit(rig) => (rig.forward(), rig.right()),
        }
    }

    /// Rotate an orbit rig by a pointer delta. Follow rigs ignore it.
    pub fn orbit(&mut self, delta: Vec2) -> bool {
        match self {
            CameraRig::Orbit(rig) => {
                rig.rotate(delta.x, delta.y);
                true
            }
            CameraRig::Follow(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pursuit_common::GameConfig;

    fn orbit_rig() -> CameraRig {
        CameraRig::from_config(&GameConfig::orbit().camera)
    }

    #[test]
    fn follow_view_uses_fixed_offset() {
        let rig = CameraRig::from_config(&GameConfig::follow().camera);
        let view = rig.view_of(Vec3::new(1.0, 0.5, -2.0));
        assert_eq!(view.eye, Vec3::new(1.0, 2.5, 3.0));
        assert_eq!(view.target, Vec3::new(1.0, 0.5, -2.0));
    }

    #[test]
    fn orbit_view_sits_on_sphere() {
        let rig = orbit_rig();
        let target = Vec3::new(3.0, 0.5, 3.0);
        let view = rig.view_of(target);
        assert!((view.eye.distance(target) - 5.0).abs() < 1e-5);
        assert!(view.eye.y > target.y);
    }

    #[test]
    fn follow_rig_ignores_pointer() {
        let mut rig = CameraRig::from_config(&GameConfig::follow().camera);
        let before = rig;
        assert!(!rig.orbit(Vec2::new(100.0, 100.0)));
        assert_eq!(rig, before);
    }

    #[test]
    fn orbit_pitch_is_clamped() {
        let mut rig = orbit_rig();
        rig.orbit(Vec2::new(0.0, 10_000.0));
        let CameraRig::Orbit(o) = rig else {
            panic!("expected orbit rig")
        };
        assert_eq!(o.pitch, FRAC_PI_2);

        rig.orbit(Vec2::new(0.0, -100_000.0));
        let CameraRig::Orbit(o) = rig else {
            panic!("expected orbit rig")
        };
        assert_eq!(o.pitch, -FRAC_PI_2);
    }

    #[test]
    fn orbit_yaw_follows_horizontal_drag() {
        let mut rig = orbit_rig();
        rig.orbit(Vec2::new(100.0, 0.0));
        let CameraRig::Orbit(o) = rig else {
            panic!("expected orbit rig")
        };
        assert!((o.yaw - (-0.5)).abs() < 1e-6);
    }

    #[test]
    fn orbit_basis_matches_world_axes_at_zero_yaw() {
        let rig = orbit_rig();
        let (fwd, right) = rig.planar_basis();
        assert!(fwd.abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!(right.abs_diff_eq(Vec3::X, 1e-6));
    }

    #[test]
    fn orbit_basis_turns_with_yaw() {
        let mut rig = orbit_rig();
        // A quarter turn: camera now sits on +X, looking towards -X.
        if let CameraRig::Orbit(o) = &mut rig {
            o.yaw = FRAC_PI_2;
        }
        let (fwd, right) = rig.planar_basis();
        assert!(fwd.abs_diff_eq(Vec3::NEG_X, 1e-6));
        assert!(right.abs_diff_eq(Vec3::NEG_Z, 1e-6));
        let view = rig.view_of(Vec3::ZERO);
        assert!(view.eye.x > 0.0);
    }
}
