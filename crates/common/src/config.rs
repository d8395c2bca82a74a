use crate::types::Variant;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Errors from loading or validating a [`GameConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Camera rig selection and its tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rig", rename_all = "snake_case")]
pub enum CameraConfig {
    /// Camera sits at `player + offset` and looks at the player.
    Follow { offset: Vec3 },
    /// Camera sits on a sphere of `radius` around the player.
    /// Angles are radians; `sensitivity` is radians per pointer pixel.
    Orbit {
        radius: f32,
        sensitivity: f32,
        yaw: f32,
        pitch: f32,
    },
}

/// Every gameplay constant. Distances are world units, speeds are units per
/// frame, and the frame rate fixes the simulation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub move_speed: f32,
    pub jump_velocity: f32,
    pub gravity: f32,
    pub ground_height: f32,
    pub max_health: i32,
    pub damage_amount: i32,
    pub damage_cooldown_ms: u64,
    pub enemy_speed: f32,
    pub contact_radius: f32,
    pub player_spawn: Vec3,
    pub enemy_spawn: Vec3,
    /// Fixed simulation frames per second.
    pub frame_rate: u32,
    /// Upper bound on frames run by a single driver tick.
    pub max_frames_per_tick: u32,
    pub camera: CameraConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::follow()
    }
}

impl GameConfig {
    /// Follow-camera preset.
    pub fn follow() -> Self {
        Self {
            move_speed: 0.1,
            jump_velocity: 0.2,
            gravity: 0.02,
            ground_height: 0.5,
            max_health: 100,
            damage_amount: 10,
            damage_cooldown_ms: 1000,
            enemy_speed: 0.02,
            contact_radius: 1.5,
            player_spawn: Vec3::new(0.0, 0.5, 0.0),
            enemy_spawn: Vec3::new(5.0, 0.5, 5.0),
            frame_rate: 60,
            max_frames_per_tick: 5,
            camera: CameraConfig::Follow {
                offset: Vec3::new(0.0, 2.0, 5.0),
            },
        }
    }

    /// Orbit-camera preset: faster enemy, pointer-driven camera.
    pub fn orbit() -> Self {
        Self {
            enemy_speed: 0.07,
            camera: CameraConfig::Orbit {
                radius: 5.0,
                sensitivity: 0.005,
                yaw: 0.0,
                pitch: 0.4,
            },
            ..Self::follow()
        }
    }

    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Follow => Self::follow(),
            Variant::Orbit => Self::orbit(),
        }
    }

    /// The variant implied by the camera rig.
    pub fn variant(&self) -> Variant {
        match self.camera {
            CameraConfig::Follow { .. } => Variant::Follow,
            CameraConfig::Orbit { .. } => Variant::Orbit,
        }
    }

    /// Duration of one simulation frame.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate.max(1) as f64)
    }

    pub fn damage_cooldown(&self) -> Duration {
        Duration::from_millis(self.damage_cooldown_ms)
    }

    /// Parse a YAML document. Missing fields fall back to the follow preset.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&source)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values that would stall or destabilise the simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("move_speed", self.move_speed),
            ("jump_velocity", self.jump_velocity),
            ("gravity", self.gravity),
            ("ground_height", self.ground_height),
            ("enemy_speed", self.enemy_speed),
            ("contact_radius", self.contact_radius),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("{name} must be finite")));
            }
        }
        if self.move_speed < 0.0 || self.enemy_speed < 0.0 {
            return Err(ConfigError::Invalid("speeds must be non-negative".into()));
        }
        if self.gravity <= 0.0 {
            return Err(ConfigError::Invalid("gravity must be positive".into()));
        }
        if self.jump_velocity <= 0.0 {
            return Err(ConfigError::Invalid("jump_velocity must be positive".into()));
        }
        if self.max_health <= 0 || self.damage_amount <= 0 {
            return Err(ConfigError::Invalid(
                "max_health and damage_amount must be positive".into(),
            ));
        }
        if self.contact_radius <= 0.0 {
            return Err(ConfigError::Invalid("contact_radius must be positive".into()));
        }
        if self.frame_rate == 0 || self.max_frames_per_tick == 0 {
            return Err(ConfigError::Invalid(
                "frame_rate and max_frames_per_tick must be non-zero".into(),
            ));
        }
        let vectors = [
            ("player_spawn", self.player_spawn),
            ("enemy_spawn", self.enemy_spawn),
        ];
        for (name, value) in vectors {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("{name} must be finite")));
            }
        }
        if self.player_spawn.y < self.ground_height {
            return Err(ConfigError::Invalid(
                "player_spawn must not be below ground_height".into(),
            ));
        }
        match self.camera {
            CameraConfig::Follow { offset } => {
                if !offset.is_finite() {
                    return Err(ConfigError::Invalid("follow offset must be finite".into()));
                }
            }
            CameraConfig::Orbit {
                radius,
                sensitivity,
                yaw,
                pitch,
            } => {
                if !(radius.is_finite() && radius > 0.0) {
                    return Err(ConfigError::Invalid("orbit radius must be positive".into()));
                }
                if !(sensitivity.is_finite() && yaw.is_finite() && pitch.is_finite()) {
                    return Err(ConfigError::Invalid(
                        "orbit sensitivity, yaw and pitch must be finite".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}
