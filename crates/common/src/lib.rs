//! Shared types and gameplay configuration for the pursuit workspace.
//!
//! # Invariants
//! - Every gameplay constant lives in [`GameConfig`]; no crate hard-codes tuning values.
//! - A config that passed [`GameConfig::validate`] never produces a NaN step.

pub mod config;
pub mod types;

pub use config::{CameraConfig, ConfigError, GameConfig};
pub use types::Variant;

pub fn crate_info() -> &'static str {
    "pursuit-common v0.1.0"
}
