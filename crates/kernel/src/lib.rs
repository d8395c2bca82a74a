//! Game Kernel: authoritative session state, per-frame update, fixed-step driver.
//!
//! # Invariants
//! - A frame is pure with respect to its inputs: same session, input and clock
//!   reading produce the same next state.
//! - All state mutations flow through explicit operations on [`GameSession`].
//! - `Phase::GameOver` is terminal; nothing clears it.
//! - Damage lands at most once per cooldown window.

pub mod camera;
pub mod clock;
pub mod damage;
pub mod driver;
pub mod enemy;
pub mod player;
pub mod session;

pub use camera::{CameraRig, CameraView, FollowRig, OrbitRig};
pub use clock::{Clock, ManualClock, SystemClock};
pub use damage::{DamageOutcome, DamageRule};
pub use driver::{Driver, DriverState, StopReason};
pub use enemy::EnemyState;
pub use player::PlayerState;
pub use session::{FrameOutcome, GameEvent, GameSession, Phase};

pub fn crate_info() -> &'static str {
    "pursuit-kernel v0.1.0"
}
