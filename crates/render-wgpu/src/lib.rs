//! wgpu render backend for the pursuit game.
//!
//! Draws a vertical sky gradient, the grass-textured ground plane, a lit cube
//! for the enemy and the imported player model. Startup assets are uploaded
//! once with [`WgpuRenderer::upload_assets`]; until then the ground is flat
//! grass and the player is not drawn.
//!
//! # Invariants
//! - Renderer never mutates session state.
//! - Camera placement comes from the kernel; only projection lives here.

mod gpu;
mod scene;
mod shaders;

pub use gpu::WgpuRenderer;
pub use scene::{EntityInstance, SceneColors, enemy_instance, player_instance};
