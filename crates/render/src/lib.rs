//! Rendering Adapter: renderer-agnostic interface and HUD presentation.
//!
//! # Invariants
//! - Renderers cannot mutate session state.
//! - The HUD changes only in response to session events.
//! - Once the terminal notice is shown, nothing replaces it.

mod hud;
mod renderer;

pub use hud::{GAME_OVER_MESSAGE, HealthBar, HealthColor, Presentation, Screen};
pub use renderer::{DebugTextRenderer, Projection, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "pursuit-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
