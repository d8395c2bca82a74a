use pursuit_kernel::GameEvent;

/// Text shown once the game is lost.
pub const GAME_OVER_MESSAGE: &str = "Game Over";

/// Health bar fill colour tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthColor {
    Green,
    Orange,
    Red,
}

impl HealthColor {
    /// Above 50 is green, above 20 is orange, anything else red.
    pub fn for_health(health: i32) -> Self {
        if health > 50 {
            HealthColor::Green
        } else if health > 20 {
            HealthColor::Orange
        } else {
            HealthColor::Red
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HealthColor::Green => "green",
            HealthColor::Orange => "orange",
            HealthColor::Red => "red",
        }
    }

    /// sRGB components in 0..=255.
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            HealthColor::Green => [0, 128, 0],
            HealthColor::Orange => [255, 165, 0],
            HealthColor::Red => [255, 0, 0],
        }
    }
}

/// Visual mirror of the player's health.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthBar {
    pub health: i32,
    /// Fill width, 0..=100.
    pub width_percent: f32,
    pub color: HealthColor,
}

impl HealthBar {
    pub fn from_health(health: i32) -> Self {
        Self {
            health,
            width_percent: health.clamp(0, 100) as f32,
            color: HealthColor::for_health(health),
        }
    }

    /// Fill as a 0..=1 fraction.
    pub fn fraction(&self) -> f32 {
        self.width_percent / 100.0
    }
}

/// What the window should show.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Scene visible, player model still loading.
    Loading,
    /// Scene and health bar visible.
    Playing,
    /// Assets failed; the game cannot start.
    Failed { reason: String },
    /// Terminal notice replaces everything.
    GameOver { message: &'static str },
}

/// HUD state driven by session events.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    screen: Screen,
    health_bar: HealthBar,
}

impl Presentation {
    pub fn new(max_health: i32) -> Self {
        Self {
            screen: Screen::Loading,
            health_bar: HealthBar::from_health(max_health),
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn health_bar(&self) -> &HealthBar {
        &self.health_bar
    }

    /// Whether the 3D scene should still be drawn.
    pub fn shows_scene(&self) -> bool {
        matches!(self.screen, Screen::Loading | Screen::Playing)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.screen, Screen::GameOver { .. } | Screen::Failed { .. })
    }

    /// Fold one event into the HUD. Terminal screens ignore everything.
    pub fn apply(&mut self, event: &GameEvent) {
        if self.is_terminal() {
            return;
        }
        match event {
            GameEvent::PlayerSpawned { .. } => {
                self.screen = Screen::Playing;
            }
            GameEvent::Damaged { health, .. } => {
                self.health_bar = HealthBar::from_health(*health);
                tracing::debug!(
                    health,
                    color = self.health_bar.color.name(),
                    "health bar updated"
                );
            }
            GameEvent::GameOver { .. } => {
                self.screen = Screen::GameOver {
                    message: GAME_OVER_MESSAGE,
                };
            }
            GameEvent::AssetFailed { reason } => {
                self.screen = Screen::Failed {
                    reason: reason.clone(),
                };
            }
            GameEvent::Jumped { .. } | GameEvent::Landed { .. } => {}
        }
    }

    pub fn apply_all<'a>(&mut self, events: impl IntoIterator<Item = &'a GameEvent>) {
        for event in events {
            self.apply(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn damaged(health: i32) -> GameEvent {
        GameEvent::Damaged {
            health,
            at: Duration::ZERO,
        }
    }

    #[test]
    fn color_tiers_at_boundaries() {
        assert_eq!(HealthColor::for_health(100), HealthColor::Green);
        assert_eq!(HealthColor::for_health(51), HealthColor::Green);
        assert_eq!(HealthColor::for_health(50), HealthColor::Orange);
        assert_eq!(HealthColor::for_health(21), HealthColor::Orange);
        assert_eq!(HealthColor::for_health(20), HealthColor::Red);
        assert_eq!(HealthColor::for_health(0), HealthColor::Red);
        assert_eq!(HealthColor::for_health(-10), HealthColor::Red);
    }

    #[test]
    fn bar_width_tracks_health() {
        assert_eq!(HealthBar::from_health(70).width_percent, 70.0);
        assert_eq!(HealthBar::from_health(-10).width_percent, 0.0);
        assert_eq!(HealthBar::from_health(100).fraction(), 1.0);
    }

    #[test]
    fn spawn_then_damage_updates_bar() {
        let mut hud = Presentation::new(100);
        assert_eq!(hud.screen(), &Screen::Loading);
        hud.apply(&GameEvent::PlayerSpawned {
            position: glam::Vec3::ZERO,
        });
        assert_eq!(hud.screen(), &Screen::Playing);
        hud.apply(&damaged(40));
        assert_eq!(hud.health_bar().color, HealthColor::Orange);
        assert_eq!(hud.health_bar().width_percent, 40.0);
    }

    #[test]
    fn game_over_replaces_scene_for_good() {
        let mut hud = Presentation::new(100);
        hud.apply_all(&[
            GameEvent::PlayerSpawned {
                position: glam::Vec3::ZERO,
            },
            damaged(0),
            GameEvent::GameOver { frame: 9 },
        ]);
        assert!(!hud.shows_scene());
        assert_eq!(
            hud.screen(),
            &Screen::GameOver {
                message: GAME_OVER_MESSAGE
            }
        );

        hud.apply(&damaged(50));
        hud.apply(&GameEvent::PlayerSpawned {
            position: glam::Vec3::ZERO,
        });
        assert!(matches!(hud.screen(), Screen::GameOver { .. }));
        assert_eq!(hud.health_bar().health, 0);
    }

    #[test]
    fn asset_failure_is_visible() {
        let mut hud = Presentation::new(100);
        hud.apply(&GameEvent::AssetFailed {
            reason: "asset not found: assets/untitled.glb".into(),
        });
        assert!(hud.is_terminal());
        assert!(matches!(hud.screen(), Screen::Failed { reason } if reason.contains("untitled")));
    }
}
