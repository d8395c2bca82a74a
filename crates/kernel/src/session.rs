use crate::camera::{CameraRig, CameraView};
use crate::damage::{DamageOutcome, DamageRule};
use crate::enemy::EnemyState;
use crate::player::{PlayerState, planar_delta};
use glam::{Vec2, Vec3};
use pursuit_common::GameConfig;
use pursuit_input::{Control, InputState};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Session lifecycle. `GameOver` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Running,
    GameOver,
}

/// A record of every observable transition in the session.
///
/// Presentation consumes these instead of polling state, so the health bar
/// and the terminal notice change exactly when the rules say they do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The player model finished loading and the player entered the world.
    PlayerSpawned { position: Vec3 },
    /// Player left the ground.
    Jumped { frame: u64 },
    /// Player touched down.
    Landed { frame: u64 },
    /// The damage rule landed a hit.
    Damaged { health: i32, at: Duration },
    /// Health ran out. Always follows the fatal `Damaged`.
    GameOver { frame: u64 },
    /// A startup asset could not be loaded; the player will never spawn.
    AssetFailed { reason: String },
}

/// What a single call to [`GameSession::frame`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Session is over; nothing ran.
    Skipped,
    /// No player yet; the enemy has nothing to chase.
    Idle,
    /// Full update ran.
    Advanced { contact: bool },
}

/// The authoritative game state.
///
/// One session per game. Sessions share nothing, so several can run side by
/// side (tests do this to compare runs).
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    player: Option<PlayerState>,
    enemy: EnemyState,
    camera: CameraRig,
    view: CameraView,
    damage: DamageRule,
    phase: Phase,
    frame: u64,
    fault: Option<String>,
    /// Append-only log of transitions, drained by presentation.
    events: Vec<GameEvent>,
}

impl GameSession {
    /// A fresh session: enemy placed, player not yet spawned.
    pub fn new(config: GameConfig) -> Self {
        let camera = CameraRig::from_config(&config.camera);
        let view = camera.view_of(config.player_spawn);
        Self {
            enemy: EnemyState::new(config.enemy_spawn, config.enemy_speed),
            damage: DamageRule::new(config.damage_amount, config.damage_cooldown()),
            camera,
            view,
            player: None,
            phase: Phase::Running,
            frame: 0,
            fault: None,
            events: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player(&self) -> Option<&PlayerState> {
        self.player.as_ref()
    }

    pub fn enemy(&self) -> &EnemyState {
        &self.enemy
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn view(&self) -> CameraView {
        self.view
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Number of frames that actually ran (skipped frames do not count).
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Current health; the configured maximum until the player spawns.
    pub fn health(&self) -> i32 {
        self.player
            .map(|p| p.health)
            .unwrap_or(self.config.max_health)
    }

    /// Clock reading of the most recent hit.
    pub fn last_damage_at(&self) -> Option<Duration> {
        self.damage.last_applied()
    }

    /// Reason the session can never start, if an asset failed.
    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Place the player at the configured spawn point. Only the first call
    /// has an effect; returns whether this call spawned the player.
    pub fn spawn_player(&mut self) -> bool {
        if self.player.is_some() || self.fault.is_some() {
            return false;
        }
        let mut spawn = self.config.player_spawn;
        spawn.y = spawn.y.max(self.config.ground_height);
        let player = PlayerState::spawn(spawn, self.config.max_health);
        self.view = self.camera.view_of(player.position);
        self.player = Some(player);
        self.events.push(GameEvent::PlayerSpawned {
            position: player.position,
        });
        tracing::info!(position = ?player.position, "player spawned");
        true
    }

    /// Record that startup assets failed. The player will never spawn.
    pub fn report_asset_failure(&mut self, reason: impl Into<String>) {
        if self.fault.is_some() {
            return;
        }
        let reason = reason.into();
        tracing::error!(%reason, "asset loading failed");
        self.fault = Some(reason.clone());
        self.events.push(GameEvent::AssetFailed { reason });
    }

    /// Rotate the orbit camera by a pointer delta. Returns false for the
    /// follow rig or once the game is over.
    pub fn orbit_camera(&mut self, delta: Vec2) -> bool {
        if self.is_game_over() {
            return false;
        }
        let rotated = self.camera.orbit(delta);
        if rotated {
            if let Some(player) = &self.player {
                self.view = self.camera.view_of(player.position);
            }
        }
        rotated
    }

    /// Advance one frame.
    ///
    /// Order: planar move, jump, vertical integration, camera, chase and
    /// contact damage. `now` is only used for the damage cooldown.
    pub fn frame(&mut self, input: &InputState, now: Duration) -> FrameOutcome {
        if self.is_game_over() {
            return FrameOutcome::Skipped;
        }
        self.frame += 1;
        let frame = self.frame;

        let Some(player) = self.player.as_mut() else {
            return FrameOutcome::Idle;
        };

        let (forward, right) = self.camera.planar_basis();
        player.translate(planar_delta(
            input.movement_axes(),
            forward,
            right,
            self.config.move_speed,
        ));

        if input.is_held(Control::Jump) && player.try_jump(self.config.jump_velocity) {
            self.events.push(GameEvent::Jumped { frame });
            tracing::debug!(frame, "jump");
        }
        if player.integrate_vertical(self.config.gravity, self.config.ground_height) {
            self.events.push(GameEvent::Landed { frame });
            tracing::debug!(frame, "landed");
        }

        let target = player.position;
        self.view = self.camera.view_of(target);

        let contact = self.enemy.chase(target, self.config.contact_radius);
        if contact {
            self.apply_damage(now);
        }
        FrameOutcome::Advanced { contact }
    }

    /// Run the damage rule against the player at clock reading `now`.
    ///
    /// No effect without a player or after game over.
    pub fn apply_damage(&mut self, now: Duration) -> DamageOutcome {
        if self.is_game_over() {
            return DamageOutcome::Ignored;
        }
        let Some(player) = self.player.as_mut() else {
            return DamageOutcome::Ignored;
        };
        let outcome = self.damage.try_apply(now, &mut player.health);
        match outcome {
            DamageOutcome::Applied { health } => {
                tracing::info!(health, "player hit");
                self.events.push(GameEvent::Damaged { health, at: now });
            }
            DamageOutcome::Fatal { health } => {
                tracing::info!(health, "player hit");
                self.events.push(GameEvent::Damaged { health, at: now });
                self.phase = Phase::GameOver;
                self.events.push(GameEvent::GameOver { frame: self.frame });
                tracing::info!(frame = self.frame, "game over");
            }
            DamageOutcome::Cooling | DamageOutcome::Ignored => {}
        }
        outcome
    }

    /// Deterministic hash of the simulation state for comparing runs.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        let mix_vec = |h: &mut u64, v: Vec3| {
            for c in v.to_array() {
                mix(h, &c.to_le_bytes());
            }
        };
        mix(&mut h, &self.frame.to_le_bytes());
        mix(&mut h, &[self.phase as u8]);
        mix_vec(&mut h, self.enemy.position);
        if let Some(p) = &self.player {
            mix_vec(&mut h, p.position);
            mix(&mut h, &p.vertical_velocity.to_le_bytes());
            mix(&mut h, &[p.is_jumping as u8]);
            mix(&mut h, &p.health.to_le_bytes());
        }
        mix_vec(&mut h, self.view.eye);
        if let Some(t) = self.damage.last_applied() {
            mix(&mut h, &t.as_nanos().to_le_bytes());
        }
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn spawned(config: GameConfig) -> GameSession {
        let mut s = GameSession::new(config);
        assert!(s.spawn_player());
        s.drain_events();
        s
    }

    /// Enemy parked far away so it never interferes.
    fn quiet_config() -> GameConfig {
        GameConfig {
            enemy_spawn: Vec3::new(40.0, 0.5, 40.0),
            enemy_speed: 0.0,
            ..GameConfig::follow()
        }
    }

    #[test]
    fn new_session_waits_for_player() {
        let mut s = GameSession::new(GameConfig::follow());
        assert_eq!(s.phase(), Phase::Running);
        assert!(s.player().is_none());
        assert_eq!(s.health(), 100);

        let enemy_before = s.enemy().position;
        assert_eq!(s.frame(&InputState::new(), ms(0)), FrameOutcome::Idle);
        assert_eq!(s.enemy().position, enemy_before);
        assert_eq!(s.apply_damage(ms(0)), DamageOutcome::Ignored);
    }

    #[test]
    fn spawn_is_one_shot() {
        let mut s = GameSession::new(GameConfig::follow());
        assert!(s.spawn_player());
        assert!(!s.spawn_player());
        let spawned = s
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerSpawned { .. }))
            .count();
        assert_eq!(spawned, 1);
    }

    #[test]
    fn asset_failure_blocks_spawn() {
        let mut s = GameSession::new(GameConfig::follow());
        s.report_asset_failure("assets/untitled.glb: not found");
        assert!(!s.spawn_player());
        assert_eq!(s.fault(), Some("assets/untitled.glb: not found"));
        assert!(matches!(s.events()[0], GameEvent::AssetFailed { .. }));
    }

    #[test]
    fn forward_moves_along_negative_z() {
        let mut s = spawned(quiet_config());
        let mut input = InputState::new();
        input.set(Control::Forward, true);
        s.frame(&input, ms(0));
        let p = s.player().unwrap().position;
        assert!((p.z - (-0.1)).abs() < 1e-6);
        assert_eq!(p.x, 0.0);
    }

    #[test]
    fn strafe_right_moves_along_positive_x() {
        let mut s = spawned(quiet_config());
        let mut input = InputState::new();
        input.set(Control::Right, true);
        for _ in 0..10 {
            s.frame(&input, ms(0));
        }
        assert!((s.player().unwrap().position.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn all_four_direction_keys_move_back_and_right() {
        let mut s = spawned(quiet_config());
        let mut input = InputState::new();
        for key in ["w", "s", "a", "d"] {
            input.key_down(key);
        }
        s.frame(&input, ms(0));
        let p = s.player().unwrap().position;
        assert!((p.x - 0.1).abs() < 1e-6);
        assert!((p.z - 0.1).abs() < 1e-6);
        assert_eq!(p.y, 0.5);
    }

    #[test]
    fn spawn_below_ground_is_lifted_to_ground() {
        let mut s = spawned(GameConfig {
            player_spawn: Vec3::new(0.0, -3.0, 0.0),
            ..quiet_config()
        });
        s.frame(&InputState::new(), ms(0));
        assert_eq!(s.player().unwrap().position.y, 0.5);
    }

    #[test]
    fn orbit_variant_moves_relative_to_yaw() {
        let config = GameConfig {
            camera: GameConfig::orbit().camera,
            ..quiet_config()
        };
        let mut s = spawned(config);
        // Drag so yaw becomes -π/2: camera sits on -X, forward points to +X.
        let sensitivity = 0.005;
        let pixels = std::f32::consts::FRAC_PI_2 / sensitivity;
        assert!(s.orbit_camera(Vec2::new(pixels, 0.0)));

        let mut input = InputState::new();
        input.set(Control::Forward, true);
        s.frame(&input, ms(0));
        let p = s.player().unwrap().position;
        assert!((p.x - 0.1).abs() < 1e-5, "x = {}", p.x);
        assert!(p.z.abs() < 1e-5, "z = {}", p.z);
    }

    #[test]
    fn follow_camera_tracks_player() {
        let mut s = spawned(quiet_config());
        let mut input = InputState::new();
        input.set(Control::Left, true);
        s.frame(&input, ms(0));
        let p = s.player().unwrap().position;
        let view = s.view();
        assert_eq!(view.target, p);
        assert_eq!(view.eye, p + Vec3::new(0.0, 2.0, 5.0));
    }

    #[test]
    fn held_jump_launches_and_lands() {
        let mut s = spawned(quiet_config());
        let mut input = InputState::new();
        input.set(Control::Jump, true);
        s.frame(&input, ms(0));
        let p = *s.player().unwrap();
        assert!(p.is_jumping);
        // Launch at 0.2, then one gravity step.
        assert!((p.vertical_velocity - 0.18).abs() < 1e-6);
        assert!((p.position.y - 0.7).abs() < 1e-6);

        input.set(Control::Jump, false);
        for _ in 0..40 {
            s.frame(&input, ms(0));
            assert!(s.player().unwrap().position.y >= 0.5);
        }
        let p = s.player().unwrap();
        assert!(!p.is_jumping);
        assert_eq!(p.position.y, 0.5);

        let events = s.drain_events();
        assert!(matches!(events[0], GameEvent::Jumped { frame: 1 }));
        assert!(events.iter().any(|e| matches!(e, GameEvent::Landed { .. })));
    }

    #[test]
    fn enemy_closes_on_stationary_player() {
        let mut s = spawned(GameConfig::follow());
        let input = InputState::new();
        let target = s.player().unwrap().position;
        let mut last = s.enemy().distance_to(target);
        loop {
            let outcome = s.frame(&input, ms(0));
            let d = s.enemy().distance_to(target);
            if outcome == (FrameOutcome::Advanced { contact: true }) {
                assert!(d < 1.5);
                break;
            }
            assert!(d < last);
            last = d;
            assert!(s.frame_count() < 1_000);
        }
        assert_eq!(s.health(), 90);
    }

    #[test]
    fn stationary_contact_timeline() {
        // Player at distance 1.0, enemy 0.07/frame, 16 ms frames.
        let config = GameConfig {
            enemy_spawn: Vec3::new(1.0, 0.5, 0.0),
            enemy_speed: 0.07,
            ..GameConfig::follow()
        };
        let mut s = spawned(config);
        let input = InputState::new();

        let mut hits = Vec::new();
        for i in 0..130u64 {
            s.frame(&input, ms(i * 16));
            for e in s.drain_events() {
                if let GameEvent::Damaged { at, .. } = e {
                    hits.push((i, at));
                }
            }
        }
        assert_eq!(hits[0], (0, ms(0)));
        assert_eq!(hits[1], (63, ms(1008)));
        assert_eq!(hits[2], (126, ms(2016)));
        assert_eq!(s.health(), 70);
    }

    #[test]
    fn damage_is_rate_limited() {
        let mut s = spawned(quiet_config());
        assert!(s.apply_damage(ms(0)).landed());
        assert_eq!(s.apply_damage(ms(999)), DamageOutcome::Cooling);
        assert_eq!(s.health(), 90);
        assert!(s.apply_damage(ms(1000)).landed());
        assert_eq!(s.health(), 80);
    }

    #[test]
    fn game_over_is_terminal() {
        let mut s = spawned(quiet_config());
        for i in 0..10u64 {
            s.apply_damage(ms(i * 1000));
        }
        assert!(s.is_game_over());
        assert_eq!(s.health(), 0);

        let events = s.drain_events();
        assert!(matches!(events.last(), Some(GameEvent::GameOver { .. })));

        let mut input = InputState::new();
        input.set(Control::Forward, true);
        input.set(Control::Jump, true);
        let before = s.state_hash();
        for i in 0..100u64 {
            assert_eq!(s.frame(&input, ms(20_000 + i * 1000)), FrameOutcome::Skipped);
            assert_eq!(s.apply_damage(ms(20_000 + i * 1000)), DamageOutcome::Ignored);
            assert!(!s.orbit_camera(Vec2::new(10.0, 0.0)));
        }
        assert!(s.is_game_over());
        assert_eq!(s.state_hash(), before);
        assert!(s.events().is_empty());
    }

    #[test]
    fn same_inputs_same_hash() {
        let run = || {
            let mut s = spawned(GameConfig::orbit());
            let mut input = InputState::new();
            input.set(Control::Back, true);
            input.set(Control::Jump, true);
            for i in 0..200u64 {
                if i == 50 {
                    input.set(Control::Right, true);
                }
                s.frame(&input, ms(i * 16));
            }
            s.state_hash()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn different_inputs_diverge() {
        let mut a = spawned(GameConfig::follow());
        let mut b = spawned(GameConfig::follow());
        let mut input = InputState::new();
        a.frame(&input, ms(0));
        input.set(Control::Left, true);
        b.frame(&input, ms(0));
        assert_ne!(a.state_hash(), b.state_hash());
    }
}
