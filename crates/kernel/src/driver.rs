use crate::clock::Clock;
use crate::session::{FrameOutcome, GameSession};
use pursuit_input::InputState;
use std::time::Duration;

/// Why a driver stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    GameOver,
    AssetFailure(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverState {
    Running,
    Stopped(StopReason),
}

/// Fixed-step scheduler that owns the session.
///
/// The host calls [`Driver::tick`] with whatever time elapsed since the last
/// call; the driver turns that into whole simulation frames. Once stopped it
/// never runs another frame.
#[derive(Debug)]
pub struct Driver<C: Clock> {
    session: GameSession,
    clock: C,
    state: DriverState,
    accumulator: Duration,
    step: Duration,
    max_frames_per_tick: u32,
}

impl<C: Clock> Driver<C> {
    pub fn new(session: GameSession, clock: C) -> Self {
        let step = session.config().frame_interval();
        let max_frames_per_tick = session.config().max_frames_per_tick;
        let state = match session.fault() {
            Some(reason) => DriverState::Stopped(StopReason::AssetFailure(reason.to_string())),
            None if session.is_game_over() => DriverState::Stopped(StopReason::GameOver),
            None => DriverState::Running,
        };
        Self {
            session,
            clock,
            state,
            accumulator: Duration::ZERO,
            step,
            max_frames_per_tick,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn state(&self) -> &DriverState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    /// Length of one simulation frame.
    pub fn step(&self) -> Duration {
        self.step
    }

    /// Startup assets arrived: put the player in the world.
    pub fn assets_ready(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.session.spawn_player()
    }

    /// Startup assets failed: record it and stop for good.
    pub fn report_asset_failure(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        self.session.report_asset_failure(reason.clone());
        if self.is_running() {
            self.state = DriverState::Stopped(StopReason::AssetFailure(reason));
        }
    }

    /// Accumulate `dt` and run as many whole frames as it covers, up to the
    /// configured cap. Returns the number of frames run.
    pub fn tick(&mut self, dt: Duration, input: &InputState) -> u32 {
        if !self.is_running() {
            return 0;
        }
        self.accumulator += dt;
        let mut frames = 0;
        while self.accumulator >= self.step {
            if frames == self.max_frames_per_tick {
                // Too far behind: drop the backlog rather than spiral.
                let step_ns = self.step.as_nanos().max(1);
                let rem = self.accumulator.as_nanos() % step_ns;
                tracing::debug!(
                    dropped_ms = (self.accumulator.as_nanos() - rem) as f64 / 1e6,
                    "frame backlog dropped"
                );
                self.accumulator = Duration::from_nanos(rem as u64);
                break;
            }
            self.accumulator -= self.step;
            frames += 1;
            if !self.run_frame(input) {
                break;
            }
        }
        frames
    }

    /// Run exactly one frame now, bypassing the accumulator.
    pub fn step_frame(&mut self, input: &InputState) -> bool {
        if !self.is_running() {
            return false;
        }
        self.run_frame(input);
        true
    }

    /// Returns false once the driver has stopped.
    fn run_frame(&mut self, input: &InputState) -> bool {
        let outcome = self.session.frame(input, self.clock.now());
        if outcome == FrameOutcome::Skipped || self.session.is_game_over() {
            self.state = DriverState::Stopped(StopReason::GameOver);
            self.accumulator = Duration::ZERO;
            tracing::info!(frame = self.session.frame_count(), "driver stopped: game over");
            return false;
        }
        true
    }
}
