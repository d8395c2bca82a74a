use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Result of one damage attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageOutcome {
    /// Still inside the cooldown window; nothing changed.
    Cooling,
    /// Health dropped and the player survives.
    Applied { health: i32 },
    /// Health dropped to zero or below.
    Fatal { health: i32 },
    /// The session is already over.
    Ignored,
}

impl DamageOutcome {
    pub fn landed(&self) -> bool {
        matches!(self, DamageOutcome::Applied { .. } | DamageOutcome::Fatal { .. })
    }
}

/// Cooldown-gated health decrement.
///
/// The first attempt always lands; later attempts land only once `cooldown`
/// has elapsed since the previous landing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRule {
    amount: i32,
    cooldown: Duration,
    last_applied: Option<Duration>,
}

impl DamageRule {
    pub fn new(amount: i32, cooldown: Duration) -> Self {
        Self {
            amount,
            cooldown,
            last_applied: None,
        }
    }

    /// Clock reading of the most recent landing.
    pub fn last_applied(&self) -> Option<Duration> {
        self.last_applied
    }

    pub fn ready(&self, now: Duration) -> bool {
        match self.last_applied {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.cooldown,
        }
    }

    /// Attempt to hit `health` at clock reading `now`.
    pub fn try_apply(&mut self, now: Duration, health: &mut i32) -> DamageOutcome {
        if !self.ready(now) {
            return DamageOutcome::Cooling;
        }
        self.last_applied = Some(now);
        *health -= self.amount;
        if *health <= 0 {
            DamageOutcome::Fatal { health: *health }
        } else {
            DamageOutcome::Applied { health: *health }
        }
    }
}
