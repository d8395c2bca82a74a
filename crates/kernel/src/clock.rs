use std::cell::Cell;
use std::time::{Duration, Instant};

/// Monotonic time source for the damage cooldown.
///
/// Readings are offsets from an arbitrary origin; only differences matter.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`], anchored at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock for tests and headless runs.
///
/// Uses interior mutability so it can be advanced while a driver holds it.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(start: Duration) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Jump to `to`. Earlier times are ignored to keep the clock monotonic.
    pub fn set(&self, to: Duration) {
        self.now.set(self.now.get().max(to));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
        clock.advance(Duration::from_millis(16));
        clock.advance(Duration::from_millis(16));
        assert_eq!(clock.now(), Duration::from_millis(32));
    }

    #[test]
    fn manual_clock_never_goes_backwards() {
        let clock = ManualClock::starting_at(Duration::from_secs(5));
        clock.set(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::from_secs(5));
        clock.set(Duration::from_secs(7));
        assert_eq!(clock.now(), Duration::from_secs(7));
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn borrowed_clock_reads_through() {
        let clock = ManualClock::starting_at(Duration::from_millis(250));
        let borrowed: &ManualClock = &clock;
        assert_eq!(Clock::now(&borrowed), Duration::from_millis(250));
    }
}
