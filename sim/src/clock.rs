//! Injectable wall-clock source.
//!
//! Fire cooldowns and stats publishing are measured against real elapsed time,
//! not ticks. Systems read the time only through the `SimClock` resource so
//! tests can swap in a `ManualClock` and advance it explicitly.

use bevy_ecs::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Monotonic millisecond time source.
pub trait Clock: Send + Sync + 'static {
    fn now_ms(&self) -> u64;
}

/// Real time, measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Resource holding the clock the systems read.
#[derive(Resource)]
pub struct SimClock(Box<dyn Clock>);

impl SimClock {
    pub fn new(clock: impl Clock) -> Self {
        Self(Box::new(clock))
    }

    pub fn now_ms(&self) -> u64 {
        self.0.now_ms()
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(SystemClock::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_is_shared_between_clones() {
        let clock = ManualClock::new(100);
        let handle = clock.clone();
        let sim_clock = SimClock::new(clock);
        assert_eq!(sim_clock.now_ms(), 100);
        handle.advance(250);
        assert_eq!(sim_clock.now_ms(), 350);
        handle.set(10);
        assert_eq!(sim_clock.now_ms(), 10);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
