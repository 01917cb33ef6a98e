//! Shared time sources for sampler timers.

use std::time::{SystemTime, UNIX_EPOCH};

use tokio::time::Instant;

/// Milliseconds on a clock shared by every sampler of an orchestrator.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> f64;
}

/// Unix wall time, read once and then advanced by the tokio clock.
#[derive(Debug, Clone)]
pub struct SystemClock {
    epoch_ms: f64,
    anchor: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        let epoch_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0);
        SystemClock {
            epoch_ms,
            anchor: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        SystemClock::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.epoch_ms + self.anchor.elapsed().as_secs_f64() * 1000.0
    }
}

/// Milliseconds since construction on the tokio clock.
/// Starts at zero, which makes paused-time tests deterministic.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    anchor: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock {
            anchor: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        MonotonicClock::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> f64 {
        self.anchor.elapsed().as_secs_f64() * 1000.0
    }
}
