//! Time management for the measurement engine
//!
//! Provides a clock abstraction to handle different time sources:
//! - System clock (when available) - needed for calibration wall-clock age
//! - Monotonic counter (for latency and rate calculations)
//! - Fixed clock (for deterministic tests)
//!
//! The engine itself is driven by sample timestamps supplied from outside,
//! so only the calibration expiry policy and latency stamping consult a
//! `TimeSource` directly.

/// Timestamp in milliseconds since epoch (or device boot for monotonic)
pub type Timestamp = u64;

/// Source of time for the system
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// Check if this source provides wall clock time (vs monotonic)
    fn is_wall_clock(&self) -> bool;

    /// Get precision in milliseconds
    fn precision_ms(&self) -> u32;
}

/// Monotonic time source starting at 0 on boot, always increasing
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    start_ms: Timestamp,
}

impl MonotonicClock {
    /// Create a monotonic clock anchored at zero
    pub fn new() -> Self {
        Self { start_ms: 0 }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicClock {
    fn now(&self) -> Timestamp {
        // In a real deployment, read from a hardware timer; the engine
        // only uses this for relative deltas
        self.start_ms
    }

    fn is_wall_clock(&self) -> bool {
        false
    }

    fn precision_ms(&self) -> u32 {
        1
    }
}

/// System time source (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl TimeSource for SystemClock {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime, UNIX_EPOCH};

        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        true
    }

    fn precision_ms(&self) -> u32 {
        1
    }
}

/// Fixed time source for testing
#[derive(Debug, Clone)]
pub struct FixedClock {
    timestamp: Timestamp,
}

impl FixedClock {
    /// Create a clock pinned to `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Pin the clock to a new timestamp
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Advance the clock by `ms` milliseconds
    pub fn advance(&mut self, ms: u64) {
        self.timestamp += ms;
    }
}

impl TimeSource for FixedClock {
    fn now(&self) -> Timestamp {
        self.timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }

    fn precision_ms(&self) -> u32 {
        1
    }
}

/// Absolute difference between two timestamps in milliseconds
pub fn delta_ms(a: Timestamp, b: Timestamp) -> u64 {
    if a > b { a - b } else { b - a }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances() {
        let mut clock = FixedClock::new(1000);
        assert_eq!(clock.now(), 1000);

        clock.advance(500);
        assert_eq!(clock.now(), 1500);
    }

    #[test]
    fn delta_is_symmetric() {
        assert_eq!(delta_ms(1000, 1500), 500);
        assert_eq!(delta_ms(1500, 1000), 500);
        assert_eq!(delta_ms(1000, 1000), 0);
    }
}
