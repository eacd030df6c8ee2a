//! Rolling Motion History with Timestamp-Ordered Lookup
//!
//! ## Overview
//!
//! The history is the only place motion samples live: a fixed-capacity
//! ring buffer with FIFO eviction, appended to by the single ingest path
//! and read by the stability classifier, the predictor, and every
//! compensation call that needs the sample nearest a measurement's
//! timestamp.
//!
//! ## Ordering Invariant
//!
//! Entries are non-decreasing in timestamp. The sensor feed delivers
//! samples in arrival order, but a misbehaving feed can replay old
//! timestamps; rather than corrupting the ordering (which nearest-lookup
//! relies on), an out-of-order push is dropped and logged.
//!
//! ## Capacity
//!
//! Default capacity is 128 samples (~2 s at the recommended 60 Hz).
//! Reads are additionally bounded by the configured time window
//! (10 s default), so a slow feed cannot stretch the window arbitrarily.

use crate::buffer::RingBuffer;
use crate::motion::sample::MotionSample;
use crate::time::{delta_ms, Timestamp};

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

/// Default number of samples the history retains
///
/// Power of 2 so the ring buffer's wrap-around compiles to a bit mask.
pub const DEFAULT_HISTORY_CAPACITY: usize = 128;

/// Bounded, timestamp-ordered rolling window of motion samples
#[derive(Clone, Default)]
pub struct MotionHistory<const N: usize = DEFAULT_HISTORY_CAPACITY> {
    samples: RingBuffer<MotionSample, N>,
}

impl<const N: usize> MotionHistory<N> {
    /// Create an empty history
    pub const fn new() -> Self {
        Self {
            samples: RingBuffer::new(),
        }
    }

    /// Append a sample, evicting the oldest beyond capacity
    ///
    /// Returns `false` when the sample was dropped for violating the
    /// non-decreasing timestamp invariant or carrying non-finite values.
    pub fn push(&mut self, sample: MotionSample) -> bool {
        if !sample.is_finite() {
            log_warn!("dropping motion sample with non-finite components at t={}", sample.timestamp);
            return false;
        }

        if let Some(last) = self.samples.last() {
            if sample.timestamp < last.timestamp {
                log_warn!(
                    "dropping out-of-order motion sample: t={} after t={}",
                    sample.timestamp,
                    last.timestamp
                );
                return false;
            }
        }

        self.samples.push(sample);
        true
    }

    /// Number of retained samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the history holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Most recent sample
    pub fn last(&self) -> Option<&MotionSample> {
        self.samples.last()
    }

    /// Sample by logical index (0 = oldest)
    pub fn get(&self, index: usize) -> Option<&MotionSample> {
        self.samples.get(index)
    }

    /// Iterate samples oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &MotionSample> {
        self.samples.iter()
    }

    /// Remove all samples
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Time spanned between the oldest and newest sample (ms)
    pub fn span_ms(&self) -> u64 {
        match (self.samples.get(0), self.samples.last()) {
            (Some(first), Some(last)) => last.timestamp.saturating_sub(first.timestamp),
            _ => 0,
        }
    }

    /// Sample temporally nearest to `timestamp`
    ///
    /// Nearest by absolute timestamp delta; on a tie the earlier sample
    /// wins (the strict `<` comparison keeps the first-seen candidate
    /// while iterating oldest to newest).
    pub fn nearest(&self, timestamp: Timestamp) -> Option<&MotionSample> {
        let mut best: Option<(&MotionSample, u64)> = None;

        for sample in self.samples.iter() {
            let delta = delta_ms(sample.timestamp, timestamp);
            match best {
                Some((_, best_delta)) if delta >= best_delta => {}
                _ => best = Some((sample, delta)),
            }
        }

        best.map(|(sample, _)| sample)
    }

    /// Iterate samples no older than `window_ms` before the newest sample
    pub fn samples_within(&self, window_ms: u64) -> impl Iterator<Item = &MotionSample> {
        let cutoff = self
            .samples
            .last()
            .map(|last| last.timestamp.saturating_sub(window_ms))
            .unwrap_or(0);

        self.samples.iter().filter(move |s| s.timestamp >= cutoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vec3;

    fn sample_at(t: Timestamp) -> MotionSample {
        MotionSample::at_rest(t)
    }

    #[test]
    fn empty_history() {
        let history: MotionHistory<8> = MotionHistory::new();

        assert!(history.is_empty());
        assert!(history.last().is_none());
        assert!(history.nearest(1000).is_none());
        assert_eq!(history.span_ms(), 0);
    }

    #[test]
    fn push_evicts_oldest() {
        let mut history: MotionHistory<3> = MotionHistory::new();

        for t in [100, 200, 300, 400] {
            assert!(history.push(sample_at(t)));
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.get(0).unwrap().timestamp, 200);
        assert_eq!(history.last().unwrap().timestamp, 400);
    }

    #[test]
    fn out_of_order_sample_is_dropped() {
        let mut history: MotionHistory<8> = MotionHistory::new();

        assert!(history.push(sample_at(1000)));
        assert!(!history.push(sample_at(500)));

        assert_eq!(history.len(), 1);
        assert_eq!(history.last().unwrap().timestamp, 1000);
    }

    #[test]
    fn equal_timestamps_are_allowed() {
        let mut history: MotionHistory<8> = MotionHistory::new();

        assert!(history.push(sample_at(1000)));
        assert!(history.push(sample_at(1000)));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn non_finite_sample_is_dropped() {
        let mut history: MotionHistory<8> = MotionHistory::new();

        let bad = MotionSample {
            user_acceleration: Vec3::new(f32::NAN, 0.0, 0.0),
            ..sample_at(100)
        };

        assert!(!history.push(bad));
        assert!(history.is_empty());
    }

    #[test]
    fn nearest_picks_smallest_delta() {
        let mut history: MotionHistory<8> = MotionHistory::new();

        for t in [100, 200, 300] {
            history.push(sample_at(t));
        }

        assert_eq!(history.nearest(190).unwrap().timestamp, 200);
        assert_eq!(history.nearest(100).unwrap().timestamp, 100);
        assert_eq!(history.nearest(10_000).unwrap().timestamp, 300);
    }

    #[test]
    fn nearest_tie_prefers_earlier() {
        let mut history: MotionHistory<8> = MotionHistory::new();

        history.push(sample_at(100));
        history.push(sample_at(200));

        // 150 is equidistant; the earlier sample wins
        assert_eq!(history.nearest(150).unwrap().timestamp, 100);
    }

    #[test]
    fn window_filters_old_samples() {
        let mut history: MotionHistory<8> = MotionHistory::new();

        for t in [0, 400, 800, 1200] {
            history.push(sample_at(t));
        }

        let recent: Vec<Timestamp> = history
            .samples_within(500)
            .map(|s| s.timestamp)
            .collect();

        assert_eq!(recent, vec![800, 1200]);
    }
}
