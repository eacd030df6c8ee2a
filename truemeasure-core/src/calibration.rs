//! Calibration Lifecycle and Point Precision Enhancement
//!
//! ## Overview
//!
//! Systematic sensor bias - a resting accelerometer that never quite reads
//! zero, a depth sensor with a constant offset - cannot be corrected by
//! the per-measurement compensation stages; it needs a calibration
//! transform refreshed periodically. This module owns that lifecycle:
//!
//! ```text
//! Uncalibrated ──performCalibration──> Calibrated
//!                                        |    ^
//!                         age > expiry   |    | performCalibration
//!                         or rolling     |    |
//!                         accuracy < min v    |
//!                                      Expired
//! ```
//!
//! `Expired -> Calibrated` happens only through a fresh
//! [`CalibrationManager::perform_calibration`] call, never implicitly.
//!
//! ## Data Discipline
//!
//! A [`CalibrationData`] is never mutated: recalibration supersedes the
//! current record and moves it into a bounded diagnostic history (last 10
//! by default). Only the most recent record corrects points. Timestamps
//! across recalibrations are strictly increasing, so audit ordering is
//! unambiguous even when the wall clock stalls.
//!
//! Staleness is surfaced as a `needs_recalibration` signal - callers
//! decide whether to recalibrate synchronously or defer; it is never an
//! error.

use crate::accuracy::AccuracyClass;
use crate::buffer::RingBuffer;
use crate::constants::motion::MOTION_THRESHOLD;
use crate::constants::quality::{
    BIAS_TO_OFFSET_M, CALIBRATION_EXPIRY_MS, CALIBRATION_HISTORY_CAPACITY,
    CALIBRATION_MIN_ROLLING_ACCURACY,
};
use crate::motion::MotionHistory;
use crate::time::Timestamp;
use crate::vector::Vec3;

/// Point correction applied before geometric computation
///
/// `enhanced = scale ⊙ point + offset` (component-wise scale). Identity
/// until a calibration establishes real values.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationTransform {
    /// Per-axis scale correction
    pub scale: Vec3,
    /// Per-axis additive correction (meters)
    pub offset: Vec3,
}

impl CalibrationTransform {
    /// The do-nothing transform
    pub const IDENTITY: Self = Self {
        scale: Vec3::new(1.0, 1.0, 1.0),
        offset: Vec3::ZERO,
    };

    /// Apply the transform to a point
    pub fn apply(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x * self.scale.x + self.offset.x,
            point.y * self.scale.y + self.offset.y,
            point.z * self.scale.z + self.offset.z,
        )
    }
}

/// One calibration record - superseded, never mutated
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationData {
    /// Monotonically increasing identifier
    pub id: u32,
    /// Accuracy class this calibration targets
    pub target: AccuracyClass,
    /// When the calibration was performed (ms)
    pub timestamp: Timestamp,
    /// Point correction transform
    pub transform: CalibrationTransform,
    /// Additional bias-countering offset (meters)
    pub precision_offset: Vec3,
    /// Quality of the calibration conditions, [0, 1]
    pub quality: f32,
    /// Whether the calibration met the minimum quality bar
    pub is_valid: bool,
}

/// Lifecycle state of the calibration manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CalibrationState {
    /// No calibration performed yet
    Uncalibrated,
    /// A fresh, trusted calibration is in effect
    Calibrated,
    /// The calibration aged out or accuracy degraded
    Expired,
}

/// Minimum quality for a calibration record to count as valid
const MIN_CALIBRATION_QUALITY: f32 = 0.5;

/// Owns the current calibration and its diagnostic history
#[derive(Clone)]
pub struct CalibrationManager {
    /// Authoritative record; `None` until the first calibration
    current: Option<CalibrationData>,
    /// Superseded records, oldest evicted first
    history: RingBuffer<CalibrationData, CALIBRATION_HISTORY_CAPACITY>,
    /// Accuracy class calibrations target
    target: AccuracyClass,
    /// Wall-clock age limit (ms)
    expiry_ms: u64,
    /// Rolling validation accuracy below which the calibration expires
    min_rolling_accuracy: f32,
    /// Next record identifier
    next_id: u32,
}

impl CalibrationManager {
    /// Create an uncalibrated manager with default policy
    pub fn new(target: AccuracyClass) -> Self {
        Self::with_policy(target, CALIBRATION_EXPIRY_MS, CALIBRATION_MIN_ROLLING_ACCURACY)
    }

    /// Create an uncalibrated manager with explicit expiry policy
    pub fn with_policy(target: AccuracyClass, expiry_ms: u64, min_rolling_accuracy: f32) -> Self {
        Self {
            current: None,
            history: RingBuffer::new(),
            target,
            expiry_ms,
            min_rolling_accuracy,
            next_id: 1,
        }
    }

    /// The authoritative calibration, if any
    pub fn current(&self) -> Option<&CalibrationData> {
        self.current.as_ref()
    }

    /// Superseded calibrations, oldest first (diagnostics only)
    pub fn history(&self) -> impl Iterator<Item = &CalibrationData> {
        self.history.iter()
    }

    /// Lifecycle state given the clock and rolling validation accuracy
    pub fn state(&self, now: Timestamp, rolling_accuracy: f32) -> CalibrationState {
        let current = match &self.current {
            Some(current) => current,
            None => return CalibrationState::Uncalibrated,
        };

        let age = now.saturating_sub(current.timestamp);
        if age > self.expiry_ms || rolling_accuracy < self.min_rolling_accuracy {
            CalibrationState::Expired
        } else {
            CalibrationState::Calibrated
        }
    }

    /// Whether a fresh calibration is warranted
    pub fn needs_recalibration(&self, now: Timestamp, rolling_accuracy: f32) -> bool {
        self.state(now, rolling_accuracy) != CalibrationState::Calibrated
    }

    /// Perform a calibration against the current motion history
    ///
    /// Estimates the stationary acceleration bias as the mean user
    /// acceleration over the history window and converts it into a
    /// countering precision offset. Calibration quality falls off with
    /// the mean motion magnitude during the procedure - calibrating a
    /// device that is being waved around produces a low-quality record.
    ///
    /// The new record's timestamp is strictly greater than the previous
    /// one (`max(now, prev + 1)`), and the previous record moves into the
    /// diagnostic history.
    pub fn perform_calibration<const N: usize>(
        &mut self,
        now: Timestamp,
        motion: &MotionHistory<N>,
    ) -> &CalibrationData {
        let mut bias_sum = Vec3::ZERO;
        let mut magnitude_sum = 0.0f32;
        let mut count = 0usize;

        for sample in motion.iter() {
            bias_sum = bias_sum + sample.user_acceleration;
            magnitude_sum += sample.user_acceleration.norm();
            count += 1;
        }

        let (bias, quality) = if count > 0 {
            let bias = bias_sum.scale(1.0 / count as f32);
            let mean_magnitude = magnitude_sum / count as f32;
            let quality = (1.0 - mean_magnitude / (2.0 * MOTION_THRESHOLD))
                .max(0.0)
                .min(1.0);
            (bias, quality)
        } else {
            // Nothing observed: identity correction at moderate quality
            (Vec3::ZERO, MIN_CALIBRATION_QUALITY)
        };

        let timestamp = match &self.current {
            Some(prev) => now.max(prev.timestamp + 1),
            None => now,
        };

        let record = CalibrationData {
            id: self.next_id,
            target: self.target,
            timestamp,
            transform: CalibrationTransform::IDENTITY,
            precision_offset: -bias.scale(BIAS_TO_OFFSET_M),
            quality,
            is_valid: quality >= MIN_CALIBRATION_QUALITY,
        };

        if let Some(prev) = self.current.take() {
            self.history.push(prev);
        }

        self.next_id = self.next_id.wrapping_add(1);
        &*self.current.insert(record)
    }

    /// Apply the authoritative correction to a point
    ///
    /// Uncalibrated managers pass points through unchanged. An expired
    /// calibration still corrects - it remains authoritative until
    /// superseded; staleness is signaled separately.
    pub fn enhance_point(&self, point: Vec3) -> Vec3 {
        match &self.current {
            Some(current) => current.transform.apply(point) + current.precision_offset,
            None => point,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::MotionSample;

    fn quiet_history() -> MotionHistory<32> {
        let mut history = MotionHistory::new();
        for t in (0..500).step_by(50) {
            history.push(MotionSample::at_rest(t));
        }
        history
    }

    fn biased_history(bias: f32) -> MotionHistory<32> {
        let mut history = MotionHistory::new();
        for t in (0..500).step_by(50) {
            history.push(MotionSample {
                user_acceleration: Vec3::new(bias, 0.0, 0.0),
                ..MotionSample::at_rest(t)
            });
        }
        history
    }

    #[test]
    fn starts_uncalibrated() {
        let manager = CalibrationManager::new(AccuracyClass::Millimeter);

        assert_eq!(manager.state(0, 1.0), CalibrationState::Uncalibrated);
        assert!(manager.needs_recalibration(0, 1.0));
        assert!(manager.current().is_none());
    }

    #[test]
    fn uncalibrated_enhancement_is_identity() {
        let manager = CalibrationManager::new(AccuracyClass::Millimeter);
        let p = Vec3::new(1.0, 2.0, 3.0);

        assert_eq!(manager.enhance_point(p), p);
    }

    #[test]
    fn calibration_transitions_to_calibrated() {
        let mut manager = CalibrationManager::new(AccuracyClass::Millimeter);
        let history = quiet_history();

        let record = manager.perform_calibration(1000, &history);
        assert!(record.is_valid);
        assert!(record.quality > 0.9);

        assert_eq!(manager.state(1000, 1.0), CalibrationState::Calibrated);
        assert!(!manager.needs_recalibration(1000, 1.0));
    }

    #[test]
    fn bias_becomes_countering_offset() {
        let mut manager = CalibrationManager::new(AccuracyClass::Millimeter);
        let history = biased_history(0.2);

        let record = *manager.perform_calibration(1000, &history);

        assert!(record.precision_offset.x < 0.0);
        assert!((record.precision_offset.x + 0.2 * BIAS_TO_OFFSET_M).abs() < 1e-6);

        let enhanced = manager.enhance_point(Vec3::ZERO);
        assert_eq!(enhanced, record.precision_offset);
    }

    #[test]
    fn expires_by_age() {
        let mut manager =
            CalibrationManager::with_policy(AccuracyClass::Millimeter, 1000, 0.9);
        manager.perform_calibration(0, &quiet_history());

        assert_eq!(manager.state(500, 1.0), CalibrationState::Calibrated);
        assert_eq!(manager.state(1500, 1.0), CalibrationState::Expired);
        // Expiry never transitions back on its own
        assert_eq!(manager.state(1500, 1.0), CalibrationState::Expired);
    }

    #[test]
    fn expires_by_accuracy_drop() {
        let mut manager = CalibrationManager::new(AccuracyClass::Millimeter);
        manager.perform_calibration(0, &quiet_history());

        assert_eq!(manager.state(10, 0.95), CalibrationState::Calibrated);
        assert_eq!(manager.state(10, 0.85), CalibrationState::Expired);
    }

    #[test]
    fn recalibration_timestamps_strictly_increase() {
        let mut manager = CalibrationManager::new(AccuracyClass::Millimeter);
        let history = quiet_history();

        let first_ts = manager.perform_calibration(1000, &history).timestamp;
        // Clock stalled: same wall time
        let second_ts = manager.perform_calibration(1000, &history).timestamp;
        let third_ts = manager.perform_calibration(999, &history).timestamp;

        assert!(second_ts > first_ts);
        assert!(third_ts > second_ts);
    }

    #[test]
    fn superseded_records_land_in_history() {
        let mut manager = CalibrationManager::new(AccuracyClass::Millimeter);
        let history = quiet_history();

        let first_id = manager.perform_calibration(1000, &history).id;
        let second_id = manager.perform_calibration(2000, &history).id;

        assert_ne!(first_id, second_id);
        assert_eq!(manager.current().unwrap().id, second_id);

        let archived: Vec<u32> = manager.history().map(|c| c.id).collect();
        assert_eq!(archived, vec![first_id]);
    }

    #[test]
    fn history_is_bounded() {
        let mut manager = CalibrationManager::new(AccuracyClass::Millimeter);
        let history = quiet_history();

        for i in 0..15 {
            manager.perform_calibration(1000 + i * 100, &history);
        }

        assert_eq!(manager.history().count(), CALIBRATION_HISTORY_CAPACITY);
    }

    #[test]
    fn empty_history_calibrates_at_moderate_quality() {
        let mut manager = CalibrationManager::new(AccuracyClass::Millimeter);
        let empty: MotionHistory<8> = MotionHistory::new();

        let record = manager.perform_calibration(1000, &empty);

        assert_eq!(record.precision_offset, Vec3::ZERO);
        assert!(record.is_valid);
        assert_eq!(record.quality, MIN_CALIBRATION_QUALITY);
    }
}
