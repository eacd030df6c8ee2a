//! Engine Configuration
//!
//! Plain data, no behavior: every empirical policy constant the engine
//! uses can be overridden here. Defaults come from [`crate::constants`].
//!
//! The configuration is validated once at engine construction via
//! [`PrecisionConfig::validated`], which clamps out-of-range values rather
//! than erroring - a misconfigured threshold should degrade, not crash, a
//! capture session.

use crate::accuracy::AccuracyClass;
use crate::constants::{accuracy, motion, quality};

/// Configuration surface of the precision engine
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrecisionConfig {
    /// Motion magnitude threshold for the stable state (m/s²-equivalent)
    pub motion_threshold: f32,

    /// Angular rate threshold for stability (rad/s)
    pub angular_threshold: f32,

    /// Weight applied to angular rate in the combined motion magnitude
    pub angular_weight: f32,

    /// Multiplier over the motion threshold that classifies high motion
    pub high_motion_multiplier: f32,

    /// Time the device must stay below threshold to count as stable (ms)
    pub stability_duration_ms: u64,

    /// Compensation accuracy target (meters)
    pub accuracy_target_m: f32,

    /// Enable the linear (translation) compensation stage
    pub enable_linear: bool,

    /// Enable the angular (rotation) compensation stage
    pub enable_angular: bool,

    /// Enable the predictive correction stage
    pub enable_predictive: bool,

    /// Enable the adaptive filtering stage
    pub enable_adaptive: bool,

    /// Prediction horizon for the predictive stage (ms)
    pub prediction_horizon_ms: u32,

    /// Time window of motion history consulted by readers (ms)
    pub history_window_ms: u64,

    /// Maximum age gap between a measurement and its matched sample (ms)
    pub sample_gap_max_ms: u64,

    /// Validation polling frequency for the session layer (Hz)
    pub validation_frequency_hz: u32,

    /// Accuracy class the session requires measurements to meet
    pub required_accuracy: AccuracyClass,

    /// Minimum precision score for a measurement to be valid
    pub min_precision_threshold: f32,

    /// Wall-clock age after which a calibration expires (ms)
    pub calibration_expiry_ms: u64,
}

impl Default for PrecisionConfig {
    fn default() -> Self {
        Self {
            motion_threshold: motion::MOTION_THRESHOLD,
            angular_threshold: motion::ANGULAR_THRESHOLD,
            angular_weight: motion::ANGULAR_WEIGHT,
            high_motion_multiplier: motion::HIGH_MOTION_MULTIPLIER,
            stability_duration_ms: motion::STABILITY_DURATION_MS,
            accuracy_target_m: accuracy::ACCURACY_TARGET_M,
            enable_linear: true,
            enable_angular: true,
            enable_predictive: true,
            enable_adaptive: true,
            prediction_horizon_ms: motion::PREDICTION_HORIZON_MS,
            history_window_ms: motion::HISTORY_WINDOW_MS,
            sample_gap_max_ms: motion::SAMPLE_GAP_MAX_MS,
            validation_frequency_hz: quality::VALIDATION_FREQUENCY_HZ,
            required_accuracy: AccuracyClass::Millimeter,
            min_precision_threshold: quality::MIN_PRECISION_THRESHOLD,
            calibration_expiry_ms: quality::CALIBRATION_EXPIRY_MS,
        }
    }
}

impl PrecisionConfig {
    /// Clamp out-of-range fields to sane values
    ///
    /// Thresholds must be positive, ratios must sit in [0, 1], the high
    /// motion multiplier must be at least 1.
    pub fn validated(mut self) -> Self {
        if !(self.motion_threshold > 0.0) {
            self.motion_threshold = motion::MOTION_THRESHOLD;
        }
        if !(self.angular_threshold > 0.0) {
            self.angular_threshold = motion::ANGULAR_THRESHOLD;
        }
        self.angular_weight = if self.angular_weight.is_finite() {
            self.angular_weight.max(0.0)
        } else {
            motion::ANGULAR_WEIGHT
        };
        if !(self.high_motion_multiplier >= 1.0) {
            self.high_motion_multiplier = motion::HIGH_MOTION_MULTIPLIER;
        }
        if !(self.accuracy_target_m > 0.0) {
            self.accuracy_target_m = accuracy::ACCURACY_TARGET_M;
        }
        if !(self.min_precision_threshold >= 0.0 && self.min_precision_threshold <= 1.0) {
            self.min_precision_threshold = quality::MIN_PRECISION_THRESHOLD;
        }
        if self.validation_frequency_hz == 0 {
            self.validation_frequency_hz = quality::VALIDATION_FREQUENCY_HZ;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = PrecisionConfig::default();

        assert!(config.motion_threshold > 0.0);
        assert!(config.enable_linear && config.enable_angular);
        assert_eq!(config.required_accuracy, AccuracyClass::Millimeter);
        assert_eq!(config.min_precision_threshold, 0.9);
    }

    #[test]
    fn validation_clamps_nonsense() {
        let config = PrecisionConfig {
            motion_threshold: -1.0,
            angular_weight: f32::NAN,
            high_motion_multiplier: 0.5,
            min_precision_threshold: 2.0,
            ..PrecisionConfig::default()
        }
        .validated();

        assert_eq!(config.motion_threshold, motion::MOTION_THRESHOLD);
        assert_eq!(config.angular_weight, motion::ANGULAR_WEIGHT);
        assert_eq!(config.high_motion_multiplier, motion::HIGH_MOTION_MULTIPLIER);
        assert_eq!(config.min_precision_threshold, quality::MIN_PRECISION_THRESHOLD);
    }

    #[test]
    fn validation_keeps_good_values() {
        let config = PrecisionConfig {
            motion_threshold: 0.25,
            angular_weight: 0.2,
            ..PrecisionConfig::default()
        }
        .validated();

        assert_eq!(config.motion_threshold, 0.25);
        assert_eq!(config.angular_weight, 0.2);
    }
}
