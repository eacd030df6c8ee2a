//! The Four Compensation Stages
//!
//! Each stage is a pure function from (previous value, motion context) to
//! a new [`CompensatedValue`], independently testable and free of hidden
//! state. The physical models:
//!
//! - **Linear**: while the device translates during capture, the ranging
//!   baseline shifts; the induced error grows with both the acceleration
//!   magnitude and the sensor-to-target distance.
//! - **Angular**: rotation displaces the reference frame, so the induced
//!   error scales with the measured quantity itself rather than the
//!   sensor distance.
//! - **Predictive**: corrects for motion expected between the matched
//!   sample and the capture instant, using the advisory prediction.
//! - **Adaptive**: damps runaway corrections - if the chain has moved the
//!   value further from the raw input than the error model can justify,
//!   the correction is clamped back and confidence reduced.

use crate::compensation::{CompensatedValue, CompensationStage};
use crate::confidence::Confidence;
use crate::constants::motion::{
    ADAPTIVE_CLAMP_PENALTY, ADAPTIVE_CORRECTION_CAP_FACTOR, ANGULAR_ERROR_SCALE,
    LINEAR_ERROR_SCALE, PREDICTIVE_ERROR_SCALE,
};
use crate::motion::{MotionSample, PredictedMotion};

/// Translation-induced error estimate for a motion frame (meters)
pub(crate) fn linear_error(motion: &MotionSample, sensor_distance_m: f32) -> f32 {
    motion.user_acceleration.norm() * sensor_distance_m * LINEAR_ERROR_SCALE
}

/// Rotation-induced error estimate for a motion frame
///
/// Scales with the measured value: an angular displacement of the
/// reference frame perturbs large quantities more than small ones.
pub(crate) fn angular_error(motion: &MotionSample, value: f32) -> f32 {
    motion.rotation_rate.norm() * libm::fabsf(value) * ANGULAR_ERROR_SCALE
}

/// Stage 1: linear (translation) compensation
///
/// Subtracts the translation-induced error. Stage confidence is
/// `max(0, 1 - error / accuracy_target)` - an error consuming the whole
/// budget zeroes the stage's trust - floored against the incoming
/// confidence so the chain stays monotone.
pub(crate) fn linear_stage(
    prev: &CompensatedValue,
    motion: &MotionSample,
    sensor_distance_m: f32,
    accuracy_target_m: f32,
) -> CompensatedValue {
    let error = linear_error(motion, sensor_distance_m);
    let stage_confidence = Confidence::from_float((1.0 - error / accuracy_target_m).max(0.0));

    CompensatedValue {
        value: prev.value - error,
        stage: CompensationStage::Linear,
        confidence: prev.confidence.floor(stage_confidence),
    }
}

/// Stage 2: angular (rotation) compensation
///
/// Subtracts the rotation-induced error, signed with the current value so
/// the correction always shrinks the magnitude.
pub(crate) fn angular_stage(
    prev: &CompensatedValue,
    motion: &MotionSample,
    accuracy_target_m: f32,
) -> CompensatedValue {
    let magnitude = angular_error(motion, prev.value);
    let signed = libm::copysignf(magnitude, prev.value);
    let stage_confidence = Confidence::from_float((1.0 - magnitude / accuracy_target_m).max(0.0));

    CompensatedValue {
        value: prev.value - signed,
        stage: CompensationStage::Angular,
        confidence: prev.confidence.floor(stage_confidence),
    }
}

/// Stage 3: predictive correction
///
/// Applies a correction proportional to the predicted speed over the
/// prediction horizon. Without a prediction the stage is an exact no-op:
/// the prior value, confidence, and stage provenance pass through
/// unchanged.
pub(crate) fn predictive_stage(
    prev: &CompensatedValue,
    predicted: Option<&PredictedMotion>,
) -> CompensatedValue {
    let predicted = match predicted {
        Some(p) => p,
        None => return *prev,
    };

    let horizon_s = predicted.horizon_ms as f32 / 1000.0;
    let correction = predicted.linear_velocity.norm() * horizon_s * PREDICTIVE_ERROR_SCALE;

    CompensatedValue {
        value: prev.value - correction,
        stage: CompensationStage::Predictive,
        confidence: prev.confidence.floor(predicted.confidence),
    }
}

/// Stage 4: adaptive correction damping
///
/// Bounds the total correction the chain applied relative to the raw
/// input. The cap is a multiple of the accuracy target; a correction
/// beyond it means the error model left its valid regime, so the value is
/// clamped back toward the raw input and confidence takes a penalty.
/// Confidence is never increased.
pub(crate) fn adaptive_stage(
    prev: &CompensatedValue,
    raw_value: f32,
    accuracy_target_m: f32,
) -> CompensatedValue {
    let cap = accuracy_target_m * ADAPTIVE_CORRECTION_CAP_FACTOR;
    let correction = prev.value - raw_value;

    if libm::fabsf(correction) <= cap {
        return CompensatedValue {
            value: prev.value,
            stage: CompensationStage::Adaptive,
            confidence: prev.confidence,
        };
    }

    CompensatedValue {
        value: raw_value + libm::copysignf(cap, correction),
        stage: CompensationStage::Adaptive,
        confidence: prev.confidence.scaled(ADAPTIVE_CLAMP_PENALTY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vec3;

    fn accel_sample(accel: f32) -> MotionSample {
        MotionSample {
            user_acceleration: Vec3::new(accel, 0.0, 0.0),
            ..MotionSample::at_rest(0)
        }
    }

    fn rot_sample(rot: f32) -> MotionSample {
        MotionSample {
            rotation_rate: Vec3::new(0.0, 0.0, rot),
            ..MotionSample::at_rest(0)
        }
    }

    #[test]
    fn linear_stage_subtracts_scaled_error() {
        let prev = CompensatedValue::raw(2.0);
        let result = linear_stage(&prev, &accel_sample(0.2), 1.5, 0.001);

        // 0.2 x 1.5 x 0.001 = 0.0003
        assert!((result.value - (2.0 - 0.0003)).abs() < 1e-7);
        assert_eq!(result.stage, CompensationStage::Linear);
        assert!((result.confidence.as_float() - 0.7).abs() < 0.01);
    }

    #[test]
    fn linear_stage_zero_motion_is_lossless() {
        let prev = CompensatedValue::raw(2.0);
        let result = linear_stage(&prev, &MotionSample::at_rest(0), 1.5, 0.001);

        assert_eq!(result.value, 2.0);
        assert_eq!(result.confidence, Confidence::FULL);
    }

    #[test]
    fn linear_confidence_floors_at_zero() {
        let prev = CompensatedValue::raw(2.0);
        // Error far beyond the budget
        let result = linear_stage(&prev, &accel_sample(10.0), 2.0, 0.001);

        assert_eq!(result.confidence, Confidence::ZERO);
    }

    #[test]
    fn angular_stage_scales_with_value() {
        let motion = rot_sample(0.5);

        let small = angular_stage(&CompensatedValue::raw(1.0), &motion, 1.0);
        let large = angular_stage(&CompensatedValue::raw(10.0), &motion, 1.0);

        let small_correction = 1.0 - small.value;
        let large_correction = 10.0 - large.value;

        assert!(large_correction > small_correction * 9.0);
    }

    #[test]
    fn angular_stage_shrinks_negative_values_too() {
        let motion = rot_sample(0.5);
        let result = angular_stage(&CompensatedValue::raw(-10.0), &motion, 1.0);

        // Correction moves the value toward zero, not away
        assert!(result.value > -10.0);
        assert!(result.value < 0.0);
    }

    #[test]
    fn predictive_stage_without_prediction_is_noop() {
        let prev = CompensatedValue {
            value: 1.5,
            stage: CompensationStage::Angular,
            confidence: Confidence::from_float(0.8),
        };

        let result = predictive_stage(&prev, None);

        assert_eq!(result.value.to_bits(), prev.value.to_bits());
        assert_eq!(result.stage, CompensationStage::Angular);
        assert_eq!(result.confidence, prev.confidence);
    }

    #[test]
    fn predictive_stage_takes_prediction_confidence_floor() {
        let prev = CompensatedValue::raw(2.0);
        let predicted = PredictedMotion {
            linear_velocity: Vec3::new(0.01, 0.0, 0.0),
            angular_velocity: Vec3::ZERO,
            horizon_ms: 100,
            confidence: Confidence::from_float(0.6),
        };

        let result = predictive_stage(&prev, Some(&predicted));

        assert!(result.value < 2.0);
        assert!((result.confidence.as_float() - 0.6).abs() < 0.01);
    }

    #[test]
    fn adaptive_stage_passes_small_corrections() {
        let prev = CompensatedValue {
            value: 2.01,
            stage: CompensationStage::Angular,
            confidence: Confidence::from_float(0.9),
        };

        let result = adaptive_stage(&prev, 2.0, 0.001);

        assert_eq!(result.value, 2.01);
        assert_eq!(result.confidence, prev.confidence);
        assert_eq!(result.stage, CompensationStage::Adaptive);
    }

    #[test]
    fn adaptive_stage_clamps_runaway_corrections() {
        let prev = CompensatedValue {
            value: 3.0, // a full meter of "correction"
            stage: CompensationStage::Angular,
            confidence: Confidence::from_float(0.9),
        };

        let result = adaptive_stage(&prev, 2.0, 0.001);

        // Cap is 0.001 x 100 = 0.1 m
        assert!((result.value - 2.1).abs() < 1e-6);
        assert!(result.confidence < prev.confidence);
    }

    #[test]
    fn adaptive_never_raises_confidence() {
        let prev = CompensatedValue {
            value: 5.0,
            stage: CompensationStage::Angular,
            confidence: Confidence::from_float(0.4),
        };

        let result = adaptive_stage(&prev, 2.0, 0.001);
        assert!(result.confidence <= prev.confidence);
    }
}
