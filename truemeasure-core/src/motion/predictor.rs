//! Short-Horizon Motion Prediction
//!
//! ## Overview
//!
//! The predictor extrapolates where the device's velocity is heading over
//! the next few tens of milliseconds, so the compensation pipeline's
//! predictive stage can correct for motion that happens between the sensor
//! reading and the measurement capture.
//!
//! ## Algorithm
//!
//! - **Linear velocity**: trapezoidal integration of user acceleration
//!   over the recent window - each consecutive sample pair contributes
//!   `0.5 x (a_i + a_i+1) x dt`. With a single sample the nominal sample
//!   interval stands in for `dt`. More history means more pairs averaged
//!   into the estimate, so accuracy improves monotonically with history
//!   depth.
//! - **Angular velocity**: mean rotation rate over the window (gyros
//!   report rate directly; integrating them would give attitude, not
//!   rate).
//! - **Confidence**: decays *linearly* with how many sampling intervals
//!   the horizon spans: `1 - decay_per_interval x (horizon / interval)`,
//!   floored at a small positive value, and scaled by how full the
//!   estimation window is. A prediction one frame ahead is cheap; ten
//!   frames ahead is a guess and scores accordingly.
//!
//! The output is advisory only: nothing outside the predictive
//! compensation stage consumes it.

use crate::confidence::Confidence;
use crate::constants::motion::{
    NOMINAL_SAMPLE_INTERVAL_MS, PREDICTION_CONFIDENCE_FLOOR, PREDICTION_DECAY_PER_INTERVAL,
};
use crate::motion::history::MotionHistory;
use crate::vector::Vec3;

/// Samples needed in the window for a full-confidence base estimate
const FULL_WINDOW_SAMPLES: usize = 6;

/// Extrapolated device motion over a short horizon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictedMotion {
    /// Estimated linear velocity (m/s)
    pub linear_velocity: Vec3,
    /// Estimated angular velocity (rad/s)
    pub angular_velocity: Vec3,
    /// Horizon the prediction covers (ms)
    pub horizon_ms: u32,
    /// Trust in the extrapolation
    pub confidence: Confidence,
}

/// Velocity extrapolator over the rolling motion history
#[derive(Debug, Clone)]
pub struct MotionPredictor {
    /// Window of history consulted for the estimate (ms)
    window_ms: u64,
}

impl MotionPredictor {
    /// Create a predictor reading at most `window_ms` of history
    pub fn new(window_ms: u64) -> Self {
        Self { window_ms }
    }

    /// Predict motion `horizon_ms` ahead of the newest sample
    ///
    /// Returns `None` when the history is empty. Never fails otherwise:
    /// a thin history yields a low-confidence estimate, not an error.
    pub fn predict<const N: usize>(
        &self,
        history: &MotionHistory<N>,
        horizon_ms: u32,
    ) -> Option<PredictedMotion> {
        if history.is_empty() {
            return None;
        }

        let mut linear_velocity = Vec3::ZERO;
        let mut angular_sum = Vec3::ZERO;
        let mut count = 0usize;
        let mut prev: Option<&crate::motion::sample::MotionSample> = None;
        let mut interval_sum_ms = 0.0f32;
        let mut pairs = 0usize;

        for sample in history.samples_within(self.window_ms) {
            angular_sum = angular_sum + sample.rotation_rate;
            count += 1;

            if let Some(p) = prev {
                let dt_s = (sample.timestamp.saturating_sub(p.timestamp)) as f32 / 1000.0;
                let mean_accel = (p.user_acceleration + sample.user_acceleration).scale(0.5);
                linear_velocity = linear_velocity + mean_accel.scale(dt_s);
                interval_sum_ms += dt_s * 1000.0;
                pairs += 1;
            }
            prev = Some(sample);
        }

        // Single sample: no pair to integrate over, assume one nominal
        // interval of the observed acceleration
        if pairs == 0 {
            if let Some(only) = prev {
                linear_velocity = only
                    .user_acceleration
                    .scale(NOMINAL_SAMPLE_INTERVAL_MS / 1000.0);
            }
        }

        let angular_velocity = if count > 0 {
            angular_sum.scale(1.0 / count as f32)
        } else {
            Vec3::ZERO
        };

        let mean_interval_ms = if pairs > 0 && interval_sum_ms > 0.0 {
            interval_sum_ms / pairs as f32
        } else {
            NOMINAL_SAMPLE_INTERVAL_MS
        };

        // Window-fill factor: thin histories estimate from fewer pairs
        let base = (count as f32 / FULL_WINDOW_SAMPLES as f32).min(1.0);

        // Linear decay per sampling interval of lookahead
        let intervals_ahead = horizon_ms as f32 / mean_interval_ms;
        let decay = 1.0 - PREDICTION_DECAY_PER_INTERVAL * intervals_ahead;
        let confidence = (base * decay).max(PREDICTION_CONFIDENCE_FLOOR);

        Some(PredictedMotion {
            linear_velocity,
            angular_velocity,
            horizon_ms,
            confidence: Confidence::from_float(confidence),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::sample::MotionSample;

    fn history_with_accel(accel: f32, samples: usize) -> MotionHistory<64> {
        let mut history = MotionHistory::new();
        for i in 0..samples {
            history.push(MotionSample {
                user_acceleration: Vec3::new(accel, 0.0, 0.0),
                ..MotionSample::at_rest(i as u64 * 17)
            });
        }
        history
    }

    #[test]
    fn empty_history_predicts_nothing() {
        let predictor = MotionPredictor::new(1000);
        let history: MotionHistory<64> = MotionHistory::new();

        assert!(predictor.predict(&history, 100).is_none());
    }

    #[test]
    fn constant_acceleration_integrates_to_velocity() {
        let predictor = MotionPredictor::new(1000);
        let history = history_with_accel(1.0, 10);

        let predicted = predictor.predict(&history, 100).unwrap();

        // 9 pairs x 17 ms x 1 m/s² = 0.153 m/s
        assert!((predicted.linear_velocity.x - 0.153).abs() < 1e-3);
        assert_eq!(predicted.linear_velocity.y, 0.0);
    }

    #[test]
    fn zero_motion_predicts_zero_velocity() {
        let predictor = MotionPredictor::new(1000);
        let history = history_with_accel(0.0, 10);

        let predicted = predictor.predict(&history, 100).unwrap();

        assert_eq!(predicted.linear_velocity, Vec3::ZERO);
        assert_eq!(predicted.angular_velocity, Vec3::ZERO);
    }

    #[test]
    fn confidence_decays_with_horizon() {
        let predictor = MotionPredictor::new(1000);
        let history = history_with_accel(0.1, 10);

        let near = predictor.predict(&history, 20).unwrap();
        let far = predictor.predict(&history, 300).unwrap();

        assert!(near.confidence > far.confidence);
        // Even a long horizon keeps the floor
        assert!(far.confidence.as_float() >= PREDICTION_CONFIDENCE_FLOOR - 1e-3);
    }

    #[test]
    fn confidence_improves_with_history_depth() {
        let predictor = MotionPredictor::new(1000);

        let thin = history_with_accel(0.1, 2);
        let deep = history_with_accel(0.1, 10);

        let from_thin = predictor.predict(&thin, 100).unwrap();
        let from_deep = predictor.predict(&deep, 100).unwrap();

        assert!(from_deep.confidence >= from_thin.confidence);
    }

    #[test]
    fn single_sample_uses_nominal_interval() {
        let predictor = MotionPredictor::new(1000);
        let history = history_with_accel(1.0, 1);

        let predicted = predictor.predict(&history, 100).unwrap();

        let expected = NOMINAL_SAMPLE_INTERVAL_MS / 1000.0;
        assert!((predicted.linear_velocity.x - expected).abs() < 1e-4);
    }
}
