//! Device Stability Classification
//!
//! ## Overview
//!
//! Classifies device motion into the four states the rest of the engine
//! keys off: `Unknown` (no data yet), `Stable`, `LowMotion`, `HighMotion`.
//! The instantaneous classification uses the combined motion magnitude
//! (‖linear acceleration‖ + weight x ‖rotation rate‖); the `Stable` state
//! additionally requires the magnitude to have stayed below threshold for
//! the configured duration, so a single quiet sample in the middle of a
//! shake does not read as stable.
//!
//! A pure rotation can keep the combined magnitude low while still
//! smearing a measurement, so the rotation rate is also checked on its own
//! against the angular threshold.

use crate::motion::history::MotionHistory;
use crate::motion::sample::MotionSample;

/// Device motion state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MotionStatus {
    /// No motion samples observed yet
    Unknown,
    /// Below the motion threshold for the sustained duration
    Stable,
    /// Between the threshold and the high-motion multiple
    LowMotion,
    /// Above the high-motion multiple of the threshold
    HighMotion,
}

impl MotionStatus {
    /// Human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Stable => "stable",
            Self::LowMotion => "low-motion",
            Self::HighMotion => "high-motion",
        }
    }
}

/// Threshold-based stability classifier
#[derive(Debug, Clone)]
pub struct StabilityClassifier {
    /// Combined magnitude below this is stable (m/s²-equivalent)
    motion_threshold: f32,
    /// Rotation rate above this blocks stability on its own (rad/s)
    angular_threshold: f32,
    /// Weight of the angular term in the combined magnitude
    angular_weight: f32,
    /// Multiplier over the threshold that classifies high motion
    high_motion_multiplier: f32,
    /// Time below threshold required before stable (ms)
    stability_duration_ms: u64,
}

impl StabilityClassifier {
    /// Create a classifier from policy thresholds
    pub fn new(
        motion_threshold: f32,
        angular_threshold: f32,
        angular_weight: f32,
        high_motion_multiplier: f32,
        stability_duration_ms: u64,
    ) -> Self {
        Self {
            motion_threshold,
            angular_threshold,
            angular_weight,
            high_motion_multiplier,
            stability_duration_ms,
        }
    }

    /// Combined motion magnitude of one sample
    pub fn magnitude(&self, sample: &MotionSample) -> f32 {
        sample.motion_magnitude(self.angular_weight)
    }

    /// Instantaneous classification of one sample, ignoring duration
    ///
    /// Useful for per-sample telemetry; the authoritative state comes
    /// from [`Self::classify`], which adds the sustained-duration rule.
    pub fn classify_sample(&self, sample: &MotionSample) -> MotionStatus {
        let magnitude = self.magnitude(sample);
        let angular = sample.rotation_rate.norm();

        if magnitude > self.motion_threshold * self.high_motion_multiplier
            || angular > self.angular_threshold * self.high_motion_multiplier
        {
            MotionStatus::HighMotion
        } else if magnitude < self.motion_threshold && angular < self.angular_threshold {
            MotionStatus::Stable
        } else {
            MotionStatus::LowMotion
        }
    }

    /// Classify the device state from the rolling history
    ///
    /// Empty history is `Unknown`, never an error. The latest sample
    /// drives the instantaneous state; `Stable` is only confirmed once
    /// every sample within the stability window is itself quiet AND the
    /// window actually spans the configured duration - before that the
    /// device is still `LowMotion`.
    pub fn classify<const N: usize>(&self, history: &MotionHistory<N>) -> MotionStatus {
        let last = match history.last() {
            Some(last) => last,
            None => return MotionStatus::Unknown,
        };

        let instantaneous = self.classify_sample(last);
        if instantaneous != MotionStatus::Stable {
            return instantaneous;
        }

        if history.span_ms() < self.stability_duration_ms {
            return MotionStatus::LowMotion;
        }

        let sustained = history
            .samples_within(self.stability_duration_ms)
            .all(|s| self.classify_sample(s) == MotionStatus::Stable);

        if sustained {
            MotionStatus::Stable
        } else {
            MotionStatus::LowMotion
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vec3;

    fn classifier() -> StabilityClassifier {
        StabilityClassifier::new(0.15, 0.5, 0.1, 2.0, 500)
    }

    fn quiet(t: u64) -> MotionSample {
        MotionSample::at_rest(t)
    }

    fn moving(t: u64, accel: f32) -> MotionSample {
        MotionSample {
            user_acceleration: Vec3::new(accel, 0.0, 0.0),
            ..MotionSample::at_rest(t)
        }
    }

    #[test]
    fn empty_history_is_unknown() {
        let history: MotionHistory<8> = MotionHistory::new();
        assert_eq!(classifier().classify(&history), MotionStatus::Unknown);
    }

    #[test]
    fn instantaneous_thresholds() {
        let c = classifier();

        assert_eq!(c.classify_sample(&quiet(0)), MotionStatus::Stable);
        assert_eq!(c.classify_sample(&moving(0, 0.2)), MotionStatus::LowMotion);
        assert_eq!(c.classify_sample(&moving(0, 0.5)), MotionStatus::HighMotion);
    }

    #[test]
    fn pure_spin_is_not_stable() {
        let c = classifier();

        let spinning = MotionSample {
            rotation_rate: Vec3::new(0.0, 0.0, 0.8),
            ..MotionSample::at_rest(0)
        };

        // Combined magnitude is only 0.08, but the angular term alone
        // exceeds the angular threshold
        assert_ne!(c.classify_sample(&spinning), MotionStatus::Stable);
    }

    #[test]
    fn stability_requires_sustained_quiet() {
        let c = classifier();
        let mut history: MotionHistory<64> = MotionHistory::new();

        // 200 ms of quiet: not enough span yet
        for t in (0..=200).step_by(50) {
            history.push(quiet(t));
        }
        assert_eq!(c.classify(&history), MotionStatus::LowMotion);

        // Quiet through 600 ms: now sustained
        for t in (250..=600).step_by(50) {
            history.push(quiet(t));
        }
        assert_eq!(c.classify(&history), MotionStatus::Stable);
    }

    #[test]
    fn recent_shake_blocks_stability() {
        let c = classifier();
        let mut history: MotionHistory<64> = MotionHistory::new();

        for t in (0..=400).step_by(50) {
            history.push(quiet(t));
        }
        history.push(moving(450, 0.4));
        history.push(quiet(500));
        history.push(quiet(700));

        // The shake at t=450 is still inside the 500 ms window of t=700
        assert_eq!(c.classify(&history), MotionStatus::LowMotion);
    }
}
