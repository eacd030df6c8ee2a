//! AR Tracking Validator
//!
//! ## Overview
//!
//! The AR session feeds per-frame pose and tracking state into the engine;
//! this validator judges whether that tracking is trustworthy enough to
//! measure against. It cross-checks two independent witnesses of device
//! movement - the AR pose deltas and the inertial motion history - the
//! same way the gate cross-checks validators: disagreement is evidence of
//! drift.
//!
//! The validator never mutates the AR session; the frame is an opaque
//! snapshot. Deeper tracking-loss analyses (relocalization forecasting,
//! feature-map health) are intentionally out of scope - only the
//! consistency/stability contract is implemented.

use heapless::Vec;

use crate::motion::{MotionHistory, MotionStatus, StabilityClassifier};
use crate::time::Timestamp;
use crate::vector::Vec3;

/// Why tracking is degraded, as reported by the AR session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackingLimitation {
    /// Session is still initializing
    Initializing,
    /// Device is moving too fast for feature tracking
    ExcessiveMotion,
    /// Scene has too few visual features
    InsufficientFeatures,
    /// Session is relocalizing after an interruption
    Relocalizing,
}

/// Tracking state reported by the AR session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackingState {
    /// Full-quality tracking
    Normal,
    /// Degraded tracking with a reason
    Limited(TrackingLimitation),
    /// No tracking available
    NotAvailable,
}

/// One opaque AR frame snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackingFrame {
    /// Frame timestamp (ms)
    pub timestamp: Timestamp,
    /// Camera/device position in world space (meters)
    pub position: Vec3,
    /// Tracking state the session reported for this frame
    pub state: TrackingState,
}

/// Overall tracking quality tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackingQuality {
    /// Measure freely
    Good,
    /// Measure, but expect coarser accuracy
    Acceptable,
    /// Measurements will be unreliable
    Poor,
    /// Do not measure
    Unusable,
}

/// Specific problems found during tracking validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackingIssue {
    /// The session reports no tracking at all
    TrackingUnavailable,
    /// The session reports degraded tracking
    LimitedTracking,
    /// AR pose movement disagrees with inertial motion
    PoseMotionMismatch,
    /// The device itself is moving too much to measure
    HighDeviceMotion,
}

/// Verdict over one AR frame
#[derive(Debug, Clone)]
pub struct TrackingValidationResult {
    /// Overall tier
    pub quality: TrackingQuality,
    /// Pose-vs-inertial agreement, [0, 1]
    pub consistency_score: f32,
    /// Device stillness, [0, 1]
    pub stability_score: f32,
    /// Specific problems found
    pub issues: Vec<TrackingIssue, 4>,
}

/// Plausible device speed per motion status (m/s), for pose cross-check
fn expected_speed_limit(status: MotionStatus) -> f32 {
    match status {
        MotionStatus::Stable => 0.1,
        MotionStatus::LowMotion => 0.5,
        MotionStatus::HighMotion => 2.0,
        MotionStatus::Unknown => 1.0,
    }
}

/// Cross-checks AR frames against the inertial motion history
#[derive(Debug, Clone, Default)]
pub struct TrackingValidator {
    /// Previous frame, for pose-delta computation
    last_frame: Option<TrackingFrame>,
}

impl TrackingValidator {
    /// Create a validator with no frame history
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate one AR frame against the motion history
    ///
    /// The stability score derives from the classifier's state; the
    /// consistency score compares the frame-to-frame pose speed with the
    /// speed the inertial state makes plausible. The first frame has no
    /// delta to judge and scores a neutral 0.5 consistency.
    pub fn validate<const N: usize>(
        &mut self,
        frame: &TrackingFrame,
        history: &MotionHistory<N>,
        classifier: &StabilityClassifier,
    ) -> TrackingValidationResult {
        let mut issues: Vec<TrackingIssue, 4> = Vec::new();

        let status = classifier.classify(history);
        let stability_score = match status {
            MotionStatus::Stable => 1.0,
            MotionStatus::LowMotion => 0.7,
            MotionStatus::Unknown => 0.5,
            MotionStatus::HighMotion => {
                let _ = issues.push(TrackingIssue::HighDeviceMotion);
                0.3
            }
        };

        if frame.state == TrackingState::NotAvailable {
            let _ = issues.push(TrackingIssue::TrackingUnavailable);
            self.last_frame = Some(*frame);
            return TrackingValidationResult {
                quality: TrackingQuality::Unusable,
                consistency_score: 0.0,
                stability_score,
                issues,
            };
        }

        if matches!(frame.state, TrackingState::Limited(_)) {
            let _ = issues.push(TrackingIssue::LimitedTracking);
        }

        let mut consistency_score: f32 = match self.last_frame {
            Some(last) if frame.timestamp > last.timestamp => {
                let dt_s = (frame.timestamp - last.timestamp) as f32 / 1000.0;
                let observed_speed = (frame.position - last.position).norm() / dt_s;
                let limit = expected_speed_limit(status);

                if observed_speed <= limit {
                    1.0
                } else if observed_speed <= 2.0 * limit {
                    let _ = issues.push(TrackingIssue::PoseMotionMismatch);
                    0.7
                } else {
                    let _ = issues.push(TrackingIssue::PoseMotionMismatch);
                    0.4
                }
            }
            // First frame, or a stalled clock: nothing to compare
            _ => 0.5,
        };

        if matches!(frame.state, TrackingState::Limited(_)) {
            consistency_score = consistency_score.min(0.6);
        }

        self.last_frame = Some(*frame);

        let combined = (consistency_score + stability_score) / 2.0;
        let quality = if combined >= 0.85 {
            TrackingQuality::Good
        } else if combined >= 0.65 {
            TrackingQuality::Acceptable
        } else if combined >= 0.4 {
            TrackingQuality::Poor
        } else {
            TrackingQuality::Unusable
        };

        TrackingValidationResult {
            quality,
            consistency_score,
            stability_score,
            issues,
        }
    }
}
