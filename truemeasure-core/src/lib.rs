//! Motion-compensated precision measurement engine for TrueMeasure
//!
//! Takes raw device-motion samples and raw geometric measurements and
//! produces measurements corrected for device motion, with a calibrated
//! confidence and accuracy classification.
//!
//! Key constraints:
//! - No heap allocation in the measurement path
//! - Deterministic, bit-reproducible compensation
//! - Conservative confidence: never increased through a chain
//!
//! ```no_run
//! use truemeasure_core::{PrecisionEngine, PrecisionConfig, MotionSample, Vec3};
//!
//! let mut engine = PrecisionEngine::new(PrecisionConfig::default());
//! engine.start();
//!
//! // Feed the 60 Hz motion callback into the engine
//! engine.ingest(MotionSample::at_rest(1000));
//!
//! // Measure, compensated against the rolling motion history
//! match engine.measure_distance(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 1.5, 1000) {
//!     Ok(m) => {} // m.value(), m.validation, m.assessment
//!     Err(e) => {} // degenerate input only
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod accuracy;
pub mod buffer;
pub mod calibration;
pub mod compensation;
pub mod confidence;
pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod geometry;
pub mod measurement;
pub mod metrics;
pub mod motion;
pub mod time;
pub mod validation;
pub mod vector;

// Public API
pub use accuracy::{AccuracyAssessment, AccuracyClass};
pub use calibration::{CalibrationData, CalibrationManager, CalibrationState};
pub use compensation::{CompensatedValue, CompensationStage};
pub use confidence::Confidence;
pub use config::PrecisionConfig;
pub use engine::PrecisionEngine;
pub use errors::{MeasurementError, MeasurementResult};
pub use measurement::{CompensatedMeasurement, MeasurementKind, RawMeasurement};
pub use motion::{MotionHistory, MotionSample, MotionStatus, PredictedMotion};
pub use validation::{
    MeasurementValidation, TrackingFrame, TrackingQuality, TrackingState,
    TrackingValidationResult,
};
pub use vector::{Quaternion, Vec3};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
