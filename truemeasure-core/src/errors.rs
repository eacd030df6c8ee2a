//! Error Types for Measurement and Geometry Failures
//!
//! ## Design Philosophy
//!
//! TrueMeasure's error system follows the same constraints as the rest of
//! the core:
//!
//! 1. **Small Size**: Each variant stays minimal (12-16 bytes) since errors
//!    are returned from hot measurement paths.
//!
//! 2. **No Heap Allocation**: All error data is inline - no String, only
//!    `&'static str` for messages. Memory usage stays deterministic.
//!
//! 3. **Copy Semantics**: Errors implement Copy so they can be returned and
//!    stored without move complications.
//!
//! ## What Is an Error Here
//!
//! Only truly invalid input is an error: degenerate geometry (too few
//! points, zero-length vectors), non-finite values, and lifecycle misuse
//! (compensating through a stopped engine). Expected degraded conditions -
//! a sensor gap around a measurement timestamp, stale calibration, low
//! confidence - are carried as data inside the structured result types
//! ([`MeasurementValidation`](crate::validation::MeasurementValidation),
//! [`AccuracyAssessment`](crate::accuracy::AccuracyAssessment)) and never
//! surface as `Err`.

use thiserror_no_std::Error;

/// Result type for measurement operations
pub type MeasurementResult<T> = Result<T, MeasurementError>;

/// Measurement errors - kept small for hot-path returns
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MeasurementError {
    /// Value makes no numerical sense (NaN, infinity)
    #[error("Invalid value: not a finite number")]
    InvalidValue,

    /// Not enough points for the requested geometric computation
    #[error("Insufficient points: need {required}, have {available}")]
    InsufficientPoints {
        /// Minimum number of points the primitive requires
        required: usize,
        /// Actual number of points supplied
        available: usize,
    },

    /// Geometry that cannot be measured (zero-length arms, coincident points)
    #[error("Degenerate geometry: {reason}")]
    DegenerateGeometry {
        reason: &'static str,
    },

    /// More points than the bounded measurement buffers can hold
    #[error("Too many points: limit {limit}, got {given}")]
    TooManyPoints {
        /// Maximum points a single measurement accepts
        limit: usize,
        /// Actual number of points supplied
        given: usize,
    },

    /// Value outside the physically plausible range for its measurement kind
    #[error("Value {value} outside range [{min}, {max}]")]
    OutOfRange {
        /// The measured value that failed the check
        value: f32,
        /// Minimum plausible value
        min: f32,
        /// Maximum plausible value
        max: f32,
    },

    /// Engine method called outside the start/stop lifecycle
    #[error("Engine is not running")]
    NotRunning,
}

#[cfg(feature = "defmt")]
impl defmt::Format for MeasurementError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidValue =>
                defmt::write!(fmt, "Invalid value"),
            Self::InsufficientPoints { required, available } =>
                defmt::write!(fmt, "Need {} points, have {}", required, available),
            Self::DegenerateGeometry { reason } =>
                defmt::write!(fmt, "Degenerate geometry: {}", reason),
            Self::TooManyPoints { limit, given } =>
                defmt::write!(fmt, "Too many points: limit {}, got {}", limit, given),
            Self::OutOfRange { value, min, max } =>
                defmt::write!(fmt, "Value {} outside [{}, {}]", value, min, max),
            Self::NotRunning =>
                defmt::write!(fmt, "Engine not running"),
        }
    }
}
