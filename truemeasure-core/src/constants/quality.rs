//! Validation Score Thresholds and Calibration Policy
//!
//! This module defines the quality-gate scoring thresholds and the
//! calibration lifecycle policy.

// ===== VALIDATION THRESHOLDS =====

/// Minimum precision score a measurement needs to be valid.
///
/// The gate's aggregate precision is the minimum across validators; a
/// measurement passing every validator but scoring below this is still
/// rejected.
///
/// Source: acceptance threshold of the original capture pipeline
pub const MIN_PRECISION_THRESHOLD: f32 = 0.9;

/// Deviation (in sigma) at which the outlier validator emits a warning.
///
/// Source: statistical process control (2σ)
pub const OUTLIER_WARN_SIGMA: f32 = 2.0;

/// Deviation (in sigma) at which the outlier validator reports an error.
///
/// Source: statistical process control (3σ)
pub const OUTLIER_REJECT_SIGMA: f32 = 3.0;

/// Minimum samples in a value window before outlier statistics apply.
///
/// Below this the variance estimate is too noisy to reject anything.
pub const OUTLIER_MIN_SAMPLES: usize = 4;

/// Minimum samples in a value window before consistency checks apply.
pub const CONSISTENCY_MIN_SAMPLES: usize = 3;

/// Window within which consecutive same-kind measurements are treated as
/// re-measurements of the same target (ms).
pub const CONSISTENCY_WINDOW_MS: u64 = 2_000;

/// Relative deviation from the previous reading that triggers a
/// consistency warning.
pub const CONSISTENCY_WARN_RATIO: f32 = 0.05;

// ===== CONFIDENCE LEVELS =====

/// Confidence reported when a measurement had to fall back to the
/// at-rest motion frame because no sample was close enough in time.
pub const GAP_FALLBACK_CONFIDENCE: f32 = 0.3;

/// High confidence threshold.
///
/// Source: statistical confidence intervals (95%)
pub const CONFIDENCE_HIGH: f32 = 0.95;

/// Low confidence threshold, minimum for data acceptance.
pub const CONFIDENCE_LOW: f32 = 0.5;

// ===== PLAUSIBILITY LIMITS =====

/// Smallest measurable distance (meters). Below sensor resolution.
pub const MIN_DISTANCE_M: f32 = 0.001;

/// Largest plausible indoor distance measurement (meters).
pub const MAX_DISTANCE_M: f32 = 50.0;

/// Largest plausible room-scale area (square meters).
pub const MAX_AREA_M2: f32 = 1_000.0;

/// Largest plausible room-scale volume (cubic meters).
pub const MAX_VOLUME_M3: f32 = 10_000.0;

/// Angle measurements are reported in degrees within [0, 180].
pub const MAX_ANGLE_DEG: f32 = 180.0;

// ===== CALIBRATION POLICY =====

/// Wall-clock age after which a calibration expires (ms). Default 24 h.
pub const CALIBRATION_EXPIRY_MS: u64 = 24 * 60 * 60 * 1000;

/// Rolling validation accuracy below which a calibration expires early.
pub const CALIBRATION_MIN_ROLLING_ACCURACY: f32 = 0.9;

/// Number of past calibrations retained for diagnostics.
pub const CALIBRATION_HISTORY_CAPACITY: usize = 10;

/// Conversion from estimated acceleration bias to precision offset
/// (meters per m/s²). Empirical; ties the stationary-bias estimate to
/// the point correction it implies at typical sensor distance.
pub const BIAS_TO_OFFSET_M: f32 = 0.001;

// ===== METRICS =====

/// Entries retained in the compensation and validation histories.
pub const METRICS_HISTORY_CAPACITY: usize = 64;

/// Default validation frequency (Hz) the session layer polls at.
pub const VALIDATION_FREQUENCY_HZ: u32 = 10;
