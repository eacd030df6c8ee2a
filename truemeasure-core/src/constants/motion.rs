//! Motion Thresholds and Compensation Scale Factors
//!
//! This module defines the stability classification thresholds and the
//! empirical error-model coefficients used by the compensation stages.

// ===== STABILITY CLASSIFICATION =====

/// Motion magnitude threshold for the stable state (m/s²-equivalent).
///
/// Magnitude below this classifies the device as stable. Combined
/// magnitude is ‖linear acceleration‖ + angular weight x ‖rotation rate‖.
///
/// Source: handheld capture sessions; typical hand tremor sits near
/// 0.05-0.10 m/s² when deliberately holding still
pub const MOTION_THRESHOLD: f32 = 0.15;

/// Weight applied to angular rate in the combined motion magnitude.
///
/// Angular motion affects measurement error less per unit than
/// translation at short range, so it is weighted down. Empirical policy
/// constant; stays configurable.
pub const ANGULAR_WEIGHT: f32 = 0.1;

/// Angular rate threshold for stability (rad/s).
///
/// A pure rotation can keep the combined magnitude low while still
/// smearing a measurement, so the rotation rate is also checked on its
/// own against this limit.
pub const ANGULAR_THRESHOLD: f32 = 0.5;

/// Multiplier over the motion threshold that classifies high motion.
///
/// Between 1x and 2x the threshold the device is in low motion; above
/// 2x it is in high motion. Empirical policy constant.
pub const HIGH_MOTION_MULTIPLIER: f32 = 2.0;

/// Time the device must stay below threshold before it counts as stable (ms).
pub const STABILITY_DURATION_MS: u64 = 500;

// ===== SAMPLING =====

/// Recommended motion sampling rate (Hz).
///
/// The engine consumes whatever rate the sensor feed delivers; this is
/// the rate the defaults are tuned for.
pub const SAMPLE_RATE_HZ: u32 = 60;

/// Nominal interval between motion samples at the recommended rate (ms).
pub const NOMINAL_SAMPLE_INTERVAL_MS: f32 = 1000.0 / SAMPLE_RATE_HZ as f32;

/// Maximum age gap between a measurement and its matched motion sample (ms).
///
/// Beyond this the engine falls back to the at-rest motion frame with
/// capped confidence instead of compensating against stale motion data.
pub const SAMPLE_GAP_MAX_MS: u64 = 250;

/// Time window of motion history consulted by readers (ms).
///
/// The ring buffer holds up to its capacity in samples; reads are
/// additionally bounded to this window.
pub const HISTORY_WINDOW_MS: u64 = 10_000;

// ===== COMPENSATION ERROR MODEL =====

/// Linear stage scale factor (seconds², dimensionally).
///
/// Motion-induced error ≈ acceleration magnitude x sensor distance x this
/// factor. Calibrated against ranging error observed while translating a
/// handheld depth sensor.
pub const LINEAR_ERROR_SCALE: f32 = 0.001;

/// Angular stage scale factor (seconds, dimensionally).
///
/// Rotation-induced error ≈ angular rate magnitude x measured value x
/// this factor; rotational error scales with the measured quantity
/// itself, not the sensor distance, since it is an angular displacement
/// of the reference frame.
pub const ANGULAR_ERROR_SCALE: f32 = 0.002;

/// Predictive stage gain applied to predicted speed over the horizon.
pub const PREDICTIVE_ERROR_SCALE: f32 = 0.5;

/// Default prediction horizon for the predictive stage (ms).
pub const PREDICTION_HORIZON_MS: u32 = 100;

/// Confidence decay per sampling interval of prediction horizon.
///
/// Prediction confidence falls linearly: one sampling interval of
/// lookahead costs this much confidence. At the recommended 60 Hz the
/// default 100 ms horizon spans six intervals and costs ~5%, keeping a
/// quiet device above the high-confidence bar while still penalizing
/// long extrapolations.
pub const PREDICTION_DECAY_PER_INTERVAL: f32 = 0.008;

/// Floor for prediction confidence so a long horizon degrades instead of
/// zeroing out the predictive stage entirely.
pub const PREDICTION_CONFIDENCE_FLOOR: f32 = 0.05;

/// Adaptive stage cap on total applied correction, as a multiple of the
/// compensation accuracy target.
///
/// Corrections beyond the cap are clamped back toward the raw value and
/// the confidence is reduced; a correction that large means the error
/// model is outside its valid regime.
pub const ADAPTIVE_CORRECTION_CAP_FACTOR: f32 = 100.0;

/// Confidence penalty factor applied when the adaptive cap engages.
pub const ADAPTIVE_CLAMP_PENALTY: f32 = 0.9;

// ===== PHYSICAL ENVIRONMENT =====

/// Standard gravity (m/s²), used by the at-rest fallback motion frame.
pub const STANDARD_GRAVITY: f32 = 9.80665;
