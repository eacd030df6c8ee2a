//! Accuracy Class Bounds and Assessment Mapping
//!
//! The four accuracy classes bucket an estimated error bound into the
//! tiers the session layer displays. The ranges are fixed and
//! non-overlapping; the gap between 2 mm and 1 cm reflects real sensor
//! capability clusters (depth sensors either resolve low millimeters or
//! centimeters, with little in between) and is intentional.

// ===== ACCURACY CLASS BOUNDS (meters) =====

/// Upper bound of the sub-millimeter class: error < 1 mm.
pub const SUB_MILLIMETER_BOUND_M: f32 = 0.001;

/// Upper bound of the millimeter class: 1 mm <= error <= 2 mm.
pub const MILLIMETER_BOUND_M: f32 = 0.002;

/// Lower bound of the centimeter class: 1 cm.
///
/// Bounds between [`MILLIMETER_BOUND_M`] and this value fall in the
/// intentional capability gap and classify into the centimeter class.
pub const CENTIMETER_LOWER_BOUND_M: f32 = 0.01;

/// Upper bound of the centimeter class: error <= 5 cm.
pub const CENTIMETER_BOUND_M: f32 = 0.05;

// Decimeter class is unbounded above: anything past 5 cm.

// ===== ASSESSMENT MAPPING =====

/// Default compensation accuracy target (meters).
///
/// The error budget the compensation stages normalize their confidence
/// against, and the base of the assessed error bound.
pub const ACCURACY_TARGET_M: f32 = 0.001;

/// Fraction of the accuracy target recovered by fully effective
/// compensation.
///
/// With effectiveness 1.0 the assessed bound shrinks to
/// `(1 - this) x target`; compensation never claims to erase the whole
/// budget.
pub const EFFECTIVENESS_RECOVERY: f32 = 0.9;

/// Residual motion to error-bound conversion (meters per m/s²-equivalent).
///
/// Uncompensated motion at the moment of capture widens the assessed
/// bound linearly by this factor.
pub const RESIDUAL_ERROR_SCALE_M: f32 = 0.01;
