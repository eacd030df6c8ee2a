//! Accuracy Classification and Assessment
//!
//! ## Overview
//!
//! After compensation, every measurement gets an [`AccuracyAssessment`]:
//! an estimated error bound in meters, a confidence score, a boolean
//! "meets the session's requirement" flag, and a discrete
//! [`AccuracyClass`]. The session layer renders the class directly
//! ("sub-millimeter", "millimeter", ...), so the assessment must never be
//! partially populated - on any internal uncertainty the assessor defaults
//! to the most conservative classification.
//!
//! ## Class Ranges
//!
//! The four classes use fixed, non-overlapping bound ranges:
//!
//! ```text
//! sub-millimeter   error <  1 mm
//! millimeter       1 mm <= error <= 2 mm
//! centimeter       1 cm <= error <= 5 cm
//! decimeter        error >  5 cm
//! ```
//!
//! The gap between 2 mm and 1 cm is intentional: depth sensors cluster
//! either in the low-millimeter or the centimeter regime, with little in
//! between. Bounds that land inside the gap classify into the centimeter
//! class (the coarser neighbor) - the gap must not be "fixed" by widening
//! either range.

use crate::confidence::Confidence;
use crate::constants::accuracy::{
    SUB_MILLIMETER_BOUND_M, MILLIMETER_BOUND_M, CENTIMETER_BOUND_M,
    EFFECTIVENESS_RECOVERY, RESIDUAL_ERROR_SCALE_M,
};

/// Discrete accuracy tier for an estimated error bound
///
/// Ordered from finest to coarsest; derived ordering lets callers compare
/// achieved vs. required classes directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AccuracyClass {
    /// Error below 1 mm
    SubMillimeter,
    /// Error between 1 mm and 2 mm
    Millimeter,
    /// Error between 1 cm and 5 cm
    Centimeter,
    /// Error above 5 cm
    Decimeter,
}

impl AccuracyClass {
    /// Upper error bound of this class in meters
    ///
    /// The decimeter class is unbounded above, so any bound satisfies a
    /// decimeter requirement.
    pub fn upper_bound_m(&self) -> f32 {
        match self {
            Self::SubMillimeter => SUB_MILLIMETER_BOUND_M,
            Self::Millimeter => MILLIMETER_BOUND_M,
            Self::Centimeter => CENTIMETER_BOUND_M,
            Self::Decimeter => f32::INFINITY,
        }
    }

    /// Classify an error bound in meters
    ///
    /// Bounds inside the intentional 2 mm-1 cm gap classify as
    /// `Centimeter`. Non-finite bounds classify as `Decimeter` - the
    /// conservative default.
    pub fn for_error_bound(bound_m: f32) -> Self {
        if !bound_m.is_finite() || bound_m < 0.0 {
            return Self::Decimeter;
        }

        if bound_m < SUB_MILLIMETER_BOUND_M {
            Self::SubMillimeter
        } else if bound_m <= MILLIMETER_BOUND_M {
            Self::Millimeter
        } else if bound_m <= CENTIMETER_BOUND_M {
            Self::Centimeter
        } else {
            Self::Decimeter
        }
    }

    /// Human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SubMillimeter => "sub-millimeter",
            Self::Millimeter => "millimeter",
            Self::Centimeter => "centimeter",
            Self::Decimeter => "decimeter",
        }
    }
}

/// Accuracy assessment for a compensated measurement
///
/// Derived, not stored authoritatively - recomputed on every validation
/// cycle from the current compensation result and motion frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccuracyAssessment {
    /// Estimated error bound in meters
    pub error_bound_m: f32,
    /// Confidence in the assessment
    pub confidence: Confidence,
    /// Whether the bound satisfies the session's required class
    pub meets_requirement: bool,
    /// Discrete classification of the bound
    pub class: AccuracyClass,
}

impl AccuracyAssessment {
    /// Fully conservative assessment: decimeter class, zero confidence
    ///
    /// Returned whenever the assessor cannot trust its inputs; the session
    /// layer then shows the worst tier rather than an optimistic guess.
    pub fn conservative(required: AccuracyClass) -> Self {
        Self {
            error_bound_m: f32::INFINITY,
            confidence: Confidence::ZERO,
            meets_requirement: required == AccuracyClass::Decimeter,
            class: AccuracyClass::Decimeter,
        }
    }
}

/// Maps compensation effectiveness and residual motion to an assessment
#[derive(Debug, Clone)]
pub struct AccuracyAssessor {
    /// Compensation accuracy target in meters (error budget base)
    accuracy_target_m: f32,
    /// Accuracy class the session requires
    required: AccuracyClass,
}

impl AccuracyAssessor {
    /// Create an assessor for a target budget and required class
    pub fn new(accuracy_target_m: f32, required: AccuracyClass) -> Self {
        Self {
            accuracy_target_m: accuracy_target_m.max(0.0),
            required,
        }
    }

    /// Required accuracy class
    pub fn required(&self) -> AccuracyClass {
        self.required
    }

    /// Assess a compensation outcome
    ///
    /// `effectiveness` is the fraction of the modeled motion error the
    /// pipeline actually corrected (0-1); `residual_motion` is the
    /// combined motion magnitude of the matched frame. The estimated
    /// bound starts from the accuracy target, shrinks with effectiveness,
    /// and widens linearly with residual motion:
    ///
    /// ```text
    /// bound = target x (1 - recovery x effectiveness)
    ///       + residual x residual_scale
    /// ```
    ///
    /// Non-finite inputs yield the conservative assessment.
    pub fn assess(
        &self,
        effectiveness: f32,
        residual_motion: f32,
        confidence: Confidence,
    ) -> AccuracyAssessment {
        if !effectiveness.is_finite() || !residual_motion.is_finite() {
            return AccuracyAssessment::conservative(self.required);
        }

        let effectiveness = effectiveness.max(0.0).min(1.0);
        let residual = residual_motion.max(0.0);

        let bound = self.accuracy_target_m * (1.0 - EFFECTIVENESS_RECOVERY * effectiveness)
            + residual * RESIDUAL_ERROR_SCALE_M;

        let class = AccuracyClass::for_error_bound(bound);

        AccuracyAssessment {
            error_bound_m: bound,
            confidence,
            meets_requirement: bound <= self.required.upper_bound_m(),
            class,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_ordering_is_fine_to_coarse() {
        assert!(AccuracyClass::SubMillimeter < AccuracyClass::Millimeter);
        assert!(AccuracyClass::Millimeter < AccuracyClass::Centimeter);
        assert!(AccuracyClass::Centimeter < AccuracyClass::Decimeter);
    }

    #[test]
    fn classification_boundaries() {
        assert_eq!(AccuracyClass::for_error_bound(0.0005), AccuracyClass::SubMillimeter);
        assert_eq!(AccuracyClass::for_error_bound(0.0015), AccuracyClass::Millimeter);
        assert_eq!(AccuracyClass::for_error_bound(0.002), AccuracyClass::Millimeter);
        assert_eq!(AccuracyClass::for_error_bound(0.03), AccuracyClass::Centimeter);
        assert_eq!(AccuracyClass::for_error_bound(0.2), AccuracyClass::Decimeter);
    }

    #[test]
    fn gap_classifies_coarser() {
        // 5 mm sits in the intentional 2 mm-1 cm gap
        assert_eq!(AccuracyClass::for_error_bound(0.005), AccuracyClass::Centimeter);
    }

    #[test]
    fn invalid_bound_is_decimeter() {
        assert_eq!(AccuracyClass::for_error_bound(f32::NAN), AccuracyClass::Decimeter);
        assert_eq!(AccuracyClass::for_error_bound(-1.0), AccuracyClass::Decimeter);
    }

    #[test]
    fn stable_fully_compensated_measurement_is_fine_tier() {
        let assessor = AccuracyAssessor::new(0.001, AccuracyClass::Millimeter);

        let assessment = assessor.assess(1.0, 0.0, Confidence::from_float(0.97));

        // target x (1 - 0.9) = 0.1 mm
        assert!(assessment.error_bound_m < 0.001);
        assert_eq!(assessment.class, AccuracyClass::SubMillimeter);
        assert!(assessment.meets_requirement);
    }

    #[test]
    fn residual_motion_widens_bound() {
        let assessor = AccuracyAssessor::new(0.001, AccuracyClass::Millimeter);

        let calm = assessor.assess(1.0, 0.0, Confidence::FULL);
        let shaky = assessor.assess(1.0, 2.0, Confidence::FULL);

        assert!(shaky.error_bound_m > calm.error_bound_m);
        assert!(!shaky.meets_requirement);
    }

    #[test]
    fn conservative_assessment_on_bad_input() {
        let assessor = AccuracyAssessor::new(0.001, AccuracyClass::Millimeter);

        let assessment = assessor.assess(f32::NAN, 0.0, Confidence::FULL);

        assert_eq!(assessment.class, AccuracyClass::Decimeter);
        assert_eq!(assessment.confidence, Confidence::ZERO);
        assert!(!assessment.meets_requirement);
    }

    #[test]
    fn decimeter_requirement_always_met_by_conservative() {
        let assessment = AccuracyAssessment::conservative(AccuracyClass::Decimeter);
        assert!(assessment.meets_requirement);
    }
}
