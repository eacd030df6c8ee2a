//! Precision Validator
//!
//! First validator in the registry: numeric sanity plus a precision score
//! derived from the measurement's motion-derived confidence. A value that
//! is not even a finite number can short-circuit everything downstream
//! with a critical fault; beyond that, precision tracks how much the
//! compensation chain trusted its own correction.

use crate::validation::{FaultSeverity, ValidationInput, ValidatorVerdict};

/// Reported as the fault source
const SOURCE: &str = "precision";

/// Numeric sanity and confidence-derived precision scoring
#[derive(Debug, Clone, Default)]
pub struct PrecisionValidator;

impl PrecisionValidator {
    /// Create the validator
    pub fn new() -> Self {
        Self
    }

    /// Check one measurement
    ///
    /// Precision maps confidence through `0.5 + 0.5 x confidence`: full
    /// confidence scores 1.0, zero confidence bottoms out at 0.5 so that
    /// low motion trust alone degrades - but does not obliterate - the
    /// aggregate score the way a hard fault does.
    pub fn check(&self, input: &ValidationInput<'_>) -> ValidatorVerdict {
        if !input.value.is_finite() {
            let mut verdict = ValidatorVerdict::clean(0.0);
            verdict.fault(
                SOURCE,
                FaultSeverity::Critical,
                "measurement value is not a finite number",
                0.0,
            );
            return verdict;
        }

        let confidence = input.confidence.as_float();
        let mut verdict = ValidatorVerdict::clean(0.5 + 0.5 * confidence);

        if input.confidence.is_critical() {
            verdict.warn(
                SOURCE,
                "motion confidence critically low",
                verdict.precision,
            );
        }

        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confidence::Confidence;
    use crate::measurement::MeasurementKind;

    fn input(value: f32, confidence: f32) -> ValidationInput<'static> {
        ValidationInput {
            kind: MeasurementKind::Distance,
            value,
            points: &[],
            confidence: Confidence::from_float(confidence),
            timestamp: 1000,
        }
    }

    #[test]
    fn full_confidence_scores_full_precision() {
        let verdict = PrecisionValidator::new().check(&input(2.0, 1.0));

        assert!(verdict.faults.is_empty());
        assert!((verdict.precision - 1.0).abs() < 0.01);
    }

    #[test]
    fn non_finite_value_is_critical() {
        let validator = PrecisionValidator::new();

        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let verdict = validator.check(&input(bad, 1.0));
            assert_eq!(verdict.precision, 0.0);
            assert_eq!(verdict.faults.len(), 1);
            assert_eq!(verdict.faults[0].severity, FaultSeverity::Critical);
        }
    }

    #[test]
    fn low_confidence_degrades_precision() {
        let validator = PrecisionValidator::new();

        let trusted = validator.check(&input(2.0, 0.95));
        let shaky = validator.check(&input(2.0, 0.4));

        assert!(trusted.precision > shaky.precision);
        assert!(shaky.precision >= 0.5);
    }

    #[test]
    fn critically_low_confidence_warns() {
        let verdict = PrecisionValidator::new().check(&input(2.0, 0.001));

        assert!(verdict.faults.is_empty());
        assert_eq!(verdict.warnings.len(), 1);
    }
}
