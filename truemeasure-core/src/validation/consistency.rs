//! Temporal Consistency Validator
//!
//! Second validator in the registry: compares a measurement against the
//! immediately preceding accepted value of the same kind. Two same-kind
//! measurements taken within a couple of seconds are overwhelmingly
//! re-measurements of the same target, so a large relative jump between
//! them points at tracking drift or a mis-aimed capture.
//!
//! Deviation findings are advisory (warnings): a user genuinely measuring
//! a different wall two seconds later did nothing wrong. Only the
//! precision score carries the doubt, and only an extreme jump pushes it
//! below the validity threshold.
//!
//! A cold window (no recent same-kind value) is a normal condition, not a
//! validator failure - the verdict is clean at full precision.

use crate::constants::quality::{
    CONSISTENCY_MIN_SAMPLES, CONSISTENCY_WARN_RATIO, CONSISTENCY_WINDOW_MS,
};
use crate::validation::{ValidationInput, ValidatorVerdict, ValueWindow};

/// Reported as the fault source
const SOURCE: &str = "consistency";

/// Re-measurement agreement scoring
#[derive(Debug, Clone, Default)]
pub struct ConsistencyValidator;

impl ConsistencyValidator {
    /// Create the validator
    pub fn new() -> Self {
        Self
    }

    /// Check one measurement against the kind's value window
    ///
    /// Relative deviation from the previous accepted value maps to a
    /// stepped precision score: within the warn ratio is clean, up to 3x
    /// the ratio warns at 0.92 (still valid), beyond that the score drops
    /// to 0.8 and the measurement fails the precision threshold.
    pub(crate) fn check(
        &self,
        input: &ValidationInput<'_>,
        window: &ValueWindow,
    ) -> ValidatorVerdict {
        if window.len() < CONSISTENCY_MIN_SAMPLES {
            return ValidatorVerdict::clean(1.0);
        }

        let previous = match window.last() {
            Some(previous) => previous,
            None => return ValidatorVerdict::clean(1.0),
        };

        let age_ms = input.timestamp.saturating_sub(previous.timestamp);
        if age_ms > CONSISTENCY_WINDOW_MS {
            // Too long ago to assume the same target
            return ValidatorVerdict::clean(1.0);
        }

        let reference = libm::fabsf(previous.value).max(1e-3);
        let deviation = libm::fabsf(input.value - previous.value) / reference;

        let mut verdict = ValidatorVerdict::clean(1.0);

        if deviation > 3.0 * CONSISTENCY_WARN_RATIO {
            verdict.warn(
                SOURCE,
                "measurement deviates sharply from the previous reading",
                0.8,
            );
        } else if deviation > CONSISTENCY_WARN_RATIO {
            verdict.warn(
                SOURCE,
                "measurement deviates from the previous reading",
                0.92,
            );
        }

        verdict
    }
}
