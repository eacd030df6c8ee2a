//! Statistical Outlier Validator
//!
//! Third validator in the registry: standard-score (z-score) deviation of
//! a measurement against the rolling window of recently accepted
//! same-kind values. Where the consistency validator asks "does this
//! agree with the *last* reading", this one asks "does this belong to the
//! *population* of recent readings at all".
//!
//! Thresholds follow statistical process control: past 2σ the reading is
//! suspicious (warning), past 3σ it is rejected as an outlier (major
//! fault). The standard deviation is floored so a run of identical values
//! cannot manufacture infinite z-scores out of rounding noise.
//!
//! A thin window (fewer than four accepted values) yields a clean verdict
//! - the variance estimate would be too noisy to reject anything.

use crate::constants::quality::{OUTLIER_MIN_SAMPLES, OUTLIER_REJECT_SIGMA, OUTLIER_WARN_SIGMA};
use crate::validation::{FaultSeverity, ValidationInput, ValidatorVerdict, ValueWindow};

/// Reported as the fault source
const SOURCE: &str = "outlier";

/// Relative floor on the standard deviation (fraction of |mean|)
const RELATIVE_SIGMA_FLOOR: f32 = 0.01;

/// Absolute floor on the standard deviation
const ABSOLUTE_SIGMA_FLOOR: f32 = 1e-4;

/// Population-deviation scoring over the value window
#[derive(Debug, Clone, Default)]
pub struct OutlierValidator;

impl OutlierValidator {
    /// Create the validator
    pub fn new() -> Self {
        Self
    }

    /// Check one measurement against the kind's value window
    pub(crate) fn check(
        &self,
        input: &ValidationInput<'_>,
        window: &ValueWindow,
    ) -> ValidatorVerdict {
        if window.len() < OUTLIER_MIN_SAMPLES {
            return ValidatorVerdict::clean(1.0);
        }

        let (mean, sigma) = match window.statistics() {
            Some(stats) => stats,
            None => return ValidatorVerdict::clean(1.0),
        };

        let sigma_floor = sigma
            .max(RELATIVE_SIGMA_FLOOR * libm::fabsf(mean))
            .max(ABSOLUTE_SIGMA_FLOOR);
        let z = libm::fabsf(input.value - mean) / sigma_floor;

        let mut verdict = ValidatorVerdict::clean(1.0);

        if z >= OUTLIER_REJECT_SIGMA {
            verdict.fault(
                SOURCE,
                FaultSeverity::Major,
                "measurement is a statistical outlier",
                0.3,
            );
        } else if z >= OUTLIER_WARN_SIGMA {
            verdict.warn(SOURCE, "measurement deviates from recent population", 0.9);
        }

        verdict
    }
}
