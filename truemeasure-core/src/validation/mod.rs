//! Multi-Validator Quality Gate
//!
//! ## Overview
//!
//! Every produced measurement passes through one aggregation path fed by
//! four independent validators, run in fixed order:
//!
//! 1. **Precision** ([`precision`]): numeric sanity and motion-derived
//!    precision scoring.
//! 2. **Consistency** ([`consistency`]): agreement with the immediately
//!    preceding same-kind measurement (re-measurement drift).
//! 3. **Outlier** ([`outlier`]): statistical deviation from the recent
//!    same-kind value window.
//! 4. **Physical constraint** ([`physical`]): plausibility limits and
//!    degenerate-geometry rejection (negative areas, zero-length arms).
//!
//! ## Aggregation Rules
//!
//! - The gate's precision score is the **minimum** across validators -
//!   worst case, never an average. A single failing validator must not be
//!   diluted by three passing ones.
//! - Confidence comes from the measurement's own motion-derived
//!   confidence; quality is the mean of precision and confidence.
//! - `is_valid` requires zero error-severity faults AND precision at or
//!   above the configured minimum (0.9 default).
//! - Warnings never block validity; they are surfaced to the caller.
//! - A validator that cannot complete reports a Major/Critical fault -
//!   the aggregation excludes no validator's opinion.
//!
//! ## Closed Validator Set
//!
//! The validators form a closed set known at compile time, dispatched
//! through a fixed registry array - dynamic plugin dispatch would buy
//! nothing here.

pub mod precision;
pub mod consistency;
pub mod outlier;
pub mod physical;
pub mod tracking;

pub use tracking::{
    TrackingFrame, TrackingIssue, TrackingLimitation, TrackingQuality, TrackingState,
    TrackingValidationResult, TrackingValidator,
};

use heapless::Vec;

use crate::buffer::RingBuffer;
use crate::confidence::Confidence;
use crate::measurement::MeasurementKind;
use crate::time::Timestamp;
use crate::vector::Vec3;

use precision::PrecisionValidator;
use consistency::ConsistencyValidator;
use outlier::OutlierValidator;
use physical::PhysicalConstraintValidator;

/// Maximum faults or warnings retained per validation
pub const MAX_FAULTS: usize = 16;

/// Faults or warnings one validator may contribute
pub(crate) const MAX_VALIDATOR_FAULTS: usize = 4;

/// Recent same-kind values retained for statistical validators
pub(crate) const VALUE_WINDOW_CAPACITY: usize = 16;

/// How serious a validation fault is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FaultSeverity {
    /// Advisory only; never blocks validity
    Minor,
    /// Blocks validity; the measurement is suspect
    Major,
    /// Blocks validity; the validator could not complete or the input is
    /// fundamentally unusable
    Critical,
}

impl FaultSeverity {
    /// Whether this severity counts as an error for the validity rule
    pub fn is_error(&self) -> bool {
        *self >= Self::Major
    }
}

/// One finding from a validator
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationFault {
    /// How serious the finding is
    pub severity: FaultSeverity,
    /// Which validator reported it
    pub source: &'static str,
    /// What was found
    pub detail: &'static str,
}

/// A single validator's opinion of a measurement
#[derive(Debug, Clone, Default)]
pub struct ValidatorVerdict {
    /// Precision score in [0, 1]
    pub precision: f32,
    /// Error-severity findings
    pub faults: Vec<ValidationFault, MAX_VALIDATOR_FAULTS>,
    /// Advisory findings
    pub warnings: Vec<ValidationFault, MAX_VALIDATOR_FAULTS>,
}

impl ValidatorVerdict {
    /// A verdict with no findings
    pub fn clean(precision: f32) -> Self {
        Self {
            precision,
            faults: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Record an error-severity finding, lowering precision to `precision`
    pub fn fault(
        &mut self,
        source: &'static str,
        severity: FaultSeverity,
        detail: &'static str,
        precision: f32,
    ) {
        let _ = self.faults.push(ValidationFault {
            severity,
            source,
            detail,
        });
        self.precision = self.precision.min(precision);
    }

    /// Record an advisory finding, lowering precision to `precision`
    pub fn warn(&mut self, source: &'static str, detail: &'static str, precision: f32) {
        let _ = self.warnings.push(ValidationFault {
            severity: FaultSeverity::Minor,
            source,
            detail,
        });
        self.precision = self.precision.min(precision);
    }
}

/// What the gate knows about a measurement under validation
#[derive(Debug, Clone, Copy)]
pub struct ValidationInput<'a> {
    /// Kind of quantity measured
    pub kind: MeasurementKind,
    /// Measured (compensated) value in the kind's unit
    pub value: f32,
    /// Calibration-enhanced points the value was computed from; may be
    /// empty when only a scalar was supplied
    pub points: &'a [Vec3],
    /// Motion-derived confidence of the compensated value
    pub confidence: Confidence,
    /// When the measurement was captured (ms)
    pub timestamp: Timestamp,
}

/// The gate's aggregated verdict
///
/// Invariant: `is_valid` implies `faults.is_empty()` and
/// `precision_score >= the configured minimum`.
#[derive(Debug, Clone)]
pub struct MeasurementValidation {
    /// Overall verdict
    pub is_valid: bool,
    /// Worst-case precision score across validators, [0, 1]
    pub precision_score: f32,
    /// Motion-derived confidence of the measurement, [0, 1]
    pub confidence_score: f32,
    /// Mean of precision and confidence, [0, 1]
    pub quality_score: f32,
    /// Error-severity findings from all validators
    pub faults: Vec<ValidationFault, MAX_FAULTS>,
    /// Advisory findings from all validators
    pub warnings: Vec<ValidationFault, MAX_FAULTS>,
    /// When the validation ran (ms)
    pub timestamp: Timestamp,
}

/// One timestamped value in a per-kind window
#[derive(Debug, Clone, Copy)]
pub(crate) struct ValueSample {
    pub timestamp: Timestamp,
    pub value: f32,
}

/// Rolling window of recently accepted same-kind values
#[derive(Clone, Default)]
pub(crate) struct ValueWindow {
    samples: RingBuffer<ValueSample, VALUE_WINDOW_CAPACITY>,
}

impl ValueWindow {
    pub(crate) fn push(&mut self, timestamp: Timestamp, value: f32) {
        self.samples.push(ValueSample { timestamp, value });
    }

    pub(crate) fn len(&self) -> usize {
        self.samples.len()
    }

    pub(crate) fn last(&self) -> Option<&ValueSample> {
        self.samples.last()
    }

    /// Mean and standard deviation of the window values
    pub(crate) fn statistics(&self) -> Option<(f32, f32)> {
        if self.samples.is_empty() {
            return None;
        }

        let n = self.samples.len() as f32;
        let mean = self.samples.iter().map(|s| s.value).sum::<f32>() / n;
        let variance = self
            .samples
            .iter()
            .map(|s| {
                let d = s.value - mean;
                d * d
            })
            .sum::<f32>()
            / n;

        Some((mean, libm::sqrtf(variance)))
    }
}

/// The closed registry of gate validators
#[derive(Clone)]
pub(crate) enum GateValidator {
    /// Numeric sanity and confidence-derived precision
    Precision(PrecisionValidator),
    /// Re-measurement agreement
    Consistency(ConsistencyValidator),
    /// Statistical deviation from the value window
    Outlier(OutlierValidator),
    /// Plausibility limits and degenerate geometry
    Physical(PhysicalConstraintValidator),
}

impl GateValidator {
    fn check(&self, input: &ValidationInput<'_>, window: &ValueWindow) -> ValidatorVerdict {
        match self {
            Self::Precision(v) => v.check(input),
            Self::Consistency(v) => v.check(input, window),
            Self::Outlier(v) => v.check(input, window),
            Self::Physical(v) => v.check(input),
        }
    }
}

/// Runs the validator registry and aggregates verdicts
#[derive(Clone)]
pub struct QualityGate {
    /// Minimum aggregate precision for validity
    min_precision: f32,
    /// Fixed, ordered validator registry
    validators: [GateValidator; 4],
    /// Per-kind windows of recently accepted values
    windows: [ValueWindow; MeasurementKind::COUNT],
}

impl QualityGate {
    /// Create a gate with the standard validator registry
    pub fn new(min_precision: f32) -> Self {
        Self {
            min_precision: min_precision.max(0.0).min(1.0),
            validators: [
                GateValidator::Precision(PrecisionValidator::new()),
                GateValidator::Consistency(ConsistencyValidator::new()),
                GateValidator::Outlier(OutlierValidator::new()),
                GateValidator::Physical(PhysicalConstraintValidator::new()),
            ],
            windows: Default::default(),
        }
    }

    /// Minimum precision the gate enforces
    pub fn min_precision(&self) -> f32 {
        self.min_precision
    }

    /// Validate a distance measurement
    pub fn validate_distance(
        &mut self,
        value: f32,
        points: &[Vec3],
        confidence: Confidence,
        timestamp: Timestamp,
    ) -> MeasurementValidation {
        self.validate(&ValidationInput {
            kind: MeasurementKind::Distance,
            value,
            points,
            confidence,
            timestamp,
        })
    }

    /// Validate an area measurement
    pub fn validate_area(
        &mut self,
        value: f32,
        points: &[Vec3],
        confidence: Confidence,
        timestamp: Timestamp,
    ) -> MeasurementValidation {
        self.validate(&ValidationInput {
            kind: MeasurementKind::Area,
            value,
            points,
            confidence,
            timestamp,
        })
    }

    /// Validate a volume measurement
    pub fn validate_volume(
        &mut self,
        value: f32,
        points: &[Vec3],
        confidence: Confidence,
        timestamp: Timestamp,
    ) -> MeasurementValidation {
        self.validate(&ValidationInput {
            kind: MeasurementKind::Volume,
            value,
            points,
            confidence,
            timestamp,
        })
    }

    /// Validate an angle measurement (value in degrees)
    pub fn validate_angle(
        &mut self,
        value: f32,
        points: &[Vec3],
        confidence: Confidence,
        timestamp: Timestamp,
    ) -> MeasurementValidation {
        self.validate(&ValidationInput {
            kind: MeasurementKind::Angle,
            value,
            points,
            confidence,
            timestamp,
        })
    }

    /// Run every validator and aggregate their verdicts
    ///
    /// All four kind-specific entry points funnel here. Valid values are
    /// recorded into the kind's window afterwards, so the statistical
    /// validators learn only from accepted measurements.
    pub fn validate(&mut self, input: &ValidationInput<'_>) -> MeasurementValidation {
        let window = &self.windows[input.kind.index()];

        let mut precision = 1.0f32;
        let mut faults: Vec<ValidationFault, MAX_FAULTS> = Vec::new();
        let mut warnings: Vec<ValidationFault, MAX_FAULTS> = Vec::new();

        for validator in &self.validators {
            let verdict = validator.check(input, window);

            // Worst case wins; disagreement is never averaged away
            precision = precision.min(verdict.precision.max(0.0).min(1.0));

            for fault in &verdict.faults {
                let _ = faults.push(*fault);
            }
            for warning in &verdict.warnings {
                let _ = warnings.push(*warning);
            }
        }

        let confidence = input.confidence.as_float();
        let quality = (precision + confidence) / 2.0;
        let is_valid = faults.is_empty() && precision >= self.min_precision;

        if is_valid {
            self.windows[input.kind.index()].push(input.timestamp, input.value);
        }

        MeasurementValidation {
            is_valid,
            precision_score: precision,
            confidence_score: confidence,
            quality_score: quality,
            faults,
            warnings,
            timestamp: input.timestamp,
        }
    }
}
