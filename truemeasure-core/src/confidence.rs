//! Conservative Confidence Scoring for Measurement Chains
//!
//! ## Overview
//!
//! Every derived value in the engine - a compensated measurement, a motion
//! prediction, an accuracy assessment - carries a confidence score in
//! [0, 1]. Confidence is the caller-facing trust signal: the session layer
//! renders it directly, and the quality gate folds it into the overall
//! quality score.
//!
//! ## Propagation Rule
//!
//! Confidence is propagated *conservatively*: a chain of processing steps
//! is never more trustworthy than its weakest step, so scores combine via
//! the minimum, and no stage may raise the confidence of a value above the
//! confidence of its inputs. This is the opposite of averaging schemes -
//! one shaky stage must not be diluted by several solid ones.
//!
//! ```text
//! raw (1.0) -> linear (0.97) -> angular (0.94) -> predictive (0.91)
//!                                                     |
//!                                  final confidence = 0.91 (the minimum)
//! ```
//!
//! ## Representation
//!
//! Stored as fixed-point (u16, 0-65535 maps to 0.0-1.0) so comparison and
//! ordering are exact and the score is `Eq`/`Ord` without floating-point
//! caveats. Conversion to `f32` happens only at the reporting boundary.

/// Confidence score in range [0, 1]
///
/// Internally stored as fixed-point for exact ordering and determinism.
/// 0.0 = no confidence, 1.0 = full confidence. `Default` is zero - on any
/// internal uncertainty the engine reports the most conservative score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Confidence {
    /// Fixed-point representation (0-65535 maps to 0.0-1.0)
    value: u16,
}

impl Confidence {
    /// No confidence (0%)
    pub const ZERO: Self = Self { value: 0 };

    /// Full confidence (100%)
    pub const FULL: Self = Self { value: 65535 };

    /// Moderate confidence (50%)
    pub const MODERATE: Self = Self { value: 32768 };

    /// Minimum meaningful confidence (1%)
    pub const MIN_MEANINGFUL: Self = Self { value: 655 };

    /// High confidence threshold (90%)
    pub const HIGH_THRESHOLD: Self = Self { value: 58982 };

    /// Create from a floating point value, clamped to [0, 1]
    pub fn from_float(confidence: f32) -> Self {
        let clamped = confidence.max(0.0).min(1.0);
        Self {
            value: (clamped * 65535.0) as u16,
        }
    }

    /// Convert to floating point [0, 1]
    pub fn as_float(&self) -> f32 {
        self.value as f32 / 65535.0
    }

    /// Raw fixed-point value
    pub fn value(&self) -> u16 {
        self.value
    }

    /// Check if confidence is at or above the high threshold
    pub fn is_high(&self) -> bool {
        *self >= Self::HIGH_THRESHOLD
    }

    /// Check if confidence is critically low
    pub fn is_critical(&self) -> bool {
        *self < Self::MIN_MEANINGFUL
    }

    /// Pointwise minimum of two scores
    ///
    /// The fundamental combination step of the pipeline: chaining a step of
    /// confidence `c` onto a value of confidence `p` yields `min(p, c)`.
    pub fn floor(self, other: Self) -> Self {
        if other < self { other } else { self }
    }

    /// Worst-case combination of multiple scores
    ///
    /// Returns the minimum of the slice. An empty slice yields `ZERO`,
    /// matching the conservative-default rule.
    pub fn worst_of(scores: &[Self]) -> Self {
        scores
            .iter()
            .copied()
            .min()
            .unwrap_or(Self::ZERO)
    }

    /// Scale the score down by a factor in [0, 1]
    ///
    /// Factors above 1 are clamped so scaling can only reduce confidence,
    /// preserving the non-increase invariant.
    pub fn scaled(self, factor: f32) -> Self {
        let f = factor.max(0.0).min(1.0);
        Self::from_float(self.as_float() * f)
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::ZERO
    }
}
