//! Physical Constraint Validator
//!
//! Fourth validator in the registry: the measurement must describe
//! something that can physically exist in a scanned room. Negative areas,
//! kilometer-long indoor distances, angles past a straight line, and
//! degenerate point sets are all rejected here regardless of how confident
//! the motion pipeline was.
//!
//! When the caller supplies the source points, the validator also checks
//! the geometry itself: a point set too small for its kind means the
//! computation could not have been performed correctly, which is reported
//! as a **critical** fault rather than silently skipped. A scalar-only
//! validation (no points supplied) checks value plausibility alone.

use crate::constants::quality::{
    MAX_ANGLE_DEG, MAX_AREA_M2, MAX_DISTANCE_M, MAX_VOLUME_M3, MIN_DISTANCE_M,
};
use crate::measurement::MeasurementKind;
use crate::validation::{FaultSeverity, ValidationInput, ValidatorVerdict};
use crate::vector::Vec3;

/// Reported as the fault source
const SOURCE: &str = "physical-constraint";

/// Precision assigned alongside a major plausibility fault
const MAJOR_FAULT_PRECISION: f32 = 0.2;

/// Plausibility and degenerate-geometry checks
#[derive(Debug, Clone, Default)]
pub struct PhysicalConstraintValidator;

impl PhysicalConstraintValidator {
    /// Create the validator
    pub fn new() -> Self {
        Self
    }

    /// Check one measurement
    pub fn check(&self, input: &ValidationInput<'_>) -> ValidatorVerdict {
        let mut verdict = ValidatorVerdict::clean(1.0);

        if !input.value.is_finite() {
            verdict.fault(
                SOURCE,
                FaultSeverity::Critical,
                "value is not a finite number",
                0.0,
            );
            return verdict;
        }

        match input.kind {
            MeasurementKind::Distance => self.check_distance(input, &mut verdict),
            MeasurementKind::Area => self.check_area(input, &mut verdict),
            MeasurementKind::Volume => self.check_volume(input, &mut verdict),
            MeasurementKind::Angle => self.check_angle(input, &mut verdict),
        }

        verdict
    }

    fn check_points(
        &self,
        points: &[Vec3],
        required: usize,
        detail: &'static str,
        verdict: &mut ValidatorVerdict,
    ) {
        // No points supplied means scalar-only validation; only a
        // non-empty but undersized set proves the computation was broken
        if !points.is_empty() && points.len() < required {
            verdict.fault(SOURCE, FaultSeverity::Critical, detail, 0.0);
        }
    }

    fn check_distance(&self, input: &ValidationInput<'_>, verdict: &mut ValidatorVerdict) {
        if input.value < MIN_DISTANCE_M || input.value > MAX_DISTANCE_M {
            verdict.fault(
                SOURCE,
                FaultSeverity::Major,
                "distance outside plausible range",
                MAJOR_FAULT_PRECISION,
            );
        }

        self.check_points(
            input.points,
            2,
            "distance requires two endpoints",
            verdict,
        );
    }

    fn check_area(&self, input: &ValidationInput<'_>, verdict: &mut ValidatorVerdict) {
        if input.value <= 0.0 {
            verdict.fault(
                SOURCE,
                FaultSeverity::Major,
                "area must be positive",
                MAJOR_FAULT_PRECISION,
            );
        } else if input.value > MAX_AREA_M2 {
            verdict.fault(
                SOURCE,
                FaultSeverity::Major,
                "area outside plausible range",
                MAJOR_FAULT_PRECISION,
            );
        }

        self.check_points(
            input.points,
            3,
            "area requires at least three points",
            verdict,
        );
    }

    fn check_volume(&self, input: &ValidationInput<'_>, verdict: &mut ValidatorVerdict) {
        if input.value <= 0.0 {
            verdict.fault(
                SOURCE,
                FaultSeverity::Major,
                "volume must be positive",
                MAJOR_FAULT_PRECISION,
            );
        } else if input.value > MAX_VOLUME_M3 {
            verdict.fault(
                SOURCE,
                FaultSeverity::Major,
                "volume outside plausible range",
                MAJOR_FAULT_PRECISION,
            );
        }

        self.check_points(
            input.points,
            4,
            "volume requires at least four points",
            verdict,
        );
    }

    fn check_angle(&self, input: &ValidationInput<'_>, verdict: &mut ValidatorVerdict) {
        if input.value < 0.0 || input.value > MAX_ANGLE_DEG {
            verdict.fault(
                SOURCE,
                FaultSeverity::Major,
                "angle outside [0, 180] degrees",
                MAJOR_FAULT_PRECISION,
            );
        }

        self.check_points(
            input.points,
            3,
            "angle requires a vertex and two arm points",
            verdict,
        );

        // With the full triple available, degenerate arms are detectable
        if input.points.len() >= 3 {
            let vertex = input.points[0];
            let arms_degenerate = (input.points[1] - vertex).normalized().is_none()
                || (input.points[2] - vertex).normalized().is_none();

            if arms_degenerate {
                verdict.fault(
                    SOURCE,
                    FaultSeverity::Major,
                    "degenerate triangle: zero-length angle arm",
                    MAJOR_FAULT_PRECISION,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confidence::Confidence;

    fn input(kind: MeasurementKind, value: f32, points: &[Vec3]) -> ValidationInput<'_> {
        ValidationInput {
            kind,
            value,
            points,
            confidence: Confidence::FULL,
            timestamp: 1000,
        }
    }

    #[test]
    fn plausible_distance_is_clean() {
        let points = [Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)];
        let verdict = PhysicalConstraintValidator::new()
            .check(&input(MeasurementKind::Distance, 2.0, &points));

        assert!(verdict.faults.is_empty());
        assert_eq!(verdict.precision, 1.0);
    }

    #[test]
    fn negative_area_is_rejected() {
        let verdict =
            PhysicalConstraintValidator::new().check(&input(MeasurementKind::Area, -1.0, &[]));

        assert_eq!(verdict.faults.len(), 1);
        assert_eq!(verdict.faults[0].severity, FaultSeverity::Major);
    }

    #[test]
    fn implausible_distance_is_rejected() {
        let validator = PhysicalConstraintValidator::new();

        let too_far = validator.check(&input(MeasurementKind::Distance, 500.0, &[]));
        assert!(!too_far.faults.is_empty());

        let too_close = validator.check(&input(MeasurementKind::Distance, 0.0001, &[]));
        assert!(!too_close.faults.is_empty());
    }

    #[test]
    fn undersized_point_set_is_critical() {
        let two_points = [Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)];
        let verdict = PhysicalConstraintValidator::new()
            .check(&input(MeasurementKind::Area, 1.0, &two_points));

        assert_eq!(verdict.faults.len(), 1);
        assert_eq!(verdict.faults[0].severity, FaultSeverity::Critical);
        assert_eq!(verdict.precision, 0.0);
    }

    #[test]
    fn scalar_only_validation_skips_geometry() {
        // No points supplied: plausibility only, no point-count fault
        let verdict =
            PhysicalConstraintValidator::new().check(&input(MeasurementKind::Area, 1.0, &[]));

        assert!(verdict.faults.is_empty());
    }

    #[test]
    fn degenerate_angle_arms_are_rejected() {
        let vertex = Vec3::new(1.0, 1.0, 0.0);
        let points = [vertex, vertex, Vec3::new(2.0, 1.0, 0.0)];

        let verdict = PhysicalConstraintValidator::new()
            .check(&input(MeasurementKind::Angle, 90.0, &points));

        assert!(verdict
            .faults
            .iter()
            .any(|f| f.detail.contains("degenerate")));
    }

    #[test]
    fn reflex_angle_is_rejected() {
        let verdict =
            PhysicalConstraintValidator::new().check(&input(MeasurementKind::Angle, 200.0, &[]));

        assert!(!verdict.faults.is_empty());
    }

    #[test]
    fn nan_is_critical_for_every_kind() {
        let validator = PhysicalConstraintValidator::new();

        for kind in [
            MeasurementKind::Distance,
            MeasurementKind::Area,
            MeasurementKind::Volume,
            MeasurementKind::Angle,
        ] {
            let verdict = validator.check(&input(kind, f32::NAN, &[]));
            assert_eq!(verdict.faults[0].severity, FaultSeverity::Critical);
        }
    }
}
