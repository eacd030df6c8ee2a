//! Measurement Value Types
//!
//! The units of work flowing through the engine: a [`RawMeasurement`] is
//! created once per user measurement action and consumed by the
//! compensation pipeline; a [`CompensatedMeasurement`] is the externally
//! visible aggregate the session layer renders and stores. Both are
//! immutable once produced.

use crate::accuracy::AccuracyAssessment;
use crate::compensation::CompensatedValue;
use crate::motion::MotionSample;
use crate::time::Timestamp;
use crate::validation::MeasurementValidation;
use crate::vector::Vec3;

/// What kind of quantity a measurement captures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MeasurementKind {
    /// Point-to-point distance (meters)
    Distance,
    /// Polygon area (square meters)
    Area,
    /// Bounding-box volume (cubic meters)
    Volume,
    /// Vertex angle (degrees)
    Angle,
}

impl MeasurementKind {
    /// Human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::Area => "area",
            Self::Volume => "volume",
            Self::Angle => "angle",
        }
    }

    /// Unit the measured value is expressed in
    pub const fn unit(&self) -> &'static str {
        match self {
            Self::Distance => "m",
            Self::Area => "m²",
            Self::Volume => "m³",
            Self::Angle => "°",
        }
    }

    /// Stable index for per-kind bookkeeping (value windows, metrics)
    pub(crate) const fn index(&self) -> usize {
        match self {
            Self::Distance => 0,
            Self::Area => 1,
            Self::Volume => 2,
            Self::Angle => 3,
        }
    }

    /// Number of measurement kinds
    pub(crate) const COUNT: usize = 4;
}

/// One raw measurement as captured, before compensation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawMeasurement {
    /// Measured value in the kind's unit
    pub value: f32,
    /// Distance from the sensor to the measured target (meters)
    pub sensor_distance_m: f32,
    /// Representative 3D position of the measurement
    pub position: Vec3,
    /// When the measurement was captured (ms)
    pub timestamp: Timestamp,
    /// Kind of quantity measured
    pub kind: MeasurementKind,
}

impl RawMeasurement {
    /// Create a raw measurement
    pub fn new(
        value: f32,
        sensor_distance_m: f32,
        position: Vec3,
        timestamp: Timestamp,
        kind: MeasurementKind,
    ) -> Self {
        Self {
            value,
            sensor_distance_m,
            position,
            timestamp,
            kind,
        }
    }
}

/// The externally visible unit of work: a fully processed measurement
///
/// Aggregates the raw capture, the compensated value, the motion frame it
/// was corrected against, the quality-gate verdict, the accuracy
/// assessment, and how long processing took. Immutable once produced.
#[derive(Debug, Clone)]
pub struct CompensatedMeasurement {
    /// The measurement as captured
    pub raw: RawMeasurement,
    /// Corrected value with stage provenance and confidence
    pub compensated: CompensatedValue,
    /// Motion sample the correction was computed against
    pub motion: MotionSample,
    /// Quality-gate verdict
    pub validation: MeasurementValidation,
    /// Accuracy classification of the corrected value
    pub assessment: AccuracyAssessment,
    /// Processing latency in microseconds (0 when no clock is available)
    pub latency_us: u32,
}

impl CompensatedMeasurement {
    /// The corrected value
    pub fn value(&self) -> f32 {
        self.compensated.value
    }

    /// Shorthand for the gate verdict
    pub fn is_valid(&self) -> bool {
        self.validation.is_valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_metadata() {
        assert_eq!(MeasurementKind::Distance.unit(), "m");
        assert_eq!(MeasurementKind::Area.name(), "area");
        assert_eq!(MeasurementKind::Angle.index(), 3);
    }

    #[test]
    fn raw_measurement_holds_capture() {
        let raw = RawMeasurement::new(
            2.0,
            1.5,
            Vec3::new(0.0, 0.0, 1.0),
            1000,
            MeasurementKind::Distance,
        );

        assert_eq!(raw.value, 2.0);
        assert_eq!(raw.kind, MeasurementKind::Distance);
    }
}
