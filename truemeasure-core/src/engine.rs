//! The Precision Measurement Engine
//!
//! ## Overview
//!
//! [`PrecisionEngine`] is the single owner of all shared state - the
//! motion history, the calibration record, the quality-gate windows, and
//! the metrics histories - and the only entry point the surrounding
//! application talks to. Its lifecycle is explicit and caller-controlled:
//! construct it, `start` it, feed it, `stop` it. There are no ambient
//! globals or hidden singletons.
//!
//! ## Data Flow
//!
//! ```text
//! sensor feed ──ingest──> MotionHistory ──> StabilityClassifier
//!                              |                    |
//!                              v                    v
//! measurement ──compensate──> nearest sample ──> pipeline ──> gate
//!                              |                    |           |
//!                              v                    v           v
//!                        MotionPredictor      AccuracyAssessor  metrics
//! ```
//!
//! ## Concurrency Contract
//!
//! `ingest` is the single writer of the motion history; `compensate`
//! clones a snapshot of the history before reading it, so many
//! independent compensation calls can run against a consistent view while
//! ingestion continues. Nothing here suspends, blocks, or holds a lock:
//! callers that want async ergonomics can wrap calls in tasks at the
//! integration edge without changing any accuracy semantics.
//!
//! ## Degraded Conditions
//!
//! A measurement with no motion sample within the configured gap window
//! is compensated against the documented at-rest fallback frame with
//! capped confidence and a logged warning - not an error. Calibration
//! staleness surfaces through [`PrecisionEngine::needs_recalibration`].
//! Hard errors are reserved for truly invalid input (non-finite values,
//! degenerate geometry) and lifecycle misuse.

use crate::accuracy::{AccuracyAssessor, AccuracyAssessment};
use crate::calibration::{CalibrationData, CalibrationManager, CalibrationState};
use crate::compensation::CompensationPipeline;
use crate::confidence::Confidence;
use crate::config::PrecisionConfig;
use crate::constants::quality::GAP_FALLBACK_CONFIDENCE;
use crate::errors::{MeasurementError, MeasurementResult};
use crate::geometry;
use crate::measurement::{CompensatedMeasurement, MeasurementKind, RawMeasurement};
use crate::metrics::{CompensationRecord, MetricsAggregator, ValidationRecord};
use crate::motion::{
    MotionHistory, MotionPredictor, MotionSample, MotionStatus, StabilityClassifier,
    DEFAULT_HISTORY_CAPACITY,
};
use crate::time::{delta_ms, Timestamp};
use crate::validation::{
    QualityGate, TrackingFrame, TrackingValidationResult, TrackingValidator, ValidationInput,
};
use crate::vector::Vec3;

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

/// Maximum points a single measurement accepts
pub const MAX_MEASUREMENT_POINTS: usize = 32;

/// Bounded point storage for one measurement
type PointBuffer = heapless::Vec<Vec3, MAX_MEASUREMENT_POINTS>;

/// Motion-compensated precision measurement engine
///
/// See the [module documentation](self) for the data flow and the
/// concurrency contract.
pub struct PrecisionEngine {
    config: PrecisionConfig,
    running: bool,
    history: MotionHistory<DEFAULT_HISTORY_CAPACITY>,
    status: MotionStatus,
    classifier: StabilityClassifier,
    predictor: MotionPredictor,
    pipeline: CompensationPipeline,
    assessor: AccuracyAssessor,
    gate: QualityGate,
    tracker: TrackingValidator,
    calibration: CalibrationManager,
    metrics: MetricsAggregator,
}

impl PrecisionEngine {
    /// Build an engine from a configuration
    ///
    /// The configuration is clamped through
    /// [`PrecisionConfig::validated`] first; a nonsense threshold
    /// degrades to its default instead of failing construction.
    pub fn new(config: PrecisionConfig) -> Self {
        let config = config.validated();

        let classifier = StabilityClassifier::new(
            config.motion_threshold,
            config.angular_threshold,
            config.angular_weight,
            config.high_motion_multiplier,
            config.stability_duration_ms,
        );
        let predictor = MotionPredictor::new(config.history_window_ms);
        let pipeline = CompensationPipeline::new(
            config.accuracy_target_m,
            config.enable_linear,
            config.enable_angular,
            config.enable_predictive,
            config.enable_adaptive,
        );
        let assessor = AccuracyAssessor::new(config.accuracy_target_m, config.required_accuracy);
        let gate = QualityGate::new(config.min_precision_threshold);
        let calibration = CalibrationManager::with_policy(
            config.required_accuracy,
            config.calibration_expiry_ms,
            crate::constants::quality::CALIBRATION_MIN_ROLLING_ACCURACY,
        );

        Self {
            config,
            running: false,
            history: MotionHistory::new(),
            status: MotionStatus::Unknown,
            classifier,
            predictor,
            pipeline,
            assessor,
            gate,
            tracker: TrackingValidator::new(),
            calibration,
            metrics: MetricsAggregator::new(),
        }
    }

    /// Begin a capture session
    ///
    /// Clears the motion history, gate windows, and metrics from any
    /// previous session; the calibration record persists across sessions.
    pub fn start(&mut self) {
        self.history.clear();
        self.metrics.clear();
        self.gate = QualityGate::new(self.config.min_precision_threshold);
        self.tracker = TrackingValidator::new();
        self.status = MotionStatus::Unknown;
        self.running = true;
    }

    /// End the capture session
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Whether the engine is between `start` and `stop`
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Active configuration
    pub fn config(&self) -> &PrecisionConfig {
        &self.config
    }

    /// Ingest one motion sample and return the updated device state
    ///
    /// O(1) amortized: a ring-buffer append plus a bounded-window
    /// classification. Never fails - out-of-order or non-finite samples
    /// are dropped by the history (with a logged warning) and the state
    /// is recomputed from what was kept. While stopped, samples are
    /// ignored and the state reads `Unknown`.
    pub fn ingest(&mut self, sample: MotionSample) -> MotionStatus {
        if !self.running {
            return MotionStatus::Unknown;
        }

        self.history.push(sample);
        self.status = self.classifier.classify(&self.history);
        self.status
    }

    /// Current device motion state
    pub fn motion_status(&self) -> MotionStatus {
        if self.running {
            self.status
        } else {
            MotionStatus::Unknown
        }
    }

    /// Compensate a raw scalar measurement
    ///
    /// The full pipeline: nearest-sample matching (with at-rest fallback
    /// on a sensor gap), the four compensation stages, accuracy
    /// assessment, quality-gate validation, and metrics recording.
    pub fn compensate(
        &mut self,
        raw: RawMeasurement,
    ) -> MeasurementResult<CompensatedMeasurement> {
        self.compensate_with_points(raw, &[])
    }

    /// Measure the distance between two points
    ///
    /// Points pass through the calibration precision enhancement before
    /// the geometric computation; the raw result then runs the full
    /// compensation and validation path.
    pub fn measure_distance(
        &mut self,
        a: Vec3,
        b: Vec3,
        sensor_distance_m: f32,
        timestamp: Timestamp,
    ) -> MeasurementResult<CompensatedMeasurement> {
        let ea = self.calibration.enhance_point(a);
        let eb = self.calibration.enhance_point(b);

        let value = geometry::distance(ea, eb);
        let midpoint = (ea + eb).scale(0.5);

        let raw = RawMeasurement::new(
            value,
            sensor_distance_m,
            midpoint,
            timestamp,
            MeasurementKind::Distance,
        );
        self.compensate_with_points(raw, &[ea, eb])
    }

    /// Measure the area of a co-planar polygon (shoelace formula)
    pub fn measure_area(
        &mut self,
        points: &[Vec3],
        sensor_distance_m: f32,
        timestamp: Timestamp,
    ) -> MeasurementResult<CompensatedMeasurement> {
        let enhanced = self.enhance_points(points)?;

        let value = geometry::polygon_area(&enhanced)?;
        let position = centroid(&enhanced);

        let raw = RawMeasurement::new(
            value,
            sensor_distance_m,
            position,
            timestamp,
            MeasurementKind::Area,
        );
        self.compensate_with_points(raw, &enhanced)
    }

    /// Measure the axis-aligned bounding-box volume of a point set
    pub fn measure_volume(
        &mut self,
        points: &[Vec3],
        sensor_distance_m: f32,
        timestamp: Timestamp,
    ) -> MeasurementResult<CompensatedMeasurement> {
        let enhanced = self.enhance_points(points)?;

        let value = geometry::bounding_box_volume(&enhanced)?;
        let position = centroid(&enhanced);

        let raw = RawMeasurement::new(
            value,
            sensor_distance_m,
            position,
            timestamp,
            MeasurementKind::Volume,
        );
        self.compensate_with_points(raw, &enhanced)
    }

    /// Measure the angle at `vertex` between the arms toward `p1` and `p2`
    ///
    /// The measurement value is the angle in degrees.
    pub fn measure_angle(
        &mut self,
        vertex: Vec3,
        p1: Vec3,
        p2: Vec3,
        sensor_distance_m: f32,
        timestamp: Timestamp,
    ) -> MeasurementResult<CompensatedMeasurement> {
        let ev = self.calibration.enhance_point(vertex);
        let e1 = self.calibration.enhance_point(p1);
        let e2 = self.calibration.enhance_point(p2);

        let angle = geometry::angle_at(ev, e1, e2)?;

        let raw = RawMeasurement::new(
            angle.degrees,
            sensor_distance_m,
            ev,
            timestamp,
            MeasurementKind::Angle,
        );
        self.compensate_with_points(raw, &[ev, e1, e2])
    }

    /// Validate an AR tracking frame against the inertial motion history
    pub fn validate_tracking(&mut self, frame: &TrackingFrame) -> TrackingValidationResult {
        self.tracker.validate(frame, &self.history, &self.classifier)
    }

    /// Perform a calibration now, superseding any previous record
    pub fn perform_calibration(&mut self, now: Timestamp) -> CalibrationData {
        *self.calibration.perform_calibration(now, &self.history)
    }

    /// Calibration lifecycle state at `now`
    pub fn calibration_state(&self, now: Timestamp) -> CalibrationState {
        self.calibration.state(now, self.metrics.rolling_accuracy())
    }

    /// Whether the calibration aged out or accuracy degraded
    pub fn needs_recalibration(&self, now: Timestamp) -> bool {
        self.calibration
            .needs_recalibration(now, self.metrics.rolling_accuracy())
    }

    /// Calibration manager (current record, diagnostic history)
    pub fn calibration(&self) -> &CalibrationManager {
        &self.calibration
    }

    /// Rolling performance metrics
    pub fn metrics(&self) -> &MetricsAggregator {
        &self.metrics
    }

    fn enhance_points(&self, points: &[Vec3]) -> MeasurementResult<PointBuffer> {
        let mut enhanced = PointBuffer::new();

        for point in points {
            enhanced
                .push(self.calibration.enhance_point(*point))
                .map_err(|_| MeasurementError::TooManyPoints {
                    limit: MAX_MEASUREMENT_POINTS,
                    given: points.len(),
                })?;
        }

        Ok(enhanced)
    }

    fn compensate_with_points(
        &mut self,
        raw: RawMeasurement,
        points: &[Vec3],
    ) -> MeasurementResult<CompensatedMeasurement> {
        if !self.running {
            return Err(MeasurementError::NotRunning);
        }
        if !raw.value.is_finite() {
            return Err(MeasurementError::InvalidValue);
        }

        #[cfg(feature = "std")]
        let started = std::time::Instant::now();

        // Snapshot read: ingestion may continue while we work
        let snapshot = self.history.clone();

        let (motion, gapped) = match snapshot.nearest(raw.timestamp) {
            Some(sample)
                if delta_ms(sample.timestamp, raw.timestamp) <= self.config.sample_gap_max_ms =>
            {
                (*sample, false)
            }
            _ => {
                log_warn!(
                    "no motion sample within {} ms of t={}, using at-rest fallback",
                    self.config.sample_gap_max_ms,
                    raw.timestamp
                );
                (MotionSample::at_rest(raw.timestamp), true)
            }
        };

        // Predicting from a history that is nowhere near the measurement
        // would extrapolate the wrong moment; skip it on a gap
        let predicted = if self.pipeline.predictive_enabled() && !gapped {
            self.predictor
                .predict(&snapshot, self.config.prediction_horizon_ms)
        } else {
            None
        };

        let mut compensated = self.pipeline.compensate(&raw, &motion, predicted.as_ref());

        if gapped {
            compensated.confidence = compensated
                .confidence
                .floor(Confidence::from_float(GAP_FALLBACK_CONFIDENCE));
        }

        let assessment = self.assess(&raw, &motion, &compensated);

        let validation = self.gate.validate(&ValidationInput {
            kind: raw.kind,
            value: compensated.value,
            points,
            confidence: compensated.confidence,
            timestamp: raw.timestamp,
        });

        #[cfg(feature = "std")]
        let latency_us = started.elapsed().as_micros().min(u32::MAX as u128) as u32;
        #[cfg(not(feature = "std"))]
        let latency_us = 0u32;

        self.metrics.record_compensation(CompensationRecord {
            timestamp: raw.timestamp,
            correction: libm::fabsf(raw.value - compensated.value),
            confidence: compensated.confidence.as_float(),
            latency_us,
        });
        self.metrics.record_validation(ValidationRecord {
            timestamp: raw.timestamp,
            is_valid: validation.is_valid,
            quality: validation.quality_score,
        });

        Ok(CompensatedMeasurement {
            raw,
            compensated,
            motion,
            validation,
            assessment,
            latency_us,
        })
    }

    /// Derive the accuracy assessment for a compensation outcome
    ///
    /// Effectiveness is the fraction of the modeled motion error the
    /// enabled stages actually removed; a frame with nothing to model
    /// counts as fully compensated.
    fn assess(
        &self,
        raw: &RawMeasurement,
        motion: &MotionSample,
        compensated: &crate::compensation::CompensatedValue,
    ) -> AccuracyAssessment {
        let modeled = self.pipeline.modeled_error(raw, motion);
        let applied = libm::fabsf(raw.value - compensated.value);

        let effectiveness = if modeled > 1e-9 {
            (applied / modeled).min(1.0)
        } else {
            1.0
        };

        let residual = self.classifier.magnitude(motion);

        self.assessor
            .assess(effectiveness, residual, compensated.confidence)
    }
}

/// Arithmetic mean of a point set (callers guarantee non-empty)
fn centroid(points: &[Vec3]) -> Vec3 {
    if points.is_empty() {
        return Vec3::ZERO;
    }

    let mut sum = Vec3::ZERO;
    for p in points {
        sum = sum + *p;
    }
    sum.scale(1.0 / points.len() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accuracy::AccuracyClass;

    fn engine() -> PrecisionEngine {
        let mut engine = PrecisionEngine::new(PrecisionConfig::default());
        engine.start();
        engine
    }

    fn feed_stable(engine: &mut PrecisionEngine, from: Timestamp, until: Timestamp) {
        let mut t = from;
        while t <= until {
            engine.ingest(MotionSample::at_rest(t));
            t += 50;
        }
    }

    #[test]
    fn stopped_engine_refuses_measurements() {
        let mut engine = PrecisionEngine::new(PrecisionConfig::default());

        let raw = RawMeasurement::new(2.0, 1.5, Vec3::ZERO, 1000, MeasurementKind::Distance);
        assert!(matches!(
            engine.compensate(raw),
            Err(MeasurementError::NotRunning)
        ));
    }

    #[test]
    fn ingest_while_stopped_is_ignored() {
        let mut engine = PrecisionEngine::new(PrecisionConfig::default());

        let status = engine.ingest(MotionSample::at_rest(1000));
        assert_eq!(status, MotionStatus::Unknown);

        engine.start();
        assert_eq!(engine.motion_status(), MotionStatus::Unknown);
    }

    #[test]
    fn non_finite_measurement_is_a_hard_error() {
        let mut engine = engine();

        let raw = RawMeasurement::new(
            f32::NAN,
            1.5,
            Vec3::ZERO,
            1000,
            MeasurementKind::Distance,
        );
        assert!(matches!(
            engine.compensate(raw),
            Err(MeasurementError::InvalidValue)
        ));
    }

    #[test]
    fn empty_history_falls_back_to_at_rest() {
        let mut engine = engine();

        let raw = RawMeasurement::new(2.0, 1.5, Vec3::ZERO, 1000, MeasurementKind::Distance);
        let result = engine.compensate(raw).unwrap();

        // Fallback frame carries no motion, so the value is untouched,
        // but confidence is capped
        assert!((result.value() - 2.0).abs() < 1e-6);
        assert!(result.compensated.confidence.as_float() <= GAP_FALLBACK_CONFIDENCE + 0.01);
    }

    #[test]
    fn stable_device_yields_high_confidence() {
        let mut engine = engine();
        feed_stable(&mut engine, 0, 1000);

        assert_eq!(engine.motion_status(), MotionStatus::Stable);

        let raw = RawMeasurement::new(2.0, 1.5, Vec3::ZERO, 1000, MeasurementKind::Distance);
        let result = engine.compensate(raw).unwrap();

        assert!((result.value() - 2.0).abs() < 1e-4);
        assert!(result.compensated.confidence.as_float() >= 0.95);
        assert!(result.is_valid());
    }

    #[test]
    fn measure_distance_runs_end_to_end() {
        let mut engine = engine();
        feed_stable(&mut engine, 0, 1000);

        let result = engine
            .measure_distance(
                Vec3::ZERO,
                Vec3::new(2.0, 0.0, 0.0),
                1.5,
                1000,
            )
            .unwrap();

        assert!((result.value() - 2.0).abs() < 1e-3);
        assert_eq!(result.raw.kind, MeasurementKind::Distance);
        assert!(result.is_valid());
        assert!(result.assessment.meets_requirement);
    }

    #[test]
    fn measure_angle_reports_degrees() {
        let mut engine = engine();
        feed_stable(&mut engine, 0, 1000);

        let result = engine
            .measure_angle(
                Vec3::ZERO,
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                1.0,
                1000,
            )
            .unwrap();

        assert!((result.value() - 90.0).abs() < 0.1);
        assert_eq!(result.raw.kind, MeasurementKind::Angle);
    }

    #[test]
    fn degenerate_geometry_propagates() {
        let mut engine = engine();
        feed_stable(&mut engine, 0, 1000);

        let result = engine.measure_area(&[Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)], 1.0, 1000);
        assert!(matches!(
            result,
            Err(MeasurementError::InsufficientPoints { .. })
        ));
    }

    #[test]
    fn metrics_accumulate() {
        let mut engine = engine();
        feed_stable(&mut engine, 0, 1000);

        for i in 0..3 {
            let raw = RawMeasurement::new(
                2.0,
                1.5,
                Vec3::ZERO,
                1000 + i,
                MeasurementKind::Distance,
            );
            engine.compensate(raw).unwrap();
        }

        assert_eq!(engine.metrics().compensation_count(), 3);
        assert_eq!(engine.metrics().validation_count(), 3);
        assert!(engine.metrics().pass_rate().unwrap() > 0.99);
    }

    #[test]
    fn calibration_lifecycle_through_engine() {
        let mut engine = engine();
        feed_stable(&mut engine, 0, 1000);

        assert!(engine.needs_recalibration(1000));
        let record = engine.perform_calibration(1000);
        assert_eq!(record.target, AccuracyClass::Millimeter);
        assert!(!engine.needs_recalibration(1000));
        assert_eq!(engine.calibration_state(1000), CalibrationState::Calibrated);
    }

    #[test]
    fn start_clears_session_state() {
        let mut engine = engine();
        feed_stable(&mut engine, 0, 1000);
        engine
            .compensate(RawMeasurement::new(
                2.0,
                1.5,
                Vec3::ZERO,
                1000,
                MeasurementKind::Distance,
            ))
            .unwrap();

        engine.start();

        assert_eq!(engine.motion_status(), MotionStatus::Unknown);
        assert_eq!(engine.metrics().compensation_count(), 0);
    }
}
