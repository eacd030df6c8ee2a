//! Rolling Performance Metrics
//!
//! ## Overview
//!
//! The engine keeps bounded histories of compensation and validation
//! outcomes and derives rolling aggregates from them: average confidence,
//! average applied correction, validation pass rate, and the rolling
//! accuracy figure the calibration staleness rule consumes.
//!
//! Histories are fixed-capacity rings (64 entries each); metrics are
//! recomputed on read rather than maintained incrementally, which keeps
//! recording O(1) and makes the aggregates trivially consistent with the
//! retained records.

use crate::buffer::RingBuffer;
use crate::constants::quality::METRICS_HISTORY_CAPACITY;
use crate::time::Timestamp;

/// Outcome of one compensation pass
#[derive(Debug, Clone, Copy)]
pub struct CompensationRecord {
    /// When the measurement was processed (ms)
    pub timestamp: Timestamp,
    /// Magnitude of the applied correction (measurement units)
    pub correction: f32,
    /// Final chain confidence, [0, 1]
    pub confidence: f32,
    /// Processing latency (µs)
    pub latency_us: u32,
}

/// Outcome of one validation pass
#[derive(Debug, Clone, Copy)]
pub struct ValidationRecord {
    /// When the validation ran (ms)
    pub timestamp: Timestamp,
    /// Whether the gate accepted the measurement
    pub is_valid: bool,
    /// The gate's quality score, [0, 1]
    pub quality: f32,
}

/// Bounded outcome histories and their rolling aggregates
#[derive(Clone, Default)]
pub struct MetricsAggregator {
    compensations: RingBuffer<CompensationRecord, METRICS_HISTORY_CAPACITY>,
    validations: RingBuffer<ValidationRecord, METRICS_HISTORY_CAPACITY>,
}

impl MetricsAggregator {
    /// Create an empty aggregator
    pub const fn new() -> Self {
        Self {
            compensations: RingBuffer::new(),
            validations: RingBuffer::new(),
        }
    }

    /// Record a compensation outcome
    pub fn record_compensation(&mut self, record: CompensationRecord) {
        self.compensations.push(record);
    }

    /// Record a validation outcome
    pub fn record_validation(&mut self, record: ValidationRecord) {
        self.validations.push(record);
    }

    /// Number of retained compensation records
    pub fn compensation_count(&self) -> usize {
        self.compensations.len()
    }

    /// Number of retained validation records
    pub fn validation_count(&self) -> usize {
        self.validations.len()
    }

    /// Mean chain confidence over the retained window
    pub fn average_confidence(&self) -> Option<f32> {
        if self.compensations.is_empty() {
            return None;
        }

        let sum: f32 = self.compensations.iter().map(|r| r.confidence).sum();
        Some(sum / self.compensations.len() as f32)
    }

    /// Mean applied correction magnitude over the retained window
    pub fn average_correction(&self) -> Option<f32> {
        if self.compensations.is_empty() {
            return None;
        }

        let sum: f32 = self.compensations.iter().map(|r| r.correction).sum();
        Some(sum / self.compensations.len() as f32)
    }

    /// Mean processing latency over the retained window (µs)
    pub fn average_latency_us(&self) -> Option<f32> {
        if self.compensations.is_empty() {
            return None;
        }

        let sum: f32 = self.compensations.iter().map(|r| r.latency_us as f32).sum();
        Some(sum / self.compensations.len() as f32)
    }

    /// Fraction of retained validations that passed
    pub fn pass_rate(&self) -> Option<f32> {
        if self.validations.is_empty() {
            return None;
        }

        let passed = self.validations.iter().filter(|r| r.is_valid).count();
        Some(passed as f32 / self.validations.len() as f32)
    }

    /// Rolling validation accuracy: mean quality score over the window
    ///
    /// Feeds the calibration staleness rule. With no validations yet the
    /// figure is 1.0 - an empty window is no evidence of degradation, and
    /// a fresh calibration must not expire instantly.
    pub fn rolling_accuracy(&self) -> f32 {
        if self.validations.is_empty() {
            return 1.0;
        }

        let sum: f32 = self.validations.iter().map(|r| r.quality).sum();
        sum / self.validations.len() as f32
    }

    /// Forget all retained records
    pub fn clear(&mut self) {
        self.compensations.clear();
        self.validations.clear();
    }
}
