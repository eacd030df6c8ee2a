//! Shared helpers for integration tests
//!
//! Builders for motion streams and engines so scenario tests read as
//! scenarios, not setup noise.

#![allow(dead_code)]

use truemeasure_core::{
    motion::MotionHistory, MotionSample, PrecisionConfig, PrecisionEngine, Quaternion, Vec3,
};

/// Milliseconds between samples at the recommended 60 Hz rate
pub const SAMPLE_STEP_MS: u64 = 17;

/// A perfectly still sample
pub fn still_sample(timestamp: u64) -> MotionSample {
    MotionSample::at_rest(timestamp)
}

/// A sample with the given linear acceleration and rotation rate
pub fn moving_sample(timestamp: u64, accel: f32, rotation: f32) -> MotionSample {
    MotionSample {
        timestamp,
        attitude: Quaternion::IDENTITY,
        rotation_rate: Vec3::new(0.0, rotation, 0.0),
        user_acceleration: Vec3::new(accel, 0.0, 0.0),
        ..MotionSample::at_rest(timestamp)
    }
}

/// A started engine with default configuration
pub fn running_engine() -> PrecisionEngine {
    let mut engine = PrecisionEngine::new(PrecisionConfig::default());
    engine.start();
    engine
}

/// A started engine with a custom configuration
pub fn running_engine_with(config: PrecisionConfig) -> PrecisionEngine {
    let mut engine = PrecisionEngine::new(config);
    engine.start();
    engine
}

/// Feed still samples from `from` through `until` at 60 Hz
pub fn feed_still(engine: &mut PrecisionEngine, from: u64, until: u64) {
    let mut t = from;
    while t <= until {
        engine.ingest(still_sample(t));
        t += SAMPLE_STEP_MS;
    }
}

/// Feed shaky samples from `from` through `until` at 60 Hz
pub fn feed_shaky(engine: &mut PrecisionEngine, from: u64, until: u64, accel: f32) {
    let mut t = from;
    while t <= until {
        engine.ingest(moving_sample(t, accel, accel));
        t += SAMPLE_STEP_MS;
    }
}

/// A standalone history of still samples, for component-level tests
pub fn still_history(from: u64, until: u64) -> MotionHistory {
    let mut history = MotionHistory::new();
    let mut t = from;
    while t <= until {
        history.push(still_sample(t));
        t += SAMPLE_STEP_MS;
    }
    history
}

/// Unit square in the z = 0 plane
pub fn unit_square() -> [Vec3; 4] {
    [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ]
}
