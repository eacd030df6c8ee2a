//! Basic motion-compensated measurement
//!
//! Feeds a simulated 60 Hz motion stream into the engine, then measures a
//! two-meter span and prints the compensated result with its validation
//! and accuracy classification.
//!
//! Run with: cargo run --example 01_basic_measurement

use truemeasure_core::{MotionSample, PrecisionConfig, PrecisionEngine, Vec3};

fn main() {
    let mut engine = PrecisionEngine::new(PrecisionConfig::default());
    engine.start();

    // A second of perfectly still samples at ~60 Hz
    let mut t = 0u64;
    while t <= 1000 {
        engine.ingest(MotionSample::at_rest(t));
        t += 17;
    }
    println!("device state after 1 s: {}", engine.motion_status().name());

    // Measure a 2 m span, sensor about 1.5 m from the target
    let result = engine
        .measure_distance(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 1.5, 1000)
        .expect("valid geometry");

    println!(
        "distance: {:.4} {} (raw {:.4})",
        result.value(),
        result.raw.kind.unit(),
        result.raw.value
    );
    println!(
        "confidence: {:.3}, valid: {}, tier: {}",
        result.compensated.confidence.as_float(),
        result.is_valid(),
        result.assessment.class.name()
    );
    println!(
        "estimated error bound: {:.2} mm",
        result.assessment.error_bound_m * 1000.0
    );
}
