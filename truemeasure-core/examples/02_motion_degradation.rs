//! Watch accuracy degrade as the device shakes
//!
//! Runs the same measurement against a still device and a shaken one, and
//! prints how the compensation, validation, and accuracy tiers respond.
//!
//! Run with: cargo run --example 02_motion_degradation

use truemeasure_core::{
    MotionSample, PrecisionConfig, PrecisionEngine, Quaternion, Vec3,
};

fn feed(engine: &mut PrecisionEngine, accel: f32, rotation: f32) {
    let mut t = 0u64;
    while t <= 1000 {
        engine.ingest(MotionSample {
            timestamp: t,
            attitude: Quaternion::IDENTITY,
            rotation_rate: Vec3::new(0.0, rotation, 0.0),
            user_acceleration: Vec3::new(accel, 0.0, 0.0),
            ..MotionSample::at_rest(t)
        });
        t += 17;
    }
}

fn measure_and_report(label: &str, engine: &mut PrecisionEngine) {
    let result = engine
        .measure_distance(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 1.5, 1000)
        .expect("valid geometry");

    println!("--- {label} ---");
    println!("device state:  {}", engine.motion_status().name());
    println!("compensated:   {:.4} m", result.value());
    println!(
        "confidence:    {:.3}  valid: {}",
        result.compensated.confidence.as_float(),
        result.is_valid()
    );
    println!(
        "accuracy tier: {} ({:.2} mm bound)",
        result.assessment.class.name(),
        result.assessment.error_bound_m * 1000.0
    );
    for warning in &result.validation.warnings {
        println!("warning:       [{}] {}", warning.source, warning.detail);
    }
    for fault in &result.validation.faults {
        println!("fault:         [{}] {}", fault.source, fault.detail);
    }
}

fn main() {
    let mut still = PrecisionEngine::new(PrecisionConfig::default());
    still.start();
    feed(&mut still, 0.0, 0.0);
    measure_and_report("still device", &mut still);

    let mut shaken = PrecisionEngine::new(PrecisionConfig::default());
    shaken.start();
    feed(&mut shaken, 0.8, 0.8);
    measure_and_report("shaken device", &mut shaken);
}
