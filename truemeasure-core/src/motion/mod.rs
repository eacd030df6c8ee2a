//! Motion Ingest, Stability Classification and Prediction
//!
//! ## Overview
//!
//! The motion subsystem turns the raw device-motion feed into the context
//! the compensation pipeline needs:
//!
//! 1. **Ingest** ([`sample`], [`history`]): raw attitude, rotation-rate,
//!    acceleration, gravity and magnetic-field readings are normalized
//!    into immutable [`MotionSample`]s and appended to a bounded rolling
//!    [`MotionHistory`].
//! 2. **Classification** ([`stability`]): a scalar motion magnitude is
//!    computed per sample and classified against configurable thresholds
//!    into a [`MotionStatus`].
//! 3. **Prediction** ([`predictor`]): a short-horizon velocity estimate is
//!    extrapolated from the recent history, with confidence that decays
//!    with horizon length. The prediction is advisory and consumed only by
//!    the compensation pipeline's predictive stage.
//!
//! ## Concurrency Model
//!
//! The history has a single writer (the ingest path) and many readers
//! (concurrent compensation calls). Samples are `Copy` and the buffer
//! clones into a snapshot for any read that spans multiple samples, so a
//! long-running compensation call never observes a partially written
//! sample or a buffer mutating under it.

pub mod sample;
pub mod history;
pub mod stability;
pub mod predictor;

pub use sample::MotionSample;
pub use history::{MotionHistory, DEFAULT_HISTORY_CAPACITY};
pub use stability::{MotionStatus, StabilityClassifier};
pub use predictor::{MotionPredictor, PredictedMotion};
