//! Policy Constants for Motion Compensation and Validation
//!
//! Every empirical number in the engine lives here, grouped by concern:
//!
//! - [`motion`]: stability thresholds and compensation scale factors
//! - [`accuracy`]: accuracy class bounds and assessment mapping
//! - [`quality`]: validation score thresholds and calibration policy
//!
//! These are tuning policy, not physics: the 0.1 angular weight, the 2x
//! high-motion multiplier, and the stage scale factors were chosen against
//! real capture sessions and must stay configurable at the engine level.
//! The constants here are the defaults the configuration starts from.

pub mod motion;
pub mod accuracy;
pub mod quality;
