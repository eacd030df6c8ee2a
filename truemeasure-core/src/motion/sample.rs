//! Normalized Device-Motion Samples
//!
//! One [`MotionSample`] is a single timestamped reading of everything the
//! device's motion stack reports: attitude, rotation rate, user
//! (gravity-removed) acceleration, the gravity vector, and the magnetic
//! field. Samples are immutable once created and owned exclusively by the
//! rolling history buffer.

use crate::constants::motion::STANDARD_GRAVITY;
use crate::time::Timestamp;
use crate::vector::{Quaternion, Vec3};

/// One timestamped device-motion reading
///
/// All vectors are in the device body frame, SI units: rotation rate in
/// rad/s, accelerations in m/s², magnetic field in µT.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotionSample {
    /// When the sample was captured (ms)
    pub timestamp: Timestamp,
    /// Device attitude as a unit quaternion
    pub attitude: Quaternion,
    /// Angular velocity (rad/s)
    pub rotation_rate: Vec3,
    /// Linear acceleration with gravity removed (m/s²)
    pub user_acceleration: Vec3,
    /// Gravity direction and magnitude (m/s²)
    pub gravity: Vec3,
    /// Magnetic field reading (µT)
    pub magnetic_field: Vec3,
}

impl MotionSample {
    /// Create a sample from raw sensor components
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        timestamp: Timestamp,
        attitude: Quaternion,
        rotation_rate: Vec3,
        user_acceleration: Vec3,
        gravity: Vec3,
        magnetic_field: Vec3,
    ) -> Self {
        Self {
            timestamp,
            attitude,
            rotation_rate,
            user_acceleration,
            gravity,
            magnetic_field,
        }
    }

    /// The documented fallback frame for sensor gaps
    ///
    /// Zero acceleration and rotation, identity attitude, standard gravity
    /// straight down, no magnetic reading. Used when no real sample exists
    /// within the configured window of a measurement's timestamp; the
    /// engine caps confidence when falling back to it.
    pub fn at_rest(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            attitude: Quaternion::IDENTITY,
            rotation_rate: Vec3::ZERO,
            user_acceleration: Vec3::ZERO,
            gravity: Vec3::new(0.0, 0.0, -STANDARD_GRAVITY),
            magnetic_field: Vec3::ZERO,
        }
    }

    /// Combined scalar motion magnitude
    ///
    /// ‖user acceleration‖ + `angular_weight` x ‖rotation rate‖. Angular
    /// motion is weighted down because it affects measurement error less
    /// per unit than translation at short range.
    pub fn motion_magnitude(&self, angular_weight: f32) -> f32 {
        self.user_acceleration.norm() + angular_weight * self.rotation_rate.norm()
    }

    /// Check all vector components are finite
    pub fn is_finite(&self) -> bool {
        self.rotation_rate.is_finite()
            && self.user_acceleration.is_finite()
            && self.gravity.is_finite()
            && self.magnetic_field.is_finite()
    }
}
