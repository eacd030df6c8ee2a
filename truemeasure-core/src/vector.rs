//! Minimal Vector and Attitude Math for Motion Frames
//!
//! ## Overview
//!
//! The measurement core works in plain Cartesian space: motion samples carry
//! acceleration, rotation-rate and gravity vectors, measurement points are
//! 3D positions, and device attitude is a unit quaternion. This module
//! provides exactly the operations the pipeline needs and nothing more -
//! no generic matrix machinery, no SIMD, no external linear-algebra crate.
//!
//! All routines are pure `f32` arithmetic via `libm`, so the module works
//! identically on `no_std` targets and produces bit-reproducible results,
//! which the compensation pipeline's determinism contract depends on.

use core::ops::{Add, Mul, Neg, Sub};

/// 3D vector with `f32` components
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Zero vector
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    /// Create a vector from components
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Squared Euclidean norm
    pub fn norm_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Euclidean norm
    pub fn norm(&self) -> f32 {
        libm::sqrtf(self.norm_squared())
    }

    /// Dot product
    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Component-wise scaling
    pub fn scale(&self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            z: self.z * factor,
        }
    }

    /// Unit vector in the same direction, or `None` for a (near-)zero vector
    ///
    /// The epsilon guards against amplifying noise when normalizing
    /// vanishingly short vectors (degenerate measurement arms).
    pub fn normalized(&self) -> Option<Self> {
        let n = self.norm();
        if n < 1e-9 {
            return None;
        }
        Some(self.scale(1.0 / n))
    }

    /// Check all components are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;

    fn mul(self, factor: f32) -> Self {
        self.scale(factor)
    }
}

/// Unit quaternion representing device attitude
///
/// Stored as `w + xi + yj + zk`. Construction does not normalize; callers
/// that build attitudes from raw sensor data should pass them through
/// [`Quaternion::normalized`] first.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quaternion {
    /// Scalar part
    pub w: f32,
    /// Vector part, i component
    pub x: f32,
    /// Vector part, j component
    pub y: f32,
    /// Vector part, k component
    pub z: f32,
}

impl Quaternion {
    /// Identity rotation
    pub const IDENTITY: Self = Self { w: 1.0, x: 0.0, y: 0.0, z: 0.0 };

    /// Create a quaternion from components
    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// Quaternion norm
    pub fn norm(&self) -> f32 {
        libm::sqrtf(self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z)
    }

    /// Unit quaternion, or `None` when the norm is (near-)zero
    pub fn normalized(&self) -> Option<Self> {
        let n = self.norm();
        if n < 1e-9 {
            return None;
        }
        let inv = 1.0 / n;
        Some(Self::new(self.w * inv, self.x * inv, self.y * inv, self.z * inv))
    }

    /// Conjugate (inverse rotation for unit quaternions)
    pub fn conjugate(&self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Rotate a vector by this quaternion
    ///
    /// Uses the expanded form `v' = v + 2w(q_v x v) + 2(q_v x (q_v x v))`,
    /// which avoids constructing intermediate quaternion products.
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        let qv = Vec3::new(self.x, self.y, self.z);
        let t = qv.cross(&v).scale(2.0);
        v + t.scale(self.w) + qv.cross(&t)
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}
