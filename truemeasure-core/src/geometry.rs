//! Measurement Primitives
//!
//! ## Overview
//!
//! Pure geometry over point sets. These routines own no history and no
//! state: given points that already passed through the calibration
//! manager's precision enhancement, they compute the measured quantity
//! with an exactly documented numeric method, so results are reproducible
//! across platforms and releases.
//!
//! ## Numeric Methods
//!
//! - **Distance**: Euclidean norm of the endpoint difference.
//! - **Area**: 2D shoelace formula over (x, y) - points are treated as
//!   already projected/co-planar; the primitive does not fit a plane.
//! - **Volume**: axis-aligned bounding-box extent product. This is a
//!   deliberately conservative approximation - the accuracy pipeline is
//!   calibrated against it, so it must not be silently upgraded to a
//!   convex-hull or mesh-integral volume.
//! - **Angle**: `acos(clamp(dot(n1, n2), -1, 1))` of the normalized arm
//!   vectors, reported in radians and degrees.
//! - **Perimeter**: closed-loop sum of consecutive edge lengths.
//!
//! Degenerate input - too few points, zero-length arms - returns a
//! structured [`MeasurementError`], never panics.

use crate::errors::{MeasurementError, MeasurementResult};
use crate::vector::Vec3;

/// An angle measurement in both conventional units
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AngleMeasurement {
    /// Angle in radians, [0, π]
    pub radians: f32,
    /// Angle in degrees, [0, 180]
    pub degrees: f32,
}

/// Euclidean distance between two points
///
/// Method: `‖b - a‖₂`.
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    (b - a).norm()
}

/// Polygon area via the 2D shoelace formula
///
/// Method: `|Σ (xᵢ·yᵢ₊₁ - xᵢ₊₁·yᵢ)| / 2` over the (x, y) components with
/// the index wrapping at the end. Requires at least 3 points. Points are
/// assumed co-planar and already projected; z components are ignored.
pub fn polygon_area(points: &[Vec3]) -> MeasurementResult<f32> {
    if points.len() < 3 {
        return Err(MeasurementError::InsufficientPoints {
            required: 3,
            available: points.len(),
        });
    }

    let mut sum = 0.0f32;
    for i in 0..points.len() {
        let current = &points[i];
        let next = &points[(i + 1) % points.len()];
        sum += current.x * next.y - next.x * current.y;
    }

    Ok(libm::fabsf(sum) / 2.0)
}

/// Closed-loop perimeter of a polygon
///
/// Method: sum of `‖pᵢ₊₁ - pᵢ‖` over consecutive points with the last
/// edge closing back to the first point. Requires at least 3 points.
pub fn perimeter(points: &[Vec3]) -> MeasurementResult<f32> {
    if points.len() < 3 {
        return Err(MeasurementError::InsufficientPoints {
            required: 3,
            available: points.len(),
        });
    }

    let mut total = 0.0f32;
    for i in 0..points.len() {
        let current = points[i];
        let next = points[(i + 1) % points.len()];
        total += distance(current, next);
    }

    Ok(total)
}

/// Volume of the axis-aligned bounding box spanned by the points
///
/// Method: product of the per-axis extents (max - min). Requires at least
/// 4 points. This is a conservative approximation of the enclosed volume,
/// not a hull or mesh integral; downstream accuracy claims are calibrated
/// against exactly this method.
pub fn bounding_box_volume(points: &[Vec3]) -> MeasurementResult<f32> {
    if points.len() < 4 {
        return Err(MeasurementError::InsufficientPoints {
            required: 4,
            available: points.len(),
        });
    }

    let first = points[0];
    let (mut min, mut max) = (first, first);

    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        min.z = min.z.min(p.z);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
        max.z = max.z.max(p.z);
    }

    Ok((max.x - min.x) * (max.y - min.y) * (max.z - min.z))
}

/// Angle at `vertex` between the arms toward `p1` and `p2`
///
/// Method: `acos(clamp(dot(n̂₁, n̂₂), -1, 1))` where `n̂ᵢ` are the
/// normalized arm vectors. The clamp absorbs floating-point drift just
/// outside [-1, 1]. A zero-length arm has no direction and is a
/// degenerate-geometry error.
pub fn angle_at(vertex: Vec3, p1: Vec3, p2: Vec3) -> MeasurementResult<AngleMeasurement> {
    let arm1 = (p1 - vertex)
        .normalized()
        .ok_or(MeasurementError::DegenerateGeometry {
            reason: "first angle arm has zero length",
        })?;
    let arm2 = (p2 - vertex)
        .normalized()
        .ok_or(MeasurementError::DegenerateGeometry {
            reason: "second angle arm has zero length",
        })?;

    let cos = arm1.dot(&arm2).max(-1.0).min(1.0);
    let radians = libm::acosf(cos);

    Ok(AngleMeasurement {
        radians,
        degrees: radians * 180.0 / core::f32::consts::PI,
    })
}
