//! Data-Oriented Axis-Aligned Bounding Box System
//!
//! Pure functions for collision detection - no methods, just data transformations.
use cgmath::{Point3, Vector3, Zero};

/// Motion components below this are treated as parallel to the slab
const PARALLEL_EPSILON: f32 = 1.0e-9;

/// Axis-Aligned Bounding Box - pure data structure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

/// Result of a continuous (swept) box-vs-box test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    /// Fraction of the motion at which the boxes first touch; negative when
    /// they already overlap at the start
    pub entry: f32,
    /// Fraction of the motion at which the boxes separate again
    pub exit: f32,
    /// Axis whose entry time dominated, `None` if no axis moved
    pub axis: Option<usize>,
    /// Contact normal pointing from `other` towards the moving box
    pub normal: Vector3<f32>,
}

/// Create new AABB from min/max points
pub fn create_aabb(min: Point3<f32>, max: Point3<f32>) -> AABB {
    AABB { min, max }
}

/// Get center point of AABB
pub fn aabb_center(aabb: &AABB) -> Point3<f32> {
    Point3::new(
        (aabb.min.x + aabb.max.x) * 0.5,
        (aabb.min.y + aabb.max.y) * 0.5,
        (aabb.min.z + aabb.max.z) * 0.5,
    )
}

/// True when every bound is finite and min <= max on all axes
pub fn aabb_is_valid(aabb: &AABB) -> bool {
    (0..3).all(|axis| {
        aabb.min[axis].is_finite() && aabb.max[axis].is_finite() && aabb.min[axis] <= aabb.max[axis]
    })
}

/// True when the box encloses no volume
pub fn aabb_is_degenerate(aabb: &AABB) -> bool {
    (0..3).any(|axis| aabb.max[axis] - aabb.min[axis] <= 0.0)
}

/// Test if two AABBs intersect (touching faces count)
pub fn aabb_intersects(aabb1: &AABB, aabb2: &AABB) -> bool {
    aabb1.min.x <= aabb2.max.x && aabb1.max.x >= aabb2.min.x &&
    aabb1.min.y <= aabb2.max.y && aabb1.max.y >= aabb2.min.y &&
    aabb1.min.z <= aabb2.max.z && aabb1.max.z >= aabb2.min.z
}

/// Test if two AABBs share interior volume (touching faces do not count)
pub fn aabb_overlaps(aabb1: &AABB, aabb2: &AABB) -> bool {
    aabb1.min.x < aabb2.max.x && aabb1.max.x > aabb2.min.x &&
    aabb1.min.y < aabb2.max.y && aabb1.max.y > aabb2.min.y &&
    aabb1.min.z < aabb2.max.z && aabb1.max.z > aabb2.min.z
}

/// Create translated copy of AABB
pub fn aabb_translated(aabb: &AABB, offset: Vector3<f32>) -> AABB {
    AABB {
        min: aabb.min + offset,
        max: aabb.max + offset,
    }
}

/// Smallest box containing `aabb` at both ends of `motion`
pub fn aabb_swept_bounds(aabb: &AABB, motion: Vector3<f32>) -> AABB {
    let end = aabb_translated(aabb, motion);
    AABB {
        min: Point3::new(
            aabb.min.x.min(end.min.x),
            aabb.min.y.min(end.min.y),
            aabb.min.z.min(end.min.z),
        ),
        max: Point3::new(
            aabb.max.x.max(end.max.x),
            aabb.max.y.max(end.max.y),
            aabb.max.z.max(end.max.z),
        ),
    }
}

/// Calculate penetration depth and direction for collision resolution
/// Returns the separation vector that pushes `aabb1` out of `aabb2`
pub fn aabb_penetration_vector(aabb1: &AABB, aabb2: &AABB) -> Option<Vector3<f32>> {
    if !aabb_intersects(aabb1, aabb2) {
        return None;
    }

    let x_overlap = (aabb1.max.x.min(aabb2.max.x) - aabb1.min.x.max(aabb2.min.x)).abs();
    let y_overlap = (aabb1.max.y.min(aabb2.max.y) - aabb1.min.y.max(aabb2.min.y)).abs();
    let z_overlap = (aabb1.max.z.min(aabb2.max.z) - aabb1.min.z.max(aabb2.min.z)).abs();

    // Find the axis with minimum overlap
    if x_overlap <= y_overlap && x_overlap <= z_overlap {
        let sign = if aabb_center(aabb1).x < aabb_center(aabb2).x { -1.0 } else { 1.0 };
        Some(Vector3::new(x_overlap * sign, 0.0, 0.0))
    } else if y_overlap <= x_overlap && y_overlap <= z_overlap {
        let sign = if aabb_center(aabb1).y < aabb_center(aabb2).y { -1.0 } else { 1.0 };
        Some(Vector3::new(0.0, y_overlap * sign, 0.0))
    } else {
        let sign = if aabb_center(aabb1).z < aabb_center(aabb2).z { -1.0 } else { 1.0 };
        Some(Vector3::new(0.0, 0.0, z_overlap * sign))
    }
}

/// Swept AABB collision detection
///
/// Parametric slab test of `moving` travelling along `motion` against the
/// static box `other`. Returns the first contact with `entry <= 1` and
/// `exit > 0`; boxes that only slide along each other's faces do not hit.
pub fn aabb_time_of_impact(moving: &AABB, motion: Vector3<f32>, other: &AABB) -> Option<SweepHit> {
    let mut entry = f32::NEG_INFINITY;
    let mut exit = f32::INFINITY;
    let mut entry_axis = None;

    for axis in 0..3 {
        let dir = motion[axis];
        let (moving_min, moving_max) = (moving.min[axis], moving.max[axis]);
        let (other_min, other_max) = (other.min[axis], other.max[axis]);

        if dir.abs() < PARALLEL_EPSILON {
            // Ray is parallel to the slab
            if moving_max <= other_min || moving_min >= other_max {
                return None;
            }
            continue;
        }

        let (t_near, t_far) = if dir > 0.0 {
            ((other_min - moving_max) / dir, (other_max - moving_min) / dir)
        } else {
            ((other_max - moving_min) / dir, (other_min - moving_max) / dir)
        };

        if t_near > entry {
            entry = t_near;
            entry_axis = Some(axis);
        }
        exit = exit.min(t_far);

        if entry >= exit {
            return None;
        }
    }

    if entry > 1.0 || exit <= 0.0 {
        return None;
    }

    let mut normal = Vector3::zero();
    if let Some(axis) = entry_axis {
        normal[axis] = -motion[axis].signum();
    }

    Some(SweepHit {
        entry,
        exit,
        axis: entry_axis,
        normal,
    })
}
