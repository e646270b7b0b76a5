//! Block collision shapes
//!
//! A block's shape is a small set of detail boxes in block-local coordinates.
//! Composite models (fences, stairs) use several boxes; the index of a box in
//! the set is reported back to consumers as the detail index.

use crate::physics::aabb::{aabb_translated, create_aabb, AABB};
use cgmath::{Point3, Vector3};

#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBoxSet {
    boxes: Vec<AABB>,
    bounds: Option<AABB>,
}

impl BoundingBoxSet {
    pub fn empty() -> Self {
        Self {
            boxes: Vec::new(),
            bounds: None,
        }
    }

    /// A single box filling the whole cell
    pub fn full_cube() -> Self {
        Self::from_boxes(vec![create_aabb(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
        )])
    }

    pub fn from_boxes(boxes: Vec<AABB>) -> Self {
        let bounds = boxes.iter().copied().reduce(|acc, b| AABB {
            min: Point3::new(
                acc.min.x.min(b.min.x),
                acc.min.y.min(b.min.y),
                acc.min.z.min(b.min.z),
            ),
            max: Point3::new(
                acc.max.x.max(b.max.x),
                acc.max.y.max(b.max.y),
                acc.max.z.max(b.max.z),
            ),
        });
        Self { boxes, bounds }
    }

    pub fn boxes(&self) -> &[AABB] {
        &self.boxes
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Union of all detail boxes, `None` for an empty shape
    pub fn bounds(&self) -> Option<AABB> {
        self.bounds
    }

    /// How far the shape reaches outside the unit cell, in blocks
    pub fn overhang(&self) -> f32 {
        match self.bounds {
            None => 0.0,
            Some(b) => [
                -b.min.x,
                -b.min.y,
                -b.min.z,
                b.max.x - 1.0,
                b.max.y - 1.0,
                b.max.z - 1.0,
            ]
            .into_iter()
            .fold(0.0f32, f32::max),
        }
    }

    /// Detail boxes moved into world space for a block whose min corner is `offset`
    pub fn translated(&self, offset: Vector3<f32>) -> impl Iterator<Item = AABB> + '_ {
        self.boxes.iter().map(move |b| aabb_translated(b, offset))
    }
}
