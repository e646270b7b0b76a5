//! Collision result carriers
//!
//! Candidates are scratch values owned by the probe's pool and only lent to
//! consumers for the duration of a callback. `ContactRecord` is the one value
//! that is handed out by copy.

use super::block_sampler::SamplerStats;
use super::material::MaterialMask;
use crate::memory::Poolable;
use crate::physics::aabb::AABB;
use crate::world::core::{BlockId, FluidId, TriggerTag, VoxelPos};
use cgmath::{Point3, Vector3, Zero};
use std::cmp::Ordering;

/// Parameters of one swept query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepQuery {
    /// Collider in entity-local coordinates
    pub collider: AABB,
    pub start: Point3<f32>,
    pub motion: Vector3<f32>,
    pub requested_materials: MaterialMask,
    pub report_overlaps: bool,
}

/// Base candidate: where and when along the motion a contact happens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionCandidate {
    pub point: Point3<f32>,
    /// Fraction of the motion, 0..=1
    pub time_fraction: f32,
}

impl Default for CollisionCandidate {
    fn default() -> Self {
        Self {
            point: Point3::new(0.0, 0.0, 0.0),
            time_fraction: 0.0,
        }
    }
}

impl CollisionCandidate {
    /// Ascending by time; equal times compare equal so a stable sort keeps
    /// discovery order
    pub fn compare(&self, other: &CollisionCandidate) -> Ordering {
        self.time_fraction.total_cmp(&other.time_fraction)
    }
}

/// Which consumer callback a candidate is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CandidateKind {
    #[default]
    Solid,
    Damage,
    Trigger,
    Fluid,
}

/// Candidate produced by a block (or its fluid)
#[derive(Debug, Clone, PartialEq)]
pub struct BlockCollisionCandidate {
    pub base: CollisionCandidate,
    pub kind: CandidateKind,
    /// Origin cell of the block; multi-block fillers report their origin
    pub block: VoxelPos,
    pub block_id: BlockId,
    pub fluid_id: FluidId,
    pub material: MaterialMask,
    /// Index of the detail box that produced the contact
    pub detail_index: usize,
    pub normal: Vector3<f32>,
    /// Contact begins within epsilon of the start of the motion
    pub touching: bool,
    /// Collider already overlapped the box at the start of the motion
    pub overlapping: bool,
    pub damage: f32,
    pub fill_height: f32,
    pub trigger: Option<TriggerTag>,
    pub submerged: bool,
}

impl Default for BlockCollisionCandidate {
    fn default() -> Self {
        Self {
            base: CollisionCandidate::default(),
            kind: CandidateKind::Solid,
            block: VoxelPos::new(0, 0, 0),
            block_id: BlockId::AIR,
            fluid_id: FluidId::NONE,
            material: MaterialMask::EMPTY,
            detail_index: 0,
            normal: Vector3::zero(),
            touching: false,
            overlapping: false,
            damage: 0.0,
            fill_height: 0.0,
            trigger: None,
            submerged: false,
        }
    }
}

impl Poolable for BlockCollisionCandidate {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

impl BlockCollisionCandidate {
    pub fn time_fraction(&self) -> f32 {
        self.base.time_fraction
    }

    /// Value record of a solid contact
    pub fn to_contact_record(&self, ground_normal_threshold: f32) -> ContactRecord {
        ContactRecord {
            normal: self.normal,
            point: self.base.point,
            time_fraction: self.base.time_fraction,
            on_ground: self.normal.y >= ground_normal_threshold,
            damage: self.damage,
            submerged: self.submerged,
        }
    }
}

/// A solid contact as delivered to consumers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactRecord {
    /// Points from the block towards the collider
    pub normal: Vector3<f32>,
    pub point: Point3<f32>,
    pub time_fraction: f32,
    pub on_ground: bool,
    pub damage: f32,
    /// The block's own fluid reaches the contact point
    pub submerged: bool,
}

/// Strategy a cast ran with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CastStrategy {
    /// Empty mask or zero-volume collider
    #[default]
    NoOp,
    ShortDistance,
    Iterative,
}

/// Per-cast diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CastStats {
    pub strategy: CastStrategy,
    /// Distinct cells listed along the padded path
    pub cells_in_range: usize,
    /// Cells whose padded box the collider can reach
    pub cells_reachable: usize,
    /// Cells skipped because they could not beat the earliest solid contact
    pub cells_pruned: usize,
    /// Cells skipped by the material mask
    pub cells_masked: usize,
    pub candidates: usize,
    /// Candidates dropped for arriving after the earliest solid contact
    pub events_dropped: usize,
    pub events_dispatched: usize,
    pub sampler: SamplerStats,
}
