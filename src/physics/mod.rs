//! Physics Module - swept collision against the block world

pub mod aabb;
pub mod block_sampler;
pub mod block_snapshot;
pub mod collision_data;
pub mod collision_probe;
pub mod consumer;
pub mod material;
pub mod trigger_tracker;

#[cfg(test)]
mod tests;

pub use aabb::{SweepHit, AABB};
pub use block_sampler::{log_sampler_stats, SamplerStats, WorldBlockSampler};
pub use block_snapshot::BlockSnapshot;
pub use collision_data::{
    BlockCollisionCandidate, CandidateKind, CastStats, CastStrategy, CollisionCandidate,
    ContactRecord, SweepQuery,
};
pub use collision_probe::CollisionProbe;
pub use consumer::{CollisionConsumer, CollisionEvent, CollisionEvents};
pub use material::MaterialMask;
pub use trigger_tracker::TriggerTracker;
