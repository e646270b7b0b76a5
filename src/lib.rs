// Hearth Collision - swept block collision for voxel worlds
//
// Data-oriented layout carried over from the engine:
// - *_data.rs files hold plain data, *_operations.rs files hold the functions over it
// - world_operations for world manipulation
// - physics::CollisionProbe is the single entry point for collision queries

// Constants module
pub mod constants;

// Core modules
pub mod config;
pub mod error;
pub mod memory;
pub mod physics;
pub mod world;

pub use config::{CollisionConfig, MissingChunkPolicy};
pub use error::{EngineError, EngineResult, ErrorContext, OptionExt};

// === Collision ===
pub use physics::{
    BlockCollisionCandidate, BlockSnapshot, CastStats, CastStrategy, CollisionCandidate,
    CollisionConsumer, CollisionEvent, CollisionEvents, CollisionProbe, ContactRecord,
    MaterialMask, SamplerStats, SweepQuery, TriggerTracker, WorldBlockSampler, AABB,
};

// === Core World Types ===
pub use world::{
    AssetRegistries, BlockId, BlockRegistry, BlockType, BlockWorld, BoundingBoxSet, ChunkColumn,
    ChunkPos, ChunkSection, FluidId, FluidRegistry, FluidType, TriggerTag, VoxelPos, WorldData,
    WorldError,
};
pub use world::{create_basic_registries, register_basic_blocks};
