//! World Module
//!
//! Voxel storage the collision engine sweeps against.
//!
//! # Architecture Overview
//!
//! - **Core**: Fundamental data types (ids, positions, shapes, registries)
//! - **Blocks**: Basic engine content
//! - **Data types / operations**: Column and section storage plus the DOP
//!   functions that edit it
//! - **Interfaces**: The read-only `BlockWorld` view collision queries use

pub mod blocks;
pub mod core;
pub mod data_types;
pub mod error;
pub mod interfaces;
pub mod world_operations;

// Re-export core types for convenience
pub use self::core::{
    AssetRegistries, BlockId, BlockMaterial, BlockRegistry, BlockType, BoundingBoxSet, ChunkPos,
    FluidId, FluidRegistry, FluidType, TriggerTag, VoxelPos,
};

pub use data_types::{ChunkColumn, ChunkSection, WorldData};
pub use error::WorldError;
pub use interfaces::BlockWorld;

// Re-export DOP world operations as the primary API
pub use world_operations::{
    fill_blocks, get_block, get_fluid, get_loaded_chunks, is_chunk_loaded, load_chunk,
    log_world_stats, place_multiblock, set_block, set_fluid, unload_chunk, validate_world_data,
};

// Re-export block system
pub use blocks::{create_basic_registries, register_basic_blocks};
