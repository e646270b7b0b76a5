//! Core world data types and fundamental structures
//!
//! Block and fluid identifiers, positions, collision shapes and the asset
//! registries that resolve ids into definitions.

mod block;
mod position;
mod registry;
mod shape;

pub use block::{BlockId, BlockMaterial, BlockType, FluidId, FluidType, TriggerTag};
pub use position::{ChunkPos, VoxelPos};
pub use registry::{AssetRegistries, BlockRegistration, BlockRegistry, FluidRegistry};
pub use shape::BoundingBoxSet;
