//! World Error Handling
//!
//! Error types for world mutation operations.

// WorldError for DOP operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorldError {
    #[error("Chunk not loaded")]
    ChunkNotLoaded,

    #[error("Invalid position")]
    InvalidPosition,

    #[error("Footprint of multiblock {name} collides at {pos:?}")]
    FootprintBlocked { name: String, pos: (i32, i32, i32) },

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}
