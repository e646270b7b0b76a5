//! Read-only world interface used by collision queries
//!
//! Collision code never touches `WorldData` directly. Anything that can hand
//! out chunk columns and asset registries can be swept against, which keeps
//! the probe usable with streamed or snapshot worlds.

use super::core::{AssetRegistries, ChunkPos};
use super::data_types::{ChunkColumn, WorldData};

/// Spatial index of loaded chunks plus the registries that give ids meaning
pub trait BlockWorld {
    fn registries(&self) -> &AssetRegistries;

    /// Loaded column at `pos`, `None` if it is not resident
    fn lookup_chunk(&self, pos: ChunkPos) -> Option<&ChunkColumn>;
}

impl BlockWorld for WorldData {
    fn registries(&self) -> &AssetRegistries {
        &self.registries
    }

    fn lookup_chunk(&self, pos: ChunkPos) -> Option<&ChunkColumn> {
        self.chunks.get(&pos)
    }
}
