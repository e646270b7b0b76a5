//! World Data Types - DOP Structures
//!
//! These are the data structures that world_operations functions operate on.
//! Storage is column based: a `ChunkColumn` holds a fixed stack of lazily
//! allocated `ChunkSection`s, each a flat SOA of block ids, fluid ids and
//! fluid levels.

use super::core::{AssetRegistries, BlockId, ChunkPos, FluidId};
use crate::constants::core::{BLOCKS_PER_SECTION, SECTIONS_PER_CHUNK, SECTION_SIZE};
use crate::error::{EngineError, EngineResult, ErrorContext};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// One CHUNK_SIZE³ cube of a column (Structure of Arrays)
#[derive(Clone, Debug)]
pub struct ChunkSection {
    /// Block IDs, indexed by `section_index(x, y, z)`
    pub blocks: Vec<BlockId>,

    /// Fluid IDs, same layout as `blocks`
    pub fluids: Vec<FluidId>,

    /// Fluid levels, same layout as `blocks`
    pub fluid_levels: Vec<u8>,

    /// Filler cells of multi-block structures, mapped to the offset of their
    /// origin cell. Sparse since almost every cell is its own origin.
    pub fillers: FxHashMap<u16, [i8; 3]>,

    /// Number of non-air blocks
    pub non_air_count: u32,
}

impl ChunkSection {
    /// Create an all-air section
    pub fn new() -> Self {
        Self {
            blocks: vec![BlockId::AIR; BLOCKS_PER_SECTION],
            fluids: vec![FluidId::NONE; BLOCKS_PER_SECTION],
            fluid_levels: vec![0; BLOCKS_PER_SECTION],
            fillers: FxHashMap::default(),
            non_air_count: 0,
        }
    }

    /// Build a section from raw block ids, e.g. a decoded network payload
    pub fn with_raw_blocks(raw: &[u16]) -> EngineResult<Self> {
        if raw.len() != BLOCKS_PER_SECTION {
            return Err(EngineError::InvalidInput {
                context: format!(
                    "section payload has {} blocks, expected {}",
                    raw.len(),
                    BLOCKS_PER_SECTION
                ),
            });
        }
        let blocks: Vec<BlockId> = bytemuck::try_cast_slice::<u16, BlockId>(raw)
            .context("ChunkSection: section payload")?
            .to_vec();
        let non_air_count = blocks.iter().filter(|b| **b != BlockId::AIR).count() as u32;

        Ok(Self {
            blocks,
            non_air_count,
            ..Self::new()
        })
    }

    pub fn block(&self, index: usize) -> BlockId {
        self.blocks[index]
    }

    pub fn fluid(&self, index: usize) -> (FluidId, u8) {
        (self.fluids[index], self.fluid_levels[index])
    }

    pub fn filler_offset(&self, index: usize) -> Option<[i8; 3]> {
        self.fillers.get(&(index as u16)).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.non_air_count == 0 && self.fluids.iter().all(|f| *f == FluidId::NONE)
    }
}

impl Default for ChunkSection {
    fn default() -> Self {
        Self::new()
    }
}

/// Flat index of a local position inside a section
pub fn section_index(x: u32, y: u32, z: u32) -> usize {
    (x + y * SECTION_SIZE + z * SECTION_SIZE * SECTION_SIZE) as usize
}

/// A vertical stack of sections at one chunk position
#[derive(Clone, Debug)]
pub struct ChunkColumn {
    /// Column position in chunk coordinates
    pub position: ChunkPos,

    /// Sections bottom to top; `None` means all air
    pub sections: Vec<Option<ChunkSection>>,

    /// Last modified tick
    pub last_modified: u64,
}

impl ChunkColumn {
    pub fn new(position: ChunkPos) -> Self {
        Self {
            position,
            sections: vec![None; SECTIONS_PER_CHUNK as usize],
            last_modified: 0,
        }
    }

    /// Section at `index`, `None` if unallocated or out of range
    pub fn section(&self, index: usize) -> Option<&ChunkSection> {
        self.sections.get(index).and_then(Option::as_ref)
    }

    /// Section at `index`, allocating an air section on first write
    pub fn section_mut(&mut self, index: usize) -> Option<&mut ChunkSection> {
        self.sections
            .get_mut(index)
            .map(|slot| slot.get_or_insert_with(ChunkSection::new))
    }

    pub fn allocated_sections(&self) -> usize {
        self.sections.iter().filter(|s| s.is_some()).count()
    }
}

/// World data - the main data structure for world state
///
/// This is what world_operations functions take as parameters.
#[derive(Clone)]
pub struct WorldData {
    /// Loaded chunk columns
    pub chunks: FxHashMap<ChunkPos, ChunkColumn>,

    /// Block and fluid definitions shared with collision queries
    pub registries: Arc<AssetRegistries>,

    /// World tick counter
    pub tick: u64,
}

impl WorldData {
    /// Create new empty world data
    pub fn new(registries: Arc<AssetRegistries>) -> Self {
        Self {
            chunks: FxHashMap::default(),
            registries,
            tick: 0,
        }
    }

    /// Create with pre-allocated chunk capacity
    pub fn with_capacity(registries: Arc<AssetRegistries>, capacity: usize) -> Self {
        let mut chunks = FxHashMap::default();
        chunks.reserve(capacity);
        Self {
            chunks,
            registries,
            tick: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_blocks_are_reinterpreted() {
        let mut raw = vec![0u16; BLOCKS_PER_SECTION];
        raw[section_index(1, 2, 3)] = BlockId::STONE.0;

        let section = ChunkSection::with_raw_blocks(&raw).expect("payload has the right size");
        assert_eq!(section.block(section_index(1, 2, 3)), BlockId::STONE);
        assert_eq!(section.non_air_count, 1);
        assert!(ChunkSection::with_raw_blocks(&raw[..10]).is_err());
    }

    #[test]
    fn test_sections_allocate_on_write() {
        let mut column = ChunkColumn::new(ChunkPos::new(0, 0));
        assert!(column.section(3).is_none());
        assert!(column.section_mut(3).is_some());
        assert!(column.section(3).is_some());
        assert!(column.section_mut(SECTIONS_PER_CHUNK as usize).is_none());
        assert_eq!(column.allocated_sections(), 1);
    }
}
