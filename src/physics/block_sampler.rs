//! World block sampler
//!
//! Stateful cursor that turns world coordinates into `BlockSnapshot`s. Casts
//! visit neighbouring cells, so the last resolved (column, section) pair is
//! cached and consecutive reads inside one section skip the column lookup.
//!
//! A sampler borrows its world for `'w` and is confined to the thread that
//! owns that world; it does no synchronization of its own.

use super::block_snapshot::BlockSnapshot;
use crate::config::MissingChunkPolicy;
use crate::error::{EngineError, EngineResult};
use crate::world::core::{AssetRegistries, BlockId, ChunkPos, VoxelPos};
use crate::world::data_types::{section_index, ChunkSection};
use crate::world::interfaces::BlockWorld;

/// Sampler cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplerStats {
    pub reads: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Column lookups that found no resident chunk
    pub missing_chunks: u64,
    /// Reads above or below the world height
    pub out_of_world: u64,
}

impl SamplerStats {
    pub fn hit_rate(&self) -> f32 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            return 0.0;
        }
        self.cache_hits as f32 / lookups as f32
    }
}

/// Log sampler statistics
pub fn log_sampler_stats(stats: &SamplerStats) {
    log::debug!("[WorldBlockSampler] Statistics:");
    log::debug!("  Reads: {}", stats.reads);
    log::debug!(
        "  Cache hits/misses: {}/{} ({:.1}%)",
        stats.cache_hits,
        stats.cache_misses,
        stats.hit_rate() * 100.0
    );
    log::debug!("  Missing chunks: {}", stats.missing_chunks);
    log::debug!("  Out of world: {}", stats.out_of_world);
}

pub struct WorldBlockSampler<'w, W: BlockWorld> {
    world: Option<&'w W>,
    policy: MissingChunkPolicy,
    /// Identity of the cached section; the section itself may be `None`
    cached_key: Option<(ChunkPos, usize)>,
    cached_section: Option<&'w ChunkSection>,
    snapshot: BlockSnapshot<'w>,
    stats: SamplerStats,
}

impl<'w, W: BlockWorld> WorldBlockSampler<'w, W> {
    pub fn new(policy: MissingChunkPolicy) -> Self {
        Self {
            world: None,
            policy,
            cached_key: None,
            cached_section: None,
            snapshot: BlockSnapshot::default(),
            stats: SamplerStats::default(),
        }
    }

    /// Bind a world and forget any cached chunk identity
    pub fn initialize(&mut self, world: &'w W) {
        self.world = Some(world);
        self.cached_key = None;
        self.cached_section = None;
        self.snapshot.clear();
        self.stats = SamplerStats::default();
    }

    /// Resolve the cell at `pos`
    ///
    /// The returned snapshot is overwritten by the next read.
    pub fn read(&mut self, pos: VoxelPos) -> EngineResult<&mut BlockSnapshot<'w>> {
        let world = self.world.ok_or_else(|| EngineError::Internal {
            message: "WorldBlockSampler::read called before initialize".to_string(),
        })?;
        let registries = world.registries();
        self.stats.reads += 1;

        let Some(section_y) = pos.to_section_index() else {
            self.stats.out_of_world += 1;
            populate_air(&mut self.snapshot, registries, pos)?;
            return Ok(&mut self.snapshot);
        };

        let key = (pos.to_chunk_pos(), section_y);
        if self.cached_key == Some(key) {
            self.stats.cache_hits += 1;
        } else {
            self.stats.cache_misses += 1;
            let column = world.lookup_chunk(key.0);
            if column.is_none() {
                self.stats.missing_chunks += 1;
                if self.policy == MissingChunkPolicy::Fail {
                    return Err(EngineError::ChunkNotLoaded { pos: pos.into() });
                }
                log::trace!(
                    "[WorldBlockSampler::read] Chunk {:?} not loaded, treating {:?} as air",
                    key.0,
                    pos
                );
            }
            self.cached_key = Some(key);
            self.cached_section = column.and_then(|column| column.section(section_y));
        }

        let Some(section) = self.cached_section else {
            populate_air(&mut self.snapshot, registries, pos)?;
            return Ok(&mut self.snapshot);
        };

        let (x, y, z) = pos.to_local_pos();
        let index = section_index(x, y, z);
        let block_id = section.block(index);
        let (fluid_id, level) = section.fluid(index);

        let block_type = registries.blocks.resolve_block_type(block_id)?;
        let fluid = registries
            .fluids
            .resolve_fluid(fluid_id)?
            .map(|fluid_type| (fluid_id, level, fluid_type));

        self.snapshot.populate(
            registries,
            pos,
            block_id,
            block_type,
            fluid,
            section.filler_offset(index),
        );
        Ok(&mut self.snapshot)
    }

    /// Release the world and cached section references
    pub fn cleanup(&mut self) {
        self.world = None;
        self.cached_key = None;
        self.cached_section = None;
        self.snapshot.clear();
    }

    pub fn stats(&self) -> SamplerStats {
        self.stats
    }

    pub fn policy(&self) -> MissingChunkPolicy {
        self.policy
    }
}

fn populate_air<'w>(
    snapshot: &mut BlockSnapshot<'w>,
    registries: &'w AssetRegistries,
    pos: VoxelPos,
) -> EngineResult<()> {
    let air = registries.blocks.resolve_block_type(BlockId::AIR)?;
    snapshot.populate(registries, pos, BlockId::AIR, air, None, None);
    Ok(())
}
