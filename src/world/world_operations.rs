//! World Operations - DOP Functions
//!
//! This is the PUBLIC API for world manipulation.
//! Functions take world data and return results; collision queries only ever
//! see the world through a shared borrow, so edits happen between casts.

use super::core::{BlockId, ChunkPos, FluidId, VoxelPos};
use super::data_types::{section_index, ChunkColumn, ChunkSection, WorldData};
use super::error::WorldError;
use crate::constants::core::{CHUNK_SIZE_I32, WORLD_HEIGHT};

// ============================================================================
// BLOCK OPERATIONS
// ============================================================================

fn section_at(world: &WorldData, pos: VoxelPos) -> Option<(&ChunkSection, usize)> {
    let column = world.chunks.get(&pos.to_chunk_pos())?;
    let section = column.section(pos.to_section_index()?)?;
    let (x, y, z) = pos.to_local_pos();
    Some((section, section_index(x, y, z)))
}

fn section_at_mut(
    world: &mut WorldData,
    pos: VoxelPos,
) -> Result<(&mut ChunkColumn, usize, usize), WorldError> {
    let section = pos.to_section_index().ok_or(WorldError::InvalidPosition)?;
    let column = world
        .chunks
        .get_mut(&pos.to_chunk_pos())
        .ok_or(WorldError::ChunkNotLoaded)?;
    let (x, y, z) = pos.to_local_pos();
    Ok((column, section, section_index(x, y, z)))
}

/// Get block at position
///
/// # Returns
/// BlockId at that position, or AIR if unloaded or out of bounds
pub fn get_block(world: &WorldData, pos: VoxelPos) -> BlockId {
    section_at(world, pos)
        .map(|(section, index)| section.block(index))
        .unwrap_or(BlockId::AIR)
}

/// Get fluid id and level at position
pub fn get_fluid(world: &WorldData, pos: VoxelPos) -> (FluidId, u8) {
    section_at(world, pos)
        .map(|(section, index)| section.fluid(index))
        .unwrap_or((FluidId::NONE, 0))
}

/// Set block at position
///
/// Overwriting a filler cell detaches it from its multi-block origin.
pub fn set_block(world: &mut WorldData, pos: VoxelPos, block_id: BlockId) -> Result<(), WorldError> {
    if !world.registries.blocks.is_registered(block_id) {
        return Err(WorldError::OperationFailed(format!(
            "unknown block id {}",
            block_id.0
        )));
    }

    let tick = world.tick;
    let (column, section, index) = section_at_mut(world, pos)?;
    let section = column
        .section_mut(section)
        .ok_or(WorldError::InvalidPosition)?;

    let previous = section.blocks[index];
    if previous == BlockId::AIR && block_id != BlockId::AIR {
        section.non_air_count += 1;
    } else if previous != BlockId::AIR && block_id == BlockId::AIR {
        section.non_air_count = section.non_air_count.saturating_sub(1);
    }
    section.blocks[index] = block_id;
    section.fillers.remove(&(index as u16));
    column.last_modified = tick;

    Ok(())
}

/// Set fluid and level at position; `FluidId::NONE` clears the cell
pub fn set_fluid(
    world: &mut WorldData,
    pos: VoxelPos,
    fluid_id: FluidId,
    level: u8,
) -> Result<(), WorldError> {
    let max_level = match world.registries.fluids.get(fluid_id) {
        Some(fluid) => fluid.max_level,
        None if fluid_id == FluidId::NONE => 0,
        None => {
            return Err(WorldError::OperationFailed(format!(
                "unknown fluid id {}",
                fluid_id.0
            )))
        }
    };

    let tick = world.tick;
    let (column, section, index) = section_at_mut(world, pos)?;
    let section = column
        .section_mut(section)
        .ok_or(WorldError::InvalidPosition)?;

    section.fluids[index] = fluid_id;
    section.fluid_levels[index] = level.min(max_level);
    column.last_modified = tick;

    Ok(())
}

/// Fill every cell of the inclusive box `min..=max` with `block_id`
pub fn fill_blocks(
    world: &mut WorldData,
    min: VoxelPos,
    max: VoxelPos,
    block_id: BlockId,
) -> Result<usize, WorldError> {
    let mut count = 0;
    for z in min.z..=max.z {
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                set_block(world, VoxelPos::new(x, y, z), block_id)?;
                count += 1;
            }
        }
    }
    Ok(count)
}

/// Place a multi-block structure with its origin at `origin`
///
/// The footprint is every cell covered by the block's hitbox bounds. The
/// origin cell stores the block, every other cell is stored as a filler that
/// points back at the origin. All footprint cells must be air.
pub fn place_multiblock(
    world: &mut WorldData,
    origin: VoxelPos,
    block_id: BlockId,
) -> Result<Vec<VoxelPos>, WorldError> {
    let block = world
        .registries
        .blocks
        .get(block_id)
        .ok_or_else(|| WorldError::OperationFailed(format!("unknown block id {}", block_id.0)))?;
    if !block.multiblock {
        return Err(WorldError::OperationFailed(format!(
            "{} is not a multi-block structure",
            block.name
        )));
    }

    let name = block.name.clone();
    let extent = block
        .hitboxes
        .bounds()
        .map(|b| {
            [
                (b.max.x.ceil() as i32).clamp(1, i8::MAX as i32),
                (b.max.y.ceil() as i32).clamp(1, i8::MAX as i32),
                (b.max.z.ceil() as i32).clamp(1, i8::MAX as i32),
            ]
        })
        .unwrap_or([1, 1, 1]);

    let mut footprint = Vec::new();
    for dz in 0..extent[2] {
        for dy in 0..extent[1] {
            for dx in 0..extent[0] {
                let pos = origin.offset(dx, dy, dz);
                if pos.to_section_index().is_none() {
                    return Err(WorldError::InvalidPosition);
                }
                if !is_chunk_loaded(world, pos.to_chunk_pos()) {
                    return Err(WorldError::ChunkNotLoaded);
                }
                if get_block(world, pos) != BlockId::AIR {
                    return Err(WorldError::FootprintBlocked {
                        name,
                        pos: pos.into(),
                    });
                }
                footprint.push(pos);
            }
        }
    }

    for pos in &footprint {
        set_block(world, *pos, block_id)?;
        if *pos == origin {
            continue;
        }
        let offset = [
            (origin.x - pos.x) as i8,
            (origin.y - pos.y) as i8,
            (origin.z - pos.z) as i8,
        ];
        let (column, section, index) = section_at_mut(world, *pos)?;
        if let Some(section) = column.section_mut(section) {
            section.fillers.insert(index as u16, offset);
        }
    }

    log::debug!(
        "[World::place_multiblock] Placed {} at {:?} covering {} cells",
        name,
        origin,
        footprint.len()
    );
    Ok(footprint)
}

// ============================================================================
// CHUNK OPERATIONS
// ============================================================================

/// Check if chunk is loaded
pub fn is_chunk_loaded(world: &WorldData, chunk_pos: ChunkPos) -> bool {
    world.chunks.contains_key(&chunk_pos)
}

/// Load an empty (all air) column if it is not loaded yet
pub fn load_chunk(world: &mut WorldData, chunk_pos: ChunkPos) -> Result<(), WorldError> {
    if world.chunks.contains_key(&chunk_pos) {
        return Ok(());
    }
    world.chunks.insert(chunk_pos, ChunkColumn::new(chunk_pos));
    log::trace!("[World::load_chunk] Loaded chunk {:?}", chunk_pos);
    Ok(())
}

/// Unload chunk
pub fn unload_chunk(world: &mut WorldData, chunk_pos: ChunkPos) -> Result<(), WorldError> {
    world
        .chunks
        .remove(&chunk_pos)
        .map(|_| ())
        .ok_or(WorldError::ChunkNotLoaded)
}

/// Get all loaded chunks
pub fn get_loaded_chunks(world: &WorldData) -> Vec<ChunkPos> {
    world.chunks.keys().copied().collect()
}

// ============================================================================
// DIAGNOSTICS
// ============================================================================

/// Log world statistics
pub fn log_world_stats(world: &WorldData) {
    let sections: usize = world.chunks.values().map(|c| c.allocated_sections()).sum();
    let fillers: usize = world
        .chunks
        .values()
        .flat_map(|c| c.sections.iter().flatten())
        .map(|s| s.fillers.len())
        .sum();

    log::info!("[World] Statistics:");
    log::info!("  Tick: {}", world.tick);
    log::info!("  Loaded chunks: {}", world.chunks.len());
    log::info!("  Allocated sections: {}", sections);
    log::info!("  Filler cells: {}", fillers);
}

/// Validate world data integrity
///
/// Checks section array sizes and that every filler points at a non-filler
/// origin holding the same block.
pub fn validate_world_data(world: &WorldData) -> Result<(), String> {
    for column in world.chunks.values() {
        for (section_y, section) in column.sections.iter().enumerate() {
            let Some(section) = section else { continue };

            let expected = crate::constants::core::BLOCKS_PER_SECTION;
            if section.blocks.len() != expected
                || section.fluids.len() != expected
                || section.fluid_levels.len() != expected
            {
                return Err(format!(
                    "Section {} of chunk {:?} has wrong array sizes",
                    section_y, column.position
                ));
            }

            for (&index, offset) in &section.fillers {
                let index = index as i32;
                let local = (
                    index % CHUNK_SIZE_I32,
                    (index / CHUNK_SIZE_I32) % CHUNK_SIZE_I32,
                    index / (CHUNK_SIZE_I32 * CHUNK_SIZE_I32),
                );
                let base = column.position.to_voxel_origin();
                let pos = VoxelPos::new(
                    base.x + local.0,
                    section_y as i32 * CHUNK_SIZE_I32 + local.1,
                    base.z + local.2,
                );
                let origin = pos.offset(offset[0] as i32, offset[1] as i32, offset[2] as i32);

                if origin.y < 0 || origin.y >= WORLD_HEIGHT {
                    return Err(format!("Filler at {:?} points outside the world", pos));
                }
                if let Some((origin_section, origin_index)) = section_at(world, origin) {
                    if origin_section.filler_offset(origin_index).is_some() {
                        return Err(format!(
                            "Filler at {:?} points at another filler {:?}",
                            pos, origin
                        ));
                    }
                    if origin_section.block(origin_index) != section.block(index as usize) {
                        return Err(format!(
                            "Filler at {:?} does not match its origin {:?}",
                            pos, origin
                        ));
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::blocks::create_basic_registries;
    use std::sync::Arc;

    fn test_world() -> WorldData {
        let registries = create_basic_registries().expect("basic content registers");
        let mut world = WorldData::new(Arc::new(registries));
        load_chunk(&mut world, ChunkPos::new(0, 0)).expect("load chunk");
        world
    }

    #[test]
    fn test_set_and_get_block() {
        let mut world = test_world();
        let pos = VoxelPos::new(3, 40, 7);

        set_block(&mut world, pos, BlockId::STONE).expect("set block");
        assert_eq!(get_block(&world, pos), BlockId::STONE);
        assert_eq!(get_block(&world, VoxelPos::new(100, 0, 0)), BlockId::AIR);

        let err = set_block(&mut world, VoxelPos::new(100, 0, 0), BlockId::STONE);
        assert_eq!(err, Err(WorldError::ChunkNotLoaded));
        let err = set_block(&mut world, VoxelPos::new(0, -1, 0), BlockId::STONE);
        assert_eq!(err, Err(WorldError::InvalidPosition));
    }

    #[test]
    fn test_fluid_level_is_clamped() {
        let mut world = test_world();
        let pos = VoxelPos::new(1, 1, 1);

        set_fluid(&mut world, pos, FluidId::WATER, 200).expect("set fluid");
        assert_eq!(get_fluid(&world, pos), (FluidId::WATER, 8));
    }

    #[test]
    fn test_place_multiblock_writes_fillers() {
        let mut world = test_world();
        let origin = VoxelPos::new(4, 10, 4);

        let footprint = place_multiblock(&mut world, origin, BlockId::DOOR).expect("place door");
        assert_eq!(footprint, vec![origin, origin.offset(0, 1, 0)]);

        let (section, index) = section_at(&world, origin.offset(0, 1, 0)).expect("loaded");
        assert_eq!(section.filler_offset(index), Some([0, -1, 0]));
        assert!(validate_world_data(&world).is_ok());

        let blocked = place_multiblock(&mut world, origin.offset(0, 1, 0), BlockId::DOOR);
        assert!(matches!(blocked, Err(WorldError::FootprintBlocked { .. })));
    }

    #[test]
    fn test_unload_chunk() {
        let mut world = test_world();
        assert!(unload_chunk(&mut world, ChunkPos::new(0, 0)).is_ok());
        assert_eq!(
            unload_chunk(&mut world, ChunkPos::new(0, 0)),
            Err(WorldError::ChunkNotLoaded)
        );
        assert!(get_loaded_chunks(&world).is_empty());
    }
}
