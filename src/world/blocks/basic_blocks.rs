//! Basic engine blocks and fluids
//!
//! This module defines the fundamental content that comes with the engine.
//! Games can register additional blocks on top of these.

use crate::constants::fluids::DEFAULT_MAX_LEVEL;
use crate::error::{EngineError, EngineResult};
use crate::physics::aabb::create_aabb;
use crate::world::core::{
    AssetRegistries, BlockId, BlockMaterial, BlockType, BoundingBoxSet, FluidId, FluidType,
    TriggerTag,
};
use cgmath::Point3;
use std::sync::Arc;

/// Trigger tag fired by pressure plates
pub const PRESSURE_PLATE_TRIGGER: TriggerTag = TriggerTag(1);

fn shape(boxes: &[([f32; 3], [f32; 3])]) -> Arc<BoundingBoxSet> {
    Arc::new(BoundingBoxSet::from_boxes(
        boxes
            .iter()
            .map(|(min, max)| create_aabb(Point3::from(*min), Point3::from(*max)))
            .collect(),
    ))
}

/// Create stone block type
pub fn create_stone_type() -> BlockType {
    BlockType {
        name: "stone".to_string(),
        material: BlockMaterial::Solid,
        hitboxes: Arc::new(BoundingBoxSet::full_cube()),
        damage: 0.0,
        trigger: None,
        multiblock: false,
    }
}

/// Create bottom slab block type (lower 40% of the cell)
pub fn create_slab_type() -> BlockType {
    BlockType {
        name: "slab".to_string(),
        material: BlockMaterial::Solid,
        hitboxes: shape(&[([0.0, 0.0, 0.0], [1.0, 0.4, 1.0])]),
        damage: 0.0,
        trigger: None,
        multiblock: false,
    }
}

/// Create fence block type: a post plus a rail, taller than one block
pub fn create_fence_type() -> BlockType {
    BlockType {
        name: "fence".to_string(),
        material: BlockMaterial::Solid,
        hitboxes: shape(&[
            ([0.375, 0.0, 0.375], [0.625, 1.5, 0.625]),
            ([0.0, 0.75, 0.4375], [1.0, 1.5, 0.5625]),
        ]),
        damage: 0.0,
        trigger: None,
        multiblock: false,
    }
}

/// Create door block type; the origin cell is the bottom half
pub fn create_door_type() -> BlockType {
    BlockType {
        name: "door".to_string(),
        material: BlockMaterial::Solid,
        hitboxes: shape(&[([0.0, 0.0, 0.0], [1.0, 2.0, 0.1875])]),
        damage: 0.0,
        trigger: None,
        multiblock: true,
    }
}

/// Create pressure plate block type: walk-through, fires a trigger
pub fn create_pressure_plate_type() -> BlockType {
    BlockType {
        name: "pressure_plate".to_string(),
        material: BlockMaterial::Empty,
        hitboxes: shape(&[
            ([0.0625, 0.0, 0.0625], [0.5, 0.0625, 0.9375]),
            ([0.5, 0.0, 0.0625], [0.9375, 0.0625, 0.9375]),
        ]),
        damage: 0.0,
        trigger: Some(PRESSURE_PLATE_TRIGGER),
        multiblock: false,
    }
}

/// Create cactus block type: solid and damaging
pub fn create_cactus_type() -> BlockType {
    BlockType {
        name: "cactus".to_string(),
        material: BlockMaterial::Solid,
        hitboxes: shape(&[([0.0625, 0.0, 0.0625], [0.9375, 1.0, 0.9375])]),
        damage: 1.0,
        trigger: None,
        multiblock: false,
    }
}

/// Create campfire block type: walk-through but damaging
pub fn create_campfire_type() -> BlockType {
    BlockType {
        name: "campfire".to_string(),
        material: BlockMaterial::Empty,
        hitboxes: shape(&[([0.0, 0.0, 0.0], [1.0, 0.4375, 1.0])]),
        damage: 1.0,
        trigger: None,
        multiblock: false,
    }
}

pub fn create_water_type() -> FluidType {
    FluidType {
        name: "water".to_string(),
        damage: 0.0,
        max_level: DEFAULT_MAX_LEVEL,
    }
}

pub fn create_lava_type() -> FluidType {
    FluidType {
        name: "lava".to_string(),
        damage: 4.0,
        max_level: DEFAULT_MAX_LEVEL,
    }
}

/// Register all basic engine blocks and fluids
///
/// Registration order fixes the ids, which must line up with the constants
/// in `BlockId` and `FluidId`.
pub fn register_basic_blocks(registries: &mut AssetRegistries) -> EngineResult<()> {
    // Air (BlockId 0) is registered by the registry itself
    let blocks = [
        ("engine:stone", BlockId::STONE, create_stone_type()),
        ("engine:slab", BlockId::SLAB, create_slab_type()),
        ("engine:fence", BlockId::FENCE, create_fence_type()),
        ("engine:door", BlockId::DOOR, create_door_type()),
        ("engine:pressure_plate", BlockId::PRESSURE_PLATE, create_pressure_plate_type()),
        ("engine:cactus", BlockId::CACTUS, create_cactus_type()),
        ("engine:campfire", BlockId::CAMPFIRE, create_campfire_type()),
    ];
    for (name, expected, block) in blocks {
        let id = registries.blocks.register_block(name, block)?;
        if id != expected {
            return Err(EngineError::Internal {
                message: format!("{} registered as {} instead of {}", name, id.0, expected.0),
            });
        }
    }

    let fluids = [
        ("engine:water", FluidId::WATER, create_water_type()),
        ("engine:lava", FluidId::LAVA, create_lava_type()),
    ];
    for (name, expected, fluid) in fluids {
        let id = registries.fluids.register_fluid(name, fluid)?;
        if id != expected {
            return Err(EngineError::Internal {
                message: format!("{} registered as {} instead of {}", name, id.0, expected.0),
            });
        }
    }

    Ok(())
}

/// Registries pre-filled with the basic content
pub fn create_basic_registries() -> EngineResult<AssetRegistries> {
    let mut registries = AssetRegistries::new();
    register_basic_blocks(&mut registries)?;
    Ok(registries)
}
