//! Resolved view of one world cell
//!
//! A snapshot is a reusable scratch value. The sampler overwrites it on every
//! read, so anything that must outlive the next read is copied out with
//! `assign`.

use super::material::MaterialMask;
use crate::error::EngineResult;
use crate::world::core::{
    AssetRegistries, BlockId, BlockType, BoundingBoxSet, FluidId, FluidType, VoxelPos,
};

#[derive(Debug, Clone, Copy)]
pub struct BlockSnapshot<'w> {
    pub position: VoxelPos,
    pub block_id: BlockId,
    pub fluid_id: FluidId,
    pub fluid_level: u8,
    pub block_type: Option<&'w BlockType>,
    pub fluid_type: Option<&'w FluidType>,
    pub material: MaterialMask,
    /// Fraction of the cell filled by fluid, 0..=1
    pub fill_height: f32,
    /// Offset from this cell to its multi-block origin, `None` for origins
    pub origin_offset: Option<[i8; 3]>,
    registries: Option<&'w AssetRegistries>,
    bounding_boxes: Option<&'w BoundingBoxSet>,
}

impl<'w> Default for BlockSnapshot<'w> {
    fn default() -> Self {
        Self {
            position: VoxelPos::new(0, 0, 0),
            block_id: BlockId::AIR,
            fluid_id: FluidId::NONE,
            fluid_level: 0,
            block_type: None,
            fluid_type: None,
            material: MaterialMask::EMPTY,
            fill_height: 0.0,
            origin_offset: None,
            registries: None,
            bounding_boxes: None,
        }
    }
}

impl<'w> BlockSnapshot<'w> {
    /// Fill every field from already resolved definitions
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn populate(
        &mut self,
        registries: &'w AssetRegistries,
        position: VoxelPos,
        block_id: BlockId,
        block_type: &'w BlockType,
        fluid: Option<(FluidId, u8, &'w FluidType)>,
        origin_offset: Option<[i8; 3]>,
    ) {
        self.clear();
        self.registries = Some(registries);
        self.position = position;
        self.block_id = block_id;
        self.block_type = Some(block_type);
        self.origin_offset = origin_offset;

        let mut material = MaterialMask::EMPTY;
        if block_type.is_solid() {
            material |= MaterialMask::SOLID;
        }
        if block_type.trigger.is_some() {
            material |= MaterialMask::TRIGGER;
        }
        if block_type.damage > 0.0 {
            material |= MaterialMask::DAMAGE;
        }

        if let Some((fluid_id, level, fluid_type)) = fluid {
            self.fluid_id = fluid_id;
            self.fluid_level = level;
            self.fluid_type = Some(fluid_type);
            self.fill_height = fluid_type.fill_height(level);
            if self.fill_height > 0.0 {
                material |= MaterialMask::FLUID;
                if fluid_type.damage > 0.0 {
                    material |= MaterialMask::DAMAGE;
                }
            }
        }

        self.material = material;
    }

    /// True when this cell is a non-origin part of a multi-block structure
    pub fn is_filler(&self) -> bool {
        self.origin_offset.is_some()
    }

    /// Coordinate of the multi-block origin; a non-filler is its own origin
    pub fn origin_coordinate(&self) -> VoxelPos {
        match self.origin_offset {
            Some([dx, dy, dz]) => self.position.offset(dx as i32, dy as i32, dz as i32),
            None => self.position,
        }
    }

    /// Collision shape in block-local coordinates, resolved on first use
    pub fn bounding_boxes(&mut self) -> EngineResult<&'w BoundingBoxSet> {
        if let Some(boxes) = self.bounding_boxes {
            return Ok(boxes);
        }
        let boxes = match self.registries {
            Some(registries) => registries.blocks.resolve_bounding_boxes(self.block_id)?,
            None => return Ok(empty_shape()),
        };
        self.bounding_boxes = Some(boxes);
        Ok(boxes)
    }

    pub fn block_damage(&self) -> f32 {
        self.block_type.map_or(0.0, |block| block.damage)
    }

    /// Damage of the fluid in this cell, zero for an empty fill
    pub fn fluid_damage(&self) -> f32 {
        if self.fill_height <= 0.0 {
            return 0.0;
        }
        self.fluid_type.map_or(0.0, |fluid| fluid.damage)
    }

    /// Block damage plus the damage of any contained fluid
    pub fn total_damage(&self) -> f32 {
        self.block_damage() + self.fluid_damage()
    }

    /// Shallow copy of another snapshot, including its shape cache
    pub fn assign(&mut self, other: &BlockSnapshot<'w>) {
        *self = *other;
    }

    /// Reset to an air cell with no fluid and drop the shape cache
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn empty_shape() -> &'static BoundingBoxSet {
    static EMPTY: std::sync::OnceLock<BoundingBoxSet> = std::sync::OnceLock::new();
    EMPTY.get_or_init(BoundingBoxSet::empty)
}
