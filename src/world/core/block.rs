use super::shape::BoundingBoxSet;
use crate::constants::{blocks, fluids};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Unique identifier for a block type
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    bytemuck::Pod,
    bytemuck::Zeroable,
)]
#[repr(transparent)]
pub struct BlockId(pub u16);

impl Default for BlockId {
    fn default() -> Self {
        BlockId::AIR
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            BlockId::AIR => write!(f, "Air"),
            BlockId::STONE => write!(f, "Stone"),
            BlockId::SLAB => write!(f, "Slab"),
            BlockId::FENCE => write!(f, "Fence"),
            BlockId::DOOR => write!(f, "Door"),
            BlockId::PRESSURE_PLATE => write!(f, "Pressure Plate"),
            BlockId::CACTUS => write!(f, "Cactus"),
            BlockId::CAMPFIRE => write!(f, "Campfire"),
            _ => write!(f, "Block({})", self.0),
        }
    }
}

impl BlockId {
    pub const AIR: BlockId = BlockId(blocks::AIR);
    pub const STONE: BlockId = BlockId(blocks::STONE);
    pub const SLAB: BlockId = BlockId(blocks::SLAB);
    pub const FENCE: BlockId = BlockId(blocks::FENCE);
    pub const DOOR: BlockId = BlockId(blocks::DOOR);
    pub const PRESSURE_PLATE: BlockId = BlockId(blocks::PRESSURE_PLATE);
    pub const CACTUS: BlockId = BlockId(blocks::CACTUS);
    pub const CAMPFIRE: BlockId = BlockId(blocks::CAMPFIRE);

    /// Create a new BlockId from a raw u16 value
    pub const fn new(id: u16) -> Self {
        BlockId(id)
    }
}

/// Unique identifier for a fluid type; `FluidId::NONE` means no fluid
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    bytemuck::Pod,
    bytemuck::Zeroable,
)]
#[repr(transparent)]
pub struct FluidId(pub u8);

impl FluidId {
    pub const NONE: FluidId = FluidId(fluids::NONE);
    pub const WATER: FluidId = FluidId(fluids::WATER);
    pub const LAVA: FluidId = FluidId(fluids::LAVA);
}

/// Whether a block physically impedes motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockMaterial {
    Empty,
    Solid,
}

/// Logical tag fired when a collider touches a trigger block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerTag(pub u32);

/// Resolved block type definition as stored in the registry
#[derive(Debug, Clone)]
pub struct BlockType {
    pub name: String,
    pub material: BlockMaterial,
    /// Hitboxes in block-local coordinates (origin at the block's min corner)
    pub hitboxes: Arc<BoundingBoxSet>,
    /// Damage per contact
    pub damage: f32,
    pub trigger: Option<TriggerTag>,
    /// Shape spans several cells; the non-origin cells are stored as fillers
    pub multiblock: bool,
}

impl BlockType {
    pub fn air() -> Self {
        Self {
            name: "air".to_string(),
            material: BlockMaterial::Empty,
            hitboxes: Arc::new(BoundingBoxSet::empty()),
            damage: 0.0,
            trigger: None,
            multiblock: false,
        }
    }

    pub fn is_solid(&self) -> bool {
        self.material == BlockMaterial::Solid
    }
}

/// Resolved fluid definition
#[derive(Debug, Clone)]
pub struct FluidType {
    pub name: String,
    /// Damage per contact
    pub damage: f32,
    /// Level that fills the whole cell
    pub max_level: u8,
}

impl FluidType {
    /// Fraction of the cell height occupied at `level`
    pub fn fill_height(&self, level: u8) -> f32 {
        if self.max_level == 0 {
            return 0.0;
        }
        (level.min(self.max_level) as f32) / (self.max_level as f32)
    }
}
