use super::block::{BlockId, BlockType, FluidId, FluidType};
use super::shape::BoundingBoxSet;
use crate::constants::blocks::{ENGINE_BLOCK_LIMIT, GAME_BLOCK_START};
use crate::error::{EngineError, EngineResult, OptionExt};
use rustc_hash::FxHashMap;

/// Block registration data
#[derive(Debug, Clone)]
pub struct BlockRegistration {
    pub id: BlockId,
    pub name: String,
}

/// Registry that stores all block types as data
#[derive(Debug)]
pub struct BlockRegistry {
    /// Dense table indexed by BlockId
    blocks: Vec<Option<BlockType>>,
    /// Map from name to BlockId
    name_to_id: FxHashMap<String, BlockId>,
    /// All registered blocks
    registrations: Vec<BlockRegistration>,
    next_engine_id: u16,
    next_game_id: u16,
    /// Largest amount a single-cell shape reaches outside its cell
    max_overhang: f32,
}

impl BlockRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            blocks: Vec::new(),
            name_to_id: FxHashMap::default(),
            registrations: Vec::new(),
            next_engine_id: 1, // 0 is reserved for AIR, engine blocks use 1-99
            next_game_id: GAME_BLOCK_START,
            max_overhang: 0.0,
        };
        registry.insert(BlockId::AIR, "air", BlockType::air());
        registry
    }

    /// Register a new block type
    ///
    /// Names without a namespace (or with `engine:`) get engine IDs, namespaced
    /// names like `my_game:lever` get game IDs starting at 100.
    pub fn register_block(&mut self, name: &str, block: BlockType) -> EngineResult<BlockId> {
        if self.name_to_id.contains_key(name) {
            return Err(EngineError::InvalidConfig {
                field: "block name".to_string(),
                value: name.to_string(),
                reason: "already registered".to_string(),
            });
        }

        let is_engine_block = name.starts_with("engine:") || !name.contains(':');
        let id = if is_engine_block {
            if self.next_engine_id >= ENGINE_BLOCK_LIMIT {
                return Err(EngineError::ResourceExhausted(format!(
                    "too many engine blocks registered (max {})",
                    ENGINE_BLOCK_LIMIT - 1
                )));
            }
            let id = BlockId(self.next_engine_id);
            self.next_engine_id += 1;
            id
        } else {
            let id = BlockId(self.next_game_id);
            self.next_game_id = self.next_game_id.checked_add(1).ok_or_else(|| {
                EngineError::ResourceExhausted("block id space exhausted".to_string())
            })?;
            id
        };

        self.insert(id, name, block);
        log::info!(
            "[BlockRegistry] Registered block '{}' with ID {} (engine: {})",
            name,
            id.0,
            is_engine_block
        );
        Ok(id)
    }

    fn insert(&mut self, id: BlockId, name: &str, block: BlockType) {
        if !block.multiblock {
            self.max_overhang = self.max_overhang.max(block.hitboxes.overhang());
        }

        let index = id.0 as usize;
        if self.blocks.len() <= index {
            self.blocks.resize_with(index + 1, || None);
        }
        self.blocks[index] = Some(block);
        self.name_to_id.insert(name.to_string(), id);
        self.registrations.push(BlockRegistration {
            id,
            name: name.to_string(),
        });
    }

    /// Get block type by ID
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Resolve a block type, failing for unknown ids
    pub fn resolve_block_type(&self, id: BlockId) -> EngineResult<&BlockType> {
        self.get(id)
            .ok_or_engine(|| EngineError::InvalidBlockType { id: id.0 })
    }

    /// Resolve the collision shape of a block type
    pub fn resolve_bounding_boxes(&self, id: BlockId) -> EngineResult<&BoundingBoxSet> {
        self.resolve_block_type(id).map(|block| block.hitboxes.as_ref())
    }

    /// Get a block ID by name
    pub fn get_id(&self, name: &str) -> Option<BlockId> {
        self.name_to_id.get(name).copied()
    }

    /// Get all registered blocks
    pub fn get_registrations(&self) -> &[BlockRegistration] {
        &self.registrations
    }

    /// Check if a block ID is registered
    pub fn is_registered(&self, id: BlockId) -> bool {
        self.get(id).is_some()
    }

    /// Cells the broad phase must pad its search by to catch overhanging shapes
    pub fn broad_phase_padding(&self) -> i32 {
        self.max_overhang.ceil() as i32
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry of fluid definitions indexed by FluidId
#[derive(Debug)]
pub struct FluidRegistry {
    fluids: Vec<Option<FluidType>>,
    name_to_id: FxHashMap<String, FluidId>,
}

impl FluidRegistry {
    pub fn new() -> Self {
        Self {
            // Slot 0 is FluidId::NONE
            fluids: vec![None],
            name_to_id: FxHashMap::default(),
        }
    }

    pub fn register_fluid(&mut self, name: &str, fluid: FluidType) -> EngineResult<FluidId> {
        if self.fluids.len() > u8::MAX as usize {
            return Err(EngineError::ResourceExhausted(
                "too many fluids registered (max 255)".to_string(),
            ));
        }
        let id = FluidId(self.fluids.len() as u8);
        self.fluids.push(Some(fluid));
        self.name_to_id.insert(name.to_string(), id);
        log::info!("[FluidRegistry] Registered fluid '{}' with ID {}", name, id.0);
        Ok(id)
    }

    pub fn get(&self, id: FluidId) -> Option<&FluidType> {
        self.fluids.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Resolve a fluid; `FluidId::NONE` resolves to `None`
    pub fn resolve_fluid(&self, id: FluidId) -> EngineResult<Option<&FluidType>> {
        if id == FluidId::NONE {
            return Ok(None);
        }
        self.get(id)
            .map(Some)
            .ok_or_engine(|| EngineError::InvalidFluidType { id: id.0 })
    }

    pub fn get_id(&self, name: &str) -> Option<FluidId> {
        self.name_to_id.get(name).copied()
    }
}

impl Default for FluidRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// All asset registries a world exposes to the collision engine
#[derive(Debug, Default)]
pub struct AssetRegistries {
    pub blocks: BlockRegistry,
    pub fluids: FluidRegistry,
}

impl AssetRegistries {
    pub fn new() -> Self {
        Self::default()
    }
}
