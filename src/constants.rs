// Hearth Collision Constants - SINGLE SOURCE OF TRUTH
//
// This file contains ALL constants used by the collision engine.
// Do NOT define tuning constants anywhere else in the codebase!

/// Core world layout constants
pub mod core {
    /// Chunk columns are CHUNK_SIZE wide on X and Z
    pub const CHUNK_SIZE: u32 = 32;
    pub const CHUNK_SIZE_I32: i32 = CHUNK_SIZE as i32;

    /// Sections are CHUNK_SIZE³ cubes stacked inside a column
    pub const SECTION_SIZE: u32 = CHUNK_SIZE;
    pub const SECTIONS_PER_CHUNK: u32 = 10;
    pub const BLOCKS_PER_SECTION: usize = (SECTION_SIZE * SECTION_SIZE * SECTION_SIZE) as usize;

    /// World height in blocks (y in 0..WORLD_HEIGHT)
    pub const WORLD_HEIGHT: i32 = (SECTION_SIZE * SECTIONS_PER_CHUNK) as i32;
}

/// Block ID constants - raw u16 values
pub mod blocks {
    // Core engine blocks (0-99)
    pub const AIR: u16 = 0;
    pub const STONE: u16 = 1;
    pub const SLAB: u16 = 2;
    pub const FENCE: u16 = 3;
    pub const DOOR: u16 = 4;
    pub const PRESSURE_PLATE: u16 = 5;
    pub const CACTUS: u16 = 6;
    pub const CAMPFIRE: u16 = 7;

    /// Engine blocks live below this id
    pub const ENGINE_BLOCK_LIMIT: u16 = 100;

    // Reserved for game-specific blocks (100+)
    pub const GAME_BLOCK_START: u16 = 100;
}

/// Fluid ID constants - raw u8 values
pub mod fluids {
    pub const NONE: u8 = 0;
    pub const WATER: u8 = 1;
    pub const LAVA: u8 = 2;

    /// Full fluid cell level
    pub const DEFAULT_MAX_LEVEL: u8 = 8;
}

/// Collision tuning defaults
pub mod collision {
    /// Motions shorter than this use the static overlap strategy
    pub const SHORT_DISTANCE_THRESHOLD: f32 = 1.0e-4;

    /// Tolerance used to classify touching contacts
    pub const CONTACT_EPSILON: f32 = 1.0e-5;

    /// Minimum normal.y for a contact to count as ground
    pub const GROUND_NORMAL_THRESHOLD: f32 = 0.7;

    /// Upper bound on cells a single cast may enumerate along its path
    pub const MAX_BROAD_PHASE_BLOCKS: usize = 16384;

    /// Pre-allocated candidate slots per probe
    pub const CANDIDATE_POOL_CAPACITY: usize = 64;
}
