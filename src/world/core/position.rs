use crate::constants::core::{CHUNK_SIZE_I32, SECTIONS_PER_CHUNK};
use cgmath::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Position of a chunk column in the world (chunk coordinates on X/Z)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// World-space block coordinate of the column's minimum corner at y = 0
    pub fn to_voxel_origin(&self) -> VoxelPos {
        VoxelPos::new(self.x * CHUNK_SIZE_I32, 0, self.z * CHUNK_SIZE_I32)
    }
}

/// Position of a block in the world (world coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoxelPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Get the chunk column this block belongs to
    pub fn to_chunk_pos(&self) -> ChunkPos {
        ChunkPos::new(
            self.x.div_euclid(CHUNK_SIZE_I32),
            self.z.div_euclid(CHUNK_SIZE_I32),
        )
    }

    /// Index of the section inside its column, `None` outside the world height
    pub fn to_section_index(&self) -> Option<usize> {
        if self.y < 0 {
            return None;
        }
        let index = (self.y / CHUNK_SIZE_I32) as u32;
        (index < SECTIONS_PER_CHUNK).then_some(index as usize)
    }

    /// Get local position within the section
    pub fn to_local_pos(&self) -> (u32, u32, u32) {
        (
            self.x.rem_euclid(CHUNK_SIZE_I32) as u32,
            self.y.rem_euclid(CHUNK_SIZE_I32) as u32,
            self.z.rem_euclid(CHUNK_SIZE_I32) as u32,
        )
    }

    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Block containing a world-space point
    pub fn from_world_pos(pos: Point3<f32>) -> Self {
        Self {
            x: pos.x.floor() as i32,
            y: pos.y.floor() as i32,
            z: pos.z.floor() as i32,
        }
    }

    /// Minimum corner of the block in world space
    pub fn to_vector(&self) -> Vector3<f32> {
        Vector3::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

impl From<VoxelPos> for (i32, i32, i32) {
    fn from(pos: VoxelPos) -> Self {
        (pos.x, pos.y, pos.z)
    }
}
