//! Trigger contact bookkeeping owned by the caller
//!
//! The probe fires a trigger at most once per block per cast. Keeping the
//! previous cast's set around lets callers derive enter and exit transitions
//! between ticks.

use crate::world::core::VoxelPos;
use rustc_hash::FxHashSet;

#[derive(Debug, Clone, Default)]
pub struct TriggerTracker {
    current: FxHashSet<VoxelPos>,
    previous: FxHashSet<VoxelPos>,
}

impl TriggerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new cast: this cast's contacts become the previous set
    pub fn begin_cast(&mut self) {
        std::mem::swap(&mut self.current, &mut self.previous);
        self.current.clear();
    }

    /// Record a contact; true only the first time `block` is seen this cast
    pub fn track(&mut self, block: VoxelPos) -> bool {
        self.current.insert(block)
    }

    pub fn is_touching(&self, block: VoxelPos) -> bool {
        self.current.contains(&block)
    }

    pub fn touching(&self) -> impl Iterator<Item = &VoxelPos> + '_ {
        self.current.iter()
    }

    /// Triggers touched this cast but not the one before
    pub fn entered(&self) -> impl Iterator<Item = &VoxelPos> + '_ {
        self.current.difference(&self.previous)
    }

    /// Triggers touched the cast before but not this one
    pub fn exited(&self) -> impl Iterator<Item = &VoxelPos> + '_ {
        self.previous.difference(&self.current)
    }

    pub fn reset(&mut self) {
        self.current.clear();
        self.previous.clear();
    }
}
