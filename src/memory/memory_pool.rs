//! Memory Pool - pre-allocated arena with index handles
//!
//! Slots are never freed during a frame. `acquire` hands out the next slot,
//! reset to its default state, and `release_all` makes every slot available
//! again without dropping the backing storage.

/// Values that can be scrubbed back to their default state for reuse
pub trait Poolable: Default {
    fn reset(&mut self);
}

/// Index of a slot inside a `MemoryPool`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolHandle(u32);

impl PoolHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Pool usage counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub live: usize,
    pub capacity: usize,
    pub high_water: usize,
    /// Slots allocated beyond the pre-allocated capacity
    pub growths: usize,
}

pub struct MemoryPool<T: Poolable> {
    slots: Vec<T>,
    live: usize,
    high_water: usize,
    growths: usize,
}

impl<T: Poolable> MemoryPool<T> {
    /// Create a pool with `capacity` pre-allocated slots
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, T::default);
        Self {
            slots,
            live: 0,
            high_water: 0,
            growths: 0,
        }
    }

    /// Take the next free slot, cleared before it is handed out
    pub fn acquire(&mut self) -> PoolHandle {
        if self.live == self.slots.len() {
            self.slots.push(T::default());
            self.growths += 1;
        } else {
            self.slots[self.live].reset();
        }
        let handle = PoolHandle(self.live as u32);
        self.live += 1;
        self.high_water = self.high_water.max(self.live);
        handle
    }

    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        self.slots[..self.live].get(handle.index())
    }

    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        self.slots[..self.live].get_mut(handle.index())
    }

    /// Live values in acquisition order
    pub fn live(&self) -> &[T] {
        &self.slots[..self.live]
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Return every slot to the pool; storage is kept for the next frame
    pub fn release_all(&mut self) {
        self.live = 0;
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            live: self.live,
            capacity: self.slots.len(),
            high_water: self.high_water,
            growths: self.growths,
        }
    }
}

impl<T: Poolable> Default for MemoryPool<T> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}
