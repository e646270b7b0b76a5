//! Memory Module
//!
//! Frame-scoped pooling for per-query scratch values.

pub mod memory_pool;

pub use memory_pool::{MemoryPool, PoolHandle, PoolStats, Poolable};
