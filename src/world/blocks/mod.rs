pub mod basic_blocks;

pub use basic_blocks::{create_basic_registries, register_basic_blocks, PRESSURE_PLATE_TRIGGER};
