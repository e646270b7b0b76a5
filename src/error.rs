//! Error handling for Hearth Collision
//!
//! This module provides a unified error type so that casts, sampler reads and
//! registry lookups never panic in production. "No collision" is not an error;
//! only contract violations and configured hard failures surface here.

use std::error::Error as StdError;
use std::fmt;

use crate::world::error::WorldError;

/// Main error type for Hearth Collision
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    // World Errors
    ChunkNotLoaded {
        pos: (i32, i32, i32),
    },
    InvalidBlockType {
        id: u16,
    },
    InvalidFluidType {
        id: u8,
    },
    World(WorldError),

    // Registry Errors
    ResourceExhausted(String),

    // Query Errors
    InvalidInput {
        context: String,
    },
    SweepTooLarge {
        cells: usize,
        max_cells: usize,
    },

    // Configuration Errors
    InvalidConfig {
        field: String,
        value: String,
        reason: String,
    },

    // Generic fallback for unexpected errors
    Internal {
        message: String,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::ChunkNotLoaded { pos } => {
                write!(f, "Chunk not loaded at block position {:?}", pos)
            }
            EngineError::InvalidBlockType { id } => write!(f, "Invalid block type ID: {}", id),
            EngineError::InvalidFluidType { id } => write!(f, "Invalid fluid type ID: {}", id),
            EngineError::World(err) => write!(f, "World error: {}", err),

            EngineError::ResourceExhausted(msg) => write!(f, "Resource exhausted: {}", msg),

            EngineError::InvalidInput { context } => {
                write!(f, "Invalid collision query: {}", context)
            }
            EngineError::SweepTooLarge { cells, max_cells } => write!(
                f,
                "Sweep covers {} cells (max: {})",
                cells, max_cells
            ),

            EngineError::InvalidConfig {
                field,
                value,
                reason,
            } => write!(f, "Invalid config: {} = {} ({})", field, value, reason),

            EngineError::Internal { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl StdError for EngineError {}

/// Type alias for Results in Hearth Collision
pub type EngineResult<T> = Result<T, EngineError>;

impl From<WorldError> for EngineError {
    fn from(error: WorldError) -> Self {
        EngineError::World(error)
    }
}

/// Convert Option to Result with context
pub trait OptionExt<T> {
    fn ok_or_engine<F>(self, f: F) -> EngineResult<T>
    where
        F: FnOnce() -> EngineError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_engine<F>(self, f: F) -> EngineResult<T>
    where
        F: FnOnce() -> EngineError,
    {
        self.ok_or_else(f)
    }
}

/// Extension trait for adding context to foreign errors
pub trait ErrorContext<T> {
    fn context(self, msg: &str) -> EngineResult<T>;
    fn with_context<F>(self, f: F) -> EngineResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: fmt::Display,
{
    fn context(self, msg: &str) -> EngineResult<T> {
        self.map_err(|e| EngineError::Internal {
            message: format!("{}: {}", msg, e),
        })
    }

    fn with_context<F>(self, f: F) -> EngineResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| EngineError::Internal {
            message: format!("{}: {}", f(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::SweepTooLarge {
            cells: 5000,
            max_cells: 4096,
        };
        assert_eq!(err.to_string(), "Sweep covers 5000 cells (max: 4096)");
    }

    #[test]
    fn test_option_ext() {
        let opt: Option<i32> = None;
        let result = opt.ok_or_engine(|| EngineError::InvalidBlockType { id: 7 });
        assert_eq!(result, Err(EngineError::InvalidBlockType { id: 7 }));
    }

    #[test]
    fn test_error_context_wraps_foreign_errors() {
        let parsed: Result<u8, _> = "300".parse::<u8>();
        let err = parsed.context("fluid level").expect_err("300 does not fit in u8");
        assert!(matches!(err, EngineError::Internal { ref message } if message.starts_with("fluid level: ")));

        let ok: Result<u8, std::num::ParseIntError> = "8".parse();
        assert_eq!(ok.with_context(|| "unused".to_string()), Ok(8));
    }

    #[test]
    fn test_world_error_conversion() {
        let err: EngineError = WorldError::ChunkNotLoaded.into();
        assert_eq!(err.to_string(), "World error: Chunk not loaded");
    }
}
