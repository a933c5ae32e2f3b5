//! # Structure Error Types
//!
//! Everything that can make a generation request fail. None of these ever
//! escape the public generation API as a panic: the dispatcher turns them
//! into `None` / `false` plus a warning.

use thiserror::Error;

/// Errors that can occur while preparing a structure generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// No generator is registered under this id.
    #[error("unknown structure: {0}")]
    UnknownStructure(String),

    /// A generator is already registered under this id.
    #[error("structure already registered: {0}")]
    DuplicateRegistration(String),

    /// The requested origin lies outside the buildable height range.
    #[error("position y={y} outside build range {min}..={max}")]
    PositionOutOfRange {
        /// Requested height.
        y: i32,
        /// Lowest allowed height.
        min: i32,
        /// Highest allowed height.
        max: i32,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for structure operations.
pub type GenerationResult<T> = Result<T, StructureError>;
