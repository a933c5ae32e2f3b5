//! # World Constants
//!
//! Build limits of the voxel world. Structure requests outside these
//! bounds are rejected before any block is written.

// =============================================================================
// BUILD HEIGHT
// =============================================================================

/// Lowest Y a block may be written at
pub const MIN_BUILD_HEIGHT: i32 = -64;

/// Highest Y a block may be written at
pub const MAX_BUILD_HEIGHT: i32 = 319;

