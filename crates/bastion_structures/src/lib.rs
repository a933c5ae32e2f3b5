//! # BASTION Structures
//!
//! Deterministic procedural structures for voxel worlds: mineshafts,
//! strongholds, villages, ancient cities, ocean monuments, temples,
//! portals, dungeons and ruins.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: same seed, position and options always produce the
//!    same writes in the same order
//! 2. **Host-agnostic**: the engine never touches a world; it writes through
//!    the [`BlockWriter`] it is handed and asks for entities through an
//!    optional [`EntitySpawner`]
//! 3. **Reachable**: every recorded doorway and room can be walked to from
//!    the entrance
//! 4. **Total**: bad requests come back as `None`, never as a panic
//!
//! ## Core Components
//!
//! - `StructureGenerator`: dispatcher and host registry
//! - `BuildContext`: per-call state (stream, reservations, records)
//! - `primitives`: rooms, shells, corridors, doorways, decay
//! - `generators`: one module per structure family
//! - `StructureResult`: the layout handed back to the host
//!
//! ## Example
//!
//! ```rust,ignore
//! use bastion_structures::{Coordinate, StructureGenerator, StructureOptions, VoxelCanvas};
//!
//! let engine = StructureGenerator::with_seed(42);
//! let mut canvas = VoxelCanvas::new();
//!
//! let result = engine
//!     .generate("stronghold", Coordinate::new(0, 20, 0), &StructureOptions::new(), &mut canvas)
//!     .expect("known structure");
//!
//! assert!(result.entrance.is_some());
//! assert!(canvas.count_kind("end_portal_frame") > 0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod canvas;
pub mod capability;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod generators;
pub mod options;
pub mod palette;
pub mod primitives;
pub mod random;
pub mod result;

pub use bastion_shared::{BlockDescriptor, BoundingBox, Coordinate, Direction, EntityHandle, ItemStack, Size, SpawnRequest};
pub use canvas::VoxelCanvas;
pub use capability::{BlockReader, BlockWriter, Capabilities, EntitySpawner, SpawnerAdapter};
pub use config::StructureConfig;
pub use context::BuildContext;
pub use dispatcher::{StructureGenerator, StructureKind, DEFAULT_BASE_SEED};
pub use error::{GenerationResult, StructureError};
pub use generators::{FeatureGenerator, GeneratorFn};
pub use options::{SizeClass, StructureOptions};
pub use palette::{Biome, Palettes, Slot, StyleTable};
pub use random::{SeededRandom, WorldSeed};
pub use result::{Corridor, Doorway, LootContainer, Room, RoomKind, StructureResult};
