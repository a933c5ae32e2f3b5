//! # BASTION Shared
//!
//! Common types used by the server, the structure engine and any host
//! embedding it.
//!
//! ## CRITICAL RULE
//!
//! This crate holds plain data only. No generation logic, no world
//! storage, no randomness. If you need those, put them in
//! `bastion_structures`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod block;
pub mod constants;
pub mod entity;
pub mod math;

pub use block::{BlockDescriptor, ItemStack, Value};
pub use constants::{MAX_BUILD_HEIGHT, MIN_BUILD_HEIGHT};
pub use entity::{EntityHandle, SpawnOptions, SpawnRequest};
pub use math::{BoundingBox, Coordinate, Direction, Size};
