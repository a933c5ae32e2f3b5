//! # Voxel Canvas
//!
//! Sparse in-memory block store. Hosts without a world of their own (tests,
//! previews, benchmarks) hand a canvas to the dispatcher as the writer and
//! inspect it afterwards.
//!
//! The canvas keeps two views of the same writes:
//! - the final block per coordinate (later writes replace earlier ones)
//! - the ordered write log, exactly as the generator issued it

use std::collections::HashMap;

use bastion_shared::{BlockDescriptor, BoundingBox, Coordinate};

use crate::capability::{BlockReader, BlockWriter};

/// Sparse block map plus write log.
#[derive(Clone, Debug, Default)]
pub struct VoxelCanvas {
    blocks: HashMap<Coordinate, BlockDescriptor>,
    log: Vec<(Coordinate, BlockDescriptor)>,
}

impl VoxelCanvas {
    /// Creates an empty canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Final block at a coordinate, if anything was written there.
    #[inline]
    #[must_use]
    pub fn get(&self, at: Coordinate) -> Option<&BlockDescriptor> {
        self.blocks.get(&at)
    }

    /// Every write in issue order.
    #[must_use]
    pub fn writes(&self) -> &[(Coordinate, BlockDescriptor)] {
        &self.log
    }

    /// Number of distinct coordinates written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns true if nothing was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of coordinates whose final block is not air.
    #[must_use]
    pub fn count_non_air(&self) -> usize {
        self.blocks.values().filter(|b| !b.is_air()).count()
    }

    /// Number of coordinates whose final block has the given type.
    #[must_use]
    pub fn count_kind(&self, kind: &str) -> usize {
        self.blocks.values().filter(|b| b.kind() == kind).count()
    }

    /// Coordinates whose final block has the given type, sorted.
    #[must_use]
    pub fn positions_of(&self, kind: &str) -> Vec<Coordinate> {
        let mut found: Vec<Coordinate> = self
            .blocks
            .iter()
            .filter(|(_, b)| b.kind() == kind)
            .map(|(at, _)| *at)
            .collect();
        found.sort_unstable();
        found
    }

    /// Smallest box covering every written coordinate.
    #[must_use]
    pub fn bounds(&self) -> Option<BoundingBox> {
        let mut iter = self.log.iter().map(|(at, _)| *at);
        let first = iter.next()?;
        let mut bounds = BoundingBox::point(first);
        for at in iter {
            bounds.include(at);
        }
        Some(bounds)
    }

    /// Forgets all writes.
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.log.clear();
    }
}

impl BlockWriter for VoxelCanvas {
    fn set_block(&mut self, at: Coordinate, block: BlockDescriptor) {
        self.log.push((at, block.clone()));
        self.blocks.insert(at, block);
    }
}

impl BlockReader for VoxelCanvas {
    fn is_solid(&self, at: Coordinate) -> bool {
        self.get(at)
            .is_some_and(|b| !b.is_air() && !b.is_fluid() && !b.is_passable())
    }

    fn is_fluid(&self, at: Coordinate) -> bool {
        self.get(at).is_some_and(BlockDescriptor::is_fluid)
    }
}
