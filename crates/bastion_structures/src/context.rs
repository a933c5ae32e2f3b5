//! # Build Context
//!
//! Generator-local state for one generation call. It owns the random
//! stream, wraps the host capabilities and keeps the bookkeeping that
//! backs the structural guarantees:
//!
//! - every write grows the tracked bounds, so the returned box always
//!   contains every written coordinate
//! - doorway cells are protected: once carved, only passable blocks
//!   (air, rails, torches, plates) may be written there
//! - carved cells are remembered so walls never fill excavated space
//!
//! Generators never call the writer directly.

use std::collections::HashSet;

use bastion_shared::{BlockDescriptor, BoundingBox, Coordinate, EntityHandle, SpawnRequest};

use crate::capability::{BlockReader, BlockWriter, Capabilities, SpawnerAdapter};
use crate::config::StructureConfig;
use crate::options::StructureOptions;
use crate::palette::{Palettes, Slot, StyleTable};
use crate::primitives::{Decay, DecayFactors};
use crate::random::{SeededRandom, WorldSeed};
use crate::result::{Corridor, Doorway, LootContainer, Room, StructureResult};

/// Sub-seed purpose for the decay hash.
const DECAY_PURPOSE: u64 = 0xDECA_7000;

/// State threaded through one generation.
pub struct BuildContext<'a> {
    structure: &'a str,
    origin: Coordinate,
    options: &'a StructureOptions,
    config: &'a StructureConfig,
    palettes: &'a Palettes,
    /// Random stream for every decision of this generation.
    pub rng: SeededRandom,
    decay: Decay,
    writer: &'a mut dyn BlockWriter,
    reader: Option<&'a dyn BlockReader>,
    spawner: SpawnerAdapter<'a>,
    written: Option<BoundingBox>,
    footprint: Option<BoundingBox>,
    open: HashSet<Coordinate>,
    protected: HashSet<Coordinate>,
    reserved: Vec<BoundingBox>,
    rooms: Vec<Room>,
    corridors: Vec<Corridor>,
    doorways: Vec<Doorway>,
    loot: Vec<LootContainer>,
    entrance: Option<Coordinate>,
    write_count: usize,
}

impl<'a> BuildContext<'a> {
    /// Creates a context for one generation.
    ///
    /// `seed` is the fully derived per-call seed; the decay hash uses an
    /// independent sub-seed of it.
    #[must_use]
    pub fn new(
        structure: &'a str,
        origin: Coordinate,
        options: &'a StructureOptions,
        config: &'a StructureConfig,
        palettes: &'a Palettes,
        seed: WorldSeed,
        caps: Capabilities<'a>,
    ) -> Self {
        let degradation = options.degradation_or(config.default_degradation(structure));
        Self {
            structure,
            origin,
            options,
            config,
            palettes,
            rng: SeededRandom::from_seed(seed),
            decay: Decay::new(seed.derive(DECAY_PURPOSE), degradation),
            writer: caps.writer,
            reader: caps.reader,
            spawner: SpawnerAdapter::new(caps.spawner),
            written: None,
            footprint: None,
            open: HashSet::new(),
            protected: HashSet::new(),
            reserved: Vec::new(),
            rooms: Vec::new(),
            corridors: Vec::new(),
            doorways: Vec::new(),
            loot: Vec::new(),
            entrance: None,
            write_count: 0,
        }
    }

    // =========================================================================
    // Inputs
    // =========================================================================

    /// Structure id being generated.
    #[must_use]
    pub const fn structure(&self) -> &'a str {
        self.structure
    }

    /// Requested origin.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Coordinate {
        self.origin
    }

    /// Request options.
    #[must_use]
    pub const fn options(&self) -> &'a StructureOptions {
        self.options
    }

    /// Engine configuration.
    #[must_use]
    pub const fn config(&self) -> &'a StructureConfig {
        self.config
    }

    /// Style table by name.
    #[must_use]
    pub fn palette(&self, name: &str) -> &'a StyleTable {
        self.palettes.get(name)
    }

    /// All style tables.
    #[must_use]
    pub const fn palettes(&self) -> &'a Palettes {
        self.palettes
    }

    /// Effective degradation in `[0, 1]`.
    #[must_use]
    pub const fn degradation(&self) -> f64 {
        self.decay.degradation()
    }

    /// Terrain probe, if the host supplied one.
    #[must_use]
    pub fn reader(&self) -> Option<&'a dyn BlockReader> {
        self.reader
    }

    /// First solid cell at or below `from`, searching at most `depth` cells.
    #[must_use]
    pub fn ground_below(&self, from: Coordinate, depth: i32) -> Option<Coordinate> {
        let reader = self.reader?;
        (0..=depth.max(0))
            .map(|d| from.below(d))
            .find(|at| reader.is_solid(*at))
    }

    // =========================================================================
    // Writes
    // =========================================================================

    fn emit(&mut self, at: Coordinate, block: BlockDescriptor) {
        match self.written.as_mut() {
            Some(bounds) => bounds.include(at),
            None => self.written = Some(BoundingBox::point(at)),
        }
        self.write_count += 1;
        self.writer.set_block(at, block);
    }

    /// Writes a block unless the cell is protected against it.
    ///
    /// Protected cells accept passable blocks only. Returns true if the
    /// write happened.
    pub fn place(&mut self, at: Coordinate, block: BlockDescriptor) -> bool {
        if !block.is_passable() && self.protected.contains(&at) {
            return false;
        }
        self.emit(at, block);
        true
    }

    /// Draws a block from a style slot.
    pub fn pick(&mut self, style: &StyleTable, slot: Slot) -> BlockDescriptor {
        style.pick(slot, &mut self.rng)
    }

    /// [`place`](Self::place) with a block drawn from a style slot.
    ///
    /// The draw happens even when the write is refused.
    pub fn place_style(&mut self, at: Coordinate, style: &StyleTable, slot: Slot) -> bool {
        let block = self.pick(style, slot);
        self.place(at, block)
    }

    /// [`enclose`](Self::enclose) with a block drawn from a style slot.
    pub fn enclose_style(&mut self, at: Coordinate, style: &StyleTable, slot: Slot) -> bool {
        let block = self.pick(style, slot);
        self.enclose(at, block)
    }

    /// Like [`place`](Self::place) but leaves carved cells alone.
    pub fn enclose(&mut self, at: Coordinate, block: BlockDescriptor) -> bool {
        if self.open.contains(&at) {
            return false;
        }
        self.place(at, block)
    }

    /// Writes air and marks the cell as carved.
    pub fn carve(&mut self, at: Coordinate) {
        self.open.insert(at);
        self.emit(at, BlockDescriptor::air());
    }

    /// Writes air without marking the cell as carved (site clearing).
    pub fn clear(&mut self, at: Coordinate) {
        if self.open.contains(&at) {
            return;
        }
        self.emit(at, BlockDescriptor::air());
    }

    /// Writes a block only if the decay sample keeps it.
    pub fn place_decayed(
        &mut self,
        at: Coordinate,
        block: BlockDescriptor,
        factors: DecayFactors,
    ) -> bool {
        if !self.decay.keep(at, factors) {
            return false;
        }
        self.place(at, block)
    }

    /// [`enclose`](Self::enclose) routed through the decay sample.
    pub fn enclose_decayed(
        &mut self,
        at: Coordinate,
        block: BlockDescriptor,
        factors: DecayFactors,
    ) -> bool {
        if self.open.contains(&at) || !self.decay.keep(at, factors) {
            return false;
        }
        self.place(at, block)
    }

    /// Decay sample without a write.
    #[must_use]
    pub fn survives(&self, at: Coordinate, factors: DecayFactors) -> bool {
        self.decay.keep(at, factors)
    }

    /// Places a container and records it as loot.
    pub fn place_loot(&mut self, at: Coordinate, block: BlockDescriptor) -> bool {
        let container = LootContainer {
            position: at,
            block: block.kind().to_owned(),
            table: block.loot_table().map(str::to_owned),
            items: block.item_list().map(<[_]>::to_vec).unwrap_or_default(),
        };
        if !self.place(at, block) {
            tracing::trace!(structure = self.structure, %at, "loot container dropped on protected cell");
            return false;
        }
        self.loot.retain(|existing| existing.position != at);
        self.loot.push(container);
        true
    }

    // =========================================================================
    // Protection and reservation
    // =========================================================================

    /// Protects a cell: from now on only passable blocks may be written there.
    pub fn protect(&mut self, at: Coordinate) {
        self.protected.insert(at);
    }

    /// Returns true if the cell was carved.
    #[must_use]
    pub fn is_open(&self, at: Coordinate) -> bool {
        self.open.contains(&at)
    }

    /// Returns true if the cell is protected.
    #[must_use]
    pub fn is_protected(&self, at: Coordinate) -> bool {
        self.protected.contains(&at)
    }

    /// Claims a region for a sub-feature.
    pub fn reserve(&mut self, region: BoundingBox) {
        self.reserved.push(region);
    }

    /// Returns true if `region` overlaps no reserved region.
    #[must_use]
    pub fn is_free(&self, region: &BoundingBox) -> bool {
        !self.reserved.iter().any(|r| r.intersects(region))
    }

    /// Grows the declared footprint.
    pub fn declare(&mut self, region: BoundingBox) {
        self.footprint = Some(match self.footprint {
            Some(existing) => existing.union(region),
            None => region,
        });
    }

    // =========================================================================
    // Records
    // =========================================================================

    /// Records a room and reserves its box. Returns its index.
    pub fn add_room(&mut self, room: Room) -> usize {
        self.reserve(room.bounds());
        self.rooms.push(room);
        self.rooms.len() - 1
    }

    /// Room by index.
    #[must_use]
    pub fn room(&self, index: usize) -> Option<&Room> {
        self.rooms.get(index)
    }

    /// Mutable room by index.
    pub fn room_mut(&mut self, index: usize) -> Option<&mut Room> {
        self.rooms.get_mut(index)
    }

    /// All rooms so far.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Records a corridor. Returns its index.
    pub fn add_corridor(&mut self, corridor: Corridor) -> usize {
        self.corridors.push(corridor);
        self.corridors.len() - 1
    }

    /// All corridors so far.
    #[must_use]
    pub fn corridors(&self) -> &[Corridor] {
        &self.corridors
    }

    /// Records a doorway.
    pub fn add_doorway(&mut self, doorway: Doorway) {
        self.doorways.push(doorway);
    }

    /// Attaches a doorway position to a room.
    pub fn attach_doorway(&mut self, room: usize, at: Coordinate) {
        if let Some(room) = self.rooms.get_mut(room) {
            room.doorways.push(at);
        }
    }

    /// Returns true if `at` is a recorded doorway or lies on a room's side wall.
    #[must_use]
    pub fn is_anchor(&self, at: Coordinate) -> bool {
        self.doorways.iter().any(|d| d.position == at)
            || self.rooms.iter().any(|room| room.on_side_wall(at))
    }

    /// Sets the entrance used for reachability.
    pub fn set_entrance(&mut self, at: Coordinate) {
        self.entrance = Some(at);
    }

    /// Issues a spawn request.
    pub fn spawn(&mut self, request: SpawnRequest) -> EntityHandle {
        self.spawner.spawn(request)
    }

    /// Returns true if spawns reach a live entity system.
    #[must_use]
    pub fn has_live_spawner(&self) -> bool {
        self.spawner.is_live()
    }

    /// Number of writes issued so far.
    #[must_use]
    pub const fn write_count(&self) -> usize {
        self.write_count
    }

    /// Consumes the context and builds the result.
    #[must_use]
    pub fn finish(self) -> StructureResult {
        for corridor in &self.corridors {
            for end in [corridor.start, corridor.end] {
                if !self.is_anchor(end) {
                    tracing::warn!(structure = self.structure, %end, "corridor end is not anchored");
                }
            }
        }
        let bounds = match (self.footprint, self.written) {
            (Some(a), Some(b)) => a.union(b),
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => BoundingBox::point(self.origin),
        };
        tracing::debug!(
            structure = self.structure,
            rooms = self.rooms.len(),
            corridors = self.corridors.len(),
            writes = self.write_count,
            "structure finished"
        );
        let (spawns, mob_spawns) = self.spawner.into_records();
        StructureResult {
            structure: self.structure.to_owned(),
            position: self.origin,
            size: bounds.size(),
            bounds,
            entrance: self.entrance,
            rooms: self.rooms,
            corridors: self.corridors,
            doorways: self.doorways,
            spawns,
            mob_spawns,
            loot_containers: self.loot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::VoxelCanvas;

    fn run(f: impl FnOnce(&mut BuildContext<'_>)) -> (StructureResult, VoxelCanvas) {
        let options = StructureOptions::new();
        let config = StructureConfig::default();
        let palettes = Palettes::standard();
        let mut canvas = VoxelCanvas::new();
        let result = {
            let mut ctx = BuildContext::new(
                "test",
                Coordinate::new(0, 64, 0),
                &options,
                &config,
                &palettes,
                WorldSeed::new(1),
                Capabilities::new(&mut canvas),
            );
            f(&mut ctx);
            ctx.finish()
        };
        (result, canvas)
    }

    #[test]
    fn test_protected_cells_refuse_solids() {
        let at = Coordinate::new(1, 64, 1);
        let mut placed = true;
        let (_, canvas) = run(|ctx| {
            ctx.carve(at);
            ctx.protect(at);
            placed = ctx.place(at, BlockDescriptor::new("stone"));
        });
        assert!(!placed);
        assert!(canvas.get(at).is_some_and(BlockDescriptor::is_air));
    }

    #[test]
    fn test_protected_cells_take_passable_blocks() {
        let at = Coordinate::new(2, 64, 2);
        let (mut rail, mut stone) = (false, true);
        let (_, canvas) = run(|ctx| {
            ctx.protect(at);
            rail = ctx.place(at, BlockDescriptor::new("rail"));
            stone = ctx.place(at, BlockDescriptor::new("stone"));
        });
        assert!(rail);
        assert!(!stone);
        assert_eq!(canvas.get(at).map(BlockDescriptor::kind), Some("rail"));
    }

    #[test]
    fn test_enclose_skips_carved_cells() {
        let at = Coordinate::new(0, 65, 0);
        let (_, canvas) = run(|ctx| {
            ctx.carve(at);
            ctx.enclose(at, BlockDescriptor::new("stone"));
            ctx.clear(at);
        });
        assert_eq!(canvas.writes().len(), 1);
        assert!(canvas.get(at).is_some_and(BlockDescriptor::is_air));
    }

    #[test]
    fn test_bounds_cover_writes_and_footprint() {
        let (result, canvas) = run(|ctx| {
            ctx.declare(BoundingBox::new(Coordinate::new(-2, 60, -2), Coordinate::new(2, 66, 2)));
            ctx.place(Coordinate::new(10, 64, 0), BlockDescriptor::new("stone"));
        });
        let written = canvas.bounds().unwrap();
        assert!(result.bounds.contains(written.min) && result.bounds.contains(written.max));
        assert_eq!(result.bounds.min, Coordinate::new(-2, 60, -2));
        assert_eq!(result.bounds.max, Coordinate::new(10, 66, 2));
        assert_eq!(result.size, result.bounds.size());
    }

    #[test]
    fn test_empty_generation_has_point_bounds() {
        let (result, canvas) = run(|_| {});
        assert!(canvas.is_empty());
        assert_eq!(result.bounds, BoundingBox::point(Coordinate::new(0, 64, 0)));
    }

    #[test]
    fn test_loot_is_recorded_once_per_cell() {
        let at = Coordinate::new(3, 64, 3);
        let (result, _) = run(|ctx| {
            ctx.place_loot(at, BlockDescriptor::new("chest").loot("a"));
            ctx.place_loot(at, BlockDescriptor::new("barrel").loot("b"));
        });
        assert_eq!(result.loot_containers.len(), 1);
        assert_eq!(result.loot_containers[0].table.as_deref(), Some("b"));
        assert_eq!(result.loot_containers[0].block, "barrel");
    }
}
