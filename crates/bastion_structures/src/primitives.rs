//! # Placement Primitives
//!
//! Shared building blocks used by every feature generator:
//!
//! - [`carve_shell`] / [`carve_room`]: hollow axis-aligned boxes
//! - [`carve_radial`]: cylinders and domes (Euclidean membership)
//! - [`extrude_corridor`] / [`connect`]: straight and L-shaped passages
//! - [`Decay`]: degradation sampling for ruined structures
//! - [`carve_doorway`]: protected openings, exempt from decay
//!
//! All writes go through the [`BuildContext`], never to the host directly.

use bastion_shared::{BlockDescriptor, BoundingBox, Coordinate, Direction, Size};

use crate::context::BuildContext;
use crate::palette::{Slot, StyleTable};
use crate::random::WorldSeed;
use crate::result::{Corridor, Doorway, Room, RoomKind};

/// Interior height of every corridor.
pub const CORRIDOR_HEIGHT: i32 = 3;

/// Default doorway height.
pub const DOOR_HEIGHT: i32 = 2;

// =============================================================================
// Degradation
// =============================================================================

/// Position factors for a decay sample, both in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DecayFactors {
    /// 0 at the core of the structure, 1 at its rim.
    pub edge: f64,
    /// 0 at the base, 1 at the top.
    pub height: f64,
}

impl DecayFactors {
    /// Core of the structure at its base.
    pub const CORE: Self = Self { edge: 0.0, height: 0.0 };

    /// Creates clamped factors.
    #[must_use]
    pub fn new(edge: f64, height: f64) -> Self {
        let unit = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self {
            edge: unit(edge),
            height: unit(height),
        }
    }

    /// Factors of `at` relative to a region: distance to the nearest side
    /// wall for the edge, relative height for the height.
    #[must_use]
    pub fn in_region(at: Coordinate, region: &BoundingBox) -> Self {
        let size = region.size();
        let inset = (at.x - region.min.x)
            .min(region.max.x - at.x)
            .min(at.z - region.min.z)
            .min(region.max.z - at.z)
            .max(0);
        let half = (size.width.min(size.depth) / 2).max(1);
        let height = if size.height <= 1 {
            0.0
        } else {
            f64::from(at.y - region.min.y) / f64::from(size.height - 1)
        };
        Self::new(1.0 - f64::from(inset) / f64::from(half), height)
    }

    /// Factors of `at` relative to a radial footprint around `center`.
    #[must_use]
    pub fn radial(at: Coordinate, center: Coordinate, radius: i32, height: i32) -> Self {
        let edge = at.horizontal_distance(center) / f64::from(radius.max(1));
        let rel = if height <= 1 {
            0.0
        } else {
            f64::from(at.y - center.y) / f64::from(height - 1)
        };
        Self::new(edge, rel)
    }
}

/// Degradation sampler.
///
/// The uniform draw for a coordinate is a hash of the decay seed and the
/// coordinate, not a draw from the generation stream. For a fixed seed the
/// set of kept blocks therefore only shrinks as `degradation` grows, and
/// the generation stream is untouched by decay decisions.
#[derive(Clone, Copy, Debug)]
pub struct Decay {
    seed: WorldSeed,
    degradation: f64,
}

impl Decay {
    /// Creates a sampler. `degradation` is clamped to `[0, 1]`.
    #[must_use]
    pub fn new(seed: WorldSeed, degradation: f64) -> Self {
        let degradation = if degradation.is_nan() { 0.0 } else { degradation.clamp(0.0, 1.0) };
        Self { seed, degradation }
    }

    /// Effective degradation.
    #[inline]
    #[must_use]
    pub const fn degradation(&self) -> f64 {
        self.degradation
    }

    /// Probability that a block with these factors is omitted.
    #[must_use]
    pub fn omission_probability(&self, factors: DecayFactors) -> f64 {
        (self.degradation * (0.35 + 0.65 * factors.edge + 0.65 * factors.height)).clamp(0.0, 1.0)
    }

    /// Returns true if the block at `at` survives.
    #[must_use]
    pub fn keep(&self, at: Coordinate, factors: DecayFactors) -> bool {
        if self.degradation <= 0.0 {
            return true;
        }
        self.seed.at(at).unit() >= self.omission_probability(factors)
    }
}

// =============================================================================
// Boxes
// =============================================================================

/// Slots used for the faces of a shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShellSlots {
    /// Side faces.
    pub wall: Slot,
    /// Bottom face.
    pub floor: Slot,
    /// Top face.
    pub ceiling: Slot,
}

impl Default for ShellSlots {
    fn default() -> Self {
        Self {
            wall: Slot::Wall,
            floor: Slot::Floor,
            ceiling: Slot::Ceiling,
        }
    }
}

/// Hollow box: faces from the style table, interior carved to air.
///
/// Faces never overwrite cells that were carved earlier.
pub fn carve_shell(
    ctx: &mut BuildContext<'_>,
    origin: Coordinate,
    size: Size,
    style: &StyleTable,
    slots: ShellSlots,
) -> BoundingBox {
    let region = BoundingBox::from_origin(origin, size);
    let (min, max) = (region.min, region.max);
    for y in min.y..=max.y {
        for z in min.z..=max.z {
            for x in min.x..=max.x {
                let at = Coordinate::new(x, y, z);
                let side = x == min.x || x == max.x || z == min.z || z == max.z;
                if y == min.y {
                    ctx.enclose_style(at, style, slots.floor);
                } else if y == max.y {
                    ctx.enclose_style(at, style, slots.ceiling);
                } else if side {
                    ctx.enclose_style(at, style, slots.wall);
                } else {
                    ctx.carve(at);
                }
            }
        }
    }
    region
}

/// Carves a shell and records it as a room. Returns the room index.
pub fn carve_room(
    ctx: &mut BuildContext<'_>,
    kind: RoomKind,
    origin: Coordinate,
    size: Size,
    style: &StyleTable,
) -> usize {
    carve_shell(ctx, origin, size, style, ShellSlots::default());
    ctx.add_room(Room::new(kind, origin, size))
}

/// Writes a block from `slot` into every cell of `region`.
pub fn fill_box(ctx: &mut BuildContext<'_>, region: BoundingBox, style: &StyleTable, slot: Slot) {
    for at in cells(region) {
        ctx.place_style(at, style, slot);
    }
}

/// Writes one fixed block into every cell of `region`.
pub fn fill_block(ctx: &mut BuildContext<'_>, region: BoundingBox, block: &BlockDescriptor) {
    for at in cells(region) {
        ctx.place(at, block.clone());
    }
}

/// Clears `region` to air without marking it carved.
pub fn clear_box(ctx: &mut BuildContext<'_>, region: BoundingBox) {
    for at in cells(region) {
        ctx.clear(at);
    }
}

/// Carves `region` to air.
pub fn carve_box(ctx: &mut BuildContext<'_>, region: BoundingBox) {
    for at in cells(region) {
        ctx.carve(at);
    }
}

/// Cells of a region in y, z, x order.
fn cells(region: BoundingBox) -> impl Iterator<Item = Coordinate> {
    let (min, max) = (region.min, region.max);
    (min.y..=max.y).flat_map(move |y| {
        (min.z..=max.z).flat_map(move |z| (min.x..=max.x).map(move |x| Coordinate::new(x, y, z)))
    })
}

// =============================================================================
// Radial shapes
// =============================================================================

/// Vertical profile of a radial shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RadialProfile {
    /// Straight walls, flat ceiling.
    Cylinder,
    /// Half ellipsoid whose vertical radius is `height - 1`.
    Dome,
}

/// Radial shell around `center` (floor layer at `center.y`).
///
/// Membership is `dx² + dz² <= radius²` for cylinders and the ellipsoid
/// equation for domes.
pub fn carve_radial(
    ctx: &mut BuildContext<'_>,
    center: Coordinate,
    radius: i32,
    height: i32,
    profile: RadialProfile,
    style: &StyleTable,
    slots: ShellSlots,
) -> BoundingBox {
    let radius = radius.max(2);
    let height = height.max(3);
    let r2 = radius * radius;
    let inner2 = (radius - 1) * (radius - 1);
    for dy in 0..height {
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                let at = center.offset(dx, dy, dz);
                let d2 = dx * dx + dz * dz;
                let (inside, interior) = match profile {
                    RadialProfile::Cylinder => (d2 <= r2, d2 <= inner2 && dy < height - 1),
                    RadialProfile::Dome => {
                        let vertical = f64::from(height - 1);
                        let outer = f64::from(d2) / f64::from(r2) + f64::from(dy * dy) / (vertical * vertical);
                        let inner = f64::from(d2) / f64::from(inner2.max(1))
                            + f64::from(dy * dy) / ((vertical - 1.0).max(1.0).powi(2));
                        (outer <= 1.0, inner <= 1.0)
                    }
                };
                if !inside {
                    continue;
                }
                if dy == 0 {
                    ctx.enclose_style(at, style, slots.floor);
                } else if interior {
                    ctx.carve(at);
                } else if profile == RadialProfile::Cylinder && dy == height - 1 {
                    ctx.enclose_style(at, style, slots.ceiling);
                } else {
                    ctx.enclose_style(at, style, slots.wall);
                }
            }
        }
    }
    BoundingBox::new(
        center.offset(-radius, 0, -radius),
        center.offset(radius, height - 1, radius),
    )
}

/// Horizontal disc of `slot` blocks.
pub fn disc(ctx: &mut BuildContext<'_>, center: Coordinate, radius: i32, style: &StyleTable, slot: Slot) {
    let r2 = radius * radius;
    for dz in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dz * dz <= r2 {
                ctx.place_style(center.offset(dx, 0, dz), style, slot);
            }
        }
    }
}

/// Solid sphere of `slot` blocks.
pub fn sphere(ctx: &mut BuildContext<'_>, center: Coordinate, radius: i32, style: &StyleTable, slot: Slot) {
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy + dz * dz <= r2 {
                    ctx.place_style(center.offset(dx, dy, dz), style, slot);
                }
            }
        }
    }
}

/// Vertical column of `height` blocks starting at `base`.
pub fn pillar(ctx: &mut BuildContext<'_>, base: Coordinate, height: i32, style: &StyleTable, slot: Slot) {
    for h in 0..height {
        ctx.place_style(base.above(h), style, slot);
    }
}

/// Ascending staircase of `steps` blocks, each with three cells of headroom
/// and filled support below. Returns the top step.
pub fn staircase(
    ctx: &mut BuildContext<'_>,
    base: Coordinate,
    direction: Direction,
    steps: i32,
    step_block: &BlockDescriptor,
    style: &StyleTable,
) -> Coordinate {
    let mut top = base;
    for i in 0..steps.max(1) {
        let step = base.step(direction, i).above(i);
        for y in base.y..step.y {
            ctx.place_style(step.with_y(y), style, Slot::Wall);
        }
        ctx.place(step, step_block.clone().facing(direction));
        for h in 1..=CORRIDOR_HEIGHT {
            ctx.carve(step.above(h));
        }
        top = step;
    }
    top
}

// =============================================================================
// Corridors
// =============================================================================

/// Materials and dimensions of a corridor.
#[derive(Clone, Copy, Debug)]
pub struct CorridorSpec<'s> {
    /// Walkable width (odd values centre on the line).
    pub width: i32,
    /// Style table.
    pub style: &'s StyleTable,
    /// Side walls.
    pub wall: Slot,
    /// Floor below the walk level.
    pub floor: Slot,
    /// Ceiling above the headroom.
    pub ceiling: Slot,
    /// Light source slot, `None` for unlit corridors.
    pub light: Option<Slot>,
    /// Cells between lights.
    pub light_interval: i32,
}

impl<'s> CorridorSpec<'s> {
    /// Three wide, lit every eight cells.
    #[must_use]
    pub const fn new(style: &'s StyleTable) -> Self {
        Self {
            width: 3,
            style,
            wall: Slot::Wall,
            floor: Slot::Floor,
            ceiling: Slot::Ceiling,
            light: Some(Slot::Light),
            light_interval: 8,
        }
    }

    /// Sets the width.
    #[must_use]
    pub const fn with_width(mut self, width: i32) -> Self {
        self.width = width;
        self
    }

    /// Sets the light interval.
    #[must_use]
    pub const fn with_light_interval(mut self, interval: i32) -> Self {
        self.light_interval = interval;
        self
    }

    /// Removes lights.
    #[must_use]
    pub const fn unlit(mut self) -> Self {
        self.light = None;
        self
    }
}

/// Straight corridor between two walk-level cells sharing x or z (and y).
///
/// Returns the corridor index, or `None` if the endpoints are not aligned.
pub fn extrude_corridor(
    ctx: &mut BuildContext<'_>,
    start: Coordinate,
    end: Coordinate,
    spec: &CorridorSpec<'_>,
) -> Option<usize> {
    if start.y != end.y || (start.x != end.x && start.z != end.z) {
        tracing::trace!(%start, %end, "corridor endpoints not aligned");
        return None;
    }
    carve_leg(ctx, start, end, spec);
    Some(ctx.add_corridor(Corridor {
        start,
        end,
        width: spec.width,
        bend: None,
    }))
}

/// Corridor between any two walk-level cells at the same height.
///
/// Unaligned endpoints get an L-shape bending at `(end.x, start.z)`.
pub fn connect(
    ctx: &mut BuildContext<'_>,
    start: Coordinate,
    end: Coordinate,
    spec: &CorridorSpec<'_>,
) -> Option<usize> {
    if start.y != end.y {
        tracing::trace!(%start, %end, "corridor endpoints on different levels");
        return None;
    }
    if start.x == end.x || start.z == end.z {
        return extrude_corridor(ctx, start, end, spec);
    }
    let bend = Coordinate::new(end.x, start.y, start.z);
    carve_leg(ctx, start, bend, spec);
    carve_leg(ctx, bend, end, spec);
    Some(ctx.add_corridor(Corridor {
        start,
        end,
        width: spec.width,
        bend: Some(bend),
    }))
}

fn carve_leg(ctx: &mut BuildContext<'_>, from: Coordinate, to: Coordinate, spec: &CorridorSpec<'_>) {
    let direction = Direction::between(from, to).unwrap_or(Direction::East);
    let across = direction.right();
    let half = spec.width.max(1) / 2;
    let steps = (to.x - from.x).abs() + (to.z - from.z).abs();
    let interval = spec.light_interval.max(1);
    ctx.reserve(BoundingBox::new(
        from.step(across, -(half + 1)).below(1),
        to.step(across, half + 1).above(CORRIDOR_HEIGHT),
    ));

    for i in 0..=steps {
        let cell = from.step(direction, i);
        for lateral in -half..=half {
            let column = cell.step(across, lateral);
            for h in 0..CORRIDOR_HEIGHT {
                ctx.carve(column.above(h));
            }
            ctx.enclose_style(column.below(1), spec.style, spec.floor);
            ctx.enclose_style(column.above(CORRIDOR_HEIGHT), spec.style, spec.ceiling);
        }
        for lateral in [-(half + 1), half + 1] {
            let column = cell.step(across, lateral);
            for h in -1..=CORRIDOR_HEIGHT {
                ctx.enclose_style(column.above(h), spec.style, spec.wall);
            }
        }
        if let Some(light) = spec.light {
            if i % interval == interval / 2 {
                ctx.place_style(cell.step(across, half).above(CORRIDOR_HEIGHT - 1), spec.style, light);
            }
        }
    }
}

/// Origin of a room of `size` that starts at `door` and extends in
/// `direction`, with `door` centred in its near wall at walking height.
#[must_use]
pub fn room_origin_beyond(door: Coordinate, direction: Direction, size: Size) -> Coordinate {
    let y = door.y - 1;
    match direction {
        Direction::South => Coordinate::new(door.x - size.width / 2, y, door.z),
        Direction::North => Coordinate::new(door.x - size.width / 2, y, door.z - size.depth + 1),
        Direction::East => Coordinate::new(door.x, y, door.z - size.depth / 2),
        Direction::West => Coordinate::new(door.x - size.width + 1, y, door.z - size.depth / 2),
    }
}

/// Box of a room placed with [`room_origin_beyond`], minus its near wall.
///
/// This is what must be free for the room to fit: the near wall is shared
/// with whatever leads up to the door.
#[must_use]
pub fn region_beyond(door: Coordinate, direction: Direction, size: Size) -> BoundingBox {
    let full = BoundingBox::from_origin(room_origin_beyond(door, direction, size), size);
    let (dx, dz) = direction.delta();
    let mut trimmed = full;
    match (dx, dz) {
        (1, _) => trimmed.min.x += 1,
        (-1, _) => trimmed.max.x -= 1,
        (_, 1) => trimmed.min.z += 1,
        _ => trimmed.max.z -= 1,
    }
    trimmed
}

// =============================================================================
// Doorways
// =============================================================================

/// Carves a doorway `height` cells high at `door`, plus one step on each
/// side, and protects all of it. `facing` points out of the room.
///
/// Exempt from decay: the cells are carved unconditionally and only
/// passable blocks may be written there afterwards.
pub fn carve_doorway(ctx: &mut BuildContext<'_>, door: Coordinate, facing: Direction, height: i32) -> Doorway {
    for cell in [door.step(facing.opposite(), 1), door, door.step(facing, 1)] {
        for h in 0..height.max(1) {
            let at = cell.above(h);
            ctx.carve(at);
            ctx.protect(at);
        }
    }
    let doorway = Doorway {
        position: door,
        facing,
    };
    ctx.add_doorway(doorway);
    doorway
}

/// Cuts a doorway into a room's side wall and attaches it to the room.
pub fn room_doorway(ctx: &mut BuildContext<'_>, room: usize, side: Direction, offset: i32) -> Option<Doorway> {
    let door = ctx.room(room)?.door_on(side, offset);
    let doorway = carve_doorway(ctx, door, side, DOOR_HEIGHT);
    ctx.attach_doorway(room, door);
    Some(doorway)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::VoxelCanvas;
    use crate::capability::Capabilities;
    use crate::config::StructureConfig;
    use crate::options::StructureOptions;
    use crate::palette::Palettes;
    use crate::result::StructureResult;

    fn run(f: impl FnOnce(&mut BuildContext<'_>)) -> (StructureResult, VoxelCanvas) {
        let options = StructureOptions::new();
        let config = StructureConfig::default();
        let palettes = Palettes::standard();
        let mut canvas = VoxelCanvas::new();
        let result = {
            let mut ctx = BuildContext::new(
                "test",
                Coordinate::ORIGIN,
                &options,
                &config,
                &palettes,
                WorldSeed::new(3),
                Capabilities::new(&mut canvas),
            );
            f(&mut ctx);
            ctx.finish()
        };
        (result, canvas)
    }

    fn kind_at(canvas: &VoxelCanvas, at: Coordinate) -> Option<&str> {
        canvas.get(at).map(BlockDescriptor::kind)
    }

    #[test]
    fn test_shell_is_hollow() {
        let (_, canvas) = run(|ctx| {
            let style = StyleTable::new("s").with(Slot::Wall, "w").with(Slot::Floor, "f").with(Slot::Ceiling, "c");
            carve_shell(ctx, Coordinate::ORIGIN, Size::new(5, 4, 6), &style, ShellSlots::default());
        });
        assert_eq!(canvas.len(), 5 * 4 * 6);
        assert_eq!(kind_at(&canvas, Coordinate::new(2, 0, 2)), Some("f"));
        assert_eq!(kind_at(&canvas, Coordinate::new(2, 3, 2)), Some("c"));
        assert_eq!(kind_at(&canvas, Coordinate::new(0, 1, 2)), Some("w"));
        assert_eq!(kind_at(&canvas, Coordinate::new(2, 1, 2)), Some("air"));
        assert_eq!(canvas.count_kind("air"), 3 * 2 * 4);
    }

    #[test]
    fn test_radial_membership_is_euclidean() {
        let (_, canvas) = run(|ctx| {
            let style = StyleTable::new("s");
            carve_radial(ctx, Coordinate::ORIGIN, 5, 4, RadialProfile::Cylinder, &style, ShellSlots::default());
        });
        assert!(canvas.get(Coordinate::new(5, 1, 0)).is_some());
        assert!(canvas.get(Coordinate::new(4, 1, 4)).is_none(), "corner outside the circle");
        assert_eq!(kind_at(&canvas, Coordinate::new(0, 1, 0)), Some("air"));
    }

    #[test]
    fn test_corridor_cross_section() {
        let (result, canvas) = run(|ctx| {
            let style = StyleTable::new("s");
            let spec = CorridorSpec::new(&style).with_light_interval(4);
            let index = extrude_corridor(ctx, Coordinate::ORIGIN, Coordinate::new(0, 0, 9), &spec);
            assert_eq!(index, Some(0));
            assert_eq!(extrude_corridor(ctx, Coordinate::ORIGIN, Coordinate::new(3, 0, 3), &spec), None);
        });
        assert_eq!(result.corridors.len(), 1);
        assert_eq!(result.corridors[0].direction(), Some(Direction::South));
        for z in 0..=9 {
            for x in -1..=1 {
                assert_eq!(kind_at(&canvas, Coordinate::new(x, 0, z)), Some("air"));
                assert_eq!(kind_at(&canvas, Coordinate::new(x, -1, z)), Some("stone"));
            }
            assert!(canvas.get(Coordinate::new(2, 1, z)).is_some_and(|b| !b.is_air()));
        }
        assert!(canvas.count_kind("torch") >= 2);
    }

    #[test]
    fn test_connect_bends_once() {
        let (result, canvas) = run(|ctx| {
            let style = StyleTable::new("s");
            let spec = CorridorSpec::new(&style).unlit();
            connect(ctx, Coordinate::ORIGIN, Coordinate::new(8, 0, 6), &spec);
        });
        let corridor = result.corridors[0];
        assert_eq!(corridor.bend, Some(Coordinate::new(8, 0, 0)));
        for cell in corridor.centre_line() {
            assert_eq!(kind_at(&canvas, cell), Some("air"), "{cell} not carved");
        }
    }

    #[test]
    fn test_doorway_survives_later_walls() {
        let door = Coordinate::new(0, 1, 2);
        let (result, canvas) = run(|ctx| {
            carve_doorway(ctx, door, Direction::West, DOOR_HEIGHT);
            let style = StyleTable::new("s");
            carve_shell(ctx, Coordinate::ORIGIN, Size::new(5, 5, 5), &style, ShellSlots::default());
            ctx.place(door, BlockDescriptor::new("stone"));
        });
        assert_eq!(result.doorways.len(), 1);
        assert_eq!(kind_at(&canvas, door), Some("air"));
        assert_eq!(kind_at(&canvas, door.above(1)), Some("air"));
        assert_eq!(kind_at(&canvas, door.step(Direction::West, 1)), Some("air"));
    }

    #[test]
    fn test_decay_is_monotone() {
        let seed = WorldSeed::new(77);
        let factors = DecayFactors::new(0.5, 0.5);
        let cells: Vec<Coordinate> = (0..20).flat_map(|x| (0..20).map(move |z| Coordinate::new(x, 0, z))).collect();
        let mut previous = cells.len();
        for step in 0..=10 {
            let decay = Decay::new(seed, f64::from(step) / 10.0);
            let kept: Vec<bool> = cells.iter().map(|at| decay.keep(*at, factors)).collect();
            let count = kept.iter().filter(|k| **k).count();
            assert!(count <= previous);
            previous = count;
        }
        assert_eq!(Decay::new(seed, 0.0).omission_probability(DecayFactors::new(1.0, 1.0)), 0.0);
        assert_eq!(Decay::new(seed, 1.0).omission_probability(DecayFactors::new(1.0, 1.0)), 1.0);
    }

    #[test]
    fn test_decay_prefers_rims_and_tops() {
        let decay = Decay::new(WorldSeed::new(1), 0.5);
        let core = decay.omission_probability(DecayFactors::CORE);
        let rim = decay.omission_probability(DecayFactors::new(1.0, 0.0));
        let top = decay.omission_probability(DecayFactors::new(0.0, 1.0));
        assert!(rim > core && top > core);

        let region = BoundingBox::new(Coordinate::ORIGIN, Coordinate::new(10, 4, 10));
        let at_rim = DecayFactors::in_region(Coordinate::new(0, 0, 5), &region);
        let at_core = DecayFactors::in_region(Coordinate::new(5, 0, 5), &region);
        assert_eq!(at_rim.edge, 1.0);
        assert_eq!(at_core.edge, 0.0);
        assert_eq!(DecayFactors::in_region(Coordinate::new(5, 4, 5), &region).height, 1.0);
    }

    #[test]
    fn test_room_beyond_puts_door_on_near_wall() {
        let door = Coordinate::new(10, 40, -3);
        let size = Size::new(7, 5, 9);
        for direction in Direction::ALL {
            let room = Room::new(RoomKind::SideRoom, room_origin_beyond(door, direction, size), size);
            assert_eq!(room.door_on(direction.opposite(), 0), door, "{direction:?}");
            let free = region_beyond(door, direction, size);
            assert!(!free.contains(door));
            assert!(free.contains(room.center()));
        }
    }

    #[test]
    fn test_staircase_rises_one_per_step() {
        let (_, canvas) = run(|ctx| {
            let style = StyleTable::new("s");
            let top = staircase(ctx, Coordinate::ORIGIN, Direction::North, 5, &BlockDescriptor::new("stone_stairs"), &style);
            assert_eq!(top, Coordinate::new(0, 4, -4));
        });
        for i in 0..5 {
            assert_eq!(kind_at(&canvas, Coordinate::new(0, i, -i)), Some("stone_stairs"));
            assert_eq!(kind_at(&canvas, Coordinate::new(0, i + 1, -i)), Some("air"));
        }
    }
}
