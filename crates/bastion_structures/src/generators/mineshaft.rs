//! # Mineshaft
//!
//! Abandoned mine workings:
//!
//! 1. A small hub room at the origin (the entrance)
//! 2. One long main corridor leaving the hub, length by size class
//! 3. Two to four side branches cut through the main corridor's walls
//! 4. Optionally an intersection room and a cave-spider room at branch tips
//! 5. Rails on every cell between wooden supports, collapse decoration
//! 6. Exactly one chest minecart at a dead end
//!
//! Every dead end is capped with a doorway so the tunnel visibly continues
//! into the rock.

use bastion_shared::{BlockDescriptor, BoundingBox, Coordinate, Direction, Size};

use super::{spawner_block, FeatureGenerator};
use crate::context::BuildContext;
use crate::palette::{Slot, StyleTable};
use crate::primitives::{
    carve_doorway, carve_room, extrude_corridor, region_beyond, room_doorway, room_origin_beyond,
    CorridorSpec, CORRIDOR_HEIGHT, DOOR_HEIGHT,
};
use crate::result::{RoomKind, StructureResult};

/// Hub and side-room size.
const ROOM_SIZE: Size = Size::new(7, 5, 7);

/// Branches never start closer than this to each other.
const MIN_BRANCH_SPACING: i32 = 6;

/// Floor on branch length after clamping.
const MIN_BRANCH_LENGTH: i32 = 4;

/// Corridor leaving the far side of an intersection room.
const STUB_LENGTH: i32 = 6;

/// Chance of each cobweb in a webbed section.
const COBWEB_CHANCE: f64 = 0.6;

/// A straight corridor run.
#[derive(Clone, Copy, Debug)]
struct Run {
    start: Coordinate,
    direction: Direction,
    length: i32,
}

impl Run {
    #[inline]
    fn tip(self) -> Coordinate {
        self.start.step(self.direction, self.length - 1)
    }

    fn rail(self) -> BlockDescriptor {
        let shape = if self.direction.is_x_axis() { "east_west" } else { "north_south" };
        BlockDescriptor::new("rail").with("shape", shape)
    }
}

/// Mineshaft generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct MineshaftGenerator;

impl FeatureGenerator for MineshaftGenerator {
    #[allow(clippy::too_many_lines)]
    fn generate(&self, mut ctx: BuildContext<'_>) -> StructureResult {
        let style = ctx.palette("mineshaft");
        let tuning = &ctx.config().mineshaft;
        let origin = ctx.origin();
        let spec = CorridorSpec::new(style).unlit();
        let main_length =
            ctx.options()
                .size_or_default()
                .select(tuning.small_length, tuning.medium_length, tuning.large_length);

        // =====================================================================
        // Hub and main corridor
        // =====================================================================
        let hub_origin = origin.offset(-ROOM_SIZE.width / 2, -1, -ROOM_SIZE.depth / 2);
        let hub = carve_room(&mut ctx, RoomKind::Hub, hub_origin, ROOM_SIZE, style);
        ctx.set_entrance(origin);

        let heading = ctx.rng.direction();
        let Some(door) = room_doorway(&mut ctx, hub, heading, 0) else {
            return ctx.finish();
        };
        let main = Run {
            start: door.position,
            direction: heading,
            length: main_length,
        };
        let mut runs = Vec::new();
        if extrude_corridor(&mut ctx, main.start, main.tip(), &spec).is_some() {
            runs.push(main);
        }

        // =====================================================================
        // Branches
        // =====================================================================
        let wanted = usize::try_from(ctx.rng.next_int(2, 4)).unwrap_or(2);
        let mut offsets: Vec<i32> = Vec::with_capacity(wanted);
        for _ in 0..32 {
            if offsets.len() == wanted {
                break;
            }
            let offset = ctx.rng.next_int(4, main_length - 6);
            if offsets.iter().all(|o| (o - offset).abs() >= MIN_BRANCH_SPACING) {
                offsets.push(offset);
            }
        }
        offsets.sort_unstable();

        for offset in offsets {
            let side = if ctx.rng.chance(0.5) { heading.left() } else { heading.right() };
            let length = ctx
                .rng
                .next_int(tuning.branch_min_length, tuning.branch_max_length)
                .min(main_length - offset)
                .max(MIN_BRANCH_LENGTH);
            let branch_door = main.start.step(heading, offset).step(side, 2);
            carve_doorway(&mut ctx, branch_door, side, DOOR_HEIGHT);
            let branch = Run {
                start: branch_door,
                direction: side,
                length,
            };
            if extrude_corridor(&mut ctx, branch.start, branch.tip(), &spec).is_some() {
                runs.push(branch);
            }
        }

        // =====================================================================
        // Optional rooms at branch tips, caps everywhere else
        // =====================================================================
        let mut pending = Vec::new();
        if ctx.rng.chance(tuning.room_chance) {
            pending.push(RoomKind::Intersection);
        }
        if ctx.rng.chance(tuning.room_chance) {
            pending.push(RoomKind::SpawnerRoom);
        }
        let mut tips: Vec<usize> = (1..runs.len()).collect();
        ctx.rng.shuffle(&mut tips);

        let mut dead_ends = vec![0];
        for index in tips {
            let run = runs[index];
            let fits = ctx.is_free(&region_beyond(run.tip(), run.direction, ROOM_SIZE));
            match pending.first().copied() {
                Some(kind) if fits => {
                    pending.remove(0);
                    if let Some(stub) = end_room(&mut ctx, kind, run, style, &spec) {
                        dead_ends.push(runs.len());
                        runs.push(stub);
                    }
                }
                _ => dead_ends.push(index),
            }
        }
        if !pending.is_empty() {
            tracing::trace!(%origin, skipped = pending.len(), "no room for optional mineshaft rooms");
        }
        for &index in &dead_ends {
            if let Some(run) = runs.get(index) {
                carve_doorway(&mut ctx, run.tip(), run.direction, DOOR_HEIGHT);
            }
        }

        // =====================================================================
        // Track, supports, decoration, cart
        // =====================================================================
        for run in &runs {
            lay_track(&mut ctx, *run, style, tuning.support_interval, tuning.decoration_interval);
        }

        let cart_run = ctx.rng.pick(&dead_ends).and_then(|&i| runs.get(i)).copied();
        if let Some(run) = cart_run {
            let cart = BlockDescriptor::new("chest_minecart")
                .axis(run.direction)
                .loot("mineshaft_corridor");
            // The cap cells past the last rail stay clear.
            ctx.place_loot(run.tip().step(run.direction, -2), cart);
        }

        tracing::trace!(%origin, main_length, runs = runs.len(), "mineshaft laid out");
        ctx.finish()
    }
}

/// Builds an optional room beyond a branch tip. Intersection rooms get a
/// short stub corridor out of their far side, which is returned.
fn end_room(
    ctx: &mut BuildContext<'_>,
    kind: RoomKind,
    run: Run,
    style: &StyleTable,
    spec: &CorridorSpec<'_>,
) -> Option<Run> {
    let tip = run.tip();
    let room_origin = room_origin_beyond(tip, run.direction, ROOM_SIZE);
    let room = carve_room(ctx, kind, room_origin, ROOM_SIZE, style);
    carve_doorway(ctx, tip, run.direction.opposite(), DOOR_HEIGHT);
    ctx.attach_doorway(room, tip);
    let center = ctx.room(room)?.center();

    match kind {
        RoomKind::SpawnerRoom => {
            ctx.place(center, spawner_block("cave_spider"));
            for (dx, dz) in [(-1, -1), (1, -1), (-1, 1), (1, 1), (0, -2), (2, 0)] {
                let web = ctx.rng.chance(COBWEB_CHANCE);
                if web {
                    ctx.place_style(center.offset(dx, 1, dz), style, Slot::Detail);
                }
            }
            None
        }
        _ => {
            let far = ctx.room(room)?.door_on(run.direction, 0);
            let stub = Run {
                start: far,
                direction: run.direction,
                length: STUB_LENGTH,
            };
            let across = run.direction.right();
            let clearance = BoundingBox::new(
                far.step(run.direction, 1).step(across, -2).below(1),
                stub.tip().step(across, 2).above(CORRIDOR_HEIGHT),
            );
            if !ctx.is_free(&clearance) {
                return None;
            }
            room_doorway(ctx, room, run.direction, 0)?;
            extrude_corridor(ctx, stub.start, stub.tip(), spec)?;
            Some(stub)
        }
    }
}

/// Rails from the doorway cell onward, supports every `support_interval`
/// cells and a collapse feature every `decoration_interval` cells.
fn lay_track(
    ctx: &mut BuildContext<'_>,
    run: Run,
    style: &StyleTable,
    support_interval: i32,
    decoration_interval: i32,
) {
    let across = run.direction.right();
    let support_interval = support_interval.max(1);
    let decoration_interval = decoration_interval.max(1);
    for i in 0..run.length {
        let cell = run.start.step(run.direction, i);
        if i == 0 || i % support_interval != 0 {
            ctx.place(cell, run.rail());
        } else {
            for lateral in [-1, 1] {
                let post = cell.step(across, lateral);
                ctx.place_style(post, style, Slot::Pillar);
                ctx.place_style(post.above(1), style, Slot::Pillar);
            }
            for lateral in -1..=1 {
                ctx.place_style(cell.step(across, lateral).above(2), style, Slot::Accent);
            }
        }
        if i > 0 && i % decoration_interval == decoration_interval / 2 {
            collapse(ctx, cell, across, style);
        }
    }
}

/// One of: gravel through the ceiling, cobwebs, a broken support.
fn collapse(ctx: &mut BuildContext<'_>, cell: Coordinate, across: Direction, style: &StyleTable) {
    let gravel = BlockDescriptor::new("gravel");
    match ctx.rng.next_int(0, 2) {
        0 => {
            ctx.place(cell.above(CORRIDOR_HEIGHT), gravel.clone());
            ctx.place(cell.step(across, 1), gravel);
        }
        1 => {
            for lateral in [-1, 1] {
                if ctx.rng.chance(COBWEB_CHANCE) {
                    ctx.place_style(cell.step(across, lateral).above(2), style, Slot::Detail);
                }
            }
        }
        _ => {
            ctx.place_style(cell.step(across, -1), style, Slot::Pillar);
            ctx.place_style(cell.step(across, -1).above(2), style, Slot::Accent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::testing::{contained, run};
    use crate::options::{SizeClass, StructureOptions};

    #[test]
    fn test_main_corridor_length_follows_size() {
        for (size, length) in [(SizeClass::Small, 32), (SizeClass::Medium, 48), (SizeClass::Large, 64)] {
            let options = StructureOptions::new().with_size(size);
            let (result, canvas) = run(&MineshaftGenerator, "mineshaft", Coordinate::new(0, 40, 0), &options, 42);
            assert_eq!(result.corridors[0].length(), length);
            assert!(contained(&result, &canvas));
        }
    }

    #[test]
    fn test_rails_between_supports() {
        for seed in [1, 2, 3, 42] {
            let (result, canvas) =
                run(&MineshaftGenerator, "mineshaft", Coordinate::new(0, 40, 0), &StructureOptions::new(), seed);
            let main = result.corridors[0];
            for (i, cell) in main.centre_line().into_iter().enumerate() {
                if i > 0 && i % 4 == 0 {
                    continue;
                }
                let kind = canvas.get(cell).map(BlockDescriptor::kind);
                assert!(matches!(kind, Some("rail" | "chest_minecart")), "seed {seed} cell {i}: {kind:?}");
            }
        }
    }

    #[test]
    fn test_track_starts_at_the_doorway() {
        for seed in 0..10 {
            let (result, canvas) =
                run(&MineshaftGenerator, "mineshaft", Coordinate::new(0, 40, 0), &StructureOptions::new(), seed);
            for corridor in &result.corridors {
                let kind = canvas.get(corridor.start).map(BlockDescriptor::kind);
                assert_eq!(kind, Some("rail"), "seed {seed}: corridor from {}", corridor.start);
            }
        }
    }

    #[test]
    fn test_exactly_one_cart() {
        for seed in 0..10 {
            let (result, canvas) =
                run(&MineshaftGenerator, "mineshaft", Coordinate::new(0, 40, 0), &StructureOptions::new(), seed);
            assert_eq!(canvas.count_kind("chest_minecart"), 1);
            assert_eq!(result.loot_containers.len(), 1);
            assert_eq!(result.loot_containers[0].table.as_deref(), Some("mineshaft_corridor"));
        }
    }

    #[test]
    fn test_branches_leave_main_corridor() {
        for seed in 0..10 {
            let (result, _) =
                run(&MineshaftGenerator, "mineshaft", Coordinate::new(0, 40, 0), &StructureOptions::new(), seed);
            let main = result.corridors[0];
            let heading = main.direction().unwrap();
            let branches: Vec<_> = result
                .corridors
                .iter()
                .skip(1)
                .filter(|c| c.direction().is_some_and(|d| d == heading.left() || d == heading.right()))
                .collect();
            assert!(branches.len() >= 2, "seed {seed}");
            for branch in &branches {
                assert!(branch.length() <= main.length());
                assert!(result.doorways.iter().any(|d| d.position == branch.start));
            }
        }
    }

    #[test]
    fn test_spawner_rooms_hold_cave_spiders() {
        for seed in 0..30 {
            let (result, canvas) =
                run(&MineshaftGenerator, "mineshaft", Coordinate::new(0, 40, 0), &StructureOptions::new(), seed);
            for room in result.rooms_of(RoomKind::SpawnerRoom) {
                let spawner = canvas.get(room.center()).unwrap();
                assert_eq!(spawner.kind(), "spawner");
                assert_eq!(spawner.get("entity").and_then(|v| v.as_str()), Some("cave_spider"));
            }
        }
    }
}
