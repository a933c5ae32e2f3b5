//! # Stronghold
//!
//! Fixed room graph, always laid out the same way around the origin:
//!
//! ```text
//!   [entrance] --S 10--> [stairs] --S 12--> [library]
//!                           |
//!                           +--E 12--> (portal room)
//! ```
//!
//! The stairs room drops five blocks: its upper door opens onto a landing
//! and a five-step staircase leads down to the lower doors. Brick
//! weathering (cracked and mossy substitution) is drawn once per
//! stronghold; library decor goes through the decay sampler.

use bastion_shared::{BlockDescriptor, BoundingBox, Coordinate, Direction, Size};

use super::{chest, spawner_block, FeatureGenerator};
use crate::context::BuildContext;
use crate::palette::{Slot, StyleTable};
use crate::primitives::{
    carve_doorway, carve_radial, carve_room, extrude_corridor, fill_box, room_doorway, staircase, CorridorSpec,
    DecayFactors, RadialProfile, ShellSlots, DOOR_HEIGHT,
};
use crate::result::{Room, RoomKind, StructureResult};

const ENTRANCE_SIZE: Size = Size::new(9, 6, 9);
const STAIRS_SIZE: Size = Size::new(11, 10, 11);
const LIBRARY_SIZE: Size = Size::new(13, 8, 11);

/// Drop between the upper and lower levels of the stairs room.
const LEVEL_DROP: i32 = 5;

/// Number of staircase steps.
const STAIR_STEPS: i32 = 5;

const FIRST_CORRIDOR: i32 = 10;
const LOWER_CORRIDOR: i32 = 12;

const PORTAL_RADIUS: i32 = 7;
const PORTAL_HEIGHT: i32 = 8;

/// Chance that a portal frame already holds an eye.
const EYE_CHANCE: f64 = 0.1;

/// Stronghold generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct StrongholdGenerator;

impl FeatureGenerator for StrongholdGenerator {
    #[allow(clippy::too_many_lines)]
    fn generate(&self, mut ctx: BuildContext<'_>) -> StructureResult {
        let tuning = &ctx.config().stronghold;
        let p = ctx.origin();
        let cracked = ctx.rng.range_f64(tuning.cracked_min, tuning.cracked_max);
        let mossy = ctx.rng.range_f64(tuning.mossy_min, tuning.mossy_max);
        let style = weathered(ctx.palette("stronghold"), cracked, mossy);
        let spec = CorridorSpec::new(&style).with_light_interval(tuning.light_interval);

        // =====================================================================
        // Entrance
        // =====================================================================
        let entrance = carve_room(&mut ctx, RoomKind::Entrance, p.offset(-4, -1, -4), ENTRANCE_SIZE, &style);
        ctx.set_entrance(p);
        room_doorway(&mut ctx, entrance, Direction::North, 0);

        // =====================================================================
        // Stairs room, upper level
        // =====================================================================
        let lower_y = p.y - LEVEL_DROP;
        let upper_door = p.offset(0, 0, 4 + FIRST_CORRIDOR - 1);
        let stairs = carve_room(
            &mut ctx,
            RoomKind::StairsRoom,
            Coordinate::new(p.x - STAIRS_SIZE.width / 2, lower_y - 1, upper_door.z),
            STAIRS_SIZE,
            &style,
        );
        let first_door = room_doorway(&mut ctx, entrance, Direction::South, 0);
        carve_doorway(&mut ctx, upper_door, Direction::North, DOOR_HEIGHT);
        ctx.attach_doorway(stairs, upper_door);

        // Landing under the upper door, staircase along the west side.
        fill_box(
            &mut ctx,
            BoundingBox::new(
                Coordinate::new(p.x - 3, lower_y, upper_door.z + 1),
                Coordinate::new(p.x + 1, p.y - 1, upper_door.z + 2),
            ),
            &style,
            Slot::Wall,
        );
        let stair_block = BlockDescriptor::new("stone_brick_stairs");
        staircase(
            &mut ctx,
            Coordinate::new(p.x - 3, lower_y, upper_door.z + 7),
            Direction::North,
            STAIR_STEPS,
            &stair_block,
            &style,
        );

        let mut runs = Vec::with_capacity(3);
        if let Some(door) = first_door {
            if extrude_corridor(&mut ctx, door.position, upper_door, &spec).is_some() {
                runs.push((door.position, Direction::South, FIRST_CORRIDOR));
            }
        }

        // =====================================================================
        // Library, south
        // =====================================================================
        if let Some(door) = room_doorway(&mut ctx, stairs, Direction::South, 0) {
            let end = door.position.step(Direction::South, LOWER_CORRIDOR - 1);
            let library = carve_room(
                &mut ctx,
                RoomKind::Library,
                Coordinate::new(p.x - LIBRARY_SIZE.width / 2, lower_y - 1, end.z),
                LIBRARY_SIZE,
                &style,
            );
            room_doorway(&mut ctx, library, Direction::North, 0);
            if extrude_corridor(&mut ctx, door.position, end, &spec).is_some() {
                runs.push((door.position, Direction::South, LOWER_CORRIDOR));
            }
            if let Some(room) = ctx.room(library).cloned() {
                furnish_library(&mut ctx, &room, &style);
            }
        }

        // =====================================================================
        // Portal room, east
        // =====================================================================
        if let Some(door) = room_doorway(&mut ctx, stairs, Direction::East, 0) {
            let end = door.position.step(Direction::East, LOWER_CORRIDOR - 1);
            let center = Coordinate::new(end.x + PORTAL_RADIUS, lower_y - 1, end.z);
            carve_radial(
                &mut ctx,
                center,
                PORTAL_RADIUS,
                PORTAL_HEIGHT,
                RadialProfile::Cylinder,
                &style,
                ShellSlots::default(),
            );
            let portal = ctx.add_room(Room::new(
                RoomKind::PortalRoom,
                center.offset(-PORTAL_RADIUS, 0, -PORTAL_RADIUS),
                Size::new(2 * PORTAL_RADIUS + 1, PORTAL_HEIGHT, 2 * PORTAL_RADIUS + 1),
            ));
            carve_doorway(&mut ctx, end, Direction::West, DOOR_HEIGHT);
            ctx.attach_doorway(portal, end);
            if extrude_corridor(&mut ctx, door.position, end, &spec).is_some() {
                runs.push((door.position, Direction::East, LOWER_CORRIDOR));
            }
            furnish_portal_room(&mut ctx, center, &style);
        }

        // =====================================================================
        // Corridor chests
        // =====================================================================
        for (start, direction, length) in runs {
            if ctx.rng.chance(tuning.corridor_chest_chance) {
                let at = start.step(direction, length / 2).step(direction.right(), 1);
                ctx.place_loot(at, chest(direction.left(), "stronghold_corridor"));
            }
        }

        tracing::trace!(%p, cracked, mossy, "stronghold laid out");
        ctx.finish()
    }
}

/// Stronghold bricks with cracked and mossy variants mixed in.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn weathered(base: &StyleTable, cracked: f64, mossy: f64) -> StyleTable {
    let cracked = (cracked.clamp(0.0, 1.0) * 1000.0).round() as u32;
    let mossy = (mossy.clamp(0.0, 1.0) * 1000.0).round() as u32;
    let plain = 1000_u32.saturating_sub(cracked + mossy);
    let mix = [
        ("stone_bricks", plain),
        ("cracked_stone_bricks", cracked),
        ("mossy_stone_bricks", mossy),
    ];
    base.clone()
        .with_weighted(Slot::Wall, &mix)
        .with_weighted(Slot::Floor, &mix)
        .with_weighted(Slot::Ceiling, &mix)
}

/// Bookshelf walls, a lectern and the library chest.
fn furnish_library(ctx: &mut BuildContext<'_>, room: &Room, style: &StyleTable) {
    let bounds = room.bounds();
    let walk = room.walk_y();
    for z in (bounds.min.z + 1)..bounds.max.z {
        for x in [bounds.min.x + 1, bounds.max.x - 1] {
            for h in 0..4 {
                let at = Coordinate::new(x, walk + h, z);
                let shelf = ctx.pick(style, Slot::Detail);
                ctx.place_decayed(at, shelf, DecayFactors::in_region(at, &bounds));
            }
        }
    }
    for x in [bounds.min.x + 2, bounds.max.x - 2] {
        for z in [bounds.min.z + 1, bounds.max.z - 1] {
            let at = Coordinate::new(x, bounds.max.y - 1, z);
            ctx.place_decayed(at, BlockDescriptor::new("cobweb"), DecayFactors::in_region(at, &bounds));
        }
    }
    let center = room.center();
    ctx.place(center.offset(0, 0, 2), BlockDescriptor::new("lectern").facing(Direction::North));
    ctx.place_loot(
        Coordinate::new(center.x + 2, walk, bounds.max.z - 1),
        chest(Direction::North, "stronghold_library"),
    );
}

/// Twelve portal frames, the lava pool and the silverfish spawner under it.
fn furnish_portal_room(ctx: &mut BuildContext<'_>, center: Coordinate, style: &StyleTable) {
    let portal = center.offset(0, 1, -1);
    let mut frames = Vec::with_capacity(12);
    for i in -1..=1 {
        frames.push((portal.offset(i, 0, -2), Direction::South));
        frames.push((portal.offset(i, 0, 2), Direction::North));
        frames.push((portal.offset(-2, 0, i), Direction::East));
        frames.push((portal.offset(2, 0, i), Direction::West));
    }
    for (at, facing) in frames {
        let eye = ctx.rng.chance(EYE_CHANCE);
        ctx.place(at, BlockDescriptor::new("end_portal_frame").facing(facing).with("eye", eye));
    }
    for dz in 3..=4 {
        for dx in -1..=1 {
            ctx.place_style(center.offset(dx, 0, dz), style, Slot::Fluid);
        }
    }
    ctx.place(center.offset(0, -1, 3), spawner_block("silverfish"));
}
