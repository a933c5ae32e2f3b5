//! Desert pyramid and jungle temple.
//!
//! Both are solid masonry around a handful of hollow rooms with one
//! concealed trap: the pyramid hides a pressure plate over TNT at the
//! bottom of a shaft, the jungle temple strings a tripwire in front of
//! two arrow dispensers.

use bastion_shared::{BlockDescriptor, BoundingBox, Coordinate, Direction, ItemStack, Size};

use super::{chest, FeatureGenerator};
use crate::context::BuildContext;
use crate::palette::{Slot, StyleTable};
use crate::primitives::{
    carve_doorway, carve_room, extrude_corridor, fill_box, room_doorway, room_origin_beyond, staircase,
    CorridorSpec, DOOR_HEIGHT,
};
use crate::result::{RoomKind, StructureResult};

// =============================================================================
// Desert pyramid
// =============================================================================

const PYRAMID_HALF: i32 = 10;
const HALL_SIZE: Size = Size::new(9, 6, 9);
const TRAP_SIZE: Size = Size::new(9, 5, 9);

/// Walk-level drop from the hall to the trap room.
const TRAP_DEPTH: i32 = 12;

/// Desert pyramid generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesertPyramidGenerator;

impl FeatureGenerator for DesertPyramidGenerator {
    fn generate(&self, mut ctx: BuildContext<'_>) -> StructureResult {
        let style = ctx.palette("desert_pyramid");
        let p = ctx.origin();
        let base_y = p.y - 1;

        let hall = carve_room(&mut ctx, RoomKind::MainHall, p.offset(-4, -1, -4), HALL_SIZE, style);
        let trap_walk = p.y - TRAP_DEPTH;
        let trap = carve_room(
            &mut ctx,
            RoomKind::TrapRoom,
            Coordinate::new(p.x - 4, trap_walk - 1, p.z - 4),
            TRAP_SIZE,
            style,
        );

        // Entrance corridor out of the north face.
        if let Some(door) = room_doorway(&mut ctx, hall, Direction::North, 0) {
            let end = p.offset(0, 0, -PYRAMID_HALF);
            carve_doorway(&mut ctx, end, Direction::North, DOOR_HEIGHT);
            extrude_corridor(&mut ctx, door.position, end, &CorridorSpec::new(style).unlit());
            ctx.set_entrance(end);
        }

        // Shaft from the hall floor through the trap ceiling.
        let trap_ceiling = trap_walk + TRAP_SIZE.height - 2;
        for y in trap_ceiling..=base_y {
            let cell = Coordinate::new(p.x, y, p.z);
            ctx.carve(cell);
            for side in Direction::ALL {
                ctx.enclose_style(cell.step(side, 1), style, Slot::Wall);
            }
        }

        // Stepped body; carved space stays open.
        for k in 0..=PYRAMID_HALF {
            let half = PYRAMID_HALF - k;
            for dz in -half..=half {
                for dx in -half..=half {
                    let rim = dx.abs() == half || dz.abs() == half;
                    let slot = if k == 2 && rim { Slot::Accent } else { Slot::Wall };
                    ctx.enclose_style(p.offset(dx, k - 1, dz), style, slot);
                }
            }
        }

        // Terracotta star on the hall floor.
        for d in -2..=2 {
            for at in [p.offset(d, -1, d), p.offset(d, -1, -d)] {
                if !ctx.is_open(at) {
                    ctx.place_style(at, style, Slot::Accent);
                }
            }
        }

        // Trap: pressure plate under the shaft, TNT under the floor.
        let plate = Coordinate::new(p.x, trap_walk, p.z);
        ctx.place(plate, BlockDescriptor::new("stone_pressure_plate"));
        for dz in -1..=1 {
            for dx in -1..=1 {
                ctx.place(plate.offset(dx, -2, dz), BlockDescriptor::new("tnt"));
            }
        }
        if let Some(room) = ctx.room(trap).cloned() {
            for side in Direction::ALL {
                let at = room.door_on(side, 0).step(side.opposite(), 1);
                ctx.place_loot(at, chest(side.opposite(), "desert_pyramid"));
            }
        }

        tracing::debug!(%p, "desert pyramid built");
        ctx.finish()
    }
}

// =============================================================================
// Jungle temple
// =============================================================================

const JUNGLE_HALL: Size = Size::new(11, 7, 13);
const STAIRWELL: Size = Size::new(7, 10, 9);
const VAULT: Size = Size::new(7, 5, 7);
const HALL_TO_STAIRS: i32 = 4;
const TRAP_CORRIDOR: i32 = 8;
const LEVEL_DROP: i32 = 5;
const STAIR_STEPS: i32 = 5;
const VINE_CHANCE: f64 = 0.35;
const ARROWS: u32 = 9;

/// Jungle temple generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct JungleTempleGenerator;

impl FeatureGenerator for JungleTempleGenerator {
    fn generate(&self, mut ctx: BuildContext<'_>) -> StructureResult {
        let style = ctx.palette("jungle_temple");
        let p = ctx.origin();
        let spec = CorridorSpec::new(style).unlit();

        let hall = carve_room(&mut ctx, RoomKind::MainHall, p.offset(-5, -1, -6), JUNGLE_HALL, style);
        if let Some(room) = ctx.room(hall).cloned() {
            grow_vines(&mut ctx, &room.bounds(), style);
        }
        if let Some(door) = room_doorway(&mut ctx, hall, Direction::North, 0) {
            ctx.set_entrance(door.position);
        }
        for (dx, dz) in [(-3, -4), (3, -4), (-3, 4), (3, 4)] {
            for h in 0..JUNGLE_HALL.height - 2 {
                ctx.place_style(p.offset(dx, h, dz), style, Slot::Pillar);
            }
        }

        // =====================================================================
        // Stairwell down one level
        // =====================================================================
        let Some(hall_door) = room_doorway(&mut ctx, hall, Direction::South, 0) else {
            return ctx.finish();
        };
        let upper_door = hall_door.position.step(Direction::South, HALL_TO_STAIRS);
        let lower_y = p.y - LEVEL_DROP;
        let stairs_origin = room_origin_beyond(upper_door, Direction::South, STAIRWELL).with_y(lower_y - 1);
        let stairs = carve_room(&mut ctx, RoomKind::Stairwell, stairs_origin, STAIRWELL, style);
        carve_doorway(&mut ctx, upper_door, Direction::North, DOOR_HEIGHT);
        ctx.attach_doorway(stairs, upper_door);
        extrude_corridor(&mut ctx, hall_door.position, upper_door, &spec);

        fill_box(
            &mut ctx,
            BoundingBox::new(
                Coordinate::new(p.x - 2, lower_y, upper_door.z + 1),
                Coordinate::new(p.x + 1, p.y - 1, upper_door.z + 2),
            ),
            style,
            Slot::Wall,
        );
        staircase(
            &mut ctx,
            Coordinate::new(p.x - 2, lower_y, upper_door.z + 2 + STAIR_STEPS),
            Direction::North,
            STAIR_STEPS,
            &BlockDescriptor::new("mossy_stone_brick_stairs"),
            style,
        );

        // =====================================================================
        // Trapped corridor and vault
        // =====================================================================
        let Some(lower_door) = room_doorway(&mut ctx, stairs, Direction::East, 0) else {
            return ctx.finish();
        };
        let vault_door = lower_door.position.step(Direction::East, TRAP_CORRIDOR - 1);
        let vault = carve_room(
            &mut ctx,
            RoomKind::TreasureRoom,
            room_origin_beyond(vault_door, Direction::East, VAULT),
            VAULT,
            style,
        );
        carve_doorway(&mut ctx, vault_door, Direction::West, DOOR_HEIGHT);
        ctx.attach_doorway(vault, vault_door);
        extrude_corridor(&mut ctx, lower_door.position, vault_door, &spec);
        arm_tripwire(&mut ctx, lower_door.position.step(Direction::East, TRAP_CORRIDOR / 2));

        if let Some(room) = ctx.room(vault).cloned() {
            let back = room.door_on(Direction::East, 0).step(Direction::West, 1);
            ctx.place_loot(back, chest(Direction::West, "jungle_temple"));
            for offset in -1..=1 {
                let at = room.door_on(Direction::North, offset).step(Direction::South, 1).above(1);
                ctx.place(at, BlockDescriptor::new("lever").facing(Direction::South));
            }
        }

        tracing::debug!(%p, "jungle temple built");
        ctx.finish()
    }
}

/// Vines on the outside of a box's side walls.
fn grow_vines(ctx: &mut BuildContext<'_>, bounds: &BoundingBox, style: &StyleTable) {
    let outer = bounds.expand(1);
    for y in (bounds.min.y + 1)..=bounds.max.y {
        for z in outer.min.z..=outer.max.z {
            for x in outer.min.x..=outer.max.x {
                let at = Coordinate::new(x, y, z);
                let on_face = (x == outer.min.x || x == outer.max.x) != (z == outer.min.z || z == outer.max.z);
                if on_face && ctx.rng.chance(VINE_CHANCE) {
                    ctx.place_style(at, style, Slot::Detail);
                }
            }
        }
    }
}

/// Tripwire across an east-west corridor with a hook on each side and a
/// loaded dispenser in each wall.
fn arm_tripwire(ctx: &mut BuildContext<'_>, at: Coordinate) {
    ctx.place(at, BlockDescriptor::new("tripwire").with("attached", true));
    for side in [Direction::North, Direction::South] {
        ctx.place(at.step(side, 1), BlockDescriptor::new("tripwire_hook").facing(side.opposite()));
        ctx.place(
            at.step(side, 2),
            BlockDescriptor::new("dispenser")
                .facing(side.opposite())
                .with("trigger", "tripwire")
                .items(vec![ItemStack::new("arrow", ARROWS)]),
        );
    }
}
