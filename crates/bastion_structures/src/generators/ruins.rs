//! Broken stone rooms on land and on the sea floor.
//!
//! Walls, floors and the remains of ceilings go through the decay sample;
//! doorways, chests and the flooded interiors do not.

use bastion_shared::{BlockDescriptor, BoundingBox, Coordinate, Direction, Size, SpawnRequest};

use super::{chest, FeatureGenerator};
use crate::context::BuildContext;
use crate::palette::{Slot, StyleTable};
use crate::primitives::{room_doorway, DecayFactors};
use crate::result::{Doorway, Room, RoomKind, StructureResult};

const MOSS_CHANCE: f64 = 0.2;
const SEAGRASS_CHANCE: f64 = 0.25;

/// How far down the terrain probe looks for the sea floor.
const FLOOR_SEARCH: i32 = 32;

/// Walls of a room, skipping carved and protected cells, routed through
/// decay relative to the room box. The top layer only if `roofed`.
fn decayed_walls(ctx: &mut BuildContext<'_>, bounds: BoundingBox, style: &StyleTable, roofed: bool) {
    for y in bounds.min.y..=bounds.max.y {
        for z in bounds.min.z..=bounds.max.z {
            for x in bounds.min.x..=bounds.max.x {
                let at = Coordinate::new(x, y, z);
                let side = x == bounds.min.x || x == bounds.max.x || z == bounds.min.z || z == bounds.max.z;
                let slot = if y == bounds.min.y {
                    Slot::Floor
                } else if side || (roofed && y == bounds.max.y) {
                    Slot::Wall
                } else {
                    continue;
                };
                let block = ctx.pick(style, slot);
                ctx.enclose_decayed(at, block, DecayFactors::in_region(at, &bounds));
            }
        }
    }
}

/// Interior cells at walking height, next to a side wall.
fn wall_hugging(room: &Room) -> Vec<(Coordinate, Direction)> {
    let b = room.bounds();
    let y = room.walk_y();
    let mut spots = Vec::new();
    for x in (b.min.x + 1)..b.max.x {
        spots.push((Coordinate::new(x, y, b.min.z + 1), Direction::South));
        spots.push((Coordinate::new(x, y, b.max.z - 1), Direction::North));
    }
    for z in (b.min.z + 2)..(b.max.z - 1) {
        spots.push((Coordinate::new(b.min.x + 1, y, z), Direction::East));
        spots.push((Coordinate::new(b.max.x - 1, y, z), Direction::West));
    }
    spots
}

// =============================================================================
// Land ruins
// =============================================================================

/// Land ruins generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuinsGenerator;

impl FeatureGenerator for RuinsGenerator {
    fn generate(&self, mut ctx: BuildContext<'_>) -> StructureResult {
        let style = ctx.palette("ruins");
        let origin = ctx.origin();
        let wanted = ctx.rng.next_int(1, 3);

        let mut rooms = Vec::new();
        for i in 0..wanted {
            let size = Size::new(ctx.rng.next_int(5, 9), ctx.rng.next_int(4, 5), ctx.rng.next_int(5, 9));
            let mut spot = None;
            for _ in 0..8 {
                let center = if i == 0 {
                    origin
                } else {
                    let dx = ctx.rng.next_int(7, 11) * if ctx.rng.chance(0.5) { 1 } else { -1 };
                    let dz = ctx.rng.next_int(-6, 6);
                    if ctx.rng.chance(0.5) { origin.offset(dx, 0, dz) } else { origin.offset(dz, 0, dx) }
                };
                let room_origin = center.offset(-size.width / 2, -1, -size.depth / 2);
                if ctx.is_free(&BoundingBox::from_origin(room_origin, size).expand(1)) {
                    spot = Some(room_origin);
                    break;
                }
            }
            let Some(room_origin) = spot else {
                tracing::trace!(%origin, room = i, "no space for ruin room");
                continue;
            };
            rooms.push(ruin_room(&mut ctx, room_origin, size, style));
        }

        // One chest in the first room.
        if let Some(room) = rooms.first().and_then(|r| ctx.room(*r)).cloned() {
            let mut spots = wall_hugging(&room);
            spots.retain(|(at, _)| !ctx.is_protected(*at));
            if let Some((at, facing)) = ctx.rng.pick(&spots).copied() {
                ctx.place_loot(at, chest(facing, "ruins"));
            }
        }

        tracing::debug!(%origin, rooms = rooms.len(), "ruins built");
        ctx.finish()
    }
}

fn ruin_room(ctx: &mut BuildContext<'_>, origin: Coordinate, size: Size, style: &StyleTable) -> usize {
    let room = ctx.add_room(Room::new(RoomKind::Ruin, origin, size));
    let bounds = BoundingBox::from_origin(origin, size);
    for y in (bounds.min.y + 1)..=bounds.max.y {
        for z in (bounds.min.z + 1)..bounds.max.z {
            for x in (bounds.min.x + 1)..bounds.max.x {
                ctx.carve(Coordinate::new(x, y, z));
            }
        }
    }
    let side = ctx.rng.direction();
    if let Some(doorway) = room_doorway(ctx, room, side, 0) {
        if ctx.rooms().len() == 1 {
            ctx.set_entrance(doorway.position);
        }
    }
    decayed_walls(ctx, bounds, style, false);

    for z in (bounds.min.z + 1)..bounds.max.z {
        for x in (bounds.min.x + 1)..bounds.max.x {
            if ctx.rng.chance(MOSS_CHANCE) {
                ctx.place_style(Coordinate::new(x, origin.y + 1, z), style, Slot::Detail);
            }
        }
    }
    room
}

// =============================================================================
// Ocean ruins
// =============================================================================

/// Warm (sandstone) or cold (stone brick) ocean ruin.
#[derive(Debug, Default, Clone, Copy)]
pub struct OceanRuinsGenerator;

impl OceanRuinsGenerator {
    /// Resolves the temperature from the variant, then the biome, then a coin flip.
    fn temperature(ctx: &mut BuildContext<'_>) -> &'static str {
        let options = ctx.options();
        let from_text = |text: &str| {
            if text.contains("warm") || text.contains("lukewarm") {
                Some("warm")
            } else if text.contains("cold") || text.contains("frozen") {
                Some("cold")
            } else {
                None
            }
        };
        let coin = ctx.rng.chance(0.5);
        options
            .variant
            .as_deref()
            .and_then(from_text)
            .or_else(|| options.biome.as_deref().and_then(from_text))
            .unwrap_or(if coin { "warm" } else { "cold" })
    }
}

impl FeatureGenerator for OceanRuinsGenerator {
    fn generate(&self, mut ctx: BuildContext<'_>) -> StructureResult {
        let temperature = Self::temperature(&mut ctx);
        let style = ctx.palette(&format!("ocean_ruins_{temperature}"));
        let origin = ctx.origin();
        let floor_y = ctx.ground_below(origin, FLOOR_SEARCH).map_or(origin.y - 1, |ground| ground.y);

        let size = Size::new(ctx.rng.next_int(7, 10), 5, ctx.rng.next_int(7, 10));
        let room_origin = Coordinate::new(origin.x - size.width / 2, floor_y, origin.z - size.depth / 2);
        let bounds = BoundingBox::from_origin(room_origin, size);
        let room = ctx.add_room(Room::new(RoomKind::Ruin, room_origin, size));

        // Silt apron around the footprint.
        let apron = bounds.expand(2);
        for z in apron.min.z..=apron.max.z {
            for x in apron.min.x..=apron.max.x {
                let at = Coordinate::new(x, floor_y, z);
                if bounds.contains(at) {
                    continue;
                }
                let block = ctx.pick(style, Slot::Foundation);
                ctx.place_decayed(at, block, DecayFactors::new(1.0, 0.0));
            }
        }

        // Water inside, a flooded doorway, then the broken shell.
        for y in (bounds.min.y + 1)..bounds.max.y {
            for z in (bounds.min.z + 1)..bounds.max.z {
                for x in (bounds.min.x + 1)..bounds.max.x {
                    ctx.place_style(Coordinate::new(x, y, z), style, Slot::Fluid);
                }
            }
        }
        let side = ctx.rng.direction();
        if let Some(door) = ctx.room(room).map(|r| r.door_on(side, 0)) {
            for cell in [door.step(side.opposite(), 1), door, door.step(side, 1)] {
                for h in 0..2 {
                    ctx.place_style(cell.above(h), style, Slot::Fluid);
                    ctx.protect(cell.above(h));
                }
            }
            ctx.add_doorway(Doorway { position: door, facing: side });
            ctx.attach_doorway(room, door);
            ctx.set_entrance(door);
        }
        decayed_walls(&mut ctx, bounds, style, true);

        let Some(shell) = ctx.room(room).cloned() else {
            return ctx.finish();
        };
        for z in (bounds.min.z + 1)..bounds.max.z {
            for x in (bounds.min.x + 1)..bounds.max.x {
                if ctx.rng.chance(SEAGRASS_CHANCE) {
                    ctx.place_style(Coordinate::new(x, shell.walk_y(), z), style, Slot::Detail);
                }
            }
        }
        let mut spots = wall_hugging(&shell);
        spots.retain(|(at, _)| !ctx.is_protected(*at));
        if let Some((at, facing)) = ctx.rng.pick(&spots).copied() {
            let table = format!("ocean_ruin_{temperature}");
            ctx.place_loot(at, BlockDescriptor::new("chest").facing(facing).loot(table).waterlogged());
        }

        let drowned = ctx.rng.next_int(1, 3);
        for _ in 0..drowned {
            let at = Coordinate::new(
                ctx.rng.next_int(bounds.min.x + 1, bounds.max.x - 1),
                shell.walk_y(),
                ctx.rng.next_int(bounds.min.z + 1, bounds.max.z - 1),
            );
            ctx.spawn(SpawnRequest::new("drowned", at));
        }

        tracing::debug!(%origin, temperature, floor_y, drowned, "ocean ruin built");
        ctx.finish()
    }
}
