//! # Ancient City
//!
//! A deepslate platform deep underground with an air cavity above it.
//!
//! Layout:
//! - cylindrical altar chamber at the center with a reinforced frame
//! - four cardinal corridors out of the chamber, capped at their ends;
//!   the southern end is the entrance
//! - one or two side rooms off each corridor
//! - two or three treasure rooms on a fixed radius, rotated until they
//!   clear everything already placed
//! - scattered sculk patches, columns and soul-fire braziers

use std::f64::consts::TAU;

use bastion_shared::{BlockDescriptor, BoundingBox, Coordinate, Direction, ItemStack, Size};

use super::{chest, FeatureGenerator};
use crate::context::BuildContext;
use crate::palette::{Slot, StyleTable};
use crate::primitives::{
    carve_doorway, carve_radial, carve_room, disc, extrude_corridor, pillar, region_beyond, room_doorway,
    room_origin_beyond, CorridorSpec, RadialProfile, ShellSlots, DOOR_HEIGHT,
};
use crate::result::{Room, RoomKind, StructureResult};

const CHAMBER_HEIGHT: i32 = 8;
const TREASURE_SIZE: Size = Size::new(7, 6, 7);
const SIDE_ROOM_SIZE: Size = Size::new(7, 5, 7);

/// Rotation search for the treasure ring, in degrees either side of the draw.
const ROTATION_LIMIT: i32 = 45;
const ROTATION_STEP: i32 = 5;

/// Music discs a treasure chest may hold.
const DISCS: &[&str] = &["otherside", "5", "13", "cat", "ward"];

/// Ancient city generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct AncientCityGenerator;

impl FeatureGenerator for AncientCityGenerator {
    #[allow(clippy::too_many_lines)]
    fn generate(&self, mut ctx: BuildContext<'_>) -> StructureResult {
        let tuning = &ctx.config().ancient_city;
        let style = ctx.palette("ancient_city");
        let origin = ctx.origin();
        let floor = origin.below(1);
        let radius = tuning.platform_radius;

        // =====================================================================
        // Platform and cavity
        // =====================================================================
        disc(&mut ctx, floor, radius, style, Slot::Foundation);
        let r2 = radius * radius;
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dz * dz <= r2 {
                    for h in 0..tuning.cavity_height {
                        ctx.clear(origin.offset(dx, h, dz));
                    }
                }
            }
        }

        // =====================================================================
        // Altar chamber and corridors
        // =====================================================================
        let cr = tuning.chamber_radius;
        carve_radial(&mut ctx, floor, cr, CHAMBER_HEIGHT, RadialProfile::Cylinder, style, ShellSlots::default());
        let chamber = ctx.add_room(Room::new(
            RoomKind::AltarChamber,
            floor.offset(-cr, 0, -cr),
            Size::new(2 * cr + 1, CHAMBER_HEIGHT, 2 * cr + 1),
        ));
        build_altar(&mut ctx, origin);

        let spec = CorridorSpec::new(style);
        let mut corridors = Vec::with_capacity(4);
        for direction in Direction::ALL {
            let door = origin.step(direction, cr);
            carve_doorway(&mut ctx, door, direction, DOOR_HEIGHT);
            ctx.attach_doorway(chamber, door);
            let end = door.step(direction, tuning.corridor_length - 1);
            carve_doorway(&mut ctx, end, direction, DOOR_HEIGHT);
            if extrude_corridor(&mut ctx, door, end, &spec).is_some() {
                corridors.push((door, direction));
            }
            if direction == Direction::South {
                ctx.set_entrance(end);
            }
        }

        // =====================================================================
        // Treasure rooms, then side rooms in what is left
        // =====================================================================
        let placed = place_treasure_rooms(&mut ctx, origin, tuning.treasure_radius, style);
        for (door, direction) in corridors {
            let wanted = ctx.rng.next_int(1, 2);
            let mut built = 0;
            for _ in 0..6 {
                if built == wanted {
                    break;
                }
                let offset = ctx.rng.next_int(4, tuning.corridor_length - 4);
                let side = if ctx.rng.chance(0.5) { direction.left() } else { direction.right() };
                let wall_door = door.step(direction, offset).step(side, 2);
                if ctx.is_protected(wall_door) || !ctx.is_free(&region_beyond(wall_door, side, SIDE_ROOM_SIZE)) {
                    continue;
                }
                side_room(&mut ctx, wall_door, side, style);
                built += 1;
            }
        }

        // =====================================================================
        // Sculk, columns, braziers
        // =====================================================================
        let patches = ctx.rng.next_int(tuning.sculk_patches_min, tuning.sculk_patches_max);
        for _ in 0..patches {
            if let Some(at) = random_platform_cell(&mut ctx, origin, radius - 3) {
                sculk_patch(&mut ctx, at.below(1), (origin, radius), style);
            }
        }
        let columns = ctx.rng.next_int(6, 10);
        scatter(&mut ctx, origin, radius - 2, columns, tuning.cavity_height, |ctx, base| {
            pillar(ctx, base, tuning.cavity_height, style, Slot::Pillar);
        });
        let braziers = ctx.rng.next_int(4, 6);
        scatter(&mut ctx, origin, radius - 2, braziers, 2, |ctx, base| {
            ctx.place(base, BlockDescriptor::new("soul_sand"));
            ctx.place(base.above(1), BlockDescriptor::new("soul_fire"));
        });

        tracing::debug!(%origin, treasure_rooms = placed, patches, "ancient city laid out");
        ctx.finish()
    }
}

/// Reinforced deepslate frame across the chamber center.
fn build_altar(ctx: &mut BuildContext<'_>, origin: Coordinate) {
    let frame = BlockDescriptor::new("reinforced_deepslate");
    for dx in -3..=3_i32 {
        for dy in 0..=4 {
            if dx.abs() == 3 || dy == 4 {
                ctx.place(origin.offset(dx, dy, 0), frame.clone());
            }
        }
    }
}

/// Rotates an equally spaced ring of treasure rooms until every room
/// clears the reserved regions, then builds it. Returns the room count.
#[allow(clippy::cast_possible_truncation)]
fn place_treasure_rooms(ctx: &mut BuildContext<'_>, origin: Coordinate, radius: i32, style: &StyleTable) -> usize {
    let count = ctx.rng.next_int(2, 3);
    let base = ctx.rng.range_f64(0.0, TAU);
    let ring = |rotation: f64| -> Vec<Coordinate> {
        (0..count)
            .map(|i| {
                let angle = base + rotation + TAU * f64::from(i) / f64::from(count);
                origin.offset(
                    (f64::from(radius) * angle.cos()).round() as i32,
                    0,
                    (f64::from(radius) * angle.sin()).round() as i32,
                )
            })
            .collect()
    };
    let room_box = |center: Coordinate| {
        BoundingBox::from_origin(
            center.offset(-TREASURE_SIZE.width / 2, -1, -TREASURE_SIZE.depth / 2),
            TREASURE_SIZE,
        )
    };

    let mut rotations = vec![0];
    for step in (ROTATION_STEP..=ROTATION_LIMIT).step_by(ROTATION_STEP.unsigned_abs() as usize) {
        rotations.push(step);
        rotations.push(-step);
    }
    let chosen = rotations.iter().find_map(|degrees| {
        let centers = ring(f64::from(*degrees).to_radians());
        centers
            .iter()
            .all(|c| ctx.is_free(&room_box(*c).expand(1)))
            .then_some(centers)
    });
    if let Some(centers) = chosen {
        for center in &centers {
            treasure_room(ctx, origin, room_box(*center).min, style);
        }
        return centers.len();
    }

    // No common rotation: each room searches on its own, seeing the ones
    // already built.
    tracing::trace!(%origin, "no clear rotation for treasure ring, placing rooms one by one");
    let mut placed = 0;
    for i in 0..ring(0.0).len() {
        let spot = rotations
            .iter()
            .map(|degrees| ring(f64::from(*degrees).to_radians())[i])
            .find(|c| ctx.is_free(&room_box(*c).expand(1)));
        if let Some(center) = spot {
            treasure_room(ctx, origin, room_box(center).min, style);
            placed += 1;
        }
    }
    placed
}

fn treasure_room(ctx: &mut BuildContext<'_>, city: Coordinate, room_origin: Coordinate, style: &StyleTable) {
    let room = carve_room(ctx, RoomKind::TreasureRoom, room_origin, TREASURE_SIZE, style);
    let Some(shell) = ctx.room(room).cloned() else {
        return;
    };
    let center = shell.center();
    let facing = Direction::dominant(city.x - center.x, city.z - center.z);
    let back = facing.opposite();
    room_doorway(ctx, room, facing, 0);

    let shards = u32::try_from(ctx.rng.next_int(1, 3)).unwrap_or(1);
    let disc = ctx.rng.pick(DISCS).copied().unwrap_or("otherside");
    let items = vec![
        ItemStack::new("echo_shard", shards),
        ItemStack::new("music_disc", 1).named(disc),
        ItemStack::new("enchanted_book", 1).named("swift_sneak"),
    ];
    let chest_at = shell.door_on(back, 0).step(facing, 1);
    ctx.place_loot(chest_at, BlockDescriptor::new("chest").facing(facing).items(items));

    for lateral in [-2, 2] {
        ctx.place(shell.door_on(back, lateral).step(facing, 1), BlockDescriptor::new("sculk_sensor"));
        ctx.place(
            shell.door_on(facing, lateral).step(back, 1),
            BlockDescriptor::new("sculk_shrieker").with("can_summon", true),
        );
    }
}

fn side_room(ctx: &mut BuildContext<'_>, door: Coordinate, side: Direction, style: &StyleTable) {
    let origin = room_origin_beyond(door, side, SIDE_ROOM_SIZE);
    let room = carve_room(ctx, RoomKind::SideRoom, origin, SIDE_ROOM_SIZE, style);
    carve_doorway(ctx, door, side.opposite(), DOOR_HEIGHT);
    ctx.attach_doorway(room, door);
    let Some(shell) = ctx.room(room).cloned() else {
        return;
    };
    let far = shell.door_on(side, 0).step(side.opposite(), 1);
    if ctx.rng.chance(0.5) {
        ctx.place_loot(far, chest(side.opposite(), "ancient_city"));
    }
    ctx.place_style(shell.door_on(side, 2).step(side.opposite(), 1), style, Slot::Light);
    ctx.place(shell.door_on(side, -2).step(side.opposite(), 1), BlockDescriptor::new("candle").with("lit", false));
}

/// Uniform walk-level cell inside a disc, or `None` after a few misses.
fn random_platform_cell(ctx: &mut BuildContext<'_>, origin: Coordinate, radius: i32) -> Option<Coordinate> {
    let radius = radius.max(1);
    for _ in 0..8 {
        let dx = ctx.rng.next_int(-radius, radius);
        let dz = ctx.rng.next_int(-radius, radius);
        if dx * dx + dz * dz <= radius * radius {
            return Some(origin.offset(dx, 0, dz));
        }
    }
    None
}

/// Soft-edged disc of sculk in the floor layer, cut off at the platform
/// edge given as `(origin, radius)`.
fn sculk_patch(ctx: &mut BuildContext<'_>, center: Coordinate, platform: (Coordinate, i32), style: &StyleTable) {
    let (platform_origin, platform_radius) = platform;
    let on_platform = |at: Coordinate| {
        let (dx, dz) = (at.x - platform_origin.x, at.z - platform_origin.z);
        dx * dx + dz * dz <= platform_radius * platform_radius
    };
    let radius = ctx.rng.next_int(2, 5);
    let reach = radius + 1;
    for dz in -reach..=reach {
        for dx in -reach..=reach {
            let at = center.offset(dx, 0, dz);
            if !on_platform(at) {
                continue;
            }
            let distance = at.horizontal_distance(center);
            if distance <= f64::from(radius - 1) {
                ctx.place_style(at, style, Slot::Detail);
            } else if distance <= f64::from(radius) + 0.5 && ctx.rng.chance(0.5) {
                ctx.place_style(at, style, Slot::Detail);
            }
        }
    }
    if ctx.rng.chance(0.2) {
        ctx.place(center, BlockDescriptor::new("sculk_catalyst"));
    }
}

/// Places `count` single-column features of `height` on free platform cells.
fn scatter(
    ctx: &mut BuildContext<'_>,
    origin: Coordinate,
    radius: i32,
    count: i32,
    height: i32,
    mut build: impl FnMut(&mut BuildContext<'_>, Coordinate),
) {
    let mut built = 0;
    for _ in 0..count * 4 {
        if built == count {
            break;
        }
        let Some(base) = random_platform_cell(ctx, origin, radius) else {
            continue;
        };
        let column = BoundingBox::new(base, base.above(height - 1));
        // Features never stand on protected cells.
        if (0..height).any(|h| ctx.is_protected(base.above(h))) || !ctx.is_free(&column.expand(1)) {
            continue;
        }
        build(ctx, base);
        ctx.reserve(column);
        built += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::testing::{contained, run};
    use crate::options::StructureOptions;

    #[test]
    fn test_treasure_rooms_hold_echo_shards() {
        for seed in [12345, 1, 2, 3] {
            let (result, canvas) =
                run(&AncientCityGenerator, "ancient_city", Coordinate::new(0, 25, 0), &StructureOptions::new(), seed);
            let rooms: Vec<_> = result.rooms_of(RoomKind::TreasureRoom).collect();
            assert!((2..=3).contains(&rooms.len()), "seed {seed}: {}", rooms.len());
            for room in rooms {
                let chest = result.loot_in(room).next().expect("treasure chest");
                let shards = chest.items.iter().find(|i| i.kind == "echo_shard").unwrap();
                assert!((1..=3).contains(&shards.count));
                assert!(chest.items.iter().any(|i| i.kind == "music_disc" && i.name.is_some()));
            }
            assert!(contained(&result, &canvas));
        }
    }

    #[test]
    fn test_four_capped_corridors() {
        let (result, _) =
            run(&AncientCityGenerator, "ancient_city", Coordinate::new(0, 25, 0), &StructureOptions::new(), 7);
        assert_eq!(result.corridors.len(), 4);
        let entrance = result.entrance.unwrap();
        let south = result.corridors.iter().find(|c| c.direction() == Some(Direction::South)).unwrap();
        assert_eq!(entrance, south.end);
        for corridor in &result.corridors {
            assert!(result.doorways.iter().any(|d| d.position == corridor.end));
        }
    }

    #[test]
    fn test_decoration_stays_on_the_platform() {
        let radius = crate::config::StructureConfig::default().ancient_city.platform_radius;
        let origin = Coordinate::new(0, 25, 0);
        for seed in 0..20 {
            let (result, canvas) =
                run(&AncientCityGenerator, "ancient_city", origin, &StructureOptions::new(), seed);
            for kind in ["sculk", "sculk_catalyst"] {
                for at in canvas.positions_of(kind) {
                    let (dx, dz) = (at.x - origin.x, at.z - origin.z);
                    assert!(dx * dx + dz * dz <= radius * radius, "seed {seed}: {kind} off the platform at {at}");
                }
            }
            for fire in canvas.positions_of("soul_fire") {
                let base = canvas.get(fire.below(1)).map(BlockDescriptor::kind);
                assert_eq!(base, Some("soul_sand"), "seed {seed}: loose fire at {fire}");
            }
            for doorway in &result.doorways {
                assert!(canvas.get(doorway.position).is_some_and(BlockDescriptor::is_passable));
            }
        }
    }

    #[test]
    fn test_sculk_and_sensors() {
        let (_, canvas) =
            run(&AncientCityGenerator, "ancient_city", Coordinate::new(0, 25, 0), &StructureOptions::new(), 9);
        assert!(canvas.count_kind("sculk") > 50);
        assert!(canvas.count_kind("sculk_sensor") >= 4);
        assert!(canvas.count_kind("sculk_shrieker") >= 4);
        assert!(canvas.count_kind("reinforced_deepslate") > 0);
    }

    #[test]
    fn test_rooms_do_not_overlap() {
        let (result, _) =
            run(&AncientCityGenerator, "ancient_city", Coordinate::new(0, 25, 0), &StructureOptions::new(), 21);
        for (i, a) in result.rooms.iter().enumerate() {
            for b in result.rooms.iter().skip(i + 1) {
                assert!(!a.bounds().intersects(&b.bounds()), "{:?} vs {:?}", a.kind, b.kind);
            }
        }
    }
}
