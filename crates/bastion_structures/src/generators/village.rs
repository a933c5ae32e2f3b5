//! # Village
//!
//! Ring layout around a central well plaza:
//!
//! - ring `i` sits at radius `i * ring_spacing` and holds up to `6 * i`
//!   buildings at equal angular steps plus jitter
//! - building types are drawn from a weighted table
//! - every door faces the plaza and gets an L-shaped road to it
//! - close neighbours are sometimes linked by a second road
//! - one villager per bed; beds after the first may go to children
//!
//! Walking level is the origin's y. The site is cleared two cells high
//! before anything is built.

use std::collections::HashSet;
use std::f64::consts::TAU;

use bastion_shared::{BlockDescriptor, BoundingBox, Coordinate, Direction, Size, SpawnRequest};

use super::decoration::build_well;
use super::FeatureGenerator;
use crate::context::BuildContext;
use crate::palette::{Biome, Slot, StyleTable};
use crate::primitives::{carve_room, room_doorway};
use crate::result::{Corridor, Room, RoomKind, StructureResult, VillageTags};

/// Plaza footprint around the well.
const PLAZA_SIZE: Size = Size::new(9, 4, 9);

/// Road width in cells.
const ROAD_WIDTH: i32 = 3;

/// Margin cleared beyond the outermost building.
const SITE_MARGIN: f64 = 3.0;

/// Placement retries per building before it is dropped.
const PLACEMENT_ATTEMPTS: i32 = 8;

/// Buildings needed before an iron golem patrols the plaza.
const GOLEM_THRESHOLD: usize = 4;

/// One building type.
#[derive(Debug)]
struct Blueprint {
    kind: RoomKind,
    weight: u32,
    size: Size,
    beds: i32,
    professions: &'static [&'static str],
    workstation: Option<&'static str>,
}

const BLUEPRINTS: &[Blueprint] = &[
    Blueprint {
        kind: RoomKind::House,
        weight: 30,
        size: Size::new(7, 6, 7),
        beds: 1,
        professions: &["farmer", "shepherd", "fisherman"],
        workstation: None,
    },
    Blueprint {
        kind: RoomKind::LargeHouse,
        weight: 15,
        size: Size::new(9, 7, 9),
        beds: 3,
        professions: &["farmer", "shepherd"],
        workstation: None,
    },
    Blueprint {
        kind: RoomKind::Farm,
        weight: 15,
        size: Size::new(9, 5, 9),
        beds: 0,
        professions: &["farmer"],
        workstation: Some("composter"),
    },
    Blueprint {
        kind: RoomKind::Smithy,
        weight: 10,
        size: Size::new(9, 6, 7),
        beds: 0,
        professions: &["armorer", "toolsmith", "weaponsmith"],
        workstation: Some("blast_furnace"),
    },
    Blueprint {
        kind: RoomKind::VillageLibrary,
        weight: 8,
        size: Size::new(9, 7, 9),
        beds: 1,
        professions: &["librarian"],
        workstation: Some("lectern"),
    },
    Blueprint {
        kind: RoomKind::Temple,
        weight: 7,
        size: Size::new(7, 8, 9),
        beds: 1,
        professions: &["cleric"],
        workstation: Some("brewing_stand"),
    },
    Blueprint {
        kind: RoomKind::ButcherShop,
        weight: 8,
        size: Size::new(9, 6, 7),
        beds: 1,
        professions: &["butcher"],
        workstation: Some("smoker"),
    },
    Blueprint {
        kind: RoomKind::FletcherHouse,
        weight: 7,
        size: Size::new(7, 6, 7),
        beds: 1,
        professions: &["fletcher"],
        workstation: Some("fletching_table"),
    },
];

/// A resolved building site.
#[derive(Clone, Copy, Debug)]
struct Lot {
    blueprint: &'static Blueprint,
    origin: Coordinate,
}

impl Lot {
    fn bounds(&self) -> BoundingBox {
        BoundingBox::from_origin(self.origin, self.blueprint.size)
    }
}

/// A building after construction.
#[derive(Clone, Debug)]
struct Building {
    room: usize,
    center: Coordinate,
    door: Coordinate,
}

/// Village generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct VillageGenerator;

impl FeatureGenerator for VillageGenerator {
    fn generate(&self, mut ctx: BuildContext<'_>) -> StructureResult {
        let tuning = &ctx.config().village;
        let options = ctx.options();
        let biome = Biome::parse(options.biome.as_deref().unwrap_or("plains"));
        let style = ctx.palettes().village(biome);
        let center = ctx.origin();
        let count = options
            .village_size
            .and_then(|n| i32::try_from(n.clamp(1, 40)).ok())
            .or_else(|| options.size.map(|s| s.select(5, 9, 13)))
            .unwrap_or(tuning.default_size);

        let plaza = BoundingBox::from_origin(center.offset(-PLAZA_SIZE.width / 2, -1, -PLAZA_SIZE.depth / 2), PLAZA_SIZE);
        let lots = plan_lots(&mut ctx, center, plaza, count - 1);

        // =====================================================================
        // Site and plaza
        // =====================================================================
        let reach = lots
            .iter()
            .flat_map(|lot| {
                let b = lot.bounds();
                [b.min, b.max, Coordinate::new(b.min.x, b.min.y, b.max.z), Coordinate::new(b.max.x, b.min.y, b.min.z)]
            })
            .map(|corner| corner.horizontal_distance(center))
            .fold(f64::from(PLAZA_SIZE.width), f64::max);
        clear_site(&mut ctx, center, reach + SITE_MARGIN);

        let plaza_room = ctx.add_room(Room::new(RoomKind::VillageCenter, plaza.min, PLAZA_SIZE));
        for z in plaza.min.z..=plaza.max.z {
            for x in plaza.min.x..=plaza.max.x {
                ctx.place_style(Coordinate::new(x, plaza.min.y, z), style, Slot::Path);
            }
        }
        let well = ctx.palette("well");
        build_well(&mut ctx, center, well);
        ctx.set_entrance(center.step(Direction::South, 3));

        // =====================================================================
        // Buildings
        // =====================================================================
        let mut buildings = Vec::with_capacity(lots.len());
        for lot in &lots {
            if let Some(building) = build(&mut ctx, lot, center, style) {
                buildings.push(building);
            }
        }

        // =====================================================================
        // Roads
        // =====================================================================
        let blocked: Vec<BoundingBox> = std::iter::once(plaza).chain(lots.iter().map(Lot::bounds)).collect();
        for building in &buildings {
            let side = Direction::dominant(building.center.x - center.x, building.center.z - center.z);
            let Some(anchor) = ctx.room(plaza_room).map(|room| room.door_on(side, 0)) else {
                continue;
            };
            lay_road(&mut ctx, building.door, anchor, style, &blocked);
        }

        let mut linked: HashSet<(usize, usize)> = HashSet::new();
        for (i, building) in buildings.iter().enumerate() {
            let closest = buildings
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i && !linked.contains(&(i.min(*j), i.max(*j))))
                .map(|(j, other)| (j, building.center.horizontal_distance(other.center)))
                .filter(|(_, d)| *d < tuning.link_distance)
                .min_by(|a, b| a.1.total_cmp(&b.1));
            if let Some((j, _)) = closest {
                if ctx.rng.chance(tuning.link_probability) {
                    linked.insert((i.min(j), i.max(j)));
                    lay_road(&mut ctx, building.door, buildings[j].door, style, &blocked);
                }
            }
        }

        // =====================================================================
        // Inhabitants
        // =====================================================================
        populate(&mut ctx, &buildings, tuning.child_probability);
        if buildings.len() >= GOLEM_THRESHOLD {
            ctx.spawn(SpawnRequest::new("iron_golem", center.offset(3, 0, 3)));
        }

        tracing::debug!(%center, ?biome, buildings = buildings.len(), roads = linked.len(), "village laid out");
        ctx.finish()
    }
}

/// Picks a blueprint and a clear lot for each ring slot.
#[allow(clippy::cast_possible_truncation)]
fn plan_lots(ctx: &mut BuildContext<'_>, center: Coordinate, plaza: BoundingBox, buildings: i32) -> Vec<Lot> {
    let tuning = &ctx.config().village;
    let weights: Vec<(usize, u32)> = BLUEPRINTS.iter().enumerate().map(|(i, b)| (i, b.weight)).collect();
    let jitter = tuning.angle_jitter;
    let mut claimed = vec![plaza.expand(1)];
    let mut lots = Vec::new();

    let mut remaining = buildings.max(0);
    let mut ring = 1;
    while remaining > 0 {
        let here = remaining.min(6 * ring);
        let radius = f64::from(ring * tuning.ring_spacing);
        let base = ctx.rng.range_f64(0.0, TAU);
        for slot in 0..here {
            let index = ctx.rng.pick_weighted(&weights).copied().unwrap_or(0);
            let blueprint = &BLUEPRINTS[index];
            let mut angle = base + TAU * f64::from(slot) / f64::from(here) + ctx.rng.range_f64(-jitter, jitter);
            let mut distance = radius;
            let mut found = None;
            for attempt in 0..PLACEMENT_ATTEMPTS {
                if attempt > 0 {
                    angle += ctx.rng.range_f64(-jitter, jitter);
                    distance = radius + f64::from(4 * (attempt / 2));
                }
                let bx = center.x + (distance * angle.cos()).round() as i32;
                let bz = center.z + (distance * angle.sin()).round() as i32;
                let origin = Coordinate::new(bx - blueprint.size.width / 2, center.y - 1, bz - blueprint.size.depth / 2);
                let region = BoundingBox::from_origin(origin, blueprint.size).expand(1);
                if !claimed.iter().any(|c| c.intersects(&region)) {
                    found = Some(origin);
                    claimed.push(region);
                    break;
                }
            }
            match found {
                Some(origin) => lots.push(Lot { blueprint, origin }),
                None => tracing::trace!(ring, slot, "village lot dropped"),
            }
        }
        remaining -= here;
        ring += 1;
    }
    lots
}

/// Clears a disc two cells high at walking level.
#[allow(clippy::cast_possible_truncation)]
fn clear_site(ctx: &mut BuildContext<'_>, center: Coordinate, radius: f64) {
    let r = radius.ceil() as i32;
    let r2 = radius * radius;
    for dz in -r..=r {
        for dx in -r..=r {
            if f64::from(dx * dx + dz * dz) > r2 {
                continue;
            }
            for h in 0..2 {
                ctx.clear(center.offset(dx, h, dz));
            }
        }
    }
}

/// Builds one house on its lot.
fn build(ctx: &mut BuildContext<'_>, lot: &Lot, village_center: Coordinate, style: &StyleTable) -> Option<Building> {
    let blueprint = lot.blueprint;
    let size = blueprint.size;
    let room = carve_room(ctx, blueprint.kind, lot.origin, size, style);
    let shell = ctx.room(room)?.clone();
    let center = shell.center();
    let facing = Direction::dominant(village_center.x - center.x, village_center.z - center.z);
    let back = facing.opposite();

    // Roof over the ceiling, windows on the three other walls.
    let bounds = shell.bounds();
    for z in bounds.min.z..=bounds.max.z {
        for x in bounds.min.x..=bounds.max.x {
            ctx.place_style(Coordinate::new(x, bounds.max.y + 1, z), style, Slot::Roof);
        }
    }
    let door = room_doorway(ctx, room, facing, 0)?;
    for side in Direction::ALL {
        if side != facing {
            ctx.place_style(shell.door_on(side, 0).above(1), style, Slot::Window);
        }
    }

    if blueprint.kind == RoomKind::Farm {
        plant_crops(ctx, &shell);
    }

    let mut beds = Vec::new();
    for k in 0..blueprint.beds {
        let offset = 2 * k - (blueprint.beds - 1);
        let at = shell.door_on(back, offset).step(facing, 1);
        let bed = ctx.pick(style, Slot::Detail).facing(facing).with("part", "foot");
        if ctx.place(at, bed) {
            beds.push(at);
        }
    }

    let workstation = blueprint.workstation.and_then(|kind| {
        let side = facing.left();
        let at = shell.door_on(side, 0).step(side.opposite(), 1);
        ctx.place(at, BlockDescriptor::new(kind).facing(side.opposite()))
            .then_some(at)
    });

    let lamp = shell.door_on(facing, 2).step(back, 1).above(1);
    ctx.place_style(lamp, style, Slot::Light);

    if let Some(record) = ctx.room_mut(room) {
        record.village = Some(VillageTags {
            professions: blueprint.professions.iter().map(ToString::to_string).collect(),
            workstation,
            beds,
        });
    }
    Some(Building {
        room,
        center,
        door: door.position,
    })
}

/// Farmland with a water channel down the middle and wheat on top.
fn plant_crops(ctx: &mut BuildContext<'_>, shell: &Room) {
    let bounds = shell.bounds();
    let center = shell.center();
    for z in (bounds.min.z + 1)..bounds.max.z {
        for x in (bounds.min.x + 1)..bounds.max.x {
            let ground = Coordinate::new(x, bounds.min.y, z);
            if x == center.x {
                ctx.place(ground, BlockDescriptor::new("water"));
            } else {
                ctx.place(ground, BlockDescriptor::new("farmland"));
                ctx.place(ground.above(1), BlockDescriptor::new("wheat").with("age", 7_i32));
            }
        }
    }
}

/// Three-wide L-shaped path on the ground layer, recorded as a corridor.
fn lay_road(ctx: &mut BuildContext<'_>, from: Coordinate, to: Coordinate, style: &StyleTable, blocked: &[BoundingBox]) {
    let bend = Coordinate::new(to.x, from.y, from.z);
    let road = Corridor {
        start: from,
        end: to,
        width: ROAD_WIDTH,
        bend: (from.x != to.x && from.z != to.z).then_some(bend),
    };
    let half = ROAD_WIDTH / 2;
    for cell in road.centre_line() {
        for dz in -half..=half {
            for dx in -half..=half {
                let at = cell.offset(dx, -1, dz);
                if blocked.iter().any(|b| b.contains(at)) {
                    continue;
                }
                ctx.place_style(at, style, Slot::Path);
            }
        }
    }
    ctx.add_corridor(road);
}

/// One villager per bed. The first bed of a building always goes to an
/// adult; later beds go to children with `child_probability`.
fn populate(ctx: &mut BuildContext<'_>, buildings: &[Building], child_probability: f64) {
    for building in buildings {
        let Some(tags) = ctx.room(building.room).and_then(|room| room.village.clone()) else {
            continue;
        };
        for (k, bed) in tags.beds.iter().enumerate() {
            let child = k > 0 && ctx.rng.chance(child_probability);
            let profession = if child {
                "none".to_owned()
            } else {
                ctx.rng.pick(&tags.professions).cloned().unwrap_or_else(|| "none".to_owned())
            };
            let mut request = SpawnRequest::new("villager", building.center)
                .with("profession", profession)
                .with("baby", child)
                .with("home", bed.to_string());
            if let Some(workstation) = tags.workstation {
                request = request.with("workstation", workstation.to_string());
            }
            ctx.spawn(request);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::testing::{contained, run};
    use crate::options::StructureOptions;

    fn beds(result: &StructureResult) -> usize {
        result
            .rooms
            .iter()
            .filter_map(|room| room.village.as_ref())
            .map(|tags| tags.beds.len())
            .sum()
    }

    #[test]
    fn test_default_size_is_center_plus_four() {
        let options = StructureOptions::new().with_biome("plains");
        let (result, canvas) = run(&VillageGenerator, "village", Coordinate::new(0, 64, 0), &options, 7);
        assert_eq!(result.rooms_of(RoomKind::VillageCenter).count(), 1);
        assert_eq!(result.rooms.len(), 5);
        assert!(contained(&result, &canvas));
    }

    #[test]
    fn test_doors_face_the_center() {
        let center = Coordinate::new(20, 64, -20);
        let (result, _) = run(&VillageGenerator, "village", center, &StructureOptions::new().with_village_size(9), 3);
        for room in result.rooms.iter().filter(|r| r.kind != RoomKind::VillageCenter) {
            let facing = Direction::dominant(center.x - room.center().x, center.z - room.center().z);
            assert_eq!(room.doorways.len(), 1);
            assert_eq!(room.doorways[0], room.door_on(facing, 0));
        }
    }

    #[test]
    fn test_villagers_never_outnumber_beds() {
        for seed in 0..15 {
            let options = StructureOptions::new().with_village_size(13);
            let (result, _) = run(&VillageGenerator, "village", Coordinate::new(0, 64, 0), &options, seed);
            assert_eq!(result.spawn_count("villager"), beds(&result));
        }
    }

    #[test]
    fn test_first_occupant_is_adult() {
        let options = StructureOptions::new().with_village_size(13);
        let (result, _) = run(&VillageGenerator, "village", Coordinate::new(0, 64, 0), &options, 11);
        for room in result.rooms.iter().filter(|r| r.village.as_ref().is_some_and(|t| !t.beds.is_empty())) {
            let first = result
                .spawns
                .iter()
                .find(|s| s.kind == "villager" && s.position == room.center())
                .unwrap();
            assert_eq!(first.options.get("baby").and_then(|v| v.as_bool()), Some(false));
        }
    }

    #[test]
    fn test_every_building_has_a_road_to_the_plaza() {
        let (result, canvas) = run(&VillageGenerator, "village", Coordinate::new(0, 64, 0), &StructureOptions::new(), 5);
        let buildings = result.rooms.len() - 1;
        assert!(result.corridors.len() >= buildings);
        assert!(canvas.count_kind("dirt_path") > 0);
    }

    #[test]
    fn test_biome_palette() {
        let options = StructureOptions::new().with_biome("desert");
        let (_, canvas) = run(&VillageGenerator, "village", Coordinate::new(0, 64, 0), &options, 7);
        assert!(canvas.count_kind("sandstone") > 0);
        assert_eq!(canvas.count_kind("oak_planks"), 0);
    }
}
