//! # Ocean Monument
//!
//! A flooded prismarine block on the sea floor: windowed walls, a domed
//! roof with corner spires and three guardian chambers stacked on
//! different tiers inside. Everything that is not wall is water.

use bastion_shared::{BoundingBox, Coordinate, Direction, Size, SpawnRequest};

use super::FeatureGenerator;
use crate::context::BuildContext;
use crate::palette::{Slot, StyleTable};
use crate::primitives::{carve_radial, carve_shell, pillar, RadialProfile, ShellSlots};
use crate::result::{Doorway, Room, RoomKind, StructureResult};

/// Outer height of one chamber tier: floor, two water layers, ceiling.
const TIER_HEIGHT: i32 = 4;
const CHAMBER_EDGE: i32 = 9;
const CHAMBERS: usize = 3;
const DOME_RADIUS: i32 = 6;
const DOME_HEIGHT: i32 = 6;
const SPIRE_HEIGHT: i32 = 4;

/// How far down the terrain probe looks for the sea floor.
const FLOOR_SEARCH: i32 = 64;

/// Ocean monument generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct OceanMonumentGenerator;

impl FeatureGenerator for OceanMonumentGenerator {
    fn generate(&self, mut ctx: BuildContext<'_>) -> StructureResult {
        let tuning = &ctx.config().monument;
        let style = ctx.palette("ocean_monument");
        let origin = ctx.origin();
        let floor_y = ctx.ground_below(origin, FLOOR_SEARCH).map_or(origin.y - 1, |ground| ground.y);
        let half = tuning.width / 2;
        let shell = BoundingBox::from_origin(
            Coordinate::new(origin.x - half, floor_y, origin.z - half),
            Size::new(tuning.width, tuning.height, tuning.width),
        );
        let center = Coordinate::new(origin.x, floor_y + 1, origin.z);

        carve_shell(
            &mut ctx,
            shell.min,
            shell.size(),
            style,
            ShellSlots {
                wall: Slot::Wall,
                floor: Slot::Foundation,
                ceiling: Slot::Roof,
            },
        );

        // =====================================================================
        // Chambers and the flooded interior
        // =====================================================================
        let chambers = plan_chambers(&mut ctx, center, half);
        flood(&mut ctx, shell, &chambers, style);
        for (room, _) in &chambers {
            let Some(chamber) = ctx.room(*room).cloned() else {
                continue;
            };
            ctx.spawn(SpawnRequest::new("elder_guardian", chamber.center()));
        }

        let entrance = Coordinate::new(origin.x, center.y, shell.max.z);
        for h in 0..2 {
            for at in [entrance.step(Direction::North, 1), entrance, entrance.step(Direction::South, 1)] {
                ctx.place_style(at.above(h), style, Slot::Fluid);
                ctx.protect(at.above(h));
            }
        }
        ctx.add_doorway(Doorway {
            position: entrance,
            facing: Direction::South,
        });
        ctx.set_entrance(entrance);

        decorate_walls(&mut ctx, shell, tuning.window_interval, style);
        build_roof(&mut ctx, shell, style);

        // =====================================================================
        // Guardians
        // =====================================================================
        let inner = shell.max.x - shell.min.x - 2;
        let mut spawned = 0;
        for _ in 0..tuning.guardians * 4 {
            if spawned == tuning.guardians {
                break;
            }
            let at = Coordinate::new(
                shell.min.x + 1 + ctx.rng.next_int(0, inner),
                ctx.rng.next_int(shell.min.y + 1, shell.max.y - 1),
                shell.min.z + 1 + ctx.rng.next_int(0, inner),
            );
            if chambers.iter().any(|(_, bounds)| bounds.contains(at)) {
                continue;
            }
            ctx.spawn(SpawnRequest::new("guardian", at));
            spawned += 1;
        }

        tracing::debug!(%origin, floor_y, guardians = spawned, "ocean monument raised");
        ctx.finish()
    }
}

/// Picks three quadrants and stacks one chamber per tier. Returns the
/// room index and outer box of each chamber.
fn plan_chambers(ctx: &mut BuildContext<'_>, center: Coordinate, half: i32) -> Vec<(usize, BoundingBox)> {
    let reach = (half - 1 - CHAMBER_EDGE / 2).max(0);
    let mut quadrants = [(-reach, -reach), (reach, -reach), (-reach, reach), (reach, reach)];
    ctx.rng.shuffle(&mut quadrants);

    let mut chambers = Vec::with_capacity(CHAMBERS);
    for (tier, (dx, dz)) in (0_i32..).zip(quadrants.into_iter().take(CHAMBERS)) {
        let origin = center.offset(dx - CHAMBER_EDGE / 2, tier * TIER_HEIGHT, dz - CHAMBER_EDGE / 2);
        let size = Size::new(CHAMBER_EDGE, TIER_HEIGHT, CHAMBER_EDGE);
        let room = ctx.add_room(Room::new(RoomKind::GuardianChamber, origin, size));
        let facing = Direction::dominant(-dx, -dz);
        if let Some(door) = ctx.room(room).map(|r| r.door_on(facing, 0)) {
            ctx.attach_doorway(room, door);
            ctx.add_doorway(Doorway { position: door, facing });
            ctx.protect(door);
            ctx.protect(door.above(1));
        }
        chambers.push((room, BoundingBox::from_origin(origin, size)));
    }
    chambers
}

/// Fills the shell interior: chamber shells from the wall slot, all the
/// rest (chamber doors included) from the fluid slot.
fn flood(ctx: &mut BuildContext<'_>, shell: BoundingBox, chambers: &[(usize, BoundingBox)], style: &StyleTable) {
    let shells: Vec<_> = chambers
        .iter()
        .filter_map(|(room, _)| ctx.room(*room).cloned())
        .collect();
    for y in (shell.min.y + 1)..shell.max.y {
        for z in (shell.min.z + 1)..shell.max.z {
            for x in (shell.min.x + 1)..shell.max.x {
                let at = Coordinate::new(x, y, z);
                let wall = !ctx.is_protected(at)
                    && shells.iter().any(|r| r.bounds().contains(at) && !r.interior_contains(at));
                let slot = if wall { Slot::Wall } else { Slot::Fluid };
                ctx.place_style(at, style, slot);
            }
        }
    }
}

/// Window blocks every `interval` cells on three rows of the outer walls.
fn decorate_walls(ctx: &mut BuildContext<'_>, shell: BoundingBox, interval: i32, style: &StyleTable) {
    let interval = interval.max(2);
    for y in ((shell.min.y + 3)..(shell.max.y - 1)).step_by(4) {
        for along in (shell.min.x + 1)..shell.max.x {
            if (along - shell.min.x) % interval != interval / 2 {
                continue;
            }
            for at in [
                Coordinate::new(along, y, shell.min.z),
                Coordinate::new(along, y, shell.max.z),
                Coordinate::new(shell.min.x, y, along - shell.min.x + shell.min.z),
                Coordinate::new(shell.max.x, y, along - shell.min.x + shell.min.z),
            ] {
                ctx.place_style(at, style, Slot::Window);
            }
        }
    }
}

/// Central flooded dome and four corner spires on the roof layer.
fn build_roof(ctx: &mut BuildContext<'_>, shell: BoundingBox, style: &StyleTable) {
    let roof = shell.max.y;
    let center = Coordinate::new((shell.min.x + shell.max.x) / 2, roof, (shell.min.z + shell.max.z) / 2);
    let dome = carve_radial(
        ctx,
        center,
        DOME_RADIUS,
        DOME_HEIGHT,
        RadialProfile::Dome,
        style,
        ShellSlots {
            wall: Slot::Roof,
            floor: Slot::Roof,
            ceiling: Slot::Roof,
        },
    );
    for y in (dome.min.y + 1)..=dome.max.y {
        for z in dome.min.z..=dome.max.z {
            for x in dome.min.x..=dome.max.x {
                let at = Coordinate::new(x, y, z);
                if ctx.is_open(at) {
                    ctx.place_style(at, style, Slot::Fluid);
                }
            }
        }
    }
    for (x, z) in [
        (shell.min.x, shell.min.z),
        (shell.max.x, shell.min.z),
        (shell.min.x, shell.max.z),
        (shell.max.x, shell.max.z),
    ] {
        let base = Coordinate::new(x, roof + 1, z);
        pillar(ctx, base, SPIRE_HEIGHT, style, Slot::Pillar);
        ctx.place_style(base.above(SPIRE_HEIGHT), style, Slot::Light);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::testing::{contained, run, run_on, FlatTerrain};
    use crate::options::StructureOptions;

    #[test]
    fn test_chambers_on_separate_tiers() {
        let (result, canvas) =
            run(&OceanMonumentGenerator, "ocean_monument", Coordinate::new(0, 40, 0), &StructureOptions::new(), 3);
        let chambers: Vec<_> = result.rooms_of(RoomKind::GuardianChamber).collect();
        assert_eq!(chambers.len(), 3);
        let mut tiers: Vec<_> = chambers.iter().map(|r| r.origin.y).collect();
        tiers.dedup();
        assert_eq!(tiers.len(), 3);
        assert_eq!(result.spawn_count("elder_guardian"), 3);
        assert_eq!(result.spawn_count("guardian"), 8);
        assert!(contained(&result, &canvas));
    }

    #[test]
    fn test_interior_is_flooded() {
        let origin = Coordinate::new(0, 40, 0);
        let (result, canvas) = run(&OceanMonumentGenerator, "ocean_monument", origin, &StructureOptions::new(), 5);
        assert!(canvas.count_kind("water") > 5000);
        assert_eq!(canvas.count_kind("air"), 0);
        let entrance = result.entrance.unwrap();
        assert_eq!(canvas.get(entrance).map(|b| b.kind()), Some("water"));
        for chamber in result.rooms_of(RoomKind::GuardianChamber) {
            assert_eq!(canvas.get(chamber.center()).map(|b| b.kind()), Some("water"));
            let door = chamber.doorways[0];
            assert_eq!(canvas.get(door).map(|b| b.kind()), Some("water"));
        }
    }

    #[test]
    fn test_sits_on_sea_floor() {
        let (result, _) = run_on(
            &OceanMonumentGenerator,
            "ocean_monument",
            Coordinate::new(0, 60, 0),
            &StructureOptions::new(),
            5,
            &FlatTerrain(30),
        );
        assert_eq!(result.bounds.min.y, 30);
    }
}
