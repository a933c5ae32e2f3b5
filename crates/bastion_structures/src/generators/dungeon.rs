//! Monster room: a small cobblestone box with a spawner in the middle,
//! one or two chests against the walls and one or two exits.

use bastion_shared::{Coordinate, Direction, Size};

use super::{chest, spawner_block, FeatureGenerator};
use crate::context::BuildContext;
use crate::primitives::{carve_room, room_doorway};
use crate::result::{RoomKind, StructureResult};

/// Spawner entity weights.
const SPAWNER_MOBS: &[(&str, u32)] = &[("zombie", 50), ("skeleton", 25), ("spider", 25)];

/// Interior height of the room.
const INTERIOR_HEIGHT: i32 = 3;

/// Monster room generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct DungeonGenerator;

impl FeatureGenerator for DungeonGenerator {
    fn generate(&self, mut ctx: BuildContext<'_>) -> StructureResult {
        let style = ctx.palette("dungeon");
        let origin = ctx.origin();

        let width = ctx.rng.next_int(7, 9);
        let depth = ctx.rng.next_int(7, 9);
        let size = Size::new(width, INTERIOR_HEIGHT + 2, depth);
        let room_origin = origin.offset(-width / 2, -1, -depth / 2);
        let room = carve_room(&mut ctx, RoomKind::MonsterRoom, room_origin, size, style);

        // Exits first so chests never block them.
        let mut sides = Direction::ALL;
        ctx.rng.shuffle(&mut sides);
        let exits = ctx.rng.next_int(1, 2);
        for (i, side) in sides.iter().take(usize::try_from(exits).unwrap_or(1)).enumerate() {
            if let Some(doorway) = room_doorway(&mut ctx, room, *side, 0) {
                if i == 0 {
                    ctx.set_entrance(doorway.position);
                }
            }
        }

        let mob = ctx.rng.pick_weighted(SPAWNER_MOBS).copied().unwrap_or("zombie");
        let center = origin;
        ctx.place(center, spawner_block(mob));

        // Candidate chest cells hug the side walls at walking level.
        let inner_min = room_origin.offset(1, 1, 1);
        let inner_max = room_origin.offset(width - 2, 1, depth - 2);
        let mut spots: Vec<(Coordinate, Direction)> = Vec::new();
        for x in inner_min.x..=inner_max.x {
            spots.push((Coordinate::new(x, inner_min.y, inner_min.z), Direction::South));
            spots.push((Coordinate::new(x, inner_min.y, inner_max.z), Direction::North));
        }
        for z in (inner_min.z + 1)..inner_max.z {
            spots.push((Coordinate::new(inner_min.x, inner_min.y, z), Direction::East));
            spots.push((Coordinate::new(inner_max.x, inner_min.y, z), Direction::West));
        }
        spots.retain(|(at, _)| !ctx.is_protected(*at) && *at != center);
        ctx.rng.shuffle(&mut spots);

        let chests = ctx.rng.next_int(1, 2);
        let mut placed = 0;
        for (at, facing) in spots {
            if placed == chests {
                break;
            }
            if ctx.place_loot(at, chest(facing, "simple_dungeon")) {
                placed += 1;
            }
        }
        tracing::trace!(%origin, mob, chests = placed, "dungeon built");
        ctx.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::testing::{contained, run};
    use crate::options::StructureOptions;
    use bastion_shared::BlockDescriptor;

    #[test]
    fn test_dungeon_contents() {
        for seed in 0..20 {
            let origin = Coordinate::new(5, 20, 5);
            let (result, canvas) = run(&DungeonGenerator, "dungeon", origin, &StructureOptions::new(), seed);

            let spawner = canvas.get(origin).expect("spawner");
            assert_eq!(spawner.kind(), "spawner");
            let mob = spawner.get("entity").and_then(|v| v.as_str()).unwrap();
            assert!(["zombie", "skeleton", "spider"].contains(&mob));

            assert!((1..=2).contains(&result.loot_containers.len()));
            assert!(result.loot_containers.iter().all(|c| c.table.as_deref() == Some("simple_dungeon")));
            assert!((1..=2).contains(&result.doorways.len()));
            for doorway in &result.doorways {
                assert!(canvas.get(doorway.position).is_some_and(BlockDescriptor::is_air));
            }
            assert_eq!(result.rooms.len(), 1);
            assert!(contained(&result, &canvas));
        }
    }
}
