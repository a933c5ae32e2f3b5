//! # Structure Result Model
//!
//! The record handed back to the caller after a generation: what was
//! built, where, and which rooms, corridors, doorways, spawns and loot
//! containers it contains. Together with the block writes this is the only
//! observable output of a generation.

use std::collections::BTreeMap;

use bastion_shared::{BoundingBox, Coordinate, Direction, ItemStack, Size, SpawnRequest};
use serde::{Deserialize, Serialize};

/// Kind of a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomKind {
    /// Where the structure is entered
    Entrance,
    /// Mineshaft junction the main corridor starts from
    Hub,
    /// Corridor crossing
    Intersection,
    /// Room around a mob spawner
    SpawnerRoom,
    /// Stronghold room with the staircase down
    StairsRoom,
    /// Bookshelf room
    Library,
    /// End portal room
    PortalRoom,
    /// Ancient city central chamber
    AltarChamber,
    /// Room attached to a corridor
    SideRoom,
    /// Room holding the best loot
    TreasureRoom,
    /// Ocean monument chamber with an elder guardian
    GuardianChamber,
    /// Temple main hall
    MainHall,
    /// Concealed trap room
    TrapRoom,
    /// Room with stairs to a lower level
    Stairwell,
    /// Dungeon monster room
    MonsterRoom,
    /// Broken ruin room
    Ruin,
    /// Village meeting point
    VillageCenter,
    /// Small dwelling
    House,
    /// Dwelling with several beds
    LargeHouse,
    /// Crop field with a composter
    Farm,
    /// Blacksmith
    Smithy,
    /// Village library
    VillageLibrary,
    /// Village temple
    Temple,
    /// Butcher shop
    ButcherShop,
    /// Fletcher house
    FletcherHouse,
}

impl RoomKind {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entrance => "entrance",
            Self::Hub => "hub",
            Self::Intersection => "intersection",
            Self::SpawnerRoom => "spawner_room",
            Self::StairsRoom => "stairs_room",
            Self::Library => "library",
            Self::PortalRoom => "portal_room",
            Self::AltarChamber => "altar_chamber",
            Self::SideRoom => "side_room",
            Self::TreasureRoom => "treasure_room",
            Self::GuardianChamber => "guardian_chamber",
            Self::MainHall => "main_hall",
            Self::TrapRoom => "trap_room",
            Self::Stairwell => "stairwell",
            Self::MonsterRoom => "monster_room",
            Self::Ruin => "ruin",
            Self::VillageCenter => "village_center",
            Self::House => "house",
            Self::LargeHouse => "large_house",
            Self::Farm => "farm",
            Self::Smithy => "smithy",
            Self::VillageLibrary => "village_library",
            Self::Temple => "temple",
            Self::ButcherShop => "butcher_shop",
            Self::FletcherHouse => "fletcher_house",
        }
    }
}

/// Village bookkeeping attached to a building.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VillageTags {
    /// Professions inhabitants of this building may take.
    pub professions: Vec<String>,
    /// Workstation block, if the building has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workstation: Option<Coordinate>,
    /// Bed positions (foot of the bed).
    pub beds: Vec<Coordinate>,
}

/// A room: a box whose outer layer is wall/floor/ceiling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// What the room is for.
    pub kind: RoomKind,
    /// Lowest corner, wall layer included. `origin.y` is the floor layer.
    pub origin: Coordinate,
    /// Outer extent.
    pub size: Size,
    /// Doorways cut into this room.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub doorways: Vec<Coordinate>,
    /// Village tags, for village buildings only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub village: Option<VillageTags>,
}

impl Room {
    /// Creates a room without doorways.
    #[must_use]
    pub fn new(kind: RoomKind, origin: Coordinate, size: Size) -> Self {
        Self {
            kind,
            origin,
            size,
            doorways: Vec::new(),
            village: None,
        }
    }

    /// Outer box.
    #[must_use]
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_origin(self.origin, self.size)
    }

    /// Lowest walkable layer.
    #[inline]
    #[must_use]
    pub const fn walk_y(&self) -> i32 {
        self.origin.y + 1
    }

    /// Center cell at walking height.
    #[must_use]
    pub const fn center(&self) -> Coordinate {
        Coordinate::new(
            self.origin.x + self.size.width / 2,
            self.walk_y(),
            self.origin.z + self.size.depth / 2,
        )
    }

    /// Wall cell at walking height on `side`, shifted `offset` cells along the wall.
    #[must_use]
    pub fn door_on(&self, side: Direction, offset: i32) -> Coordinate {
        let bounds = self.bounds();
        let center = self.center();
        match side {
            Direction::North => Coordinate::new(center.x + offset, center.y, bounds.min.z),
            Direction::South => Coordinate::new(center.x + offset, center.y, bounds.max.z),
            Direction::East => Coordinate::new(bounds.max.x, center.y, center.z + offset),
            Direction::West => Coordinate::new(bounds.min.x, center.y, center.z + offset),
        }
    }

    /// Returns true if `at` lies on one of the four side walls.
    #[must_use]
    pub fn on_side_wall(&self, at: Coordinate) -> bool {
        let b = self.bounds();
        b.contains(at) && (at.x == b.min.x || at.x == b.max.x || at.z == b.min.z || at.z == b.max.z)
    }

    /// Returns true if `at` lies strictly inside the walls.
    #[must_use]
    pub fn interior_contains(&self, at: Coordinate) -> bool {
        let b = self.bounds();
        at.x > b.min.x && at.x < b.max.x && at.y > b.min.y && at.y < b.max.y && at.z > b.min.z && at.z < b.max.z
    }
}

/// A straight or L-shaped passage. Direction is derived from the endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corridor {
    /// First walk-level cell.
    pub start: Coordinate,
    /// Last walk-level cell.
    pub end: Coordinate,
    /// Walkable width.
    pub width: i32,
    /// Corner cell of an L-shaped corridor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bend: Option<Coordinate>,
}

impl Corridor {
    /// Heading of the first leg.
    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        Direction::between(self.start, self.bend.unwrap_or(self.end))
    }

    /// Number of walk-level cells along the centre line.
    #[must_use]
    pub fn length(&self) -> i32 {
        let manhattan = |a: Coordinate, b: Coordinate| (a.x - b.x).abs() + (a.z - b.z).abs();
        match self.bend {
            Some(bend) => manhattan(self.start, bend) + manhattan(bend, self.end) + 1,
            None => manhattan(self.start, self.end) + 1,
        }
    }

    /// Centre-line cells from start to end.
    #[must_use]
    pub fn centre_line(&self) -> Vec<Coordinate> {
        let mut cells = Vec::new();
        let mut legs = vec![self.start];
        legs.extend(self.bend);
        legs.push(self.end);
        for pair in legs.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let Some(dir) = Direction::between(from, to) else {
                if cells.is_empty() {
                    cells.push(from);
                }
                continue;
            };
            let steps = (to.x - from.x).abs() + (to.z - from.z).abs();
            let skip = usize::from(!cells.is_empty());
            cells.extend((0..=steps).skip(skip).map(|i| from.step(dir, i)));
        }
        cells
    }
}

/// An opening two cells high, always air.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doorway {
    /// Floor-level cell of the opening.
    pub position: Coordinate,
    /// Direction one faces when walking out through it.
    pub facing: Direction,
}

/// A block that holds loot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootContainer {
    /// Where it is.
    pub position: Coordinate,
    /// Block type (`chest`, `barrel`, `chest_minecart`, ...).
    pub block: String,
    /// Loot-table id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// Literal item list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ItemStack>,
}

/// Everything a generation placed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureResult {
    /// Structure id.
    #[serde(rename = "type")]
    pub structure: String,
    /// Requested origin.
    pub position: Coordinate,
    /// Extent of `bounds`.
    pub size: Size,
    /// Box containing every written coordinate.
    pub bounds: BoundingBox,
    /// Where reachability starts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrance: Option<Coordinate>,
    /// Rooms in creation order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rooms: Vec<Room>,
    /// Corridors in creation order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub corridors: Vec<Corridor>,
    /// Every doorway carved.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub doorways: Vec<Doorway>,
    /// Spawn requests in issue order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spawns: Vec<SpawnRequest>,
    /// Spawn positions grouped by entity kind.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mob_spawns: BTreeMap<String, Vec<Coordinate>>,
    /// Loot containers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub loot_containers: Vec<LootContainer>,
}

impl StructureResult {
    /// Rooms of one kind.
    pub fn rooms_of(&self, kind: RoomKind) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(move |room| room.kind == kind)
    }

    /// Number of spawn requests for one entity kind.
    #[must_use]
    pub fn spawn_count(&self, kind: &str) -> usize {
        self.mob_spawns.get(kind).map_or(0, Vec::len)
    }

    /// Loot containers inside a room.
    pub fn loot_in<'r>(&'r self, room: &'r Room) -> impl Iterator<Item = &'r LootContainer> {
        let bounds = room.bounds();
        self.loot_containers
            .iter()
            .filter(move |loot| bounds.contains(loot.position))
    }
}
