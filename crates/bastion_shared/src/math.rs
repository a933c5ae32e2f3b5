//! Integer voxel geometry shared between the server and structure hosts.
//!
//! Structures never address fractional positions, so everything here is
//! `i32` based. These are the canonical representations used on the wire.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Integer block position in the world.
#[repr(C)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
pub struct Coordinate {
    /// X component (east is positive)
    pub x: i32,
    /// Y component (up is positive)
    pub y: i32,
    /// Z component (south is positive)
    pub z: i32,
}

impl Coordinate {
    /// World origin
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    /// Creates a new coordinate
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns this coordinate shifted by the given deltas
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Coordinate `n` blocks above
    #[inline]
    #[must_use]
    pub const fn above(self, n: i32) -> Self {
        self.offset(0, n, 0)
    }

    /// Coordinate `n` blocks below
    #[inline]
    #[must_use]
    pub const fn below(self, n: i32) -> Self {
        self.offset(0, -n, 0)
    }

    /// Coordinate `n` blocks along a horizontal direction
    #[inline]
    #[must_use]
    pub const fn step(self, direction: Direction, n: i32) -> Self {
        let (dx, dz) = direction.delta();
        self.offset(dx * n, 0, dz * n)
    }

    /// Same column, different height
    #[inline]
    #[must_use]
    pub const fn with_y(self, y: i32) -> Self {
        Self::new(self.x, y, self.z)
    }

    /// Squared euclidean distance (avoids sqrt)
    #[must_use]
    pub const fn distance_squared(self, other: Self) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        let dz = (self.z - other.z) as i64;
        dx * dx + dy * dy + dz * dz
    }

    /// Squared distance ignoring height
    #[must_use]
    pub const fn horizontal_distance_squared(self, other: Self) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dz = (self.z - other.z) as i64;
        dx * dx + dz * dz
    }

    /// Horizontal euclidean distance
    #[must_use]
    pub fn horizontal_distance(self, other: Self) -> f64 {
        (self.horizontal_distance_squared(other) as f64).sqrt()
    }

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }

    /// The six face-adjacent neighbours
    #[must_use]
    pub const fn neighbors(self) -> [Self; 6] {
        [
            self.offset(1, 0, 0),
            self.offset(-1, 0, 0),
            self.offset(0, 1, 0),
            self.offset(0, -1, 0),
            self.offset(0, 0, 1),
            self.offset(0, 0, -1),
        ]
    }
}

impl std::ops::Add for Coordinate {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Coordinate {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Extent of a box in blocks
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct Size {
    /// Extent along X
    pub width: i32,
    /// Extent along Y
    pub height: i32,
    /// Extent along Z
    pub depth: i32,
}

impl Size {
    /// Creates a new size
    #[inline]
    #[must_use]
    pub const fn new(width: i32, height: i32, depth: i32) -> Self {
        Self { width, height, depth }
    }

    /// Number of cells covered
    #[must_use]
    pub const fn volume(self) -> i64 {
        self.width as i64 * self.height as i64 * self.depth as i64
    }
}

/// Axis-aligned box with inclusive corners.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Lowest corner (inclusive)
    pub min: Coordinate,
    /// Highest corner (inclusive)
    pub max: Coordinate,
}

impl BoundingBox {
    /// Box spanning two corners in any order
    #[must_use]
    pub fn new(a: Coordinate, b: Coordinate) -> Self {
        Self {
            min: Coordinate::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Coordinate::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Single-cell box
    #[must_use]
    pub const fn point(at: Coordinate) -> Self {
        Self { min: at, max: at }
    }

    /// Box starting at `origin` covering `size` cells.
    ///
    /// Sizes below one cell are treated as one cell.
    #[must_use]
    pub fn from_origin(origin: Coordinate, size: Size) -> Self {
        Self {
            min: origin,
            max: origin.offset(
                size.width.max(1) - 1,
                size.height.max(1) - 1,
                size.depth.max(1) - 1,
            ),
        }
    }

    /// Returns true if `at` lies inside (inclusive)
    #[inline]
    #[must_use]
    pub const fn contains(&self, at: Coordinate) -> bool {
        at.x >= self.min.x
            && at.x <= self.max.x
            && at.y >= self.min.y
            && at.y <= self.max.y
            && at.z >= self.min.z
            && at.z <= self.max.z
    }

    /// Grows the box to cover `at`
    pub fn include(&mut self, at: Coordinate) {
        self.min = Coordinate::new(self.min.x.min(at.x), self.min.y.min(at.y), self.min.z.min(at.z));
        self.max = Coordinate::new(self.max.x.max(at.x), self.max.y.max(at.y), self.max.z.max(at.z));
    }

    /// Smallest box covering both
    #[must_use]
    pub fn union(mut self, other: Self) -> Self {
        self.include(other.min);
        self.include(other.max);
        self
    }

    /// Returns true if the boxes share at least one cell
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Box grown by `n` cells on every side
    #[must_use]
    pub const fn expand(self, n: i32) -> Self {
        Self {
            min: self.min.offset(-n, -n, -n),
            max: self.max.offset(n, n, n),
        }
    }

    /// Extent of the box
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(
            self.max.x - self.min.x + 1,
            self.max.y - self.min.y + 1,
            self.max.z - self.min.z + 1,
        )
    }
}

/// Horizontal compass direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Towards -Z
    North,
    /// Towards +Z
    South,
    /// Towards +X
    East,
    /// Towards -X
    West,
}

impl Direction {
    /// All four directions in clockwise order starting north
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Unit step `(dx, dz)`
    #[inline]
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }

    /// Reverse direction
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// Direction after a quarter turn counter-clockwise (seen from above)
    #[must_use]
    pub const fn left(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
            Self::East => Self::North,
        }
    }

    /// Direction after a quarter turn clockwise (seen from above)
    #[must_use]
    pub const fn right(self) -> Self {
        self.left().opposite()
    }

    /// Returns true for east/west
    #[must_use]
    pub const fn is_x_axis(self) -> bool {
        matches!(self, Self::East | Self::West)
    }

    /// Facing name used in block metadata
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        }
    }

    /// Axis name used in block metadata (`x` or `z`)
    #[must_use]
    pub const fn axis(self) -> &'static str {
        if self.is_x_axis() { "x" } else { "z" }
    }

    /// Direction of a straight horizontal move, if `from` and `to` share a line.
    #[must_use]
    pub fn between(from: Coordinate, to: Coordinate) -> Option<Self> {
        match (to.x - from.x, to.z - from.z) {
            (0, 0) => None,
            (0, dz) if dz < 0 => Some(Self::North),
            (0, _) => Some(Self::South),
            (dx, 0) if dx > 0 => Some(Self::East),
            (_, 0) => Some(Self::West),
            _ => None,
        }
    }

    /// The direction whose step best matches the horizontal vector `(dx, dz)`
    #[must_use]
    pub fn dominant(dx: i32, dz: i32) -> Self {
        if dx.abs() >= dz.abs() {
            if dx >= 0 { Self::East } else { Self::West }
        } else if dz >= 0 {
            Self::South
        } else {
            Self::North
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_contains_and_union() {
        let a = BoundingBox::from_origin(Coordinate::new(0, 0, 0), Size::new(3, 2, 4));
        assert!(a.contains(Coordinate::new(2, 1, 3)));
        assert!(!a.contains(Coordinate::new(3, 1, 3)));

        let b = a.union(BoundingBox::point(Coordinate::new(-5, 10, 0)));
        assert_eq!(b.min, Coordinate::new(-5, 0, 0));
        assert_eq!(b.max, Coordinate::new(2, 10, 3));
        assert_eq!(b.size(), Size::new(8, 11, 4));
    }

    #[test]
    fn test_direction_turns() {
        for dir in Direction::ALL {
            assert_eq!(dir.left().right(), dir);
            assert_eq!(dir.opposite().opposite(), dir);
            let (dx, dz) = dir.delta();
            assert_eq!(Direction::dominant(dx, dz), dir);
        }
        assert_eq!(Direction::North.right(), Direction::East);
    }

    #[test]
    fn test_direction_between() {
        let a = Coordinate::new(0, 5, 0);
        assert_eq!(Direction::between(a, a.offset(0, 0, 7)), Some(Direction::South));
        assert_eq!(Direction::between(a, a.offset(-2, 0, 0)), Some(Direction::West));
        assert_eq!(Direction::between(a, a.offset(1, 0, 1)), None);
    }
}
