use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest x or y a world cell can have
pub const MAX_COORDINATE: i32 = 16383;
/// Highest plane index
pub const MAX_PLANE: i32 = 3;

/// A discrete world coordinate. Planes are elevation levels; plain adjacency never crosses them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub plane: i32,
}

/// Cardinal directions in the order the search engine expands them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Grid offset of one step in this direction (north is +y)
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

impl Cell {
    pub const fn new(x: i32, y: i32, plane: i32) -> Self {
        Self { x, y, plane }
    }

    /// Neighbouring cell on the same plane
    pub fn step(self, direction: Direction) -> Cell {
        let (dx, dy) = direction.offset();
        Cell::new(self.x.saturating_add(dx), self.y.saturating_add(dy), self.plane)
    }

    /// Whether the cell lies inside the addressable world (the bounds collision records allow)
    pub fn in_world(self) -> bool {
        (0..=MAX_COORDINATE).contains(&self.x)
            && (0..=MAX_COORDINATE).contains(&self.y)
            && (0..=MAX_PLANE).contains(&self.plane)
    }

    pub fn same_plane(self, other: Cell) -> bool {
        self.plane == other.plane
    }

    /// Chebyshev (king-move) distance, ignoring planes
    pub fn distance(self, other: Cell) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Chebyshev distance, or `None` when the cells are on different planes
    pub fn planar_distance(self, other: Cell) -> Option<i32> {
        self.same_plane(other).then(|| self.distance(other))
    }

    pub fn manhattan_distance(self, other: Cell) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Same plane and within `radius` tiles (inclusive)
    pub fn is_within(self, other: Cell, radius: i32) -> bool {
        self.planar_distance(other)
            .is_some_and(|distance| distance <= radius)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.plane)
    }
}

impl From<(i32, i32, i32)> for Cell {
    fn from((x, y, plane): (i32, i32, i32)) -> Self {
        Cell::new(x, y, plane)
    }
}

/// Axis-aligned rectangle of cells on one plane, built from two opposite corners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
    pub plane: i32,
}

impl Area {
    /// Corners may be given in any order; the plane of `a` is used
    pub fn new(a: Cell, b: Cell) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
            plane: a.plane,
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.plane == self.plane
            && (self.min_x..=self.max_x).contains(&cell.x)
            && (self.min_y..=self.max_y).contains(&cell.y)
    }

    pub fn center(&self) -> Cell {
        Cell::new(
            (self.min_x + self.max_x) / 2,
            (self.min_y + self.max_y) / 2,
            self.plane,
        )
    }
}
