//! Axial hex coordinates and the distance metric shared by every system.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Distance reported for cells that no search has reached.
pub const UNREACHABLE: u32 = u32::MAX;

/// Cell address on an axial hex grid.
///
/// Two integers identify every hex. The redundant cube form is available
/// through [`HexCoord::to_cube`] for computations that are simpler with three
/// axes.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct HexCoord {
    q: i32,
    r: i32,
}

impl HexCoord {
    /// Creates a new axial coordinate.
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Column-like axial component.
    #[must_use]
    pub const fn q(&self) -> i32 {
        self.q
    }

    /// Row-like axial component.
    #[must_use]
    pub const fn r(&self) -> i32 {
        self.r
    }

    /// Converts the coordinate into its cube representation.
    #[must_use]
    pub const fn to_cube(self) -> CubeCoord {
        CubeCoord::new(self.q, -self.q - self.r, self.r)
    }

    /// Number of single-hex steps separating `self` from `other`.
    #[must_use]
    pub fn distance(self, other: HexCoord) -> u32 {
        hex_distance(self, other)
    }

    /// Coordinate reached by taking one step in `direction`.
    #[must_use]
    pub fn step(self, direction: HexDirection) -> HexCoord {
        let (dq, dr) = direction.offset();
        HexCoord::new(self.q.wrapping_add(dq), self.r.wrapping_add(dr))
    }

    /// The six adjacent coordinates in [`HexDirection::ALL`] order.
    #[must_use]
    pub fn neighbors(self) -> [HexCoord; 6] {
        HexDirection::ALL.map(|direction| self.step(direction))
    }

    /// Direction leading from `self` to an adjacent `other`, if any.
    #[must_use]
    pub fn direction_to(self, other: HexCoord) -> Option<HexDirection> {
        HexDirection::ALL
            .into_iter()
            .find(|direction| self.step(*direction) == other)
    }
}

impl Add for HexCoord {
    type Output = HexCoord;

    fn add(self, rhs: HexCoord) -> HexCoord {
        HexCoord::new(self.q + rhs.q, self.r + rhs.r)
    }
}

impl Sub for HexCoord {
    type Output = HexCoord;

    fn sub(self, rhs: HexCoord) -> HexCoord {
        HexCoord::new(self.q - rhs.q, self.r - rhs.r)
    }
}

/// Cube form of an axial coordinate, maintaining `x + y + z == 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CubeCoord {
    x: i32,
    y: i32,
    z: i32,
}

impl CubeCoord {
    const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// First cube axis, equal to the axial `q`.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Second cube axis, derived as `-q - r`.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Third cube axis, equal to the axial `r`.
    #[must_use]
    pub const fn z(&self) -> i32 {
        self.z
    }

    /// Converts back into the axial representation.
    #[must_use]
    pub const fn to_axial(self) -> HexCoord {
        HexCoord::new(self.x, self.z)
    }

    /// Largest absolute component, which is the distance from the origin.
    #[must_use]
    pub fn max_abs(self) -> u32 {
        self.x
            .unsigned_abs()
            .max(self.y.unsigned_abs())
            .max(self.z.unsigned_abs())
    }

    /// Distance between two cube coordinates using the max-abs identity.
    #[must_use]
    pub fn distance(self, other: CubeCoord) -> u32 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        let dz = i64::from(self.z) - i64::from(other.z);
        let max = dx.abs().max(dy.abs()).max(dz.abs());
        u32::try_from(max).unwrap_or(UNREACHABLE)
    }
}

/// The six neighbour offsets of an axial hex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HexDirection {
    /// Offset `(-1, 0)`.
    West,
    /// Offset `(1, 0)`.
    East,
    /// Offset `(0, -1)`.
    NorthWest,
    /// Offset `(0, 1)`.
    SouthEast,
    /// Offset `(1, -1)`.
    NorthEast,
    /// Offset `(-1, 1)`.
    SouthWest,
}

impl HexDirection {
    /// Every direction, in the order searches expand neighbours.
    pub const ALL: [HexDirection; 6] = [
        HexDirection::West,
        HexDirection::East,
        HexDirection::NorthWest,
        HexDirection::SouthEast,
        HexDirection::NorthEast,
        HexDirection::SouthWest,
    ];

    /// Axial `(dq, dr)` offset of the direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::West => (-1, 0),
            Self::East => (1, 0),
            Self::NorthWest => (0, -1),
            Self::SouthEast => (0, 1),
            Self::NorthEast => (1, -1),
            Self::SouthWest => (-1, 1),
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::West => Self::East,
            Self::East => Self::West,
            Self::NorthWest => Self::SouthEast,
            Self::SouthEast => Self::NorthWest,
            Self::NorthEast => Self::SouthWest,
            Self::SouthWest => Self::NorthEast,
        }
    }
}

/// Minimum number of single-step moves between two axial coordinates.
///
/// Computed as `(|dq| + |dq + dr| + |dr|) / 2`, which always agrees with the
/// cube max-abs form.
#[must_use]
pub fn hex_distance(a: HexCoord, b: HexCoord) -> u32 {
    let dq = i64::from(a.q) - i64::from(b.q);
    let dr = i64::from(a.r) - i64::from(b.r);
    let doubled = dq.abs() + (dq + dr).abs() + dr.abs();
    u32::try_from(doubled / 2).unwrap_or(UNREACHABLE)
}

/// Distance from the grid origin `(0, 0)`.
#[must_use]
pub fn hex_distance_from_origin(a: HexCoord) -> u32 {
    hex_distance(HexCoord::default(), a)
}
