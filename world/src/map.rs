//! Terrain grid the battle takes place on.

use std::ops::{Index, IndexMut};

use hexmage_core::{HexCoord, HexType, Matrix};

use crate::WorldError;

/// Square grid of terrain cells sized at construction.
///
/// Every coordinate with both components in `[0, size)` is valid. The map
/// never grows or shrinks; only the terrain stored in its cells changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Map {
    size: usize,
    hexes: Matrix<HexType>,
}

impl Map {
    /// Creates a map whose cells are all [`HexType::Empty`].
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            hexes: Matrix::new(size, size),
        }
    }

    /// Edge length of the map in cells.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Read-only access to the underlying terrain matrix.
    #[must_use]
    pub fn hexes(&self) -> &Matrix<HexType> {
        &self.hexes
    }

    /// Reports whether `coord` lies on the map.
    #[must_use]
    pub fn is_valid(&self, coord: HexCoord) -> bool {
        self.hexes.contains(coord)
    }

    /// Terrain at `coord`, or `None` off the map.
    #[must_use]
    pub fn get(&self, coord: HexCoord) -> Option<HexType> {
        self.hexes.get(coord).copied()
    }

    /// Reports whether a mob may stand on `coord`.
    #[must_use]
    pub fn is_passable(&self, coord: HexCoord) -> bool {
        matches!(self.get(coord), Some(HexType::Empty | HexType::Player))
    }

    /// Places a wall on `coord`.
    pub fn set_wall(&mut self, coord: HexCoord) -> Result<(), WorldError> {
        self.set(coord, HexType::Wall)
    }

    /// Resets `coord` to open ground.
    pub fn clear(&mut self, coord: HexCoord) -> Result<(), WorldError> {
        self.set(coord, HexType::Empty)
    }

    /// Coordinates of every wall in row-major order.
    pub fn walls(&self) -> impl Iterator<Item = HexCoord> + '_ {
        self.hexes
            .iter_coords()
            .filter(|(_, hex)| **hex == HexType::Wall)
            .map(|(coord, _)| coord)
    }

    fn set(&mut self, coord: HexCoord, hex: HexType) -> Result<(), WorldError> {
        let size = self.size;
        let cell = self
            .hexes
            .get_mut(coord)
            .ok_or(WorldError::OutOfBounds { coord, size })?;
        *cell = hex;
        Ok(())
    }
}

impl Index<HexCoord> for Map {
    type Output = HexType;

    fn index(&self, coord: HexCoord) -> &HexType {
        &self.hexes[coord]
    }
}

impl IndexMut<HexCoord> for Map {
    fn index_mut(&mut self, coord: HexCoord) -> &mut HexType {
        &mut self.hexes[coord]
    }
}
