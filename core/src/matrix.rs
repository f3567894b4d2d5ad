//! Dense fixed-extent storage addressed by row/column or hex coordinate.

use std::ops::{Index, IndexMut};

use crate::hex::HexCoord;

/// Row-major grid of cells with a size fixed at construction.
///
/// Coordinates map `q` to the row and `r` to the column. Indexing outside the
/// extent is a programming error and panics; [`Matrix::get`] offers the
/// checked alternative.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matrix<T> {
    rows: usize,
    columns: usize,
    cells: Vec<T>,
}

impl<T: Clone + Default> Matrix<T> {
    /// Creates a matrix whose cells hold `T::default()`.
    #[must_use]
    pub fn new(rows: usize, columns: usize) -> Self {
        Self::filled(rows, columns, T::default())
    }
}

impl<T: Clone> Matrix<T> {
    /// Creates a matrix with every cell set to `value`.
    #[must_use]
    pub fn filled(rows: usize, columns: usize, value: T) -> Self {
        let Some(len) = rows.checked_mul(columns) else {
            panic!("matrix extent {rows}x{columns} overflows usize");
        };
        Self {
            rows,
            columns,
            cells: vec![value; len],
        }
    }

    /// Overwrites every cell with `value`.
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }
}

impl<T> Matrix<T> {
    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the matrix has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reports whether `coord` addresses a cell inside the matrix.
    #[must_use]
    pub fn contains(&self, coord: HexCoord) -> bool {
        self.coord_offset(coord).is_some()
    }

    /// Cell at `coord`, or `None` when it lies outside the matrix.
    #[must_use]
    pub fn get(&self, coord: HexCoord) -> Option<&T> {
        self.coord_offset(coord).map(|offset| &self.cells[offset])
    }

    /// Mutable cell at `coord`, or `None` when it lies outside the matrix.
    #[must_use]
    pub fn get_mut(&mut self, coord: HexCoord) -> Option<&mut T> {
        self.coord_offset(coord).map(|offset| &mut self.cells[offset])
    }

    /// Iterator over the cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.cells.iter()
    }

    /// Iterator over `(coordinate, cell)` pairs in row-major order.
    pub fn iter_coords(&self) -> impl Iterator<Item = (HexCoord, &T)> {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(offset, cell)| {
            let q = i32::try_from(offset / columns).unwrap_or(i32::MAX);
            let r = i32::try_from(offset % columns).unwrap_or(i32::MAX);
            (HexCoord::new(q, r), cell)
        })
    }

    fn offset(&self, row: usize, column: usize) -> Option<usize> {
        if row < self.rows && column < self.columns {
            Some(row * self.columns + column)
        } else {
            None
        }
    }

    fn coord_offset(&self, coord: HexCoord) -> Option<usize> {
        let row = usize::try_from(coord.q()).ok()?;
        let column = usize::try_from(coord.r()).ok()?;
        self.offset(row, column)
    }

    fn expect_offset(&self, row: usize, column: usize) -> usize {
        match self.offset(row, column) {
            Some(offset) => offset,
            None => panic!(
                "matrix index ({row}, {column}) out of bounds for {}x{} matrix",
                self.rows, self.columns
            ),
        }
    }

    fn expect_coord_offset(&self, coord: HexCoord) -> usize {
        match self.coord_offset(coord) {
            Some(offset) => offset,
            None => panic!(
                "hex coordinate ({}, {}) out of bounds for {}x{} matrix",
                coord.q(),
                coord.r(),
                self.rows,
                self.columns
            ),
        }
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (row, column): (usize, usize)) -> &T {
        &self.cells[self.expect_offset(row, column)]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (row, column): (usize, usize)) -> &mut T {
        let offset = self.expect_offset(row, column);
        &mut self.cells[offset]
    }
}

impl<T> Index<HexCoord> for Matrix<T> {
    type Output = T;

    fn index(&self, coord: HexCoord) -> &T {
        &self.cells[self.expect_coord_offset(coord)]
    }
}

impl<T> IndexMut<HexCoord> for Matrix<T> {
    fn index_mut(&mut self, coord: HexCoord) -> &mut T {
        let offset = self.expect_coord_offset(coord);
        &mut self.cells[offset]
    }
}
