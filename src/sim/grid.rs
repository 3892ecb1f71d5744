//! Rectangular tile grid and cell coordinates
//!
//! Invariants the generator maintains: exactly one `start` tile at `(0, 0)`
//! and exactly one `end` tile at `(0, cols - 1)`; kinds never change after
//! generation, only rotations.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use super::tile::{Dir, Tile, TileKind};

/// A cell coordinate, row-major from the top-left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub fn new(row: usize, col: usize) -> CellPos {
        CellPos { row, col }
    }

    /// Direction from `self` to `other`, if they are orthogonal neighbors
    pub fn dir_toward(self, other: CellPos) -> Option<Dir> {
        Dir::ALL.into_iter().find(|d| {
            let (dr, dc) = d.delta();
            self.row.checked_add_signed(dr) == Some(other.row)
                && self.col.checked_add_signed(dc) == Some(other.col)
        })
    }
}

/// A `rows x cols` board of tiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Tile>,
}

impl Grid {
    /// Grid with every cell set to `fill`
    pub fn filled(rows: usize, cols: usize, fill: Tile) -> Grid {
        Grid {
            rows,
            cols,
            cells: vec![fill; rows * cols],
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn in_bounds(&self, pos: CellPos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    #[inline]
    fn slot(&self, pos: CellPos) -> usize {
        pos.row * self.cols + pos.col
    }

    /// One step from `pos` toward `dir`, if still on the board
    pub fn neighbor(&self, pos: CellPos, dir: Dir) -> Option<CellPos> {
        let (dr, dc) = dir.delta();
        let row = pos.row.checked_add_signed(dr)?;
        let col = pos.col.checked_add_signed(dc)?;
        let next = CellPos::new(row, col);
        self.in_bounds(next).then_some(next)
    }

    /// First cell of the given kind, scanning row-major
    pub fn find(&self, kind: TileKind) -> Option<CellPos> {
        self.positions().find(|&p| self[p].kind == kind)
    }

    /// All cell coordinates, row-major
    pub fn positions(&self) -> impl Iterator<Item = CellPos> + use<> {
        let cols = self.cols;
        (0..self.rows * self.cols).map(move |i| CellPos::new(i / cols, i % cols))
    }
}

impl Index<CellPos> for Grid {
    type Output = Tile;

    #[inline]
    fn index(&self, pos: CellPos) -> &Tile {
        &self.cells[self.slot(pos)]
    }
}

impl IndexMut<CellPos> for Grid {
    #[inline]
    fn index_mut(&mut self, pos: CellPos) -> &mut Tile {
        let slot = self.slot(pos);
        &mut self.cells[slot]
    }
}
