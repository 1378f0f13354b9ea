//! Fixed-size cell grid with bounds-checked access and region validation

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cell::Cell;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    #[error("position ({col}, {row}) is outside the {width}x{height} grid")]
    OutOfRange {
        col: i32,
        row: i32,
        width: u32,
        height: u32,
    },
}

/// A single grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridLocation {
    pub x: i32,
    pub y: i32,
}

impl GridLocation {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GridLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A rectangular region of grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl GridRect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// The 3x3 footprint a zone occupies around its center.
    pub fn zone_footprint(center: GridLocation) -> Self {
        Self::new(center.x - 1, center.y - 1, 3, 3)
    }

    /// Iterate the coordinates of the rectangle, column-major.
    pub fn cells(self) -> impl Iterator<Item = (i32, i32)> {
        (self.x..self.x + self.w)
            .flat_map(move |col| (self.y..self.y + self.h).map(move |row| (col, row)))
    }
}

impl fmt::Display for GridRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} at ({}, {})", self.w, self.h, self.x, self.y)
    }
}

/// Dense rectangular matrix of cells. Every position holds exactly one cell
/// value; cells are small Copy values so no per-position allocation exists.
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid with every position set to `fill`.
    pub fn filled(width: u32, height: u32, fill: Cell) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cell_at(&self, col: i32, row: i32) -> Result<Cell, GridError> {
        self.offset(col, row).map(|i| self.cells[i])
    }

    pub fn set_cell_at(&mut self, col: i32, row: i32, cell: Cell) -> Result<(), GridError> {
        let i = self.offset(col, row)?;
        self.cells[i] = cell;
        Ok(())
    }

    /// True iff the rectangle lies fully inside the grid. Zero or negative
    /// extents are invalid.
    pub fn valid_region(&self, rect: GridRect) -> bool {
        rect.w > 0
            && rect.h > 0
            && rect.x >= 0
            && rect.y >= 0
            && (rect.x as i64 + rect.w as i64) <= self.width as i64
            && (rect.y as i64 + rect.h as i64) <= self.height as i64
    }

    fn offset(&self, col: i32, row: i32) -> Result<usize, GridError> {
        if col < 0 || row < 0 || col >= self.width as i32 || row >= self.height as i32 {
            return Err(GridError::OutOfRange {
                col,
                row,
                width: self.width,
                height: self.height,
            });
        }
        Ok(row as usize * self.width as usize + col as usize)
    }
}
