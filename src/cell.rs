//! Grid cell variants and their capabilities
//!
//! Stateless terrain (dirt, water, woods) is a plain tagged variant shared
//! by value across the grid; equality is by tag. A residential cell carries
//! a handle into the zone ledger, so all nine cells of a zone compare equal
//! and resolve to the same record.

use serde::{Deserialize, Serialize};

use crate::zone::ZoneId;

/// One position's worth of grid content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Dirt,
    Water,
    Woods,
    Residential(ZoneId),
}

/// Coarse classification of a cell, for display layers and snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellClass {
    Dirt,
    Water,
    Woods,
    Residential,
}

impl Cell {
    pub fn class(self) -> CellClass {
        match self {
            Cell::Dirt => CellClass::Dirt,
            Cell::Water => CellClass::Water,
            Cell::Woods => CellClass::Woods,
            Cell::Residential(_) => CellClass::Residential,
        }
    }

    pub fn is_tree(self) -> bool {
        matches!(self, Cell::Woods)
    }

    /// Can a zone footprint overwrite this cell?
    pub fn is_buildable(self) -> bool {
        matches!(self, Cell::Dirt | Cell::Woods)
    }

    /// Can this cell be cleared back to dirt?
    pub fn is_bulldozeable(self) -> bool {
        !matches!(self, Cell::Water)
    }

    /// Zone handle, if this cell belongs to one.
    pub fn zone(self) -> Option<ZoneId> {
        match self {
            Cell::Residential(id) => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terrain_capabilities() {
        assert!(Cell::Dirt.is_buildable());
        assert!(Cell::Dirt.is_bulldozeable());
        assert!(!Cell::Dirt.is_tree());

        assert!(!Cell::Water.is_buildable());
        assert!(!Cell::Water.is_bulldozeable());

        assert!(Cell::Woods.is_buildable());
        assert!(Cell::Woods.is_bulldozeable());
        assert!(Cell::Woods.is_tree());
    }

    #[test]
    fn residential_cells_compare_by_handle() {
        let a = Cell::Residential(ZoneId::new(1));
        let b = Cell::Residential(ZoneId::new(1));
        let c = Cell::Residential(ZoneId::new(2));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(!a.is_buildable());
        assert!(a.is_bulldozeable());
        assert_eq!(a.class(), CellClass::Residential);
    }
}
