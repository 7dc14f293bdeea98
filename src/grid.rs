use crate::levels::{Level, Tiles};
use crate::model::{Symbol, GRID_H, GRID_W};

/// Mutable copy of a level that the acid erodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TerrainGrid {
    tiles: Tiles,
    empty: Symbol,
}

impl TerrainGrid {
    /// An all-empty grid, used while the menu is showing.
    pub(crate) fn blank(empty: Symbol) -> Self {
        Self {
            tiles: [[empty; GRID_W]; GRID_H],
            empty,
        }
    }

    /// Copies the level's tiles; eroding the grid never touches the catalog.
    pub(crate) fn load(level: &Level, empty: Symbol) -> Self {
        Self {
            tiles: level.tiles,
            empty,
        }
    }

    pub(crate) fn height(&self) -> usize {
        GRID_H
    }

    pub(crate) fn get(&self, x: usize, y: usize) -> Symbol {
        assert!(x < GRID_W && y < GRID_H, "grid read out of range: ({x}, {y})");
        self.tiles[y][x]
    }

    pub(crate) fn set(&mut self, x: usize, y: usize, sym: Symbol) {
        assert!(x < GRID_W && y < GRID_H, "grid write out of range: ({x}, {y})");
        self.tiles[y][x] = sym;
    }

    pub(crate) fn is_destructible(&self, sym: Symbol) -> bool {
        sym != self.empty
    }

    /// Replaces the tile with the empty symbol.
    pub(crate) fn erode(&mut self, x: usize, y: usize) {
        self.set(x, y, self.empty);
    }

    pub(crate) fn tiles(&self) -> &Tiles {
        &self.tiles
    }
}
