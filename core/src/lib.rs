#![no_std]

extern crate alloc;

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use analysis::*;
pub use board::*;
pub use controller::*;
pub use error::*;
pub use generator::*;
pub use snapshot::*;
pub use solver::*;
pub use state::*;
pub use tile::*;
pub use types::*;

mod analysis;
mod board;
mod controller;
mod error;
mod generator;
mod snapshot;
mod solver;
mod state;
mod tile;
mod types;

/// Seed used when nothing else picks one.
pub const DEFAULT_SEED: u64 = 1337;

/// Parameters of a new game.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board size as `(height, width)`.
    pub size: Pos,
    /// Mines laid down by the generator before play starts.
    pub mines: CellCount,
    /// Hard cap on the total number of mines, including player placements.
    pub total_mines_target: Option<CellCount>,
    pub enemy_health: i32,
    pub damage_per_mine: i32,
    pub seed: u64,
}

impl GameConfig {
    pub fn new((height, width): Pos, mines: CellCount) -> Self {
        let height = height.clamp(1, Coord::MAX);
        let width = width.clamp(1, Coord::MAX);
        let mines = mines.min(mult(height, width));
        Self {
            size: (height, width),
            mines,
            ..Self::default()
        }
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn rules(&self) -> Rules {
        Rules {
            damage_per_mine: self.damage_per_mine,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(GameError::InvalidBoardShape);
        }
        if self.mines > self.total_cells() {
            return Err(GameError::TooManyMines);
        }
        if let Some(target) = self.total_mines_target {
            if target > self.total_cells() {
                return Err(GameError::TooManyMines);
            }
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: (16, 16),
            mines: 40,
            total_mines_target: None,
            enemy_health: 3,
            damage_per_mine: 1,
            seed: DEFAULT_SEED,
        }
    }
}

/// Scoring rules applied by the turn controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    /// Health the enemy loses for every mine it reveals.
    pub damage_per_mine: i32,
}

impl Default for Rules {
    fn default() -> Self {
        GameConfig::default().rules()
    }
}

/// Ground truth of where the mines are, independent of what has been revealed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn empty(size: Pos) -> Self {
        Self {
            mine_mask: Array2::default(size.to_nd_index()),
            mine_count: 0,
        }
    }

    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        // at most 255 * 255 cells
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        Self {
            mine_mask,
            mine_count,
        }
    }

    pub fn from_mine_coords(size: Pos, mine_coords: &[Pos]) -> Result<Self> {
        let mut layout = Self::empty(size);

        for &pos in mine_coords {
            let pos = layout.validate_coords(pos)?;
            layout.insert(pos);
        }

        Ok(layout)
    }

    pub fn validate_coords(&self, pos: Pos) -> Result<Pos> {
        if self.in_bounds(pos) {
            Ok(pos)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn in_bounds(&self, (row, col): Pos) -> bool {
        let (rows, cols) = self.size();
        row < rows && col < cols
    }

    pub fn size(&self) -> Pos {
        let (rows, cols) = self.mine_mask.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, pos: Pos) -> bool {
        self[pos]
    }

    /// Adds a mine, returning `false` when one was already there.
    pub(crate) fn insert(&mut self, pos: Pos) -> bool {
        let slot = &mut self.mine_mask[pos.to_nd_index()];
        if *slot {
            return false;
        }
        *slot = true;
        self.mine_count += 1;
        true
    }

    pub fn adjacent_mine_count(&self, pos: Pos) -> u8 {
        // never more than 8
        self.iter_neighbors(pos).filter(|&nb| self[nb]).count() as u8
    }

    /// Mine positions in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Pos> + '_ {
        iter_positions(self.size()).filter(|&pos| self[pos])
    }

    pub(crate) fn iter_neighbors(&self, pos: Pos) -> NeighborIter {
        self.mine_mask.iter_neighbors(pos)
    }
}

impl Index<Pos> for MineLayout {
    type Output = bool;

    fn index(&self, (row, col): Pos) -> &Self::Output {
        &self.mine_mask[(row as usize, col as usize)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn config_clamps_like_it_validates() {
        let config = GameConfig::new((0, 4), 10);

        assert_eq!(config.size, (1, 4));
        assert_eq!(config.mines, 4);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn config_rejects_oversized_target() {
        let config = GameConfig {
            total_mines_target: Some(17),
            ..GameConfig::new((4, 4), 2)
        };

        assert_eq!(config.validate(), Err(GameError::TooManyMines));
    }

    #[test]
    fn layout_counts_unique_mines() {
        let layout = MineLayout::from_mine_coords((3, 3), &[(0, 0), (2, 2), (0, 0)]).unwrap();

        assert_eq!(layout.mine_count(), 2);
        assert_eq!(layout.safe_cell_count(), 7);
        assert_eq!(layout.iter().collect::<Vec<_>>(), [(0, 0), (2, 2)]);
        assert_eq!(layout.adjacent_mine_count((1, 1)), 2);
    }

    #[test]
    fn layout_rejects_out_of_bounds() {
        assert_eq!(
            MineLayout::from_mine_coords((2, 2), &[(2, 0)]),
            Err(GameError::InvalidCoords)
        );
    }
}
