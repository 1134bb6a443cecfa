use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Neighborhood summary of one revealed clue that still touches hidden tiles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontierClue {
    pub pos: Pos,
    pub number: u8,
    pub hidden: u8,
    pub flagged: u8,
    pub revealed_mines: u8,
}

/// What a single clue says about its hidden neighbors.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ClueReading {
    /// More mines accounted for than the clue allows, or more left than tiles to hold them.
    Inconsistent,
    AllSafe,
    AllMines,
    /// Local chance that any one hidden neighbor is a mine.
    Risk(f64),
}

impl FrontierClue {
    /// Mines still unaccounted for around the clue, `None` when the clue contradicts the board.
    ///
    /// Clues can go stale in both directions since mines are laid after tiles are opened.
    pub fn remaining(&self) -> Option<u8> {
        let known = self.flagged + self.revealed_mines;
        self.number
            .checked_sub(known)
            .filter(|&remaining| remaining <= self.hidden)
    }

    pub fn reading(&self) -> ClueReading {
        match self.remaining() {
            None => ClueReading::Inconsistent,
            Some(0) => ClueReading::AllSafe,
            Some(remaining) if remaining == self.hidden => ClueReading::AllMines,
            Some(remaining) => ClueReading::Risk(f64::from(remaining) / f64::from(self.hidden)),
        }
    }
}

/// Collects every revealed safe tile that borders at least one hidden tile, row-major.
pub fn sweep_frontier(state: &GameState) -> Vec<FrontierClue> {
    let mut out = Vec::new();

    for pos in iter_positions(state.size()) {
        let Some(number) = state.tile_at(pos).clue() else {
            continue;
        };

        let mut clue = FrontierClue {
            pos,
            number,
            hidden: 0,
            flagged: 0,
            revealed_mines: 0,
        };

        for tile in state.grid().iter_neighbor_cells(pos) {
            match tile {
                Tile::Hidden => clue.hidden += 1,
                Tile::Flagged => clue.flagged += 1,
                Tile::Revealed(Reveal::Mine) => clue.revealed_mines += 1,
                Tile::Revealed(Reveal::Clue(_)) => {}
            }
        }

        if clue.hidden > 0 {
            out.push(clue);
        }
    }

    out
}
