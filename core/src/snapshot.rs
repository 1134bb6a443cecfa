use alloc::collections::BTreeSet;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Version written into new saves. Anything newer is refused on load.
pub const SAVE_VERSION: u32 = 1;

/// Flat view of one tile.
///
/// Mine truth is only written for revealed tiles, hidden and flagged ones always read as an empty
/// hidden cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRecord {
    pub state: CellState,
    pub has_mine: bool,
    /// Clue for a revealed safe tile, `-1` for a revealed mine, `0` otherwise.
    pub number: i8,
}

impl From<Tile> for CellRecord {
    fn from(tile: Tile) -> Self {
        let (has_mine, number) = match tile {
            Tile::Revealed(reveal) => (reveal.has_mine(), reveal.number()),
            Tile::Hidden | Tile::Flagged => (false, 0),
        };
        Self {
            state: tile.cell_state(),
            has_mine,
            number,
        }
    }
}

/// Serializable form of a whole game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub width: Coord,
    pub height: Coord,
    pub mines: Vec<Pos>,
    pub revealed: Vec<Pos>,
    pub flags: Vec<Pos>,
    pub enemy_hp: i32,
    pub enemy_max_hp: i32,
    pub total_mines_target: Option<CellCount>,
    pub turn: Turn,
    pub phase: Phase,
    pub outcome: Outcome,
    pub rng_seed: u64,
    #[serde(default)]
    pub enemy_moves: u32,
    #[serde(default = "default_version")]
    pub version: u32,
    /// One list per row, top to bottom.
    pub grid: Vec<Vec<CellRecord>>,
}

fn default_version() -> u32 {
    SAVE_VERSION
}

impl SaveRecord {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| GameError::Malformed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| GameError::Malformed(e.to_string()))
    }
}

impl From<&GameState> for SaveRecord {
    fn from(state: &GameState) -> Self {
        let (height, width) = state.size();
        Self {
            width,
            height,
            mines: state.mines().collect(),
            revealed: state.revealed().collect(),
            flags: state.flags().collect(),
            enemy_hp: state.enemy_health,
            enemy_max_hp: state.enemy_max_health,
            total_mines_target: state.total_mines_target,
            turn: state.turn,
            phase: state.phase,
            outcome: state.outcome,
            rng_seed: state.seed,
            enemy_moves: state.enemy_moves,
            version: SAVE_VERSION,
            grid: state
                .grid
                .rows()
                .into_iter()
                .map(|row| row.iter().map(|&tile| tile.into()).collect())
                .collect(),
        }
    }
}

impl TryFrom<SaveRecord> for GameState {
    type Error = GameError;

    fn try_from(record: SaveRecord) -> Result<Self> {
        if record.version > SAVE_VERSION {
            return Err(GameError::UnsupportedVersion(record.version));
        }

        let size = (record.height, record.width);
        if record.height == 0
            || record.width == 0
            || record.grid.len() != usize::from(record.height)
            || record.grid.iter().any(|row| row.len() != usize::from(record.width))
        {
            return Err(GameError::InvalidBoardShape);
        }

        let mine_layout = MineLayout::from_mine_coords(size, &record.mines)?;
        if let Some(target) = record.total_mines_target {
            if mine_layout.mine_count() > target || target > mine_layout.total_cells() {
                return Err(GameError::TooManyMines);
            }
        }

        let mut tiles = Vec::with_capacity(usize::from(mine_layout.total_cells()));
        for (pos, cell) in iter_positions(size).zip(record.grid.iter().flatten()) {
            tiles.push(restore_tile(&mine_layout, pos, cell)?);
        }
        let grid = Array2::from_shape_vec(size.to_nd_index(), tiles)
            .map_err(|_| GameError::InvalidBoardShape)?;

        let state = GameState {
            grid,
            mine_layout,
            enemy_health: record.enemy_hp,
            enemy_max_health: record.enemy_max_hp,
            total_mines_target: record.total_mines_target,
            turn: record.turn,
            phase: record.phase,
            outcome: record.outcome,
            seed: record.rng_seed,
            enemy_moves: record.enemy_moves,
        };

        if !same_positions(&record.revealed, state.revealed())
            || !same_positions(&record.flags, state.flags())
        {
            return Err(GameError::InconsistentSets);
        }

        log::debug!(
            "Restored {}x{} game in {:?} after {} enemy moves",
            record.height,
            record.width,
            state.phase,
            state.enemy_moves
        );
        Ok(state)
    }
}

fn restore_tile(layout: &MineLayout, pos: Pos, cell: &CellRecord) -> Result<Tile> {
    let is_mine = layout.contains_mine(pos);
    if cell.has_mine && !is_mine {
        return Err(GameError::InconsistentCell(pos));
    }

    match cell.state {
        CellState::Hidden => Ok(Tile::Hidden),
        CellState::Flagged => Ok(Tile::Flagged),
        CellState::Revealed if is_mine => {
            if cell.has_mine && cell.number == Reveal::MINE_NUMBER {
                Ok(Tile::Revealed(Reveal::Mine))
            } else {
                Err(GameError::InconsistentCell(pos))
            }
        }
        CellState::Revealed => {
            let count = layout.adjacent_mine_count(pos);
            if i16::from(cell.number) == i16::from(count) {
                Ok(Tile::Revealed(Reveal::Clue(count)))
            } else {
                Err(GameError::InconsistentCell(pos))
            }
        }
    }
}

fn same_positions(listed: &[Pos], actual: impl Iterator<Item = Pos>) -> bool {
    let listed: BTreeSet<Pos> = listed.iter().copied().collect();
    let actual: BTreeSet<Pos> = actual.collect();
    listed == actual
}
