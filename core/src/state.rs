use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Whose turn it is. Informational only, the phase drives the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Turn {
    Player,
    Enemy,
}

/// Turn controller states.
///
/// Transitions:
/// - PlayerInput -> EnemyThink (mine placed) | PlayerInput
/// - EnemyThink -> CheckWinLose
/// - CheckWinLose -> PlayerInput | GameOver
///
/// `Init`, `PlayerResolve` and `EnemyAct` are never entered by the transitions above; when found
/// in a loaded game they pass through to `PlayerInput`, `EnemyThink` and `CheckWinLose`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Init,
    PlayerInput,
    PlayerResolve,
    EnemyThink,
    EnemyAct,
    #[serde(rename = "CHECK_WINLOSE")]
    CheckWinLose,
    GameOver,
}

impl Phase {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::GameOver)
    }

    /// Whether the controller is waiting on the player.
    pub const fn awaits_player(self) -> bool {
        matches!(self, Self::PlayerInput)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::PlayerInput
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Ongoing,
    PlayerWin,
    EnemyWin,
}

impl Outcome {
    pub const fn is_final(self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

/// Everything about one game: visible grid, mine truth, enemy health and controller position.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub(crate) grid: Array2<Tile>,
    pub(crate) mine_layout: MineLayout,
    pub(crate) enemy_health: i32,
    pub(crate) enemy_max_health: i32,
    pub(crate) total_mines_target: Option<CellCount>,
    pub(crate) turn: Turn,
    pub(crate) phase: Phase,
    pub(crate) outcome: Outcome,
    pub(crate) seed: u64,
    pub(crate) enemy_moves: u32,
}

impl GameState {
    /// Fresh game waiting on the player's first placement.
    pub fn new(
        mine_layout: MineLayout,
        enemy_health: i32,
        total_mines_target: Option<CellCount>,
        seed: u64,
    ) -> Self {
        let size = mine_layout.size();
        Self {
            grid: Array2::default(size.to_nd_index()),
            mine_layout,
            enemy_health,
            enemy_max_health: enemy_health,
            total_mines_target,
            turn: Turn::Player,
            phase: Phase::PlayerInput,
            outcome: Outcome::Ongoing,
            seed,
            enemy_moves: 0,
        }
    }

    /// Board size as `(height, width)`.
    pub fn size(&self) -> Pos {
        self.mine_layout.size()
    }

    pub fn height(&self) -> Coord {
        self.size().0
    }

    pub fn width(&self) -> Coord {
        self.size().1
    }

    pub fn grid(&self) -> &Array2<Tile> {
        &self.grid
    }

    pub fn tile_at(&self, pos: Pos) -> Tile {
        self.grid[pos.to_nd_index()]
    }

    pub fn mine_layout(&self) -> &MineLayout {
        &self.mine_layout
    }

    pub fn has_mine_at(&self, pos: Pos) -> bool {
        self.mine_layout.contains_mine(pos)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_layout.mine_count()
    }

    pub fn total_mines_target(&self) -> Option<CellCount> {
        self.total_mines_target
    }

    pub fn enemy_health(&self) -> i32 {
        self.enemy_health
    }

    pub fn enemy_max_health(&self) -> i32 {
        self.enemy_max_health
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of moves the enemy has made so far.
    pub fn enemy_moves(&self) -> u32 {
        self.enemy_moves
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Revealed positions, row-major.
    pub fn revealed(&self) -> impl Iterator<Item = Pos> + '_ {
        self.positions_where(Tile::is_revealed)
    }

    /// Flagged positions, row-major.
    pub fn flags(&self) -> impl Iterator<Item = Pos> + '_ {
        self.positions_where(Tile::is_flagged)
    }

    /// Hidden positions, row-major.
    pub fn hidden(&self) -> impl Iterator<Item = Pos> + '_ {
        self.positions_where(Tile::is_hidden)
    }

    pub fn mines(&self) -> impl Iterator<Item = Pos> + '_ {
        self.mine_layout.iter()
    }

    pub fn revealed_safe_count(&self) -> CellCount {
        self.grid.iter().filter(|tile| tile.clue().is_some()).count() as CellCount
    }

    pub fn all_safe_revealed(&self) -> bool {
        self.revealed_safe_count() >= self.mine_layout.safe_cell_count()
    }

    fn positions_where(&self, pred: fn(Tile) -> bool) -> impl Iterator<Item = Pos> + '_ {
        iter_positions(self.size()).filter(move |&pos| pred(self.tile_at(pos)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn new_state_waits_on_player() {
        let layout = MineLayout::from_mine_coords((2, 3), &[(1, 2)]).unwrap();
        let state = GameState::new(layout, 3, None, 7);

        assert_eq!(state.size(), (2, 3));
        assert_eq!(state.phase(), Phase::PlayerInput);
        assert_eq!(state.turn(), Turn::Player);
        assert_eq!(state.outcome(), Outcome::Ongoing);
        assert_eq!(state.enemy_health(), state.enemy_max_health());
        assert_eq!(state.hidden().count(), 6);
        assert_eq!(state.mines().collect::<Vec<_>>(), [(1, 2)]);
        assert!(!state.all_safe_revealed());
    }

    #[test]
    fn views_follow_the_grid() {
        let layout = MineLayout::empty((2, 2));
        let mut state = GameState::new(layout, 1, None, 0);
        state.grid[[0, 1]] = Tile::Flagged;
        state.grid[[1, 0]] = Tile::Revealed(Reveal::Clue(0));

        assert_eq!(state.flags().collect::<Vec<_>>(), [(0, 1)]);
        assert_eq!(state.revealed().collect::<Vec<_>>(), [(1, 0)]);
        assert_eq!(state.hidden().collect::<Vec<_>>(), [(0, 0), (1, 1)]);
    }
}
