use serde::{Deserialize, Serialize};

/// What a tile showed when it was opened.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reveal {
    Mine,
    /// Number of neighboring mines, kept current by mine placement.
    Clue(u8),
}

impl Reveal {
    /// Number written for a revealed mine in the flat cell representation.
    pub const MINE_NUMBER: i8 = -1;

    pub const fn has_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    pub const fn number(self) -> i8 {
        match self {
            Self::Mine => Self::MINE_NUMBER,
            Self::Clue(count) => count as i8,
        }
    }
}

/// Canonical player-visible state of a single board tile.
///
/// Hidden and flagged tiles carry no clue, so nothing can read a stale one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    Hidden,
    Revealed(Reveal),
    Flagged,
}

impl Tile {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed(_))
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }

    pub const fn is_revealed_mine(self) -> bool {
        matches!(self, Self::Revealed(Reveal::Mine))
    }

    /// Clue of a revealed safe tile.
    pub const fn clue(self) -> Option<u8> {
        match self {
            Self::Revealed(Reveal::Clue(count)) => Some(count),
            _ => None,
        }
    }

    pub const fn cell_state(self) -> CellState {
        match self {
            Self::Hidden => CellState::Hidden,
            Self::Revealed(_) => CellState::Revealed,
            Self::Flagged => CellState::Flagged,
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::Hidden
    }
}

/// Visibility discriminant of a tile, as written in saves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CellState {
    Hidden,
    Revealed,
    Flagged,
}
