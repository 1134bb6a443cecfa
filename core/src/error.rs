use alloc::string::String;
use thiserror::Error;

use crate::Pos;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Saved cell at {0:?} disagrees with the mine layout")]
    InconsistentCell(Pos),
    #[error("Saved revealed/flag lists disagree with the grid")]
    InconsistentSets,
    #[error("Unsupported save version {0}")]
    UnsupportedVersion(u32),
    #[error("Malformed save data: {0}")]
    Malformed(String),
}

pub type Result<T> = core::result::Result<T, GameError>;
