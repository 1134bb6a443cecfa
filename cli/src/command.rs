use minelayer_core::{Coord, Intent, Pos};
use thiserror::Error;

/// One line typed at the prompt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Place(Pos),
    Save,
    Help,
    Quit,
}

impl Command {
    /// Controller input for this command, if it has one.
    pub fn intent(self) -> Option<Intent> {
        match self {
            Self::Place(pos) => Some(Intent::PlaceMine { pos }),
            Self::Quit => Some(Intent::Quit),
            Self::Save | Self::Help => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Nothing typed")]
    Empty,
    #[error("Usage: p ROW COL")]
    PlaceUsage,
    #[error("Invalid coordinate '{0}'")]
    BadCoord(String),
    #[error("Unknown command '{0}'. Type 'h' for help.")]
    Unknown(String),
}

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some(head) = parts.first() else {
        return Err(CommandError::Empty);
    };

    match head.to_lowercase().as_str() {
        "p" | "place" => match parts[1..] {
            [row, col] => Ok(Command::Place((coord(row)?, coord(col)?))),
            _ => Err(CommandError::PlaceUsage),
        },
        "s" | "save" => Ok(Command::Save),
        "h" | "help" => Ok(Command::Help),
        "q" | "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn coord(text: &str) -> Result<Coord, CommandError> {
    text.parse()
        .map_err(|_| CommandError::BadCoord(text.to_string()))
}

pub fn help_text() -> &'static str {
    "Commands:\n  \
     p ROW COL  - lay a mine on a hidden tile (0-based, as labeled)\n  \
     s          - save the game\n  \
     h          - show this help\n  \
     q          - quit"
}
