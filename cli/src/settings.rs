use std::fs;
use std::path::Path;

use anyhow::Context;
use minelayer_core::{CellCount, Coord, GameConfig};
use serde::{Deserialize, Serialize};

/// `[board]` table of the settings file.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    pub width: Option<Coord>,
    pub height: Option<Coord>,
    pub mines: Option<CellCount>,
    pub target: Option<CellCount>,
}

/// `[enemy]` table of the settings file.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemySettings {
    pub health: Option<i32>,
    pub damage: Option<i32>,
}

/// Optional TOML settings, every missing key keeps the built-in default.
///
/// ```toml
/// seed = 42
///
/// [board]
/// width = 12
/// height = 10
/// mines = 15
/// target = 30
///
/// [enemy]
/// health = 3
/// damage = 1
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub seed: Option<u64>,
    pub board: BoardSettings,
    pub enemy: EnemySettings,
}

impl Settings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("could not read settings from {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid settings in {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Layers these settings over `config`.
    pub fn apply(&self, config: &mut GameConfig) {
        let (height, width) = config.size;
        config.size = (
            self.board.height.unwrap_or(height),
            self.board.width.unwrap_or(width),
        );
        if let Some(mines) = self.board.mines {
            config.mines = mines;
        }
        if self.board.target.is_some() {
            config.total_mines_target = self.board.target;
        }
        if let Some(health) = self.enemy.health {
            config.enemy_health = health;
        }
        if let Some(damage) = self.enemy.damage {
            config.damage_per_mine = damage;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
    }
}
