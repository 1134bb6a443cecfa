use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use minelayer_core::{GameState, SaveRecord};

pub const DEFAULT_SAVE_PATH: &str = "save.json";

/// Writes the game next to `path` first and renames it over, so a crash never leaves half a save.
pub fn save(path: &Path, state: &GameState) -> anyhow::Result<()> {
    let json = SaveRecord::from(state).to_json()?;
    let tmp = tmp_path(path);

    fs::write(&tmp, json).with_context(|| format!("could not write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("could not move {} to {}", tmp.display(), path.display()))?;

    log::debug!("Saved game to {}", path.display());
    Ok(())
}

pub fn load(path: &Path) -> anyhow::Result<GameState> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("could not read save from {}", path.display()))?;
    let record = SaveRecord::from_json(&json)
        .with_context(|| format!("could not parse save {}", path.display()))?;
    let state = GameState::try_from(record)
        .with_context(|| format!("save {} is not a valid game", path.display()))?;

    log::debug!("Loaded game from {}", path.display());
    Ok(state)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
