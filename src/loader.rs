//! Startup loading of authored game text.
//!
//! Content problems (missing keys, unknown keys, bad TOML) are authoring
//! errors and abort startup with context, never surfacing during play.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::text::GameText;

/// Load and validate the global game text from a TOML file.
///
/// # Errors
/// Fails if the file can't be read or any section/key is missing, malformed,
/// or unrecognized.
pub fn load_game_text(path: impl AsRef<Path>) -> Result<GameText> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("reading game text from {}", path.display()))?;
    let text: GameText = toml::from_str(&raw).with_context(|| format!("parsing game text in {}", path.display()))?;
    info!("game text loaded from {}", path.display());
    Ok(text)
}
