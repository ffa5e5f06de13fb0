use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use shroom_sniff_core::GameConfig;

const SUPPORTED_CONFIG_VERSION: u32 = 1;

/// Returns the default config path relative to the repository root.
#[must_use]
pub(crate) fn default_config_path() -> PathBuf {
    PathBuf::from("adapters/cli/assets/shroom_sniff.toml")
}

/// Loads and validates the game configuration stored at `path`.
pub(crate) fn load(path: impl AsRef<Path>) -> Result<GameConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read game config at {}", path.display()))?;
    parse_config(&contents)
        .with_context(|| format!("invalid game config at {}", path.display()))
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    version: u32,
    #[serde(flatten)]
    game: GameConfig,
}

fn parse_config(contents: &str) -> Result<GameConfig> {
    let file: ConfigFile =
        toml::from_str(contents).context("failed to parse game config toml contents")?;
    if file.version != SUPPORTED_CONFIG_VERSION {
        bail!(
            "unsupported game config version {}; expected {}",
            file.version,
            SUPPORTED_CONFIG_VERSION
        );
    }
    file.game.validate()?;
    Ok(file.game)
}
