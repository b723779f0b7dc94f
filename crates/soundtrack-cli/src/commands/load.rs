//! Config file loading.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use soundtrack_spec::SoundtrackConfig;

/// A parsed config and the directory its relative paths are resolved from.
pub(crate) struct LoadedConfig {
    pub config: SoundtrackConfig,
    pub base_dir: PathBuf,
}

/// Reads and parses a config file.
pub(crate) fn load_config(path: &Path) -> Result<LoadedConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = SoundtrackConfig::from_json(&text)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(LoadedConfig { config, base_dir })
}
