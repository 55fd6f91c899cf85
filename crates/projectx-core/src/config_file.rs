use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::DEFAULT_TITLE_SUFFIX;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub storage: Option<StorageConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub library_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub no_color: Option<bool>,
    pub title_suffix: Option<String>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write config: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigFile {
    /// Configured library directory, or `<data_dir>/projectx/documents`.
    pub fn library_dir(&self) -> Option<PathBuf> {
        self.storage
            .as_ref()
            .and_then(|s| s.library_dir.as_ref())
            .map(PathBuf::from)
            .or_else(default_library_dir)
    }

    pub fn no_color(&self) -> bool {
        self.display
            .as_ref()
            .and_then(|d| d.no_color)
            .unwrap_or(false)
    }

    pub fn title_suffix(&self) -> &str {
        self.display
            .as_ref()
            .and_then(|d| d.title_suffix.as_deref())
            .unwrap_or(DEFAULT_TITLE_SUFFIX)
    }
}

/// Platform config directory path: `<config_dir>/projectx/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("projectx").join("config.toml"))
}

pub fn default_library_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("projectx").join("documents"))
}

/// Load config by cascading CWD `.projectx.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".projectx.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        storage: Some(StorageConfig {
            library_dir: overlay
                .storage
                .as_ref()
                .and_then(|s| s.library_dir.clone())
                .or_else(|| base.storage.as_ref().and_then(|s| s.library_dir.clone())),
        }),
        display: Some(DisplayConfig {
            no_color: overlay
                .display
                .as_ref()
                .and_then(|d| d.no_color)
                .or_else(|| base.display.as_ref().and_then(|d| d.no_color)),
            title_suffix: overlay
                .display
                .as_ref()
                .and_then(|d| d.title_suffix.clone())
                .or_else(|| base.display.as_ref().and_then(|d| d.title_suffix.clone())),
        }),
    }
}

/// Save `config` to `path`, creating parent directories.
pub fn save_to_path(config: &ConfigFile, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Merge `update` over the config stored at `path` (if any) and save the result.
pub fn update_at_path(path: &Path, update: ConfigFile) -> Result<ConfigFile, ConfigError> {
    let base = load_from_path(path).unwrap_or_default();
    let merged = merge(base, update);
    save_to_path(&merged, path)?;
    Ok(merged)
}
