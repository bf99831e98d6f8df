use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::{ylog_debug, ylog_warn, Error, Result};

/// Storage key used when neither the config file nor `--key` names one.
pub const DEFAULT_STORAGE_KEY: &str = "yit-workflow";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding persisted workflows. Defaults to the yit home.
    pub data_dir: Option<String>,
    pub storage_key: Option<String>,
    /// Shell command that receives clipboard text on stdin.
    pub clipboard_command: Option<String>,
    /// Ask before deleting a step or clearing the workflow.
    #[serde(default = "default_true")]
    pub confirm_destructive: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage_key: None,
            clipboard_command: None,
            confirm_destructive: true,
        }
    }
}

impl Config {
    /// Base directory: `$YIT_HOME` if set, else `~/.yit`.
    pub fn yit_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var("YIT_HOME") {
            if !dir.is_empty() {
                return Ok(expand_tilde(&dir));
            }
        }
        Ok(dirs::home_dir().ok_or(Error::NoHomeDir)?.join(".yit"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::yit_dir()?.join("yit.toml"))
    }

    pub fn data_path(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(expand_tilde(dir)),
            None => Self::yit_dir(),
        }
    }

    pub fn effective_storage_key(&self) -> &str {
        self.storage_key.as_deref().unwrap_or(DEFAULT_STORAGE_KEY)
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        ylog_debug!("Config::load path={}", path.display());
        if !path.exists() {
            ylog_debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(path)?)?;
        ylog_debug!(
            "Config loaded: data_dir={:?}, storage_key={:?}, clipboard_command={:?}",
            config.data_dir,
            config.storage_key,
            config.clipboard_command
        );
        Ok(config)
    }

    /// Like [`Config::load`], but an unreadable or malformed file yields defaults.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(Self::fallback)
    }

    fn fallback(err: Error) -> Self {
        ylog_warn!("Config unusable, falling back to defaults: {}", err);
        Self::default()
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
