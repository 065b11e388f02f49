use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Key in the rc file selecting the directory that holds failure flags
pub const WORK_DIR_KEY: &str = "master.work_dir";

/// Work directory used when nothing else is configured
pub const DEFAULT_WORK_DIR: &str = ".";

/// Resolved settings for one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub work_dir: PathBuf,
}

impl Config {
    /// Get the configuration file path (`~/.buildwatch/rc`)
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".buildwatch").join("rc"))
    }

    /// Resolve settings: explicit override, then rc file, then defaults
    pub fn resolve(work_dir_override: Option<&Path>) -> Result<Self> {
        if let Some(dir) = work_dir_override {
            return Ok(Config { work_dir: dir.to_path_buf() });
        }

        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)
                    .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
                if let Some(config) = Self::from_rc(&contents, &config_path) {
                    return Ok(config);
                }
            }
        }

        Ok(Config { work_dir: PathBuf::from(DEFAULT_WORK_DIR) })
    }

    /// Parse rc contents. Relative paths resolve against the rc file's directory.
    fn from_rc(contents: &str, config_path: &Path) -> Option<Self> {
        for line in contents.lines() {
            let line = line.trim();
            if line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            if key.trim() != WORK_DIR_KEY {
                continue;
            }

            let path = PathBuf::from(value.trim());
            let work_dir = match config_path.parent() {
                Some(parent) if path.is_relative() => parent.join(path),
                _ => path,
            };
            return Some(Config { work_dir });
        }
        None
    }
}
