use crate::app_dirs::AppDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Settings read once at start-up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// First line holds every character to track.
    pub characters_path: PathBuf,
    /// Tab-separated `character<TAB>jyutping` rows.
    pub dictionary_path: PathBuf,
    pub progress_path: PathBuf,
    /// Rejects a character list of any other length when set.
    pub expected_character_count: Option<usize>,
    /// Typed at any prompt to save and leave the session.
    pub abort_command: String,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        let data = AppDirs::data_dir();
        Self {
            characters_path: data.join("characters.txt"),
            dictionary_path: data.join("jyutping.tsv"),
            progress_path: data.join("progress.tsv"),
            expected_character_count: None,
            abort_command: ":save".to_string(),
            color: true,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> crate::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Writes the default settings if no config file exists yet, so there is
    /// one to edit after the first run.
    pub fn ensure_exists(&self) -> crate::Result<bool> {
        if self.exists() {
            return Ok(false);
        }
        self.save(&Config::default())?;
        Ok(true)
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> crate::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
