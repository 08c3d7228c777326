use crate::domain::{config::LinescopeConfig, error::{LinescopeError, LinescopeResult}};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration manager
///
/// Loads a global config from the user config directory and, when present,
/// overlays a project config found by walking up from the current directory.
pub struct ConfigManager {
    global_config_path: PathBuf,
    project_config_path: Option<PathBuf>,
}

impl ConfigManager {
    pub fn new() -> LinescopeResult<Self> {
        let global_config_path = Self::global_config_path()?;
        let project_config_path = Self::find_project_config_path();

        Ok(Self {
            global_config_path,
            project_config_path,
        })
    }

    /// Load configuration, falling back to defaults when no file exists.
    pub fn load_config(&self) -> LinescopeResult<LinescopeConfig> {
        let mut config = LinescopeConfig::default();

        if self.global_config_path.exists() {
            config = self.load_config_from_path(&self.global_config_path)?;
        }

        // Project config overrides global
        if let Some(project_path) = &self.project_config_path {
            if project_path.exists() {
                config = self.load_config_from_path(project_path)?;
            }
        }

        Ok(config)
    }

    pub fn load_config_from_path(&self, path: &Path) -> LinescopeResult<LinescopeConfig> {
        let content = fs::read_to_string(path).map_err(|e| LinescopeError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| LinescopeError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })
    }

    pub fn save_config_to_path(&self, path: &Path, config: &LinescopeConfig) -> LinescopeResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| LinescopeError::Config {
                message: format!("Failed to create config directory: {}", e),
            })?;
        }

        let content = toml::to_string_pretty(config).map_err(|e| LinescopeError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path, content).map_err(|e| LinescopeError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })
    }

    fn global_config_path() -> LinescopeResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| LinescopeError::Config {
            message: "Could not determine config directory".to_string(),
        })?;

        Ok(config_dir.join("linescope").join("config.toml"))
    }

    /// Walk up the directory tree looking for .linescope/config.toml
    fn find_project_config_path() -> Option<PathBuf> {
        let current_dir = std::env::current_dir().ok()?;
        let mut path = current_dir.as_path();

        loop {
            let config_path = path.join(".linescope").join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }

            path = path.parent()?;
        }
    }

    pub fn get_global_config_path(&self) -> &PathBuf {
        &self.global_config_path
    }

    pub fn get_project_config_path(&self) -> Option<&PathBuf> {
        self.project_config_path.as_ref()
    }
}
