use super::Config;
use crate::error::ConfigError;
use anyhow::{Context, Result};
use directories::UserDirs;
use std::fs;
use std::path::{Path, PathBuf};

pub fn default_config_path() -> Result<PathBuf> {
    let home = UserDirs::new()
        .map(|u| u.home_dir().to_path_buf())
        .context("Could not find home directory")?;
    Ok(home.join(".smartlinks").join("config.toml"))
}

impl Config {
    /// Load `~/.smartlinks/config.toml`, writing a default file on first run.
    pub fn load_or_init() -> Result<Self> {
        let config_path = default_config_path()?;
        if config_path.exists() {
            return Self::load_from(&config_path);
        }

        if let Some(dir) = config_path.parent() {
            fs::create_dir_all(dir).context("Failed to create .smartlinks directory")?;
        }
        let mut config = Self {
            config_path,
            ..Self::default()
        };
        config.save()?;
        tracing::info!(path = %config.config_path.display(), "wrote default config");
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(ConfigError::Io)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::Load(e.to_string()))
            .context("Failed to parse config file")?;
        config.config_path = path.to_path_buf();
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}
