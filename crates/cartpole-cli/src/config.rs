//! Configuration loading for the cartpole CLI

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use config::{ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use cartpole_core::{GridConfig, LearnerConfig, PlantConfig};

/// Prefix of environment overrides, e.g. `CARTPOLE__LEARNER__SEED=7`
pub const ENV_PREFIX: &str = "CARTPOLE";

/// File name looked up in the working directory and the user config dir
pub const CONFIG_FILE_NAME: &str = "cartpole.toml";

/// Configuration for the CLI
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub plant: PlantConfig,
    pub grid: GridConfig,
    pub learner: LearnerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Emit log lines as JSON
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Config {
    /// Load configuration from `path` (if any) overlaid with `CARTPOLE__*` variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(
            path,
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
    }

    pub(crate) fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        // Defaults form the bottom layer so any single field can be overridden
        let defaults = config::Config::try_from(&Self::default())
            .context("Failed to build default configuration")?;
        let mut builder =
            ConfigBuilder::<config::builder::DefaultState>::default().add_source(defaults);

        if let Some(path) = path {
            builder = builder.add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(true),
            );
        }
        builder = builder.add_source(env);

        let config: Self = builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Find the configuration file.
    ///
    /// An explicit path must exist. Otherwise checks `CARTPOLE_CONFIG`,
    /// `./cartpole.toml` and `~/.config/cartpole/cartpole.toml` in order.
    pub fn find_config_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            return Ok(Some(path.to_path_buf()));
        }

        if let Ok(path) = std::env::var("CARTPOLE_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return Ok(Some(local));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home
                .join(".config")
                .join("cartpole")
                .join(CONFIG_FILE_NAME);
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        Ok(None)
    }

    pub fn validate(&self) -> Result<()> {
        self.plant.validate().context("Invalid [plant] section")?;
        self.grid.validate().context("Invalid [grid] section")?;
        self.learner.validate().context("Invalid [learner] section")?;
        Ok(())
    }

    /// Render as a TOML document
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to render configuration")
    }
}
