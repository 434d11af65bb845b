/// Configuration file loader for rs_webssh
use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File, FileFormat};

use crate::config::{ConfigError, WebSshConfig};

/// Prefix for environment overrides, e.g. `WEBSSH_SERVER__HTTP_PORT=9000`
const ENV_PREFIX: &str = "WEBSSH";

/// Configuration loader responsible for layering the config file and the environment
pub struct ConfigLoader {
    env_prefix: &'static str,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            env_prefix: ENV_PREFIX,
        }
    }

    /// Load configuration from an explicit file, or from `./config.toml` when present.
    ///
    /// An explicitly given path must exist; the default path is optional.
    pub fn load_config(&self, config_path: Option<&Path>) -> Result<WebSshConfig, ConfigError> {
        let mut builder = Config::builder();

        match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound(path.display().to_string()));
                }
                builder = builder.add_source(File::from(path.to_path_buf()).required(true));
            }
            None => {
                if let Some(path) = default_config_path() {
                    builder = builder.add_source(File::from(path).required(false));
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: WebSshConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML content
    pub fn parse_config(&self, content: &str) -> Result<WebSshConfig, ConfigError> {
        let config: WebSshConfig = Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

/// Default configuration path
pub fn default_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|dir| dir.join("config.toml"))
}
