//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/discotree/discotree.toml`
//! 3. Environment variables: `DISCOTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Errors while loading or rendering settings.
#[derive(thiserror::Error, Debug)]
#[error("config error: {message}")]
pub struct ConfigLoadError {
    pub message: String,
}

/// Settings for the discotree CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Pretty-print tree files when saving
    pub pretty: bool,
    /// Append node ids when rendering trees
    pub show_ids: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pretty: true,
            show_ids: false,
        }
    }
}

/// Get the XDG config directory for discotree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "discotree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("discotree.toml"))
}

impl Settings {
    /// Load settings from defaults, the global config file and `DISCOTREE_*`
    /// environment variables.
    pub fn load() -> Result<Self, ConfigLoadError> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Same as [`Settings::load`] with an explicit config file location.
    pub fn load_from(config_file: Option<&Path>) -> Result<Self, ConfigLoadError> {
        let defaults = toml::to_string(&Self::default()).map_err(|e| ConfigLoadError {
            message: format!("serialize defaults: {e}"),
        })?;
        let mut builder = Config::builder().add_source(File::from_str(&defaults, FileFormat::Toml));

        if let Some(path) = config_file {
            debug!("config file: {}", path.display());
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        let config = builder
            .add_source(Environment::with_prefix("DISCOTREE").try_parsing(true))
            .build()
            .map_err(config_err)?;

        config.try_deserialize().map_err(config_err)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigLoadError> {
        toml::to_string_pretty(self).map_err(|e| ConfigLoadError {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# discotree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/discotree/discotree.toml
#   Env:    DISCOTREE_* environment variables (e.g. DISCOTREE_SHOW_IDS=true)

# Pretty-print JSON tree files when saving
# pretty = true

# Show node ids next to ticket titles in `discotree show`
# show_ids = false
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ConfigLoadError {
    ConfigLoadError {
        message: e.to_string(),
    }
}
