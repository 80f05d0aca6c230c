use std::path::{Path, PathBuf};

use derive_more::From;
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use retype::Configuration;
use retype::editor::EditorSettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod theme;

/// Prefix of environment variables that override settings
pub const ENV_PREFIX: &str = "RETYPE_";

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Width of a tab stop
    pub tab_width: usize,
    /// Whether the tab key types spaces
    pub insert_spaces: bool,
    /// Seconds between live statistics updates
    pub stats_interval_seconds: f64,
    /// Start from the top when practice is started at the end of the file
    pub restart_near_end: bool,
    pub theme: theme::Theme,
}

impl Default for Settings {
    fn default() -> Self {
        let engine = Configuration::default();
        let editor = EditorSettings::default();
        Self {
            tab_width: editor.tab_width,
            insert_spaces: editor.insert_spaces,
            stats_interval_seconds: engine.stats_interval_seconds,
            restart_near_end: engine.restart_near_end,
            theme: theme::Theme::default(),
        }
    }
}

impl Settings {
    pub const fn engine_configuration(&self) -> Configuration {
        Configuration {
            stats_interval_seconds: self.stats_interval_seconds,
            restart_near_end: self.restart_near_end,
        }
    }

    pub const fn editor_settings(&self) -> EditorSettings {
        EditorSettings {
            tab_width: self.tab_width,
            insert_spaces: self.insert_spaces,
        }
    }
}

#[derive(Debug, From, Error)]
pub enum ConfigError {
    #[error(
        "Failed to get configuration directory. Please specify the location using the `--config <path>` flag"
    )]
    NoDirectory,

    #[error("Failed to create config directory: {0}")]
    CreateDirectory(std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(Box<figment::Error>),
}

/// Directory holding `settings.toml`, unless overridden on the command line
pub fn default_directory() -> Option<PathBuf> {
    ProjectDirs::from("com", "ReType", "ReType").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Layer the defaults, `settings.toml` and the environment
fn figment(config_dir: &Path) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(Settings::default()));

    let settings_toml = config_dir.join("settings.toml");
    if settings_toml.exists() {
        figment = figment.merge(Toml::file(settings_toml));
    }

    figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
}

impl Settings {
    pub fn get(override_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config_dir = override_path
            .or_else(default_directory)
            .ok_or(ConfigError::NoDirectory)?;

        // Ensure path exists
        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir)?;
        }

        let settings: Self = figment(&config_dir).extract().map_err(Box::new)?;

        tracing::debug!(
            target: "retype.term",
            directory = %config_dir.display(),
            tab_width = settings.tab_width,
            insert_spaces = settings.insert_spaces,
            "settings_loaded"
        );

        Ok(settings)
    }
}
