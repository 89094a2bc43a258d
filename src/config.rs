use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use colored::Colorize;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Global configuration values
///
/// The configuration is stored in a TOML file in the current user's
/// config directory, which is `~/.config/cronometro/config.toml` by default.
///
/// A config can be loaded from a file with [`Config::load`].
/// You can also use [`Config::init`] or [`Config::init_default`] to create
/// a default config file if one does not exist at the given path.
///
/// To save a config to the filesystem, use [`Config::save`].
///
/// ## File Format
///
/// The configuration file is written as a TOML file.
/// See the documentation for each field to learn how they are serialized.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Directory to find hook executables
    ///
    /// Default is a directory called `hooks` inside the config directory.
    /// Serialized as an absolute path.
    #[serde(default = "default_hooks_directory")]
    pub hooks_directory: PathBuf,
    /// Duration used when a countdown is started without an explicit one
    ///
    /// Default is 60 seconds.
    /// Serialized as an integer count of seconds.
    #[serde(default = "default_duration", with = "crate::time::duration::seconds")]
    pub default_duration: Duration,
    /// Interval between countdown ticks
    ///
    /// Default is 1000 milliseconds, the nominal one-second tick.
    /// Serialized as an integer count of milliseconds.
    #[serde(
        default = "default_tick_interval",
        with = "crate::time::duration::millis"
    )]
    pub tick_interval: Duration,
    /// Durations to preload into the preset list, in seconds
    ///
    /// Default is an empty list. Entries that are not positive are skipped
    /// when the session starts.
    #[serde(default)]
    pub presets: Vec<u32>,
}

impl Config {
    /// Returns the current config, creating a default config file if one does not exist
    pub fn init(config_path: &Path) -> Result<Self> {
        if let Some(conf) = Config::load(config_path)? {
            Ok(conf)
        } else {
            let conf = Config::default();

            println!(
                "Creating config file at {}",
                config_path.display().to_string().cyan()
            );

            conf.save(config_path)?;

            Ok(conf)
        }
    }

    /// Returns the current config from the default location, and creates the file if one does not exist
    pub fn init_default() -> Result<Self> {
        let path = default_config_path()?;
        Self::init(&path)
    }

    /// Reads a TOML config file
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if path.exists() {
            let config_str = read_to_string(path)?;

            toml::from_str(&config_str).with_context(|| "Failed to parse config from TOML")
        } else {
            Ok(None)
        }
    }

    /// Write this config file to the filesystem
    pub fn save(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string(&self).with_context(|| "Unable to format config as TOML")?;

        std::fs::create_dir_all(
            path.parent()
                .with_context(|| "Config file path does not have a parent directory")?,
        )?;

        std::fs::write(path, toml)
            .with_context(|| format!("Unable to write config TOML to path {}", path.display()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hooks_directory: default_hooks_directory(),
            default_duration: default_duration(),
            tick_interval: default_tick_interval(),
            presets: Vec::new(),
        }
    }
}

/// Get the default location of the config file
pub fn default_config_path() -> Result<PathBuf> {
    let conf_path = ProjectDirs::from("dev", "Cronometro", "Cronometro")
        .with_context(|| "Unable to determine XDG directories")?
        .config_dir()
        .join("config.toml");

    Ok(conf_path)
}

fn default_hooks_directory() -> PathBuf {
    let project_dirs = ProjectDirs::from("dev", "Cronometro", "Cronometro")
        .with_context(|| "Unable to determine XDG directories")
        .unwrap();

    project_dirs.config_dir().join("hooks")
}

fn default_duration() -> Duration {
    Duration::from_secs(60)
}

fn default_tick_interval() -> Duration {
    Duration::from_millis(1000)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config.default_duration, Duration::from_secs(60));
        assert_eq!(config.tick_interval, Duration::from_millis(1000));
        assert!(config.presets.is_empty());
    }

    #[test]
    fn durations_are_stored_as_integers() {
        let config: Config = toml::from_str(
            r#"
            default_duration = 90
            tick_interval = 250
            presets = [90, 45]
            "#,
        )
        .unwrap();

        assert_eq!(config.default_duration, Duration::from_secs(90));
        assert_eq!(config.tick_interval, Duration::from_millis(250));
        assert_eq!(config.presets, vec![90, 45]);

        let toml = toml::to_string(&config).unwrap();

        assert!(toml.contains("default_duration = 90"));
        assert!(toml.contains("tick_interval = 250"));
    }
}
