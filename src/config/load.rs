use std::{env, path::PathBuf};

use crate::error::ConfigError;

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then environment variables
/// (prefix `SPINDLE__`), and falls back to struct defaults.
impl Settings {
    /// Load settings from an optional config file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("SPINDLE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ui.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "ui.tick_interval_ms must be >= 1".to_string(),
            ));
        }
        if self.playback.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "playback.poll_interval_ms must be >= 1".to_string(),
            ));
        }
        if self
            .library
            .extensions
            .iter()
            .all(|e| e.trim().trim_start_matches('.').is_empty())
        {
            return Err(ConfigError::Invalid(
                "library.extensions must name at least one extension".to_string(),
            ));
        }
        Ok(())
    }

    /// The folder indexed by the default library load.
    pub fn library_root(&self) -> PathBuf {
        self.library
            .root
            .clone()
            .unwrap_or_else(default_music_dir)
    }

    /// The folder rolling log files are written to.
    pub fn log_directory(&self) -> PathBuf {
        self.logging
            .directory
            .clone()
            .unwrap_or_else(default_state_dir)
    }
}

/// Resolve the config path from `SPINDLE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("SPINDLE_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/spindle/config.toml`
/// or `~/.config/spindle/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("spindle").join("config.toml"))
}

/// `~/Music`, or `Music` relative to the working directory without `HOME`.
pub fn default_music_dir() -> PathBuf {
    env::var_os("HOME")
        .map(|home| PathBuf::from(home).join("Music"))
        .unwrap_or_else(|| PathBuf::from("Music"))
}

/// `$XDG_STATE_HOME/spindle` or `~/.local/state/spindle`.
pub fn default_state_dir() -> PathBuf {
    if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join("spindle");
    }
    env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".local").join("state"))
        .unwrap_or_else(env::temp_dir)
        .join("spindle")
}
