use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/spindle/config.toml` or `~/.config/spindle/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `SPINDLE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Folder the default library is indexed from. `None` means `~/Music`.
    pub root: Option<PathBuf>,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
    /// Folder names whose contents are indexed but not flagged as music
    /// (compared case-insensitively against every path component).
    pub non_music_dirs: Vec<String>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            root: None,
            extensions: vec![
                "mp3".into(),
                "flac".into(),
                "wav".into(),
                "ogg".into(),
                "m4a".into(),
            ],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
            non_music_dirs: vec![
                "Ringtones".into(),
                "Notifications".into(),
                "Alarms".into(),
                "Podcasts".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// How often the playback service checks for track completion and
    /// refreshes the published position (milliseconds).
    pub poll_interval_ms: u64,
    /// Fade-out applied before releasing the player on STOP or quit
    /// (milliseconds). Set to 0 to stop immediately.
    pub stop_fade_out_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 200,
            stop_fade_out_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Interval of the player screen's progress tick (milliseconds).
    pub tick_interval_ms: u64,
    /// Seconds moved per arrow press while dragging the seek bar.
    pub seek_step_seconds: u64,
    /// How long a status message stays visible (milliseconds).
    pub status_timeout_ms: u64,
}

impl UiSettings {
    /// Seek step in milliseconds, saturating for absurd configured values.
    pub fn seek_step_ms(&self) -> i64 {
        i64::try_from(self.seek_step_seconds.saturating_mul(1000)).unwrap_or(i64::MAX)
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ spin it ~ ".to_string(),
            tick_interval_ms: 1000,
            seek_step_seconds: 5,
            status_timeout_ms: 4000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` wins when set.
    pub level: String,
    /// Log folder. `None` means `$XDG_STATE_HOME/spindle` or `~/.local/state/spindle`.
    pub directory: Option<PathBuf>,
    /// Prefix of the daily rolling log file.
    pub file_name: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_name: "spindle.log".to_string(),
        }
    }
}
