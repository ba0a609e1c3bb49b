//! Error types shared across the library, playback and configuration layers.

use std::path::PathBuf;

use thiserror::Error;

use crate::library::Locator;

/// Failures while querying the media index or probing files.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// The library root does not exist or is not a directory.
    #[error("music folder not found: {}", .0.display())]
    RootMissing(PathBuf),

    /// The library root (or a folder under it) cannot be read.
    #[error("permission denied reading {}", .0.display())]
    PermissionDenied(PathBuf),

    /// Directory traversal failed for a reason other than permissions.
    #[error("failed to walk music folder: {0}")]
    Walk(#[from] walkdir::Error),

    /// Tag or property extraction failed for a single file.
    #[error("failed to read metadata from {}: {reason}", path.display())]
    Metadata { path: PathBuf, reason: String },
}

/// Failures reported by the audio backend. None of these reach the
/// sender of a playback command; the controller logs them.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("no audio output device: {0}")]
    NoOutputDevice(String),

    #[error("cannot resolve {0} to a file")]
    Unresolved(Locator),

    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("seek failed: {0}")]
    Seek(String),
}

/// Invalid or unreadable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] ::config::ConfigError),

    #[error("invalid setting: {0}")]
    Invalid(String),
}
