use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Opaque reference to a playable audio resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// An entry of a media index, addressed by the index's content
    /// namespace and the row id.
    Indexed { namespace: Arc<str>, id: u64 },
    /// A file addressed directly by path.
    File(PathBuf),
}

impl Locator {
    pub fn indexed(namespace: &str, id: u64) -> Self {
        Self::Indexed {
            namespace: Arc::from(namespace),
            id,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Indexed { namespace, id } => write!(f, "{namespace}/{id}"),
            Self::File(path) => write!(f, "file://{}", path.display()),
        }
    }
}

/// Structured metadata for one playable item. Built once by the loader and
/// never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackDescriptor {
    title: String,
    artist: String,
    album: String,
    duration_ms: i64,
    locator: Locator,
    path: PathBuf,
}

impl TrackDescriptor {
    /// Build a descriptor, substituting the "Unknown ..." placeholders for
    /// missing text fields.
    pub fn new(
        title: Option<String>,
        artist: Option<String>,
        album: Option<String>,
        duration_ms: i64,
        locator: Locator,
        path: PathBuf,
    ) -> Self {
        Self {
            title: title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            artist: artist.unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
            album: album.unwrap_or_else(|| UNKNOWN_ALBUM.to_string()),
            duration_ms,
            locator,
            path,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn album(&self) -> &str {
        &self.album
    }

    pub fn duration_ms(&self) -> i64 {
        self.duration_ms
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Duration rendered as `m:ss`.
    pub fn formatted_duration(&self) -> String {
        format_duration(self.duration_ms)
    }
}

/// Format milliseconds as `m:ss`; anything non-positive renders as `0:00`.
pub fn format_duration(ms: i64) -> String {
    if ms <= 0 {
        return "0:00".to_string();
    }
    let secs = ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}
