//! Tag, property and embedded-picture extraction with `lofty`.

use std::path::Path;

use lofty::prelude::*;

use crate::error::LibraryError;

/// Embedded cover art, or the placeholder used whenever there is none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artwork {
    Embedded { mime: Option<String>, bytes: usize },
    Placeholder,
}

/// Everything a track's tags can tell us. Text fields are `None` when the
/// tag is missing or blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Probe {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_ms: Option<i64>,
}

fn non_blank(v: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn read(path: &Path) -> Result<lofty::file::TaggedFile, LibraryError> {
    lofty::read_from_path(path).map_err(|e| LibraryError::Metadata {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Read title/artist/album and duration from `path`.
pub fn probe(path: &Path) -> Result<Probe, LibraryError> {
    let tagged = read(path)?;

    let mut out = Probe {
        duration_ms: i64::try_from(tagged.properties().duration().as_millis()).ok(),
        ..Probe::default()
    };

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        out.title = non_blank(tag.title());
        out.artist = non_blank(tag.artist());
        out.album = non_blank(tag.album());
    }

    Ok(out)
}

/// Extract the first embedded picture of `path`. Read failures and files
/// without pictures both yield `Artwork::Placeholder`.
pub fn artwork(path: &Path) -> Artwork {
    let tagged = match read(path) {
        Ok(t) => t,
        Err(e) => {
            tracing::debug!(error = %e, "artwork unavailable");
            return Artwork::Placeholder;
        }
    };

    tagged
        .tags()
        .iter()
        .find_map(|tag| tag.pictures().first())
        .map(|pic| Artwork::Embedded {
            mime: pic.mime_type().map(|m| m.as_str().to_string()),
            bytes: pic.data().len(),
        })
        .unwrap_or(Artwork::Placeholder)
}
