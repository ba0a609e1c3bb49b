//! Filesystem-backed media index.
//!
//! The index walks a music folder, reads tags for every audio file and hands
//! out rows with stable numeric ids. Ids are issued by a process-wide
//! [`ContentRegistry`], which is also what turns an indexed [`Locator`] back
//! into a file path for the audio backend.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::LibraryError;

use super::metadata;
use super::model::Locator;

/// Content namespace of every locator issued by the registry.
pub const CONTENT_NAMESPACE: &str = "library://audio/media";

/// One row of the media index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    pub id: u64,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_ms: Option<i64>,
    pub file_path: PathBuf,
    pub is_music: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Case-insensitive title, rows without a title first, ties by path.
    TitleAscending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexQuery {
    pub music_only: bool,
    pub order: SortOrder,
}

impl IndexQuery {
    /// All rows flagged as music, sorted by title.
    pub const fn music_by_title() -> Self {
        Self {
            music_only: true,
            order: SortOrder::TitleAscending,
        }
    }
}

/// A read-only source of audio rows.
pub trait MediaIndex {
    /// Namespace used to build locators for this index's rows.
    fn namespace(&self) -> &str;

    fn query(&self, query: &IndexQuery) -> Result<Vec<IndexRow>, LibraryError>;
}

/// Maps a locator to the file it stands for.
pub trait LocatorResolver: Send + Sync {
    fn resolve(&self, locator: &Locator) -> Option<PathBuf>;
}

#[derive(Debug, Default)]
struct RegistryInner {
    ids: HashMap<PathBuf, u64>,
    paths: Vec<PathBuf>,
}

/// Issues stable ids for paths. An id, once issued, keeps naming the same
/// path for the life of the process, across reloads.
#[derive(Debug, Default)]
pub struct ContentRegistry {
    inner: RwLock<RegistryInner>,
}

impl ContentRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn id_for(&self, path: &Path) -> u64 {
        if let Ok(inner) = self.inner.read() {
            if let Some(&id) = inner.ids.get(path) {
                return id;
            }
        }
        let mut inner = match self.inner.write() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(&id) = inner.ids.get(path) {
            return id;
        }
        let id = inner.paths.len() as u64;
        inner.paths.push(path.to_path_buf());
        inner.ids.insert(path.to_path_buf(), id);
        id
    }

    pub fn path_for(&self, id: u64) -> Option<PathBuf> {
        let inner = self.inner.read().ok()?;
        usize::try_from(id)
            .ok()
            .and_then(|i| inner.paths.get(i))
            .cloned()
    }
}

impl LocatorResolver for ContentRegistry {
    fn resolve(&self, locator: &Locator) -> Option<PathBuf> {
        match locator {
            Locator::Indexed { namespace, id } if namespace.as_ref() == CONTENT_NAMESPACE => {
                self.path_for(*id)
            }
            Locator::Indexed { .. } => None,
            Locator::File(path) => Some(path.clone()),
        }
    }
}

/// Media index over one folder on disk.
pub struct FsMediaIndex {
    root: PathBuf,
    settings: LibrarySettings,
    registry: Arc<ContentRegistry>,
}

impl FsMediaIndex {
    pub fn new(root: PathBuf, settings: LibrarySettings, registry: Arc<ContentRegistry>) -> Self {
        Self {
            root,
            settings,
            registry,
        }
    }

    fn check_root(&self) -> Result<(), LibraryError> {
        match std::fs::read_dir(&self.root) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                Err(LibraryError::PermissionDenied(self.root.clone()))
            }
            Err(_) => Err(LibraryError::RootMissing(self.root.clone())),
        }
    }

    fn is_music(&self, path: &Path) -> bool {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        let Some(parent) = rel.parent() else {
            return true;
        };
        !parent.components().any(|c| {
            let name = c.as_os_str().to_string_lossy();
            self.settings
                .non_music_dirs
                .iter()
                .any(|d| d.trim().eq_ignore_ascii_case(&name))
        })
    }

    fn row_for(&self, path: &Path) -> IndexRow {
        let probe = metadata::probe(path).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "indexing without tags");
            metadata::Probe::default()
        });

        IndexRow {
            id: self.registry.id_for(path),
            title: probe.title,
            artist: probe.artist,
            album: probe.album,
            duration_ms: probe.duration_ms,
            file_path: path.to_path_buf(),
            is_music: self.is_music(path),
        }
    }
}

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            settings
                .extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.'))
                .filter(|e| !e.is_empty())
                .any(|e| e.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn compare_titles(a: &IndexRow, b: &IndexRow) -> Ordering {
    let key = |r: &IndexRow| r.title.as_ref().map(|t| t.to_lowercase());
    key(a)
        .cmp(&key(b))
        .then_with(|| a.file_path.cmp(&b.file_path))
}

impl MediaIndex for FsMediaIndex {
    fn namespace(&self) -> &str {
        CONTENT_NAMESPACE
    }

    fn query(&self, query: &IndexQuery) -> Result<Vec<IndexRow>, LibraryError> {
        self.check_root()?;

        let mut walker = WalkDir::new(&self.root).follow_links(self.settings.follow_links);

        // Non-recursive = only the root directory.
        let depth_cap = if self.settings.recursive {
            self.settings.max_depth
        } else {
            Some(1)
        };
        if let Some(d) = depth_cap {
            walker = walker.max_depth(d);
        }

        let include_hidden = self.settings.include_hidden;
        let mut rows = Vec::new();
        for entry in walker
            .into_iter()
            .filter_entry(|e| include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() || !is_audio_file(path, &self.settings) {
                continue;
            }

            let row = self.row_for(path);
            if query.music_only && !row.is_music {
                continue;
            }
            rows.push(row);
        }

        match query.order {
            SortOrder::TitleAscending => rows.sort_by(compare_titles),
        }

        tracing::debug!(root = %self.root.display(), rows = rows.len(), "index query");
        Ok(rows)
    }
}
