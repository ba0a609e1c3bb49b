use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::LibrarySettings;
use crate::error::LibraryError;

use super::index::{ContentRegistry, FsMediaIndex, IndexQuery, IndexRow, MediaIndex};
use super::model::{Locator, TrackDescriptor};

/// Turns media index rows into track descriptors.
pub struct LibraryLoader {
    default_index: Box<dyn MediaIndex + Send>,
    settings: LibrarySettings,
    registry: Arc<ContentRegistry>,
}

impl LibraryLoader {
    pub fn new(
        default_index: Box<dyn MediaIndex + Send>,
        settings: LibrarySettings,
        registry: Arc<ContentRegistry>,
    ) -> Self {
        Self {
            default_index,
            settings,
            registry,
        }
    }

    /// Loader whose default library is the folder `root` on disk.
    pub fn for_root(root: PathBuf, settings: LibrarySettings, registry: Arc<ContentRegistry>) -> Self {
        let index = FsMediaIndex::new(root, settings.clone(), registry.clone());
        Self::new(Box::new(index), settings, registry)
    }

    /// Every music row of the default index, sorted by title.
    pub fn load_default(&self) -> Result<Vec<TrackDescriptor>, LibraryError> {
        load_from_index(self.default_index.as_ref())
    }

    /// Every music row under `dir`, sorted by title. The folder is scanned
    /// with the same rules as the default library.
    pub fn load_from_directory(&self, dir: &Path) -> Result<Vec<TrackDescriptor>, LibraryError> {
        let index = FsMediaIndex::new(dir.to_path_buf(), self.settings.clone(), self.registry.clone());
        load_from_index(&index)
    }
}

fn load_from_index(index: &dyn MediaIndex) -> Result<Vec<TrackDescriptor>, LibraryError> {
    let rows = index.query(&IndexQuery::music_by_title())?;
    Ok(rows
        .into_iter()
        .map(|row| descriptor_from_row(index.namespace(), row))
        .collect())
}

pub fn descriptor_from_row(namespace: &str, row: IndexRow) -> TrackDescriptor {
    TrackDescriptor::new(
        row.title,
        row.artist,
        row.album,
        row.duration_ms.unwrap_or(0),
        Locator::indexed(namespace, row.id),
        row.file_path,
    )
}
