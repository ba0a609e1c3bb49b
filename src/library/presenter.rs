use std::ops::Range;
use std::sync::Arc;
use std::sync::mpsc::Sender;

use super::index::LocatorResolver;
use super::metadata::{self, Artwork};
use super::model::TrackDescriptor;

/// One rendered list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRow {
    pub title: String,
    pub artist: String,
    pub duration: String,
    /// `None` until the row has been visible once.
    pub artwork: Option<Artwork>,
}

pub enum PresenterView<'a> {
    Empty,
    Populated(&'a [TrackRow]),
}

/// Projects an ordered list of descriptors into rows and reports
/// selections to a listener.
pub struct TrackListPresenter {
    tracks: Vec<TrackDescriptor>,
    rows: Vec<TrackRow>,
    selected: usize,
    listener: Option<Sender<usize>>,
    resolver: Arc<dyn LocatorResolver>,
}

impl TrackListPresenter {
    pub fn new(resolver: Arc<dyn LocatorResolver>) -> Self {
        Self {
            tracks: Vec::new(),
            rows: Vec::new(),
            selected: 0,
            listener: None,
            resolver,
        }
    }

    pub fn set_listener(&mut self, listener: Sender<usize>) {
        self.listener = Some(listener);
    }

    /// Replace the rendered list. Artwork is loaded later, per visible row.
    pub fn render(&mut self, list: Vec<TrackDescriptor>) {
        self.rows = list
            .iter()
            .map(|t| TrackRow {
                title: t.title().to_string(),
                artist: t.artist().to_string(),
                duration: t.formatted_duration(),
                artwork: None,
            })
            .collect();
        self.tracks = list;
        self.selected = 0;
    }

    pub fn clear(&mut self) {
        self.render(Vec::new());
    }

    /// Report `index` to the listener. Returns `false` for an index outside
    /// the rendered list or when nobody is listening.
    pub fn on_item_selected(&self, index: usize) -> bool {
        if index >= self.rows.len() {
            return false;
        }
        match &self.listener {
            Some(tx) => tx.send(index).is_ok(),
            None => false,
        }
    }

    /// Report the row under the cursor.
    pub fn select_current(&self) -> bool {
        self.on_item_selected(self.selected)
    }

    pub fn view(&self) -> PresenterView<'_> {
        if self.rows.is_empty() {
            PresenterView::Empty
        } else {
            PresenterView::Populated(&self.rows)
        }
    }

    pub fn tracks(&self) -> &[TrackDescriptor] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Move the cursor down, wrapping to the top.
    pub fn select_next(&mut self) {
        if !self.rows.is_empty() {
            self.selected = (self.selected + 1) % self.rows.len();
        }
    }

    /// Move the cursor up, wrapping to the bottom.
    pub fn select_prev(&mut self) {
        if !self.rows.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.rows.len() - 1);
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }

    /// Window of rows to draw in `height` lines, keeping the cursor centered
    /// when possible. Returns the range and the cursor's offset inside it.
    pub fn visible_window(&self, height: usize) -> (Range<usize>, usize) {
        let total = self.rows.len();
        let sel = self.selected.min(total.saturating_sub(1));
        if total <= height || height == 0 {
            return (0..total, sel);
        }
        let half = height / 2;
        let mut start = sel.saturating_sub(half);
        if start + height > total {
            start = total - height;
        }
        (start..start + height, sel - start)
    }

    /// Load artwork for rows in `range` that have not been loaded yet.
    pub fn load_artwork(&mut self, range: Range<usize>) {
        let end = range.end.min(self.rows.len());
        for i in range.start.min(end)..end {
            if self.rows[i].artwork.is_some() {
                continue;
            }
            let art = match self.resolver.resolve(self.tracks[i].locator()) {
                Some(path) => metadata::artwork(&path),
                None => Artwork::Placeholder,
            };
            self.rows[i].artwork = Some(art);
        }
    }
}
