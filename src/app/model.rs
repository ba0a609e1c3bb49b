//! Application model types: `App`, `View` and the status line.
//!
//! The `App` struct holds the rendered library, the player screen (while a
//! track has been opened) and the transient UI state around them.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::error::LibraryError;
use crate::library::{TrackDescriptor, TrackListPresenter};
use crate::playback::Command;
use crate::playback::notification::ContentIntent;
use crate::screen::PlaybackScreen;

/// Which view fills the main area.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Library,
    Player,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// A one-shot message on the status line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub kind: StatusKind,
    expires_at: Instant,
}

/// The main application model.
pub struct App {
    pub view: View,
    pub presenter: TrackListPresenter,
    pub screen: Option<PlaybackScreen>,
    /// Folder the list was loaded from; `None` for the default library.
    pub current_dir: Option<PathBuf>,
    /// Folder prompt input while the prompt is open.
    pub prompt: Option<String>,
    /// Details popup for the row under the cursor.
    pub details: bool,

    status: Option<Status>,
    status_timeout: Duration,
    tick_interval: Duration,
}

impl App {
    pub fn new(presenter: TrackListPresenter, status_timeout: Duration, tick_interval: Duration) -> Self {
        Self {
            view: View::Library,
            presenter,
            screen: None,
            current_dir: None,
            prompt: None,
            details: false,
            status: None,
            status_timeout,
            tick_interval,
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.set_status_at(text, kind, Instant::now());
    }

    pub fn set_status_at(&mut self, text: impl Into<String>, kind: StatusKind, now: Instant) {
        self.status = Some(Status {
            text: text.into(),
            kind,
            expires_at: now + self.status_timeout,
        });
    }

    /// The status message, unless it has timed out by `now`.
    pub fn status_at(&self, now: Instant) -> Option<&Status> {
        self.status.as_ref().filter(|s| s.expires_at > now)
    }

    /// Drop an expired status message.
    pub fn expire_status(&mut self, now: Instant) {
        if self.status.as_ref().is_some_and(|s| s.expires_at <= now) {
            self.status = None;
        }
    }

    /// Replace the list with the outcome of a library load. The old list is
    /// cleared first, so a failed load leaves the empty state behind.
    pub fn apply_load(
        &mut self,
        result: Result<Vec<TrackDescriptor>, LibraryError>,
        source: Option<PathBuf>,
    ) {
        self.presenter.clear();
        self.details = false;
        match result {
            Ok(list) => {
                let n = list.len();
                self.presenter.render(list);
                self.current_dir = source;
                tracing::info!(songs = n, "library loaded");
                if n > 0 {
                    self.set_status(format!("Loaded {n} songs"), StatusKind::Info);
                }
            }
            Err(LibraryError::PermissionDenied(path)) => {
                tracing::error!(path = %path.display(), "permission denied loading library");
                self.set_status(
                    format!(
                        "Permission denied. Cannot access music files in {}. Press R to retry.",
                        path.display()
                    ),
                    StatusKind::Error,
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "library load failed");
                self.set_status(format!("Error loading music files: {e}"), StatusKind::Error);
            }
        }
    }

    /// Open the player view on list entry `index` and start it. Returns the
    /// command to dispatch, or `None` for an index outside the list.
    pub fn open_track(&mut self, index: usize) -> Option<Command> {
        if index >= self.presenter.len() {
            return None;
        }
        let playlist = self
            .presenter
            .tracks()
            .iter()
            .map(|t| t.locator().clone())
            .collect();

        let mut screen = PlaybackScreen::new(playlist, index, self.tick_interval);
        let cmd = screen.play_index(index);
        self.screen = Some(screen);
        self.view = View::Player;
        cmd
    }

    /// Bring up the player view on what the notification shows, without
    /// restarting playback.
    pub fn raise(&mut self, content: ContentIntent) {
        let same_track = self
            .screen
            .as_ref()
            .is_some_and(|s| s.playlist() == content.playlist.as_slice() && s.index() == content.index);
        if !same_track {
            self.screen = Some(PlaybackScreen::new(
                content.playlist,
                content.index,
                self.tick_interval,
            ));
        }
        self.view = View::Player;
    }

    /// Switch between list and player. Only possible once a track was opened.
    pub fn toggle_view(&mut self) {
        self.view = match self.view {
            View::Library if self.screen.is_some() => View::Player,
            _ => View::Library,
        };
    }

    pub fn toggle_details(&mut self) {
        self.details = !self.details && !self.presenter.is_empty();
    }

    /// Forget the player screen after a stop.
    pub fn close_player(&mut self) {
        self.screen = None;
        self.view = View::Library;
    }

    pub fn open_prompt(&mut self) {
        let seed = self
            .current_dir
            .as_ref()
            .map(|d| d.display().to_string())
            .unwrap_or_default();
        self.prompt = Some(seed);
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    pub fn push_prompt_char(&mut self, c: char) {
        if let Some(p) = self.prompt.as_mut() {
            p.push(c);
        }
    }

    pub fn pop_prompt_char(&mut self) {
        if let Some(p) = self.prompt.as_mut() {
            p.pop();
        }
    }

    /// Close the prompt and return the folder it names. A leading `~` is
    /// expanded to `home`. Blank input yields `None`.
    pub fn submit_prompt(&mut self, home: Option<PathBuf>) -> Option<PathBuf> {
        let input = self.prompt.take()?;
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        let rest = if input == "~" {
            Some("")
        } else {
            input.strip_prefix("~/")
        };
        match (rest, home) {
            (Some(rest), Some(home)) => Some(home.join(rest)),
            _ => Some(PathBuf::from(input)),
        }
    }
}
