use std::time::Duration;

use crate::library::metadata::{self, Artwork};
use crate::library::{Locator, LocatorResolver, UNKNOWN_ARTIST, UNKNOWN_TITLE};
use crate::playback::{Command, TransportSnapshot};

/// Title, artist, duration and art for the track on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongInfo {
    pub title: String,
    pub artist: String,
    /// `0` when the duration could not be read.
    pub duration_ms: i64,
    pub artwork: Artwork,
}

impl Default for SongInfo {
    fn default() -> Self {
        Self {
            title: UNKNOWN_TITLE.to_string(),
            artist: UNKNOWN_ARTIST.to_string(),
            duration_ms: 0,
            artwork: Artwork::Placeholder,
        }
    }
}

impl SongInfo {
    /// Read display metadata for `locator`. Anything that cannot be read
    /// falls back to the unknown placeholders.
    pub fn probe(resolver: &dyn LocatorResolver, locator: &Locator) -> Self {
        let Some(path) = resolver.resolve(locator) else {
            tracing::debug!(%locator, "no file behind locator");
            return Self::default();
        };

        match metadata::probe(&path) {
            Ok(p) => Self {
                title: p.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
                artist: p.artist.unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
                duration_ms: p.duration_ms.unwrap_or(0).max(0),
                artwork: metadata::artwork(&path),
            },
            Err(e) => {
                tracing::debug!(error = %e, "song info unavailable");
                Self::default()
            }
        }
    }
}

/// Local model of the player view.
///
/// The screen keeps its own copy of the playlist and cursor and updates
/// them optimistically when the user acts, returning the command to send.
/// Snapshots published by the playback service are folded back in with
/// [`PlaybackScreen::reconcile`] so the two views never drift for long.
pub struct PlaybackScreen {
    playlist: Vec<Locator>,
    index: usize,
    song: SongInfo,
    /// False until song info has been installed for the current track.
    song_loaded: bool,
    is_playing: bool,
    position_ms: i64,
    total_ms: i64,
    seeking: bool,
    seek_preview_ms: i64,
    art_frame: usize,
    /// Track requested by the last `play_index`, until the service reports it.
    pending: Option<Locator>,
    tick_interval: Duration,
}

impl PlaybackScreen {
    pub fn new(playlist: Vec<Locator>, index: usize, tick_interval: Duration) -> Self {
        Self {
            playlist,
            index,
            song: SongInfo::default(),
            song_loaded: false,
            is_playing: false,
            position_ms: 0,
            total_ms: 0,
            seeking: false,
            seek_preview_ms: 0,
            art_frame: 0,
            pending: None,
            tick_interval,
        }
    }

    pub fn playlist(&self) -> &[Locator] {
        &self.playlist
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn locator(&self) -> Option<&Locator> {
        self.playlist.get(self.index)
    }

    pub fn song(&self) -> &SongInfo {
        &self.song
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_seeking(&self) -> bool {
        self.seeking
    }

    pub fn position_ms(&self) -> i64 {
        self.position_ms
    }

    /// Position to draw: the drag preview while seeking.
    pub fn displayed_position_ms(&self) -> i64 {
        if self.seeking {
            self.seek_preview_ms
        } else {
            self.position_ms
        }
    }

    pub fn total_ms(&self) -> i64 {
        self.total_ms
    }

    pub fn art_frame(&self) -> usize {
        self.art_frame
    }

    /// Whether the tick source should be running.
    pub fn wants_ticks(&self) -> bool {
        self.is_playing && !self.seeking
    }

    /// The current track, if its song info still has to be probed.
    pub fn needs_song_info(&self) -> Option<&Locator> {
        if self.song_loaded {
            None
        } else {
            self.locator()
        }
    }

    /// Install freshly probed song info for the current track.
    pub fn set_song_info(&mut self, song: SongInfo) {
        if song.duration_ms > 0 {
            self.total_ms = song.duration_ms;
        }
        self.song = song;
        self.song_loaded = true;
    }

    /// Start `index` from the beginning. Out-of-range indices are ignored.
    pub fn play_index(&mut self, index: usize) -> Option<Command> {
        let locator = self.playlist.get(index)?.clone();

        self.index = index;
        self.song = SongInfo::default();
        self.song_loaded = false;
        self.position_ms = 0;
        self.total_ms = 0;
        self.seeking = false;
        self.is_playing = true;
        self.pending = Some(locator);

        Some(Command::Init {
            playlist: self.playlist.clone(),
            index: index as i64,
        })
    }

    /// Flip play/pause locally and ask the service to follow.
    pub fn toggle(&mut self) -> Command {
        self.is_playing = !self.is_playing;
        Command::Toggle
    }

    pub fn next(&mut self) -> Option<Command> {
        if self.playlist.is_empty() {
            return None;
        }
        let next = (self.index + 1) % self.playlist.len();
        self.play_index(next)
    }

    pub fn prev(&mut self) -> Option<Command> {
        if self.playlist.is_empty() {
            return None;
        }
        let prev = self
            .index
            .checked_sub(1)
            .unwrap_or(self.playlist.len() - 1);
        self.play_index(prev)
    }

    /// Grab the seek bar. Ticks are suspended until it is released.
    pub fn begin_seek(&mut self) {
        if !self.seeking {
            self.seeking = true;
            self.seek_preview_ms = self.position_ms;
        }
    }

    /// Move the seek preview by `delta_ms`, clamped to the track.
    pub fn drag_seek(&mut self, delta_ms: i64) {
        if self.seeking {
            self.seek_preview_ms = self.seek_preview_ms.saturating_add(delta_ms).clamp(0, self.total_ms.max(0));
        }
    }

    /// Release the seek bar at the preview position.
    pub fn end_seek(&mut self) -> Option<Command> {
        if !self.seeking {
            return None;
        }
        self.seeking = false;
        self.position_ms = self.seek_preview_ms;
        Some(Command::Seek {
            position_ms: self.position_ms,
        })
    }

    pub fn cancel_seek(&mut self) {
        self.seeking = false;
    }

    /// One tick of the progress timer.
    ///
    /// With an accepted snapshot the screen adopts it; otherwise the local
    /// position moves forward by one interval, never past the end. Returns
    /// `true` when the service moved to another track and the song info
    /// needs to be reloaded.
    pub fn tick(&mut self, observed: Option<&TransportSnapshot>) -> bool {
        if !self.wants_ticks() {
            return false;
        }
        self.art_frame = self.art_frame.wrapping_add(1);

        if let Some(snapshot) = observed {
            if self.accepts(snapshot) {
                return self.reconcile(snapshot);
            }
        }

        if self.total_ms > 0 {
            let step = self.tick_interval.as_millis() as i64;
            self.position_ms = (self.position_ms + step).min(self.total_ms);
        }
        false
    }

    /// Adopt the service's view of the transport. Snapshots describing a
    /// track other than the one just requested, or a playlist this screen
    /// does not own, are ignored. Returns `true` when the cursor moved.
    pub fn reconcile(&mut self, snapshot: &TransportSnapshot) -> bool {
        if !self.accepts(snapshot) {
            return false;
        }
        self.pending = None;

        let (Some(index), Some(_)) = (snapshot.index, snapshot.locator.as_ref()) else {
            // stopped
            self.is_playing = false;
            self.seeking = false;
            self.position_ms = 0;
            return false;
        };

        let moved = index != self.index;
        if moved {
            self.index = index;
            self.song = SongInfo::default();
            self.song_loaded = false;
            self.total_ms = 0;
        }

        self.is_playing = snapshot.is_playing;
        if snapshot.duration_ms > 0 {
            self.total_ms = snapshot.duration_ms;
        }
        if !self.seeking {
            self.position_ms = snapshot.position_ms.clamp(0, self.total_ms.max(0));
        }
        moved
    }

    /// Only the requested track while a request is in flight; afterwards
    /// anything on this screen's playlist, or a stopped service.
    fn accepts(&self, snapshot: &TransportSnapshot) -> bool {
        let Some(observed) = &snapshot.locator else {
            return self.pending.is_none();
        };
        let on_playlist = snapshot.index.and_then(|i| self.playlist.get(i)) == Some(observed);
        match &self.pending {
            Some(requested) => on_playlist && observed == requested,
            None => on_playlist,
        }
    }
}
