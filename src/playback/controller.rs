//! The playback state machine.
//!
//! A `Controller` owns the playlist, the cursor and at most one player
//! instance. It is driven one command at a time by the playback service and
//! never reports failures back to whoever sent a command: backend errors are
//! logged here and the transition is skipped.

use std::sync::Arc;
use std::time::Duration;

use crate::error::PlayerError;
use crate::library::Locator;

use super::backend::{MediaBackend, MediaPlayer};
use super::command::Command;
use super::notification::{ContentIntent, NotificationSink, NotificationSnapshot};
use super::types::TransportSnapshot;

/// Wrap `index` into `0..len`: past the end goes to 0, before the start to
/// the last element. `len` must be non-zero.
pub fn wrap_index(index: i64, len: usize) -> usize {
    debug_assert!(len > 0);
    if index < 0 {
        len - 1
    } else if index as u64 >= len as u64 {
        0
    } else {
        index as usize
    }
}

pub struct Controller {
    backend: Box<dyn MediaBackend>,
    notifier: Arc<dyn NotificationSink>,
    playlist: Vec<Locator>,
    index: usize,
    player: Option<Box<dyn MediaPlayer>>,
    generation: u64,
    foreground: bool,
    fade_out: Duration,
}

impl Controller {
    pub fn new(
        backend: Box<dyn MediaBackend>,
        notifier: Arc<dyn NotificationSink>,
        fade_out: Duration,
    ) -> Self {
        Self {
            backend,
            notifier,
            playlist: Vec::new(),
            index: 0,
            player: None,
            generation: 0,
            foreground: false,
            fade_out,
        }
    }

    /// Run one command to completion.
    pub fn handle(&mut self, cmd: Command) {
        let name = cmd.name();
        tracing::debug!(command = name, index = self.index, "handling command");

        let result = match cmd {
            Command::Init { playlist, index } => {
                if playlist.is_empty() {
                    tracing::debug!("INIT with empty playlist ignored");
                    Ok(())
                } else {
                    self.playlist = playlist;
                    self.play_index(index)
                }
            }
            Command::Play => self.start_play(),
            Command::Pause => self.pause_play(),
            Command::Toggle => {
                if self.is_playing() {
                    self.pause_play()
                } else {
                    self.start_play()
                }
            }
            Command::Next => self.play_index(self.index as i64 + 1),
            Command::Prev => self.play_index(self.index as i64 - 1),
            Command::Seek { position_ms } => self.seek_to(position_ms),
            Command::Stop => {
                self.stop();
                Ok(())
            }
            Command::Completed { generation } => {
                if generation == self.generation && self.player.is_some() {
                    self.play_index(self.index as i64 + 1)
                } else {
                    tracing::debug!(generation, current = self.generation, "stale completion");
                    Ok(())
                }
            }
        };

        if let Err(e) = result {
            tracing::warn!(command = name, error = %e, "playback command failed");
        }
    }

    /// `Completed` for the loaded track once it has run out.
    pub fn poll_completion(&self) -> Option<Command> {
        match &self.player {
            Some(p) if p.is_finished() => Some(Command::Completed {
                generation: self.generation,
            }),
            _ => None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.player.as_ref().is_some_and(|p| p.is_playing())
    }

    pub fn snapshot(&self) -> TransportSnapshot {
        let loaded = !self.playlist.is_empty();
        let (position_ms, duration_ms) = match &self.player {
            Some(p) => (
                p.position().as_millis() as i64,
                p.duration().map_or(0, |d| d.as_millis() as i64),
            ),
            None => (0, 0),
        };
        TransportSnapshot {
            index: loaded.then_some(self.index),
            locator: self.playlist.get(self.index).cloned(),
            playlist_len: self.playlist.len(),
            is_playing: self.is_playing(),
            position_ms,
            duration_ms,
            foreground: self.foreground,
            generation: self.generation,
        }
    }

    /// Release everything on the way out of the process.
    pub fn shutdown(&mut self) {
        self.stop();
    }

    fn play_index(&mut self, index: i64) -> Result<(), PlayerError> {
        if self.playlist.is_empty() {
            return Ok(());
        }
        self.index = wrap_index(index, self.playlist.len());
        self.release_player();

        let locator = self.playlist[self.index].clone();
        let player = match self.backend.open(&locator) {
            Ok(player) => player,
            Err(e) => {
                // the old track is gone; show the failed slot as paused
                self.post_notification();
                return Err(e);
            }
        };
        self.player = Some(player);
        self.generation += 1;
        self.foreground = true;
        tracing::debug!(index = self.index, %locator, generation = self.generation, "track loaded");

        self.start_play()
    }

    fn start_play(&mut self) -> Result<(), PlayerError> {
        let Some(player) = self.player.as_mut() else {
            return Ok(());
        };
        let started = player.start();
        self.post_notification();
        started
    }

    fn pause_play(&mut self) -> Result<(), PlayerError> {
        let Some(player) = self.player.as_mut() else {
            return Ok(());
        };
        let paused = player.pause();
        self.post_notification();
        paused
    }

    fn seek_to(&mut self, position_ms: i64) -> Result<(), PlayerError> {
        let Some(player) = self.player.as_mut() else {
            return Ok(());
        };
        player.seek(Duration::from_millis(position_ms.max(0) as u64))
    }

    fn stop(&mut self) {
        if self.foreground {
            self.notifier.remove();
            self.foreground = false;
        }
        if let Some(player) = self.player.as_mut() {
            player.fade_out(self.fade_out);
        }
        self.release_player();
        self.playlist.clear();
        self.index = 0;
    }

    /// Stop then release the held player. Failures are logged, never raised.
    fn release_player(&mut self) {
        let Some(mut player) = self.player.take() else {
            return;
        };
        if let Err(e) = player.stop() {
            tracing::warn!(error = %e, "player stop failed");
        }
        if let Err(e) = player.release() {
            tracing::warn!(error = %e, "player release failed");
        }
    }

    fn post_notification(&self) {
        if !self.foreground {
            return;
        }
        let locator = self.playlist.get(self.index);
        let info = locator
            .map(|l| self.backend.describe(l))
            .unwrap_or_default();
        let notification = NotificationSnapshot::new(
            info.title,
            info.artist,
            self.is_playing(),
            ContentIntent {
                playlist: self.playlist.clone(),
                index: self.index,
            },
        );
        self.notifier.post(&notification);
    }
}
