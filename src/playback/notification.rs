//! Now-playing notification: what it shows and where it is posted.

use crate::library::Locator;

use super::command::Command;

pub const DEFAULT_TITLE: &str = "Playing";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportIcon {
    Previous,
    Play,
    Pause,
    Next,
}

/// A button on the notification and the command it feeds back into the
/// playback service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationAction {
    pub label: &'static str,
    pub icon: TransportIcon,
    pub command: Command,
}

/// What opening the notification brings up: the player screen on this
/// playlist and track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentIntent {
    pub playlist: Vec<Locator>,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationSnapshot {
    pub title: String,
    pub artist: String,
    pub playing: bool,
    /// Ongoing notifications cannot be dismissed; tracks `playing`.
    pub ongoing: bool,
    pub actions: Vec<NotificationAction>,
    pub content: ContentIntent,
}

impl NotificationSnapshot {
    pub fn new(
        title: Option<String>,
        artist: Option<String>,
        playing: bool,
        content: ContentIntent,
    ) -> Self {
        let toggle = if playing {
            NotificationAction {
                label: "Pause",
                icon: TransportIcon::Pause,
                command: Command::Toggle,
            }
        } else {
            NotificationAction {
                label: "Play",
                icon: TransportIcon::Play,
                command: Command::Toggle,
            }
        };

        Self {
            title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            artist: artist.unwrap_or_default(),
            playing,
            ongoing: playing,
            actions: vec![
                NotificationAction {
                    label: "Prev",
                    icon: TransportIcon::Previous,
                    command: Command::Prev,
                },
                toggle,
                NotificationAction {
                    label: "Next",
                    icon: TransportIcon::Next,
                    command: Command::Next,
                },
            ],
            content,
        }
    }

    /// Expanded text: `title - artist`.
    pub fn big_text(&self) -> String {
        format!("{} - {}", self.title, self.artist)
    }
}

/// Somewhere to show the notification.
pub trait NotificationSink: Send + Sync {
    /// Show or replace the notification.
    fn post(&self, notification: &NotificationSnapshot);
    /// Take the notification down.
    fn remove(&self);
}
