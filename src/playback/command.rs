use crate::library::Locator;

/// Transport commands accepted by the playback service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the playlist and start the track at `index`. Out-of-range
    /// indices wrap: past the end goes to the first track, negative to the last.
    Init { playlist: Vec<Locator>, index: i64 },
    Play,
    Pause,
    /// Pause when playing, play otherwise.
    Toggle,
    Next,
    Prev,
    /// Move the playhead. Negative positions clamp to the start.
    Seek { position_ms: i64 },
    /// Leave the foreground, release the player and forget the playlist.
    Stop,
    /// The track loaded as `generation` reached its natural end. Raised by
    /// the service itself; stale generations are ignored.
    Completed { generation: u64 },
}

impl Command {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init { .. } => "INIT",
            Self::Play => "PLAY",
            Self::Pause => "PAUSE",
            Self::Toggle => "TOGGLE",
            Self::Next => "NEXT",
            Self::Prev => "PREV",
            Self::Seek { .. } => "SEEK",
            Self::Stop => "STOP",
            Self::Completed { .. } => "COMPLETED",
        }
    }
}
