//! State the playback service publishes for observers.

use std::sync::{Arc, Mutex};

use crate::library::Locator;

/// Authoritative transport state, refreshed after every command and on
/// every service poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportSnapshot {
    /// Cursor into the controller's playlist, if one is loaded.
    pub index: Option<usize>,
    /// Locator at the cursor.
    pub locator: Option<Locator>,
    pub playlist_len: usize,
    pub is_playing: bool,
    pub position_ms: i64,
    pub duration_ms: i64,
    /// Whether the notification surface is currently shown.
    pub foreground: bool,
    /// Bumped each time a track is loaded.
    pub generation: u64,
}

pub type TransportHandle = Arc<Mutex<TransportSnapshot>>;
