//! The seam between the controller and whatever actually makes sound.

use std::time::Duration;

use crate::error::PlayerError;
use crate::library::Locator;

/// Title and artist as read from a locator's tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackInfo {
    pub title: Option<String>,
    pub artist: Option<String>,
}

/// Creates player instances for locators.
pub trait MediaBackend {
    /// Open `locator` into a fresh, paused player.
    fn open(&mut self, locator: &Locator) -> Result<Box<dyn MediaPlayer>, PlayerError>;

    /// Read display metadata for `locator`. Missing data is `None`.
    fn describe(&self, locator: &Locator) -> TrackInfo;
}

/// One loaded track.
pub trait MediaPlayer {
    fn start(&mut self) -> Result<(), PlayerError>;
    fn pause(&mut self) -> Result<(), PlayerError>;
    fn is_playing(&self) -> bool;
    fn seek(&mut self, to: Duration) -> Result<(), PlayerError>;
    fn position(&self) -> Duration;
    fn duration(&self) -> Option<Duration>;
    /// True once playback ran off the end of the track.
    fn is_finished(&self) -> bool;

    /// Ramp the volume down before a stop.
    fn fade_out(&mut self, _over: Duration) {}

    fn stop(&mut self) -> Result<(), PlayerError>;
    fn release(self: Box<Self>) -> Result<(), PlayerError>;
}

/// Stand-in used when no real backend could be created, e.g. without an
/// audio device. Every open fails with the original reason.
pub struct UnavailableBackend {
    reason: String,
}

impl UnavailableBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl MediaBackend for UnavailableBackend {
    fn open(&mut self, _locator: &Locator) -> Result<Box<dyn MediaPlayer>, PlayerError> {
        Err(PlayerError::NoOutputDevice(self.reason.clone()))
    }

    fn describe(&self, _locator: &Locator) -> TrackInfo {
        TrackInfo::default()
    }
}
