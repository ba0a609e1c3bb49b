//! `rodio` implementation of the media backend.
//!
//! The output stream is not `Send`, so the backend has to be built on the
//! thread that uses it (the playback service thread).

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};

use crate::error::PlayerError;
use crate::library::{Locator, LocatorResolver, metadata};

use super::backend::{MediaBackend, MediaPlayer, TrackInfo};

const FADE_STEPS: u64 = 20;

pub struct RodioBackend {
    stream: OutputStream,
    resolver: Arc<dyn LocatorResolver>,
}

impl RodioBackend {
    pub fn open_default(resolver: Arc<dyn LocatorResolver>) -> Result<Self, PlayerError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlayerError::NoOutputDevice(e.to_string()))?;
        // the drop message would land on the TUI's screen
        stream.log_on_drop(false);
        Ok(Self { stream, resolver })
    }

    fn path_of(&self, locator: &Locator) -> Result<PathBuf, PlayerError> {
        self.resolver
            .resolve(locator)
            .ok_or_else(|| PlayerError::Unresolved(locator.clone()))
    }
}

impl MediaBackend for RodioBackend {
    fn open(&mut self, locator: &Locator) -> Result<Box<dyn MediaPlayer>, PlayerError> {
        let path = self.path_of(locator)?;

        let file = File::open(&path).map_err(|source| PlayerError::Open {
            path: path.clone(),
            source,
        })?;
        let source = Decoder::new(BufReader::new(file)).map_err(|e| PlayerError::Decode {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        let duration = metadata::probe(&path)
            .ok()
            .and_then(|p| p.duration_ms)
            .filter(|ms| *ms > 0)
            .map(|ms| Duration::from_millis(ms as u64));

        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        sink.pause();

        Ok(Box::new(RodioPlayer { sink, duration }))
    }

    fn describe(&self, locator: &Locator) -> TrackInfo {
        let Ok(path) = self.path_of(locator) else {
            return TrackInfo::default();
        };
        match metadata::probe(&path) {
            Ok(p) => TrackInfo {
                title: p.title,
                artist: p.artist,
            },
            Err(e) => {
                tracing::debug!(error = %e, "no notification metadata");
                TrackInfo::default()
            }
        }
    }
}

struct RodioPlayer {
    sink: Sink,
    duration: Option<Duration>,
}

impl MediaPlayer for RodioPlayer {
    fn start(&mut self) -> Result<(), PlayerError> {
        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) -> Result<(), PlayerError> {
        self.sink.pause();
        Ok(())
    }

    fn is_playing(&self) -> bool {
        !self.sink.is_paused() && !self.sink.empty()
    }

    fn seek(&mut self, to: Duration) -> Result<(), PlayerError> {
        let to = match self.duration {
            Some(total) => to.min(total),
            None => to,
        };
        self.sink
            .try_seek(to)
            .map_err(|e| PlayerError::Seek(e.to_string()))
    }

    fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn is_finished(&self) -> bool {
        self.sink.empty()
    }

    fn fade_out(&mut self, over: Duration) {
        let fade_out_ms = over.as_millis() as u64;
        if fade_out_ms == 0 || self.sink.is_paused() {
            return;
        }
        let step_ms = (fade_out_ms / FADE_STEPS).max(1);
        let start = self.sink.volume();
        for step in 1..=FADE_STEPS {
            let t = step as f32 / FADE_STEPS as f32;
            self.sink.set_volume(start * (1.0 - t));
            thread::sleep(Duration::from_millis(step_ms));
        }
    }

    fn stop(&mut self) -> Result<(), PlayerError> {
        self.sink.stop();
        Ok(())
    }

    fn release(self: Box<Self>) -> Result<(), PlayerError> {
        self.sink.stop();
        drop(self);
        Ok(())
    }
}
