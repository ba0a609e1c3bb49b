use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::config::PlaybackSettings;
use crate::error::PlayerError;

use super::backend::{MediaBackend, UnavailableBackend};
use super::command::Command;
use super::controller::Controller;
use super::notification::NotificationSink;
use super::types::{TransportHandle, TransportSnapshot};

/// Handle to the playback thread.
///
/// Commands are queued on a channel and run one at a time by a single
/// `Controller`. Track completion is detected on the same thread and fed
/// through the controller like any other command, so it can never interleave
/// with a transition in progress.
pub struct PlaybackService {
    tx: Option<Sender<Command>>,
    transport: TransportHandle,
    join: Option<JoinHandle<()>>,
}

impl PlaybackService {
    /// Start the service thread. `make_backend` runs on that thread; if it
    /// fails the service keeps accepting commands but cannot play anything.
    pub fn spawn<F>(
        make_backend: F,
        notifier: Arc<dyn NotificationSink>,
        settings: PlaybackSettings,
    ) -> Self
    where
        F: FnOnce() -> Result<Box<dyn MediaBackend>, PlayerError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Command>();
        let transport: TransportHandle = Arc::new(Mutex::new(TransportSnapshot::default()));

        let transport_for_thread = transport.clone();
        let join = thread::Builder::new()
            .name("playback".to_string())
            .spawn(move || {
                let backend = make_backend().unwrap_or_else(|e| -> Box<dyn MediaBackend> {
                    tracing::error!(error = %e, "audio backend unavailable");
                    Box::new(UnavailableBackend::new(e.to_string()))
                });
                let controller = Controller::new(
                    backend,
                    notifier,
                    Duration::from_millis(settings.stop_fade_out_ms),
                );
                run(
                    controller,
                    rx,
                    transport_for_thread,
                    Duration::from_millis(settings.poll_interval_ms.max(1)),
                );
            });

        let join = match join {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!(error = %e, "failed to spawn playback thread");
                None
            }
        };

        Self {
            tx: Some(tx),
            transport,
            join,
        }
    }

    /// Queue `cmd`. There is no reply; observe the outcome via `snapshot`.
    pub fn dispatch(&self, cmd: Command) {
        let Some(tx) = &self.tx else {
            return;
        };
        if let Err(e) = tx.send(cmd) {
            tracing::warn!(command = e.0.name(), "playback service is gone");
        }
    }

    pub fn snapshot(&self) -> TransportSnapshot {
        match self.transport.lock() {
            Ok(s) => s.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Close the queue, let the thread release the player, and wait for it.
    pub fn shutdown(&mut self) {
        self.tx.take();
        if let Some(handle) = self.join.take() {
            if handle.join().is_err() {
                tracing::error!("playback thread panicked");
            }
        }
    }
}

impl Drop for PlaybackService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn publish(transport: &TransportHandle, controller: &Controller) {
    let snapshot = controller.snapshot();
    match transport.lock() {
        Ok(mut s) => *s = snapshot,
        Err(poisoned) => *poisoned.into_inner() = snapshot,
    }
}

fn run(
    mut controller: Controller,
    rx: Receiver<Command>,
    transport: TransportHandle,
    poll_interval: Duration,
) {
    loop {
        match rx.recv_timeout(poll_interval) {
            Ok(cmd) => controller.handle(cmd),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        // periodic check for auto-advance
        if let Some(completed) = controller.poll_completion() {
            controller.handle(completed);
        }

        publish(&transport, &controller);
    }

    controller.shutdown();
    publish(&transport, &controller);
    tracing::debug!("playback service stopped");
}
