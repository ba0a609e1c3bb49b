use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Sends a copy of a message every `interval` until dropped.
///
/// Dropping the ticker signals its thread and waits for it, so no tick is
/// delivered after the drop returns.
pub struct Ticker {
    stop: Option<Sender<()>>,
    join: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn start<T>(interval: Duration, tx: Sender<T>, msg: T) -> Self
    where
        T: Clone + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let interval = interval.max(Duration::from_millis(1));

        let join = thread::Builder::new()
            .name("ticker".to_string())
            .spawn(move || {
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            if tx.send(msg.clone()).is_err() {
                                break;
                            }
                        }
                        // stop signal or the ticker was dropped
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            });

        let join = match join {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!(error = %e, "failed to spawn ticker thread");
                None
            }
        };

        Self {
            stop: Some(stop_tx),
            join,
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.join.take() {
            let _ = handle.join();
        }
    }
}
