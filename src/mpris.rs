use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};

use async_io::{Timer, block_on};
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedValue, Value};

use crate::playback::notification::{ContentIntent, NotificationSink, NotificationSnapshot};
use crate::playback::Command;

/// Requests arriving from the desktop's media controls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    /// Bring the player view up on the notification's playlist and track.
    Raise(ContentIntent),
    Transport(Command),
}

#[derive(Debug, Default)]
struct SharedState {
    /// Set while a notification is posted.
    active: bool,
    playing: bool,
    title: Option<String>,
    artist: Option<String>,
    content: Option<ContentIntent>,
    /// Commands offered by the notification's buttons.
    actions: Vec<Command>,
}

impl SharedState {
    fn offers(&self, cmd: &Command) -> bool {
        self.actions.contains(cmd)
    }
}

/// The now-playing notification, exposed over MPRIS.
pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

impl NotificationSink for MprisHandle {
    fn post(&self, notification: &NotificationSnapshot) {
        let buttons: Vec<String> = notification
            .actions
            .iter()
            .map(|a| format!("{:?}:{}", a.icon, a.label))
            .collect();
        tracing::debug!(
            text = %notification.big_text(),
            ongoing = notification.ongoing,
            ?buttons,
            "mpris: post"
        );
        if let Ok(mut s) = self.state.lock() {
            s.active = true;
            s.playing = notification.playing;
            s.actions = notification.actions.iter().map(|a| a.command.clone()).collect();
            s.title = Some(notification.title.clone());
            s.artist = Some(notification.artist.clone()).filter(|a| !a.is_empty());
            s.content = Some(notification.content.clone());
        }
    }

    fn remove(&self) {
        if let Ok(mut s) = self.state.lock() {
            *s = SharedState::default();
        }
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        let content = self.state.lock().ok().and_then(|s| s.content.clone());
        if let Some(content) = content {
            let _ = self.tx.send(ControlCmd::Raise(content));
        }
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "spindle"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

impl PlayerIface {
    fn send(&self, cmd: Command) {
        let _ = self.tx.send(ControlCmd::Transport(cmd));
    }
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        self.send(Command::Next);
    }

    fn previous(&self) {
        self.send(Command::Prev);
    }

    fn play(&self) {
        self.send(Command::Play);
    }

    fn pause(&self) {
        self.send(Command::Pause);
    }

    fn play_pause(&self) {
        self.send(Command::Toggle);
    }

    fn stop(&self) {
        self.send(Command::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match (s.active, s.playing) {
            (false, _) => "Stopped",
            (true, true) => "Playing",
            (true, false) => "Paused",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        self.state.lock().is_ok_and(|s| s.offers(&Command::Next))
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        self.state.lock().is_ok_and(|s| s.offers(&Command::Prev))
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };
        if !s.active {
            return map;
        }

        let mut insert = |key: &str, value: Value<'_>| {
            if let Ok(v) = OwnedValue::try_from(value) {
                map.insert(key.to_string(), v);
            }
        };

        if let Some(content) = &s.content {
            let path = format!("/org/mpris/MediaPlayer2/track/{}", content.index);
            if let Ok(p) = ObjectPath::try_from(path) {
                insert("mpris:trackid", Value::from(p));
            }
        }
        if let Some(title) = &s.title {
            insert("xesam:title", Value::from(title.clone()));
        }
        if let Some(artist) = &s.artist {
            insert("xesam:artist", Value::from(vec![artist.clone()]));
        }
        map
    }
}

/// Serve MPRIS on the session bus from a background thread. Failing to
/// reach the bus is logged and leaves the returned handle inert.
pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));

    let state_for_thread = state.clone();
    let spawned = std::thread::Builder::new()
        .name("mpris".to_string())
        .spawn(move || {
            block_on(async move {
                let path = "/org/mpris/MediaPlayer2";

                let connection = match Connection::session().await {
                    Ok(c) => c,
                    Err(e) => {
                        tracing::warn!(error = %e, "MPRIS: failed to connect to session bus");
                        return;
                    }
                };

                if let Err(e) = connection
                    .request_name("org.mpris.MediaPlayer2.spindle")
                    .await
                {
                    tracing::warn!(error = %e, "MPRIS: failed to acquire name");
                    return;
                }

                let object_server = connection.object_server();

                let root = RootIface {
                    tx: tx.clone(),
                    state: state_for_thread.clone(),
                };
                if let Err(e) = object_server.at(path, root).await {
                    tracing::warn!(error = %e, "MPRIS: failed to register root iface");
                    return;
                }

                let player = PlayerIface {
                    tx,
                    state: state_for_thread,
                };
                if let Err(e) = object_server.at(path, player).await {
                    tracing::warn!(error = %e, "MPRIS: failed to register player iface");
                    return;
                }

                tracing::debug!("MPRIS service registered");
                // Keep the service alive.
                loop {
                    Timer::after(std::time::Duration::from_secs(3600)).await;
                }
            });
        });

    if let Err(e) = spawned {
        tracing::warn!(error = %e, "MPRIS: failed to spawn thread");
    }

    MprisHandle { state }
}

#[cfg(test)]
mod tests;
