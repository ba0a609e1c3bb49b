use super::*;
use std::path::PathBuf;
use std::sync::mpsc;

use crate::library::Locator;

fn content(index: usize) -> ContentIntent {
    ContentIntent {
        playlist: vec![
            Locator::File(PathBuf::from("/music/a.mp3")),
            Locator::File(PathBuf::from("/music/b.mp3")),
        ],
        index,
    }
}

fn notification(playing: bool, artist: Option<&str>) -> NotificationSnapshot {
    NotificationSnapshot::new(
        Some("Test Title".to_string()),
        artist.map(str::to_string),
        playing,
        content(1),
    )
}

fn ifaces() -> (
    MprisHandle,
    RootIface,
    PlayerIface,
    mpsc::Receiver<ControlCmd>,
) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let handle = MprisHandle {
        state: state.clone(),
    };
    let root = RootIface {
        tx: tx.clone(),
        state: state.clone(),
    };
    let player = PlayerIface { tx, state };
    (handle, root, player, rx)
}

#[test]
fn post_and_remove_drive_playback_status() {
    let (handle, _root, player, _rx) = ifaces();
    assert_eq!(player.playback_status(), "Stopped");

    handle.post(&notification(true, Some("Artist")));
    assert_eq!(player.playback_status(), "Playing");

    handle.post(&notification(false, Some("Artist")));
    assert_eq!(player.playback_status(), "Paused");

    handle.remove();
    assert_eq!(player.playback_status(), "Stopped");
}

#[test]
fn metadata_reflects_posted_notification() {
    let (handle, _root, player, _rx) = ifaces();
    assert!(player.metadata().is_empty());

    handle.post(&notification(true, Some("Artist")));
    let map = player.metadata();
    for k in ["mpris:trackid", "xesam:title", "xesam:artist"] {
        assert!(map.contains_key(k), "missing key: {k}");
    }

    handle.post(&notification(true, None));
    assert!(!player.metadata().contains_key("xesam:artist"));

    handle.remove();
    assert!(player.metadata().is_empty());
}

#[test]
fn player_methods_loop_back_as_commands() {
    let (_handle, _root, player, rx) = ifaces();

    player.previous();
    player.play_pause();
    player.next();
    player.play();
    player.pause();
    player.stop();

    let got: Vec<_> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            ControlCmd::Transport(Command::Prev),
            ControlCmd::Transport(Command::Toggle),
            ControlCmd::Transport(Command::Next),
            ControlCmd::Transport(Command::Play),
            ControlCmd::Transport(Command::Pause),
            ControlCmd::Transport(Command::Stop),
        ]
    );
}

#[test]
fn raise_opens_the_notification_content() {
    let (handle, root, _player, rx) = ifaces();

    // nothing posted, nothing to open
    root.raise();
    assert!(rx.try_recv().is_err());

    handle.post(&notification(true, Some("Artist")));
    root.raise();
    assert_eq!(rx.try_recv(), Ok(ControlCmd::Raise(content(1))));

    root.quit();
    assert_eq!(rx.try_recv(), Ok(ControlCmd::Quit));
}

#[test]
fn navigation_follows_notification_buttons() {
    let (handle, _root, player, _rx) = ifaces();
    assert!(!player.can_go_next());
    assert!(!player.can_go_previous());

    handle.post(&notification(true, None));
    assert!(player.can_go_next());
    assert!(player.can_go_previous());

    handle.remove();
    assert!(!player.can_go_next());
}
