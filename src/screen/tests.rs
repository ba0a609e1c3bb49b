use std::io::Write;
use std::path::PathBuf;
use std::sync::mpsc::{self, TryRecvError};
use std::time::Duration;

use super::*;
use crate::library::{Artwork, Locator, LocatorResolver};
use crate::playback::{Command, TransportSnapshot};

fn loc(name: &str) -> Locator {
    Locator::File(PathBuf::from(format!("/music/{name}.mp3")))
}

fn screen(names: &[&str]) -> PlaybackScreen {
    let playlist = names.iter().map(|n| loc(n)).collect();
    PlaybackScreen::new(playlist, 0, Duration::from_secs(1))
}

fn song(duration_ms: i64) -> SongInfo {
    SongInfo {
        title: "Song".to_string(),
        artist: "Artist".to_string(),
        duration_ms,
        artwork: Artwork::Placeholder,
    }
}

fn playing(index: usize, locator: Locator, position_ms: i64) -> TransportSnapshot {
    TransportSnapshot {
        index: Some(index),
        locator: Some(locator),
        playlist_len: 3,
        is_playing: true,
        position_ms,
        duration_ms: 200_000,
        foreground: true,
        generation: 1,
    }
}

#[test]
fn play_index_returns_init_for_whole_playlist() {
    let mut s = screen(&["a", "b", "c"]);
    let cmd = s.play_index(2).unwrap();

    assert_eq!(
        cmd,
        Command::Init {
            playlist: vec![loc("a"), loc("b"), loc("c")],
            index: 2,
        }
    );
    assert_eq!(s.index(), 2);
    assert!(s.is_playing());
    assert_eq!(s.position_ms(), 0);
    assert_eq!(s.song(), &SongInfo::default());
    assert_eq!(s.needs_song_info(), Some(&loc("c")));

    s.set_song_info(song(90_000));
    assert_eq!(s.needs_song_info(), None);
    assert_eq!(s.total_ms(), 90_000);

    // replaying the same track probes it again
    s.play_index(2);
    assert_eq!(s.needs_song_info(), Some(&loc("c")));
}

#[test]
fn play_index_out_of_range_is_ignored() {
    let mut s = screen(&["a", "b"]);
    s.play_index(1);
    assert_eq!(s.play_index(2), None);
    assert_eq!(s.index(), 1);

    let mut empty = screen(&[]);
    assert_eq!(empty.play_index(0), None);
    assert_eq!(empty.next(), None);
    assert_eq!(empty.prev(), None);
    assert!(!empty.is_playing());
}

#[test]
fn next_and_prev_wrap_the_local_cursor() {
    let mut s = screen(&["a", "b", "c"]);
    s.play_index(2);

    assert!(matches!(s.next(), Some(Command::Init { index: 0, .. })));
    assert_eq!(s.index(), 0);

    assert!(matches!(s.prev(), Some(Command::Init { index: 2, .. })));
    assert_eq!(s.index(), 2);

    assert!(matches!(s.prev(), Some(Command::Init { index: 1, .. })));
}

#[test]
fn toggle_flips_immediately() {
    let mut s = screen(&["a"]);
    s.play_index(0);

    assert_eq!(s.toggle(), Command::Toggle);
    assert!(!s.is_playing());
    assert!(!s.wants_ticks());

    assert_eq!(s.toggle(), Command::Toggle);
    assert!(s.is_playing());
    assert!(s.wants_ticks());
}

#[test]
fn tick_without_snapshot_advances_and_clamps() {
    let mut s = screen(&["a"]);
    s.play_index(0);
    s.set_song_info(song(3_500));

    let mut seen = Vec::new();
    for _ in 0..5 {
        assert!(!s.tick(None));
        seen.push(s.position_ms());
    }
    assert_eq!(seen, vec![1_000, 2_000, 3_000, 3_500, 3_500]);
    assert_eq!(s.art_frame(), 5);
}

#[test]
fn tick_needs_a_known_duration_to_advance() {
    let mut s = screen(&["a"]);
    s.play_index(0);
    s.tick(None);
    assert_eq!(s.position_ms(), 0);
}

#[test]
fn tick_is_inert_while_paused_or_seeking() {
    let mut s = screen(&["a"]);
    s.play_index(0);
    s.set_song_info(song(10_000));

    s.toggle();
    s.tick(None);
    assert_eq!(s.position_ms(), 0);
    assert_eq!(s.art_frame(), 0);

    s.toggle();
    s.begin_seek();
    s.tick(None);
    assert_eq!(s.position_ms(), 0);
}

#[test]
fn seek_gesture_clamps_and_emits_one_seek() {
    let mut s = screen(&["a"]);
    s.play_index(0);
    s.set_song_info(song(60_000));
    s.tick(None);

    assert_eq!(s.end_seek(), None);

    s.begin_seek();
    assert!(!s.wants_ticks());
    s.drag_seek(-5_000);
    assert_eq!(s.displayed_position_ms(), 0);
    s.drag_seek(1_000_000);
    assert_eq!(s.displayed_position_ms(), 60_000);
    s.drag_seek(-15_000);
    // the committed position is untouched until release
    assert_eq!(s.position_ms(), 1_000);

    assert_eq!(s.end_seek(), Some(Command::Seek { position_ms: 45_000 }));
    assert_eq!(s.position_ms(), 45_000);
    assert!(s.wants_ticks());
}

#[test]
fn huge_seek_steps_saturate_at_the_track_ends() {
    let mut s = screen(&["a"]);
    s.play_index(0);
    s.set_song_info(song(60_000));
    s.begin_seek();

    s.drag_seek(i64::MAX);
    s.drag_seek(i64::MAX);
    assert_eq!(s.displayed_position_ms(), 60_000);
    s.drag_seek(i64::MIN);
    assert_eq!(s.displayed_position_ms(), 0);
}

#[test]
fn cancelled_seek_keeps_position() {
    let mut s = screen(&["a"]);
    s.play_index(0);
    s.set_song_info(song(60_000));

    s.begin_seek();
    s.drag_seek(30_000);
    s.cancel_seek();

    assert_eq!(s.position_ms(), 0);
    assert_eq!(s.displayed_position_ms(), 0);
    assert!(s.wants_ticks());
}

#[test]
fn snapshot_for_another_track_is_ignored_until_service_catches_up() {
    let mut s = screen(&["a", "b", "c"]);
    s.play_index(0);
    s.next();

    // still reporting the previous track
    assert!(!s.reconcile(&playing(0, loc("a"), 9_000)));
    assert_eq!(s.index(), 1);
    assert_eq!(s.position_ms(), 0);

    assert!(!s.reconcile(&playing(1, loc("b"), 2_000)));
    assert_eq!(s.position_ms(), 2_000);
    assert_eq!(s.total_ms(), 200_000);
}

#[test]
fn reconcile_follows_auto_advance() {
    let mut s = screen(&["a", "b", "c"]);
    s.play_index(0);
    s.reconcile(&playing(0, loc("a"), 0));
    s.set_song_info(song(200_000));

    assert_eq!(s.needs_song_info(), None);

    assert!(s.reconcile(&playing(1, loc("b"), 500)));
    assert_eq!(s.needs_song_info(), Some(&loc("b")));
    assert_eq!(s.index(), 1);
    assert_eq!(s.locator(), Some(&loc("b")));
    assert_eq!(s.song(), &SongInfo::default());
    assert_eq!(s.position_ms(), 500);
}

#[test]
fn reconcile_adopts_pause_and_stop() {
    let mut s = screen(&["a"]);
    s.play_index(0);

    let mut snap = playing(0, loc("a"), 4_000);
    snap.is_playing = false;
    s.reconcile(&snap);
    assert!(!s.is_playing());
    assert_eq!(s.position_ms(), 4_000);

    s.toggle();
    s.reconcile(&TransportSnapshot::default());
    assert!(!s.is_playing());
    assert_eq!(s.position_ms(), 0);
}

#[test]
fn reconcile_ignores_foreign_playlists() {
    let mut s = screen(&["a", "b"]);
    s.play_index(0);
    s.reconcile(&playing(0, loc("a"), 0));

    assert!(!s.reconcile(&playing(1, loc("zzz"), 7_000)));
    assert_eq!(s.index(), 0);
    assert_eq!(s.position_ms(), 0);
}

#[test]
fn tick_prefers_accepted_snapshot() {
    let mut s = screen(&["a"]);
    s.play_index(0);
    s.set_song_info(song(200_000));

    s.tick(Some(&playing(0, loc("a"), 12_345)));
    assert_eq!(s.position_ms(), 12_345);

    // unknown track: fall back to simulated progress
    s.tick(Some(&playing(0, loc("other"), 99_000)));
    assert_eq!(s.position_ms(), 13_345);
}

struct NoFiles;

impl LocatorResolver for NoFiles {
    fn resolve(&self, _locator: &Locator) -> Option<PathBuf> {
        None
    }
}

struct Fixed(PathBuf);

impl LocatorResolver for Fixed {
    fn resolve(&self, _locator: &Locator) -> Option<PathBuf> {
        Some(self.0.clone())
    }
}

#[test]
fn song_info_falls_back_to_unknown() {
    assert_eq!(SongInfo::probe(&NoFiles, &loc("a")), SongInfo::default());

    let mut file = tempfile::Builder::new().suffix(".mp3").tempfile().unwrap();
    file.write_all(b"definitely not audio").unwrap();
    let info = SongInfo::probe(&Fixed(file.path().to_path_buf()), &loc("a"));

    assert_eq!(info.title, "Unknown Title");
    assert_eq!(info.artist, "Unknown Artist");
    assert_eq!(info.duration_ms, 0);
    assert_eq!(info.artwork, Artwork::Placeholder);
}

#[test]
fn ticker_delivers_until_dropped() {
    let (tx, rx) = mpsc::channel::<u8>();
    let ticker = Ticker::start(Duration::from_millis(5), tx, 7);

    for _ in 0..2 {
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok(7));
    }

    drop(ticker);
    while rx.try_recv().is_ok() {}
    assert_eq!(rx.try_recv(), Err(TryRecvError::Disconnected));
}
