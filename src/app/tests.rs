use super::*;
use crate::error::LibraryError;
use crate::library::{ContentRegistry, Locator, TrackDescriptor, TrackListPresenter};
use crate::playback::Command;
use crate::playback::notification::ContentIntent;
use std::path::PathBuf;
use std::time::{Duration, Instant};

fn t(title: &str) -> TrackDescriptor {
    let path = PathBuf::from(format!("/music/{title}.mp3"));
    TrackDescriptor::new(
        Some(title.into()),
        None,
        None,
        61_000,
        Locator::File(path.clone()),
        path,
    )
}

fn app() -> App {
    App::new(
        TrackListPresenter::new(ContentRegistry::new()),
        Duration::from_secs(4),
        Duration::from_secs(1),
    )
}

#[test]
fn successful_load_renders_and_reports_count() {
    let mut app = app();
    app.apply_load(Ok(vec![t("Alpha"), t("Beta")]), Some(PathBuf::from("/music")));

    assert_eq!(app.presenter.len(), 2);
    assert_eq!(app.current_dir, Some(PathBuf::from("/music")));
    let status = app.status_at(Instant::now()).unwrap();
    assert_eq!(status.text, "Loaded 2 songs");
    assert_eq!(status.kind, StatusKind::Info);
}

#[test]
fn empty_load_shows_empty_state_without_message() {
    let mut app = app();
    app.apply_load(Ok(vec![t("Alpha")]), None);
    app.expire_status(Instant::now() + Duration::from_secs(10));

    app.apply_load(Ok(Vec::new()), None);
    assert!(app.presenter.is_empty());
    assert!(app.status_at(Instant::now()).is_none());
}

#[test]
fn failed_load_clears_list_and_reports_error() {
    let mut app = app();
    app.apply_load(Ok(vec![t("Alpha")]), None);

    app.apply_load(Err(LibraryError::RootMissing(PathBuf::from("/nope"))), None);
    assert!(app.presenter.is_empty());
    let status = app.status_at(Instant::now()).unwrap();
    assert_eq!(status.kind, StatusKind::Error);
    assert!(status.text.starts_with("Error loading music files: "));
    assert!(status.text.contains("/nope"));
}

#[test]
fn permission_denied_offers_retry() {
    let mut app = app();
    app.apply_load(
        Err(LibraryError::PermissionDenied(PathBuf::from("/locked"))),
        None,
    );
    let status = app.status_at(Instant::now()).unwrap();
    assert!(status.text.contains("Press R to retry"));
}

#[test]
fn status_expires_after_timeout() {
    let mut app = app();
    let now = Instant::now();
    app.set_status_at("hello", StatusKind::Info, now);

    assert!(app.status_at(now + Duration::from_secs(3)).is_some());
    assert!(app.status_at(now + Duration::from_secs(4)).is_none());

    app.expire_status(now + Duration::from_secs(1));
    assert!(app.status_at(now).is_some());
    app.expire_status(now + Duration::from_secs(5));
    assert!(app.status_at(now).is_none());
}

#[test]
fn open_track_builds_playlist_from_list() {
    let mut app = app();
    app.apply_load(Ok(vec![t("Alpha"), t("Beta"), t("Gamma")]), None);

    assert_eq!(app.open_track(3), None);
    assert_eq!(app.view, View::Library);

    let cmd = app.open_track(1).unwrap();
    let Command::Init { playlist, index } = cmd else {
        panic!("expected INIT");
    };
    assert_eq!(index, 1);
    assert_eq!(playlist.len(), 3);
    assert_eq!(playlist[1], Locator::File(PathBuf::from("/music/Beta.mp3")));
    assert_eq!(app.view, View::Player);
    assert!(app.screen.as_ref().unwrap().is_playing());
}

#[test]
fn toggle_view_needs_an_open_player() {
    let mut app = app();
    app.toggle_view();
    assert_eq!(app.view, View::Library);

    app.apply_load(Ok(vec![t("Alpha")]), None);
    app.open_track(0);
    app.toggle_view();
    assert_eq!(app.view, View::Library);
    app.toggle_view();
    assert_eq!(app.view, View::Player);

    app.close_player();
    assert_eq!(app.view, View::Library);
    assert!(app.screen.is_none());
}

#[test]
fn raise_switches_to_notification_track() {
    let mut app = app();
    let playlist = vec![
        Locator::File(PathBuf::from("/music/a.mp3")),
        Locator::File(PathBuf::from("/music/b.mp3")),
    ];

    app.raise(ContentIntent {
        playlist: playlist.clone(),
        index: 1,
    });
    assert_eq!(app.view, View::Player);
    let screen = app.screen.as_ref().unwrap();
    assert_eq!(screen.index(), 1);
    assert_eq!(screen.playlist(), playlist.as_slice());
}

#[test]
fn raise_keeps_screen_already_showing_the_track() {
    let mut app = app();
    app.apply_load(Ok(vec![t("Alpha"), t("Beta")]), None);
    app.open_track(0);
    app.view = View::Library;

    let playlist = app.screen.as_ref().unwrap().playlist().to_vec();
    app.raise(ContentIntent { playlist, index: 0 });

    // the optimistic playing state survives
    assert!(app.screen.as_ref().unwrap().is_playing());
    assert_eq!(app.view, View::Player);
}

#[test]
fn prompt_edits_and_expands_home() {
    let mut app = app();
    app.current_dir = Some(PathBuf::from("/srv"));
    app.open_prompt();
    assert_eq!(app.prompt.as_deref(), Some("/srv"));

    app.prompt = Some(String::new());
    for c in "~/Musix".chars() {
        app.push_prompt_char(c);
    }
    app.pop_prompt_char();
    app.push_prompt_char('c');

    let home = Some(PathBuf::from("/home/me"));
    assert_eq!(
        app.submit_prompt(home.clone()),
        Some(PathBuf::from("/home/me/Music"))
    );
    assert!(app.prompt.is_none());

    app.prompt = Some("   ".into());
    assert_eq!(app.submit_prompt(home.clone()), None);

    app.prompt = Some("/tmp/x".into());
    assert_eq!(app.submit_prompt(home), Some(PathBuf::from("/tmp/x")));

    app.open_prompt();
    app.cancel_prompt();
    assert_eq!(app.submit_prompt(None), None);
}

#[test]
fn details_need_a_track_and_close_on_reload() {
    let mut app = app();
    app.toggle_details();
    assert!(!app.details);

    app.apply_load(Ok(vec![t("Alpha")]), None);
    app.toggle_details();
    assert!(app.details);

    app.apply_load(Ok(vec![t("Beta")]), None);
    assert!(!app.details);
}
