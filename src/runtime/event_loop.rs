use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, StatusKind, View};
use crate::config;
use crate::library::{LibraryLoader, Locator, LocatorResolver};
use crate::mpris::ControlCmd;
use crate::playback::{Command, PlaybackService, TransportSnapshot};
use crate::screen::{PlaybackScreen, SongInfo, Ticker};
use crate::ui;

/// Receiving ends the loop drains every iteration.
pub struct Channels {
    control_rx: mpsc::Receiver<ControlCmd>,
    selection_rx: mpsc::Receiver<usize>,
    tick_tx: mpsc::Sender<()>,
    tick_rx: mpsc::Receiver<()>,
}

impl Channels {
    pub fn new(
        control_rx: mpsc::Receiver<ControlCmd>,
        selection_rx: mpsc::Receiver<usize>,
    ) -> Self {
        let (tick_tx, tick_rx) = mpsc::channel();
        Self {
            control_rx,
            selection_rx,
            tick_tx,
            tick_rx,
        }
    }
}

/// The parts of a snapshot that, when changed, are folded into the screen.
/// Position alone is left to the tick.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TransportKey {
    generation: u64,
    index: Option<usize>,
    locator: Option<Locator>,
    is_playing: bool,
}

impl From<&TransportSnapshot> for TransportKey {
    fn from(s: &TransportSnapshot) -> Self {
        Self {
            generation: s.generation,
            index: s.index,
            locator: s.locator.clone(),
            is_playing: s.is_playing,
        }
    }
}

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Running while the player screen wants progress ticks.
    ticker: Option<Ticker>,
    last_seen: Option<TransportKey>,
}

/// Main terminal event loop: handles input, UI drawing, sync with the
/// playback service and MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    service: &PlaybackService,
    loader: &LibraryLoader,
    resolver: &dyn LocatorResolver,
    channels: &Channels,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.expire_status(Instant::now());

        sync_screen(settings, app, service, resolver, channels, state);

        if app.view == View::Library {
            let size = terminal.size()?;
            let (range, _) = app.presenter.visible_window(ui::list_height(size.height));
            app.presenter.load_artwork(range);
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui))?;

        while let Ok(cmd) = channels.control_rx.try_recv() {
            if handle_control_cmd(cmd, app, service) {
                return Ok(());
            }
        }

        while let Ok(index) = channels.selection_rx.try_recv() {
            if let Some(cmd) = app.open_track(index) {
                service.dispatch(cmd);
            }
        }

        while channels.tick_rx.try_recv().is_ok() {
            if let Some(screen) = app.screen.as_mut() {
                let snapshot = service.snapshot();
                screen.tick(Some(&snapshot));
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, service, loader, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Fold transport changes into the player screen, fill in song info for a
/// newly shown track, and start or stop the ticker to match the screen.
fn sync_screen(
    settings: &config::Settings,
    app: &mut App,
    service: &PlaybackService,
    resolver: &dyn LocatorResolver,
    channels: &Channels,
    state: &mut EventLoopState,
) {
    let interval = Duration::from_millis(settings.ui.tick_interval_ms);
    let Some(screen) = app.screen.as_mut() else {
        update_ticker(&mut state.ticker, None, interval, &channels.tick_tx);
        return;
    };

    let snapshot = service.snapshot();
    let key = TransportKey::from(&snapshot);
    if state.last_seen.as_ref() != Some(&key) {
        tracing::debug!(
            generation = snapshot.generation,
            index = ?snapshot.index,
            playlist_len = snapshot.playlist_len,
            foreground = snapshot.foreground,
            "transport changed"
        );
        screen.reconcile(&snapshot);
        state.last_seen = Some(key);
    }

    if let Some(locator) = screen.needs_song_info().cloned() {
        screen.set_song_info(SongInfo::probe(resolver, &locator));
    }

    update_ticker(&mut state.ticker, Some(&*screen), interval, &channels.tick_tx);
}

/// Start the ticker when the screen wants ticks and drop it (stopping its
/// thread) when there is no screen or the screen stopped wanting them.
fn update_ticker(
    ticker: &mut Option<Ticker>,
    screen: Option<&PlaybackScreen>,
    interval: Duration,
    tick_tx: &mpsc::Sender<()>,
) {
    let wanted = screen.is_some_and(PlaybackScreen::wants_ticks);
    match (wanted, ticker.is_some()) {
        (true, false) => *ticker = Some(Ticker::start(interval, tick_tx.clone(), ())),
        (false, true) => *ticker = None,
        _ => {}
    }
}

fn handle_control_cmd(cmd: ControlCmd, app: &mut App, service: &PlaybackService) -> bool {
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Raise(content) => app.raise(content),
        ControlCmd::Transport(Command::Stop) => {
            service.dispatch(Command::Stop);
            app.close_player();
        }
        ControlCmd::Transport(cmd) => service.dispatch(cmd),
    }
    false
}

fn reload(app: &mut App, loader: &LibraryLoader) {
    match app.current_dir.clone() {
        Some(dir) => {
            let result = loader.load_from_directory(&dir);
            app.apply_load(result, Some(dir));
        }
        None => app.apply_load(loader.load_default(), None),
    }
}

fn handle_prompt_key(key: KeyEvent, app: &mut App, loader: &LibraryLoader) {
    match key.code {
        KeyCode::Esc => app.cancel_prompt(),
        KeyCode::Backspace => app.pop_prompt_char(),
        KeyCode::Enter => {
            let home = std::env::var_os("HOME").map(std::path::PathBuf::from);
            if let Some(dir) = app.submit_prompt(home) {
                let result = loader.load_from_directory(&dir);
                app.apply_load(result, Some(dir));
            } else {
                app.set_status("No folder given", StatusKind::Info);
            }
        }
        KeyCode::Char(c) if !c.is_control() => app.push_prompt_char(c),
        _ => {}
    }
}

/// Keys shared by both views while a player screen exists.
fn handle_transport_key(key: KeyEvent, app: &mut App, service: &PlaybackService) -> bool {
    let Some(screen) = app.screen.as_mut() else {
        return false;
    };
    let cmd = match key.code {
        KeyCode::Char('p') | KeyCode::Char(' ') => Some(screen.toggle()),
        KeyCode::Char('l') => screen.next(),
        KeyCode::Char('h') => screen.prev(),
        KeyCode::Char('x') => {
            service.dispatch(Command::Stop);
            app.close_player();
            return true;
        }
        _ => return false,
    };
    if let Some(cmd) = cmd {
        service.dispatch(cmd);
    }
    true
}

fn handle_player_key(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    service: &PlaybackService,
) {
    let step_ms = settings.ui.seek_step_ms();
    let Some(screen) = app.screen.as_mut() else {
        app.view = View::Library;
        return;
    };
    match key.code {
        KeyCode::Char('s') => screen.begin_seek(),
        KeyCode::Left => screen.drag_seek(-step_ms),
        KeyCode::Right => screen.drag_seek(step_ms),
        KeyCode::Enter => {
            if let Some(cmd) = screen.end_seek() {
                tracing::debug!(to_ms = screen.position_ms(), "seek released");
                service.dispatch(cmd);
            }
        }
        KeyCode::Esc => {
            if screen.is_seeking() {
                screen.cancel_seek();
            } else {
                app.view = View::Library;
            }
        }
        _ => {}
    }
}

fn handle_library_key(key: KeyEvent, app: &mut App, loader: &LibraryLoader, state: &mut EventLoopState) {
    match key.code {
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.presenter.select_first();
            } else {
                state.pending_gg = true;
            }
            return;
        }
        KeyCode::Char('G') => app.presenter.select_last(),
        KeyCode::Char('j') | KeyCode::Down => app.presenter.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.presenter.select_prev(),
        KeyCode::Enter => {
            app.presenter.select_current();
        }
        KeyCode::Char('K') => app.toggle_details(),
        KeyCode::Char('o') => app.open_prompt(),
        KeyCode::Char('R') => reload(app, loader),
        _ => {}
    }
    // g pending should clear on any other key
    state.pending_gg = false;
}

/// Returns `true` when the user asked to quit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    service: &PlaybackService,
    loader: &LibraryLoader,
    state: &mut EventLoopState,
) -> bool {
    if app.prompt.is_some() {
        state.pending_gg = false;
        handle_prompt_key(key, app, loader);
        return false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Tab => {
            state.pending_gg = false;
            app.toggle_view();
            return false;
        }
        _ => {}
    }

    if handle_transport_key(key, app, service) {
        state.pending_gg = false;
        return false;
    }

    match app.view {
        View::Library => handle_library_key(key, app, loader, state),
        View::Player => handle_player_key(key, settings, app, service),
    }
    false
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn playing_screen() -> PlaybackScreen {
        let playlist = vec![Locator::File(PathBuf::from("/music/a.mp3"))];
        let mut screen = PlaybackScreen::new(playlist, 0, Duration::from_secs(1));
        screen.play_index(0);
        screen
    }

    #[test]
    fn ticker_follows_the_screen() {
        let (tx, rx) = mpsc::channel();
        let interval = Duration::from_millis(5);
        let mut ticker = None;

        update_ticker(&mut ticker, None, interval, &tx);
        assert!(ticker.is_none());

        let mut screen = playing_screen();
        update_ticker(&mut ticker, Some(&screen), interval, &tx);
        assert!(ticker.is_some());
        assert!(rx.recv_timeout(Duration::from_secs(2)).is_ok());

        // a seek gesture suspends ticking
        screen.begin_seek();
        update_ticker(&mut ticker, Some(&screen), interval, &tx);
        assert!(ticker.is_none());

        screen.cancel_seek();
        update_ticker(&mut ticker, Some(&screen), interval, &tx);
        assert!(ticker.is_some());

        // pausing stops it too
        screen.toggle();
        update_ticker(&mut ticker, Some(&screen), interval, &tx);
        assert!(ticker.is_none());

        screen.toggle();
        update_ticker(&mut ticker, Some(&screen), interval, &tx);
        assert!(ticker.is_some());

        // the screen going away tears it down; nothing arrives afterwards
        update_ticker(&mut ticker, None, interval, &tx);
        assert!(ticker.is_none());
        while rx.try_recv().is_ok() {}
        std::thread::sleep(Duration::from_millis(30));
        assert!(rx.try_recv().is_err());
    }
}
