use std::env;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::library::{ContentRegistry, LibraryLoader, LocatorResolver, TrackListPresenter};
use crate::mpris::ControlCmd;
use crate::playback::{MediaBackend, NotificationSink, PlaybackService, RodioBackend};

mod event_loop;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_error) = settings::load_settings();

    let _log_guard = crate::logging::init(&settings.log_directory(), &settings.logging)?;
    if let Some(e) = config_error {
        tracing::warn!(error = %e, "invalid config, using defaults");
    }
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting");

    let dir = env::args().nth(1).map(PathBuf::from);

    let registry = ContentRegistry::new();
    let resolver: Arc<dyn LocatorResolver> = registry.clone();
    let loader = LibraryLoader::for_root(
        settings.library_root(),
        settings.library.clone(),
        registry.clone(),
    );

    let (selection_tx, selection_rx) = mpsc::channel::<usize>();
    let mut presenter = TrackListPresenter::new(resolver.clone());
    presenter.set_listener(selection_tx);

    let mut app = App::new(
        presenter,
        Duration::from_millis(settings.ui.status_timeout_ms),
        Duration::from_millis(settings.ui.tick_interval_ms),
    );
    startup::load_initial_library(&mut app, &loader, dir);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let notifier: Arc<dyn NotificationSink> = Arc::new(crate::mpris::spawn_mpris(control_tx));

    let backend_resolver = resolver.clone();
    let mut service = PlaybackService::spawn(
        move || {
            RodioBackend::open_default(backend_resolver).map(|b| Box::new(b) as Box<dyn MediaBackend>)
        },
        notifier,
        settings.playback.clone(),
    );

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        let channels = event_loop::Channels::new(control_rx, selection_rx);

        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &service,
            &loader,
            resolver.as_ref(),
            &channels,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    service.shutdown();
    tracing::info!("stopped");

    run_result
}
