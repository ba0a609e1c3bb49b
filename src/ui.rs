//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::app::{App, StatusKind, View};
use crate::config::UiSettings;
use crate::library::{Artwork, PresenterView, TrackDescriptor, TrackRow, format_duration};
use crate::screen::PlaybackScreen;

const HEADER_HEIGHT: u16 = 3;
const STATUS_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 4;

/// Disc frames cycled while a track plays.
const ART_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

const LIBRARY_CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("enter", "play selected song"),
    ("K", "details"),
    ("o", "open folder"),
    ("R", "reload"),
    ("tab", "player"),
    ("q", "quit"),
];

const PLAYER_CONTROLS: &[(&str, &str)] = &[
    ("space/p", "play/pause"),
    ("h/l", "prev/next song"),
    ("s", "seek"),
    ("x", "stop"),
    ("esc/tab", "library"),
    ("q", "quit"),
];

const SEEK_CONTROLS: &[(&str, &str)] = &[
    ("←/→", "move"),
    ("enter", "seek here"),
    ("esc", "cancel"),
];

fn controls_text(controls: &[(&str, &str)], seek_step_seconds: u64) -> String {
    controls
        .iter()
        .map(|(k, v)| {
            if *k == "←/→" {
                format!("[{k}] {v} -/+{seek_step_seconds}s")
            } else {
                format!("[{k}] {v}")
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Rows available to the track list on a terminal `height` lines tall.
pub fn list_height(height: u16) -> usize {
    // list borders take two more lines
    height.saturating_sub(HEADER_HEIGHT + STATUS_HEIGHT + FOOTER_HEIGHT + 2) as usize
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn art_marker(art: Option<&Artwork>) -> &'static str {
    match art {
        Some(Artwork::Embedded { .. }) => "♪",
        Some(Artwork::Placeholder) => "·",
        None => " ",
    }
}

fn art_label(art: &Artwork) -> String {
    match art {
        Artwork::Embedded { mime, bytes } => {
            let kb = bytes.div_ceil(1024);
            match mime {
                Some(mime) => format!("cover art ({mime}, {kb} KB)"),
                None => format!("cover art ({kb} KB)"),
            }
        }
        Artwork::Placeholder => "no cover".to_string(),
    }
}

fn row_text(row: &TrackRow) -> String {
    format!(
        "{} {} - {}  [{}]",
        art_marker(row.artwork.as_ref()),
        row.title,
        row.artist,
        row.duration
    )
}

/// Text for the status box: a pending message, else what is playing.
fn status_text(app: &App, now: Instant) -> (String, Style) {
    if let Some(status) = app.status_at(now) {
        let style = match status.kind {
            StatusKind::Info => Style::default(),
            StatusKind::Error => Style::default().fg(Color::Red),
        };
        return (status.text.clone(), style);
    }

    let mut parts: Vec<String> = Vec::new();
    match &app.screen {
        Some(s) => {
            let state = if s.is_playing() { "Playing" } else { "Paused" };
            parts.push(format!("{state}: {} - {}", s.song().title, s.song().artist));
        }
        None => parts.push("Stopped".to_string()),
    }
    parts.push(format!("Songs: {}", app.presenter.len()));
    match &app.current_dir {
        Some(dir) => parts.push(format!("Dir: {}", dir.display())),
        None => parts.push("Library".to_string()),
    }
    (parts.join(" • "), Style::default())
}

fn draw_library(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" tracks ");

    let rows = match app.presenter.view() {
        PresenterView::Populated(rows) => rows,
        PresenterView::Empty => {
            let empty = Paragraph::new(
                "No music found.\n\nPress o to open a folder or R to reload the library.",
            )
            .alignment(Alignment::Center)
            .block(block.padding(Padding::top(area.height.saturating_sub(4) / 2)))
            .wrap(Wrap { trim: true });
            frame.render_widget(empty, area);
            return;
        }
    };

    // Only build ListItems for the visible window.
    let list_height = area.height.saturating_sub(2) as usize;
    let (range, selected_in_window) = app.presenter.visible_window(list_height);
    let items: Vec<ListItem> = rows[range]
        .iter()
        .map(|row| ListItem::new(row_text(row)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ratatui::widgets::ListState::default();
    state.select(Some(selected_in_window));
    frame.render_stateful_widget(list, area, &mut state);
}

fn details_text(track: &TrackDescriptor) -> String {
    let duration = if track.duration_ms() > 0 {
        format_duration(track.duration_ms())
    } else {
        "-".to_string()
    };
    format!(
        "Title: {}\nArtist: {}\nAlbum: {}\nDuration: {}\nPath: {}",
        track.title(),
        track.artist(),
        track.album(),
        duration,
        track.path().display()
    )
}

fn draw_details(frame: &mut Frame, app: &App, area: Rect) {
    let popup = centered_rect_sized(72, 9, area);
    frame.render_widget(Clear, popup);

    let text = match app.presenter.tracks().get(app.presenter.selected()) {
        Some(track) => details_text(track),
        None => "No track selected".to_string(),
    };
    let details = Paragraph::new(text)
        .block(
            Block::default()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .borders(Borders::ALL)
                .title(" details (K closes) "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(details, popup);
}

fn draw_player(frame: &mut Frame, screen: &PlaybackScreen, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" now playing ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let song = screen.song();
    let disc = if screen.is_playing() {
        ART_FRAMES[screen.art_frame() % ART_FRAMES.len()]
    } else {
        ART_FRAMES[0]
    };
    let art_label = art_label(&song.artwork);
    let art = Paragraph::new(format!("{disc}\n{art_label}"))
        .alignment(Alignment::Center)
        .block(Block::default().padding(Padding::top(chunks[0].height.saturating_sub(2) / 2)));
    frame.render_widget(art, chunks[0]);

    let info = Paragraph::new(format!("{}\n{}", song.title, song.artist))
        .alignment(Alignment::Center)
        .bold();
    frame.render_widget(info, chunks[1]);

    let total = screen.total_ms();
    let position = screen.displayed_position_ms();
    let ratio = if total > 0 {
        (position as f64 / total as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let label = format!("{} / {}", format_duration(position), format_duration(total));
    let gauge_style = if screen.is_seeking() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let gauge = Gauge::default()
        .gauge_style(gauge_style)
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, chunks[2]);

    let state = match (screen.is_seeking(), screen.is_playing()) {
        (true, _) => "seeking",
        (false, true) => "▶ playing",
        (false, false) => "⏸ paused",
    };
    let state = Paragraph::new(state).alignment(Alignment::Center);
    frame.render_widget(state, chunks[3]);
}

fn draw_prompt(frame: &mut Frame, input: &str, area: Rect) {
    let popup = centered_rect_sized(72, 3, area);
    frame.render_widget(Clear, popup);
    let prompt = Paragraph::new(format!("{input}_")).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" open folder (enter loads, esc cancels) ")
            .padding(Padding {
                left: 1,
                right: 0,
                top: 0,
                bottom: 0,
            }),
    );
    frame.render_widget(prompt, popup);
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" spindle v{} ", env!("CARGO_PKG_VERSION")))
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let (status, style) = status_text(app, Instant::now());
    let status_par = Paragraph::new(status)
        .style(style)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    let controls = match (app.view, &app.screen) {
        (View::Player, Some(screen)) => {
            draw_player(frame, screen, chunks[2]);
            if screen.is_seeking() {
                SEEK_CONTROLS
            } else {
                PLAYER_CONTROLS
            }
        }
        _ => {
            draw_library(frame, app, chunks[2]);
            if app.details {
                draw_details(frame, app, chunks[2]);
            }
            LIBRARY_CONTROLS
        }
    };

    if let Some(input) = &app.prompt {
        draw_prompt(frame, input, chunks[2]);
    }

    let footer = Paragraph::new(controls_text(controls, ui_settings.seek_step_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[3]);
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::library::{ContentRegistry, Locator, TrackListPresenter};

    fn app() -> App {
        App::new(
            TrackListPresenter::new(ContentRegistry::new()),
            Duration::from_secs(4),
            Duration::from_secs(1),
        )
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|f| draw(f, app, &UiSettings::default()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn list_height_leaves_room_for_chrome() {
        assert_eq!(list_height(30), 18);
        assert_eq!(list_height(5), 0);
    }

    #[test]
    fn seek_hint_includes_step() {
        assert_eq!(
            controls_text(SEEK_CONTROLS, 5),
            "[←/→] move -/+5s | [enter] seek here | [esc] cancel"
        );
    }

    #[test]
    fn art_label_describes_embedded_picture() {
        let art = Artwork::Embedded {
            mime: Some("image/png".into()),
            bytes: 1500,
        };
        assert_eq!(art_label(&art), "cover art (image/png, 2 KB)");
        assert_eq!(art_label(&Artwork::Placeholder), "no cover");
    }

    #[test]
    fn empty_library_shows_guidance() {
        let out = render(&app());
        assert!(out.contains("No music found."));
    }

    #[test]
    fn library_rows_show_title_artist_and_duration() {
        let mut app = app();
        let path = PathBuf::from("/music/x.mp3");
        app.presenter.render(vec![TrackDescriptor::new(
            None,
            Some("X".into()),
            None,
            65_000,
            Locator::File(path.clone()),
            path,
        )]);

        let out = render(&app);
        assert!(out.contains("Unknown Title - X  [1:05]"));
    }

    #[test]
    fn details_popup_shows_selected_track() {
        let mut app = app();
        let path = PathBuf::from("/music/x.mp3");
        app.presenter.render(vec![TrackDescriptor::new(
            Some("Song".into()),
            None,
            Some("Record".into()),
            0,
            Locator::File(path.clone()),
            path,
        )]);
        app.toggle_details();

        let out = render(&app);
        assert!(out.contains("details (K closes)"));
        assert!(out.contains("Album: Record"));
        assert!(out.contains("Duration: -"));
    }

    #[test]
    fn player_view_shows_progress_labels() {
        let mut app = app();
        let path = PathBuf::from("/music/x.mp3");
        app.presenter.render(vec![TrackDescriptor::new(
            Some("Song".into()),
            None,
            None,
            0,
            Locator::File(path.clone()),
            path,
        )]);
        app.open_track(0);

        let out = render(&app);
        assert!(out.contains("0:00 / 0:00"));
        assert!(out.contains("Unknown Title"));
    }
}
