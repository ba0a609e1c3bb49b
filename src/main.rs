mod app;
mod config;
mod error;
mod library;
mod logging;
mod mpris;
mod playback;
mod runtime;
mod screen;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
