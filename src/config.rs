//! Settings for the library scan, the playback service, the TUI and logging.
//!
//! Values come from an optional TOML file and `SPINDLE__*` environment
//! variables on top of built-in defaults.

mod load;
mod schema;

pub use schema::*;
