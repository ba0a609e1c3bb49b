//! Player view state: what the screen shows for the current track and the
//! once-per-interval tick that drives its progress bar.

mod model;
mod ticker;

pub use model::{PlaybackScreen, SongInfo};
pub use ticker::Ticker;

#[cfg(test)]
mod tests;
