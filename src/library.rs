//! Library layer: track descriptors, the media index they come from, the
//! loader that queries it and the list presenter that shows the result.

pub mod index;
mod loader;
pub mod metadata;
mod model;
mod presenter;

pub use index::{ContentRegistry, LocatorResolver};
pub use loader::LibraryLoader;
pub use metadata::Artwork;
pub use model::*;
pub use presenter::{PresenterView, TrackListPresenter, TrackRow};
