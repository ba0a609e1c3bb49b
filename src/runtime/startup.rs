use std::path::PathBuf;

use crate::app::App;
use crate::library::LibraryLoader;

/// First load: the folder given on the command line, or the default library.
pub fn load_initial_library(app: &mut App, loader: &LibraryLoader, dir: Option<PathBuf>) {
    match dir {
        Some(dir) => {
            let result = loader.load_from_directory(&dir);
            app.apply_load(result, Some(dir));
        }
        None => app.apply_load(loader.load_default(), None),
    }
}
