//! Track registry sources.
//!
//! A playlist comes either from a declarative TOML playlist file or from a
//! directory of audio files. Both produce the same ordered `Track` list,
//! with rows numbered in playlist order.

mod display;
mod model;
mod playlist;
mod scan;

use std::path::Path;

pub use model::{RowId, Track};
pub use playlist::read_playlist;
pub use scan::scan;

use crate::config::{LibrarySettings, UiSettings};
use crate::error::PlaylistError;

/// Load the tracks described by `path`: a directory is scanned, anything
/// else is read as a playlist file.
pub fn load(
    path: &Path,
    library: &LibrarySettings,
    ui: &UiSettings,
) -> Result<Vec<Track>, PlaylistError> {
    if path.is_dir() {
        Ok(scan(path, library, ui))
    } else {
        read_playlist(path, ui)
    }
}
