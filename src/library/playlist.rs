//! Declarative playlist files.
//!
//! A playlist is a TOML document with one `[[track]]` table per entry:
//!
//! ```toml
//! [[track]]
//! src = "music/intro.mp3"
//! cover = "covers/intro.jpg"
//! title = "Intro"
//! artist = "Someone"
//! ```
//!
//! Relative locators resolve against the directory holding the playlist.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::config::UiSettings;
use crate::error::PlaylistError;

use super::display::{display_from_fields, fallback_title};
use super::model::{RowId, Track};

#[derive(Debug, Deserialize)]
struct PlaylistFile {
    #[serde(default, rename = "track")]
    tracks: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    src: String,
    #[serde(default)]
    cover: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, alias = "singer")]
    artist: Option<String>,
}

/// Read the playlist file at `path` into an ordered track list.
pub fn read_playlist(path: &Path, ui: &UiSettings) -> Result<Vec<Track>, PlaylistError> {
    let text = std::fs::read_to_string(path).map_err(|source| PlaylistError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let tracks = parse_playlist(&text, path, base, ui)?;
    info!(path = %path.display(), tracks = tracks.len(), "playlist loaded");
    Ok(tracks)
}

/// Parse playlist `text`; `path` is only used for error reporting.
pub(super) fn parse_playlist(
    text: &str,
    path: &Path,
    base: &Path,
    ui: &UiSettings,
) -> Result<Vec<Track>, PlaylistError> {
    let file: PlaylistFile = toml::from_str(text).map_err(|source| PlaylistError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    file.tracks
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let src = entry.src.trim();
            if src.is_empty() {
                return Err(PlaylistError::MissingSource { entry: i });
            }
            let source = resolve(base, src);
            let cover = entry
                .cover
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(|c| resolve(base, c));
            let title = entry
                .title
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| fallback_title(&source));
            let artist = entry.artist.map(|a| a.trim().to_string()).unwrap_or_default();
            let display =
                display_from_fields(&source, &title, &artist, &ui.row_fields, &ui.row_separator);

            debug!(row = i, source = %source.display(), "playlist entry");
            Ok(Track {
                source,
                cover,
                title,
                artist,
                display,
                row: RowId(i),
            })
        })
        .collect()
}

fn resolve(base: &Path, locator: &str) -> PathBuf {
    let p = Path::new(locator);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}
