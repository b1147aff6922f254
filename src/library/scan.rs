use std::path::{Path, PathBuf};

use lofty::prelude::*;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::{LibrarySettings, UiSettings};

use super::display::{display_from_fields, fallback_title};
use super::model::{RowId, Track};

const COVER_NAMES: [&str; 4] = ["cover.jpg", "cover.png", "folder.jpg", "folder.png"];

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// First conventional artwork file sitting next to `track_path`.
fn find_cover(track_path: &Path) -> Option<PathBuf> {
    let dir = track_path.parent()?;
    COVER_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

/// Build a playlist from the audio files found under `dir`.
///
/// Tracks are ordered by their row label (case-insensitive) and rows are
/// numbered in that order.
pub fn scan(dir: &Path, settings: &LibrarySettings, ui: &UiSettings) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !(path.is_file() && is_audio_file(path, settings)) {
            continue;
        }

        let mut title = fallback_title(path);
        let mut artist = String::new();

        match lofty::read_from_path(path) {
            Ok(tagged) => {
                if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                    if let Some(v) = tag.title().filter(|v| !v.trim().is_empty()) {
                        title = v.trim().to_string();
                    }
                    if let Some(v) = tag.artist().filter(|v| !v.trim().is_empty()) {
                        artist = v.trim().to_string();
                    }
                }
            }
            Err(e) => debug!(path = %path.display(), error = %e, "no readable tags"),
        }

        let display = display_from_fields(path, &title, &artist, &ui.row_fields, &ui.row_separator);

        tracks.push(Track {
            source: path.to_path_buf(),
            cover: find_cover(path),
            title,
            artist,
            display,
            row: RowId(0),
        });
    }

    tracks.sort_by_key(|t| t.display.to_lowercase());
    for (i, t) in tracks.iter_mut().enumerate() {
        t.row = RowId(i);
    }

    info!(dir = %dir.display(), tracks = tracks.len(), "directory scanned");
    tracks
}
