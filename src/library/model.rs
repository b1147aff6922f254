use std::path::PathBuf;

/// Identity of the playlist row that shows a track.
///
/// Rows are numbered in playlist order; the id is only used to find a track
/// again when its row is clicked and to toggle the row highlight.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RowId(pub usize);

/// One playable item and its display metadata.
#[derive(Debug, Clone)]
pub struct Track {
    pub source: PathBuf,
    pub cover: Option<PathBuf>,
    pub title: String,
    pub artist: String,
    /// Row label composed from the configured row fields.
    pub display: String,
    pub row: RowId,
}
