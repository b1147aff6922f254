use std::path::Path;

use crate::config::RowField;

/// Build a playlist row label for a track according to `fields` and `sep`.
///
/// Empty fields are skipped; when nothing is produced the title is used.
pub fn display_from_fields(
    source: &Path,
    title: &str,
    artist: &str,
    fields: &[RowField],
    sep: &str,
) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for f in fields {
        let part = match f {
            RowField::Title => title.trim(),
            RowField::Artist => artist.trim(),
            RowField::Filename => source
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::trim)
                .unwrap_or(""),
        };
        if !part.is_empty() {
            parts.push(part);
        }
    }

    if parts.is_empty() {
        title.to_string()
    } else {
        parts.join(sep)
    }
}

/// Title used when a playlist entry or file carries none: the file stem.
pub(super) fn fallback_title(source: &Path) -> String {
    source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string()
}
