//! Display surfaces written by the controller and rendered by the UI.

use std::path::PathBuf;

use crate::library::Track;

/// Glyph shown on the play/pause button.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ButtonGlyph {
    /// Playback is paused; clicking starts it.
    #[default]
    Play,
    /// Playback is running; clicking pauses it.
    Pause,
}

/// One playlist row.
#[derive(Debug, Clone)]
pub struct RowView {
    pub label: String,
    pub active: bool,
}

/// Everything the screen shows about the session.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub rows: Vec<RowView>,
    pub cover: Option<PathBuf>,
    pub title: String,
    pub artist: String,
    pub glyph: ButtonGlyph,
    /// Run-state of the cover animation.
    pub cover_spinning: bool,
    /// Progress bar fill and thumb position, `[0, 100]`.
    pub progress_percent: f64,
    /// Volume bar fill and thumb position, `[0, 100]`.
    pub volume_percent: f64,
    pub current_time: String,
    pub total_time: String,
    /// Last playback failure, shown until the next load or toggle.
    pub status: Option<String>,
}

impl ViewState {
    pub(super) fn new(tracks: &[Track]) -> Self {
        Self {
            rows: tracks
                .iter()
                .map(|t| RowView {
                    label: t.display.clone(),
                    active: false,
                })
                .collect(),
            cover: None,
            title: String::new(),
            artist: String::new(),
            glyph: ButtonGlyph::Play,
            cover_spinning: false,
            progress_percent: 0.0,
            volume_percent: 100.0,
            current_time: format_time(0.0),
            total_time: format_time(0.0),
            status: None,
        }
    }

    /// Index of the highlighted row, when exactly one is highlighted.
    pub fn active_row(&self) -> Option<usize> {
        let mut active = self.rows.iter().enumerate().filter(|(_, r)| r.active);
        match (active.next(), active.next()) {
            (Some((i, _)), None) => Some(i),
            _ => None,
        }
    }
}

/// Formats a position in seconds as a zero-padded `MM:SS` string.
///
/// Minutes are not wrapped into hours. Negative or non-finite input renders
/// as `00:00`.
///
/// ```ignore
/// assert_eq!(format_time(65.0), "01:05");
/// assert_eq!(format_time(3600.0), "60:00");
/// ```
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Share of `duration` reached at `current`, as a percentage in `[0, 100]`.
///
/// An unknown, zero or non-finite duration yields 0.
pub fn progress_percent(current: f64, duration: Option<f64>) -> f64 {
    match duration {
        Some(d) if d.is_finite() && d > 0.0 && current.is_finite() => {
            (current / d * 100.0).clamp(0.0, 100.0)
        }
        _ => 0.0,
    }
}
