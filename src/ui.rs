//! UI rendering helpers for the terminal user interface.
//!
//! `draw` renders a [`ViewState`] with `ratatui` and returns the screen
//! [`Regions`] of every clickable control, so the event loop can turn a
//! mouse click into a [`UiAction`].

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph},
};

use crate::app::{ButtonGlyph, UiAction, ViewState};
use crate::library::RowId;

/// Frames of the cover animation.
const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

const PREV_LABEL: &str = " ⏮ ";
const NEXT_LABEL: &str = " ⏭ ";
const BUTTON_WIDTH: u16 = 5;
const TIME_WIDTH: u16 = 7;

/// Screen rectangles of the clickable controls from the last frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Regions {
    pub prev: Rect,
    pub play: Rect,
    pub next: Rect,
    /// The progress bar cells, without the time labels.
    pub progress: Rect,
    /// The volume bar cells, without the labels.
    pub volume: Rect,
    /// Inner area of the playlist, one line per visible row.
    pub playlist: Rect,
    /// Index of the first visible playlist row.
    pub list_offset: usize,
    /// Number of playlist rows drawn.
    pub list_visible: usize,
}

impl Regions {
    /// Map a left click at (`column`, `row`) to the control under it.
    pub fn hit(&self, column: u16, row: u16) -> Option<UiAction> {
        let pos = Position::new(column, row);

        if self.play.contains(pos) {
            return Some(UiAction::TogglePlayback);
        }
        if self.prev.contains(pos) {
            return Some(UiAction::Prev);
        }
        if self.next.contains(pos) {
            return Some(UiAction::Next);
        }
        if self.progress.contains(pos) {
            let (offset, width) = bar_offset(self.progress, column);
            return Some(UiAction::Seek { offset, width });
        }
        if self.volume.contains(pos) {
            let (offset, width) = bar_offset(self.volume, column);
            return Some(UiAction::Volume { offset, width });
        }
        if self.playlist.contains(pos) {
            let line = usize::from(row - self.playlist.y);
            if line < self.list_visible {
                return Some(UiAction::Row(RowId(self.list_offset + line)));
            }
        }
        None
    }
}

/// Offset of `column` into a bar and the bar's span, so that the first cell
/// maps to 0% and the last cell to 100%.
fn bar_offset(bar: Rect, column: u16) -> (u16, u16) {
    (column - bar.x, bar.width.saturating_sub(1))
}

/// Render a bar `width` cells wide filled to `percent`.
///
/// The thumb sits on cell `round(p * (width - 1))`, the inverse of
/// [`Regions::hit`].
pub(crate) fn bar_line(percent: f64, width: u16) -> Line<'static> {
    let width = usize::from(width);
    if width == 0 {
        return Line::default();
    }

    let p = if percent.is_finite() {
        (percent / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let thumb = (p * (width - 1) as f64).round() as usize;

    Line::from(vec![
        Span::styled("━".repeat(thumb), Style::default().bold()),
        Span::styled("●", Style::default().bold()),
        Span::styled("─".repeat(width - thumb - 1), Style::default().dim()),
    ])
}

/// Centered window of `height` rows over `total`, keeping `selected` visible.
///
/// Returns `(start, end, selected position inside the window)`.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize, usize) {
    if height == 0 {
        return (0, 0, 0);
    }
    if total <= height {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

fn titled(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Render the entire UI into `frame` and return the clickable regions.
///
/// `spin_phase` selects the cover animation frame.
pub fn draw(frame: &mut Frame, view: &ViewState, header_text: &str, spin_phase: usize) -> Regions {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(header_text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" tunedeck ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    draw_now_playing(frame, chunks[1], view, spin_phase);

    let mut regions = Regions::default();
    draw_controls(frame, chunks[2], view, &mut regions);
    draw_progress(frame, chunks[3], view, &mut regions);
    draw_volume(frame, chunks[4], view, &mut regions);
    draw_playlist(frame, chunks[5], view, &mut regions);
    regions
}

fn draw_now_playing(frame: &mut Frame, area: Rect, view: &ViewState, spin_phase: usize) {
    let spinner = SPINNER[spin_phase % SPINNER.len()];
    let cover = view
        .cover
        .as_ref()
        .map(|c| c.display().to_string())
        .unwrap_or_else(|| "no cover".to_string());

    let mut lines = vec![
        Line::from(vec![
            Span::raw(format!("{spinner} ")),
            Span::styled(view.title.clone(), Style::default().bold()),
        ]),
        Line::from(format!("  {}", view.artist)),
        Line::from(Span::styled(format!("  {cover}"), Style::default().dim())),
    ];
    if let Some(status) = &view.status {
        lines.push(Line::from(Span::styled(
            format!("  {status}"),
            Style::default().red(),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(titled(" now playing ")), area);
}

fn draw_controls(frame: &mut Frame, area: Rect, view: &ViewState, regions: &mut Regions) {
    let block = Block::default().borders(Borders::ALL).title(" controls ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(BUTTON_WIDTH),
            Constraint::Length(1),
            Constraint::Length(BUTTON_WIDTH),
            Constraint::Length(1),
            Constraint::Length(BUTTON_WIDTH),
            Constraint::Fill(1),
        ])
        .split(inner);

    let glyph = match view.glyph {
        ButtonGlyph::Play => " ▶ ",
        ButtonGlyph::Pause => " ⏸ ",
    };
    for (rect, label) in [(cells[1], PREV_LABEL), (cells[3], glyph), (cells[5], NEXT_LABEL)] {
        frame.render_widget(
            Paragraph::new(label).alignment(Alignment::Center).reversed(),
            rect,
        );
    }

    regions.prev = cells[1];
    regions.play = cells[3];
    regions.next = cells[5];
}

/// A bordered row: left label, bar, right label.
fn bar_row(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    left: &str,
    percent: f64,
    right: &str,
) -> Rect {
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(TIME_WIDTH),
            Constraint::Min(1),
            Constraint::Length(TIME_WIDTH),
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(format!(" {left}")), cells[0]);
    frame.render_widget(Paragraph::new(bar_line(percent, cells[1].width)), cells[1]);
    frame.render_widget(
        Paragraph::new(right.to_string()).alignment(Alignment::Right),
        cells[2],
    );
    cells[1]
}

fn draw_progress(frame: &mut Frame, area: Rect, view: &ViewState, regions: &mut Regions) {
    regions.progress = bar_row(
        frame,
        area,
        " progress ",
        &view.current_time,
        view.progress_percent,
        &format!("{} ", view.total_time),
    );
}

fn draw_volume(frame: &mut Frame, area: Rect, view: &ViewState, regions: &mut Regions) {
    regions.volume = bar_row(
        frame,
        area,
        " volume ",
        "vol",
        view.volume_percent,
        &format!("{:.0}% ", view.volume_percent),
    );
}

fn draw_playlist(frame: &mut Frame, area: Rect, view: &ViewState, regions: &mut Regions) {
    let block = Block::default().borders(Borders::ALL).title(" tracks ");
    let inner = block.inner(area);

    // Only build items for the visible window.
    let selected = view.active_row().unwrap_or(0);
    let (start, end, selected_in_window) =
        visible_window(view.rows.len(), usize::from(inner.height), selected);

    let items: Vec<ListItem> = view.rows[start..end]
        .iter()
        .map(|r| ListItem::new(r.label.as_str()))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if view.active_row().is_some() {
        state.select(Some(selected_in_window));
    }
    frame.render_stateful_widget(list, area, &mut state);

    regions.playlist = inner;
    regions.list_offset = start;
    regions.list_visible = end - start;
}

#[cfg(test)]
mod tests;
