use std::path::PathBuf;

use ratatui::{Terminal, backend::TestBackend, layout::Rect};

use super::*;
use crate::app::{RowView, format_time};

fn view(rows: usize, active: usize) -> ViewState {
    ViewState {
        rows: (0..rows)
            .map(|i| RowView {
                label: format!("Band - Song {i}"),
                active: i == active,
            })
            .collect(),
        cover: Some(PathBuf::from("/covers/song.jpg")),
        title: format!("Song {active}"),
        artist: "Band".to_string(),
        glyph: ButtonGlyph::Play,
        cover_spinning: false,
        progress_percent: 0.0,
        volume_percent: 100.0,
        current_time: format_time(0.0),
        total_time: format_time(185.0),
        status: None,
    }
}

fn render(view: &ViewState, width: u16, height: u16) -> (Regions, Vec<String>) {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    let mut regions = Regions::default();
    terminal
        .draw(|f| regions = draw(f, view, " ~ tunedeck ~ ", 0))
        .unwrap();

    let buffer = terminal.backend().buffer();
    let lines = (0..buffer.area.height)
        .map(|y| {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol().to_string())
                .collect::<String>()
        })
        .collect();
    (regions, lines)
}

fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

#[test]
fn bar_line_places_thumb_at_fill() {
    assert_eq!(line_text(&bar_line(0.0, 5)), "●────");
    assert_eq!(line_text(&bar_line(50.0, 5)), "━━●──");
    assert_eq!(line_text(&bar_line(100.0, 5)), "━━━━●");
}

#[test]
fn bar_line_clamps_and_handles_degenerate_widths() {
    assert_eq!(line_text(&bar_line(250.0, 4)), "━━━●");
    assert_eq!(line_text(&bar_line(-10.0, 4)), "●───");
    assert_eq!(line_text(&bar_line(f64::NAN, 3)), "●──");
    assert_eq!(line_text(&bar_line(40.0, 1)), "●");
    assert_eq!(line_text(&bar_line(40.0, 0)), "");
}

#[test]
fn visible_window_centers_selection() {
    assert_eq!(visible_window(3, 10, 2), (0, 3, 2));
    assert_eq!(visible_window(20, 10, 15), (10, 20, 5));
    assert_eq!(visible_window(20, 10, 8), (3, 13, 5));
    assert_eq!(visible_window(20, 10, 1), (0, 10, 1));
    assert_eq!(visible_window(20, 0, 4), (0, 0, 0));
}

#[test]
fn hit_maps_buttons() {
    let regions = Regions {
        prev: Rect::new(10, 5, 5, 1),
        play: Rect::new(16, 5, 5, 1),
        next: Rect::new(22, 5, 5, 1),
        ..Regions::default()
    };
    assert_eq!(regions.hit(12, 5), Some(UiAction::Prev));
    assert_eq!(regions.hit(16, 5), Some(UiAction::TogglePlayback));
    assert_eq!(regions.hit(26, 5), Some(UiAction::Next));
    assert_eq!(regions.hit(15, 5), None);
    assert_eq!(regions.hit(12, 6), None);
}

#[test]
fn hit_maps_bar_edges_to_full_range() {
    let regions = Regions {
        progress: Rect::new(8, 13, 41, 1),
        volume: Rect::new(8, 16, 11, 1),
        ..Regions::default()
    };
    assert_eq!(
        regions.hit(8, 13),
        Some(UiAction::Seek {
            offset: 0,
            width: 40
        })
    );
    assert_eq!(
        regions.hit(48, 13),
        Some(UiAction::Seek {
            offset: 40,
            width: 40
        })
    );
    assert_eq!(
        regions.hit(13, 16),
        Some(UiAction::Volume {
            offset: 5,
            width: 10
        })
    );
    assert_eq!(regions.hit(49, 13), None);
}

#[test]
fn hit_maps_playlist_lines_to_rows() {
    let regions = Regions {
        playlist: Rect::new(1, 20, 30, 8),
        list_offset: 4,
        list_visible: 3,
        ..Regions::default()
    };
    assert_eq!(regions.hit(5, 20), Some(UiAction::Row(RowId(4))));
    assert_eq!(regions.hit(5, 22), Some(UiAction::Row(RowId(6))));
    assert_eq!(regions.hit(5, 23), None);
}

#[test]
fn draw_renders_every_surface() {
    let mut v = view(3, 1);
    v.status = Some("cannot decode".to_string());
    let (_, lines) = render(&v, 60, 30);
    let screen = lines.join("\n");

    assert!(screen.contains("~ tunedeck ~"));
    assert!(screen.contains("Song 1"));
    assert!(screen.contains("/covers/song.jpg"));
    assert!(screen.contains("cannot decode"));
    assert!(screen.contains("00:00"));
    assert!(screen.contains("03:05"));
    assert!(screen.contains("100%"));
    assert!(screen.contains("> Band - Song 1"));
    assert!(screen.contains("Band - Song 2"));
}

#[test]
fn draw_reports_regions_that_hit_back_to_controls() {
    let v = view(3, 0);
    let (regions, lines) = render(&v, 60, 30);

    let play = regions.play;
    assert_eq!(
        regions.hit(play.x, play.y),
        Some(UiAction::TogglePlayback)
    );
    assert_eq!(regions.hit(regions.prev.x, regions.prev.y), Some(UiAction::Prev));
    assert_eq!(regions.hit(regions.next.x, regions.next.y), Some(UiAction::Next));

    let bar = regions.progress;
    assert!(bar.width > 1);
    assert_eq!(
        regions.hit(bar.x + bar.width - 1, bar.y),
        Some(UiAction::Seek {
            offset: bar.width - 1,
            width: bar.width - 1
        })
    );
    // Progress is at zero: the thumb sits on the first bar cell.
    let row: Vec<char> = lines[usize::from(bar.y)].chars().collect();
    assert_eq!(row[usize::from(bar.x)], '●');

    let vol = regions.volume;
    let row: Vec<char> = lines[usize::from(vol.y)].chars().collect();
    assert_eq!(row[usize::from(vol.x + vol.width - 1)], '●');

    assert_eq!(regions.list_offset, 0);
    assert_eq!(regions.list_visible, 3);
    assert_eq!(
        regions.hit(regions.playlist.x, regions.playlist.y + 2),
        Some(UiAction::Row(RowId(2)))
    );
}

#[test]
fn draw_scrolls_playlist_to_active_row() {
    let v = view(40, 35);
    let (regions, lines) = render(&v, 60, 30);

    let visible = regions.list_visible;
    assert!(visible > 0 && visible < 40);
    assert!(regions.list_offset + visible > 35);
    assert!(regions.list_offset <= 35);
    let active_line = regions.playlist.y + (35 - regions.list_offset) as u16;
    assert!(lines[usize::from(active_line)].contains("> Band - Song 35"));
    assert_eq!(
        regions.hit(regions.playlist.x, active_line),
        Some(UiAction::Row(RowId(35)))
    );
}
