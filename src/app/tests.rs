use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::*;
use crate::audio::{MediaEvent, MediaHandle, MediaNotice};
use crate::error::PlayerError;
use crate::library::{RowId, Track};

#[derive(Debug)]
struct FakeState {
    /// Bumped on every source assignment.
    serial: u64,
    source: Option<PathBuf>,
    sources: Vec<PathBuf>,
    position: f64,
    duration: Option<f64>,
    volume: f32,
    paused: bool,
    plays: usize,
    pauses: usize,
}

/// In-memory media handle; tests keep a second handle to the state.
#[derive(Clone)]
struct FakeMedia(Rc<RefCell<FakeState>>);

impl FakeMedia {
    fn new() -> Self {
        Self(Rc::new(RefCell::new(FakeState {
            serial: 0,
            source: None,
            sources: Vec::new(),
            position: 0.0,
            duration: None,
            volume: 1.0,
            paused: true,
            plays: 0,
            pauses: 0,
        })))
    }

    fn state(&self) -> std::cell::Ref<'_, FakeState> {
        self.0.borrow()
    }

    /// Metadata for the loaded source became known.
    fn set_duration(&self, seconds: f64) {
        self.0.borrow_mut().duration = Some(seconds);
    }

    fn set_position(&self, seconds: f64) {
        self.0.borrow_mut().position = seconds;
    }

    /// A notice about the currently assigned source.
    fn notice(&self, event: MediaEvent) -> MediaNotice {
        MediaNotice {
            serial: Some(self.state().serial),
            event,
        }
    }

    /// Deliver `notice` the way the runtime does: only if still current.
    fn deliver(&self, c: &mut PlayerController<FakeMedia>, notice: MediaNotice) {
        let serial = self.state().serial;
        if let Some(event) = notice.for_serial(serial) {
            c.handle_media_event(event);
        }
    }

    fn force_pause(&self) {
        self.0.borrow_mut().paused = true;
    }
}

impl MediaHandle for FakeMedia {
    fn set_source(&mut self, source: &Path) {
        let mut s = self.0.borrow_mut();
        s.serial += 1;
        s.source = Some(source.to_path_buf());
        s.sources.push(source.to_path_buf());
        s.position = 0.0;
        s.duration = None;
        s.paused = true;
    }

    fn current_time(&self) -> f64 {
        self.0.borrow().position
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.0.borrow_mut().position = seconds;
    }

    fn duration(&self) -> Option<f64> {
        self.0.borrow().duration
    }

    fn set_volume(&mut self, volume: f32) {
        self.0.borrow_mut().volume = volume;
    }

    fn paused(&self) -> bool {
        self.0.borrow().paused
    }

    fn play(&mut self) {
        let mut s = self.0.borrow_mut();
        s.paused = false;
        s.plays += 1;
    }

    fn pause(&mut self) {
        let mut s = self.0.borrow_mut();
        s.paused = true;
        s.pauses += 1;
    }
}

fn t(i: usize, title: &str) -> Track {
    Track {
        source: PathBuf::from(format!("/music/{title}.mp3")),
        cover: Some(PathBuf::from(format!("/covers/{title}.jpg"))),
        title: title.to_string(),
        artist: format!("Artist {i}"),
        display: format!("Artist {i} - {title}"),
        row: RowId(i),
    }
}

fn playlist(n: usize) -> Vec<Track> {
    ["Alpha", "Beta", "Gamma", "Delta", "Epsilon"]
        .iter()
        .take(n)
        .enumerate()
        .map(|(i, title)| t(i, title))
        .collect()
}

fn controller(n: usize) -> (PlayerController<FakeMedia>, FakeMedia) {
    let media = FakeMedia::new();
    let c = PlayerController::new(playlist(n), media.clone(), 1.0).unwrap();
    (c, media)
}

fn assert_single_active(c: &PlayerController<FakeMedia>, index: usize) {
    let active: Vec<usize> = c
        .view()
        .rows
        .iter()
        .enumerate()
        .filter(|(_, r)| r.active)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(active, vec![index]);
    assert_eq!(c.view().active_row(), Some(index));
}

fn assert_displays(c: &PlayerController<FakeMedia>, media: &FakeMedia, index: usize) {
    let track = &c.session().tracks()[index];
    assert_eq!(c.session().current(), index);
    assert_eq!(media.state().source.as_deref(), Some(track.source.as_path()));
    assert_eq!(c.view().title, track.title);
    assert_eq!(c.view().artist, track.artist);
    assert_eq!(c.view().cover, track.cover);
    assert_eq!(c.view().progress_percent, 0.0);
    assert_single_active(c, index);
}

#[test]
fn format_time_pads_minutes_and_seconds() {
    assert_eq!(format_time(65.0), "01:05");
    assert_eq!(format_time(0.0), "00:00");
    assert_eq!(format_time(3599.0), "59:59");
    assert_eq!(format_time(3600.0), "60:00");
    assert_eq!(format_time(59.99), "00:59");
}

#[test]
fn format_time_is_always_mm_ss_for_non_negative_input() {
    for secs in [0.0, 0.4, 9.0, 61.5, 600.0, 1234.9, 3599.999] {
        let s = format_time(secs);
        let (mm, ss) = s.split_once(':').unwrap();
        assert_eq!(mm.len(), 2, "{s}");
        assert_eq!(ss.len(), 2, "{s}");
        assert!(mm.chars().chain(ss.chars()).all(|c| c.is_ascii_digit()), "{s}");
        assert!(ss.parse::<u32>().unwrap() < 60, "{s}");
    }
}

#[test]
fn format_time_renders_garbage_as_zero() {
    assert_eq!(format_time(f64::NAN), "00:00");
    assert_eq!(format_time(f64::INFINITY), "00:00");
    assert_eq!(format_time(-3.0), "00:00");
}

#[test]
fn progress_percent_guards_unknown_duration() {
    assert_eq!(progress_percent(10.0, None), 0.0);
    assert_eq!(progress_percent(10.0, Some(f64::NAN)), 0.0);
    assert_eq!(progress_percent(10.0, Some(0.0)), 0.0);
    assert_eq!(progress_percent(30.0, Some(120.0)), 25.0);
    assert_eq!(progress_percent(130.0, Some(120.0)), 100.0);
}

#[test]
fn once_watch_fires_once_per_arming() {
    let mut w = OnceWatch::default();
    assert!(!w.fire());
    w.arm();
    w.arm();
    assert!(w.is_armed());
    assert!(w.fire());
    assert!(!w.fire());
}

#[test]
fn empty_playlist_is_rejected() {
    let err = PlayerController::new(Vec::new(), FakeMedia::new(), 1.0)
        .err()
        .unwrap();
    assert!(matches!(err, PlayerError::EmptyPlaylist));
}

#[test]
fn initialize_loads_first_track_paused() {
    let media = FakeMedia::new();
    let c = PlayerController::new(playlist(3), media.clone(), 0.6).unwrap();

    assert_displays(&c, &media, 0);
    assert!(media.state().paused);
    assert_eq!(media.state().plays, 0);
    assert_eq!(c.view().glyph, ButtonGlyph::Play);
    assert!(!c.view().cover_spinning);
    assert!(c.awaiting_metadata());
    assert!((media.state().volume - 0.6).abs() < f32::EPSILON);
    assert!((c.session().volume() - 0.6).abs() < f32::EPSILON);
    assert!((c.view().volume_percent - 60.0).abs() < 1e-4);
    assert_eq!(c.view().rows.len(), 3);
    assert_eq!(c.view().rows[1].label, "Artist 1 - Beta");
}

#[test]
fn next_wraps_from_last_to_first_and_prev_from_first_to_last() {
    let (mut c, media) = controller(4);

    c.prev_track();
    assert_displays(&c, &media, 3);

    c.next_track();
    assert_displays(&c, &media, 0);

    c.load_track(3).unwrap();
    c.next_track();
    assert_eq!(c.session().current(), 0);
}

#[test]
fn single_track_playlist_navigates_onto_itself() {
    let (mut c, media) = controller(1);
    c.next_track();
    assert_displays(&c, &media, 0);
    c.prev_track();
    assert_displays(&c, &media, 0);
}

#[test]
fn exactly_one_row_is_active_after_every_load() {
    let (mut c, media) = controller(5);
    for i in [3, 1, 4, 4, 0, 2] {
        c.load_track(i).unwrap();
        assert_displays(&c, &media, i);
    }
}

#[test]
fn load_track_out_of_range_changes_nothing() {
    let (mut c, media) = controller(2);
    let err = c.load_track(2).unwrap_err();
    assert!(matches!(
        err,
        PlayerError::TrackOutOfRange { index: 2, len: 2 }
    ));
    assert_displays(&c, &media, 0);
    assert_eq!(media.state().sources.len(), 1);
}

#[test]
fn toggling_twice_restores_playback_state() {
    let (mut c, media) = controller(2);

    c.toggle_playback();
    assert!(!media.state().paused);
    assert_eq!(c.view().glyph, ButtonGlyph::Pause);
    assert!(c.view().cover_spinning);

    c.toggle_playback();
    assert!(media.state().paused);
    assert_eq!(c.view().glyph, ButtonGlyph::Play);
    assert!(!c.view().cover_spinning);
    assert_eq!(media.state().plays, 1);
    assert_eq!(media.state().pauses, 1);
}

#[test]
fn track_end_cycles_through_playlist_and_wraps() {
    let (mut c, media) = controller(3);

    for expected in [1, 2, 0] {
        c.handle_media_event(MediaEvent::Ended);
        assert_displays(&c, &media, expected);
    }
    assert!(media.state().paused);
    assert_eq!(c.view().glyph, ButtonGlyph::Play);
}

#[test]
fn track_end_while_playing_keeps_playing_next_track() {
    let (mut c, media) = controller(3);
    c.toggle_playback();

    c.handle_media_event(MediaEvent::Ended);
    assert_displays(&c, &media, 1);
    assert!(!media.state().paused);
    assert_eq!(media.state().plays, 2);
    assert_eq!(c.view().glyph, ButtonGlyph::Pause);
    assert!(c.view().cover_spinning);
}

#[test]
fn prev_and_next_leave_paused_playback_paused() {
    let (mut c, media) = controller(3);
    c.next_track();
    c.prev_track();
    assert!(media.state().paused);
    assert_eq!(media.state().plays, 0);
    assert_eq!(c.view().glyph, ButtonGlyph::Play);
}

#[test]
fn seek_maps_click_to_time() {
    let (mut c, media) = controller(2);
    media.set_duration(120.0);

    c.seek(50.0, 200.0);
    assert_eq!(media.state().position, 30.0);
    assert_eq!(c.view().progress_percent, 25.0);
    assert_eq!(c.view().current_time, "00:30");
}

#[test]
fn seek_clamps_clicks_past_the_edges() {
    let (mut c, media) = controller(2);
    media.set_duration(120.0);

    c.seek(250.0, 200.0);
    assert_eq!(media.state().position, 120.0);

    c.seek(-5.0, 200.0);
    assert_eq!(media.state().position, 0.0);
}

#[test]
fn seek_is_ignored_without_duration_or_width() {
    let (mut c, media) = controller(2);
    media.set_position(7.0);

    c.seek(50.0, 200.0);
    assert_eq!(media.state().position, 7.0);

    media.set_duration(f64::INFINITY);
    c.seek(50.0, 200.0);
    assert_eq!(media.state().position, 7.0);

    media.set_duration(120.0);
    c.seek(50.0, 0.0);
    assert_eq!(media.state().position, 7.0);
}

#[test]
fn volume_maps_click_to_level_and_fill() {
    let (mut c, media) = controller(2);

    c.adjust_volume(25.0, 100.0);
    assert_eq!(media.state().volume, 0.25);
    assert_eq!(c.session().volume(), 0.25);
    assert_eq!(c.view().volume_percent, 25.0);

    c.adjust_volume(140.0, 100.0);
    assert_eq!(media.state().volume, 1.0);
    assert_eq!(c.view().volume_percent, 100.0);

    c.adjust_volume(-3.0, 100.0);
    assert_eq!(media.state().volume, 0.0);

    c.adjust_volume(10.0, 0.0);
    assert_eq!(media.state().volume, 0.0);
}

#[test]
fn progress_tick_updates_bar_and_time_text() {
    let (mut c, media) = controller(2);

    media.set_position(12.0);
    c.handle_media_event(MediaEvent::ProgressTick);
    assert_eq!(c.view().progress_percent, 0.0);
    assert_eq!(c.view().current_time, "00:12");

    media.set_duration(200.0);
    media.set_position(50.0);
    c.handle_media_event(MediaEvent::ProgressTick);
    assert_eq!(c.view().progress_percent, 25.0);
    assert_eq!(c.view().current_time, "00:50");
}

#[test]
fn metadata_ready_sets_total_time_once_per_load() {
    let (mut c, media) = controller(2);

    media.set_duration(185.0);
    c.handle_media_event(MediaEvent::MetadataReady);
    assert_eq!(c.view().total_time, "03:05");
    assert!(!c.awaiting_metadata());

    // A second notification for the same load is inert.
    media.set_duration(10.0);
    c.handle_media_event(MediaEvent::MetadataReady);
    assert_eq!(c.view().total_time, "03:05");

    c.next_track();
    assert!(c.awaiting_metadata());
    assert_eq!(c.view().total_time, "00:00");
    media.set_duration(61.0);
    c.handle_media_event(MediaEvent::MetadataReady);
    assert_eq!(c.view().total_time, "01:01");
}

#[test]
fn stale_metadata_without_duration_keeps_watch_armed() {
    let (mut c, media) = controller(2);
    c.next_track();

    // Notification from the previous source: the handle has no duration for the new one yet.
    c.handle_media_event(MediaEvent::MetadataReady);
    assert!(c.awaiting_metadata());
    assert_eq!(c.view().total_time, "00:00");

    media.set_duration(42.0);
    c.handle_media_event(MediaEvent::MetadataReady);
    assert_eq!(c.view().total_time, "00:42");
}

#[test]
fn activating_another_row_loads_and_plays_it() {
    let (mut c, media) = controller(3);

    c.on_playlist_row_activated(RowId(2));
    assert_displays(&c, &media, 2);
    assert!(!media.state().paused);
    assert_eq!(c.view().glyph, ButtonGlyph::Pause);
}

#[test]
fn activating_the_playing_row_pauses_it() {
    let (mut c, media) = controller(3);
    c.on_playlist_row_activated(RowId(1));
    media.set_position(33.0);
    let loads = media.state().sources.len();

    c.on_playlist_row_activated(RowId(1));
    assert!(media.state().paused);
    assert_eq!(media.state().sources.len(), loads);
    assert_eq!(media.state().position, 33.0);
    assert_eq!(c.view().glyph, ButtonGlyph::Play);
    assert_single_active(&c, 1);
}

#[test]
fn activating_the_paused_current_row_restarts_it_playing() {
    let (mut c, media) = controller(3);
    media.set_position(20.0);

    c.on_playlist_row_activated(RowId(0));
    assert_eq!(media.state().sources.len(), 2);
    assert_eq!(media.state().position, 0.0);
    assert!(!media.state().paused);
}

#[test]
fn activating_unknown_row_is_ignored() {
    let (mut c, media) = controller(2);
    c.on_playlist_row_activated(RowId(9));
    assert_displays(&c, &media, 0);
    assert!(media.state().paused);
}

#[test]
fn media_failure_is_reported_and_controls_resync() {
    let (mut c, media) = controller(2);
    c.toggle_playback();

    media.force_pause();
    c.handle_media_event(MediaEvent::Failed("cannot decode Alpha".into()));
    assert_eq!(c.view().status.as_deref(), Some("cannot decode Alpha"));
    assert_eq!(c.view().glyph, ButtonGlyph::Play);
    assert!(!c.view().cover_spinning);

    c.toggle_playback();
    assert!(c.view().status.is_none());
    assert!(!media.state().paused);
}

#[test]
fn ui_actions_dispatch_to_operations() {
    let (mut c, media) = controller(3);
    media.set_duration(120.0);

    c.handle_ui_action(UiAction::Seek {
        offset: 50,
        width: 200,
    });
    assert_eq!(media.state().position, 30.0);

    c.handle_ui_action(UiAction::Volume {
        offset: 25,
        width: 100,
    });
    assert_eq!(c.view().volume_percent, 25.0);

    c.handle_ui_action(UiAction::Next);
    assert_eq!(c.session().current(), 1);
    c.handle_ui_action(UiAction::Prev);
    assert_eq!(c.session().current(), 0);

    c.handle_ui_action(UiAction::TogglePlayback);
    assert!(!media.state().paused);

    c.handle_ui_action(UiAction::Row(RowId(2)));
    assert_eq!(c.session().current(), 2);
    assert!(!media.state().paused);
}

#[test]
fn ended_queued_before_user_next_does_not_skip_a_track() {
    let (mut c, media) = controller(3);
    c.toggle_playback();

    // Track 0 ends, but the user clicks next before the notice is drained.
    let ended = media.notice(MediaEvent::Ended);
    c.handle_ui_action(UiAction::Next);
    media.deliver(&mut c, ended);

    assert_displays(&c, &media, 1);
    assert!(!media.state().paused);
    assert_eq!(c.view().glyph, ButtonGlyph::Pause);

    // The new track's own end still advances.
    let ended = media.notice(MediaEvent::Ended);
    media.deliver(&mut c, ended);
    assert_displays(&c, &media, 2);
}

#[test]
fn failure_of_a_skipped_track_leaves_the_next_one_alone() {
    let (mut c, media) = controller(3);
    c.toggle_playback();
    c.next_track();
    let failed = media.notice(MediaEvent::Failed("cannot decode Beta".into()));
    c.next_track();

    media.deliver(&mut c, failed);
    assert!(c.view().status.is_none());
    assert_eq!(c.view().glyph, ButtonGlyph::Pause);
    assert_displays(&c, &media, 2);
}
