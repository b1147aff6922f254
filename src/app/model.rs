//! Player model types: `PlayerController` and `PlayerSession`.
//!
//! The controller owns the session, the display surfaces and the media
//! handle. UI clicks and media notifications reach it through
//! [`PlayerController::handle_ui_action`] and
//! [`PlayerController::handle_media_event`], one at a time, in delivery order.

use tracing::{debug, info, warn};

use crate::audio::{MediaEvent, MediaHandle};
use crate::error::{PlayerError, Result};
use crate::library::{RowId, Track};

use super::view::{ButtonGlyph, ViewState, format_time, progress_percent};
use super::watch::OnceWatch;

/// Pointer actions on the player's clickable regions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UiAction {
    TogglePlayback,
    Prev,
    Next,
    /// Click `offset` cells into a progress bar `width` cells wide.
    Seek { offset: u16, width: u16 },
    /// Click `offset` cells into a volume bar `width` cells wide.
    Volume { offset: u16, width: u16 },
    Row(RowId),
}

/// State of the single active session.
#[derive(Debug)]
pub struct PlayerSession {
    tracks: Vec<Track>,
    current: usize,
    volume: f32,
}

impl PlayerSession {
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Index of the loaded track.
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    fn index_of(&self, row: RowId) -> Option<usize> {
        self.tracks.iter().position(|t| t.row == row)
    }
}

/// Binds playback controls, progress and volume bars and the playlist to
/// one media handle.
pub struct PlayerController<M: MediaHandle> {
    session: PlayerSession,
    media: M,
    view: ViewState,
    metadata_watch: OnceWatch,
}

impl<M: MediaHandle> PlayerController<M> {
    /// Build the registry from `tracks`, apply `initial_volume` and load the
    /// first track without starting playback.
    pub fn new(tracks: Vec<Track>, media: M, initial_volume: f32) -> Result<Self> {
        if tracks.is_empty() {
            return Err(PlayerError::EmptyPlaylist);
        }

        let view = ViewState::new(&tracks);
        let mut controller = Self {
            session: PlayerSession {
                tracks,
                current: 0,
                volume: 1.0,
            },
            media,
            view,
            metadata_watch: OnceWatch::default(),
        };

        controller.set_volume(initial_volume.clamp(0.0, 1.0));
        controller.load_index(0);
        info!(tracks = controller.session.tracks.len(), "player initialized");
        Ok(controller)
    }

    pub fn session(&self) -> &PlayerSession {
        &self.session
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    /// Whether a metadata-ready notification is still awaited for the loaded track.
    pub fn awaiting_metadata(&self) -> bool {
        self.metadata_watch.is_armed()
    }

    /// Load the track at `index` without changing the play/pause request.
    pub fn load_track(&mut self, index: usize) -> Result<()> {
        let len = self.session.tracks.len();
        if index >= len {
            return Err(PlayerError::TrackOutOfRange { index, len });
        }
        self.load_index(index);
        Ok(())
    }

    fn load_index(&mut self, index: usize) {
        for row in &mut self.view.rows {
            row.active = false;
        }
        let track = &self.session.tracks[index];
        if let Some(row) = self.view.rows.get_mut(track.row.0) {
            row.active = true;
        }

        self.media.set_source(&track.source);
        self.view.cover = track.cover.clone();
        self.view.title = track.title.clone();
        self.view.artist = track.artist.clone();

        self.view.progress_percent = 0.0;
        self.view.current_time = format_time(0.0);
        self.view.total_time = format_time(0.0);
        self.view.status = None;

        // The handle announces metadata once per source assignment.
        self.metadata_watch.arm();
        self.session.current = index;
        debug!(index, source = %track.source.display(), "track loaded");
    }

    pub fn toggle_playback(&mut self) {
        self.view.status = None;
        if self.media.paused() {
            self.media.play();
            self.show_playing(true);
        } else {
            self.media.pause();
            self.show_playing(false);
        }
    }

    fn show_playing(&mut self, playing: bool) {
        self.view.glyph = if playing {
            ButtonGlyph::Pause
        } else {
            ButtonGlyph::Play
        };
        self.view.cover_spinning = playing;
    }

    pub fn on_progress_tick(&mut self) {
        let current = self.media.current_time();
        self.view.progress_percent = progress_percent(current, self.media.duration());
        self.view.current_time = format_time(current);
    }

    /// Jump to the position under a click `offset_x` into a progress track
    /// `track_width` wide.
    pub fn seek(&mut self, offset_x: f64, track_width: f64) {
        if !(track_width > 0.0) || !offset_x.is_finite() {
            debug!(offset_x, track_width, "seek ignored: bad geometry");
            return;
        }
        let Some(duration) = self.media.duration().filter(|d| d.is_finite() && *d > 0.0) else {
            debug!("seek ignored: duration unknown");
            return;
        };

        let target = (offset_x / track_width).clamp(0.0, 1.0) * duration;
        self.media.set_current_time(target);
        self.on_progress_tick();
    }

    /// Set the volume under a click `offset_x` into a volume bar `bar_width` wide.
    pub fn adjust_volume(&mut self, offset_x: f64, bar_width: f64) {
        if !(bar_width > 0.0) || !offset_x.is_finite() {
            debug!(offset_x, bar_width, "volume change ignored: bad geometry");
            return;
        }
        self.set_volume((offset_x / bar_width).clamp(0.0, 1.0) as f32);
    }

    fn set_volume(&mut self, volume: f32) {
        self.media.set_volume(volume);
        self.session.volume = volume;
        self.view.volume_percent = f64::from(volume) * 100.0;
    }

    pub fn prev_track(&mut self) {
        let n = self.session.tracks.len();
        self.switch_to((self.session.current + n - 1) % n);
    }

    pub fn next_track(&mut self) {
        let n = self.session.tracks.len();
        self.switch_to((self.session.current + 1) % n);
    }

    /// Load `index`, resuming playback if it was running before the switch.
    fn switch_to(&mut self, index: usize) {
        let was_playing = !self.media.paused();
        self.load_index(index);
        if was_playing {
            self.media.play();
        }
        self.show_playing(was_playing);
    }

    pub fn on_track_ended(&mut self) {
        self.next_track();
    }

    /// Load the clicked row's track and toggle playback.
    ///
    /// Clicking the row of the track that is playing pauses it.
    pub fn on_playlist_row_activated(&mut self, row: RowId) {
        let Some(index) = self.session.index_of(row) else {
            warn!(?row, "click on unknown playlist row");
            return;
        };

        if index != self.session.current || self.media.paused() {
            self.load_index(index);
        }
        self.toggle_playback();
    }

    pub fn on_metadata_ready(&mut self) {
        let Some(duration) = self.media.duration().filter(|d| d.is_finite()) else {
            debug!("metadata notification without a known duration");
            return;
        };
        if self.metadata_watch.fire() {
            self.view.total_time = format_time(duration);
        }
    }

    /// Report a playback failure and bring the controls back in line with
    /// the handle.
    pub fn on_media_failed(&mut self, message: String) {
        warn!(%message, "media failure");
        self.view.status = Some(message);
        let playing = !self.media.paused();
        self.show_playing(playing);
    }

    pub fn handle_ui_action(&mut self, action: UiAction) {
        debug!(?action, "ui action");
        match action {
            UiAction::TogglePlayback => self.toggle_playback(),
            UiAction::Prev => self.prev_track(),
            UiAction::Next => self.next_track(),
            UiAction::Seek { offset, width } => self.seek(f64::from(offset), f64::from(width)),
            UiAction::Volume { offset, width } => {
                self.adjust_volume(f64::from(offset), f64::from(width))
            }
            UiAction::Row(row) => self.on_playlist_row_activated(row),
        }
    }

    pub fn handle_media_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::MetadataReady => self.on_metadata_ready(),
            MediaEvent::ProgressTick => self.on_progress_tick(),
            MediaEvent::Ended => self.on_track_ended(),
            MediaEvent::Failed(message) => self.on_media_failed(message),
        }
    }
}
