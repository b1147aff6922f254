//! Audio-related small types and handles.
//!
//! This module defines the capability set the player controller consumes
//! from a media handle, the notifications a handle emits, and the command
//! and shared-state types used by the rodio-backed handle.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A media-playback primitive: something that decodes and outputs audio.
///
/// Requests are fire-and-forget; outcomes that arrive later (metadata,
/// progress, end of track, failures) are reported as [`MediaEvent`]s.
pub trait MediaHandle {
    /// Assign a new audio source. The handle is left paused at position 0
    /// and will emit [`MediaEvent::MetadataReady`] once for this source.
    fn set_source(&mut self, source: &Path);

    /// Playback position of the current source, in seconds.
    fn current_time(&self) -> f64;

    /// Move the playback position of the current source, in seconds.
    fn set_current_time(&mut self, seconds: f64);

    /// Duration of the current source in seconds, `None` until known.
    fn duration(&self) -> Option<f64>;

    /// Output volume in `[0, 1]`.
    fn set_volume(&mut self, volume: f32);

    fn paused(&self) -> bool;

    /// Request playback. Failures surface as [`MediaEvent::Failed`].
    fn play(&mut self);

    fn pause(&mut self);
}

/// Notifications emitted by a media handle.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Duration and format of the last assigned source are known.
    MetadataReady,
    /// Periodic position update while playing.
    ProgressTick,
    /// The current source played to its end.
    Ended,
    /// Opening, decoding or output failed.
    Failed(String),
}

/// A [`MediaEvent`] tagged with the source assignment it is about.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaNotice {
    /// Serial of the source the event belongs to; `None` for engine-wide
    /// failures that concern every source.
    pub serial: Option<u64>,
    pub event: MediaEvent,
}

impl MediaNotice {
    pub fn engine(event: MediaEvent) -> Self {
        Self {
            serial: None,
            event,
        }
    }

    /// The event, unless it belongs to a source replaced since it was sent.
    pub fn for_serial(self, current: u64) -> Option<MediaEvent> {
        match self.serial {
            Some(serial) if serial != current => None,
            _ => Some(self.event),
        }
    }
}

#[derive(Debug)]
pub enum AudioCmd {
    /// Open and decode `source`, paused at its start.
    Load { source: PathBuf, serial: u64 },
    /// Start or resume playback of the loaded source.
    Play,
    /// Pause playback.
    Pause,
    /// Jump to an absolute position in the loaded source.
    Seek(Duration),
    /// Set the output volume in `[0, 1]`.
    SetVolume(f32),
    /// Quit the audio thread, fading out over `fade_out` (zero stops at once).
    Quit { fade_out: Duration },
}

#[derive(Debug, Clone)]
/// Runtime playback information shared between the handle and its thread.
pub struct PlaybackInfo {
    /// Serial of the source the thread last loaded.
    pub serial: u64,
    /// Serial of the source the handle last assigned; runs ahead of
    /// `serial` while a load is queued.
    pub assigned: u64,
    /// Duration of that source, when the decoder or tags report one.
    pub duration: Option<Duration>,
    /// Elapsed playback time for that source.
    pub elapsed: Duration,
    /// Whether playback is paused (requested by the handle, forced by failures).
    pub paused: bool,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            serial: 0,
            assigned: 0,
            duration: None,
            elapsed: Duration::ZERO,
            paused: true,
        }
    }
}

impl PlaybackInfo {
    /// The snapshot, when it describes the source with `serial`.
    pub fn for_serial(&self, serial: u64) -> Option<&PlaybackInfo> {
        (self.serial == serial).then_some(self)
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
