use std::path::Path;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::AudioSettings;

use super::thread::spawn_audio_thread;
use super::types::{
    AudioCmd, MediaEvent, MediaHandle, MediaNotice, PlaybackHandle, PlaybackInfo,
};

/// Rodio-backed media handle.
///
/// Decoding and output run on a dedicated audio thread; this handle sends
/// it commands and reads a shared [`PlaybackInfo`] snapshot. Notifications
/// go out on the `events` channel given to [`AudioPlayer::new`] and must pass
/// through [`AudioPlayer::accept`] before they reach the controller.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    events: Sender<MediaNotice>,
    playback: PlaybackHandle,
    /// Serial of the last source assigned through this handle.
    serial: u64,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new(audio_settings: AudioSettings, events: Sender<MediaNotice>) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let audio_handle =
            spawn_audio_thread(rx, events.clone(), playback_info.clone(), audio_settings);

        Self {
            tx,
            events,
            playback: playback_info,
            serial: 0,
            join: Mutex::new(Some(audio_handle)),
        }
    }

    fn send(&self, cmd: AudioCmd) {
        if let Err(e) = self.tx.send(cmd) {
            warn!(cmd = ?e.0, "audio thread is gone");
            if let Ok(mut info) = self.playback.lock() {
                info.paused = true;
            }
            let _ = self.events.send(MediaNotice::engine(MediaEvent::Failed(
                "audio engine stopped".to_string(),
            )));
        }
    }

    /// Run `f` on the shared snapshot when it describes the current source.
    fn current<T>(&self, f: impl FnOnce(&PlaybackInfo) -> T) -> Option<T> {
        let info = self.playback.lock().ok()?;
        info.for_serial(self.serial).map(f)
    }

    /// Unwrap a notice from the audio thread, dropping it when it is about a
    /// source replaced since it was sent.
    pub fn accept(&self, notice: MediaNotice) -> Option<MediaEvent> {
        let serial = notice.serial;
        let event = notice.for_serial(self.serial);
        if event.is_none() {
            debug!(?serial, current = self.serial, "dropped notice for a replaced source");
        }
        event
    }

    /// Ask the audio thread to stop (fading out) and wait for it.
    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.tx.send(AudioCmd::Quit { fade_out });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl MediaHandle for AudioPlayer {
    fn set_source(&mut self, source: &Path) {
        self.serial += 1;
        if let Ok(mut info) = self.playback.lock() {
            info.assigned = self.serial;
            info.paused = true;
        }
        self.send(AudioCmd::Load {
            source: source.to_path_buf(),
            serial: self.serial,
        });
    }

    fn current_time(&self) -> f64 {
        self.current(|info| info.elapsed.as_secs_f64())
            .unwrap_or(0.0)
    }

    fn set_current_time(&mut self, seconds: f64) {
        if !seconds.is_finite() {
            return;
        }
        let pos = Duration::from_secs_f64(seconds.max(0.0));
        if let Ok(mut info) = self.playback.lock() {
            if info.serial == self.serial {
                info.elapsed = pos;
            }
        }
        self.send(AudioCmd::Seek(pos));
    }

    fn duration(&self) -> Option<f64> {
        self.current(|info| info.duration.map(|d| d.as_secs_f64()))
            .flatten()
    }

    fn set_volume(&mut self, volume: f32) {
        self.send(AudioCmd::SetVolume(volume.clamp(0.0, 1.0)));
    }

    fn paused(&self) -> bool {
        self.playback.lock().map(|info| info.paused).unwrap_or(true)
    }

    fn play(&mut self) {
        if let Ok(mut info) = self.playback.lock() {
            info.paused = false;
        }
        self.send(AudioCmd::Play);
    }

    fn pause(&mut self) {
        if let Ok(mut info) = self.playback.lock() {
            info.paused = true;
        }
        self.send(AudioCmd::Pause);
    }
}
