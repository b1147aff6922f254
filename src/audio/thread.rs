use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, info, warn};

use crate::config::AudioSettings;

use super::sink::{LoadedSink, create_sink_at};
use super::types::{AudioCmd, MediaEvent, MediaNotice, PlaybackHandle};

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<MediaNotice>,
    playback_info: PlaybackHandle,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                warn!(error = %e, "no audio output device");
                let _ = events.send(MediaNotice::engine(MediaEvent::Failed(format!(
                    "no audio output device: {e}"
                ))));
                if let Ok(mut info) = playback_info.lock() {
                    info.paused = true;
                }
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let tick = Duration::from_millis(audio_settings.tick_ms.max(1));
        let mut deck = Deck::new(&stream, events, playback_info, audio_settings.initial_volume);
        let mut last_tick = Instant::now();

        loop {
            let wait = tick.saturating_sub(last_tick.elapsed());
            match rx.recv_timeout(wait) {
                Ok(AudioCmd::Quit { fade_out }) => {
                    deck.quit(fade_out);
                    break;
                }
                Ok(cmd) => deck.apply(cmd),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if last_tick.elapsed() >= tick {
                deck.tick();
                last_tick = Instant::now();
            }
        }
        info!("audio thread stopped");
    })
}

/// Elapsed playback time from the paused total and the running segment,
/// saturated at the source duration when known.
pub(super) fn elapsed_at(
    accumulated: Duration,
    started_at: Option<Instant>,
    now: Instant,
    duration: Option<Duration>,
) -> Duration {
    let running = started_at.map_or(Duration::ZERO, |st| now.saturating_duration_since(st));
    let elapsed = accumulated + running;
    match duration {
        Some(d) => elapsed.min(d),
        None => elapsed,
    }
}

/// Audio-thread state for the single loaded source.
struct Deck<'a> {
    stream: &'a OutputStream,
    events: Sender<MediaNotice>,
    playback_info: PlaybackHandle,

    source: Option<PathBuf>,
    serial: u64,
    sink: Option<Sink>,
    duration: Option<Duration>,
    volume: f32,

    paused: bool,
    ended: bool,
    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl<'a> Deck<'a> {
    fn new(
        stream: &'a OutputStream,
        events: Sender<MediaNotice>,
        playback_info: PlaybackHandle,
        volume: f32,
    ) -> Self {
        Self {
            stream,
            events,
            playback_info,
            source: None,
            serial: 0,
            sink: None,
            duration: None,
            volume,
            paused: true,
            ended: false,
            started_at: None,
            accumulated: Duration::ZERO,
        }
    }

    fn apply(&mut self, cmd: AudioCmd) {
        match cmd {
            AudioCmd::Load { source, serial } => self.load(source, serial),
            AudioCmd::Play => self.play(),
            AudioCmd::Pause => self.pause(),
            AudioCmd::Seek(pos) => self.seek(pos),
            AudioCmd::SetVolume(v) => {
                self.volume = v;
                if let Some(s) = self.sink.as_ref() {
                    s.set_volume(v);
                }
            }
            // Handled by the thread loop.
            AudioCmd::Quit { .. } => {}
        }
    }

    fn elapsed(&self) -> Duration {
        elapsed_at(
            self.accumulated,
            self.started_at,
            Instant::now(),
            self.duration,
        )
    }

    /// Send `event` tagged with the loaded source's serial.
    fn notify(&self, event: MediaEvent) {
        let _ = self.events.send(MediaNotice {
            serial: Some(self.serial),
            event,
        });
    }

    /// Report a failure of the loaded source. The handle's play state is
    /// only forced to paused while that source is still the assigned one.
    fn fail(&self, message: String) {
        warn!(serial = self.serial, %message, "playback failure");
        if let Ok(mut info) = self.playback_info.lock() {
            if info.assigned == self.serial {
                info.paused = true;
            }
        }
        self.notify(MediaEvent::Failed(message));
    }

    fn load(&mut self, source: PathBuf, serial: u64) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.serial = serial;
        self.paused = true;
        self.ended = false;
        self.started_at = None;
        self.accumulated = Duration::ZERO;

        let loaded = create_sink_at(self.stream, &source, Duration::ZERO, self.volume);
        self.source = Some(source);
        match loaded {
            Ok(LoadedSink { sink, duration }) => {
                debug!(serial, ?duration, "source loaded");
                self.sink = Some(sink);
                self.duration = duration;
                self.publish();
                self.notify(MediaEvent::MetadataReady);
            }
            Err(e) => {
                self.duration = None;
                self.publish();
                self.fail(e.to_string());
            }
        }
    }

    /// Rebuild the sink for the current source at `pos`, keeping it paused.
    fn rebuild_at(&mut self, pos: Duration) -> bool {
        let Some(source) = self.source.as_ref() else {
            return false;
        };
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        match create_sink_at(self.stream, source, pos, self.volume) {
            Ok(loaded) => {
                self.sink = Some(loaded.sink);
                true
            }
            Err(e) => {
                self.fail(e.to_string());
                false
            }
        }
    }

    fn play(&mut self) {
        if self.sink.is_none() {
            let what = self
                .source
                .as_ref()
                .map_or_else(|| "no source loaded".to_string(), |p| format!("{p:?} is not playable"));
            self.fail(format!("cannot play: {what}"));
            return;
        }

        // Playing after the end restarts the source.
        let finished = self.ended || self.sink.as_ref().is_some_and(Sink::empty);
        if finished {
            if !self.rebuild_at(Duration::ZERO) {
                return;
            }
            self.accumulated = Duration::ZERO;
            self.ended = false;
        }

        if let Some(s) = self.sink.as_ref() {
            s.play();
        }
        if self.paused || finished {
            self.started_at = Some(Instant::now());
        }
        self.paused = false;
        self.publish();
    }

    fn pause(&mut self) {
        if !self.paused {
            self.accumulated = self.elapsed();
            self.started_at = None;
            if let Some(s) = self.sink.as_ref() {
                s.pause();
            }
        }
        self.paused = true;
        self.publish();
    }

    fn seek(&mut self, pos: Duration) {
        if self.sink.is_none() {
            return;
        }
        let pos = match self.duration {
            Some(d) => pos.min(d),
            None => pos,
        };

        let seeked = !self.paused
            && self
                .sink
                .as_ref()
                .is_some_and(|s| match s.try_seek(pos) {
                    Ok(()) => true,
                    Err(e) => {
                        debug!(error = %e, "decoder cannot seek, rebuilding sink");
                        false
                    }
                });

        if !seeked {
            if !self.rebuild_at(pos) {
                return;
            }
            if !self.paused {
                if let Some(s) = self.sink.as_ref() {
                    s.play();
                }
            }
        }

        self.accumulated = pos;
        self.started_at = (!self.paused).then(Instant::now);
        self.ended = false;
        self.publish();
    }

    fn tick(&mut self) {
        if self.paused || self.ended {
            return;
        }
        let Some(sink) = self.sink.as_ref() else {
            return;
        };

        if sink.empty() {
            // Stay in the playing state: the listener advances to the next track.
            self.ended = true;
            self.accumulated = self.duration.unwrap_or_else(|| self.elapsed());
            self.started_at = None;
            self.publish();
            debug!(serial = self.serial, "source ended");
            self.notify(MediaEvent::Ended);
        } else {
            self.publish();
            self.notify(MediaEvent::ProgressTick);
        }
    }

    fn quit(&mut self, fade_out: Duration) {
        if let Some(s) = self.sink.take() {
            if !self.paused {
                // Fade out gently before stopping.
                fade_out_sink(&s, self.volume, fade_out);
            }
            s.stop();
        }
        self.paused = true;
        self.publish();
    }

    /// Copy position and metadata into the shared snapshot. `paused` is
    /// owned by the handle except on failure.
    fn publish(&self) {
        if let Ok(mut info) = self.playback_info.lock() {
            info.serial = self.serial;
            info.duration = self.duration;
            info.elapsed = self.elapsed();
        }
    }
}

const FADE_STEPS: u32 = 20;

/// Pause between volume steps of a fade lasting `fade_out`, at least 1ms.
pub(super) fn fade_step(fade_out: Duration) -> Duration {
    (fade_out / FADE_STEPS).max(Duration::from_millis(1))
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out: Duration) {
    if fade_out.is_zero() {
        sink.set_volume(0.0);
        return;
    }
    let step = fade_step(fade_out);
    for i in 1..=FADE_STEPS {
        let t = i as f32 / FADE_STEPS as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(step);
    }
    sink.set_volume(0.0);
}
