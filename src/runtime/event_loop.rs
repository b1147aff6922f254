use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::PlayerController;
use crate::audio::{AudioPlayer, MediaEvent, MediaNotice};
use crate::config;
use crate::ui::{self, Regions};

/// Time between cover animation frames.
const SPIN_STEP: Duration = Duration::from_millis(150);

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Clickable regions of the last drawn frame.
    regions: Regions,
    spin_phase: usize,
    last_spin: Instant,
}

impl EventLoopState {
    pub fn new() -> Self {
        Self {
            regions: Regions::default(),
            spin_phase: 0,
            last_spin: Instant::now(),
        }
    }

    fn advance_spinner(&mut self, spinning: bool) {
        if !spinning {
            self.last_spin = Instant::now();
            return;
        }
        if self.last_spin.elapsed() >= SPIN_STEP {
            self.spin_phase = self.spin_phase.wrapping_add(1);
            self.last_spin = Instant::now();
        }
    }
}

/// Main terminal event loop: forwards media notifications and mouse clicks
/// to the controller and redraws. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    controller: &mut PlayerController<AudioPlayer>,
    media_events: &Receiver<MediaNotice>,
    state: &mut EventLoopState,
) -> Result<()> {
    let poll = Duration::from_millis(settings.ui.poll_ms);

    loop {
        while let Ok(notice) = media_events.try_recv() {
            let Some(ev) = controller.media().accept(notice) else {
                continue;
            };
            if !matches!(ev, MediaEvent::ProgressTick) {
                debug!(event = ?ev, "media event");
            }
            controller.handle_media_event(ev);
        }

        state.advance_spinner(controller.view().cover_spinning);
        let view = controller.view();
        let header = settings.ui.header_text.as_str();
        let spin_phase = state.spin_phase;
        let mut regions = Regions::default();
        terminal.draw(|f| regions = ui::draw(f, view, header, spin_phase))?;
        state.regions = regions;

        if !event::poll(poll)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Press && is_quit_key(key) {
                    break;
                }
            }
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => {
                if let Some(action) = state.regions.hit(column, row) {
                    controller.handle_ui_action(action);
                }
            }
            _ => {}
        }
    }

    Ok(())
}

fn is_quit_key(key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
