use std::io;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use anyhow::Result;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::PlayerController;
use crate::audio::{AudioPlayer, MediaNotice};
use crate::config;

mod event_loop;
mod logging;
mod settings;
mod startup;
mod terminal;

pub fn run() -> Result<()> {
    let (settings, config_problem) = settings::load_settings();

    let log_path = logging::init(&settings.log)?;
    if let Some(problem) = config_problem {
        warn!(%problem, "config");
    }
    info!(log = ?log_path, "tunedeck starting");

    let (events_tx, events_rx) = mpsc::channel::<MediaNotice>();
    let mut controller = startup::build_controller(&settings, events_tx)?;

    let run_result = run_ui(&settings, &mut controller, &events_rx);

    controller
        .media()
        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
    info!("tunedeck stopped");

    run_result
}

/// Take over the terminal and run the event loop; the terminal is restored
/// when this returns, on success or error.
fn run_ui(
    settings: &config::Settings,
    controller: &mut PlayerController<AudioPlayer>,
    events_rx: &Receiver<MediaNotice>,
) -> Result<()> {
    let _guard = terminal::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::new();
    event_loop::run(&mut terminal, settings, controller, events_rx, &mut state)
}
