use std::env;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

use anyhow::{Context, Result};
use tracing::info;

use crate::app::PlayerController;
use crate::audio::{AudioPlayer, MediaNotice};
use crate::config;
use crate::library;

/// Where the playlist comes from: the first CLI argument, then
/// `playlist.path`, then the working directory.
pub fn playlist_source(arg: Option<String>, settings: &config::Settings) -> Result<PathBuf> {
    if let Some(arg) = arg {
        return Ok(PathBuf::from(arg));
    }
    if let Some(path) = &settings.playlist.path {
        return Ok(path.clone());
    }
    env::current_dir().context("resolve working directory")
}

/// Load the tracks, start the audio thread and build the controller.
pub fn build_controller(
    settings: &config::Settings,
    events: Sender<MediaNotice>,
) -> Result<PlayerController<AudioPlayer>> {
    let source = playlist_source(env::args().nth(1), settings)?;
    let tracks = library::load(&source, &settings.library, &settings.ui)
        .with_context(|| format!("load playlist from {}", source.display()))?;
    info!(source = %source.display(), tracks = tracks.len(), "playlist loaded");

    let audio_player = AudioPlayer::new(settings.audio.clone(), events);
    let controller = PlayerController::new(tracks, audio_player, settings.audio.initial_volume)
        .with_context(|| format!("start player for {}", source.display()))?;
    Ok(controller)
}
