//! tunedeck: a terminal music player driven by mouse clicks.
//!
//! Usage: `tunedeck [PLAYLIST.toml | DIRECTORY]`

mod app;
mod audio;
mod config;
mod error;
mod library;
mod runtime;
mod ui;

fn main() -> anyhow::Result<()> {
    runtime::run()
}
