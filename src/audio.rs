//! Audio playback: the media-handle capability set and its rodio backend.
//!
//! The player controller only talks to a [`MediaHandle`]; [`AudioPlayer`]
//! implements it on top of a dedicated audio thread.

mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::*;
