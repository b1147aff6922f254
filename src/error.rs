//! Error types shared by the library, playlist and controller layers.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading a playlist file.
#[derive(Debug, Error)]
pub enum PlaylistError {
    /// The playlist file could not be read.
    #[error("failed to read playlist {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The playlist file is not valid TOML or does not match the schema.
    #[error("failed to parse playlist {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A `[[track]]` entry has an empty `src`.
    #[error("playlist entry {entry} has no source")]
    MissingSource { entry: usize },
}

/// Errors raised by the player controller.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Initialization found no tracks to load.
    #[error("playlist is empty: nothing to play")]
    EmptyPlaylist,

    /// A track index outside the registry was requested.
    #[error("track index {index} out of range (playlist has {len} tracks)")]
    TrackOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Playlist(#[from] PlaylistError),
}

pub type Result<T> = std::result::Result<T, PlayerError>;
