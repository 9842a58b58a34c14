//! Error types for tapedeck-player
//!
//! Playback failures (rejected starts, missing tracks, bad seek targets) are never
//! returned from deck operations; they are absorbed into UI state. These errors cover
//! building a deck and talking to the running service.

use thiserror::Error;

/// Main error type for the player crate
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Deck layout is inconsistent (duplicate ids, dangling references)
    #[error("Layout error: {0}")]
    Layout(String),

    /// Script line could not be parsed
    #[error("Script error on line {line}: {message}")]
    Script { line: usize, message: String },

    /// The deck service has shut down
    #[error("Deck service channel closed")]
    ChannelClosed,

    /// Shared-library errors (TOML, I/O while loading config)
    #[error(transparent)]
    Common(#[from] tapedeck_common::Error),
}

/// Convenience Result type using the player Error
pub type Result<T> = std::result::Result<T, Error>;
