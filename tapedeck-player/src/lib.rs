//! # Tapedeck Player Library (tapedeck-player)
//!
//! Playback state machine for a rack of two-sided virtual cassettes, each pairing an audio
//! track with a decorative video loop.
//!
//! **Purpose:** Keep exactly one track audible across the whole deck, toggle/step/seek
//! tracks, flip cassettes mid-song without losing position, and run press-and-hold
//! fast-forward / rewind scrubbing.
//!
//! **Architecture:** User gestures and media notifications become [`deck::Command`]s,
//! consumed one at a time by [`deck::Deck`] inside [`service::DeckService`]. Media is reached
//! only through the [`media::MediaElement`] trait; UI output is the [`view`] model plus
//! [`tapedeck_common::DeckEvent`]s on the event bus.

pub mod config;
pub mod deck;
pub mod error;
pub mod media;
pub mod registry;
pub mod resolver;
pub mod script;
pub mod service;
pub mod session;
pub mod view;

pub use deck::{Command, Deck};
pub use error::{Error, Result};
pub use registry::{CassetteId, TrackId};
pub use service::{DeckHandle, DeckService};
