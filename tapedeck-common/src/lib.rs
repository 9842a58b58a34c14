//! # Tapedeck Common Library
//!
//! Shared code for the tapedeck player and archive tools including:
//! - Playback vocabulary (sides, track states, status labels)
//! - Event types (DeckEvent enum) and the EventBus
//! - Configuration file discovery and logging bootstrap
//! - Asset URL rewriting
//! - Clock and date formatting

pub mod assets;
pub mod config;
pub mod error;
pub mod events;
pub mod time;

pub use error::{Error, Result};
pub use events::{DeckEvent, EventBus};
