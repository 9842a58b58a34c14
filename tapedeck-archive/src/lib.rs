//! # Tapedeck Archive Library (tapedeck-archive)
//!
//! The archive half of the tape archive: a JSON manifest of dated media items, an index
//! that navigates it and answers deep links, and the generator that builds the manifest
//! from an assets directory.

pub mod generator;
pub mod index;
pub mod manifest;

pub use index::{ArchiveIndex, DetailView, ListEntry, MediaEmbed};
pub use manifest::{parse_manifest, ArchiveItem, ItemKind};
