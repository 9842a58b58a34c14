//! Fixtures for tapedeck-archive integration tests

#![allow(dead_code)]

use std::path::Path;

use tapedeck_archive::ArchiveIndex;
use tempfile::TempDir;

/// Manifest with a mix of kinds, one untitled entry and one `POLOŽKA` title
pub const MANIFEST: &str = r#"[
  { "code": "A-001", "title": "POLOŽKA 1", "date": "2021-03-04", "type": "image",
    "mediaSrc": "assets/001__2021__image.jpg" },
  { "code": "A-002", "title": "2", "date": "2022-01-01", "type": "video",
    "mediaSrc": "assets/002__2022__video.mp4" },
  { "code": "A-007", "title": "7", "date": "2023-11-30", "type": "text" },
  { "date": "2024-06-15", "type": "image", "mediaSrc": "https://cdn.example.net/x.png" }
]"#;

pub fn index() -> ArchiveIndex {
    ArchiveIndex::load(MANIFEST).unwrap()
}

/// Temp assets dir holding empty files with the given names
pub fn assets_dir(names: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in names {
        touch(dir.path(), name);
    }
    dir
}

pub fn touch(dir: &Path, name: &str) {
    std::fs::write(dir.join(name), b"").unwrap();
}
