//! Manifest generator
//!
//! Builds the archive manifest from the files in an assets directory. The naming
//! convention is `NNN__YYYY__image.ext` / `NNN__YYYY__video.ext`:
//!
//! ```text
//! 001__2024__image.jpg   ->  A-001, title "1",  2024-01-01, image
//! 12__2023__video.mp4    ->  A-012, title "12", 2023-01-01, video
//! ```
//!
//! Other image/video files are still listed under a fallback code derived from the file
//! stem; everything else is skipped.

use crate::manifest::{to_manifest_json, ArchiveItem, ItemKind, DEFAULT_DATE};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tapedeck_common::{Error, Result};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Output file name, written into the scanned directory
pub const MANIFEST_FILE: &str = "archive-manifest.json";

/// File name prefixes reserved for cassette artwork and loops
pub const EXCLUDED_PREFIXES: [&str; 3] = ["tape_", "cassette_", "kazeta_"];

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];
const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "webm", "mov", "m4v"];

/// Page-relative directory manifest sources point into
const SOURCE_PREFIX: &str = "assets/";

/// Scan `dir` (not recursively) and build sorted manifest items
pub fn generate(dir: &Path) -> Result<Vec<ArchiveItem>> {
    if !dir.exists() {
        return Err(Error::NotFound(format!(
            "assets directory {}",
            dir.display()
        )));
    }
    if !dir.is_dir() {
        return Err(Error::InvalidInput(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut items = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Error accessing entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        match item_for_file(&name) {
            Some(item) => items.push(item),
            None => debug!("Skipping {}", name),
        }
    }

    items.sort_by(compare_items);
    Ok(items)
}

/// Manifest item for one file name, if it belongs in the archive
pub fn item_for_file(name: &str) -> Option<ArchiveItem> {
    if name.starts_with('.') || EXCLUDED_PREFIXES.iter().any(|p| name.starts_with(p)) {
        return None;
    }
    if let Some(item) = parse_conventional(name) {
        return Some(item);
    }

    let (stem, extension) = split_extension(name);
    let kind = kind_for_extension(extension)?;
    Some(ArchiveItem {
        code: format!("A-{}", stem),
        title: stem.to_string(),
        date: DEFAULT_DATE.to_string(),
        kind,
        media_src: format!("{}{}", SOURCE_PREFIX, name),
        audio_src: String::new(),
    })
}

/// `NNN__YYYY__image|video.ext`
fn parse_conventional(name: &str) -> Option<ArchiveItem> {
    let (stem, extension) = name.rsplit_once('.')?;
    if extension.is_empty() {
        return None;
    }
    let mut parts = stem.split("__");
    let (number, year, kind) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let kind = match kind.to_ascii_lowercase().as_str() {
        "image" => ItemKind::Image,
        "video" => ItemKind::Video,
        _ => return None,
    };
    // Kept as text so arbitrarily long digit runs never overflow
    let number = match number.trim_start_matches('0') {
        "" => "0",
        digits => digits,
    };

    Some(ArchiveItem {
        code: format!("A-{:0>3}", number),
        title: number.to_string(),
        date: format!("{}-01-01", year),
        kind,
        media_src: format!("{}{}", SOURCE_PREFIX, name),
        audio_src: String::new(),
    })
}

/// Stem and lower-cased extension (without the dot)
fn split_extension(name: &str) -> (&str, String) {
    let path = Path::new(name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name);
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    (stem, extension)
}

fn kind_for_extension(extension: String) -> Option<ItemKind> {
    if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        Some(ItemKind::Image)
    } else if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
        Some(ItemKind::Video)
    } else {
        None
    }
}

/// Numeric code first (when both have one), then date
fn compare_items(a: &ArchiveItem, b: &ArchiveItem) -> Ordering {
    match (a.code_number(), b.code_number()) {
        (Some(na), Some(nb)) if na != nb => na.cmp(&nb),
        _ => a.date.cmp(&b.date),
    }
}

/// Write the manifest into `dir`, returning the file path
pub fn write_manifest(dir: &Path, items: &[ArchiveItem]) -> Result<PathBuf> {
    let path = dir.join(MANIFEST_FILE);
    std::fs::write(&path, to_manifest_json(items)?)?;
    Ok(path)
}
