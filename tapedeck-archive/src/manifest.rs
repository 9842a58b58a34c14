//! Archive manifest model and parsing
//!
//! The manifest is a JSON array of items:
//!
//! ```json
//! [
//!   { "code": "A-001", "title": "1", "date": "2024-01-01", "type": "image",
//!     "mediaSrc": "assets/001__2024__image.jpg" }
//! ]
//! ```
//!
//! Every field is optional when parsing; missing fields get positional defaults.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tapedeck_common::{Error, Result};

/// Date used when an item has none
pub const DEFAULT_DATE: &str = "1970-01-01";

/// Media kind of an archive item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Image,
    Video,
    #[default]
    Text,
}

impl ItemKind {
    /// Case-insensitive; anything unrecognized is text
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "image" => ItemKind::Image,
            "video" => ItemKind::Video,
            _ => ItemKind::Text,
        }
    }

    /// Label shown in the list and detail view
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Image => "fotografie",
            ItemKind::Video => "video",
            ItemKind::Text => "text",
        }
    }
}

/// One archive entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveItem {
    /// Stable address, e.g. `A-007`
    pub code: String,
    pub title: String,
    /// ISO `YYYY-MM-DD`
    pub date: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub media_src: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub audio_src: String,
}

impl ArchiveItem {
    /// Item `index` (zero-based) with nothing but defaults
    pub fn placeholder(index: usize) -> Self {
        Self {
            code: default_code(index),
            title: format!("{:02}", index + 1),
            date: DEFAULT_DATE.to_string(),
            kind: ItemKind::Text,
            media_src: String::new(),
            audio_src: String::new(),
        }
    }

    fn from_value(index: usize, value: &Value) -> Self {
        let mut item = Self::placeholder(index);
        if let Some(code) = field(value, "code") {
            item.code = code;
        }
        if let Some(title) = field(value, "title") {
            item.title = title;
        }
        if let Some(date) = field(value, "date") {
            item.date = date;
        }
        if let Some(kind) = field(value, "type") {
            item.kind = ItemKind::parse(&kind);
        }
        item.media_src = field(value, "mediaSrc").unwrap_or_default();
        item.audio_src = field(value, "audioSrc").unwrap_or_default();
        item
    }

    /// Numeric part of an `A-NNN` code
    pub fn code_number(&self) -> Option<u64> {
        self.code.strip_prefix("A-")?.parse().ok()
    }
}

/// `A-NNN` for the item at zero-based `index`
pub fn default_code(index: usize) -> String {
    format!("A-{:03}", index + 1)
}

/// Stringified field; absent and `null` count as missing
fn field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Parse manifest text
///
/// Tolerates a UTF-8 byte-order mark and surrounding whitespace. Text that does not start
/// with `[` is rejected before JSON parsing, which catches an HTML error page served in
/// place of the manifest.
pub fn parse_manifest(text: &str) -> Result<Vec<ArchiveItem>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text).trim();
    if !text.starts_with('[') {
        return Err(Error::Manifest(
            "manifest does not look like a JSON array (the server may have returned HTML)"
                .to_string(),
        ));
    }

    let value: Value = serde_json::from_str(text)?;
    let Value::Array(entries) = value else {
        return Err(Error::Manifest("manifest is not an array".to_string()));
    };

    let items: Vec<ArchiveItem> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| ArchiveItem::from_value(index, entry))
        .collect();
    tracing::debug!("Parsed manifest with {} items", items.len());
    Ok(items)
}

/// Pretty-printed manifest JSON
pub fn to_manifest_json(items: &[ArchiveItem]) -> Result<String> {
    Ok(serde_json::to_string_pretty(items)?)
}
