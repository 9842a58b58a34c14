//! Archive navigation
//!
//! Holds the loaded items and the active selection, renders list and detail views, and
//! maps URL fragments (`#A-007`, `#7`) to items and back.

use crate::manifest::{parse_manifest, ArchiveItem, ItemKind};
use tapedeck_common::assets::resolve_against;
use tapedeck_common::time::format_date;
use tapedeck_common::Result;
use tracing::debug;

/// Title prefix dropped from list numbers
const TITLE_PREFIX: &str = "POLOŽKA";

/// One row of the archive list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub number: String,
    pub kind: &'static str,
    pub date: String,
    pub active: bool,
}

impl ListEntry {
    /// Row label as rendered in the list
    pub fn label(&self) -> String {
        format!("{} — {} — {}", self.number, self.kind, self.date)
    }
}

/// Media shown in the detail pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaEmbed {
    Image { src: String },
    Video { src: String },
}

/// Detail pane for the active item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub code: String,
    /// `kind • date`
    pub meta: String,
    pub media: Option<MediaEmbed>,
}

/// Loaded archive with an active selection
#[derive(Debug, Clone, Default)]
pub struct ArchiveIndex {
    items: Vec<ArchiveItem>,
    active: Option<usize>,
    base_url: String,
}

impl ArchiveIndex {
    /// Index over `items`; the first item (if any) becomes active
    pub fn new(items: Vec<ArchiveItem>) -> Self {
        let active = (!items.is_empty()).then_some(0);
        Self {
            items,
            active,
            base_url: String::new(),
        }
    }

    /// Parse manifest text into an index
    pub fn load(text: &str) -> Result<Self> {
        let index = Self::new(parse_manifest(text)?);
        debug!("Archive loaded: {} items", index.len());
        Ok(index)
    }

    /// Base URL media sources are resolved against in the detail view
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn items(&self) -> &[ArchiveItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn active_item(&self) -> Option<&ArchiveItem> {
        self.items.get(self.active?)
    }

    /// Select an item; out-of-range indices are ignored
    pub fn set_active(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        self.active = Some(index);
        true
    }

    /// Move one item forward, stopping at the last
    pub fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let target = match self.active {
            Some(current) => (current + 1).min(self.items.len() - 1),
            None => 0,
        };
        self.set_active(target);
    }

    /// Move one item back, stopping at the first
    pub fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let target = self.active.map_or(0, |current| current.saturating_sub(1));
        self.set_active(target);
    }

    /// Rows of the archive list
    pub fn list(&self) -> Vec<ListEntry> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| ListEntry {
                number: list_number(&item.title),
                kind: item.kind.label(),
                date: format_date(&item.date),
                active: self.active == Some(index),
            })
            .collect()
    }

    /// Detail pane for the active item
    pub fn detail(&self) -> Option<DetailView> {
        let item = self.active_item()?;
        let src = (!item.media_src.is_empty())
            .then(|| resolve_against(&self.base_url, &item.media_src));
        let media = match (item.kind, src) {
            (ItemKind::Image, Some(src)) => Some(MediaEmbed::Image { src }),
            (ItemKind::Video, Some(src)) => Some(MediaEmbed::Video { src }),
            _ => None,
        };
        Some(DetailView {
            code: item.code.clone(),
            meta: format!("{} • {}", item.kind.label(), format_date(&item.date)),
            media,
        })
    }

    /// Deep-link fragment of item `index`
    pub fn fragment_for(&self, index: usize) -> Option<String> {
        self.items.get(index).map(|item| format!("#{}", item.code))
    }

    /// Item addressed by a fragment
    ///
    /// Codes match case-insensitively; a bare number `n` means code `A-00n`.
    pub fn resolve_fragment(&self, fragment: &str) -> Option<usize> {
        let wanted = fragment.trim().trim_start_matches('#').trim();
        if wanted.is_empty() {
            return None;
        }
        let by_code = |code: &str| {
            self.items
                .iter()
                .position(|item| item.code.eq_ignore_ascii_case(code))
        };
        by_code(wanted).or_else(|| {
            let number: u64 = wanted.parse().ok()?;
            self.items
                .iter()
                .position(|item| item.code_number() == Some(number))
        })
    }

    /// Select the item a fragment points at
    pub fn activate_fragment(&mut self, fragment: &str) -> bool {
        match self.resolve_fragment(fragment) {
            Some(index) => self.set_active(index),
            None => {
                debug!("No archive item for fragment '{}'", fragment);
                false
            }
        }
    }
}

/// Title with a leading `POLOŽKA` (any case) and following whitespace removed
fn list_number(title: &str) -> String {
    let prefix_len = TITLE_PREFIX.len();
    match title.get(..prefix_len) {
        Some(head) if head.to_lowercase() == TITLE_PREFIX.to_lowercase() => {
            title[prefix_len..].trim_start().to_string()
        }
        _ => title.to_string(),
    }
}
