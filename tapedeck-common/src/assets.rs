//! Asset URL rewriting
//!
//! Cassette media (audio tracks and video loops) can be served from a CDN bucket while
//! everything else stays on the page's own origin. Only files explicitly listed are moved.

use serde::Deserialize;
use std::collections::BTreeSet;

/// Local asset directory prefix that rewriting applies to
pub const ASSETS_PREFIX: &str = "assets/";

/// `[assets]` configuration section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetsConfig {
    /// CDN base URL (no trailing slash required)
    #[serde(default)]
    pub cdn_base_url: Option<String>,

    /// File names (relative to `assets/`) that live on the CDN
    #[serde(default)]
    pub cdn_files: Vec<String>,
}

/// Rewrites local asset paths to CDN URLs for a fixed set of files
#[derive(Debug, Clone, Default)]
pub struct AssetRewriter {
    base_url: Option<String>,
    files: BTreeSet<String>,
}

impl AssetRewriter {
    pub fn new(base_url: impl Into<String>, files: impl IntoIterator<Item = String>) -> Self {
        let base = base_url.into();
        Self {
            base_url: Some(base.trim_end_matches('/').to_string()),
            files: files.into_iter().collect(),
        }
    }

    /// A rewriter that leaves every source unchanged
    pub fn passthrough() -> Self {
        Self::default()
    }

    pub fn from_config(config: &AssetsConfig) -> Self {
        match &config.cdn_base_url {
            Some(base) if !base.trim().is_empty() => {
                Self::new(base.trim(), config.cdn_files.iter().cloned())
            }
            _ => Self::passthrough(),
        }
    }

    /// Rewrite a single media source
    ///
    /// Absolute `http(s)://` sources and empty sources are returned unchanged.
    pub fn rewrite(&self, src: &str) -> String {
        if src.is_empty() || is_absolute_url(src) {
            return src.to_string();
        }
        let Some(base) = &self.base_url else {
            return src.to_string();
        };
        if let Some(filename) = src.strip_prefix(ASSETS_PREFIX) {
            if self.files.contains(filename) {
                return format!("{}/{}", base, filename);
            }
        }
        src.to_string()
    }
}

/// Case-insensitive `http://` / `https://` check
pub fn is_absolute_url(src: &str) -> bool {
    let lower = src.get(..8).unwrap_or(src).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Resolve a page-relative source against a base URL (an empty base leaves it as is)
pub fn resolve_against(base: &str, src: &str) -> String {
    if base.is_empty() || src.is_empty() || is_absolute_url(src) {
        return src.to_string();
    }
    let base = if base.ends_with('/') {
        base.to_string()
    } else {
        match base.rfind('/') {
            // Keep the directory of a document URL, drop the document itself
            Some(idx) if idx > base.find("://").map(|p| p + 2).unwrap_or(0) => {
                base[..=idx].to_string()
            }
            _ => format!("{}/", base),
        }
    };
    format!("{}{}", base, src.trim_start_matches("./").trim_start_matches('/'))
}
