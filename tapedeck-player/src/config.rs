//! Configuration for the tapedeck player
//!
//! One TOML file carries three things:
//! 1. **Transport tunables** (`[transport]`): scrub rates, step sizes, timer periods
//! 2. **Ambient settings** (`[logging]`, `[assets]`)
//! 3. **Deck layout** (`[[track]]`, `[[cassette]]`): which audio/video belongs to which
//!    cassette side and which widget controls exist
//!
//! Every transport value has a built-in default; an empty file is a valid config with
//! an empty deck.

use crate::error::{Error, Result};
use crate::registry::{CassetteId, Control, TrackId};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tapedeck_common::assets::AssetsConfig;
use tapedeck_common::config::LoggingConfig;
use tapedeck_common::events::Side;

/// Top-level config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeckConfig {
    #[serde(default)]
    pub transport: TransportSettings,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub assets: AssetsConfig,

    #[serde(default, rename = "track")]
    pub tracks: Vec<TrackLayout>,

    #[serde(default, rename = "cassette")]
    pub cassettes: Vec<CassetteLayout>,
}

impl DeckConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let config: DeckConfig = tapedeck_common::config::load_toml(path)?;
        config.transport.validate()?;
        Ok(config)
    }

    /// Parse and validate config text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: DeckConfig =
            toml::from_str(text).map_err(|e| Error::Common(tapedeck_common::Error::Toml(e)))?;
        config.transport.validate()?;
        Ok(config)
    }
}

/// Transport tunables (`[transport]`)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransportSettings {
    /// Playback rate while fast-forward is held
    pub fast_forward_rate: f64,

    /// Seconds jumped back per rewind tick
    pub rewind_step_secs: f64,

    /// Rewind tick period
    pub rewind_interval_ms: u64,

    /// Seconds moved by the step-back / step-forward controls
    pub skip_secs: f64,

    /// A start that has not settled after this long counts as rejected
    pub start_timeout_ms: u64,

    /// Readout refresh / end-of-track detection period in the service loop
    pub progress_interval_ms: u64,

    /// Event bus buffer
    pub event_capacity: usize,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            fast_forward_rate: 5.0,
            rewind_step_secs: 0.4,
            rewind_interval_ms: 100,
            skip_secs: 10.0,
            start_timeout_ms: 5000,
            progress_interval_ms: 250,
            event_capacity: 256,
        }
    }
}

impl TransportSettings {
    pub fn validate(&self) -> Result<()> {
        if !self.fast_forward_rate.is_finite() || self.fast_forward_rate <= 0.0 {
            return Err(Error::Config(format!(
                "fast_forward_rate must be positive, got {}",
                self.fast_forward_rate
            )));
        }
        if !self.rewind_step_secs.is_finite() || self.rewind_step_secs <= 0.0 {
            return Err(Error::Config(format!(
                "rewind_step_secs must be positive, got {}",
                self.rewind_step_secs
            )));
        }
        if !self.skip_secs.is_finite() || self.skip_secs <= 0.0 {
            return Err(Error::Config(format!(
                "skip_secs must be positive, got {}",
                self.skip_secs
            )));
        }
        if self.rewind_interval_ms == 0 || self.progress_interval_ms == 0 {
            return Err(Error::Config(
                "timer intervals must be at least 1 ms".to_string(),
            ));
        }
        if self.event_capacity == 0 {
            return Err(Error::Config("event_capacity must be non-zero".to_string()));
        }
        Ok(())
    }

    pub fn rewind_interval(&self) -> Duration {
        Duration::from_millis(self.rewind_interval_ms)
    }

    pub fn start_timeout(&self) -> Duration {
        Duration::from_millis(self.start_timeout_ms)
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }
}

/// `[[track]]`: one audio resource
#[derive(Debug, Clone, Deserialize)]
pub struct TrackLayout {
    pub id: TrackId,
    pub src: String,
    #[serde(default)]
    pub duration_secs: Option<f64>,
}

/// `[[cassette]]`: one two-sided playback unit
#[derive(Debug, Clone, Deserialize)]
pub struct CassetteLayout {
    pub id: CassetteId,

    /// Side shown at startup
    #[serde(default)]
    pub side: Side,

    /// Track ids per side
    #[serde(default)]
    pub audio: SideLayout<TrackId>,

    /// Video loops per side
    #[serde(default)]
    pub video: SideLayout<VideoLayout>,

    /// Card has a status text element
    #[serde(default = "default_true")]
    pub status_text: bool,

    /// Player widget bound to this cassette
    #[serde(default)]
    pub widget: Option<WidgetLayout>,
}

fn default_true() -> bool {
    true
}

/// Per-side binding in the layout; `shared` serves both sides
#[derive(Debug, Clone, Deserialize)]
pub struct SideLayout<T> {
    pub a: Option<T>,
    pub b: Option<T>,
    pub shared: Option<T>,
}

impl<T> Default for SideLayout<T> {
    fn default() -> Self {
        Self {
            a: None,
            b: None,
            shared: None,
        }
    }
}

/// Video loop source
#[derive(Debug, Clone, Deserialize)]
pub struct VideoLayout {
    pub src: String,
    #[serde(default)]
    pub duration_secs: Option<f64>,
}

/// `[cassette.widget]`
#[derive(Debug, Clone, Deserialize)]
pub struct WidgetLayout {
    /// Controls present on the widget; all of them when omitted
    #[serde(default = "all_controls")]
    pub controls: Vec<Control>,
}

fn all_controls() -> Vec<Control> {
    Control::ALL.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[transport]
fast_forward_rate = 4.0

[logging]
level = "debug"

[assets]
cdn_base_url = "https://cdn.example.net"
cdn_files = ["audio01.mp3"]

[[track]]
id = "audio01"
src = "assets/audio01.mp3"
duration_secs = 180.0

[[track]]
id = "audio02"
src = "assets/audio02.mp3"

[[cassette]]
id = "tape1"
side = "B"
audio = { a = "audio01", b = "audio02" }
video = { a = { src = "assets/tape_01.mp4", duration_secs = 8.0 } }
widget = { controls = ["toggle", "seek", "current-time-text"] }

[[cassette]]
id = "tape2"
status_text = false
audio = { shared = "audio02" }
"#;

    #[test]
    fn test_defaults_when_empty() {
        let config = DeckConfig::from_toml_str("").unwrap();
        assert_eq!(config.transport.fast_forward_rate, 5.0);
        assert_eq!(config.transport.rewind_step_secs, 0.4);
        assert_eq!(config.transport.rewind_interval(), Duration::from_millis(100));
        assert_eq!(config.transport.skip_secs, 10.0);
        assert!(config.tracks.is_empty());
        assert!(config.cassettes.is_empty());
    }

    #[test]
    fn test_sample_layout_parses() {
        let config = DeckConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.transport.fast_forward_rate, 4.0);
        // Unspecified fields keep defaults
        assert_eq!(config.transport.rewind_interval_ms, 100);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.tracks.len(), 2);
        assert_eq!(config.tracks[1].duration_secs, None);

        let tape1 = &config.cassettes[0];
        assert_eq!(tape1.side, Side::B);
        assert_eq!(tape1.audio.a.as_ref().map(|t| t.as_str()), Some("audio01"));
        assert!(tape1.status_text);
        let widget = tape1.widget.as_ref().unwrap();
        assert_eq!(
            widget.controls,
            vec![Control::Toggle, Control::Seek, Control::CurrentTimeText]
        );

        let tape2 = &config.cassettes[1];
        assert_eq!(tape2.side, Side::A);
        assert!(!tape2.status_text);
        assert!(tape2.widget.is_none());
    }

    #[test]
    fn test_partial_side_bindings() {
        let config = DeckConfig::from_toml_str(
            r#"
[[cassette]]
id = "tape4"
audio = { a = "audio06" }
video = { b = { src = "assets/tape_04b.mp4" } }

[[cassette]]
id = "bare"
"#,
        )
        .unwrap();

        let tape4 = &config.cassettes[0];
        assert_eq!(tape4.audio.a.as_ref().map(|t| t.as_str()), Some("audio06"));
        assert!(tape4.audio.b.is_none());
        assert!(tape4.video.a.is_none());
        let video_b = tape4.video.b.as_ref().unwrap();
        assert_eq!(video_b.src, "assets/tape_04b.mp4");
        assert_eq!(video_b.duration_secs, None);

        let bare = &config.cassettes[1];
        assert!(bare.audio.shared.is_none());
        assert!(bare.video.a.is_none() && bare.video.b.is_none());
    }

    #[test]
    fn test_widget_without_controls_gets_all() {
        let config = DeckConfig::from_toml_str(
            "[[cassette]]\nid = \"t\"\n[cassette.widget]\n",
        )
        .unwrap();
        let widget = config.cassettes[0].widget.as_ref().unwrap();
        assert_eq!(widget.controls.len(), Control::ALL.len());
    }

    #[test]
    fn test_invalid_transport_rejected() {
        let result = DeckConfig::from_toml_str("[transport]\nrewind_interval_ms = 0\n");
        assert!(matches!(result, Err(Error::Config(_))));
        let result = DeckConfig::from_toml_str("[transport]\nfast_forward_rate = -1.0\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
