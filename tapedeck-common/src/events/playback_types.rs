//! Playback-related type definitions
//!
//! Vocabulary shared by the deck state machine and anything rendering it.

use serde::{Deserialize, Serialize};

/// Cassette side
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum Side {
    #[default]
    A,
    B,
}

impl Side {
    /// The opposite side of the cassette
    pub fn flipped(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

impl std::str::FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Side::A),
            "B" | "b" => Ok(Side::B),
            other => Err(format!("unknown side '{}'", other)),
        }
    }
}

/// Per-track playback state
///
/// `Ended` is not a resting state: a track reaching its end folds back to `Paused`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrackState {
    /// Not playing (initial state, after pause, after end)
    Paused,
    /// Start requested, waiting for the media backend to settle
    Starting,
    /// Audibly playing
    Playing,
    /// Start was rejected by the backend (autoplay/permission denial)
    Blocked,
}

impl std::fmt::Display for TrackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackState::Paused => write!(f, "paused"),
            TrackState::Starting => write!(f, "starting"),
            TrackState::Playing => write!(f, "playing"),
            TrackState::Blocked => write!(f, "blocked"),
        }
    }
}

/// Status line vocabulary shown on cassette cards and player widgets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusText {
    Paused,
    Playing,
    Blocked,
}

impl StatusText {
    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            StatusText::Paused => "Paused",
            StatusText::Playing => "Playing",
            StatusText::Blocked => "Playback blocked",
        }
    }
}

impl std::fmt::Display for StatusText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Label of a player widget's toggle button
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToggleLabel {
    Play,
    Pause,
}

impl std::fmt::Display for ToggleLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToggleLabel::Play => write!(f, "Play"),
            ToggleLabel::Pause => write!(f, "Pause"),
        }
    }
}

/// Direction of a press-and-hold scrub
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScrubDirection {
    Forward,
    Rewind,
}

impl std::fmt::Display for ScrubDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScrubDirection::Forward => write!(f, "forward"),
            ScrubDirection::Rewind => write!(f, "rewind"),
        }
    }
}
