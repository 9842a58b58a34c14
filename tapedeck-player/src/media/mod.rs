//! Media backend seam
//!
//! The deck drives audio and video exclusively through [`MediaElement`]: start, pause,
//! position, rate, duration. What sits behind a handle (a browser element, a native
//! decoder, the in-process [`SimulatedElement`]) is opaque.

mod simulated;

pub use simulated::{SimulatedElement, SimulatedFactory};

use async_trait::async_trait;
use std::sync::Arc;
use tapedeck_common::events::Side;
use thiserror::Error;

use crate::registry::TrackId;

/// Media start failures
///
/// None of these are fatal; the deck reports them as a blocked status.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MediaError {
    /// Backend refused to start playback (autoplay policy, permissions)
    #[error("playback rejected: {0}")]
    Rejected(String),

    /// Start did not settle in time
    #[error("playback start timed out after {0} ms")]
    TimedOut(u64),
}

/// Transport primitives of one audio or video resource
///
/// All methods take `&self`; handles are shared between the registry and in-flight
/// operations such as the rewind timer.
#[async_trait]
pub trait MediaElement: Send + Sync + std::fmt::Debug {
    /// Resolved source locator (URL or path)
    fn source(&self) -> &str;

    /// Start playback; may suspend until the backend settles
    async fn play(&self) -> Result<(), MediaError>;

    /// Pause playback, keeping the current position
    fn pause(&self);

    fn is_paused(&self) -> bool;

    /// True once playback ran to the end (cleared by seeking or playing)
    fn has_ended(&self) -> bool;

    /// Current position in seconds
    fn current_time(&self) -> f64;

    fn set_current_time(&self, seconds: f64);

    /// Duration in seconds; NaN or infinite while unknown
    fn duration(&self) -> f64;

    fn playback_rate(&self) -> f64;

    fn set_playback_rate(&self, rate: f64);
}

/// Shared element handle
pub type ElementRef = Arc<dyn MediaElement>;

/// Duration if the backend knows it
pub fn known_duration(element: &dyn MediaElement) -> Option<f64> {
    let duration = element.duration();
    duration.is_finite().then_some(duration)
}

/// One side's audio track and (optional) video loop, as resolved for an operation
#[derive(Debug, Clone)]
pub struct MediaPair {
    /// Side this pair was resolved for
    pub side: Side,
    pub track_id: TrackId,
    pub audio: ElementRef,
    pub video: Option<ElementRef>,
}

impl MediaPair {
    /// Pause audio and video together
    pub fn pause(&self) {
        self.audio.pause();
        if let Some(video) = &self.video {
            video.pause();
        }
    }

    pub fn seek(&self, seconds: f64) {
        self.audio.set_current_time(seconds);
    }

    /// Prime and start the video loop
    ///
    /// A video sitting at (or past) its end is rewound to zero first. Failures are
    /// returned for reporting only; audio does not depend on them.
    pub async fn start_video(&self) -> Result<(), MediaError> {
        let Some(video) = &self.video else {
            return Ok(());
        };
        if let Some(duration) = known_duration(video.as_ref()) {
            if video.current_time() >= duration {
                video.set_current_time(0.0);
            }
        }
        video.play().await
    }
}

/// Description of a media source used to construct an element
#[derive(Debug, Clone, PartialEq)]
pub struct MediaSource {
    pub src: String,
    /// Known duration, if the layout provides one
    pub duration_secs: Option<f64>,
    /// Wraps around at the end instead of stopping (video loops)
    pub looping: bool,
}

/// Builds elements for the sources named in a deck layout
pub trait MediaFactory {
    fn create(&self, source: &MediaSource) -> ElementRef;
}
