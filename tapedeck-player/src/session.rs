//! Playback session state
//!
//! Everything that would otherwise be page-global mutable state: per-track states, the
//! currently playing track, and the one in-flight scrub hold with its timer.

use crate::media::MediaElement;
use crate::registry::TrackId;
use std::collections::HashMap;
use tapedeck_common::events::{ScrubDirection, TrackState};
use tokio::task::JoinHandle;

/// State captured right before a transient operation (hold, flip) and consumed at its end
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSnapshot {
    pub was_paused: bool,
    pub previous_rate: f64,
    pub position_seconds: f64,
}

impl PlaybackSnapshot {
    pub fn capture(element: &dyn MediaElement) -> Self {
        Self {
            was_paused: element.is_paused(),
            previous_rate: element.playback_rate(),
            position_seconds: element.current_time(),
        }
    }
}

/// An in-progress fast-forward or rewind hold
#[derive(Debug)]
pub struct ScrubHold {
    pub track_id: TrackId,
    pub direction: ScrubDirection,
    pub snapshot: PlaybackSnapshot,
    /// Rewind tick task; aborted on release
    pub timer: Option<JoinHandle<()>>,
}

impl ScrubHold {
    /// Stop the rewind timer, if any
    pub fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for ScrubHold {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

/// Mutable playback state of one deck
#[derive(Debug, Default)]
pub struct PlaybackSession {
    states: HashMap<TrackId, TrackState>,
    hold: Option<ScrubHold>,
}

impl PlaybackSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, track_id: &TrackId) -> TrackState {
        self.states
            .get(track_id)
            .copied()
            .unwrap_or(TrackState::Paused)
    }

    /// Record a new state, returning the previous one if it differs
    pub fn set_state(&mut self, track_id: &TrackId, state: TrackState) -> Option<TrackState> {
        let old = self.states.insert(track_id.clone(), state).unwrap_or(TrackState::Paused);
        (old != state).then_some(old)
    }

    /// Tracks currently in the `Playing` state
    pub fn playing_tracks(&self) -> Vec<TrackId> {
        let mut playing: Vec<TrackId> = self
            .states
            .iter()
            .filter(|(_, state)| **state == TrackState::Playing)
            .map(|(id, _)| id.clone())
            .collect();
        playing.sort();
        playing
    }

    pub fn hold(&self) -> Option<&ScrubHold> {
        self.hold.as_ref()
    }

    pub fn begin_hold(&mut self, hold: ScrubHold) {
        self.hold = Some(hold);
    }

    /// Remove and return the active hold (its timer still running)
    pub fn take_hold(&mut self) -> Option<ScrubHold> {
        self.hold.take()
    }
}
