//! Event types for the tapedeck event system
//!
//! Provides the shared event definitions and the EventBus used to fan deck state changes
//! out to whatever is rendering the cassettes and player widgets.
//!
//! # Architecture
//!
//! - **EventBus** (tokio::broadcast): one-to-many event broadcasting
//! - **Command channel** (tokio::mpsc, owned by the player crate): gesture → state machine
//!
//! The deck never reads anything back from observers; events are the only UI-facing output.

mod playback_types;

pub use playback_types::{ScrubDirection, Side, StatusText, ToggleLabel, TrackState};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Deck event types
///
/// Events are broadcast via EventBus and can be serialized (one JSON object per event)
/// for any rendering surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DeckEvent {
    /// A track moved between playback states
    TrackStateChanged {
        track_id: String,
        old_state: TrackState,
        new_state: TrackState,
        timestamp: DateTime<Utc>,
    },

    /// Cassette card presentation changed (button class, status text, active-card marker)
    CardUpdated {
        cassette_id: String,
        /// Button carries the "playing" class
        playing: bool,
        /// Status text, when the card has a status element
        status: Option<StatusText>,
        /// Card carries the active-card marker
        active: bool,
        timestamp: DateTime<Utc>,
    },

    /// Player widget transport labels changed
    WidgetUpdated {
        cassette_id: String,
        toggle_label: Option<ToggleLabel>,
        status: Option<StatusText>,
        timestamp: DateTime<Utc>,
    },

    /// Player widget readouts refreshed
    ///
    /// Fields are `None` when the widget has no corresponding control.
    ReadoutsUpdated {
        cassette_id: String,
        current_time: Option<String>,
        duration: Option<String>,
        /// Seek bar position, 0..100
        seek_percent: Option<f64>,
        timestamp: DateTime<Utc>,
    },

    /// Cassette was flipped to its other side
    SideFlipped {
        cassette_id: String,
        from: Side,
        to: Side,
        timestamp: DateTime<Utc>,
    },

    /// The visible video of a cassette changed
    VideoVisibilityChanged {
        cassette_id: String,
        visible: Option<Side>,
        timestamp: DateTime<Utc>,
    },

    /// Audio start was rejected; the track stays paused
    PlaybackBlocked {
        track_id: String,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// Video start was rejected; audio playback continues regardless
    VideoBlocked {
        cassette_id: String,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// Press-and-hold scrub began
    ScrubStarted {
        track_id: String,
        direction: ScrubDirection,
        timestamp: DateTime<Utc>,
    },

    /// Press-and-hold scrub released and state restored
    ScrubEnded {
        track_id: String,
        direction: ScrubDirection,
        timestamp: DateTime<Utc>,
    },
}

impl DeckEvent {
    /// Event type name (matches the serialized `type` tag)
    pub fn event_type(&self) -> &'static str {
        match self {
            DeckEvent::TrackStateChanged { .. } => "TrackStateChanged",
            DeckEvent::CardUpdated { .. } => "CardUpdated",
            DeckEvent::WidgetUpdated { .. } => "WidgetUpdated",
            DeckEvent::ReadoutsUpdated { .. } => "ReadoutsUpdated",
            DeckEvent::SideFlipped { .. } => "SideFlipped",
            DeckEvent::VideoVisibilityChanged { .. } => "VideoVisibilityChanged",
            DeckEvent::PlaybackBlocked { .. } => "PlaybackBlocked",
            DeckEvent::VideoBlocked { .. } => "VideoBlocked",
            DeckEvent::ScrubStarted { .. } => "ScrubStarted",
            DeckEvent::ScrubEnded { .. } => "ScrubEnded",
        }
    }
}

/// Central event distribution bus
///
/// Thin wrapper over `tokio::sync::broadcast`. Slow subscribers lag and lose the oldest
/// events rather than blocking the deck.
#[derive(Debug)]
pub struct EventBus {
    tx: broadcast::Sender<DeckEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Examples
    ///
    /// ```
    /// use tapedeck_common::events::EventBus;
    ///
    /// let event_bus = EventBus::new(256);
    /// assert_eq!(event_bus.capacity(), 256);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<DeckEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: DeckEvent,
    ) -> Result<usize, broadcast::error::SendError<DeckEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: DeckEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
