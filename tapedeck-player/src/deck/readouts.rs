//! Widget readouts and progress polling

use super::Deck;
use crate::registry::{CassetteId, TrackId};
use crate::resolver::owning_cassette;
use chrono::Utc;
use tapedeck_common::events::DeckEvent;
use tracing::trace;

impl Deck {
    /// Refresh time text and seek bar of the widget showing `track_id`
    pub fn refresh_readouts(&mut self, track_id: &TrackId) {
        let Some(cassette) = owning_cassette(&self.registry, track_id) else {
            return;
        };
        let cassette_id = cassette.id.clone();
        let Some(audio) = self.element(track_id) else {
            return;
        };
        let (position, duration) = (audio.current_time(), audio.duration());

        let Some(widget) = self.view.widget_mut(&cassette_id) else {
            return;
        };
        if widget.apply_readouts(position, duration) {
            let event = DeckEvent::ReadoutsUpdated {
                cassette_id: cassette_id.to_string(),
                current_time: widget.current_time.clone(),
                duration: widget.duration.clone(),
                seek_percent: widget.seek_percent,
                timestamp: Utc::now(),
            };
            self.events.emit_lossy(event);
        }
    }

    /// Readouts for whatever track the cassette's active side resolves to
    pub(crate) fn refresh_cassette_readouts(&mut self, cassette_id: &CassetteId) {
        if let Some(track_id) = self.active_track(cassette_id) {
            self.refresh_readouts(&track_id);
        }
    }

    /// Seek drag start/end; while dragging, progress leaves the seek bar alone
    pub fn set_seek_dragging(&mut self, track_id: &TrackId, dragging: bool) {
        let Some(cassette_id) =
            owning_cassette(&self.registry, track_id).map(|cassette| cassette.id.clone())
        else {
            return;
        };
        if let Some(widget) = self.view.widget_mut(&cassette_id) {
            widget.dragging = dragging;
        }
        if !dragging {
            self.refresh_readouts(track_id);
        }
    }

    /// A rewind tick moved `track_id`
    pub fn on_scrub_tick(&mut self, track_id: &TrackId) {
        let held = self
            .session
            .hold()
            .is_some_and(|hold| &hold.track_id == track_id);
        if held {
            self.refresh_readouts(track_id);
        }
    }

    /// Periodic progress: readouts for playing tracks, end detection
    pub fn poll_progress(&mut self) {
        for track_id in self.session.playing_tracks() {
            let Some(audio) = self.element(&track_id) else {
                continue;
            };
            if audio.has_ended() {
                self.handle_ended(&track_id);
            } else {
                trace!(track = %track_id, position = audio.current_time(), "Progress");
                self.refresh_readouts(&track_id);
            }
        }
    }
}
