//! Single-active-track enforcement

use super::Deck;
use crate::registry::{CassetteId, TrackId};
use crate::resolver::{owning_cassette, resolve_audio, resolve_video};
use tapedeck_common::events::TrackState;
use tracing::trace;

impl Deck {
    /// Pause every track except `exception` and resynchronize all transport UI
    ///
    /// Synchronous: no other command can interleave. Every card and widget ends up in the
    /// paused vocabulary, except the exception's own cassette when the exception is
    /// actually playing. Calling it twice in a row changes nothing the second time.
    pub fn pause_all_except(&mut self, exception: Option<&TrackId>) {
        trace!(exception = ?exception, "Pausing all tracks");

        let mut others = Vec::new();
        for track in self.registry.tracks() {
            if Some(&track.id) != exception {
                track.element.pause();
                others.push(track.id.clone());
            }
        }
        for id in &others {
            self.set_track_state(id, TrackState::Paused);
        }

        // Inactive-side videos are already paused by visibility handling
        for cassette in self.registry.cassettes() {
            let current = resolve_audio(cassette, cassette.active_side);
            if exception.is_some() && current == exception {
                continue;
            }
            if let Some(video) = resolve_video(cassette, cassette.active_side) {
                video.pause();
            }
        }

        let playing_owner: Option<CassetteId> = exception
            .filter(|id| {
                self.registry
                    .track(id)
                    .is_some_and(|track| !track.element.is_paused())
            })
            .and_then(|id| owning_cassette(&self.registry, id))
            .map(|cassette| cassette.id.clone());

        for card_id in self.view.card_ids() {
            let playing = playing_owner.as_ref() == Some(&card_id);
            self.mark_transport(&card_id, playing);
        }
        self.set_active_card(playing_owner.as_ref());
    }
}
