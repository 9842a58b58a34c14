//! Side flip

use super::{clamp_position, Deck};
use crate::media::known_duration;
use crate::registry::CassetteId;
use crate::resolver::{active_pair, resolve_pair};
use crate::session::PlaybackSnapshot;
use chrono::Utc;
use tapedeck_common::events::DeckEvent;
use tracing::{debug, info};

impl Deck {
    /// Switch a cassette to its other side
    ///
    /// A cassette that was playing keeps playing on the new side at the same position
    /// (clamped into the new track). A paused cassette only changes side.
    pub async fn flip(&mut self, cassette_id: &CassetteId) {
        let Some(cassette) = self.registry.cassette(cassette_id) else {
            debug!("Flip ignored: unknown cassette {}", cassette_id);
            return;
        };
        let outgoing = active_pair(&self.registry, cassette);

        // A hold on the outgoing track ends before the side changes
        let held = outgoing.as_ref().is_some_and(|pair| {
            self.session
                .hold()
                .is_some_and(|hold| hold.track_id == pair.track_id)
        });
        if held {
            self.release_hold().await;
        }

        let Some(cassette) = self.registry.cassette(cassette_id) else {
            return;
        };
        let from = cassette.active_side;
        let to = from.flipped();
        let incoming = resolve_pair(&self.registry, cassette, to);
        let was_playing = self.view.card(cassette_id).is_some_and(|card| card.playing);

        // Continuity needs both ends; without an incoming track the media part is skipped
        let continuity = match (&outgoing, &incoming) {
            (Some(out), Some(_)) if was_playing => {
                let snapshot = PlaybackSnapshot::capture(out.audio.as_ref());
                out.pause();
                Some(snapshot)
            }
            _ => None,
        };

        self.registry.set_active_side(cassette_id, to);
        self.update_card(cassette_id, |card| {
            let changed = card.side != to;
            card.side = to;
            changed
        });
        self.apply_video_visibility(cassette_id);
        info!("Cassette {} flipped {} -> {}", cassette_id, from, to);
        self.events.emit_lossy(DeckEvent::SideFlipped {
            cassette_id: cassette_id.to_string(),
            from,
            to,
            timestamp: Utc::now(),
        });

        match (continuity, incoming) {
            (Some(snapshot), Some(incoming)) => {
                self.pause_all_except(None);
                let upper = known_duration(incoming.audio.as_ref()).unwrap_or(f64::INFINITY);
                incoming.seek(clamp_position(snapshot.position_seconds, upper));
                self.start(&incoming.track_id).await;
            }
            _ => self.refresh_cassette_readouts(cassette_id),
        }
    }
}
