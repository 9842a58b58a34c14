//! Transport transitions for a single track

use super::Deck;
use crate::media::{known_duration, MediaError, MediaPair};
use crate::registry::{CassetteId, TrackId};
use crate::resolver::{bound_side, resolve_pair, resolve_video};
use chrono::Utc;
use tapedeck_common::events::{DeckEvent, StatusText, TrackState};
use tracing::{debug, info, warn};

/// Clamp a target position into `[0, upper]`
///
/// Never panics: a negative or NaN upper bound collapses to zero.
pub(crate) fn clamp_position(value: f64, upper: f64) -> f64 {
    let upper = if upper.is_nan() { 0.0 } else { upper.max(0.0) };
    value.max(0.0).min(upper)
}

impl Deck {
    /// Play if paused, pause if playing
    pub async fn toggle(&mut self, track_id: &TrackId) {
        let Some(audio) = self.element(track_id) else {
            return;
        };
        if audio.is_paused() {
            self.start(track_id).await;
        } else {
            self.pause_track(track_id);
        }
    }

    /// Make `track_id` the only playing track
    ///
    /// Everything else is paused before the first await, so a second start issued while
    /// this one is still settling cannot leave two tracks audible.
    pub async fn start(&mut self, track_id: &TrackId) {
        let Some(audio) = self.element(track_id) else {
            return;
        };
        let (cassette_id, pair) = match self.track_pair(track_id) {
            Some((id, pair)) => (Some(id), pair),
            None => (None, None),
        };
        self.pause_all_except(Some(track_id));
        self.set_track_state(track_id, TrackState::Starting);

        if let Some(pair) = &pair {
            let started = self.settle(pair.start_video()).await;
            if let Err(e) = started {
                warn!("Video for {} did not start: {}", track_id, e);
                if let Some(id) = &cassette_id {
                    self.events.emit_lossy(DeckEvent::VideoBlocked {
                        cassette_id: id.to_string(),
                        reason: e.to_string(),
                        timestamp: Utc::now(),
                    });
                }
            }
        }

        match self.settle(audio.play()).await {
            Ok(()) => {
                self.set_track_state(track_id, TrackState::Playing);
                if let Some(id) = &cassette_id {
                    self.mark_transport(id, true);
                    self.set_active_card(Some(id));
                }
                info!("Playing track {}", track_id);
            }
            Err(e) => {
                audio.pause();
                if let Some(pair) = &pair {
                    pair.pause();
                }
                self.set_track_state(track_id, TrackState::Blocked);
                if let Some(id) = &cassette_id {
                    self.mark_blocked(id);
                }
                warn!("Playback blocked for {}: {}", track_id, e);
                self.events.emit_lossy(DeckEvent::PlaybackBlocked {
                    track_id: track_id.to_string(),
                    reason: e.to_string(),
                    timestamp: Utc::now(),
                });
            }
        }
        self.refresh_readouts(track_id);
    }

    /// Bound a media start by the configured timeout
    async fn settle<F>(&self, start: F) -> Result<(), MediaError>
    where
        F: std::future::Future<Output = Result<(), MediaError>>,
    {
        let limit = self.transport.start_timeout();
        match tokio::time::timeout(limit, start).await {
            Ok(result) => result,
            Err(_) => Err(MediaError::TimedOut(self.transport.start_timeout_ms)),
        }
    }

    fn mark_blocked(&mut self, id: &CassetteId) {
        self.update_card(id, |card| card.set_status(StatusText::Blocked));
        self.update_widget(id, |widget| widget.set_status(StatusText::Blocked));
    }

    /// Pause a track together with its cassette's current video
    pub fn pause_track(&mut self, track_id: &TrackId) {
        let Some(audio) = self.element(track_id) else {
            return;
        };
        audio.pause();
        let cassette_id = self.pause_owner_video(track_id);
        self.set_track_state(track_id, TrackState::Paused);
        if let Some(id) = &cassette_id {
            self.mark_transport(id, false);
            self.update_card(id, |card| card.set_active(false));
        }
        debug!("Paused track {}", track_id);
        self.refresh_readouts(track_id);
    }

    /// Media notification: the track ran to its end
    pub fn handle_ended(&mut self, track_id: &TrackId) {
        if self.registry.track(track_id).is_none() {
            return;
        }
        let cassette_id = self.pause_owner_video(track_id);
        self.set_track_state(track_id, TrackState::Paused);
        if let Some(id) = &cassette_id {
            self.mark_transport(id, false);
            self.update_card(id, |card| card.set_active(false));
        }
        info!("Track {} ended", track_id);
        self.refresh_readouts(track_id);
    }

    fn pause_owner_video(&self, track_id: &TrackId) -> Option<CassetteId> {
        let cassette = self.ui_cassette(track_id)?;
        let video = bound_side(cassette, track_id).and_then(|side| resolve_video(cassette, side));
        if let Some(video) = video {
            video.pause();
        }
        Some(cassette.id.clone())
    }

    /// UI cassette of `track_id` and the media pair on the side the track is bound to
    fn track_pair(&self, track_id: &TrackId) -> Option<(CassetteId, Option<MediaPair>)> {
        let cassette = self.ui_cassette(track_id)?;
        let pair = bound_side(cassette, track_id)
            .and_then(|side| resolve_pair(&self.registry, cassette, side));
        Some((cassette.id.clone(), pair))
    }

    /// Move the position by `delta` seconds, clamped into the track
    ///
    /// With an unknown duration, stepping forward is unbounded and stepping back stops at
    /// zero.
    pub fn step_by(&mut self, track_id: &TrackId, delta: f64) {
        let Some(audio) = self.element(track_id) else {
            return;
        };
        if !delta.is_finite() {
            return;
        }
        let current = audio.current_time();
        let upper = match known_duration(audio.as_ref()) {
            Some(duration) => duration,
            None if delta >= 0.0 => current + delta,
            None => f64::INFINITY,
        };
        audio.set_current_time(clamp_position(current + delta, upper));
        self.refresh_readouts(track_id);
    }

    /// Seek to a fraction of the duration; no-op while the duration is unknown
    pub fn seek_to_fraction(&mut self, track_id: &TrackId, fraction: f64) {
        let Some(audio) = self.element(track_id) else {
            return;
        };
        let Some(duration) = known_duration(audio.as_ref()).filter(|d| *d > 0.0) else {
            debug!("Seek ignored for {}: duration unknown", track_id);
            return;
        };
        if !fraction.is_finite() {
            return;
        }
        audio.set_current_time(fraction.clamp(0.0, 1.0) * duration);
        self.refresh_readouts(track_id);
    }

    /// Pause and rewind to the start
    pub fn stop(&mut self, track_id: &TrackId) {
        let Some(audio) = self.element(track_id) else {
            return;
        };
        self.pause_track(track_id);
        audio.set_current_time(0.0);
        self.refresh_readouts(track_id);
    }
}

#[cfg(test)]
mod tests {
    use super::clamp_position;

    #[test]
    fn test_clamp_position() {
        assert_eq!(clamp_position(-3.0, 10.0), 0.0);
        assert_eq!(clamp_position(12.0, 10.0), 10.0);
        assert_eq!(clamp_position(4.0, f64::INFINITY), 4.0);
        assert_eq!(clamp_position(4.0, f64::NAN), 0.0);
        assert_eq!(clamp_position(4.0, -1.0), 0.0);
    }
}
