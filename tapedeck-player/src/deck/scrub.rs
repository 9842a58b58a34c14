//! Press-and-hold fast-forward / rewind
//!
//! Fast-forward raises the audio playback rate while held. Rewind pauses the track and
//! jumps it backwards in discrete steps on a timer. Either way, releasing restores the
//! rate and the play/pause state captured when the hold began.

use super::Deck;
use crate::media::ElementRef;
use crate::registry::TrackId;
use crate::session::{PlaybackSnapshot, ScrubHold};
use chrono::Utc;
use std::time::Duration;
use tapedeck_common::events::{DeckEvent, ScrubDirection};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

impl Deck {
    /// Begin a hold on `track_id`, ending any hold already in progress
    pub async fn begin_fast_hold(&mut self, track_id: &TrackId, direction: ScrubDirection) {
        self.release_hold().await;

        let Some(audio) = self.element(track_id) else {
            return;
        };
        let snapshot = PlaybackSnapshot::capture(audio.as_ref());

        let timer = match direction {
            ScrubDirection::Forward => {
                if snapshot.was_paused {
                    self.start(track_id).await;
                }
                audio.set_playback_rate(self.transport.fast_forward_rate);
                None
            }
            ScrubDirection::Rewind => {
                if !snapshot.was_paused {
                    self.pause_track(track_id);
                }
                Some(spawn_rewind_timer(
                    track_id.clone(),
                    audio.clone(),
                    self.transport.rewind_step_secs,
                    self.transport.rewind_interval(),
                    self.scrub_tick_tx.clone(),
                ))
            }
        };

        self.session.begin_hold(ScrubHold {
            track_id: track_id.clone(),
            direction,
            snapshot,
            timer,
        });
        info!("Scrub {:?} started on {}", direction, track_id);
        self.events.emit_lossy(DeckEvent::ScrubStarted {
            track_id: track_id.to_string(),
            direction,
            timestamp: Utc::now(),
        });
        self.refresh_readouts(track_id);
    }

    /// Release the hold on `track_id`; releases for other tracks are ignored
    pub async fn end_fast_hold(&mut self, track_id: &TrackId) {
        let held = self
            .session
            .hold()
            .is_some_and(|hold| &hold.track_id == track_id);
        if held {
            self.release_hold().await;
        } else {
            debug!("No hold in progress on {}", track_id);
        }
    }

    /// End the current hold and restore the captured playback state
    pub(crate) async fn release_hold(&mut self) {
        let Some(mut hold) = self.session.take_hold() else {
            return;
        };
        hold.cancel_timer();
        let track_id = hold.track_id.clone();
        let direction = hold.direction;
        let snapshot = hold.snapshot;
        drop(hold);

        if let Some(audio) = self.element(&track_id) {
            audio.set_playback_rate(snapshot.previous_rate);
            let paused_now = audio.is_paused();
            if snapshot.was_paused && !paused_now {
                self.pause_track(&track_id);
            } else if !snapshot.was_paused && paused_now && !audio.has_ended() {
                // A track that ran to its end during the hold stays finished
                self.start(&track_id).await;
            }
        }

        info!("Scrub {:?} ended on {}", direction, track_id);
        self.events.emit_lossy(DeckEvent::ScrubEnded {
            track_id: track_id.to_string(),
            direction,
            timestamp: Utc::now(),
        });
        self.refresh_readouts(&track_id);
    }

    /// Drop the hold without transport transitions, restoring only the rate
    pub(crate) fn abandon_hold(&mut self) {
        let Some(hold) = self.session.take_hold() else {
            return;
        };
        if let Some(audio) = self.element(&hold.track_id) {
            audio.set_playback_rate(hold.snapshot.previous_rate);
        }
        // Dropping the hold aborts its timer
    }
}

/// Step `element` back by `step` seconds every `period`, clamped at zero
///
/// Each tick reports the track on `ticks` so the owner can refresh readouts. The task
/// runs until aborted or until the receiver goes away.
fn spawn_rewind_timer(
    track_id: TrackId,
    element: ElementRef,
    step: f64,
    period: Duration,
    ticks: mpsc::UnboundedSender<TrackId>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let target = (element.current_time() - step).max(0.0);
            element.set_current_time(target);
            if ticks.send(track_id.clone()).is_err() {
                break;
            }
        }
    })
}
