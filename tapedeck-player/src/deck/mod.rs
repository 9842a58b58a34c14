//! Deck: the playback state machine
//!
//! **Module Structure:**
//! - `mod.rs`: construction, command dispatch, accessors, event helpers
//! - `coordinator.rs`: single-active-track enforcement (pause-all-except)
//! - `controller.rs`: toggle / start / pause / ended / step / seek / stop transitions
//! - `scrub.rs`: press-and-hold fast-forward and rewind
//! - `flip.rs`: side flip with position continuity
//! - `readouts.rs`: widget readouts, seek drag, progress polling
//!
//! The deck processes one [`Command`] at a time. Async media starts suspend inside a
//! command, but exclusivity is always established before the first suspension point.

mod controller;
mod coordinator;
mod flip;
mod readouts;
mod scrub;

use crate::config::{DeckConfig, TransportSettings};
use crate::error::Result;
use crate::media::{ElementRef, MediaFactory};
use crate::registry::{Cassette, CassetteId, Control, Registry, TrackId};
use crate::resolver::{self, owning_cassette};
use crate::session::PlaybackSession;
use crate::view::{CardView, DeckView, WidgetView};
use chrono::Utc;
use std::sync::Arc;
use tapedeck_common::assets::AssetRewriter;
use tapedeck_common::events::{DeckEvent, EventBus, ScrubDirection, TrackState};
use tokio::sync::{broadcast, mpsc};
use tracing::debug;

pub(crate) use controller::clamp_position;

/// A discrete user gesture or media notification
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Card or widget toggle click
    Toggle(TrackId),
    /// Step by an arbitrary number of seconds (negative = back)
    StepBy(TrackId, f64),
    /// Step back by the configured skip
    StepBack(TrackId),
    /// Step forward by the configured skip
    StepForward(TrackId),
    /// Seek bar input, fraction 0..1 of the duration
    SeekToFraction(TrackId, f64),
    /// Pointer pressed on the seek bar
    BeginSeekDrag(TrackId),
    /// Pointer released / cancelled / blurred on the seek bar
    EndSeekDrag(TrackId),
    /// Pause and return to the start
    Stop(TrackId),
    /// Fast-forward or rewind button pressed
    BeginFastHold(TrackId, ScrubDirection),
    /// Hold released (release, cancel, leave and blur all map here)
    EndFastHold(TrackId),
    /// Flip control of a cassette
    Flip(CassetteId),
    /// Media notification: track reached its end
    Ended(TrackId),
    /// Media notification: duration became known
    MetadataLoaded(TrackId),
    /// Media notification: position advanced
    TimeUpdate(TrackId),
}

impl Command {
    /// Track the command addresses, if any
    pub fn track(&self) -> Option<&TrackId> {
        match self {
            Command::Toggle(id)
            | Command::StepBy(id, _)
            | Command::StepBack(id)
            | Command::StepForward(id)
            | Command::SeekToFraction(id, _)
            | Command::BeginSeekDrag(id)
            | Command::EndSeekDrag(id)
            | Command::Stop(id)
            | Command::BeginFastHold(id, _)
            | Command::EndFastHold(id)
            | Command::Ended(id)
            | Command::MetadataLoaded(id)
            | Command::TimeUpdate(id) => Some(id),
            Command::Flip(_) => None,
        }
    }

    /// Widget control that must exist for the command to do anything
    ///
    /// `None` means the command does not come from a widget-only control.
    pub fn required_control(&self) -> Option<Control> {
        match self {
            Command::StepBy(_, delta) if *delta < 0.0 => Some(Control::StepBack),
            Command::StepBy(_, _) => Some(Control::StepForward),
            Command::StepBack(_) => Some(Control::StepBack),
            Command::StepForward(_) => Some(Control::StepForward),
            Command::SeekToFraction(..) | Command::BeginSeekDrag(_) | Command::EndSeekDrag(_) => {
                Some(Control::Seek)
            }
            Command::Stop(_) => Some(Control::Stop),
            Command::BeginFastHold(_, ScrubDirection::Forward) => Some(Control::FastForward),
            Command::BeginFastHold(_, ScrubDirection::Rewind) => Some(Control::FastBack),
            _ => None,
        }
    }

    /// Gesture (as opposed to a media notification or a release)
    fn is_gesture(&self) -> bool {
        !matches!(
            self,
            Command::EndFastHold(_)
                | Command::Ended(_)
                | Command::MetadataLoaded(_)
                | Command::TimeUpdate(_)
                | Command::Flip(_)
        )
    }
}

/// The playback state machine for a set of cassettes
pub struct Deck {
    registry: Registry,
    session: PlaybackSession,
    view: DeckView,
    events: Arc<EventBus>,
    transport: TransportSettings,
    scrub_tick_tx: mpsc::UnboundedSender<TrackId>,
    scrub_tick_rx: Option<mpsc::UnboundedReceiver<TrackId>>,
}

impl Deck {
    /// Create a deck over a built registry
    pub fn new(registry: Registry, transport: TransportSettings, events: Arc<EventBus>) -> Self {
        let view = DeckView::from_registry(&registry);
        let (scrub_tick_tx, scrub_tick_rx) = mpsc::unbounded_channel();
        let mut deck = Self {
            registry,
            session: PlaybackSession::new(),
            view,
            events,
            transport,
            scrub_tick_tx,
            scrub_tick_rx: Some(scrub_tick_rx),
        };
        deck.initialize_view();
        deck
    }

    /// Build registry and deck from a loaded config
    pub fn from_config(config: &DeckConfig, factory: &dyn MediaFactory) -> Result<Self> {
        let rewriter = AssetRewriter::from_config(&config.assets);
        let registry = Registry::from_config(config, factory, &rewriter)?;
        let events = Arc::new(EventBus::new(config.transport.event_capacity));
        Ok(Self::new(registry, config.transport.clone(), events))
    }

    fn initialize_view(&mut self) {
        for cassette_id in self.view.card_ids() {
            self.apply_video_visibility(&cassette_id);
            self.refresh_cassette_readouts(&cassette_id);
        }
    }

    /// Apply one command
    pub async fn dispatch(&mut self, command: Command) {
        debug!(?command, "Dispatching command");
        if !self.command_allowed(&command) {
            return;
        }

        match command {
            Command::Toggle(id) => self.toggle(&id).await,
            Command::StepBy(id, delta) => self.step_by(&id, delta),
            Command::StepBack(id) => self.step_by(&id, -self.transport.skip_secs),
            Command::StepForward(id) => self.step_by(&id, self.transport.skip_secs),
            Command::SeekToFraction(id, fraction) => self.seek_to_fraction(&id, fraction),
            Command::BeginSeekDrag(id) => self.set_seek_dragging(&id, true),
            Command::EndSeekDrag(id) => self.set_seek_dragging(&id, false),
            Command::Stop(id) => self.stop(&id),
            Command::BeginFastHold(id, direction) => self.begin_fast_hold(&id, direction).await,
            Command::EndFastHold(id) => self.end_fast_hold(&id).await,
            Command::Flip(cassette_id) => self.flip(&cassette_id).await,
            Command::Ended(id) => self.handle_ended(&id),
            Command::MetadataLoaded(id) | Command::TimeUpdate(id) => self.refresh_readouts(&id),
        }
    }

    /// Missing tracks, inactive-side tracks and absent widget controls are no-ops
    fn command_allowed(&self, command: &Command) -> bool {
        let Some(track_id) = command.track() else {
            return true;
        };
        let Some(track) = self.registry.track(track_id) else {
            debug!(track = %track_id, "Ignoring command for unknown track");
            return false;
        };

        let owner = self.ui_cassette(track_id);
        if command.is_gesture() && track.cassette.is_some() && owner.is_none() {
            debug!(track = %track_id, "Ignoring command for track on an inactive side");
            return false;
        }

        if let Some(control) = command.required_control() {
            let present = owner
                .and_then(|cassette| self.view.widget(&cassette.id))
                .is_some_and(|widget| widget.has(control));
            if !present {
                debug!(track = %track_id, ?control, "Widget has no such control");
                return false;
            }
        }
        true
    }

    /// Stop background work (rewind timer) and restore the held track's rate
    pub async fn shutdown(&mut self) {
        self.abandon_hold();
    }

    /// Receiver for rewind ticks; the service loop takes it once
    pub fn take_scrub_ticks(&mut self) -> Option<mpsc::UnboundedReceiver<TrackId>> {
        self.scrub_tick_rx.take()
    }

    // ========================================
    // Accessors
    // ========================================

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn view(&self) -> &DeckView {
        &self.view
    }

    pub fn card(&self, id: &CassetteId) -> Option<&CardView> {
        self.view.card(id)
    }

    pub fn widget(&self, id: &CassetteId) -> Option<&WidgetView> {
        self.view.widget(id)
    }

    pub fn track_state(&self, id: &TrackId) -> TrackState {
        self.session.state(id)
    }

    pub fn element(&self, id: &TrackId) -> Option<ElementRef> {
        self.registry.track(id).map(|track| track.element.clone())
    }

    /// Track ids whose element is actually playing right now
    pub fn audible_tracks(&self) -> Vec<TrackId> {
        self.registry
            .tracks()
            .filter(|track| !track.element.is_paused())
            .map(|track| track.id.clone())
            .collect()
    }

    /// Tracks in the `Playing` state
    pub fn playing_tracks(&self) -> Vec<TrackId> {
        self.session.playing_tracks()
    }

    /// Track on the cassette's active side
    pub fn active_track(&self, cassette_id: &CassetteId) -> Option<TrackId> {
        let cassette = self.registry.cassette(cassette_id)?;
        resolver::resolve_audio(cassette, cassette.active_side).cloned()
    }

    pub fn active_cards(&self) -> Vec<CassetteId> {
        self.view.active_cards()
    }

    /// Track and direction of the hold in progress
    pub fn hold(&self) -> Option<(TrackId, ScrubDirection)> {
        self.session
            .hold()
            .map(|hold| (hold.track_id.clone(), hold.direction))
    }

    pub fn transport(&self) -> &TransportSettings {
        &self.transport
    }

    pub fn events(&self) -> Arc<EventBus> {
        self.events.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DeckEvent> {
        self.events.subscribe()
    }

    // ========================================
    // State + event helpers
    // ========================================

    /// Cassette whose card and widget follow `track_id`
    ///
    /// Normally the active-side owner. A track left playing by a flip onto an empty side
    /// stays with its cassette until it pauses or ends.
    fn ui_cassette(&self, track_id: &TrackId) -> Option<&Cassette> {
        if let Some(cassette) = owning_cassette(&self.registry, track_id) {
            return Some(cassette);
        }
        if self.session.state(track_id) != TrackState::Playing {
            return None;
        }
        let cassette_id = self.registry.track(track_id)?.cassette.as_ref()?;
        let cassette = self.registry.cassette(cassette_id)?;
        resolver::resolve_audio(cassette, cassette.active_side)
            .is_none()
            .then_some(cassette)
    }

    fn set_track_state(&mut self, id: &TrackId, state: TrackState) {
        if let Some(old_state) = self.session.set_state(id, state) {
            debug!(track = %id, %old_state, new_state = %state, "Track state changed");
            self.events.emit_lossy(DeckEvent::TrackStateChanged {
                track_id: id.to_string(),
                old_state,
                new_state: state,
                timestamp: Utc::now(),
            });
        }
    }

    fn update_card(&mut self, id: &CassetteId, f: impl FnOnce(&mut CardView) -> bool) {
        let Some(card) = self.view.card_mut(id) else {
            return;
        };
        if f(card) {
            let event = DeckEvent::CardUpdated {
                cassette_id: id.to_string(),
                playing: card.playing,
                status: card.status,
                active: card.active,
                timestamp: Utc::now(),
            };
            self.events.emit_lossy(event);
        }
    }

    fn update_widget(&mut self, id: &CassetteId, f: impl FnOnce(&mut WidgetView) -> bool) {
        let Some(widget) = self.view.widget_mut(id) else {
            return;
        };
        if f(widget) {
            let event = DeckEvent::WidgetUpdated {
                cassette_id: id.to_string(),
                toggle_label: widget.toggle_label,
                status: widget.status,
                timestamp: Utc::now(),
            };
            self.events.emit_lossy(event);
        }
    }

    /// Playing/paused vocabulary on a cassette's button, card status and widget
    fn mark_transport(&mut self, id: &CassetteId, playing: bool) {
        let status = if playing {
            tapedeck_common::events::StatusText::Playing
        } else {
            tapedeck_common::events::StatusText::Paused
        };
        self.update_card(id, |card| card.set_playing(playing, status));
        self.update_widget(id, |widget| widget.set_transport(playing));
    }

    /// Make `id` the only card carrying the active marker (or clear all with `None`)
    fn set_active_card(&mut self, id: Option<&CassetteId>) {
        for card_id in self.view.card_ids() {
            let active = Some(&card_id) == id;
            self.update_card(&card_id, |card| card.set_active(active));
        }
    }

    fn apply_video_visibility(&mut self, id: &CassetteId) {
        let Some(cassette) = self.registry.cassette(id) else {
            return;
        };
        let visible = resolver::set_video_visibility(cassette, cassette.active_side);
        let Some(card) = self.view.card_mut(id) else {
            return;
        };
        if card.visible_video != visible {
            card.visible_video = visible;
            self.events.emit_lossy(DeckEvent::VideoVisibilityChanged {
                cassette_id: id.to_string(),
                visible,
                timestamp: Utc::now(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_controls() {
        let id = TrackId::from("t");
        assert_eq!(Command::Toggle(id.clone()).required_control(), None);
        assert_eq!(
            Command::StepBy(id.clone(), -3.0).required_control(),
            Some(Control::StepBack)
        );
        assert_eq!(
            Command::StepBy(id.clone(), 3.0).required_control(),
            Some(Control::StepForward)
        );
        assert_eq!(
            Command::BeginFastHold(id.clone(), ScrubDirection::Rewind).required_control(),
            Some(Control::FastBack)
        );
        assert_eq!(Command::EndFastHold(id).required_control(), None);
        assert_eq!(Command::Flip(CassetteId::from("c")).required_control(), None);
    }

    #[test]
    fn test_command_track() {
        let id = TrackId::from("t");
        assert_eq!(Command::Stop(id.clone()).track(), Some(&id));
        assert_eq!(Command::Flip(CassetteId::from("c")).track(), None);
    }
}
