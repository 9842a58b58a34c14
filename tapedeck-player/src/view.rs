//! UI view model
//!
//! Derived presentation state for cassette cards and player widgets. Never a source of
//! truth for playback: the deck writes it after every transition and renderers read it
//! (or follow the matching events). Setters report whether anything changed so the deck
//! only emits events for real changes.

use crate::registry::{CassetteId, Control, ControlSet, Registry};
use std::collections::BTreeMap;
use tapedeck_common::events::{Side, StatusText, ToggleLabel};
use tapedeck_common::time::format_clock;

/// Presentation of one cassette card and its button
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    /// Side label shown on the card
    pub side: Side,
    /// Button carries the "playing" class
    pub playing: bool,
    /// Status text; `None` when the card has no status element
    pub status: Option<StatusText>,
    /// Active-card marker
    pub active: bool,
    /// Side whose video is displayed
    pub visible_video: Option<Side>,
}

impl CardView {
    fn new(side: Side, has_status: bool) -> Self {
        Self {
            side,
            playing: false,
            status: has_status.then_some(StatusText::Paused),
            active: false,
            visible_video: None,
        }
    }

    /// Button class + status text; returns true on change
    pub fn set_playing(&mut self, playing: bool, status: StatusText) -> bool {
        let before = (self.playing, self.status);
        self.playing = playing;
        self.set_status(status);
        before != (self.playing, self.status)
    }

    /// Status text only (blocked starts leave the button class alone)
    pub fn set_status(&mut self, status: StatusText) -> bool {
        match &mut self.status {
            Some(current) if *current != status => {
                *current = status;
                true
            }
            _ => false,
        }
    }

    pub fn set_active(&mut self, active: bool) -> bool {
        std::mem::replace(&mut self.active, active) != active
    }
}

/// Presentation of a player widget
///
/// Every field belonging to a control the widget lacks stays `None` forever.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetView {
    pub controls: ControlSet,
    pub toggle_label: Option<ToggleLabel>,
    pub status: Option<StatusText>,
    pub current_time: Option<String>,
    pub duration: Option<String>,
    /// Seek bar position, 0..100
    pub seek_percent: Option<f64>,
    /// A seek drag is in progress; time updates leave the seek bar alone
    pub dragging: bool,
}

impl WidgetView {
    fn new(controls: ControlSet) -> Self {
        Self {
            toggle_label: controls.has(Control::Toggle).then_some(ToggleLabel::Play),
            status: controls
                .has(Control::StatusText)
                .then_some(StatusText::Paused),
            current_time: None,
            duration: None,
            seek_percent: None,
            dragging: false,
            controls,
        }
    }

    pub fn has(&self, control: Control) -> bool {
        self.controls.has(control)
    }

    /// Toggle label + status text for a playing/paused track; returns true on change
    pub fn set_transport(&mut self, playing: bool) -> bool {
        let label = if playing {
            ToggleLabel::Pause
        } else {
            ToggleLabel::Play
        };
        let status = if playing {
            StatusText::Playing
        } else {
            StatusText::Paused
        };
        let before = (self.toggle_label, self.status);
        if self.has(Control::Toggle) {
            self.toggle_label = Some(label);
        }
        self.set_status(status);
        before != (self.toggle_label, self.status)
    }

    pub fn set_status(&mut self, status: StatusText) -> bool {
        if !self.has(Control::StatusText) || self.status == Some(status) {
            return false;
        }
        self.status = Some(status);
        true
    }

    /// Refresh time readouts from a position and duration (seconds)
    pub fn apply_readouts(&mut self, position: f64, duration: f64) -> bool {
        let before = (
            self.current_time.clone(),
            self.duration.clone(),
            self.seek_percent,
        );
        if self.has(Control::CurrentTimeText) {
            self.current_time = Some(format_clock(position));
        }
        if self.has(Control::DurationText) {
            self.duration = Some(format_clock(duration));
        }
        if self.has(Control::Seek) && !self.dragging && duration.is_finite() && duration > 0.0 {
            self.seek_percent = Some((position / duration * 100.0).clamp(0.0, 100.0));
        }
        before != (self.current_time.clone(), self.duration.clone(), self.seek_percent)
    }
}

/// All cards and widgets of a deck
#[derive(Debug, Clone, Default)]
pub struct DeckView {
    cards: BTreeMap<CassetteId, CardView>,
    widgets: BTreeMap<CassetteId, WidgetView>,
}

impl DeckView {
    pub fn from_registry(registry: &Registry) -> Self {
        let mut view = DeckView::default();
        for cassette in registry.cassettes() {
            view.cards.insert(
                cassette.id.clone(),
                CardView::new(cassette.active_side, cassette.has_status),
            );
            if let Some(controls) = &cassette.widget {
                view.widgets
                    .insert(cassette.id.clone(), WidgetView::new(controls.clone()));
            }
        }
        view
    }

    pub fn card(&self, id: &CassetteId) -> Option<&CardView> {
        self.cards.get(id)
    }

    pub fn card_mut(&mut self, id: &CassetteId) -> Option<&mut CardView> {
        self.cards.get_mut(id)
    }

    pub fn widget(&self, id: &CassetteId) -> Option<&WidgetView> {
        self.widgets.get(id)
    }

    pub fn widget_mut(&mut self, id: &CassetteId) -> Option<&mut WidgetView> {
        self.widgets.get_mut(id)
    }

    pub fn card_ids(&self) -> Vec<CassetteId> {
        self.cards.keys().cloned().collect()
    }

    pub fn widget_ids(&self) -> Vec<CassetteId> {
        self.widgets.keys().cloned().collect()
    }

    /// Cards currently carrying the active-card marker
    pub fn active_cards(&self) -> Vec<CassetteId> {
        self.cards
            .iter()
            .filter(|(_, card)| card.active)
            .map(|(id, _)| id.clone())
            .collect()
    }
}
