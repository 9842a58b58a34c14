//! Test deck for tapedeck-player integration tests
//!
//! Layout:
//! - `tape1`: audio01 (120 s) / audio02 (90 s), one video per side, full widget
//! - `tape2`: audio03 (200 s) / audio04 (25 s), one video per side, widget with
//!   toggle + status + current time only
//! - `tape3`: audio05 (60 s) on both sides, one shared video, no widget, no status text
//! - `tape4`: audio06 (45 s) on side A only, full widget
//! - `audio07` (30 s): not bound to any cassette
//!
//! Elements are kept as concrete [`SimulatedElement`]s so tests can inject rejections,
//! latency and unknown durations.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use tapedeck_common::events::{DeckEvent, EventBus, Side};
use tapedeck_player::config::TransportSettings;
use tapedeck_player::media::{ElementRef, SimulatedElement};
use tapedeck_player::registry::{Cassette, Control, ControlSet, Registry, SideBinding};
use tapedeck_player::{CassetteId, Command, Deck, TrackId};
use tokio::sync::broadcast;

pub struct TestDeck {
    pub deck: Deck,
    audio: HashMap<&'static str, Arc<SimulatedElement>>,
    video: HashMap<&'static str, Arc<SimulatedElement>>,
}

const TRACKS: [(&str, f64); 7] = [
    ("audio01", 120.0),
    ("audio02", 90.0),
    ("audio03", 200.0),
    ("audio04", 25.0),
    ("audio05", 60.0),
    ("audio06", 45.0),
    ("audio07", 30.0),
];

const VIDEOS: [&str; 5] = ["tape1_a", "tape1_b", "tape2_a", "tape2_b", "tape3"];

impl TestDeck {
    pub fn new() -> Self {
        Self::with_transport(TransportSettings::default())
    }

    pub fn with_transport(transport: TransportSettings) -> Self {
        let mut registry = Registry::new();
        let mut audio = HashMap::new();
        for (id, duration) in TRACKS {
            let element = Arc::new(SimulatedElement::new(format!("assets/{id}.mp3"), duration));
            registry
                .add_track(TrackId::from(id), element.clone())
                .unwrap();
            audio.insert(id, element);
        }

        let mut video = HashMap::new();
        for name in VIDEOS {
            let element =
                Arc::new(SimulatedElement::new(format!("assets/{name}.mp4"), 8.0).looping());
            video.insert(name, element);
        }
        let v = |name: &str| Some(video[name].clone() as ElementRef);
        let t = |id: &str| Some(TrackId::from(id));

        registry
            .add_cassette(Cassette {
                id: "tape1".into(),
                active_side: Side::A,
                audio: SideBinding { a: t("audio01"), b: t("audio02"), shared: None },
                video: SideBinding { a: v("tape1_a"), b: v("tape1_b"), shared: None },
                has_status: true,
                widget: Some(ControlSet::all()),
            })
            .unwrap();
        registry
            .add_cassette(Cassette {
                id: "tape2".into(),
                active_side: Side::A,
                audio: SideBinding { a: t("audio03"), b: t("audio04"), shared: None },
                video: SideBinding { a: v("tape2_a"), b: v("tape2_b"), shared: None },
                has_status: true,
                widget: Some(
                    [Control::Toggle, Control::StatusText, Control::CurrentTimeText]
                        .into_iter()
                        .collect(),
                ),
            })
            .unwrap();
        registry
            .add_cassette(Cassette {
                id: "tape3".into(),
                active_side: Side::A,
                audio: SideBinding { a: None, b: None, shared: t("audio05") },
                video: SideBinding { a: None, b: None, shared: v("tape3") },
                has_status: false,
                widget: None,
            })
            .unwrap();
        registry
            .add_cassette(Cassette {
                id: "tape4".into(),
                active_side: Side::A,
                audio: SideBinding { a: t("audio06"), b: None, shared: None },
                video: SideBinding::default(),
                has_status: true,
                widget: Some(ControlSet::all()),
            })
            .unwrap();

        let events = Arc::new(EventBus::new(transport.event_capacity));
        let deck = Deck::new(registry, transport, events);
        Self { deck, audio, video }
    }

    pub fn audio(&self, id: &str) -> Arc<SimulatedElement> {
        self.audio[id].clone()
    }

    pub fn video(&self, name: &str) -> Arc<SimulatedElement> {
        self.video[name].clone()
    }

    pub async fn send(&mut self, command: Command) {
        self.deck.dispatch(command).await;
    }

    pub async fn toggle(&mut self, id: &str) {
        self.send(Command::Toggle(track(id))).await;
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DeckEvent> {
        self.deck.subscribe()
    }

    /// Ids of tracks whose element is not paused
    pub fn audible(&self) -> Vec<String> {
        self.deck
            .audible_tracks()
            .into_iter()
            .map(|id| id.to_string())
            .collect()
    }
}

pub fn track(id: &str) -> TrackId {
    TrackId::from(id)
}

pub fn cassette(id: &str) -> CassetteId {
    CassetteId::from(id)
}

/// Everything currently buffered on a receiver
pub fn drain(rx: &mut broadcast::Receiver<DeckEvent>) -> Vec<DeckEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub fn approx(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-6
}
