//! Cassette and track registry
//!
//! Built once when the deck is created and indexed by id, so "is this the exception
//! track?" is an exact id comparison. Only a cassette's active side changes afterwards.

use crate::config::{CassetteLayout, DeckConfig, SideLayout};
use crate::error::{Error, Result};
use crate::media::{ElementRef, MediaFactory, MediaSource};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tapedeck_common::assets::AssetRewriter;
use tapedeck_common::events::Side;
use tracing::debug;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifies an audio track
    TrackId
);
string_id!(
    /// Identifies a cassette (card + button + optional widget)
    CassetteId
);

/// A widget control; any subset may be present
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Control {
    Toggle,
    Seek,
    StepBack,
    StepForward,
    Stop,
    FastBack,
    FastForward,
    StatusText,
    CurrentTimeText,
    DurationText,
}

impl Control {
    pub const ALL: [Control; 10] = [
        Control::Toggle,
        Control::Seek,
        Control::StepBack,
        Control::StepForward,
        Control::Stop,
        Control::FastBack,
        Control::FastForward,
        Control::StatusText,
        Control::CurrentTimeText,
        Control::DurationText,
    ];
}

/// Set of controls a widget exposes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlSet(BTreeSet<Control>);

impl ControlSet {
    pub fn all() -> Self {
        Self(Control::ALL.iter().copied().collect())
    }

    pub fn has(&self, control: Control) -> bool {
        self.0.contains(&control)
    }
}

impl FromIterator<Control> for ControlSet {
    fn from_iter<I: IntoIterator<Item = Control>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Per-side binding with a shared fallback
///
/// A side-specific entry wins; a cassette with only a shared entry serves it on both sides.
#[derive(Debug, Clone)]
pub struct SideBinding<T> {
    pub a: Option<T>,
    pub b: Option<T>,
    pub shared: Option<T>,
}

impl<T> SideBinding<T> {
    pub fn resolve(&self, side: Side) -> Option<&T> {
        let specific = match side {
            Side::A => self.a.as_ref(),
            Side::B => self.b.as_ref(),
        };
        specific.or(self.shared.as_ref())
    }

    /// Both sides have their own entry
    pub fn is_two_sided(&self) -> bool {
        self.a.is_some() && self.b.is_some()
    }

    /// Side-specific entry only, without the shared fallback
    pub fn side(&self, side: Side) -> Option<&T> {
        match side {
            Side::A => self.a.as_ref(),
            Side::B => self.b.as_ref(),
        }
    }

    fn map<U>(self, mut f: impl FnMut(T) -> U) -> SideBinding<U> {
        SideBinding {
            a: self.a.map(&mut f),
            b: self.b.map(&mut f),
            shared: self.shared.map(&mut f),
        }
    }
}

impl<T> Default for SideBinding<T> {
    fn default() -> Self {
        Self {
            a: None,
            b: None,
            shared: None,
        }
    }
}

impl<T> From<SideLayout<T>> for SideBinding<T> {
    fn from(layout: SideLayout<T>) -> Self {
        Self {
            a: layout.a,
            b: layout.b,
            shared: layout.shared,
        }
    }
}

/// An audio track known to the deck
#[derive(Debug, Clone)]
pub struct Track {
    pub id: TrackId,
    pub element: ElementRef,
    /// Cassette that binds this track, if any
    pub cassette: Option<CassetteId>,
}

/// A two-sided playback unit
#[derive(Debug, Clone)]
pub struct Cassette {
    pub id: CassetteId,
    pub active_side: Side,
    pub audio: SideBinding<TrackId>,
    pub video: SideBinding<ElementRef>,
    /// Card has a status element
    pub has_status: bool,
    /// Widget controls, when a player widget is bound
    pub widget: Option<ControlSet>,
}

/// Id-indexed cassettes and tracks
#[derive(Debug, Default)]
pub struct Registry {
    cassettes: BTreeMap<CassetteId, Cassette>,
    tracks: BTreeMap<TrackId, Track>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry from a deck layout
    ///
    /// Sources pass through `rewriter` before elements are created.
    pub fn from_config(
        config: &DeckConfig,
        factory: &dyn MediaFactory,
        rewriter: &AssetRewriter,
    ) -> Result<Self> {
        let mut registry = Registry::new();

        for layout in &config.tracks {
            let element = factory.create(&MediaSource {
                src: rewriter.rewrite(&layout.src),
                duration_secs: layout.duration_secs,
                looping: false,
            });
            registry.add_track(layout.id.clone(), element)?;
        }

        for layout in &config.cassettes {
            let cassette = build_cassette(layout, factory, rewriter);
            registry.add_cassette(cassette)?;
        }

        debug!(
            "Registry built: {} cassettes, {} tracks",
            registry.cassettes.len(),
            registry.tracks.len()
        );
        Ok(registry)
    }

    pub fn add_track(&mut self, id: TrackId, element: ElementRef) -> Result<()> {
        if self.tracks.contains_key(&id) {
            return Err(Error::Layout(format!("duplicate track id '{}'", id)));
        }
        self.tracks.insert(
            id.clone(),
            Track {
                id,
                element,
                cassette: None,
            },
        );
        Ok(())
    }

    /// Register a cassette; every track it names must already exist and be unclaimed
    pub fn add_cassette(&mut self, cassette: Cassette) -> Result<()> {
        if self.cassettes.contains_key(&cassette.id) {
            return Err(Error::Layout(format!(
                "duplicate cassette id '{}'",
                cassette.id
            )));
        }

        let bound: BTreeSet<&TrackId> = [&cassette.audio.a, &cassette.audio.b, &cassette.audio.shared]
            .into_iter()
            .flatten()
            .collect();
        for track_id in &bound {
            let track = self.tracks.get(*track_id).ok_or_else(|| {
                Error::Layout(format!(
                    "cassette '{}' references unknown track '{}'",
                    cassette.id, track_id
                ))
            })?;
            if let Some(owner) = &track.cassette {
                return Err(Error::Layout(format!(
                    "track '{}' is bound to both '{}' and '{}'",
                    track_id, owner, cassette.id
                )));
            }
        }
        for track_id in bound {
            if let Some(track) = self.tracks.get_mut(track_id) {
                track.cassette = Some(cassette.id.clone());
            }
        }

        self.cassettes.insert(cassette.id.clone(), cassette);
        Ok(())
    }

    pub fn cassette(&self, id: &CassetteId) -> Option<&Cassette> {
        self.cassettes.get(id)
    }

    pub fn track(&self, id: &TrackId) -> Option<&Track> {
        self.tracks.get(id)
    }

    pub fn cassettes(&self) -> impl Iterator<Item = &Cassette> {
        self.cassettes.values()
    }

    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    /// The only mutation after construction
    pub(crate) fn set_active_side(&mut self, id: &CassetteId, side: Side) {
        if let Some(cassette) = self.cassettes.get_mut(id) {
            cassette.active_side = side;
        }
    }
}

fn build_cassette(
    layout: &CassetteLayout,
    factory: &dyn MediaFactory,
    rewriter: &AssetRewriter,
) -> Cassette {
    let video = SideBinding::from(layout.video.clone()).map(|video| {
        factory.create(&MediaSource {
            src: rewriter.rewrite(&video.src),
            duration_secs: video.duration_secs,
            looping: true,
        })
    });

    Cassette {
        id: layout.id.clone(),
        active_side: layout.side,
        audio: layout.audio.clone().into(),
        video,
        has_status: layout.status_text,
        widget: layout
            .widget
            .as_ref()
            .map(|w| w.controls.iter().copied().collect()),
    }
}
