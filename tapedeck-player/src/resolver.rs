//! Side resolution
//!
//! Answers "which audio track and which video loop are current for this cassette?" and
//! keeps the inactive side's video hidden and paused. Absent bindings resolve to `None`;
//! callers treat that as a no-op, never as an error.

use crate::media::{ElementRef, MediaPair};
use crate::registry::{Cassette, Registry, TrackId};
use tapedeck_common::events::Side;

/// Audio track bound to `side`, falling back to the shared binding
pub fn resolve_audio(cassette: &Cassette, side: Side) -> Option<&TrackId> {
    cassette.audio.resolve(side)
}

/// Video loop bound to `side`, falling back to the shared binding
pub fn resolve_video(cassette: &Cassette, side: Side) -> Option<&ElementRef> {
    cassette.video.resolve(side)
}

/// Audio + video for `side`, if the side has a known track
pub fn resolve_pair(registry: &Registry, cassette: &Cassette, side: Side) -> Option<MediaPair> {
    let track_id = resolve_audio(cassette, side)?;
    let track = registry.track(track_id)?;
    Some(MediaPair {
        side,
        track_id: track_id.clone(),
        audio: track.element.clone(),
        video: resolve_video(cassette, side).cloned(),
    })
}

/// Pair for the cassette's active side
pub fn active_pair(registry: &Registry, cassette: &Cassette) -> Option<MediaPair> {
    resolve_pair(registry, cassette, cassette.active_side)
}

/// Cassette whose *active* side resolves to `track_id`
///
/// A track sitting on a cassette's inactive side has no owner for UI purposes.
pub fn owning_cassette<'a>(registry: &'a Registry, track_id: &TrackId) -> Option<&'a Cassette> {
    let cassette_id = registry.track(track_id)?.cassette.as_ref()?;
    let cassette = registry.cassette(cassette_id)?;
    (resolve_audio(cassette, cassette.active_side) == Some(track_id)).then_some(cassette)
}

/// Side of `cassette` that resolves to `track_id`, preferring the active side
pub fn bound_side(cassette: &Cassette, track_id: &TrackId) -> Option<Side> {
    [cassette.active_side, cassette.active_side.flipped()]
        .into_iter()
        .find(|side| resolve_audio(cassette, *side) == Some(track_id))
}

/// Show the video for `side` and hide the other one
///
/// Only a cassette with a video on each side has anything to hide; the hidden video is
/// paused as part of hiding it. Returns the side whose video is now visible.
pub fn set_video_visibility(cassette: &Cassette, side: Side) -> Option<Side> {
    if cassette.video.is_two_sided() {
        if let Some(hidden) = cassette.video.side(side.flipped()) {
            hidden.pause();
        }
        return Some(side);
    }
    resolve_video(cassette, side).map(|_| side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{MediaElement, SimulatedElement};
    use crate::registry::{CassetteId, SideBinding};
    use std::sync::Arc;

    fn two_sided() -> (Registry, Arc<SimulatedElement>, Arc<SimulatedElement>) {
        let mut registry = Registry::new();
        registry
            .add_track("audio01".into(), Arc::new(SimulatedElement::new("a.mp3", 60.0)))
            .unwrap();
        registry
            .add_track("audio02".into(), Arc::new(SimulatedElement::new("b.mp3", 90.0)))
            .unwrap();
        let video_a = Arc::new(SimulatedElement::new("a.mp4", 8.0).looping());
        let video_b = Arc::new(SimulatedElement::new("b.mp4", 8.0).looping());
        registry
            .add_cassette(Cassette {
                id: "tape1".into(),
                active_side: Side::A,
                audio: SideBinding {
                    a: Some("audio01".into()),
                    b: Some("audio02".into()),
                    shared: None,
                },
                video: SideBinding {
                    a: Some(video_a.clone() as ElementRef),
                    b: Some(video_b.clone() as ElementRef),
                    shared: None,
                },
                has_status: true,
                widget: None,
            })
            .unwrap();
        (registry, video_a, video_b)
    }

    #[test]
    fn test_resolve_pair_per_side() {
        let (registry, _, _) = two_sided();
        let cassette = registry.cassette(&CassetteId::from("tape1")).unwrap();
        let a = resolve_pair(&registry, cassette, Side::A).unwrap();
        let b = resolve_pair(&registry, cassette, Side::B).unwrap();
        assert_eq!(a.track_id.as_str(), "audio01");
        assert_eq!(b.track_id.as_str(), "audio02");
        assert_eq!(b.video.unwrap().source(), "b.mp4");
    }

    #[test]
    fn test_owning_cassette_only_for_active_side() {
        let (registry, _, _) = two_sided();
        assert!(owning_cassette(&registry, &TrackId::from("audio01")).is_some());
        assert!(owning_cassette(&registry, &TrackId::from("audio02")).is_none());
        assert!(owning_cassette(&registry, &TrackId::from("missing")).is_none());

        let cassette = registry.cassette(&CassetteId::from("tape1")).unwrap();
        assert_eq!(bound_side(cassette, &TrackId::from("audio02")), Some(Side::B));
        assert_eq!(bound_side(cassette, &TrackId::from("missing")), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_visibility_pauses_hidden_video() {
        let (registry, video_a, video_b) = two_sided();
        let cassette = registry.cassette(&CassetteId::from("tape1")).unwrap();
        video_a.play().await.unwrap();
        video_b.play().await.unwrap();

        assert_eq!(set_video_visibility(cassette, Side::B), Some(Side::B));
        assert!(video_a.is_paused());
        assert!(!video_b.is_paused());
    }

    #[test]
    fn test_single_video_never_hidden() {
        let cassette = Cassette {
            id: "solo".into(),
            active_side: Side::A,
            audio: SideBinding::default(),
            video: SideBinding {
                a: None,
                b: None,
                shared: Some(Arc::new(SimulatedElement::new("s.mp4", 5.0)) as ElementRef),
            },
            has_status: false,
            widget: None,
        };
        assert_eq!(set_video_visibility(&cassette, Side::B), Some(Side::B));
        assert_eq!(resolve_audio(&cassette, Side::A), None);

        let bare = Cassette {
            video: SideBinding::default(),
            ..cassette
        };
        assert_eq!(set_video_visibility(&bare, Side::A), None);
    }
}
