//! Side flip tests

mod helpers;

use std::time::Duration;

use helpers::*;
use tapedeck_common::events::{
    DeckEvent, ScrubDirection, Side, StatusText, ToggleLabel, TrackState,
};
use tapedeck_player::media::MediaElement;
use tapedeck_player::Command;

#[tokio::test(start_paused = true)]
async fn test_flip_while_playing_keeps_position() {
    let mut t = TestDeck::new();
    t.toggle("audio01").await;
    tokio::time::sleep(Duration::from_secs(30)).await;

    t.send(Command::Flip(cassette("tape1"))).await;

    let incoming = t.audio("audio02");
    assert_eq!(t.audible(), vec!["audio02"]);
    assert!(approx(incoming.current_time(), 30.0));
    assert!(approx(t.audio("audio01").current_time(), 30.0));
    assert_eq!(t.deck.track_state(&track("audio02")), TrackState::Playing);
    assert_eq!(t.deck.active_track(&cassette("tape1")), Some(track("audio02")));

    let card = t.deck.card(&cassette("tape1")).unwrap();
    assert_eq!(card.side, Side::B);
    assert_eq!(card.visible_video, Some(Side::B));
    assert!(card.playing);
    assert!(card.active);

    assert!(t.video("tape1_a").is_paused());
    assert!(!t.video("tape1_b").is_paused());
}

#[tokio::test(start_paused = true)]
async fn test_flip_clamps_into_shorter_track() {
    let mut t = TestDeck::new();
    t.toggle("audio03").await;
    tokio::time::sleep(Duration::from_secs(100)).await;

    t.send(Command::Flip(cassette("tape2"))).await;

    let incoming = t.audio("audio04");
    assert!(!incoming.is_paused());
    assert!(incoming.current_time() <= 25.0);
    assert_eq!(t.audible(), vec!["audio04"]);
}

#[tokio::test(start_paused = true)]
async fn test_flip_while_paused_only_changes_side() {
    let mut t = TestDeck::new();
    t.audio("audio01").set_current_time(42.0);

    t.send(Command::Flip(cassette("tape1"))).await;

    assert!(t.audible().is_empty());
    assert_eq!(t.audio("audio02").play_calls(), 0);
    assert_eq!(t.audio("audio02").current_time(), 0.0);
    assert_eq!(t.audio("audio01").current_time(), 42.0);

    let card = t.deck.card(&cassette("tape1")).unwrap();
    assert_eq!(card.side, Side::B);
    assert!(!card.playing);

    // Readouts follow the new side
    let widget = t.deck.widget(&cassette("tape1")).unwrap();
    assert_eq!(widget.duration.as_deref(), Some("1:30"));
    assert_eq!(widget.current_time.as_deref(), Some("0:00"));
}

#[tokio::test(start_paused = true)]
async fn test_flip_back_and_forth() {
    let mut t = TestDeck::new();
    t.toggle("audio01").await;
    tokio::time::sleep(Duration::from_secs(10)).await;
    t.send(Command::Flip(cassette("tape1"))).await;
    tokio::time::sleep(Duration::from_secs(5)).await;
    t.send(Command::Flip(cassette("tape1"))).await;

    assert_eq!(t.audible(), vec!["audio01"]);
    assert!(approx(t.audio("audio01").current_time(), 15.0));
    assert_eq!(t.deck.card(&cassette("tape1")).unwrap().side, Side::A);
}

#[tokio::test(start_paused = true)]
async fn test_flip_without_incoming_track_skips_media() {
    let mut t = TestDeck::new();
    t.toggle("audio06").await;
    let audio = t.audio("audio06");
    let pauses = audio.pause_calls();

    t.send(Command::Flip(cassette("tape4"))).await;

    assert_eq!(t.deck.card(&cassette("tape4")).unwrap().side, Side::B);
    assert_eq!(t.deck.active_track(&cassette("tape4")), None);
    assert_eq!(audio.pause_calls(), pauses);
    assert!(!audio.is_paused());
}

#[tokio::test(start_paused = true)]
async fn test_flip_shared_track_continues() {
    let mut t = TestDeck::new();
    t.toggle("audio05").await;
    tokio::time::sleep(Duration::from_secs(20)).await;

    t.send(Command::Flip(cassette("tape3"))).await;

    assert_eq!(t.audible(), vec!["audio05"]);
    assert!(approx(t.audio("audio05").current_time(), 20.0));
    let card = t.deck.card(&cassette("tape3")).unwrap();
    assert_eq!(card.side, Side::B);
    assert_eq!(card.visible_video, Some(Side::B));
    assert!(!t.video("tape3").is_paused());
}

#[tokio::test(start_paused = true)]
async fn test_flip_ends_hold_on_outgoing_track() {
    let mut t = TestDeck::new();
    t.toggle("audio01").await;
    t.send(Command::BeginFastHold(track("audio01"), ScrubDirection::Forward))
        .await;

    t.send(Command::Flip(cassette("tape1"))).await;

    assert!(t.deck.hold().is_none());
    assert_eq!(t.audio("audio01").playback_rate(), 1.0);
    assert_eq!(t.audio("audio02").playback_rate(), 1.0);
    assert_eq!(t.audible(), vec!["audio02"]);
}

#[tokio::test(start_paused = true)]
async fn test_flip_stops_other_cassette() {
    let mut t = TestDeck::new();
    t.toggle("audio03").await;
    t.toggle("audio01").await;
    t.send(Command::Flip(cassette("tape1"))).await;

    assert_eq!(t.audible(), vec!["audio02"]);
    assert!(!t.deck.card(&cassette("tape2")).unwrap().playing);
    assert_eq!(t.deck.active_cards(), vec![cassette("tape1")]);
}

#[tokio::test(start_paused = true)]
async fn test_flip_events() {
    let mut t = TestDeck::new();
    let mut rx = t.subscribe();
    t.send(Command::Flip(cassette("tape1"))).await;

    let events = drain(&mut rx);
    assert!(events.iter().any(|event| matches!(
        event,
        DeckEvent::SideFlipped { cassette_id, from: Side::A, to: Side::B, .. } if cassette_id == "tape1"
    )));
    assert!(events.iter().any(|event| matches!(
        event,
        DeckEvent::VideoVisibilityChanged { visible: Some(Side::B), .. }
    )));
}

#[tokio::test(start_paused = true)]
async fn test_flip_unknown_cassette_is_noop() {
    let mut t = TestDeck::new();
    let mut rx = t.subscribe();
    t.send(Command::Flip(cassette("nope"))).await;
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_commands_follow_active_side_after_flip() {
    let mut t = TestDeck::new();
    t.send(Command::Flip(cassette("tape1"))).await;

    // Side A's track is now the inactive one
    t.toggle("audio01").await;
    assert!(t.audible().is_empty());

    t.toggle("audio02").await;
    assert_eq!(t.audible(), vec!["audio02"]);
}

#[tokio::test(start_paused = true)]
async fn test_track_left_playing_on_empty_side_can_be_paused() {
    let mut t = TestDeck::new();
    t.toggle("audio06").await;
    t.send(Command::Flip(cassette("tape4"))).await;
    assert_eq!(t.audible(), vec!["audio06"]);

    t.toggle("audio06").await;
    assert!(t.audible().is_empty());
    let card = t.deck.card(&cassette("tape4")).unwrap();
    assert!(!card.playing);
    assert!(!card.active);

    // Once paused it belongs to the inactive side like any other track
    t.toggle("audio06").await;
    assert!(t.audible().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_track_left_playing_on_empty_side_ends_cleanly() {
    let mut t = TestDeck::new();
    t.toggle("audio06").await;
    t.send(Command::Flip(cassette("tape4"))).await;

    tokio::time::sleep(Duration::from_secs(50)).await;
    t.deck.poll_progress();

    assert_eq!(t.deck.track_state(&track("audio06")), TrackState::Paused);
    let card = t.deck.card(&cassette("tape4")).unwrap();
    assert!(!card.playing);
    assert!(!card.active);
    assert!(t.deck.active_cards().is_empty());

    let widget = t.deck.widget(&cassette("tape4")).unwrap();
    assert_eq!(widget.toggle_label, Some(ToggleLabel::Play));
    assert_eq!(widget.status, Some(StatusText::Paused));
}
