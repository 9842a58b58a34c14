//! In-process media element
//!
//! Position advances with the tokio clock while playing, so tests running on a paused
//! runtime see exact, deterministic positions. Behaves like a browser media element where
//! it matters to the deck: playing a finished track restarts it, reaching the end pauses
//! and raises `ended`, looping elements wrap around.

use super::{ElementRef, MediaElement, MediaError, MediaFactory, MediaSource};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::time::{Duration, Instant};

#[derive(Debug)]
struct Inner {
    position: f64,
    duration: f64,
    rate: f64,
    paused: bool,
    ended: bool,
    looping: bool,
    /// Clock reading the position was last brought up to date at (playing only)
    anchor: Option<Instant>,
    reject_with: Option<String>,
    start_latency: Duration,
    play_calls: u32,
    pause_calls: u32,
}

impl Inner {
    /// Advance the position to `now`
    fn settle(&mut self, now: Instant) {
        let Some(anchor) = self.anchor else {
            return;
        };
        if self.paused {
            self.anchor = None;
            return;
        }
        let elapsed = now.saturating_duration_since(anchor).as_secs_f64();
        self.anchor = Some(now);
        self.position += elapsed * self.rate;

        if self.duration.is_finite() && self.duration > 0.0 && self.position >= self.duration {
            if self.looping {
                self.position %= self.duration;
            } else {
                self.position = self.duration;
                self.paused = true;
                self.ended = true;
                self.anchor = None;
            }
        }
    }
}

/// Simulated audio/video element
#[derive(Debug)]
pub struct SimulatedElement {
    source: String,
    inner: Mutex<Inner>,
}

impl SimulatedElement {
    /// Create a paused element at position zero
    ///
    /// Pass `f64::NAN` as duration for a source whose metadata has not loaded.
    pub fn new(source: impl Into<String>, duration: f64) -> Self {
        Self {
            source: source.into(),
            inner: Mutex::new(Inner {
                position: 0.0,
                duration,
                rate: 1.0,
                paused: true,
                ended: false,
                looping: false,
                anchor: None,
                reject_with: None,
                start_latency: Duration::ZERO,
                play_calls: 0,
                pause_calls: 0,
            }),
        }
    }

    /// Wrap around at the end instead of stopping
    pub fn looping(self) -> Self {
        self.inner.lock().looping = true;
        self
    }

    /// Reject every subsequent `play()` with the given reason (`None` allows again)
    pub fn reject_starts(&self, reason: Option<&str>) {
        self.inner.lock().reject_with = reason.map(str::to_string);
    }

    /// Delay before `play()` settles
    pub fn set_start_latency(&self, latency: Duration) {
        self.inner.lock().start_latency = latency;
    }

    /// Simulate metadata arriving (or changing)
    pub fn set_duration(&self, duration: f64) {
        let mut inner = self.inner.lock();
        inner.settle(Instant::now());
        inner.duration = duration;
    }

    /// Number of `play()` calls so far
    pub fn play_calls(&self) -> u32 {
        self.inner.lock().play_calls
    }

    /// Number of `pause()` calls so far
    pub fn pause_calls(&self) -> u32 {
        self.inner.lock().pause_calls
    }
}

#[async_trait]
impl MediaElement for SimulatedElement {
    fn source(&self) -> &str {
        &self.source
    }

    async fn play(&self) -> Result<(), MediaError> {
        let latency = {
            let mut inner = self.inner.lock();
            inner.play_calls += 1;
            inner.start_latency
        };
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let mut inner = self.inner.lock();
        if let Some(reason) = &inner.reject_with {
            return Err(MediaError::Rejected(reason.clone()));
        }
        let now = Instant::now();
        inner.settle(now);
        if inner.ended || (inner.duration.is_finite() && inner.position >= inner.duration) {
            inner.position = 0.0;
        }
        inner.ended = false;
        inner.paused = false;
        inner.anchor = Some(now);
        Ok(())
    }

    fn pause(&self) {
        let mut inner = self.inner.lock();
        inner.pause_calls += 1;
        inner.settle(Instant::now());
        inner.paused = true;
        inner.anchor = None;
    }

    fn is_paused(&self) -> bool {
        let mut inner = self.inner.lock();
        inner.settle(Instant::now());
        inner.paused
    }

    fn has_ended(&self) -> bool {
        let mut inner = self.inner.lock();
        inner.settle(Instant::now());
        inner.ended
    }

    fn current_time(&self) -> f64 {
        let mut inner = self.inner.lock();
        inner.settle(Instant::now());
        inner.position
    }

    fn set_current_time(&self, seconds: f64) {
        if !seconds.is_finite() {
            return;
        }
        let mut inner = self.inner.lock();
        let now = Instant::now();
        inner.settle(now);
        let mut target = seconds.max(0.0);
        if inner.duration.is_finite() {
            target = target.min(inner.duration);
        }
        inner.position = target;
        inner.ended = false;
        if !inner.paused {
            inner.anchor = Some(now);
        }
    }

    fn duration(&self) -> f64 {
        self.inner.lock().duration
    }

    fn playback_rate(&self) -> f64 {
        self.inner.lock().rate
    }

    fn set_playback_rate(&self, rate: f64) {
        if !rate.is_finite() || rate < 0.0 {
            return;
        }
        let mut inner = self.inner.lock();
        inner.settle(Instant::now());
        inner.rate = rate;
    }
}

/// Builds [`SimulatedElement`]s from layout sources
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedFactory;

impl MediaFactory for SimulatedFactory {
    fn create(&self, source: &MediaSource) -> ElementRef {
        let element = SimulatedElement::new(
            source.src.clone(),
            source.duration_secs.unwrap_or(f64::NAN),
        );
        let element = if source.looping {
            element.looping()
        } else {
            element
        };
        Arc::new(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_position_advances_while_playing() {
        let el = SimulatedElement::new("a.mp3", 100.0);
        el.play().await.unwrap();
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(el.current_time(), 3.0);

        el.pause();
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(el.current_time(), 3.0);
        assert!(el.is_paused());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_scales_progress() {
        let el = SimulatedElement::new("a.mp3", 100.0);
        el.play().await.unwrap();
        el.set_playback_rate(5.0);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(el.current_time(), 10.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaching_end_pauses_and_replay_restarts() {
        let el = SimulatedElement::new("a.mp3", 4.0);
        el.play().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(el.has_ended());
        assert!(el.is_paused());
        assert_eq!(el.current_time(), 4.0);

        el.play().await.unwrap();
        assert!(!el.has_ended());
        assert_eq!(el.current_time(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_looping_wraps() {
        let el = SimulatedElement::new("loop.mp4", 4.0).looping();
        el.play().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(el.current_time(), 1.0);
        assert!(!el.is_paused());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_start_stays_paused() {
        let el = SimulatedElement::new("a.mp3", 10.0);
        el.reject_starts(Some("autoplay denied"));
        let err = el.play().await.unwrap_err();
        assert_eq!(err, MediaError::Rejected("autoplay denied".to_string()));
        assert!(el.is_paused());
        assert_eq!(el.play_calls(), 1);

        el.reject_starts(None);
        assert!(el.play().await.is_ok());
    }

    #[test]
    fn test_seek_clamps_to_known_duration() {
        let el = SimulatedElement::new("a.mp3", 10.0);
        el.set_current_time(25.0);
        assert_eq!(el.current_time(), 10.0);
        el.set_current_time(-4.0);
        assert_eq!(el.current_time(), 0.0);
        el.set_current_time(f64::NAN);
        assert_eq!(el.current_time(), 0.0);
    }
}
