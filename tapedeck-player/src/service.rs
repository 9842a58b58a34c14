//! Deck service loop
//!
//! Owns the [`Deck`] on a dedicated task. Commands arrive over an mpsc channel and are
//! applied one at a time; rewind ticks and a progress interval are folded into the same
//! loop so nothing touches the deck concurrently.

use crate::deck::{Command, Deck};
use crate::error::{Error, Result};
use crate::registry::TrackId;
use std::sync::Arc;
use std::time::Duration;
use tapedeck_common::events::{DeckEvent, EventBus};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Buffered commands before `send` waits
const COMMAND_CAPACITY: usize = 64;

/// Cloneable sender side of a running [`DeckService`]
#[derive(Debug, Clone)]
pub struct DeckHandle {
    commands: mpsc::Sender<Command>,
    events: Arc<EventBus>,
}

impl DeckHandle {
    /// Queue a command; fails once the service has stopped
    pub async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| Error::ChannelClosed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DeckEvent> {
        self.events.subscribe()
    }
}

/// Command loop around a deck
pub struct DeckService {
    deck: Deck,
    commands: mpsc::Receiver<Command>,
    ticks: mpsc::UnboundedReceiver<TrackId>,
    progress_interval: Duration,
}

impl DeckService {
    pub fn new(mut deck: Deck) -> (Self, DeckHandle) {
        let (tx, rx) = mpsc::channel(COMMAND_CAPACITY);
        let ticks = deck.take_scrub_ticks().unwrap_or_else(|| {
            // Already taken: an empty, closed channel keeps the loop uniform
            let (_, rx) = mpsc::unbounded_channel();
            rx
        });
        let handle = DeckHandle {
            commands: tx,
            events: deck.events(),
        };
        let service = Self {
            progress_interval: deck.transport().progress_interval(),
            deck,
            commands: rx,
            ticks,
        };
        (service, handle)
    }

    /// Run the loop on a new task; the task yields the deck back when all handles drop
    pub fn spawn(deck: Deck) -> (DeckHandle, JoinHandle<Deck>) {
        let (service, handle) = Self::new(deck);
        (handle, tokio::spawn(service.run()))
    }

    pub async fn run(mut self) -> Deck {
        let mut progress = tokio::time::interval(self.progress_interval);
        progress.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("Deck service started");

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.deck.dispatch(command).await,
                    None => {
                        debug!("All deck handles dropped");
                        break;
                    }
                },
                Some(track_id) = self.ticks.recv() => self.deck.on_scrub_tick(&track_id),
                _ = progress.tick() => self.deck.poll_progress(),
            }
        }

        self.deck.shutdown().await;
        info!("Deck service stopped");
        self.deck
    }
}
