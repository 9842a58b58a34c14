//! Tapedeck player (tapedeck) - Main entry point
//!
//! Builds a deck from the config file over simulated media, replays a gesture script
//! against it and prints every deck event as one JSON line on stdout. Logs go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tapedeck_common::config::{init_tracing, resolve_config_path, CONFIG_ENV_VAR};
use tapedeck_player::config::DeckConfig;
use tapedeck_player::media::SimulatedFactory;
use tapedeck_player::script::{parse_script, ScriptStep};
use tapedeck_player::{Deck, DeckService};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

/// Command-line arguments for tapedeck
#[derive(Parser, Debug)]
#[command(name = "tapedeck")]
#[command(about = "Cassette deck playback state machine")]
#[command(version)]
struct Args {
    /// Deck config file (TOML)
    #[arg(short, long, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Gesture script to replay; reads stdin when omitted
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Log level or filter directive (overrides the config file)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = resolve_config_path(args.config.as_deref(), CONFIG_ENV_VAR);
    let config = match &config_path {
        Some(path) => DeckConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DeckConfig::default(),
    };

    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_tracing(Some(level), "tapedeck_player=info");

    match &config_path {
        Some(path) => info!("Config: {}", path.display()),
        None => info!("No config file found, using an empty deck"),
    }

    let script_text = match &args.script {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?,
        None => std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")?,
    };
    let steps = parse_script(&script_text).context("Invalid script")?;

    let deck = Deck::from_config(&config, &SimulatedFactory).context("Failed to build deck")?;
    info!(
        "Deck ready: {} cassettes, {} tracks",
        deck.registry().cassettes().count(),
        deck.registry().tracks().count()
    );

    let (handle, service) = DeckService::spawn(deck);

    let mut events = handle.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(line) => println!("{}", line),
                    Err(e) => warn!("Failed to serialize event: {}", e),
                },
                Err(RecvError::Lagged(skipped)) => warn!("Event printer lagged by {}", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    });

    for step in steps {
        match step {
            ScriptStep::Command(command) => handle.send(command).await?,
            ScriptStep::Wait(duration) => tokio::time::sleep(duration).await,
        }
    }

    drop(handle);
    let deck = service.await.context("Deck service panicked")?;
    info!("Playing at exit: {:?}", deck.playing_tracks());

    // Dropping the deck closes the event bus and ends the printer
    drop(deck);
    printer.await.context("Event printer panicked")?;
    Ok(())
}
