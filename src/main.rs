//! SpyX Missions - Unified CLI
//!
//! Runs the terminal game and a few maintenance commands over the stored
//! records.

#![warn(missing_docs)]

mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use spyx_missions::{
    App, AppConfig, AppContext, Backdrops, KeyValueStore, MemoryStore, RosterManager,
    SqliteStore, StoreKey, World, records, run_tui,
};
use strum::IntoEnumIterator;
use tracing::{info, instrument, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,spyx_missions=debug";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let command = cli.command.clone().unwrap_or(Command::Play);

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    let config = match &cli.db_path {
        Some(db_path) => config.with_db_path(db_path.clone()),
        None => config,
    };

    if command == Command::Play {
        initialize_file_tracing(&config)?;
    } else {
        initialize_stderr_tracing();
    }

    let store = open_store(&config, cli.ephemeral)?;
    match command {
        Command::Play => run_play(config, store).await,
        Command::Roster => print_roster(store),
        Command::Universes { name } => print_universes(&config, name.as_deref()).await,
        Command::Reset { players_only } => reset(store.as_ref(), players_only),
    }
}

/// Logs to a file so output never lands on the game screen.
fn initialize_file_tracing(config: &AppConfig) -> Result<()> {
    let log_file = std::fs::File::create(config.log_file())
        .with_context(|| format!("Failed to create log file {}", config.log_file().display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized
    Ok(())
}

fn initialize_stderr_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[instrument(skip(config), fields(db_path = %config.db_path()))]
fn open_store(config: &AppConfig, ephemeral: bool) -> Result<Arc<dyn KeyValueStore>> {
    if ephemeral {
        info!("Using in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    }
    let store = SqliteStore::open(config.db_path().clone())
        .with_context(|| format!("Failed to open database {}", config.db_path()))?;
    Ok(Arc::new(store))
}

/// Run the terminal game
#[instrument(skip_all)]
async fn run_play(config: AppConfig, store: Arc<dyn KeyValueStore>) -> Result<()> {
    let provider = config
        .build_provider()
        .context("Failed to set up reference data provider")?;
    let ctx = AppContext {
        store,
        provider,
        tie_break: *config.rules().tie_break(),
    };
    let backdrops = Backdrops::load(config.asset_dir());
    let app = App::new(ctx, config.timing().fade(), backdrops);
    info!("Starting SpyX Missions");
    run_tui(app).await
}

#[instrument(skip(store))]
fn print_roster(store: Arc<dyn KeyValueStore>) -> Result<()> {
    let roster = RosterManager::load(store);
    if roster.is_empty() {
        println!("No players yet.");
        return Ok(());
    }
    for player in roster.players() {
        let avatar = player.avatar().as_ref().map_or("-", |a| a.id());
        println!("{:>2}. {} {} (avatar {})", player.order() + 1, player.badge(), player.name(), avatar);
    }
    Ok(())
}

#[instrument(skip(config))]
async fn print_universes(config: &AppConfig, name: Option<&str>) -> Result<()> {
    let provider = config
        .build_provider()
        .context("Failed to set up reference data provider")?;
    if let Some(name) = name {
        let worlds = provider
            .get_worlds_by_universe(name)
            .await
            .with_context(|| format!("Failed to fetch worlds of {}", name))?;
        if worlds.is_empty() {
            println!("No worlds for universe '{}'.", name);
        }
        print_worlds(&worlds);
        return Ok(());
    }
    let response = provider
        .get_universes()
        .await
        .context("Failed to fetch universes")?;
    for universe in response.universes() {
        println!("{}", universe.name());
        print_worlds(universe.worlds());
    }
    Ok(())
}

fn print_worlds(worlds: &[World]) {
    for world in worlds {
        println!(
            "  {:<6} {} [{}] {}",
            world.short_name(),
            world.name(),
            world.genre(),
            world.attribution()
        );
    }
}

#[instrument(skip(store))]
fn reset(store: &dyn KeyValueStore, players_only: bool) -> Result<()> {
    let keys: Vec<StoreKey> = if players_only {
        vec![StoreKey::Players]
    } else {
        StoreKey::iter().collect()
    };
    for key in keys {
        match records::remove(store, key) {
            Ok(()) => println!("Cleared {}", key),
            Err(e) => {
                warn!(error = %e, %key, "Failed to clear record");
                return Err(e).with_context(|| format!("Failed to clear {}", key));
            }
        }
    }
    Ok(())
}
