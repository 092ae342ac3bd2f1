//! CLI command handlers
//!
//! Each subcommand has its own module. Commands load configuration, wire
//! up the geocoding client, and print results; all domain logic lives in
//! the library modules.

pub mod config;
pub mod enrich;
pub mod geocode;
pub mod lookup;
pub mod nearby;
pub mod rank;
pub mod reverse;
pub mod verify;

use crate::config::Config;
use crate::error::Result;
use crate::geocode::NominatimClient;
use clap::{Parser, Subcommand};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Location enrichment and proximity search for marketplace services
#[derive(Parser)]
#[command(name = "whereabouts")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Forward-geocode a query, or a file of queries
    Geocode(geocode::GeocodeArgs),

    /// Reverse-geocode coordinates to a structured address
    Reverse(reverse::ReverseArgs),

    /// Look up an OpenStreetMap element by kind and id
    Lookup(lookup::LookupArgs),

    /// Enrich partial location input into a structured address
    Enrich(enrich::EnrichArgs),

    /// Verify claimed coordinates against a postal code
    Verify(verify::VerifyArgs),

    /// Search for places near a point
    Nearby(nearby::NearbyArgs),

    /// Rank candidate entities from a JSON file by distance
    Rank(rank::RankArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub async fn run() -> Result<()> {
    // Quiet by default; RUST_LOG opens the tap
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Geocode(args) => geocode::run(args).await,
        Commands::Reverse(args) => reverse::run(args).await,
        Commands::Lookup(args) => lookup::run(args).await,
        Commands::Enrich(args) => enrich::run(args).await,
        Commands::Verify(args) => verify::run(args).await,
        Commands::Nearby(args) => nearby::run(args).await,
        Commands::Rank(args) => rank::run(args),
        Commands::Config(args) => config::run(args),
    }
}

/// Build the geocoding client from configuration, with an optional
/// per-call deadline
pub(crate) fn build_client(config: &Config, deadline_ms: Option<u64>) -> Result<NominatimClient> {
    let client = NominatimClient::new(&config.geocoder)?;
    Ok(match deadline_ms {
        Some(ms) => client.with_deadline(Duration::from_millis(ms)),
        None => client,
    })
}
