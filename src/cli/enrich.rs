//! Enrich command handler

use crate::cli::build_client;
use crate::cli::reverse::print_address;
use crate::config::Config;
use crate::enrich::{EnrichmentRequest, LocationEnricher};
use crate::error::Result;
use crate::geo::Coordinates;
use clap::Args;

/// Enrich command arguments
#[derive(Args)]
pub struct EnrichArgs {
    /// Digital address / postal code, e.g. "GA-183-8164"
    #[arg(long = "code")]
    pub postal_code: String,

    /// Claimed latitude
    #[arg(long, requires = "lon")]
    pub lat: Option<f64>,

    /// Claimed longitude
    #[arg(long, requires = "lat")]
    pub lon: Option<f64>,

    /// Nearby landmark hint, e.g. "Danquah Circle"
    #[arg(long)]
    pub landmark: Option<String>,

    /// Give up after this many milliseconds per provider call
    #[arg(long)]
    pub deadline_ms: Option<u64>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the enrich command
pub async fn run(args: EnrichArgs) -> Result<()> {
    let config = Config::load()?;
    let client = build_client(&config, args.deadline_ms)?;
    let enricher = LocationEnricher::new(
        client,
        config.geocoder.country_code.clone(),
        config.geocoder.country.clone(),
    );

    let coordinates = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
        _ => None,
    };
    let request = EnrichmentRequest {
        postal_code: args.postal_code,
        coordinates,
        landmark: args.landmark,
    };

    let result = enricher.enrich(&request).await;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if let Some(address) = &result.address {
        print_address(address);
    }
    Ok(())
}
