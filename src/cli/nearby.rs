//! Nearby search command handler

use crate::cli::build_client;
use crate::config::Config;
use crate::error::Result;
use crate::geo::{distance_km, format_distance, Coordinates};
use clap::Args;

/// Nearby command arguments
#[derive(Args)]
pub struct NearbyArgs {
    /// What to search for, e.g. "pharmacy"
    pub query: String,

    /// Center latitude
    #[arg(long)]
    pub lat: f64,

    /// Center longitude
    #[arg(long)]
    pub lon: f64,

    /// Search radius in kilometers
    #[arg(long, default_value_t = 5.0)]
    pub radius_km: f64,

    /// Give up after this many milliseconds
    #[arg(long)]
    pub deadline_ms: Option<u64>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the nearby command
pub async fn run(args: NearbyArgs) -> Result<()> {
    let config = Config::load()?;
    let client = build_client(&config, args.deadline_ms)?;

    let center = Coordinates::new(args.lat, args.lon);
    center.validate()?;

    let results = client.search_nearby(center, &args.query, args.radius_km).await;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No places found for \"{}\" within {}km", args.query, args.radius_km);
        return Ok(());
    }

    for result in &results {
        let label = result.display_label.as_deref().unwrap_or("(no label)");
        match result.coordinates {
            Some(coords) => {
                let d = distance_km(center, coords);
                println!("{} [{}]", label, format_distance(d));
            }
            None => println!("{}", label),
        }
    }
    Ok(())
}
