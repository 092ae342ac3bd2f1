//! Reverse geocode command handler

use crate::cli::build_client;
use crate::config::Config;
use crate::error::Result;
use crate::geo::Coordinates;
use crate::geocode::StructuredAddress;
use clap::Args;

/// Reverse command arguments
#[derive(Args)]
pub struct ReverseArgs {
    /// Latitude in decimal degrees
    #[arg(long)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(long)]
    pub lon: f64,

    /// Give up after this many milliseconds
    #[arg(long)]
    pub deadline_ms: Option<u64>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the reverse command
pub async fn run(args: ReverseArgs) -> Result<()> {
    let config = Config::load()?;
    let client = build_client(&config, args.deadline_ms)?;

    let result = client.reverse(Coordinates::new(args.lat, args.lon)).await;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    match (&result.address, &result.error) {
        (Some(address), _) => print_address(address),
        (None, Some(error)) => {
            eprintln!("Error: {}", error);
            std::process::exit(1);
        }
        (None, None) => println!("No address found"),
    }
    Ok(())
}

/// Print the populated fields of an address, one per line
pub(crate) fn print_address(address: &StructuredAddress) {
    let fields = [
        ("street", address.street_name.as_deref()),
        ("house number", address.house_number.as_deref()),
        ("locality", address.locality.as_deref()),
        ("district", address.district.as_deref()),
        ("city", address.city.as_deref()),
        ("region", address.region.as_deref()),
        ("landmark", address.nearby_landmark.as_deref()),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            println!("{}: {}", name, value);
        }
    }
    if !address.postal_code.is_empty() {
        println!("postal code: {}", address.postal_code);
    }
    if let Some(coords) = address.coordinates {
        println!("coordinates: {}", coords);
    }
    println!(
        "verified: {} (source: {})",
        address.is_verified, address.source_provider
    );
}
