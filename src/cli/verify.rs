//! Verify command handler

use crate::cli::build_client;
use crate::config::Config;
use crate::error::Result;
use crate::geo::Coordinates;
use crate::verify::LocationVerifier;
use clap::Args;

/// Verify command arguments
#[derive(Args)]
pub struct VerifyArgs {
    /// Digital address / postal code the coordinates are claimed for
    #[arg(long = "code")]
    pub postal_code: String,

    /// Claimed latitude
    #[arg(long)]
    pub lat: f64,

    /// Claimed longitude
    #[arg(long)]
    pub lon: f64,

    /// Give up after this many milliseconds
    #[arg(long)]
    pub deadline_ms: Option<u64>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the verify command
pub async fn run(args: VerifyArgs) -> Result<()> {
    let config = Config::load()?;
    let client = build_client(&config, args.deadline_ms)?;
    let verifier = LocationVerifier::new(
        client,
        config.verify.clone(),
        config.geocoder.country_code.clone(),
    );

    let claimed = Coordinates::new(args.lat, args.lon);
    let result = verifier.verify(&args.postal_code, claimed).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if result.verified {
        println!("verified");
    } else {
        println!("not verified");
    }
    println!("confidence: {:.2}", result.confidence);
    if let Some(d) = result.distance_km {
        println!("distance from reference: {:.2} km", d);
    }
    if let Some(label) = &result.reference_label {
        println!("reference: {}", label);
    }
    Ok(())
}
