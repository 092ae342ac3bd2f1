//! Geocode command handler

use crate::cli::build_client;
use crate::config::Config;
use crate::error::Result;
use crate::geocode::GeocodeResult;
use clap::Args;

/// Geocode command arguments
#[derive(Args)]
pub struct GeocodeArgs {
    /// Free-text query, e.g. "GA-183-8164" or "Accra, Ghana"
    #[arg(required_unless_present = "batch")]
    pub query: Option<String>,

    /// Read queries from a file, one per line
    #[arg(long, conflicts_with = "query")]
    pub batch: Option<String>,

    /// Restrict matches to an ISO country code
    #[arg(long)]
    pub country: Option<String>,

    /// Give up after this many milliseconds per provider call
    #[arg(long)]
    pub deadline_ms: Option<u64>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the geocode command
pub async fn run(args: GeocodeArgs) -> Result<()> {
    let config = Config::load()?;
    let client = build_client(&config, args.deadline_ms)?;

    if let Some(path) = &args.batch {
        let content = std::fs::read_to_string(path)?;
        let queries: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        let results = client.batch_geocode(&queries).await;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&results)?);
            return Ok(());
        }

        // Report in input order, not map order
        let mut seen = std::collections::HashSet::new();
        for query in &queries {
            if !seen.insert(query.as_str()) {
                continue;
            }
            if let Some(result) = results.get(query) {
                print_result(query, result);
            }
        }
        return Ok(());
    }

    let Some(query) = args.query.as_deref() else {
        eprintln!("Error: a query or --batch file is required");
        std::process::exit(1);
    };

    let result = client.search(query, args.country.as_deref()).await;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(query, &result);
    }
    Ok(())
}

fn print_result(query: &str, result: &GeocodeResult) {
    if result.success {
        let label = result.display_label.as_deref().unwrap_or("(no label)");
        println!("{}", query);
        println!("  match: {}", label);
        if let Some(coords) = result.coordinates {
            println!("  coordinates: {}", coords);
        }
        if let Some(confidence) = result.confidence {
            println!("  confidence: {:.2}", confidence);
        }
    } else {
        let reason = result
            .error
            .as_ref()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!("{}", query);
        println!("  no match: {}", reason);
    }
}
