//! whereabouts CLI entry point
//!
//! Location enrichment, verification, and proximity search for
//! marketplace services.

use whereabouts::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
