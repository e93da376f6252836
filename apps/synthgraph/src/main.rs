//! # synthgraph
//!
//! Cheapest synthesis paths through a recipe graph whose edges are gated by
//! conditions over a held inventory.
//!
//! ## Usage
//!
//! ```bash
//! # Interactive command loop over synthgraph.state
//! synthgraph
//!
//! # One-shot operations
//! synthgraph add-node Ore
//! synthgraph add-edge Ore Ingot 3 --condition furnace
//! synthgraph synthesize Ore Ingot
//!
//! # HTTP server
//! synthgraph serve --host 0.0.0.0 --port 8080
//! ```

use clap::Parser;
use synthgraph::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // SYNTHGRAPH_LOG_FORMAT=json enables machine-parseable output.
    let log_format =
        std::env::var("SYNTHGRAPH_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "synthgraph=info,tower_http=debug".into());

    // Logs go to stderr so command output on stdout stays clean.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_banner() {
    println!("synthgraph v{}", env!("CARGO_PKG_VERSION"));
    println!();
}
