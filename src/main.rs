//! Command-line interface for booking-events
//!
//! # Usage Examples
//!
//! ## Publish events
//! ```bash
//! # Credentials and endpoint from .env or the environment
//! # (BOOTSTRAP_SERVERS, SASL_PLAIN_USERNAME, SASL_PLAIN_PASSWORD)
//! booking-events produce --topic bookings_topic --sample 10000 --mps 200 --sleep 1
//!
//! # Local broker without authentication, three batches
//! booking-events produce \
//!   --bootstrap-servers localhost:9092 \
//!   --security-protocol PLAINTEXT \
//!   --sample 1000 --repeat 3 --create-topic-partitions 3
//!
//! # Validate configuration and print a sample event without connecting
//! booking-events produce --dry-run
//! ```
//!
//! ## Product reference data
//! ```bash
//! booking-events products --output demo_products.csv --count 100001
//! ```

mod produce;
mod products;

use booking_catalog::CatalogArgs;
use booking_publisher::ProduceArgs;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "booking-events")]
#[command(about = "Publish synthetic booking events to Kafka at a controlled rate")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate booking events and publish them to a Kafka topic
    Produce {
        #[command(flatten)]
        args: ProduceArgs,

        /// Validate configuration and print one sample event without connecting
        #[arg(long)]
        dry_run: bool,
    },

    /// Write the product reference dataset as CSV
    Products {
        #[command(flatten)]
        args: CatalogArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment may already be set.
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Produce { args, dry_run } => produce::run_produce(args, dry_run).await,
        Commands::Products { args } => products::run_products(args),
    }
}
