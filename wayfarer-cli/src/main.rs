// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Wayfarer CLI - resilient travel data acquisition from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Assemble the full trip context
//! wayfarer plan "San Francisco" "Lisbon"
//!
//! # Pin the departure date and transport mode
//! wayfarer plan Berlin Prague --date 2026-09-14 --mode train
//!
//! # Filter restaurants
//! wayfarer plan Tokyo Osaka --cuisine ramen --min-rating 4.2
//!
//! # JSON output for scripting
//! wayfarer plan Oslo Bergen --format json --pretty
//!
//! # List known emission factors
//! wayfarer factors
//! ```

mod output;

use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use wayfarer_core::{FactorTable, PoiFilters, TransportMode};
use wayfarer_providers::{build_context, Aggregator, TripRequest, DEFAULT_RESULT_LIMIT};

use output::TextFormatter;

// ============================================================================
// CLI Definition
// ============================================================================

/// Wayfarer CLI - trip data acquisition.
#[derive(Parser)]
#[command(name = "wayfarer")]
#[command(about = "Resilient travel data acquisition CLI")]
#[command(long_about = r#"
Wayfarer gathers everything needed to plan a trip between two places:
geocoding, weather, air quality, hotel and flight offers, restaurants,
and a transport emissions estimate. Provider failures degrade fields
individually instead of sinking the whole request.

Credentials (all optional):
  AMADEUS_API_KEY / AMADEUS_API_SECRET   realtime hotel and flight offers
  GOOGLE_PLACES_API_KEY                  restaurant candidates

Examples:
  wayfarer plan "San Francisco" "Lisbon"
  wayfarer plan Berlin Prague --mode train
  wayfarer plan Oslo Bergen --format json
  wayfarer factors
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Assemble the trip context for an origin/destination pair.
    #[command(visible_alias = "p")]
    Plan(PlanArgs),

    /// List the emission factors behind the estimator.
    Factors,
}

/// Arguments for the plan command.
#[derive(clap::Args)]
pub struct PlanArgs {
    /// Free-text origin, e.g. "San Francisco".
    pub origin: String,

    /// Free-text destination, e.g. "Lisbon".
    pub destination: String,

    /// Departure date (YYYY-MM-DD). Defaults to the configured check-in.
    #[arg(long)]
    pub date: Option<chrono::NaiveDate>,

    /// Transport mode (car_gas, car_electric, train, bus, plane).
    /// Defaults to a distance heuristic.
    #[arg(long)]
    pub mode: Option<String>,

    /// Restaurant cuisine filter.
    #[arg(long)]
    pub cuisine: Option<String>,

    /// Minimum restaurant rating.
    #[arg(long)]
    pub min_rating: Option<f64>,

    /// Exact restaurant price level (1-4).
    #[arg(long)]
    pub price_level: Option<u8>,

    /// Maximum entries per list (hotels, flights, restaurants).
    #[arg(long, default_value_t = DEFAULT_RESULT_LIMIT)]
    pub limit: usize,

    /// Overall deadline in seconds.
    #[arg(long, default_value = "30")]
    pub timeout: u64,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// An endpoint could not be geocoded.
    GeocodingFailed = 2,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("wayfarer=debug,info")
    } else {
        EnvFilter::new("wayfarer=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Plan(args) => run_plan(args, &cli).await,
        Commands::Factors => run_factors(&cli),
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        let code = match e.downcast_ref::<wayfarer_providers::AggregateError>() {
            Some(wayfarer_providers::AggregateError::Geocoding { .. }) => {
                ExitCode::GeocodingFailed
            }
            _ => ExitCode::Error,
        };
        std::process::exit(code as i32);
    }

    Ok(())
}

/// Runs the plan command.
async fn run_plan(args: &PlanArgs, cli: &Cli) -> Result<()> {
    let mode = args
        .mode
        .as_deref()
        .map(TransportMode::from_str)
        .transpose()?;

    let request = TripRequest {
        origin: args.origin.clone(),
        destination: args.destination.clone(),
        departure_date: args.date,
        mode,
        poi_filters: PoiFilters {
            cuisine: args.cuisine.clone(),
            min_rating: args.min_rating,
            price_level: args.price_level,
        },
        limit: args.limit,
        deadline: Duration::from_secs(args.timeout),
    };

    let credentials = wayfarer_fetch::CredentialStore::from_env();
    info!(?credentials, "Assembling trip context");

    let ctx = build_context(credentials);
    let aggregator = Aggregator::standard();
    let context = aggregator.assemble(&ctx, &request).await?;

    match cli.format {
        OutputFormat::Json => {
            let rendered = if cli.pretty {
                serde_json::to_string_pretty(&context)?
            } else {
                serde_json::to_string(&context)?
            };
            println!("{rendered}");
        }
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_context(&context));
        }
    }

    Ok(())
}

/// Runs the factors command.
fn run_factors(cli: &Cli) -> Result<()> {
    let rows = FactorTable::global().rows();

    if cli.format == OutputFormat::Json {
        let rendered = if cli.pretty {
            serde_json::to_string_pretty(&rows)?
        } else {
            serde_json::to_string(&rows)?
        };
        println!("{rendered}");
    } else {
        println!("{:<14} {:>14}", "mode", "kg CO2 per km");
        for row in rows {
            println!("{:<14} {:>14.3}", row.mode.as_str(), row.kg_co2_per_km);
        }
    }

    Ok(())
}
