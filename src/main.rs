//! CLI entry point for the councillor rater ETL.
//!
//! Provides subcommands for running the full extract-transform-load cycle
//! against Redis and for computing averages offline from files or URLs.

use anyhow::Result;
use clap::{Parser, Subcommand};
use councillor_rater::{
    datasets::Datasets,
    fetch::{BasicClient, fetch_records},
    output::{TransformSummary, append_records, print_json},
    pipeline::run_pipeline,
    store::RedisStore,
    transform::aggregate,
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "councillor_rater")]
#[command(about = "Aggregates councillor ratings by specialization and loads them into Redis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full extract-transform-load cycle
    Run {
        /// Base URL serving the rating, appointment, councillor and
        /// patient_councillor datasets
        #[arg(short, long, default_value = "https://xloop-dummy.herokuapp.com")]
        base_url: String,

        /// Key prefix for published averages
        #[arg(short, long, default_value = "average_rating")]
        key_prefix: String,

        /// Redis connection URL; defaults to the REDIS_URL env var
        #[arg(long)]
        redis_url: Option<String>,
    },
    /// Compute averages from files or URLs without loading Redis
    Transform {
        /// Rating dataset: file path or URL
        #[arg(long, default_value = "rating.json")]
        rating: String,

        /// Appointment dataset: file path or URL
        #[arg(long, default_value = "appointment.json")]
        appointment: String,

        /// Councillor dataset: file path or URL
        #[arg(long, default_value = "councillor.json")]
        councillor: String,

        /// Patient-councillor dataset: file path or URL
        #[arg(long, default_value = "patient_councillor.json")]
        patient_councillor: String,

        /// CSV file to append results to
        #[arg(short, long, default_value = "averages.csv")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/councillor_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("councillor_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            base_url,
            key_prefix,
            redis_url,
        } => {
            let redis_url = match redis_url {
                Some(url) => url,
                None => std::env::var("REDIS_URL").expect("REDIS_URL must be set"),
            };

            let client = BasicClient::new()?;
            let mut store = RedisStore::connect(&redis_url).await?;

            let report = run_pipeline(&client, &mut store, &base_url, &key_prefix).await?;

            info!(
                ratings = report.ratings,
                appointments = report.appointments,
                councillors = report.councillors,
                patient_councillors = report.patient_councillors,
                averages = report.averages,
                excluded_ratings = report.excluded_ratings,
                published = report.published,
                "ETL run complete"
            );
        }
        Commands::Transform {
            rating,
            appointment,
            councillor,
            patient_councillor,
            output,
        } => {
            let ratings = load_source(&rating).await?;
            let appointments = load_source(&appointment).await?;
            let councillors = load_source(&councillor).await?;
            let patient_councillors = load_source(&patient_councillor).await?;

            let datasets = Datasets::from_rows(
                &ratings,
                &appointments,
                &councillors,
                &patient_councillors,
            );

            let outcome = aggregate(
                &datasets.ratings,
                &datasets.appointments,
                &datasets.councillors,
                &datasets.patient_councillors,
            );

            if outcome.excluded_ratings > 0 {
                warn!(
                    excluded = outcome.excluded_ratings,
                    "Ratings excluded by unresolved joins"
                );
            }

            print_json(&TransformSummary::new(&outcome))?;
            append_records(&output, &outcome.averages)?;

            info!(
                %output,
                averages = outcome.averages.len(),
                specializations = outcome.specializations.len(),
                "Transform complete"
            );
        }
    }

    Ok(())
}

/// Loads dataset rows from a local file path or fetches them over HTTP.
#[tracing::instrument]
async fn load_source(source: &str) -> Result<Vec<serde_json::Value>> {
    if source.starts_with("http") {
        let client = BasicClient::new()?;
        fetch_records(&client, source).await
    } else {
        let bytes = std::fs::read(source)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
