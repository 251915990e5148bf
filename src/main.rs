//! CLI entry point for the bikeshare statistics tool.
//!
//! Provides subcommands for one-shot analysis of a city's trip log, an
//! interactive exploration loop, and listing the configured cities.

mod explore;

use anyhow::Result;
use bikeshare_stats::config::CityData;
use bikeshare_stats::error::Error;
use bikeshare_stats::filter::{self, DayFilter, MonthFilter};
use bikeshare_stats::loader::{self, TimestampPolicy};
use bikeshare_stats::report::Report;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_stats")]
#[command(about = "A tool to analyze city bikeshare trip logs", long_about = None)]
struct Cli {
    /// Directory holding the standard city CSV files
    #[arg(long, default_value = "data", global = true)]
    data_dir: PathBuf,

    /// JSON file mapping city names to CSV paths (overrides --data-dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one city's trips with optional month and day filters
    Analyze {
        /// City to analyze
        #[arg(value_name = "CITY")]
        city: String,

        /// Month filter: a month name, or "all"
        #[arg(short, long, default_value = "all")]
        month: String,

        /// Day-of-week filter: a weekday name, or "all"
        #[arg(short, long, default_value = "all")]
        day: String,

        /// Print the report as pretty JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Abort the load on the first malformed timestamp instead of
        /// dropping the row
        #[arg(long, default_value_t = false)]
        strict_timestamps: bool,
    },
    /// Interactively pick a city and filters, browse raw rows, and restart
    Explore,
    /// List the configured cities
    ListCities,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("warn".parse().unwrap()));

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

    let cities = match &cli.config {
        Some(path) => CityData::load(path)?,
        None => CityData::from_dir(&cli.data_dir),
    };

    match cli.command {
        Commands::Analyze {
            city,
            month,
            day,
            json,
            strict_timestamps,
        } => {
            let month_filter = MonthFilter::parse(&month)?;
            let day_filter = DayFilter::parse(&day)?;
            let path = cities.resolve(&city)?;

            let policy = if strict_timestamps {
                TimestampPolicy::Fail
            } else {
                TimestampPolicy::DropAndCount
            };
            let table = loader::load_trips(path, policy)?;
            let filtered = filter::apply(&table, month_filter, day_filter);
            info!(city = %city, rows = filtered.len(), "Trips selected");

            match Report::compute(&city, &month, &day, &filtered) {
                Ok(report) if json => println!("{}", report.to_json()?),
                Ok(report) => println!("{}", report.render()),
                Err(Error::EmptyAggregation(_)) => {
                    println!("No trips match the requested filters.");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Explore => {
            explore::run(&cities)?;
        }
        Commands::ListCities => {
            for city in cities.cities() {
                println!("{city}");
            }
        }
    }

    Ok(())
}
