mod dashboard;
mod quality;
mod render;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use salesdash_core::FilterDefaults;
use tracing_subscriber::EnvFilter;

use crate::dashboard::DashboardArgs;

#[derive(Debug, Parser)]
#[command(name = "salesdash-cli")]
#[command(about = "Sales performance dashboard in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print KPIs and sales charts for the selected filters
    Dashboard {
        /// Orders CSV (defaults to `SALESDASH_DATA_PATH`)
        #[arg(long)]
        data: Option<PathBuf>,
        /// City to include; repeat for several (defaults to the configured cities)
        #[arg(long = "city")]
        cities: Vec<String>,
        /// Select no cities at all instead of the configured defaults
        #[arg(long, conflicts_with = "cities")]
        no_city: bool,
        /// Customer segment to include; repeat for several
        #[arg(long = "segment")]
        segments: Vec<String>,
        /// Select no segments at all instead of the configured defaults
        #[arg(long, conflicts_with = "segments")]
        no_segment: bool,
        /// First order date to include (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last order date to include (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Width of the text bars
        #[arg(long, default_value = "40")]
        width: usize,
    },
    /// List the cities, segments and date span available for filtering
    Options {
        /// Orders CSV (defaults to `SALESDASH_DATA_PATH`)
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Report the percentage of missing values per column of a CSV file
    Missing {
        /// CSV file to inspect (defaults to `SALESDASH_DATA_PATH`)
        #[arg(long)]
        data: Option<PathBuf>,
        /// Width of the text bars
        #[arg(long, default_value = "40")]
        width: usize,
    },
}

impl Commands {
    /// The `--data` path given to any command, if one was.
    fn data_path(&self) -> Option<&Path> {
        match self {
            Self::Dashboard { data, .. } | Self::Options { data } | Self::Missing { data, .. } => {
                data.as_deref()
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = salesdash_core::load_app_config_with_data_path(
        cli.command.as_ref().and_then(Commands::data_path),
    )?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let data_path = |data: Option<PathBuf>| data.unwrap_or_else(|| config.data_path.clone());

    match cli.command {
        Some(Commands::Dashboard {
            data,
            cities,
            no_city,
            segments,
            no_segment,
            start,
            end,
            width,
        }) => dashboard::run_dashboard(
            &data_path(data),
            &FilterDefaults::from_app_config(&config),
            &DashboardArgs {
                cities,
                no_city,
                segments,
                no_segment,
                start,
                end,
                width,
            },
        )?,
        Some(Commands::Options { data }) => dashboard::run_options(&data_path(data))?,
        Some(Commands::Missing { data, width }) => quality::run_missing(&data_path(data), width)?,
        None => println!("salesdash-cli: run with --help to list commands"),
    }

    Ok(())
}
