mod aggregate;
mod archiver;
mod config;
mod coordinator;
mod detail;
mod error;
mod fetcher;
mod listing;
mod logger;
mod models;
mod parser;
mod report;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use chrono::Utc;
use clap::Parser;
use log::{error, info, warn};

use config::Config;
use coordinator::CancelToken;
use error::ScrapeError;
use fetcher::HttpFetcher;
use report::RunSummary;

#[derive(Parser)]
#[command(name = "menu_nutrition_scraper")]
#[command(about = "Scrape per-product nutrition data from a restaurant menu into CSV and JSON")]
struct Cli {
    #[arg(long, default_value = config::MENU_URL, help = "Listing page enumerating the products")]
    url: String,

    #[arg(short, long, default_value_t = config::DEFAULT_WORKERS, help = "Concurrent detail page fetches")]
    workers: usize,

    #[arg(long, default_value_t = config::DEFAULT_TIMEOUT.as_secs(), help = "Per-request timeout in seconds")]
    timeout_secs: u64,

    #[arg(long, help = "CSV output path")]
    csv: Option<PathBuf>,

    #[arg(long, help = "Row-oriented JSON output path")]
    json: Option<PathBuf>,

    #[arg(long, help = "Write a JSON run summary (skipped and failed URLs) here")]
    summary: Option<PathBuf>,

    #[arg(short, long, default_value = "info", help = "Log level (error, warn, info, debug)")]
    log_level: String,
}

impl Cli {
    fn into_config(self) -> Config {
        let defaults = Config::default();
        Config {
            listing_url: self.url,
            workers: self.workers.max(1),
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: defaults.user_agent,
            csv_path: self.csv.unwrap_or(defaults.csv_path),
            json_path: self.json.unwrap_or(defaults.json_path),
            summary_path: self.summary,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(&cli.log_level);
    let config = cli.into_config();

    let started_at = Utc::now();
    let fetcher = HttpFetcher::new(&config.user_agent, config.timeout)?;

    let items = match listing::discover(&fetcher, &config.listing_url) {
        Ok(items) => items,
        Err(e) => {
            if e.is_transport() {
                error!("Listing page {} is unreachable", config.listing_url);
            }
            let context = format!("failed to discover products at {}", config.listing_url);
            return Err(anyhow::Error::from(e).context(context));
        }
    };

    let cancel = CancelToken::new();
    if let Err(e) = coordinator::cancel_on_interrupt(&cancel) {
        warn!("Ctrl-C handler not installed: {e}");
    }

    let outcomes = coordinator::run_all(
        &fetcher,
        &items,
        config.workers,
        &cancel,
        coordinator::log_progress,
    );

    let summary =
        RunSummary::from_outcomes(&outcomes, items.len(), cancel.is_cancelled(), started_at);
    summary.log();
    if let Some(path) = &config.summary_path {
        archiver::save_json(&summary, path)?;
    }

    let dataset = match aggregate::aggregate(&outcomes) {
        Ok(dataset) => dataset,
        Err(ScrapeError::EmptyResult) => {
            error!("No data collected.");
            bail!("no records extracted from {}", config.listing_url);
        }
        Err(e) => return Err(e.into()),
    };
    info!(
        "Dataset: {} rows x {} columns ({} missing cells)",
        dataset.rows().len(),
        dataset.columns().len(),
        dataset.missing_cells()
    );

    archiver::save_csv(&dataset, &config.csv_path)?;
    archiver::save_json(&dataset, &config.json_path)?;
    Ok(())
}
