use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use quarry::config::Config;
use quarry::fetcher::HttpFetcher;
use quarry::scrape::{FanoutRunLog, JsonlRunLog, PgRunLog, ScrapeOrchestrator, TracingRunLog};

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.json_logs);

    // Environment first, then CLI overrides
    let mut config = Config::from_env()?;
    if let Some(url) = &args.listing_url {
        config = config.with_listing_url(url)?;
    }
    if let Some(target_count) = args.target_count {
        config = config.with_target_count(target_count)?;
    }
    if let Some(concurrency) = args.concurrency {
        config = config.with_concurrency(concurrency)?;
    }

    let fetcher = Arc::new(HttpFetcher::new(&config.fetcher_config())?);
    let run_log = Arc::new(build_run_log(&config).await);
    let orchestrator = ScrapeOrchestrator::from_config(&config, fetcher, run_log);

    let articles = orchestrator.run(config.listing_url().as_str()).await?;
    let json = serde_json::to_string_pretty(&articles)?;

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, json).await?;
            info!(path = %path.display(), count = articles.len(), "Wrote articles");
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Tracing always, plus the file and database sinks that are configured.
async fn build_run_log(config: &Config) -> FanoutRunLog {
    let mut sinks = FanoutRunLog::new().with(Arc::new(TracingRunLog));

    if let Some(path) = config.run_log_path() {
        sinks = sinks.with(Arc::new(JsonlRunLog::new(path.clone())));
    }

    if let Some(database_url) = config.database_url() {
        match PgRunLog::connect(database_url).await {
            Ok(sink) => sinks = sinks.with(Arc::new(sink)),
            Err(e) => warn!(error = %e, "Database run log unavailable; continuing without it"),
        }
    }

    sinks
}
