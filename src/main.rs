//! Engagement Charts - CSV to box, grouped bar and line charts
//!
//! Reads a social media engagement CSV and writes boxplot.svg, barplot.svg,
//! lineplot.svg and an index.html hosting all three.

use anyhow::{Context, Result};
use clap::Parser;
use engagement_charts::config::{Cli, RunConfig};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = if json {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .init();
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let cli = Cli::parse();
    init_logging(cli.log_json);

    let config = RunConfig::from_cli(&cli).context("invalid chart configuration")?;
    let outcome = engagement_charts::run(&config)
        .with_context(|| format!("failed to chart {}", config.input.display()))?;

    info!(
        records = outcome.records,
        skipped = outcome.skipped,
        index = %outcome.files.index.display(),
        "done"
    );
    Ok(())
}
