//! One run: load the CSV, aggregate, draw the three charts, write them out.

use crate::charts::{ChartRenderer, RenderError};
use crate::config::RunConfig;
use crate::data::{DataLoader, DataProcessor, LoaderError, ProcessorError};
use crate::report::{open_report, ReportError, ReportFiles, ReportWriter};
use crate::stats::{Aggregates, StatsError};
use thiserror::Error;
use tracing::{info, info_span};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Process(#[from] ProcessorError),
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub records: usize,
    pub skipped: usize,
    pub aggregates: Aggregates,
    pub files: ReportFiles,
}

pub fn run(config: &RunConfig) -> Result<RunOutcome, PipelineError> {
    let _span = info_span!("run", input = %config.input.display()).entered();

    let mut loader = DataLoader::new();
    let df = loader.load_csv(&config.input)?;
    let processed = DataProcessor::to_records(df, config.policy)?;

    let aggregates = Aggregates::compute(&processed.records)?;
    info!(
        age_groups = aggregates.box_summaries.len(),
        bars = aggregates.grouped_averages.len(),
        dates = aggregates.date_averages.len(),
        "aggregates ready"
    );

    let charts = ChartRenderer::new(config.layout).render_all(&aggregates)?;

    let writer = ReportWriter::new(&config.out_dir);
    let summary = config.write_summary.then_some(&aggregates);
    let files = writer.write(&charts, summary)?;

    if config.open_report {
        open_report(&files.index);
    }

    Ok(RunOutcome {
        records: processed.records.len(),
        skipped: processed.skipped,
        aggregates,
        files,
    })
}
