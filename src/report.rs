//! Report Writer Module
//! Writes each chart to its own SVG file, a host page with one container
//! per chart, and optionally the aggregates as JSON.

use crate::charts::{escape, ChartKind, RenderedChart};
use crate::stats::Aggregates;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub const INDEX_FILE: &str = "index.html";
pub const SUMMARY_FILE: &str = "summary.json";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize aggregates: {0}")]
    Json(#[from] serde_json::Error),
}

/// Paths of everything a run produced.
#[derive(Debug, Clone)]
pub struct ReportFiles {
    pub charts: Vec<PathBuf>,
    pub index: PathBuf,
    pub summary: Option<PathBuf>,
}

pub struct ReportWriter {
    out_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// File a chart is written to, named after its container.
    pub fn chart_path(&self, kind: ChartKind) -> PathBuf {
        self.out_dir.join(format!("{}.svg", kind.container()))
    }

    fn write_file(path: &Path, contents: &str) -> Result<(), ReportError> {
        fs::write(path, contents).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the charts, the HTML page and, if given, the JSON summary.
    pub fn write(
        &self,
        charts: &[RenderedChart],
        summary: Option<&Aggregates>,
    ) -> Result<ReportFiles, ReportError> {
        fs::create_dir_all(&self.out_dir).map_err(|source| ReportError::Io {
            path: self.out_dir.clone(),
            source,
        })?;

        let mut chart_paths = Vec::with_capacity(charts.len());
        for chart in charts {
            let path = self.chart_path(chart.kind);
            Self::write_file(&path, &chart.svg)?;
            chart_paths.push(path);
        }

        let index = self.out_dir.join(INDEX_FILE);
        Self::write_file(&index, &Self::index_html(charts))?;

        let summary_path = match summary {
            Some(aggregates) => {
                let path = self.out_dir.join(SUMMARY_FILE);
                let json = serde_json::to_string_pretty(aggregates)?;
                Self::write_file(&path, &json)?;
                Some(path)
            }
            None => None,
        };

        info!(
            dir = %self.out_dir.display(),
            charts = chart_paths.len(),
            summary = summary_path.is_some(),
            "report written"
        );

        Ok(ReportFiles {
            charts: chart_paths,
            index,
            summary: summary_path,
        })
    }

    /// Host page: one `<div id=…>` per chart with the SVG inlined.
    pub fn index_html(charts: &[RenderedChart]) -> String {
        let mut html = String::from(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"utf-8\">\n  \
             <title>Social Media Engagement</title>\n  <style>\n    \
             body { font-family: sans-serif; margin: 2em; }\n    \
             section { margin-bottom: 2em; }\n  </style>\n</head>\n<body>\n",
        );

        for chart in charts {
            html.push_str("<section>\n");
            html.push_str(&format!("  <h2>{}</h2>\n", escape(chart.kind.title())));
            html.push_str(&format!("  <div id=\"{}\">\n", chart.kind.container()));
            html.push_str(&chart.svg);
            html.push_str("  </div>\n</section>\n");
        }

        html.push_str("</body>\n</html>\n");
        html
    }
}

/// Open the page with the system default application. Failure only warns.
pub fn open_report(index: &Path) {
    match open::that(index) {
        Ok(()) => info!(path = %index.display(), "opened report"),
        Err(err) => warn!(path = %index.display(), error = %err, "could not open report"),
    }
}
