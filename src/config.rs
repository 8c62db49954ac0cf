//! Command line and environment configuration.

use crate::charts::{ChartLayout, Margin};
use crate::data::RowPolicy;
use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Chart size {width}x{height} leaves no room inside the margins")]
    LayoutTooSmall { width: f64, height: f64 },
}

#[derive(Parser, Debug, Clone)]
#[command(name = "engagement_charts")]
#[command(about = "Render box, bar and line charts of social media engagement from a CSV", long_about = None)]
pub struct Cli {
    /// CSV with Platform, Date, PostType, AgeGroup and Likes columns
    #[arg(
        value_name = "CSV",
        env = "ENGAGEMENT_CHARTS_INPUT",
        default_value = "socialMedia.csv"
    )]
    pub input: PathBuf,

    /// Directory the SVG files and index.html are written to
    #[arg(short, long, env = "ENGAGEMENT_CHARTS_OUT_DIR", default_value = "charts")]
    pub out_dir: PathBuf,

    /// Drop rows with missing values or non-numeric Likes instead of failing
    #[arg(long, default_value_t = false)]
    pub skip_invalid: bool,

    /// Also write summary.json with the computed aggregates
    #[arg(long, default_value_t = false)]
    pub summary: bool,

    /// Open index.html in the default application when done
    #[arg(long, default_value_t = false)]
    pub open: bool,

    /// Total chart width in pixels
    #[arg(long, env = "ENGAGEMENT_CHARTS_WIDTH", default_value_t = 600.0)]
    pub width: f64,

    /// Total chart height in pixels
    #[arg(long, env = "ENGAGEMENT_CHARTS_HEIGHT", default_value_t = 350.0)]
    pub height: f64,

    /// Emit logs as JSON lines
    #[arg(long, default_value_t = false)]
    pub log_json: bool,
}

/// Resolved settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub out_dir: PathBuf,
    pub policy: RowPolicy,
    pub write_summary: bool,
    pub open_report: bool,
    pub layout: ChartLayout,
}

impl RunConfig {
    pub fn new(input: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            out_dir: out_dir.into(),
            policy: RowPolicy::default(),
            write_summary: false,
            open_report: false,
            layout: ChartLayout::default(),
        }
    }

    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let layout = ChartLayout {
            width: cli.width,
            height: cli.height,
            margin: Margin::default(),
        };
        validate_layout(&layout)?;

        Ok(Self {
            input: cli.input.clone(),
            out_dir: cli.out_dir.clone(),
            policy: if cli.skip_invalid {
                RowPolicy::Skip
            } else {
                RowPolicy::FailFast
            },
            write_summary: cli.summary,
            open_report: cli.open,
            layout,
        })
    }
}

pub fn validate_layout(layout: &ChartLayout) -> Result<(), ConfigError> {
    let fits = layout.inner_width() > 0.0 && layout.inner_height() > 0.0;
    if fits && layout.width.is_finite() && layout.height.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::LayoutTooSmall {
            width: layout.width,
            height: layout.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // Every env-backed option is passed explicitly so ENGAGEMENT_CHARTS_*
    // variables in the test environment cannot change the result.
    fn parse(out_dir: &str, width: &str, height: &str, flags: &[&str]) -> Cli {
        let mut args = vec![
            "engagement_charts",
            "data.csv",
            "--out-dir",
            out_dir,
            "--width",
            width,
            "--height",
            height,
        ];
        args.extend_from_slice(flags);
        Cli::parse_from(args)
    }

    fn declared_default(id: &str) -> Option<String> {
        Cli::command()
            .get_arguments()
            .find(|arg| arg.get_id() == id)
            .and_then(|arg| arg.get_default_values().first())
            .map(|value| value.to_string_lossy().into_owned())
    }

    #[test]
    fn declared_defaults_match_fixed_layout() {
        assert_eq!(declared_default("input").as_deref(), Some("socialMedia.csv"));
        assert_eq!(declared_default("out_dir").as_deref(), Some("charts"));
        assert_eq!(declared_default("width").as_deref(), Some("600"));
        assert_eq!(declared_default("height").as_deref(), Some("350"));
    }

    #[test]
    fn plain_run_uses_fail_fast_and_default_layout() {
        let config = RunConfig::from_cli(&parse("charts", "600", "350", &[])).unwrap();

        assert_eq!(config.input, PathBuf::from("data.csv"));
        assert_eq!(config.policy, RowPolicy::FailFast);
        assert_eq!(config.layout, ChartLayout::default());
        assert!(!config.write_summary);
        assert!(!config.open_report);
    }

    #[test]
    fn flags_map_onto_config() {
        let cli = parse("out", "800", "350", &["--skip-invalid", "--summary"]);
        let config = RunConfig::from_cli(&cli).unwrap();

        assert_eq!(config.out_dir, PathBuf::from("out"));
        assert_eq!(config.policy, RowPolicy::Skip);
        assert!(config.write_summary);
        assert_eq!(config.layout.inner_width(), 700.0);
    }

    #[test]
    fn rejects_layout_smaller_than_margins() {
        let err = RunConfig::from_cli(&parse("charts", "600", "90", &[])).unwrap_err();

        assert_eq!(
            err,
            ConfigError::LayoutTooSmall {
                width: 600.0,
                height: 90.0
            }
        );
    }
}
