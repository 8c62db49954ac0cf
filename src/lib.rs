//! Engagement Charts - social media engagement CSV to static SVG charts
//!
//! Loads engagement records, computes five-number summaries per age group,
//! average likes per platform and post type, and average likes per date, then
//! draws a box plot, a grouped bar chart and a line chart.

pub mod charts;
pub mod config;
pub mod data;
pub mod pipeline;
pub mod report;
pub mod stats;

pub use pipeline::{run, PipelineError, RunOutcome};
