//! Data Processor Module
//! Turns the raw text DataFrame into typed engagement records.

use crate::data::record::{
    Record, AGE_GROUP_COL, DATE_COL, LIKES_COL, PLATFORM_COL, POST_TYPE_COL,
};
use crate::stats::parse_calendar_date;
use polars::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Line {line}: Likes value '{value}' is not a non-negative number")]
    InvalidLikes { line: usize, value: String },
    #[error("Line {line}: Date value '{value}' is not a recognised date")]
    InvalidDate { line: usize, value: String },
    #[error("Line {line}: missing value in column '{column}'")]
    MissingValue { line: usize, column: &'static str },
    #[error("No valid rows in data")]
    Empty,
}

/// What to do with a row that fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowPolicy {
    /// Abort on the first malformed row
    #[default]
    FailFast,
    /// Drop malformed rows and keep going
    Skip,
}

/// Validated records plus how many rows were dropped on the way.
#[derive(Debug, Clone)]
pub struct ProcessedData {
    pub records: Vec<Record>,
    pub skipped: usize,
}

/// Handles conversion and validation of loaded rows.
pub struct DataProcessor;

impl DataProcessor {
    /// Coerce a Likes cell to a number.
    ///
    /// Accepts anything `f64` parses after trimming, as long as it is finite
    /// and not negative.
    pub fn coerce_likes(raw: &str) -> Option<f64> {
        let value: f64 = raw.trim().parse().ok()?;
        if value.is_finite() && value >= 0.0 {
            Some(value)
        } else {
            None
        }
    }

    /// Build typed records from a DataFrame whose columns are all strings.
    pub fn to_records(df: &DataFrame, policy: RowPolicy) -> Result<ProcessedData, ProcessorError> {
        let platform = df.column(PLATFORM_COL)?.as_materialized_series().str()?;
        let date = df.column(DATE_COL)?.as_materialized_series().str()?;
        let post_type = df.column(POST_TYPE_COL)?.as_materialized_series().str()?;
        let age_group = df.column(AGE_GROUP_COL)?.as_materialized_series().str()?;
        let likes = df.column(LIKES_COL)?.as_materialized_series().str()?;

        let mut records = Vec::with_capacity(df.height());
        let mut skipped = 0usize;

        for i in 0..df.height() {
            // header is line 1
            let line = i + 2;
            let row = Self::build_record(
                line,
                platform.get(i),
                post_type.get(i),
                age_group.get(i),
                date.get(i),
                likes.get(i),
            );

            match row {
                Ok(record) => records.push(record),
                Err(err) if policy == RowPolicy::Skip => {
                    warn!(line, error = %err, "skipping malformed row");
                    skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }

        if records.is_empty() {
            return Err(ProcessorError::Empty);
        }

        info!(records = records.len(), skipped, "records validated");
        Ok(ProcessedData { records, skipped })
    }

    fn build_record(
        line: usize,
        platform: Option<&str>,
        post_type: Option<&str>,
        age_group: Option<&str>,
        date: Option<&str>,
        likes: Option<&str>,
    ) -> Result<Record, ProcessorError> {
        let platform = Self::require(line, platform, PLATFORM_COL)?;
        let post_type = Self::require(line, post_type, POST_TYPE_COL)?;
        let age_group = Self::require(line, age_group, AGE_GROUP_COL)?;
        let date = Self::require(line, date, DATE_COL)?;
        let raw_likes = Self::require(line, likes, LIKES_COL)?;

        let likes = Self::coerce_likes(raw_likes).ok_or_else(|| ProcessorError::InvalidLikes {
            line,
            value: raw_likes.to_string(),
        })?;
        if parse_calendar_date(date).is_none() {
            return Err(ProcessorError::InvalidDate {
                line,
                value: date.to_string(),
            });
        }

        Ok(Record::new(platform, post_type, age_group, date, likes))
    }

    fn require<'a>(
        line: usize,
        value: Option<&'a str>,
        column: &'static str,
    ) -> Result<&'a str, ProcessorError> {
        value.ok_or(ProcessorError::MissingValue { line, column })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(likes: Vec<Option<&str>>) -> DataFrame {
        let n = likes.len();
        DataFrame::new(vec![
            Column::new("Platform".into(), vec!["Instagram"; n]),
            Column::new("Date".into(), vec!["2024-03-01"; n]),
            Column::new("PostType".into(), vec!["video"; n]),
            Column::new("AgeGroup".into(), vec!["18-24"; n]),
            Column::new("Likes".into(), likes),
        ])
        .unwrap()
    }

    #[test]
    fn coerces_numeric_text() {
        assert_eq!(DataProcessor::coerce_likes("42"), Some(42.0));
        assert_eq!(DataProcessor::coerce_likes(" 7.5 "), Some(7.5));
        assert_eq!(DataProcessor::coerce_likes("0"), Some(0.0));
        assert_eq!(DataProcessor::coerce_likes("abc"), None);
        assert_eq!(DataProcessor::coerce_likes(""), None);
        assert_eq!(DataProcessor::coerce_likes("-3"), None);
        assert_eq!(DataProcessor::coerce_likes("NaN"), None);
        assert_eq!(DataProcessor::coerce_likes("inf"), None);
    }

    #[test]
    fn fail_fast_reports_line_of_bad_likes() {
        let df = frame(vec![Some("10"), Some("lots"), Some("30")]);
        let err = DataProcessor::to_records(&df, RowPolicy::FailFast).unwrap_err();

        match err {
            ProcessorError::InvalidLikes { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn skip_policy_drops_bad_rows() {
        let df = frame(vec![Some("10"), Some("lots"), None, Some("30")]);
        let processed = DataProcessor::to_records(&df, RowPolicy::Skip).unwrap();

        assert_eq!(processed.skipped, 2);
        let likes: Vec<f64> = processed.records.iter().map(|r| r.likes).collect();
        assert_eq!(likes, vec![10.0, 30.0]);
        assert_eq!(processed.records[0].platform, "Instagram");
        assert_eq!(processed.records[0].age_group, "18-24");
    }

    #[test]
    fn unrecognised_date_follows_row_policy() {
        let df = DataFrame::new(vec![
            Column::new("Platform".into(), vec!["Instagram"; 3]),
            Column::new("Date".into(), vec!["2024-03-01", "not-a-date", "March 3, 2024"]),
            Column::new("PostType".into(), vec!["video"; 3]),
            Column::new("AgeGroup".into(), vec!["18-24"; 3]),
            Column::new("Likes".into(), vec!["10", "20", "30"]),
        ])
        .unwrap();

        let err = DataProcessor::to_records(&df, RowPolicy::FailFast).unwrap_err();
        match err {
            ProcessorError::InvalidDate { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "not-a-date");
            }
            other => panic!("unexpected error: {other}"),
        }

        let processed = DataProcessor::to_records(&df, RowPolicy::Skip).unwrap();
        assert_eq!(processed.skipped, 1);
        let dates: Vec<&str> = processed.records.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-03-01", "March 3, 2024"]);
    }

    #[test]
    fn all_rows_invalid_is_empty() {
        let df = frame(vec![Some("x"), Some("y")]);
        let err = DataProcessor::to_records(&df, RowPolicy::Skip).unwrap_err();

        assert!(matches!(err, ProcessorError::Empty));
    }
}
