//! Statistics Calculator Module
//! Computes the three aggregates behind the charts: five-number summaries per
//! age group, mean likes per (platform, post type) and mean likes per date.

use crate::data::Record;
use crate::stats::dates::parse_calendar_date;
use rayon::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;
use std::collections::HashMap;
use std::hash::Hash;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Unrecognised date '{0}'")]
    InvalidDate(String),
}

/// min, quartiles and max of one group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeGroupSummary {
    pub age_group: String,
    #[serde(flatten)]
    pub summary: FiveNumberSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedAverage {
    pub platform: String,
    pub post_type: String,
    pub avg_likes: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateAverage {
    pub date: String,
    pub avg_likes: f64,
    pub count: usize,
}

/// Everything the three charts need, computed in one pass over the records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregates {
    pub box_summaries: Vec<AgeGroupSummary>,
    pub grouped_averages: Vec<GroupedAverage>,
    pub date_averages: Vec<DateAverage>,
}

impl Aggregates {
    pub fn compute(records: &[Record]) -> Result<Self, StatsError> {
        let aggregates = Self {
            box_summaries: StatsCalculator::five_number_summaries(records),
            grouped_averages: StatsCalculator::grouped_averages(records),
            date_averages: StatsCalculator::date_averages(records)?,
        };
        debug!(
            age_groups = aggregates.box_summaries.len(),
            platform_post_types = aggregates.grouped_averages.len(),
            dates = aggregates.date_averages.len(),
            "aggregates computed"
        );
        Ok(aggregates)
    }
}

/// Handles statistical calculations with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Group items by key, keeping keys in order of first appearance.
    pub fn group_in_order<'a, T, K, F>(items: &'a [T], key: F) -> Vec<(K, Vec<&'a T>)>
    where
        K: Eq + Hash + Clone,
        F: Fn(&T) -> K,
    {
        let mut index: HashMap<K, usize> = HashMap::new();
        let mut groups: Vec<(K, Vec<&'a T>)> = Vec::new();

        for item in items {
            let k = key(item);
            match index.get(&k) {
                Some(&i) => groups[i].1.push(item),
                None => {
                    index.insert(k.clone(), groups.len());
                    groups.push((k, vec![item]));
                }
            }
        }

        groups
    }

    /// Quantile of ascending-sorted values by linear interpolation between
    /// order statistics, `p` in [0, 1].
    pub fn quantile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = p.clamp(0.0, 1.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            let lo = sorted_values[lower];
            let hi = sorted_values[upper];
            (lo + (hi - lo) * frac).clamp(lo, hi)
        }
    }

    /// Five-number summary of a set of values, `None` when empty.
    pub fn five_number_summary(values: &[f64]) -> Option<FiveNumberSummary> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let n = sorted.len();

        Some(FiveNumberSummary {
            min: sorted[0],
            q1: Self::quantile(&sorted, 0.25),
            median: Self::quantile(&sorted, 0.5),
            q3: Self::quantile(&sorted, 0.75),
            max: sorted[n - 1],
            count: n,
        })
    }

    /// Box plot statistics per age group, computed in parallel.
    pub fn five_number_summaries(records: &[Record]) -> Vec<AgeGroupSummary> {
        let groups = Self::group_in_order(records, |r| r.age_group.clone());

        groups
            .par_iter()
            .filter_map(|(age_group, members)| {
                let likes: Vec<f64> = members.iter().map(|r| r.likes).collect();
                Self::five_number_summary(&likes).map(|summary| AgeGroupSummary {
                    age_group: age_group.clone(),
                    summary,
                })
            })
            .collect()
    }

    /// Mean likes for every observed (platform, post type) pair.
    ///
    /// Pairs that never occur in the data are absent from the output.
    pub fn grouped_averages(records: &[Record]) -> Vec<GroupedAverage> {
        let mut rows = Vec::new();

        for (platform, members) in Self::group_in_order(records, |r| r.platform.clone()) {
            let by_post_type = Self::group_in_order(&members, |r| r.post_type.clone());
            for (post_type, posts) in by_post_type {
                rows.push(GroupedAverage {
                    platform: platform.clone(),
                    post_type,
                    avg_likes: posts.iter().map(|r| r.likes).mean(),
                    count: posts.len(),
                });
            }
        }

        rows
    }

    /// Mean likes per distinct date string, in calendar order.
    pub fn date_averages(records: &[Record]) -> Result<Vec<DateAverage>, StatsError> {
        let mut keyed = Vec::new();

        for (date, members) in Self::group_in_order(records, |r| r.date.clone()) {
            let day = parse_calendar_date(&date)
                .ok_or_else(|| StatsError::InvalidDate(date.clone()))?;
            let avg_likes = members.iter().map(|r| r.likes).mean();
            keyed.push((
                day,
                DateAverage {
                    date,
                    avg_likes,
                    count: members.len(),
                },
            ));
        }

        keyed.sort_by(|(a_day, a), (b_day, b)| {
            a_day.cmp(b_day).then_with(|| a.date.cmp(&b.date))
        });
        Ok(keyed.into_iter().map(|(_, row)| row).collect())
    }

    /// Largest value of `field` across `items`, or `None` when empty.
    pub fn max_of<T>(items: &[T], field: impl Fn(&T) -> f64) -> Option<f64> {
        if items.is_empty() {
            return None;
        }
        Some(Statistics::max(items.iter().map(field)))
    }
}
