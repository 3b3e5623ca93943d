//! Calendar bucketing of reviews by their Unix timestamp.
//!
//! All conversions are done in UTC so results do not depend on the machine's
//! local time zone. A review whose `time_raw` is missing or not an integer is
//! left out of every aggregation in this module.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::analyzers::types::BusiestPeriod;
use crate::analyzers::utility::{MeanAccumulator, finish_means};
use crate::record::Review;

/// Size of the calendar bucket a review falls into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// `YYYY`
    Year,
    /// `YYYY-MM`
    #[default]
    Month,
}

impl Granularity {
    fn format(self) -> &'static str {
        match self {
            Granularity::Year => "%Y",
            Granularity::Month => "%Y-%m",
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let secs: i64 = raw.trim().parse().ok()?;
    DateTime::from_timestamp(secs, 0)
}

/// Formats a raw Unix timestamp as `YYYY-MM-DD`.
///
/// Returns `None` for empty or non-integer input and for timestamps outside
/// the range chrono can represent.
pub fn timestamp_to_date(raw: &str) -> Option<String> {
    parse_timestamp(raw).map(|dt| dt.format("%Y-%m-%d").to_string())
}

/// The `YYYY` or `YYYY-MM` bucket for a raw timestamp.
pub fn period_key(raw: &str, granularity: Granularity) -> Option<String> {
    parse_timestamp(raw).map(|dt| dt.format(granularity.format()).to_string())
}

fn review_period(review: &Review, granularity: Granularity) -> Option<String> {
    review
        .time_raw
        .as_deref()
        .and_then(|raw| period_key(raw, granularity))
}

/// Review count per period, in the order each period first appears.
pub fn count_by_period(records: &[Review], granularity: Granularity) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for key in records.iter().filter_map(|r| review_period(r, granularity)) {
        *counts.entry(key).or_default() += 1;
    }
    counts
}

/// Review count per year, oldest first.
pub fn count_by_year(records: &[Review]) -> BTreeMap<String, usize> {
    count_by_period(records, Granularity::Year)
        .into_iter()
        .collect()
}

/// The period with the most reviews.
///
/// On a tie the period that appears first in the collection wins.
pub fn busiest_period(records: &[Review], granularity: Granularity) -> BusiestPeriod {
    let mut busiest = BusiestPeriod::default();
    for (period, count) in count_by_period(records, granularity) {
        if count > busiest.count {
            busiest = BusiestPeriod {
                period: Some(period),
                count,
            };
        }
    }
    busiest
}

/// Mean score per period, oldest first. Reviews without a score are ignored.
pub fn mean_score_by_period(records: &[Review], granularity: Granularity) -> BTreeMap<String, f64> {
    mean_score_by_period_first_seen(records, granularity)
        .into_iter()
        .collect()
}

/// Same means as [`mean_score_by_period`], in the order each period first
/// appears in the collection.
pub fn mean_score_by_period_first_seen(
    records: &[Review],
    granularity: Granularity,
) -> IndexMap<String, f64> {
    let mut groups: IndexMap<String, MeanAccumulator> = IndexMap::new();
    for review in records {
        let Some(score) = review.score else {
            continue;
        };
        if let Some(key) = review_period(review, granularity) {
            groups.entry(key).or_default().push(score as f64);
        }
    }
    finish_means(groups)
}
