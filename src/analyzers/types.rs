//! Result types returned by the aggregations.

use serde::Serialize;
use std::collections::BTreeMap;

/// Review count for each star value 1..=5. Always holds all five keys.
pub type ScoreDistribution = BTreeMap<i32, usize>;

/// Which identifier reviews are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Product,
}

/// One row of a top-N ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked<M> {
    pub id: String,
    pub value: M,
}

/// The period with the most reviews. `period` is `None` when no review had a
/// usable timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BusiestPeriod {
    pub period: Option<String>,
    pub count: usize,
}

/// Headline figures for a whole collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSummary {
    pub total_reviews: usize,
    pub mean_score: f64,
    pub mean_helpfulness_ratio: f64,
    pub distribution: ScoreDistribution,
}
