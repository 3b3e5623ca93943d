//! The typed review record produced by the loader.

use serde::Serialize;

/// One product review.
///
/// Numeric fields are `None` only when their column is missing from the
/// source header; a present but unparsable value drops the row at load time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Review {
    pub id: String,
    pub product_id: String,
    pub user_id: String,
    pub profile_name: String,
    pub helpfulness_numerator: Option<u32>,
    pub helpfulness_denominator: Option<u32>,
    pub score: Option<i32>,
    /// Unix timestamp exactly as it appeared in the source.
    pub time_raw: Option<String>,
    pub summary: String,
    pub text: String,
}

impl Review {
    /// `numerator / denominator`, or `None` when the review has no helpfulness votes.
    pub fn helpfulness_ratio(&self) -> Option<f64> {
        match (self.helpfulness_numerator, self.helpfulness_denominator) {
            (Some(num), Some(den)) if den > 0 => Some(num as f64 / den as f64),
            _ => None,
        }
    }

    /// The score if it lies in the 1..=5 star range.
    pub fn star_score(&self) -> Option<i32> {
        self.score.filter(|s| (1..=5).contains(s))
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}
