//! Per-user activity rankings.
//!
//! Reviews with a blank `user_id` are never attributed to anyone.

use indexmap::IndexMap;

use crate::analyzers::types::Ranked;
use crate::analyzers::utility::{MeanAccumulator, finish_means, top_n};
use crate::record::Review;

fn known_user(review: &Review) -> Option<&str> {
    let id = review.user_id.as_str();
    (!id.trim().is_empty()).then_some(id)
}

/// Users with the most reviews.
pub fn most_active_users(records: &[Review], top_n_size: usize) -> Vec<Ranked<usize>> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for user in records.iter().filter_map(known_user) {
        *counts.entry(user.to_string()).or_default() += 1;
    }
    top_n(counts, top_n_size)
}

/// Users whose reviews collected the most helpful votes in total.
///
/// A review without a numerator counts as zero votes.
pub fn most_helpful_users(records: &[Review], top_n_size: usize) -> Vec<Ranked<u64>> {
    let mut votes: IndexMap<String, u64> = IndexMap::new();
    for review in records {
        if let Some(user) = known_user(review) {
            *votes.entry(user.to_string()).or_default() +=
                u64::from(review.helpfulness_numerator.unwrap_or(0));
        }
    }
    top_n(votes, top_n_size)
}

/// Mean whitespace-separated word count of each user's review text.
///
/// Blank texts are skipped; users with no non-blank text are left out.
pub fn average_words_per_user(records: &[Review]) -> IndexMap<String, f64> {
    let mut groups: IndexMap<String, MeanAccumulator> = IndexMap::new();
    for review in records {
        let Some(user) = known_user(review) else {
            continue;
        };
        if review.text.trim().is_empty() {
            continue;
        }
        groups
            .entry(user.to_string())
            .or_default()
            .push(review.word_count() as f64);
    }
    finish_means(groups)
}
