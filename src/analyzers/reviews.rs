//! Score and helpfulness aggregations.

use indexmap::IndexMap;

use crate::analyzers::types::{Entity, Ranked, ReviewSummary, ScoreDistribution};
use crate::analyzers::utility::{MeanAccumulator, finish_means, top_n};
use crate::record::Review;

fn entity_id(review: &Review, entity: Entity) -> &str {
    match entity {
        Entity::User => &review.user_id,
        Entity::Product => &review.product_id,
    }
}

/// Counts reviews per star value. Scores outside 1..=5 are ignored.
pub fn score_distribution(records: &[Review]) -> ScoreDistribution {
    let mut distribution: ScoreDistribution = (1..=5).map(|s| (s, 0)).collect();
    for score in records.iter().filter_map(Review::star_score) {
        *distribution.entry(score).or_default() += 1;
    }
    distribution
}

/// Mean score over every review that has one. 0.0 for an empty collection.
pub fn mean_score(records: &[Review]) -> f64 {
    let mut acc = MeanAccumulator::default();
    for score in records.iter().filter_map(|r| r.score) {
        acc.push(score as f64);
    }
    acc.mean().unwrap_or(0.0)
}

/// Mean helpfulness ratio over reviews with at least one helpfulness vote.
pub fn mean_helpfulness_ratio(records: &[Review]) -> f64 {
    let mut acc = MeanAccumulator::default();
    for ratio in records.iter().filter_map(Review::helpfulness_ratio) {
        acc.push(ratio);
    }
    acc.mean().unwrap_or(0.0)
}

/// Total, mean score, mean helpfulness and distribution in one value.
pub fn overall_summary(records: &[Review]) -> ReviewSummary {
    ReviewSummary {
        total_reviews: records.len(),
        mean_score: mean_score(records),
        mean_helpfulness_ratio: mean_helpfulness_ratio(records),
        distribution: score_distribution(records),
    }
}

/// Mean score per user or product id, in first-seen order.
///
/// Ids without any scored review do not appear.
pub fn mean_score_by(records: &[Review], entity: Entity) -> IndexMap<String, f64> {
    let mut groups: IndexMap<String, MeanAccumulator> = IndexMap::new();
    for review in records {
        if let Some(score) = review.score {
            groups
                .entry(entity_id(review, entity).to_string())
                .or_default()
                .push(score as f64);
        }
    }
    finish_means(groups)
}

pub fn mean_score_by_user(records: &[Review]) -> IndexMap<String, f64> {
    mean_score_by(records, Entity::User)
}

pub fn mean_score_by_product(records: &[Review]) -> IndexMap<String, f64> {
    mean_score_by(records, Entity::Product)
}

/// Ranks products by how many of their reviews scored exactly `score_filter`.
pub fn top_scored_entities(
    records: &[Review],
    score_filter: i32,
    top_n_size: usize,
) -> Vec<Ranked<usize>> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for review in records.iter().filter(|r| r.score == Some(score_filter)) {
        *counts.entry(review.product_id.clone()).or_default() += 1;
    }
    top_n(counts, top_n_size)
}

/// Helpfulness-weighted mean score per entity.
///
/// Each scored review is weighted by its helpfulness ratio, so the result for
/// an id is `sum(score * ratio) / sum(ratio)`. Reviews without votes carry no
/// weight; ids whose total weight is zero are left out.
pub fn weighted_mean_score_by(records: &[Review], entity: Entity) -> IndexMap<String, f64> {
    let mut groups: IndexMap<String, MeanAccumulator> = IndexMap::new();
    for review in records {
        let (Some(score), Some(weight)) = (review.score, review.helpfulness_ratio()) else {
            continue;
        };
        groups
            .entry(entity_id(review, entity).to_string())
            .or_default()
            .push_weighted(score as f64, weight);
    }
    finish_means(groups)
}

/// [`weighted_mean_score_by`] grouped by product.
pub fn weighted_mean_score(records: &[Review]) -> IndexMap<String, f64> {
    weighted_mean_score_by(records, Entity::Product)
}
