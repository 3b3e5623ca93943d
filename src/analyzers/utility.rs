use indexmap::IndexMap;
use std::cmp::Ordering;

use crate::analyzers::types::Ranked;

/// Weighted sum and total weight for one group.
#[derive(Debug, Default, Clone, Copy)]
pub struct MeanAccumulator {
    sum: f64,
    weight: f64,
}

impl MeanAccumulator {
    pub fn push(&mut self, value: f64) {
        self.push_weighted(value, 1.0);
    }

    pub fn push_weighted(&mut self, value: f64, weight: f64) {
        self.sum += value * weight;
        self.weight += weight;
    }

    /// `None` when nothing with a positive weight was pushed.
    pub fn mean(&self) -> Option<f64> {
        (self.weight > 0.0).then(|| self.sum / self.weight)
    }
}

/// Collapses grouped accumulators into means, dropping empty groups.
pub fn finish_means(groups: IndexMap<String, MeanAccumulator>) -> IndexMap<String, f64> {
    groups
        .into_iter()
        .filter_map(|(key, acc)| acc.mean().map(|m| (key, m)))
        .collect()
}

/// Ranks `metrics` by value, highest first, keeping at most `n` entries.
///
/// The sort is stable, so entries with equal values stay in the order they
/// were first seen in the collection.
pub fn top_n<M>(metrics: IndexMap<String, M>, n: usize) -> Vec<Ranked<M>>
where
    M: PartialOrd,
{
    let mut ranked: Vec<Ranked<M>> = metrics
        .into_iter()
        .map(|(id, value)| Ranked { id, value })
        .collect();
    ranked.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_accumulator_weights() {
        let mut acc = MeanAccumulator::default();
        assert_eq!(acc.mean(), None);

        acc.push_weighted(5.0, 0.0);
        assert_eq!(acc.mean(), None);

        acc.push_weighted(4.0, 1.0);
        acc.push_weighted(1.0, 0.5);
        assert_eq!(acc.mean(), Some(3.0));
    }

    #[test]
    fn test_top_n_keeps_first_seen_order_on_ties() {
        let metrics: IndexMap<String, usize> = [("b", 2), ("a", 3), ("c", 2), ("d", 1)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        let ranked = top_n(metrics, 3);
        let ids: Vec<_> = ranked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_top_n_zero() {
        let metrics: IndexMap<String, usize> = IndexMap::from([("a".to_string(), 1)]);
        assert!(top_n(metrics, 0).is_empty());
    }
}
