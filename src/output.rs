//! Output formatting for aggregate results.
//!
//! Supports plain-text tables and pretty-printed JSON.

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::analyzers::types::{BusiestPeriod, Ranked, ReviewSummary};
use crate::loader::LoadedReviews;

/// A value that can appear in the metric column of a text table.
pub trait Metric {
    fn render(&self) -> String;
}

impl Metric for f64 {
    fn render(&self) -> String {
        format!("{self:.2}")
    }
}

macro_rules! integer_metric {
    ($($t:ty),*) => {
        $(impl Metric for $t {
            fn render(&self) -> String {
                self.to_string()
            }
        })*
    };
}

integer_metric!(usize, u64);

/// Serializes any aggregate result as pretty-printed JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn table<'a, K, V, I>(rows: I) -> String
where
    K: std::fmt::Display + 'a,
    V: Metric + 'a,
    I: IntoIterator<Item = (K, &'a V)>,
{
    let rows: Vec<(String, String)> = rows
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.render()))
        .collect();
    if rows.is_empty() {
        return "  (no data)\n".to_string();
    }
    let width = rows.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    rows.iter()
        .map(|(k, v)| format!("  {k:<width$}  {v}\n"))
        .collect()
}

/// Renders a ranking as numbered lines.
pub fn ranking_text<M: Metric>(rows: &[Ranked<M>]) -> String {
    table(
        rows.iter()
            .enumerate()
            .map(|(i, r)| (format!("{:>2}. {}", i + 1, r.id), &r.value)),
    )
}

/// Renders `key  value` lines in iteration order.
pub fn map_text<'a, K, V, I>(rows: I) -> String
where
    K: std::fmt::Display + 'a,
    V: Metric + 'a,
    I: IntoIterator<Item = (K, &'a V)>,
{
    table(rows)
}

pub fn busiest_text(busiest: &BusiestPeriod) -> String {
    match &busiest.period {
        Some(period) => format!("  {period}  ({} reviews)\n", busiest.count),
        None => "  (no data)\n".to_string(),
    }
}

pub fn summary_text(summary: &ReviewSummary) -> String {
    let mut out = format!(
        "  reviews                 {}\n  mean score              {}\n  mean helpfulness ratio  {}\n",
        summary.total_reviews,
        summary.mean_score.render(),
        summary.mean_helpfulness_ratio.render(),
    );
    out.push_str("  score distribution\n");
    for (score, count) in &summary.distribution {
        out.push_str(&format!("    {score} stars  {count}\n"));
    }
    out
}

/// One-line account of a load, e.g. `Loaded 98 reviews (2 rows skipped: 1 MALFORMED_ROW, 1 TYPE_COERCION_ERROR)`.
pub fn load_summary_text(loaded: &LoadedReviews) -> String {
    debug!(diagnostics = loaded.diagnostics.len(), "Summarising load");
    let mut line = format!("Loaded {} reviews", loaded.reviews.len());
    if loaded.diagnostics.is_empty() {
        return line;
    }
    let mut by_category: BTreeMap<&str, usize> = BTreeMap::new();
    for diagnostic in &loaded.diagnostics {
        *by_category.entry(diagnostic.issue.category()).or_default() += 1;
    }
    let parts: Vec<String> = by_category
        .iter()
        .map(|(category, count)| format!("{count} {category}"))
        .collect();
    line.push_str(&format!(
        " ({} rows skipped: {})",
        loaded.diagnostics.len(),
        parts.join(", ")
    ));
    line
}
