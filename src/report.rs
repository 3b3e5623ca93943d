//! Maps a requested aggregation onto the analyzers and renders the result.
//!
//! Shared by the one-shot subcommands and the interactive menu so both
//! produce identical output for the same query.

use anyhow::Result;
use serde::Serialize;

use crate::analyzers::reviews::{
    mean_score_by_product, mean_score_by_user, overall_summary, score_distribution,
    top_scored_entities, weighted_mean_score,
};
use crate::analyzers::temporal::{
    Granularity, busiest_period, count_by_year, mean_score_by_period,
    mean_score_by_period_first_seen, timestamp_to_date,
};
use crate::analyzers::users::{average_words_per_user, most_active_users, most_helpful_users};
use crate::analyzers::utility::top_n;
use crate::output::{busiest_text, map_text, ranking_text, summary_text, to_json};
use crate::record::Review;

/// One aggregation together with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Summary,
    Distribution,
    UserMeans { top: usize },
    ProductMeans { top: usize },
    TopScored { score: i32, top: usize },
    Weighted { top: usize },
    /// Converts `timestamp`, or the first review's time when `None`.
    Date { timestamp: Option<String> },
    ByYear,
    Busiest { granularity: Granularity },
    /// Mean score per period, oldest first. With a `limit`, the first `limit`
    /// periods in the order they appear in the collection instead.
    ScoreOverTime {
        granularity: Granularity,
        limit: Option<usize>,
    },
    ActiveUsers { top: usize },
    HelpfulUsers { top: usize },
    WordsPerUser { top: usize },
}

impl Query {
    pub fn title(&self) -> String {
        match self {
            Query::Summary => "Review summary".into(),
            Query::Distribution => "Reviews per score (1 to 5 stars)".into(),
            Query::UserMeans { top } => format!("Mean score per user (top {top})"),
            Query::ProductMeans { top } => format!("Mean score per product (top {top})"),
            Query::TopScored { score, top } => {
                format!("Products with the most {score}-star reviews (top {top})")
            }
            Query::Weighted { top } => {
                format!("Helpfulness-weighted mean score per product (top {top})")
            }
            Query::Date { .. } => "Timestamp as date (UTC)".into(),
            Query::ByYear => "Reviews per year".into(),
            Query::Busiest { granularity } => match granularity {
                Granularity::Year => "Year with the most reviews".into(),
                Granularity::Month => "Month with the most reviews".into(),
            },
            Query::ScoreOverTime { limit, .. } => match limit {
                Some(n) => format!("Mean score over time (first {n} periods in data order)"),
                None => "Mean score over time".into(),
            },
            Query::ActiveUsers { top } => format!("Users with the most reviews (top {top})"),
            Query::HelpfulUsers { top } => format!("Most helpful users (top {top})"),
            Query::WordsPerUser { top } => format!("Mean words per review by user (top {top})"),
        }
    }
}

#[derive(Serialize)]
struct DateConversion<'a> {
    timestamp: Option<&'a str>,
    date: Option<String>,
}

fn emit<T: Serialize + ?Sized>(title: &str, value: &T, text: String, json: bool) -> Result<String> {
    if json {
        to_json(value)
    } else {
        Ok(format!("{title}\n{text}"))
    }
}

/// Runs `query` over `records` and renders the result as text, or JSON when `json` is set.
pub fn run_query(query: &Query, records: &[Review], json: bool) -> Result<String> {
    let title = query.title();
    match query {
        Query::Summary => {
            let summary = overall_summary(records);
            emit(&title, &summary, summary_text(&summary), json)
        }
        Query::Distribution => {
            let distribution = score_distribution(records);
            emit(&title, &distribution, map_text(&distribution), json)
        }
        Query::UserMeans { top } => {
            let ranked = top_n(mean_score_by_user(records), *top);
            emit(&title, &ranked, ranking_text(&ranked), json)
        }
        Query::ProductMeans { top } => {
            let ranked = top_n(mean_score_by_product(records), *top);
            emit(&title, &ranked, ranking_text(&ranked), json)
        }
        Query::TopScored { score, top } => {
            let ranked = top_scored_entities(records, *score, *top);
            emit(&title, &ranked, ranking_text(&ranked), json)
        }
        Query::Weighted { top } => {
            let ranked = top_n(weighted_mean_score(records), *top);
            emit(&title, &ranked, ranking_text(&ranked), json)
        }
        Query::Date { timestamp } => {
            let raw = match timestamp {
                Some(raw) => Some(raw.as_str()),
                None => records.first().and_then(|r| r.time_raw.as_deref()),
            };
            let conversion = DateConversion {
                timestamp: raw,
                date: raw.and_then(timestamp_to_date),
            };
            let text = match (&conversion.timestamp, &conversion.date) {
                (Some(raw), Some(date)) => format!("  {raw} -> {date}\n"),
                (Some(raw), None) => format!("  {raw:?} is not a valid Unix timestamp\n"),
                (None, _) => "  (no data)\n".to_string(),
            };
            emit(&title, &conversion, text, json)
        }
        Query::ByYear => {
            let counts = count_by_year(records);
            emit(&title, &counts, map_text(&counts), json)
        }
        Query::Busiest { granularity } => {
            let busiest = busiest_period(records, *granularity);
            emit(&title, &busiest, busiest_text(&busiest), json)
        }
        Query::ScoreOverTime { granularity, limit } => {
            let means: Vec<(String, f64)> = match limit {
                Some(n) => mean_score_by_period_first_seen(records, *granularity)
                    .into_iter()
                    .take(*n)
                    .collect(),
                None => mean_score_by_period(records, *granularity)
                    .into_iter()
                    .collect(),
            };
            let text = map_text(means.iter().map(|(k, v)| (k, v)));
            emit(&title, &means, text, json)
        }
        Query::ActiveUsers { top } => {
            let ranked = most_active_users(records, *top);
            emit(&title, &ranked, ranking_text(&ranked), json)
        }
        Query::HelpfulUsers { top } => {
            let ranked = most_helpful_users(records, *top);
            emit(&title, &ranked, ranking_text(&ranked), json)
        }
        Query::WordsPerUser { top } => {
            let ranked = top_n(average_words_per_user(records), *top);
            emit(&title, &ranked, ranking_text(&ranked), json)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::fixtures::{at, review};

    fn sample() -> Vec<Review> {
        vec![
            at(review("A", "P1", 5), "1303862400"),
            at(review("A", "P1", 5), "1304380800"),
            at(review("B", "P2", 3), "1304380800"),
        ]
    }

    #[test]
    fn test_distribution_text() {
        let out = run_query(&Query::Distribution, &sample(), false).unwrap();
        assert!(out.starts_with("Reviews per score"));
        assert!(out.contains("  5  2\n"));
        assert!(out.contains("  1  0\n"));
    }

    #[test]
    fn test_date_defaults_to_first_review() {
        let out = run_query(&Query::Date { timestamp: None }, &sample(), false).unwrap();
        assert!(out.contains("1303862400 -> 2011-04-27"));

        let query = Query::Date {
            timestamp: Some("later".into()),
        };
        let out = run_query(&query, &sample(), false).unwrap();
        assert!(out.contains("not a valid Unix timestamp"));

        let out = run_query(&Query::Date { timestamp: None }, &[], false).unwrap();
        assert!(out.contains("(no data)"));
    }

    #[test]
    fn test_busiest_json() {
        let query = Query::Busiest {
            granularity: Granularity::Month,
        };
        let out = run_query(&query, &sample(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["period"], "2011-05");
        assert_eq!(value["count"], 2);
    }

    #[test]
    fn test_score_over_time_limit() {
        let query = Query::ScoreOverTime {
            granularity: Granularity::Month,
            limit: Some(1),
        };
        let out = run_query(&query, &sample(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value, serde_json::json!([["2011-04", 5.0]]));
    }

    #[test]
    fn test_score_over_time_limit_follows_data_order() {
        let records = vec![
            at(review("A", "P1", 2), "1326585600"),
            at(review("A", "P1", 5), "1303862400"),
            at(review("B", "P2", 3), "1304380800"),
        ];
        let limited = Query::ScoreOverTime {
            granularity: Granularity::Month,
            limit: Some(2),
        };
        let out = run_query(&limited, &records, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value, serde_json::json!([["2012-01", 2.0], ["2011-04", 5.0]]));

        let full = Query::ScoreOverTime {
            granularity: Granularity::Month,
            limit: None,
        };
        let out = run_query(&full, &records, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            value,
            serde_json::json!([["2011-04", 5.0], ["2011-05", 3.0], ["2012-01", 2.0]])
        );
    }

    #[test]
    fn test_rankings_render() {
        let out = run_query(&Query::ActiveUsers { top: 10 }, &sample(), false).unwrap();
        assert!(out.contains(" 1. A"));
        assert!(out.contains(" 2. B"));

        let out = run_query(&Query::UserMeans { top: 1 }, &sample(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value, serde_json::json!([{ "id": "A", "value": 5.0 }]));
    }

    #[test]
    fn test_every_query_handles_empty_collection() {
        let queries = [
            Query::Summary,
            Query::Distribution,
            Query::UserMeans { top: 10 },
            Query::ProductMeans { top: 10 },
            Query::TopScored { score: 5, top: 10 },
            Query::Weighted { top: 10 },
            Query::Date { timestamp: None },
            Query::ByYear,
            Query::Busiest {
                granularity: Granularity::Year,
            },
            Query::ScoreOverTime {
                granularity: Granularity::Month,
                limit: None,
            },
            Query::ActiveUsers { top: 10 },
            Query::HelpfulUsers { top: 10 },
            Query::WordsPerUser { top: 10 },
        ];
        for query in &queries {
            assert!(run_query(query, &[], false).is_ok());
            assert!(run_query(query, &[], true).is_ok());
        }
    }
}
