use review_stats::analyzers::reviews::{
    mean_helpfulness_ratio, mean_score, mean_score_by_user, score_distribution,
    top_scored_entities, weighted_mean_score,
};
use review_stats::analyzers::temporal::{
    Granularity, busiest_period, count_by_year, mean_score_by_period, timestamp_to_date,
};
use review_stats::analyzers::users::{
    average_words_per_user, most_active_users, most_helpful_users,
};
use review_stats::error::RowIssue;
use review_stats::loader::load_reviews;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/sample_reviews.csv");

#[test]
fn test_full_pipeline() {
    let loaded = load_reviews(FIXTURE).expect("Failed to load fixture");

    assert_eq!(loaded.rows_read, 12);
    assert_eq!(loaded.reviews.len(), 10);
    assert_eq!(loaded.diagnostics.len(), 2);
    assert!(matches!(
        loaded.diagnostics[0].issue,
        RowIssue::MalformedRow { expected: 10, found: 9 }
    ));
    assert!(matches!(
        loaded.diagnostics[1].issue,
        RowIssue::TypeCoercion { column: "HelpfulnessNumerator", .. }
    ));

    let reviews = &loaded.reviews;

    let distribution = score_distribution(reviews);
    assert_eq!(distribution.values().sum::<usize>(), reviews.len());
    assert_eq!(distribution[&5], 5);
    assert_eq!(distribution[&1], 1);

    assert!((mean_score(reviews) - 39.0 / 10.0).abs() < 1e-12);
    // votes on reviews 1, 3, 4 (1/1 each) and 12 (4/5)
    assert!((mean_helpfulness_ratio(reviews) - 3.8 / 4.0).abs() < 1e-12);

    let by_user = mean_score_by_user(reviews);
    assert_eq!(by_user.get("A3SGXH7AUHU8GW"), Some(&4.0));
    assert_eq!(by_user.get("A1UQRSCLF8GW1T"), Some(&4.5));

    let five_star = top_scored_entities(reviews, 5, 1);
    assert_eq!(five_star[0].id, "B006K2ZZ7K");
    assert_eq!(five_star[0].value, 3);

    let weighted = weighted_mean_score(reviews);
    assert_eq!(weighted.get("B001E4KFG0"), Some(&5.0));
    assert!(!weighted.contains_key("B006K2ZZ7K"));

    assert_eq!(timestamp_to_date("1303862400").as_deref(), Some("2011-04-27"));

    let per_year = count_by_year(reviews);
    assert_eq!(per_year.values().sum::<usize>(), reviews.len() - 1);
    assert_eq!(per_year.get("2012"), Some(&6));

    let busiest = busiest_period(reviews, Granularity::Year);
    assert_eq!(busiest.period.as_deref(), Some("2012"));
    assert_eq!(busiest.count, 6);

    let by_year = mean_score_by_period(reviews, Granularity::Year);
    assert_eq!(by_year.get("2008"), Some(&4.0));

    let active = most_active_users(reviews, 2);
    assert_eq!(active[0].id, "A3SGXH7AUHU8GW");
    assert_eq!(active[0].value, 2);
    assert_eq!(active[1].id, "A1UQRSCLF8GW1T");

    let helpful = most_helpful_users(reviews, 1);
    assert_eq!(helpful[0].id, "A3SGXH7AUHU8GW");
    assert_eq!(helpful[0].value, 5);

    let words = average_words_per_user(reviews);
    assert!(!words.contains_key("ADT0SRK1MGOEU"));
    assert_eq!(words.get("A3KLWF6WQ5BNYO"), Some(&2.0));
}

#[test]
fn test_aggregations_are_idempotent() {
    let loaded = load_reviews(FIXTURE).expect("Failed to load fixture");
    let reviews = &loaded.reviews;

    assert_eq!(most_active_users(reviews, 10), most_active_users(reviews, 10));
    assert_eq!(
        mean_score_by_period(reviews, Granularity::Month),
        mean_score_by_period(reviews, Granularity::Month)
    );
    assert_eq!(
        busiest_period(reviews, Granularity::Month),
        busiest_period(reviews, Granularity::Month)
    );
}
