//! Interactive text menu over a loaded review collection.

use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::debug;

use review_stats::analyzers::DEFAULT_TOP_N;
use review_stats::analyzers::temporal::Granularity;
use review_stats::record::Review;
use review_stats::report::{Query, run_query};

/// Number of periods shown by the "mean score over time" entry.
const SCORE_OVER_TIME_SAMPLE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Reviews,
    Temporal,
    Users,
}

impl Section {
    const ALL: [Section; 3] = [Section::Reviews, Section::Temporal, Section::Users];

    fn title(self) -> &'static str {
        match self {
            Section::Reviews => "Review analysis",
            Section::Temporal => "Temporal analysis",
            Section::Users => "User analysis",
        }
    }

    fn queries(self) -> Vec<Query> {
        let top = DEFAULT_TOP_N;
        match self {
            Section::Reviews => vec![
                Query::Distribution,
                Query::UserMeans { top },
                Query::TopScored { score: 5, top },
                Query::ProductMeans { top },
                Query::Weighted { top },
            ],
            Section::Temporal => vec![
                Query::Date { timestamp: None },
                Query::Busiest {
                    granularity: Granularity::Month,
                },
                Query::ByYear,
                Query::ScoreOverTime {
                    granularity: Granularity::Month,
                    limit: Some(SCORE_OVER_TIME_SAMPLE),
                },
            ],
            Section::Users => vec![
                Query::ActiveUsers { top },
                Query::HelpfulUsers { top },
                Query::WordsPerUser { top },
            ],
        }
    }
}

/// Reads one trimmed line. `None` once input is exhausted.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, text: &str) -> Result<Option<String>> {
    write!(out, "{text}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Runs the main menu until the user picks `0` or input ends.
pub fn run_menu<R: BufRead, W: Write>(
    records: &[Review],
    input: &mut R,
    out: &mut W,
    json: bool,
) -> Result<()> {
    loop {
        writeln!(out, "\n--- MENU ---")?;
        for (i, section) in Section::ALL.iter().enumerate() {
            writeln!(out, "{} - {}", i + 1, section.title())?;
        }
        writeln!(out, "0 - Exit")?;

        let Some(choice) = prompt(input, out, "Choose an option: ")? else {
            return Ok(());
        };
        debug!(%choice, "Main menu selection");

        if choice == "0" {
            writeln!(out, "\nExiting.")?;
            return Ok(());
        }
        let section = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| Section::ALL.get(i));
        match section {
            Some(section) => {
                if !run_section(*section, records, input, out, json)? {
                    return Ok(());
                }
            }
            None => writeln!(out, "Invalid option. Try again.")?,
        }
    }
}

/// Runs one sub-menu. Returns `false` when input ended inside it.
fn run_section<R: BufRead, W: Write>(
    section: Section,
    records: &[Review],
    input: &mut R,
    out: &mut W,
    json: bool,
) -> Result<bool> {
    let queries = section.queries();
    loop {
        writeln!(out, "\n--- {} ---", section.title().to_uppercase())?;
        for (i, query) in queries.iter().enumerate() {
            writeln!(out, "{} - {}", i + 1, query.title())?;
        }
        writeln!(out, "0 - Back to main menu")?;

        let Some(choice) = prompt(input, out, "Choose an option: ")? else {
            return Ok(false);
        };
        if choice == "0" {
            return Ok(true);
        }
        let query = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| queries.get(i));
        match query {
            Some(query) => {
                debug!(?query, "Running query");
                writeln!(out, "\n{}", run_query(query, records, json)?)?;
            }
            None => writeln!(out, "Invalid option. Try again.")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn records() -> Vec<Review> {
        vec![
            Review {
                user_id: "A".into(),
                product_id: "P1".into(),
                score: Some(5),
                time_raw: Some("1303862400".into()),
                text: "tasty and cheap".into(),
                ..Default::default()
            },
            Review {
                user_id: "B".into(),
                product_id: "P2".into(),
                score: Some(2),
                ..Default::default()
            },
        ]
    }

    fn drive(script: &str) -> String {
        let mut input = Cursor::new(script.to_string());
        let mut out = Vec::new();
        run_menu(&records(), &mut input, &mut out, false).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_exit_immediately() {
        let out = drive("0\n");
        assert!(out.contains("1 - Review analysis"));
        assert!(out.ends_with("Exiting.\n"));
    }

    #[test]
    fn test_runs_sub_menu_query() {
        let out = drive("1\n1\n0\n0\n");
        assert!(out.contains("Reviews per score"));
        assert!(out.contains("  5  1\n"));
        assert!(out.ends_with("Exiting.\n"));
    }

    #[test]
    fn test_temporal_first_record_date() {
        let out = drive("2\n1\n0\n0\n");
        assert!(out.contains("2011-04-27"));
    }

    #[test]
    fn test_invalid_options_reprompt() {
        let out = drive("9\nabc\n3\n7\n0\n0\n");
        assert_eq!(out.matches("Invalid option").count(), 3);
        assert!(out.contains("--- USER ANALYSIS ---"));
    }

    #[test]
    fn test_end_of_input_inside_section() {
        let out = drive("3\n1\n");
        assert!(out.contains("Users with the most reviews"));
        assert!(!out.contains("Exiting."));
    }
}
