//! CSV loader for review datasets.
//!
//! Reads the header once, maps columns by normalized name, then coerces each
//! data row into a [`Review`]. Rows with the wrong number of fields or a bad
//! integer are skipped and reported. Failing to read the source, or a header
//! without the `ProductId`, `UserId` and `Score` columns, aborts the load.

use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::error::{LoadError, RowDiagnostic, RowIssue};
use crate::record::Review;

const ID: usize = 0;
const PRODUCT_ID: usize = 1;
const USER_ID: usize = 2;
const PROFILE_NAME: usize = 3;
const HELPFULNESS_NUMERATOR: usize = 4;
const HELPFULNESS_DENOMINATOR: usize = 5;
const SCORE: usize = 6;
const TIME: usize = 7;
const SUMMARY: usize = 8;
const TEXT: usize = 9;

/// Canonical column names, indexed by the constants above.
const COLUMNS: [&str; 10] = [
    "Id",
    "ProductId",
    "UserId",
    "ProfileName",
    "HelpfulnessNumerator",
    "HelpfulnessDenominator",
    "Score",
    "Time",
    "Summary",
    "Text",
];

/// Columns without which no aggregation is meaningful. Header matching is
/// case-sensitive, so a lowercase `score` column does not count.
const REQUIRED_COLUMNS: [&str; 3] = ["ProductId", "UserId", "Score"];

/// Result of a successful load: the review collection plus every skipped row.
#[derive(Debug, Default)]
pub struct LoadedReviews {
    pub reviews: Vec<Review>,
    pub diagnostics: Vec<RowDiagnostic>,
    /// Data rows seen, kept or not.
    pub rows_read: usize,
}

/// Loads reviews from the CSV file at `path`.
///
/// # Errors
///
/// [`LoadError::SourceNotFound`] if the file does not exist,
/// [`LoadError::MissingColumns`] if the header lacks `ProductId`, `UserId` or
/// `Score`, and [`LoadError::LoadFailure`] for any other I/O or decoding failure.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_reviews<P: AsRef<Path>>(path: P) -> Result<LoadedReviews, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoadError::SourceNotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::failure("opening source", e),
    })?;
    load_reviews_from_reader(file)
}

/// Loads reviews from any CSV byte stream.
pub fn load_reviews_from_reader<R: Read>(reader: R) -> Result<LoadedReviews, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| LoadError::failure("reading header", e))?
        .clone();

    let mut loaded = LoadedReviews::default();
    if headers.is_empty() {
        info!("Review source is empty");
        return Ok(loaded);
    }

    let columns = ColumnIndex::from_headers(&headers);
    let required: Vec<&'static str> = columns
        .missing()
        .filter(|name| REQUIRED_COLUMNS.contains(name))
        .collect();
    if !required.is_empty() {
        return Err(LoadError::MissingColumns { columns: required });
    }
    for missing in columns.missing() {
        warn!(column = missing, "Column not found in header");
    }

    for result in rdr.records() {
        let row = result.map_err(|e| LoadError::failure("reading row", e))?;
        loaded.rows_read += 1;
        let line = row.position().map_or(0, |p| p.line());

        let outcome = if row.len() != headers.len() {
            Err(RowIssue::MalformedRow {
                expected: headers.len(),
                found: row.len(),
            })
        } else {
            parse_row(&row, &columns)
        };

        match outcome {
            Ok(review) => loaded.reviews.push(review),
            Err(issue) => {
                warn!(line, category = issue.category(), %issue, "Skipping row");
                loaded.diagnostics.push(RowDiagnostic { line, issue });
            }
        }
    }

    info!(
        rows_read = loaded.rows_read,
        loaded = loaded.reviews.len(),
        skipped = loaded.diagnostics.len(),
        "Reviews loaded"
    );

    Ok(loaded)
}

/// Strips whitespace and ASCII punctuation from a header token. Case is kept.
pub fn normalize_header(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !c.is_ascii_punctuation())
        .collect()
}

/// Position of each canonical column in the source, if present.
struct ColumnIndex([Option<usize>; COLUMNS.len()]);

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut slots = [None; COLUMNS.len()];
        for (pos, raw) in headers.iter().enumerate() {
            let name = normalize_header(raw);
            match COLUMNS.iter().position(|c| *c == name) {
                Some(slot) => {
                    slots[slot].get_or_insert(pos);
                }
                None => debug!(header = raw, "Ignoring unknown column"),
            }
        }
        ColumnIndex(slots)
    }

    fn missing(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0
            .iter()
            .zip(COLUMNS)
            .filter(|(pos, _)| pos.is_none())
            .map(|(_, name)| name)
    }

    fn get<'r>(&self, slot: usize, row: &'r StringRecord) -> Option<&'r str> {
        self.0[slot].and_then(|pos| row.get(pos))
    }

    fn text(&self, slot: usize, row: &StringRecord) -> String {
        self.get(slot, row).unwrap_or_default().to_string()
    }

    fn integer<T: FromStr>(&self, slot: usize, row: &StringRecord) -> Result<Option<T>, RowIssue> {
        match self.get(slot, row) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| RowIssue::TypeCoercion {
                    column: COLUMNS[slot],
                    value: raw.to_string(),
                }),
        }
    }
}

fn parse_row(row: &StringRecord, columns: &ColumnIndex) -> Result<Review, RowIssue> {
    Ok(Review {
        id: columns.text(ID, row),
        product_id: columns.text(PRODUCT_ID, row),
        user_id: columns.text(USER_ID, row),
        profile_name: columns.text(PROFILE_NAME, row),
        helpfulness_numerator: columns.integer(HELPFULNESS_NUMERATOR, row)?,
        helpfulness_denominator: columns.integer(HELPFULNESS_DENOMINATOR, row)?,
        score: columns.integer(SCORE, row)?,
        time_raw: columns.get(TIME, row).map(str::to_string),
        summary: columns.text(SUMMARY, row),
        text: columns.text(TEXT, row),
    })
}
