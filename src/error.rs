//! Error and diagnostic types produced while loading reviews.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal load failures. Either one aborts the load and no collection is returned.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("review source '{}' not found", .path.display())]
    SourceNotFound { path: PathBuf },
    #[error("failed to load reviews while {reason}: {source}")]
    LoadFailure {
        reason: &'static str,
        #[source]
        source: csv::Error,
    },
    #[error("failed to load reviews: header is missing required columns {}", .columns.join(", "))]
    MissingColumns { columns: Vec<&'static str> },
}

impl LoadError {
    /// Taxonomy name of this failure, as shown to the user.
    pub fn category(&self) -> &'static str {
        match self {
            LoadError::SourceNotFound { .. } => "SOURCE_NOT_FOUND",
            LoadError::LoadFailure { .. } | LoadError::MissingColumns { .. } => "LOAD_FAILURE",
        }
    }

    pub(crate) fn failure(reason: &'static str, err: impl Into<csv::Error>) -> Self {
        LoadError::LoadFailure {
            reason,
            source: err.into(),
        }
    }
}

/// Why a single data row was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RowIssue {
    MalformedRow { expected: usize, found: usize },
    TypeCoercion { column: &'static str, value: String },
}

impl RowIssue {
    pub fn category(&self) -> &'static str {
        match self {
            RowIssue::MalformedRow { .. } => "MALFORMED_ROW",
            RowIssue::TypeCoercion { .. } => "TYPE_COERCION_ERROR",
        }
    }
}

impl std::fmt::Display for RowIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowIssue::MalformedRow { expected, found } => {
                write!(f, "expected {expected} fields, found {found}")
            }
            RowIssue::TypeCoercion { column, value } => {
                write!(f, "column {column} is not a valid integer: {value:?}")
            }
        }
    }
}

/// A skipped row together with its 1-based line in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowDiagnostic {
    pub line: u64,
    pub issue: RowIssue,
}
