use thiserror::Error;

/// Convenience result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Convenience result type for query operations that can reject their arguments.
pub type QueryResult<T> = Result<T, QueryError>;

/// Error type returned by the loader.
///
/// Every variant is fatal for the calling session and is meant to be shown to the end user.
/// Unparseable congestion cells are never reported here; they are coerced to `0`.
#[derive(Debug, Error)]
pub enum LoadError {
    /// No input file could be located.
    #[error("no input found: {searched}")]
    NotFound { searched: String },

    /// The input bytes could not be decoded with any of the attempted encodings.
    #[error("failed to decode input (attempted encodings: {})", attempted.join(", "))]
    Decode { attempted: Vec<String> },

    /// The configured encoding label is not known.
    #[error("unknown encoding label '{label}'")]
    UnknownEncoding { label: String },

    /// The five identifying columns are not all present after header repair.
    #[error("missing identifying columns: {missing:?}. headers={headers:?}")]
    MissingColumns {
        missing: Vec<String>,
        headers: Vec<String>,
    },

    /// Underlying I/O error (e.g. permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Error type returned by the query layer for invalid arguments.
///
/// Data-shape conditions (empty tables, no matching rows) are never errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Ranking mode other than `max` or `avg`.
    #[error("invalid rank_by value '{value}' (expected 'max' or 'avg')")]
    InvalidRankBy { value: String },
}
