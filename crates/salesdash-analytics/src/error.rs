use thiserror::Error;

/// Fatal errors while reading a CSV table. The load is abandoned.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column missing: {0}")]
    MissingColumn(String),

    #[error("CSV has no header row")]
    EmptyHeader,
}

/// Row-level problems. The offending row is rejected and the load continues.
///
/// `line` is the 1-based line in the source file, header included.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: {column} is missing")]
    MissingField { line: u64, column: &'static str },

    #[error("line {line}: unparseable timestamp {value:?}")]
    InvalidTimestamp { line: u64, value: String },

    #[error("line {line}: {column} is not a number: {value:?}")]
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("line {line}: total_price is negative: {value}")]
    NegativePrice { line: u64, value: String },
}

/// The current filters left no rows to summarize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no data for these filters")]
pub struct EmptyResultWarning;
