//! Normalization Error Types

use thiserror::Error;

/// Errors that can occur while normalizing an uploaded log
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Header row matched neither recognized shape
    #[error(
        "unrecognized log format (columns: {columns:?}); expected either \
         (SECONDS; PID; VALUE) or (time(ms); ...sensor columns)"
    )]
    UnrecognizedFormat { columns: Vec<String> },

    /// Input had no header row at all
    #[error("input contains no header row")]
    EmptyInput,

    /// Reader-level CSV failure
    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),
}
