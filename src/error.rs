// ⚠️ Error types - generation preconditions and BIN selection failures

use thiserror::Error;

/// Result alias for the synthesis core.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Errors raised while synthesizing a card or a batch of records.
///
/// Lookup-table load failures are NOT represented here: they degrade to an
/// empty table and the rule-based brand fallback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// BIN is empty or contains something other than ASCII digits.
    #[error("Invalid BIN '{0}': expected 1-19 ASCII digits")]
    InvalidBin(String),

    /// BIN leaves no room for branch code, sequence number and check digit.
    #[error("BIN '{bin}' is too long for a {length}-digit {brand} number (needs at least {min_segment} free digits before the check digit)")]
    BinTooLong {
        bin: String,
        brand: String,
        length: usize,
        min_segment: usize,
    },

    /// Resolved brand profile violates its own invariants.
    #[error("Invalid brand profile for BIN '{bin}': {reason}")]
    InvalidProfile { bin: String, reason: String },

    /// Batch size must be positive.
    #[error("Record count must be at least 1 (got {0})")]
    InvalidCount(usize),

    /// Every attempt produced a number failing the Luhn check.
    /// Only reachable through a logic defect in the segment builder.
    #[error("Luhn validation failed {attempts} times in a row for BIN '{bin}'")]
    ChecksumExhausted { bin: String, attempts: usize },
}

/// Errors raised by the CSV-backed BIN selector.
#[derive(Error, Debug)]
pub enum SelectorError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No debit cards matched the selection criteria")]
    NoCandidates,
}
