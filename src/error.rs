//! Error types for table loading and collator construction.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong before a comparison is made. Building keys and
/// comparing strings never fails once a `Collator` exists.
#[derive(Debug, Error)]
pub enum CollationError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted table has not been built (run `unicol import` first).
    #[error("collation table not found at {}; build it with `unicol import`", .0.display())]
    TableMissing(PathBuf),

    /// The persisted table could not be encoded or decoded.
    #[error("table encoding failed: {0}")]
    Encoding(#[from] bincode::Error),

    /// A line of the text weight table could not be parsed.
    #[error("malformed weight table at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("collation table keys must not be empty")]
    EmptyKey,

    #[error("strength must be at least 1")]
    InvalidStrength,

    #[error("backward level {0} is out of range; levels start at 1")]
    InvalidBackwardLevel(usize),
}

pub type Result<T> = std::result::Result<T, CollationError>;
