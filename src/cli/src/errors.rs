//! Error types for the command-line toolkit.

use ledger::LedgerError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Error, Debug)]
pub enum CliError {
    /// Error when a required environment variable is missing.
    #[error("environment variable {0} must be present")]
    MissingEnv(String),

    /// Error when a command argument or input file is invalid.
    #[error("{0}")]
    InvalidInput(String),

    /// Error when an input file cannot be read or parsed.
    #[error("failed to read {0}: {1}")]
    InputFile(String, String),

    /// Error when NFT metadata fails schema validation.
    #[error("Metadata is not HIP-412 compliant:\n{0}")]
    MetadataInvalid(String),

    /// Error when a transaction reaches consensus with a non-success status.
    #[error("Transaction failed with status {0}")]
    TransactionFailed(String),

    /// Error from the ledger client library.
    #[error("{0}")]
    Ledger(#[from] LedgerError),

    /// Error when a file operation fails.
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    /// Error when JSON serialization or deserialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
