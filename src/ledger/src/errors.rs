//! Error types for the ledger client library.

use thiserror::Error;

/// Errors that can occur in the ledger client library.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Error when an entity ID string cannot be parsed.
    #[error("Invalid entity ID '{0}': expected 'shard.realm.num'")]
    InvalidEntityId(String),

    /// Error when key material cannot be parsed.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Error when an hbar amount overflows the tinybar range.
    #[error("Hbar amount {0} overflows the tinybar range")]
    AmountOverflow(i64),

    /// Error when a transaction is signed or executed before being frozen.
    #[error("Transaction must be frozen before {0}")]
    TransactionNotFrozen(&'static str),

    /// Error when a transaction is modified after being frozen.
    #[error("Transaction is already frozen")]
    TransactionFrozen,

    /// Error when transfer legs do not net to zero.
    #[error("Unbalanced transfer: {0}")]
    UnbalancedTransfer(String),

    /// Error when a mint transaction carries too many metadata entries.
    #[error("Mint batch of {count} exceeds the per-transaction limit of {max}")]
    MintBatchTooLarge {
        /// The number of metadata entries in the batch
        count: usize,
        /// The per-transaction metadata-entry limit
        max: usize,
    },

    /// Error when serialization or deserialization fails.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Error when a network operation fails.
    #[error("Network error: {0}")]
    Network(String),

    /// Error when a request to the node fails.
    #[error("Node request failed: {0}")]
    NodeRequestFailed(String),

    /// Error when a receipt does not become available in time.
    #[error("Timed out waiting for the receipt of transaction {0}")]
    ReceiptTimeout(String),

    /// Error when a mirror node request fails.
    #[error("Mirror node request failed: {0}")]
    MirrorRequestFailed(String),

    /// Error when an upload to the content-addressed store fails.
    #[error("Storage upload failed: {0}")]
    StorageUploadFailed(String),
}

impl From<reqwest::Error> for LedgerError {
    fn from(error: reqwest::Error) -> Self {
        LedgerError::Network(error.to_string())
    }
}

impl From<ed25519_dalek::SignatureError> for LedgerError {
    fn from(error: ed25519_dalek::SignatureError) -> Self {
        LedgerError::InvalidKey(error.to_string())
    }
}
