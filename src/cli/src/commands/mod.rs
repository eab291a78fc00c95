//! Command implementations for the toolkit.
//!
//! Each command is a `run` function returning the success message printed
//! by `main`. Commands build their client and read their environment
//! variables themselves, so each one fails fast naming exactly what it is
//! missing.

pub mod approve_allowance;
pub mod burn_nfts;
pub mod clone_token;
pub mod create_account;
pub mod create_account_from_evm;
pub mod create_ft;
pub mod create_token;
pub mod create_topic;
pub mod mint_nfts;
pub mod send_hbar;
pub mod send_token;
pub mod send_token_to_alias;
pub mod submit_message;

use crate::errors::CliError;
use ledger::{Status, TransactionReceipt};

/// Checks that a receipt carries a success status.
pub(crate) fn ensure_success(receipt: &TransactionReceipt) -> Result<(), CliError> {
    if receipt.status == Status::Success {
        Ok(())
    } else {
        Err(CliError::TransactionFailed(receipt.status.to_string()))
    }
}
