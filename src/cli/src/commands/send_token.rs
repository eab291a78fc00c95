//! Send-token command.

use crate::commands::ensure_success;
use crate::config;
use crate::errors::CliError;
use ledger::{AccountId, TokenId, Transaction, TransactionBody};
use tracing::info;

/// Runs the send-token command: a two-leg token transfer from the operator.
pub async fn run(token_id: TokenId, to: AccountId, amount: i64) -> Result<String, CliError> {
    if amount <= 0 {
        return Err(CliError::InvalidInput(format!(
            "amount must be greater than 0, got {}",
            amount
        )));
    }

    let client = config::build_client()?;
    let from = client.operator_account_id()?;
    info!("Sending {} units of token {} from {} to {}", amount, token_id, from, to);

    let body = TransactionBody::CryptoTransfer {
        hbar_transfers: vec![],
        token_transfers: vec![(token_id, from, -amount), (token_id, to, amount)],
        alias_transfers: vec![],
    };

    let mut tx = Transaction::new(body).freeze()?;
    let response = client.execute(&mut tx).await?;
    let receipt = client.wait_for_receipt(&response).await?;
    ensure_success(&receipt)?;

    Ok(format!(
        "💸 Sent {} unit(s) of token {} from {} to {}",
        amount, token_id, from, to
    ))
}
