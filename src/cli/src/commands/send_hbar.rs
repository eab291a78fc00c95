//! Send-hbar command.

use crate::commands::ensure_success;
use crate::config;
use crate::errors::CliError;
use ledger::{AccountId, Hbar, Transaction, TransactionBody};
use tracing::info;

/// Runs the send-hbar command: a two-leg transfer from the operator.
pub async fn run(to: AccountId, amount: i64) -> Result<String, CliError> {
    let client = config::build_client()?;
    let from = client.operator_account_id()?;
    let hbar = Hbar::from_hbar(amount)?;
    info!("Sending {} from {} to {}", hbar, from, to);

    let body = TransactionBody::CryptoTransfer {
        hbar_transfers: vec![(from, -hbar), (to, hbar)],
        token_transfers: vec![],
        alias_transfers: vec![],
    };

    let mut tx = Transaction::new(body).freeze()?;
    let response = client.execute(&mut tx).await?;
    let receipt = client.wait_for_receipt(&response).await?;
    ensure_success(&receipt)?;

    Ok(format!("💸 Sent {} from {} to {}", hbar, from, to))
}
