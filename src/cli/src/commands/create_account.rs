//! Create-account command.

use crate::commands::ensure_success;
use crate::config;
use crate::errors::CliError;
use crate::inputs::{self, AccountSecrets};
use ledger::{Hbar, PrivateKey, Transaction, TransactionBody};
use tracing::info;

/// Runs the create-account command: a fresh ed25519 key, a funded account,
/// and a secrets file holding the key material.
pub async fn run(initial_balance: i64) -> Result<String, CliError> {
    let client = config::build_client()?;

    let key = PrivateKey::generate();
    let public_key = key.public_key();
    info!("Generated account key {}", public_key);

    let body = TransactionBody::AccountCreate {
        key: public_key,
        initial_balance: Hbar::from_hbar(initial_balance)?,
        evm_alias: None,
    };

    let mut tx = Transaction::new(body).freeze()?;
    let response = client.execute(&mut tx).await?;
    let receipt = client.wait_for_receipt(&response).await?;
    ensure_success(&receipt)?;

    let account_id = receipt.account_id.ok_or_else(|| {
        CliError::InvalidInput("receipt carries no account ID".to_string())
    })?;

    let secrets = AccountSecrets {
        account_id: account_id.to_string(),
        private_key: key.to_string(),
        public_key: public_key.to_string(),
    };
    let path = inputs::write_secrets(&format!("account-secrets-{}.json", account_id), &secrets)?;

    Ok(format!(
        "🎉 Created account {} with a starting balance of {} ℏ\nKey material written to {}",
        account_id,
        initial_balance,
        path.display()
    ))
}
