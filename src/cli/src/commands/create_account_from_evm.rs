//! Create-account-from-evm command.

use crate::commands::ensure_success;
use crate::config;
use crate::errors::CliError;
use ledger::{EcdsaPrivateKey, Hbar, PrivateKey, Transaction, TransactionBody};
use tracing::info;

/// Runs the create-account-from-evm command: a fresh ECDSA key whose EVM
/// address becomes the account alias, alongside a fresh ed25519 account key.
pub async fn run() -> Result<String, CliError> {
    let client = config::build_client()?;

    let evm_key = EcdsaPrivateKey::generate();
    let evm_address = evm_key.evm_address();
    info!("Derived EVM address 0x{}", hex::encode(evm_address));

    let account_key = PrivateKey::generate();

    let body = TransactionBody::AccountCreate {
        key: account_key.public_key(),
        initial_balance: Hbar::from_tinybars(100),
        evm_alias: Some(evm_address),
    };

    let mut tx = Transaction::new(body).freeze()?;
    tx.sign(&account_key)?;
    let response = client.execute(&mut tx).await?;
    let receipt = client.wait_for_receipt(&response).await?;
    ensure_success(&receipt)?;

    let account_id = receipt.account_id.ok_or_else(|| {
        CliError::InvalidInput("receipt carries no account ID".to_string())
    })?;

    Ok(format!(
        "New account private key: {}\n\
         New account public key: {}\n\
         New account EVM address: 0x{}\n\
         🎉 Created account {} aliased to the EVM address above",
        evm_key.to_hex(),
        evm_key.public_key_hex(),
        hex::encode(evm_address),
        account_id
    ))
}
