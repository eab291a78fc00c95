//! Send-token-to-alias command.

use crate::commands::ensure_success;
use crate::config;
use crate::errors::CliError;
use ledger::{TokenId, Transaction, TransactionBody};
use tracing::info;

/// Runs the send-token-to-alias command: token units addressed to an EVM
/// address alias. When the transfer spawns a hollow account, the child
/// receipt carries its ID.
pub async fn run(token_id: TokenId, evm_address: &str, amount: i64) -> Result<String, CliError> {
    if amount <= 0 {
        return Err(CliError::InvalidInput(format!(
            "amount must be greater than 0, got {}",
            amount
        )));
    }
    let alias = parse_evm_address(evm_address)?;

    let client = config::build_client()?;
    let from = client.operator_account_id()?;
    info!(
        "Sending {} units of token {} from {} to alias 0x{}",
        amount,
        token_id,
        from,
        hex::encode(alias)
    );

    let body = TransactionBody::CryptoTransfer {
        hbar_transfers: vec![],
        token_transfers: vec![(token_id, from, -amount)],
        alias_transfers: vec![(token_id, alias, amount)],
    };

    let mut tx = Transaction::new(body).freeze()?;
    let response = client.execute(&mut tx).await?;
    let receipt = client.wait_for_receipt(&response).await?;
    ensure_success(&receipt)?;

    let mut message = format!(
        "💸 Sent {} unit(s) of token {} to alias 0x{}",
        amount,
        token_id,
        hex::encode(alias)
    );
    if let Some(account_id) = receipt
        .children
        .iter()
        .find_map(|child| child.account_id)
    {
        message.push_str(&format!("\n🎉 The alias now maps to account {}", account_id));
    }

    Ok(message)
}

/// Parses a 20-byte EVM address from its hex form, with or without the
/// `0x` prefix.
fn parse_evm_address(address: &str) -> Result<[u8; 20], CliError> {
    let stripped = address.strip_prefix("0x").unwrap_or(address);
    let bytes = hex::decode(stripped)
        .map_err(|e| CliError::InvalidInput(format!("EVM address is invalid: {}", e)))?;

    bytes.try_into().map_err(|_| {
        CliError::InvalidInput(format!(
            "EVM address must be 20 bytes, got {}",
            stripped.len() / 2
        ))
    })
}
