//! Approve-allowance command.

use crate::commands::ensure_success;
use crate::config;
use crate::errors::CliError;
use ledger::{AccountId, TokenId, Transaction, TransactionBody};

/// Runs the approve-allowance command: grants the spender an all-serials
/// NFT allowance over the token, signed by the owner.
pub async fn run(
    token_id: TokenId,
    owner: AccountId,
    spender: AccountId,
) -> Result<String, CliError> {
    let owner_key = config::private_key("OWNER_PRIVATE_KEY")?;
    let client = config::build_client()?;

    let body = TransactionBody::AllowanceApprove {
        token_id,
        owner,
        spender,
    };

    let mut tx = Transaction::new(body).freeze()?;
    tx.sign(&owner_key)?;
    let response = client.execute(&mut tx).await?;
    let receipt = client.wait_for_receipt(&response).await?;
    ensure_success(&receipt)?;

    Ok(format!(
        "🎉 Approved allowance on token {} from {} to {} with status {}\n\
         🔗 View the owner's allowances: {}",
        token_id,
        owner,
        spender,
        receipt.status,
        client.mirror().allowances_url(&owner)
    ))
}
