//! Burn-nfts command.

use crate::commands::ensure_success;
use crate::config;
use crate::errors::CliError;
use crate::inputs::{self, BurnInput, SERIALS_TO_BURN_PATH};
use ledger::{PrivateKey, TokenId, Transaction, TransactionBody};
use tracing::info;

/// Runs the burn-nfts command: burns the serials listed in
/// `input/serials_to_burn.json`, signed by the supply key from the file or
/// from `NFT_SUPPLY_PRIVATE_KEY`.
pub async fn run() -> Result<String, CliError> {
    let burn_input: BurnInput = inputs::read_json(SERIALS_TO_BURN_PATH)?;
    if burn_input.serials.is_empty() {
        return Err(CliError::InvalidInput(format!(
            "{} contains no serials to burn",
            SERIALS_TO_BURN_PATH
        )));
    }

    let token_id = burn_input
        .token_id
        .parse::<TokenId>()
        .map_err(|e| CliError::InvalidInput(format!("tokenId is invalid: {}", e)))?;

    let supply_key = match &burn_input.supply_key {
        Some(raw) => raw
            .parse::<PrivateKey>()
            .map_err(|e| CliError::InvalidInput(format!("supplyKey is invalid: {}", e)))?,
        None => config::private_key("NFT_SUPPLY_PRIVATE_KEY")?,
    };

    let client = config::build_client()?;
    info!(
        "Burning {} serial(s) of token {}",
        burn_input.serials.len(),
        token_id
    );

    let body = TransactionBody::TokenBurn {
        token_id,
        serials: burn_input.serials.clone(),
    };

    let mut tx = Transaction::new(body).freeze()?;
    tx.sign(&supply_key)?;
    let response = client.execute(&mut tx).await?;
    let receipt = client.wait_for_receipt(&response).await?;
    ensure_success(&receipt)?;

    Ok(format!(
        "🔥 Burned serial(s) {:?} of token {}",
        burn_input.serials, token_id
    ))
}
