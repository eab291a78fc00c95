//! Create-ft command: a new fungible token.

use crate::commands::ensure_success;
use crate::config;
use crate::errors::CliError;
use crate::inputs::{
    self, KeyPairOutput, TokenInfoInput, TokenSecrets, TOKEN_INFO_PATH,
};
use ledger::{
    PrivateKey, TokenId, TokenSupplyType, TokenType, Transaction, TransactionBody,
};
use tracing::info;

/// The secrets file written for a new fungible token.
fn secrets_file_name(token_id: &TokenId) -> String {
    format!("fungible-token-secrets-{}.json", token_id)
}

/// Runs the create-ft command. Decimals and supply figures come from
/// `input/token_info.json`; the supply key comes from `SUPPLY_PRIVATE_KEY`
/// or is freshly generated when the variable is absent.
pub async fn run() -> Result<String, CliError> {
    let token_info: TokenInfoInput = inputs::read_json(TOKEN_INFO_PATH)?;
    inputs::validate_token_info(&token_info)?;

    let decimals = token_info.decimals.unwrap_or(0);
    let initial_supply = token_info.initial_supply.unwrap_or(0);
    let max_supply = token_info.max_supply.ok_or_else(|| {
        CliError::InvalidInput("token info must contain 'maxSupply' for a fungible token".to_string())
    })?;
    if initial_supply > max_supply {
        return Err(CliError::InvalidInput(format!(
            "'initialSupply' {} cannot exceed 'maxSupply' {}",
            initial_supply, max_supply
        )));
    }

    let client = config::build_client()?;
    let treasury = config::account_id("TREASURY_ACCOUNT_ID")?;
    let treasury_key = config::private_key("TREASURY_PRIVATE_KEY")?;
    let auto_renew = config::account_id("AUTO_RENEW_ACCOUNT_ID")?;
    let auto_renew_key = config::private_key("AUTO_RENEW_PRIVATE_KEY")?;

    let supply_key = match config::env_opt("SUPPLY_PRIVATE_KEY") {
        Some(raw) => raw
            .parse::<PrivateKey>()
            .map_err(|e| CliError::InvalidInput(format!("SUPPLY_PRIVATE_KEY is invalid: {}", e)))?,
        None => PrivateKey::generate(),
    };

    info!(
        "Creating fungible token {} ({}) with max supply {}",
        token_info.token_name, token_info.token_symbol, max_supply
    );

    let body = TransactionBody::TokenCreate {
        name: token_info.token_name.clone(),
        symbol: token_info.token_symbol.clone(),
        decimals,
        initial_supply,
        max_supply: Some(max_supply),
        treasury,
        admin_key: Some(treasury_key.public_key()),
        supply_key: Some(supply_key.public_key()),
        auto_renew_account: Some(auto_renew),
        token_type: TokenType::FungibleCommon,
        supply_type: TokenSupplyType::Finite,
        royalty_fees: vec![],
    };

    let mut tx = Transaction::new(body).freeze()?;
    tx.sign(&treasury_key)?;
    tx.sign(&auto_renew_key)?;
    tx.sign(&supply_key)?;

    let response = client.execute(&mut tx).await?;
    let receipt = client.wait_for_receipt(&response).await?;
    ensure_success(&receipt)?;

    let token_id = receipt
        .token_id
        .ok_or_else(|| CliError::InvalidInput("receipt carries no token ID".to_string()))?;

    let secrets = TokenSecrets {
        token_id: token_id.to_string(),
        token_name: token_info.token_name.clone(),
        token_symbol: token_info.token_symbol.clone(),
        decimals: Some(decimals),
        max_supply: Some(max_supply),
        initial_supply: Some(initial_supply),
        royalties: vec![],
        supply_key: KeyPairOutput {
            private_key: supply_key.to_string(),
            public_key: supply_key.public_key().to_string(),
        },
    };
    let path = inputs::write_secrets(&secrets_file_name(&token_id), &secrets)?;

    Ok(format!(
        "🎉 Created fungible token {} ({}) with ID {}\n\
         {} units minted to the treasury, supply capped at {}\n\
         Supply key written to {}",
        token_info.token_name,
        token_info.token_symbol,
        token_id,
        initial_supply,
        max_supply,
        path.display()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger::EntityId;

    #[test]
    fn test_secrets_file_name() {
        assert_eq!(
            secrets_file_name(&EntityId::new(4821)),
            "fungible-token-secrets-0.0.4821.json"
        );
    }
}
