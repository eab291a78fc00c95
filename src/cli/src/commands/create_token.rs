//! Create-token command: a new NFT collection.

use crate::commands::ensure_success;
use crate::config;
use crate::errors::CliError;
use crate::inputs::{
    self, KeyPairOutput, TokenInfoInput, TokenSecrets, TOKEN_INFO_PATH,
};
use ledger::{
    PrivateKey, TokenSupplyType, TokenType, Transaction, TransactionBody,
};
use tracing::info;

/// Runs the create-token command. The collection's royalty schedule comes
/// from `input/token_info.json`; mint and burn rights go to a freshly
/// generated supply key written to the secrets file.
pub async fn run() -> Result<String, CliError> {
    let token_info: TokenInfoInput = inputs::read_json(TOKEN_INFO_PATH)?;
    inputs::validate_token_info(&token_info)?;
    let royalty_fees = inputs::royalty_fees(&token_info.royalties)?;

    let client = config::build_client()?;
    let treasury = config::account_id("TREASURY_ACCOUNT_ID")?;
    let treasury_key = config::private_key("TREASURY_PRIVATE_KEY")?;
    let auto_renew = config::account_id("AUTO_RENEW_ACCOUNT_ID")?;
    let auto_renew_key = config::private_key("AUTO_RENEW_PRIVATE_KEY")?;

    let supply_key = PrivateKey::generate();
    info!(
        "Creating NFT collection {} ({})",
        token_info.token_name, token_info.token_symbol
    );

    let body = TransactionBody::TokenCreate {
        name: token_info.token_name.clone(),
        symbol: token_info.token_symbol.clone(),
        decimals: 0,
        initial_supply: 0,
        max_supply: None,
        treasury,
        admin_key: Some(treasury_key.public_key()),
        supply_key: Some(supply_key.public_key()),
        auto_renew_account: Some(auto_renew),
        token_type: TokenType::NonFungibleUnique,
        supply_type: TokenSupplyType::Infinite,
        royalty_fees,
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
        decimals: None,
        max_supply: None,
        initial_supply: None,
        royalties: token_info.royalties.clone(),
        supply_key: KeyPairOutput {
            private_key: supply_key.to_string(),
            public_key: supply_key.public_key().to_string(),
        },
    };
    let path = inputs::write_secrets(&format!("token-secrets-{}.json", token_id), &secrets)?;

    Ok(format!(
        "🎉 Created token {} ({}) with ID {}\nSupply key written to {}",
        token_info.token_name,
        token_info.token_symbol,
        token_id,
        path.display()
    ))
}
