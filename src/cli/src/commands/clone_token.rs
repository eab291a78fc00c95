//! Clone-token command: copy a mainnet collection onto the target network.

use crate::commands::ensure_success;
use crate::config;
use crate::errors::CliError;
use ledger::mirror::MirrorTokenInfo;
use ledger::{
    AccountId, MirrorClient, PublicKey, TokenId, TokenSupplyType, TokenType, Transaction,
    TransactionBody, MAX_NFT_MINT_BATCH,
};
use tracing::info;

/// Runs the clone-token command: fetch the source collection's details and
/// NFT metadata from the mainnet mirror node, recreate the token on the
/// configured network, then mint every collected metadata entry. The
/// treasury key becomes both admin and supply key of the clone.
pub async fn run(source_token_id: TokenId, total_supply: Option<usize>) -> Result<String, CliError> {
    let mirror = MirrorClient::mainnet();

    let total_label = total_supply
        .map(|n| n.to_string())
        .unwrap_or_else(|| "all".to_string());
    println!(
        "🐑🐑 Cloning {} NFTs from mainnet token {}...",
        total_label, source_token_id
    );

    let token_info = mirror.token_info(&source_token_id).await?;
    let metadata = mirror
        .collect_nft_metadata(&source_token_id, total_supply)
        .await?;
    println!(
        "👌 Collected {} of {} metadata entries for {} ({})",
        metadata.len(),
        token_info.total_supply,
        token_info.name,
        token_info.symbol
    );

    let client = config::build_client()?;
    let treasury = config::account_id("TREASURY_ACCOUNT_ID")?;
    let treasury_key = config::private_key("TREASURY_PRIVATE_KEY")?;
    let auto_renew = config::account_id("AUTO_RENEW_ACCOUNT_ID")?;

    let body = clone_body(
        &token_info,
        treasury,
        &treasury_key.public_key(),
        auto_renew,
    );

    let mut tx = Transaction::new(body).freeze()?;
    tx.sign(&treasury_key)?;
    let response = client.execute(&mut tx).await?;
    let receipt = client.wait_for_receipt(&response).await?;
    ensure_success(&receipt)?;

    let token_id = receipt
        .token_id
        .ok_or_else(|| CliError::InvalidInput("receipt carries no token ID".to_string()))?;
    info!("Cloned token created with ID {}", token_id);

    let total = metadata.len();
    let mut minted = 0;
    for batch in metadata.chunks(MAX_NFT_MINT_BATCH) {
        let body = TransactionBody::TokenMint {
            token_id,
            metadata: batch.to_vec(),
        };

        let mut tx = Transaction::new(body).freeze()?;
        tx.sign(&treasury_key)?;
        let response = client.execute(&mut tx).await?;
        let receipt = client.wait_for_receipt(&response).await?;
        ensure_success(&receipt)?;

        minted += batch.len();
        println!("🖌️ Minted {}/{} serials for token {}", minted, total, token_id);
    }

    Ok(format!(
        "🎉 Cloned token {} as {} and minted {} serials",
        source_token_id, token_id, minted
    ))
}

/// The token-create body for a clone: same name, symbol, and decimals as
/// the source; the treasury key holds both the admin and supply roles.
fn clone_body(
    info: &MirrorTokenInfo,
    treasury: AccountId,
    treasury_key: &PublicKey,
    auto_renew: AccountId,
) -> TransactionBody {
    TransactionBody::TokenCreate {
        name: info.name.clone(),
        symbol: info.symbol.clone(),
        decimals: info.decimals,
        initial_supply: 0,
        max_supply: None,
        treasury,
        admin_key: Some(*treasury_key),
        supply_key: Some(*treasury_key),
        auto_renew_account: Some(auto_renew),
        token_type: TokenType::NonFungibleUnique,
        supply_type: TokenSupplyType::Infinite,
        royalty_fees: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger::{EntityId, PrivateKey};

    #[test]
    fn test_clone_body_assigns_treasury_key_roles() {
        let treasury_key = PrivateKey::generate().public_key();
        let info = MirrorTokenInfo {
            name: "Jedi Knights".to_string(),
            symbol: "JEDI".to_string(),
            decimals: 0,
            total_supply: 300,
        };

        let body = clone_body(&info, EntityId::new(1001), &treasury_key, EntityId::new(1002));
        match body {
            TransactionBody::TokenCreate {
                name,
                symbol,
                decimals,
                initial_supply,
                max_supply,
                treasury,
                admin_key,
                supply_key,
                auto_renew_account,
                token_type,
                supply_type,
                royalty_fees,
            } => {
                assert_eq!(name, "Jedi Knights");
                assert_eq!(symbol, "JEDI");
                assert_eq!(decimals, 0);
                assert_eq!(initial_supply, 0);
                assert_eq!(max_supply, None);
                assert_eq!(treasury, EntityId::new(1001));
                // The treasury key holds both admin and supply
                assert_eq!(admin_key, Some(treasury_key));
                assert_eq!(supply_key, Some(treasury_key));
                assert_eq!(auto_renew_account, Some(EntityId::new(1002)));
                assert_eq!(token_type, TokenType::NonFungibleUnique);
                assert_eq!(supply_type, TokenSupplyType::Infinite);
                assert!(royalty_fees.is_empty());
            }
            _ => unreachable!(),
        }
    }
}
