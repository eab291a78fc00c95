//! Mint-nfts command.

use crate::config;
use crate::errors::CliError;
use crate::inputs::{self, NftDescriptor, MINT_QUEUE_PATH};
use crate::minter::Minter;
use ledger::StorageClient;

/// Runs the mint-nfts command: the mint pipeline over every descriptor in
/// `input/mint_queue.json`.
pub async fn run() -> Result<String, CliError> {
    let queue: Vec<NftDescriptor> = inputs::read_json(MINT_QUEUE_PATH)?;
    if queue.is_empty() {
        return Err(CliError::InvalidInput(format!(
            "{} contains no NFTs to mint",
            MINT_QUEUE_PATH
        )));
    }

    let client = config::build_client()?;
    let token_id = config::token_id("NFT_TOKEN_ID")?;
    let supply_key = config::private_key("NFT_SUPPLY_PRIVATE_KEY")?;
    let storage = StorageClient::new(&config::require_env("NFT_STORAGE_KEY")?);
    let merge_attributes = config::env_flag("MERGE_ATTRIBUTES_TO_PROPERTIES");

    let minter = Minter::new(
        &client,
        storage,
        token_id,
        supply_key,
        merge_attributes,
        &config::network_name(),
    );
    let serials = minter.mint_all(&queue).await?;

    Ok(format!(
        "🎉 Minted {} serial(s) across {} NFT(s) for token {}",
        serials.len(),
        queue.len(),
        token_id
    ))
}
