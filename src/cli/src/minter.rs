//! The NFT mint pipeline.
//!
//! For each queued descriptor: resolve media references to local bytes or
//! pass-through URLs, upload binary assets to the content-addressed store,
//! assemble and validate a HIP-412 metadata document, upload it, and mint
//! the resulting metadata URI in fixed-size batches signed by the supply
//! key.

use crate::errors::CliError;
use crate::hip412;
use crate::inputs::{NftDescriptor, MEDIA_ROOT};
use ledger::{
    Client, PrivateKey, Status, StorageClient, TokenId, Transaction, TransactionBody,
    MAX_NFT_MINT_BATCH,
};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Mints a queue of NFT descriptors against a token.
pub struct Minter<'a> {
    client: &'a Client,
    storage: StorageClient,
    token_id: TokenId,
    supply_key: PrivateKey,
    merge_attributes: bool,
    network: String,
    media_root: PathBuf,
}

impl<'a> Minter<'a> {
    /// Creates a minter for the given token and supply key.
    pub fn new(
        client: &'a Client,
        storage: StorageClient,
        token_id: TokenId,
        supply_key: PrivateKey,
        merge_attributes: bool,
        network: &str,
    ) -> Self {
        Self {
            client,
            storage,
            token_id,
            supply_key,
            merge_attributes,
            network: network.to_string(),
            media_root: PathBuf::from(MEDIA_ROOT),
        }
    }

    /// Processes every descriptor in order, returning all minted serials.
    /// A failure on any descriptor aborts the run, naming the NFT.
    pub async fn mint_all(&self, queue: &[NftDescriptor]) -> Result<Vec<u64>, CliError> {
        println!(
            "\nMinting {} NFT(s) to token ID {}",
            queue.len(),
            self.token_id
        );

        let mut all_serials = Vec::new();

        for (i, nft) in queue.iter().enumerate() {
            println!("----------------------------------------");
            println!("⏳ Processing NFT {} of {}: {}...", i + 1, queue.len(), nft.name);

            let serials = self.generate_nft(nft).await.map_err(|e| {
                CliError::InvalidInput(format!(
                    "error while minting NFT number {} - {}: {}",
                    i + 1,
                    nft.name,
                    e
                ))
            })?;

            match serials.as_slice() {
                [] => println!("✅ Successfully minted NFTs"),
                [only] => println!("✅ Successfully minted serial #{}", only),
                [first, .., last] => {
                    println!("✅ Successfully minted serials #{} to #{}", first, last)
                }
            }
            println!(
                "🔗 View on Hash Scan: https://hashscan.io/{}/token/{}",
                self.network, self.token_id
            );

            all_serials.extend(serials);
        }

        Ok(all_serials)
    }

    async fn generate_nft(&self, nft: &NftDescriptor) -> Result<Vec<u64>, CliError> {
        // The image either passes through as a URL or is uploaded from disk
        let image_uri = if is_url(&nft.image) {
            nft.image.clone()
        } else {
            self.upload_media(&nft.image, &nft.mime_type).await?
        };

        let mut file_entries = Vec::new();
        for file in &nft.files {
            let (uri, mime_type) = match (&file.uri, &file.mime_type) {
                (Some(uri), Some(mime_type)) => (uri, mime_type),
                _ => {
                    return Err(CliError::InvalidInput(format!(
                        "invalid file data for NFT {} - uri: {:?} - type: {:?}",
                        nft.name, file.uri, file.mime_type
                    )))
                }
            };

            let resolved = if is_url(uri) {
                uri.clone()
            } else {
                self.upload_media(uri, mime_type).await?
            };
            file_entries.push(json!({ "uri": resolved, "type": mime_type }));
        }

        let properties = merged_properties(nft, self.merge_attributes);
        let metadata = build_metadata(nft, &image_uri, file_entries, properties);

        hip412::validate(&metadata)?;
        println!("🙌 Standards FTW! The metadata passes HIP-412 validation");

        println!("📤 Uploading metadata.json to IPFS, please wait...");
        let metadata_bytes = serde_json::to_vec_pretty(&metadata)?;
        let cid = self
            .storage
            .store("metadata.json", metadata_bytes, "application/json")
            .await?;
        println!("👍 Metadata uploaded, view it here: {}", cid.gateway_url());

        let metadata_uri = format!("ipfs://{}/metadata.json", cid);
        self.batch_mint(&metadata_uri, nft.quantity).await
    }

    async fn upload_media(&self, path: &str, mime_type: &str) -> Result<String, CliError> {
        let file_name = file_name_of(path);
        let full_path = self.media_root.join(path);
        let bytes = fs::read(&full_path).map_err(|e| {
            CliError::InputFile(full_path.display().to_string(), e.to_string())
        })?;

        println!("📤 Uploading {} to IPFS, please wait...", file_name);
        let cid = self.storage.store(file_name, bytes, mime_type).await?;
        println!("👌 Uploaded, view it here: {}", cid.gateway_url());

        Ok(cid.ipfs_uri())
    }

    async fn batch_mint(&self, metadata_uri: &str, quantity: u64) -> Result<Vec<u64>, CliError> {
        let total = quantity as usize;
        let mut minted = Vec::new();

        for batch in batch_sizes(total, MAX_NFT_MINT_BATCH) {
            let body = TransactionBody::TokenMint {
                token_id: self.token_id,
                metadata: vec![metadata_uri.as_bytes().to_vec(); batch],
            };

            let mut tx = Transaction::new(body).freeze()?;
            tx.sign(&self.supply_key)?;

            let response = self.client.execute(&mut tx).await?;
            let receipt = self.client.wait_for_receipt(&response).await?;
            if receipt.status != Status::Success {
                return Err(CliError::TransactionFailed(receipt.status.to_string()));
            }

            debug!("Batch of {} minted as {:?}", batch, receipt.serials);
            minted.extend(receipt.serials);
            println!(
                "🖌️ Minted {}/{} serials for token {}",
                minted.len(),
                total,
                self.token_id
            );
        }

        Ok(minted)
    }
}

/// Whether a media reference is a URL rather than a local file path.
pub(crate) fn is_url(s: &str) -> bool {
    reqwest::Url::parse(s).is_ok()
}

/// The final component of a media path, used as the upload file name.
pub(crate) fn file_name_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Splits a quantity into mint batches bounded by `max`.
pub fn batch_sizes(total: usize, max: usize) -> Vec<usize> {
    let mut sizes = Vec::new();
    let mut remaining = total;
    while remaining > 0 {
        let batch = remaining.min(max);
        sizes.push(batch);
        remaining -= batch;
    }
    sizes
}

/// The properties object for the metadata document, optionally folding
/// trait attributes in as plain key/value pairs.
pub fn merged_properties(nft: &NftDescriptor, merge: bool) -> Option<Value> {
    if !merge {
        return nft.properties.clone();
    }

    let mut properties = match &nft.properties {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };

    if let Some(attributes) = &nft.attributes {
        for attribute in attributes {
            properties.insert(attribute.trait_type.clone(), attribute.value.clone());
        }
    }

    if properties.is_empty() {
        None
    } else {
        Some(Value::Object(properties))
    }
}

/// Assembles the HIP-412 document. Absent optional sections are omitted
/// entirely; the schema forbids unknown keys, so nothing else goes in.
pub fn build_metadata(
    nft: &NftDescriptor,
    image_uri: &str,
    files: Vec<Value>,
    properties: Option<Value>,
) -> Value {
    let mut metadata = Map::new();
    metadata.insert("name".to_string(), json!(nft.name));
    if let Some(creator) = &nft.creator {
        metadata.insert("creator".to_string(), json!(creator));
    }
    if let Some(description) = &nft.description {
        metadata.insert("description".to_string(), json!(description));
    }
    metadata.insert("image".to_string(), json!(image_uri));
    metadata.insert("type".to_string(), json!(nft.mime_type));
    metadata.insert(
        "format".to_string(),
        json!(nft.format.as_deref().unwrap_or(hip412::METADATA_FORMAT)),
    );
    if !files.is_empty() {
        metadata.insert("files".to_string(), Value::Array(files));
    }
    if let Some(properties) = properties {
        metadata.insert("properties".to_string(), properties);
    }
    if let Some(attributes) = &nft.attributes {
        metadata.insert(
            "attributes".to_string(),
            serde_json::to_value(attributes).unwrap_or(Value::Null),
        );
    }

    Value::Object(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hip412;

    fn descriptor() -> NftDescriptor {
        serde_json::from_value(serde_json::json!({
            "name": "Blue Pod",
            "creator": "Pod Works",
            "description": "A very blue pod",
            "image": "pods/blue.png",
            "type": "image/png",
            "quantity": 25,
            "properties": { "edition": 1 },
            "attributes": [{ "trait_type": "color", "value": "blue" }]
        }))
        .unwrap()
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/pod.png"));
        assert!(is_url("ipfs://bafybeigdyrzt5example"));
        assert!(!is_url("pods/blue.png"));
        assert!(!is_url("blue.png"));
    }

    #[test]
    fn test_file_name_of() {
        assert_eq!(file_name_of("pods/blue.png"), "blue.png");
        assert_eq!(file_name_of("blue.png"), "blue.png");
    }

    #[test]
    fn test_batch_sizes() {
        assert_eq!(batch_sizes(25, 10), vec![10, 10, 5]);
        assert_eq!(batch_sizes(10, 10), vec![10]);
        assert_eq!(batch_sizes(3, 10), vec![3]);
        assert!(batch_sizes(0, 10).is_empty());
    }

    #[test]
    fn test_merged_properties() {
        let nft = descriptor();

        // Without the merge flag the properties pass through untouched
        let plain = merged_properties(&nft, false).unwrap();
        assert_eq!(plain, serde_json::json!({ "edition": 1 }));

        // With the flag, attributes fold in as key/value pairs
        let merged = merged_properties(&nft, true).unwrap();
        assert_eq!(merged, serde_json::json!({ "edition": 1, "color": "blue" }));
    }

    #[test]
    fn test_build_metadata_passes_schema_validation() {
        let nft = descriptor();
        let metadata = build_metadata(
            &nft,
            "ipfs://bafybeigdyrzt5example",
            vec![serde_json::json!({ "uri": "ipfs://bafybeigdyrzt5x", "type": "video/mp4" })],
            merged_properties(&nft, true),
        );

        hip412::validate(&metadata).unwrap();
        assert_eq!(metadata["format"], hip412::METADATA_FORMAT);
        assert_eq!(metadata["image"], "ipfs://bafybeigdyrzt5example");
    }

    #[test]
    fn test_build_metadata_omits_empty_sections() {
        let nft: NftDescriptor = serde_json::from_value(serde_json::json!({
            "name": "Bare",
            "image": "bare.png",
            "type": "image/png"
        }))
        .unwrap();

        let metadata = build_metadata(&nft, "ipfs://bafybeigdyrzt5example", vec![], None);
        let object = metadata.as_object().unwrap();
        assert!(!object.contains_key("files"));
        assert!(!object.contains_key("properties"));
        assert!(!object.contains_key("attributes"));
        assert!(!object.contains_key("creator"));

        hip412::validate(&metadata).unwrap();
    }
}
