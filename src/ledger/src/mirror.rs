//! Mirror node REST client.
//!
//! The mirror node exposes consensus history over plain REST; the toolkit
//! uses it to look up token details, walk a token's NFTs page by page, and
//! link to allowance listings.

use crate::errors::LedgerError;
use crate::types::{AccountId, NftId, TokenId};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use tracing::debug;

/// Page size used when walking a token's NFTs.
const NFT_PAGE_LIMIT: usize = 100;

/// Token details as reported by the mirror node.
#[derive(Clone, Debug, Deserialize)]
pub struct MirrorTokenInfo {
    /// Token name
    pub name: String,
    /// Token symbol
    pub symbol: String,
    /// Number of decimal places
    #[serde(deserialize_with = "number_or_string")]
    pub decimals: u32,
    /// Total minted supply
    #[serde(deserialize_with = "number_or_string")]
    pub total_supply: u64,
}

// The mirror node serves numeric token fields as either JSON numbers or
// decimal strings, depending on the field and API version.
fn number_or_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: std::str::FromStr + Deserialize<'de>,
    T::Err: std::fmt::Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<T> {
        Number(T),
        Text(String),
    }

    match Raw::<T>::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// One NFT on a mirror node page.
#[derive(Clone, Debug, Deserialize)]
pub struct MirrorNft {
    /// Serial number within the token
    pub serial_number: u64,
    /// Base64-encoded metadata bytes
    pub metadata: String,
}

#[derive(Debug, Deserialize)]
struct NftPage {
    nfts: Vec<MirrorNft>,
    links: PageLinks,
}

#[derive(Debug, Deserialize)]
struct PageLinks {
    next: Option<String>,
}

/// A client for a mirror node's REST API.
pub struct MirrorClient {
    base_url: String,
    http: reqwest::Client,
}

impl MirrorClient {
    /// Creates a mirror client for the given base URL.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Creates a mirror client for the public mainnet mirror node.
    pub fn mainnet() -> Self {
        Self::new(crate::client::MAINNET_MIRROR_URL)
    }

    /// Fetches token details.
    pub async fn token_info(&self, token_id: &TokenId) -> Result<MirrorTokenInfo, LedgerError> {
        let url = format!("{}/api/v1/tokens/{}", self.base_url, token_id);
        let info = self
            .get(&url)
            .await?
            .json::<MirrorTokenInfo>()
            .await
            .map_err(|e| LedgerError::MirrorRequestFailed(format!("invalid token info: {}", e)))?;
        Ok(info)
    }

    /// Collects the metadata of every NFT of a token in serial order,
    /// following pagination links. Stops early once `limit` entries have
    /// been collected, truncating to exactly `limit`.
    pub async fn collect_nft_metadata(
        &self,
        token_id: &TokenId,
        limit: Option<usize>,
    ) -> Result<Vec<Vec<u8>>, LedgerError> {
        let mut metadata = Vec::new();
        let mut next_path = Some(format!(
            "/api/v1/tokens/{}/nfts?order=asc&limit={}",
            token_id, NFT_PAGE_LIMIT
        ));

        while let Some(path) = next_path {
            let url = format!("{}{}", self.base_url, path);
            let page = self
                .get(&url)
                .await?
                .json::<NftPage>()
                .await
                .map_err(|e| {
                    LedgerError::MirrorRequestFailed(format!("invalid NFT page: {}", e))
                })?;

            if let Some(first) = page.nfts.first() {
                debug!(
                    "Collected page starting at {}",
                    NftId::new(*token_id, first.serial_number)
                );
            }

            metadata.extend(decode_entries(&page.nfts)?);

            if let Some(limit) = limit {
                if metadata.len() >= limit {
                    break;
                }
            }

            next_path = page.links.next;
        }

        if let Some(limit) = limit {
            metadata.truncate(limit);
        }

        Ok(metadata)
    }

    /// The URL listing an account's token allowances.
    pub fn allowances_url(&self, account_id: &AccountId) -> String {
        format!(
            "{}/api/v1/accounts/{}/allowances/tokens",
            self.base_url, account_id
        )
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, LedgerError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| LedgerError::MirrorRequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LedgerError::MirrorRequestFailed(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        Ok(response)
    }
}

/// Decodes the base64 metadata of a page of NFTs.
fn decode_entries(nfts: &[MirrorNft]) -> Result<Vec<Vec<u8>>, LedgerError> {
    nfts.iter()
        .map(|nft| {
            BASE64.decode(&nft.metadata).map_err(|e| {
                LedgerError::MirrorRequestFailed(format!(
                    "invalid metadata on serial {}: {}",
                    nft.serial_number, e
                ))
            })
        })
        .collect()
}
