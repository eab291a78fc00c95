//! Content-addressed storage client.
//!
//! Uploads bytes to an nft.storage-style pinning service and returns the
//! resulting content identifier. The service deduplicates by content, so
//! re-uploading the same bytes yields the same CID.

use crate::errors::LedgerError;
use serde::Deserialize;
use std::fmt;
use tracing::debug;

/// Default pinning service endpoint.
pub const DEFAULT_STORAGE_URL: &str = "https://api.nft.storage";

/// A content identifier returned by the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cid(String);

impl Cid {
    /// The `ipfs://` URI for this CID.
    pub fn ipfs_uri(&self) -> String {
        format!("ipfs://{}", self.0)
    }

    /// The public HTTP gateway URL for this CID.
    pub fn gateway_url(&self) -> String {
        format!("https://{}.ipfs.nftstorage.link", self.0)
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    ok: bool,
    value: Option<UploadValue>,
    error: Option<UploadError>,
}

#[derive(Debug, Deserialize)]
struct UploadValue {
    cid: String,
}

#[derive(Debug, Deserialize)]
struct UploadError {
    message: String,
}

/// A client for a content-addressed pinning service.
pub struct StorageClient {
    base_url: String,
    token: String,
    http: reqwest::Client,
}

impl StorageClient {
    /// Creates a storage client with the given API token.
    pub fn new(token: &str) -> Self {
        Self::with_base_url(DEFAULT_STORAGE_URL, token)
    }

    /// Creates a storage client against a custom endpoint.
    pub fn with_base_url(base_url: &str, token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Stores a file and returns its CID.
    pub async fn store(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<Cid, LedgerError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| {
                LedgerError::StorageUploadFailed(format!("invalid content type: {}", e))
            })?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/upload", self.base_url))
            .bearer_auth(&self.token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| LedgerError::StorageUploadFailed(e.to_string()))?;

        let status = response.status();
        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| LedgerError::StorageUploadFailed(format!("invalid response: {}", e)))?;

        if !status.is_success() || !body.ok {
            let message = body
                .error
                .map(|e| e.message)
                .unwrap_or_else(|| format!("upload returned {}", status));
            return Err(LedgerError::StorageUploadFailed(message));
        }

        let cid = body
            .value
            .map(|v| Cid(v.cid))
            .ok_or_else(|| LedgerError::StorageUploadFailed("no CID in response".to_string()))?;

        debug!("Stored {} as {}", file_name, cid);
        Ok(cid)
    }
}
