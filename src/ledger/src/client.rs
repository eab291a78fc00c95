//! Node client: JSON-RPC submission and receipt polling.

use crate::errors::LedgerError;
use crate::keys::{PrivateKey, PublicKey};
use crate::mirror::MirrorClient;
use crate::transaction::Transaction;
use crate::types::{AccountId, TokenId, TopicId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Default mainnet node endpoint.
pub const MAINNET_NODE_URL: &str = "https://mainnet.hashio.io/api";

/// Default testnet node endpoint.
pub const TESTNET_NODE_URL: &str = "https://testnet.hashio.io/api";

/// Default mainnet mirror node endpoint.
pub const MAINNET_MIRROR_URL: &str = "https://mainnet-public.mirrornode.hedera.com";

/// Default testnet mirror node endpoint.
pub const TESTNET_MIRROR_URL: &str = "https://testnet.mirrornode.hedera.com";

/// Interval between receipt polls.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Maximum number of receipt polls before giving up.
const RECEIPT_POLL_ATTEMPTS: u32 = 20;

/// Consensus status of a submitted transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    /// The transaction reached consensus and succeeded
    Success,
    /// The transaction is still waiting for consensus
    Pending,
    /// The node has not seen the transaction yet
    Unknown,
    /// The transaction reached consensus and failed
    Failed(String),
}

impl Status {
    fn as_str(&self) -> &str {
        match self {
            Status::Success => "SUCCESS",
            Status::Pending => "PENDING",
            Status::Unknown => "UNKNOWN",
            Status::Failed(reason) => reason,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Status {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(match s.as_str() {
            "SUCCESS" => Status::Success,
            "PENDING" => Status::Pending,
            "UNKNOWN" => Status::Unknown,
            other => Status::Failed(other.to_string()),
        })
    }
}

/// The node's acknowledgement of a submitted transaction.
#[derive(Clone, Debug)]
pub struct TransactionResponse {
    /// The node-assigned transaction ID
    pub transaction_id: String,
}

/// The consensus outcome of a transaction.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    /// The consensus status
    pub status: Status,
    /// The created account, for account-create transactions
    #[serde(default)]
    pub account_id: Option<AccountId>,
    /// The created token, for token-create transactions
    #[serde(default)]
    pub token_id: Option<TokenId>,
    /// The created topic, for topic-create transactions
    #[serde(default)]
    pub topic_id: Option<TopicId>,
    /// The serials minted, for mint transactions
    #[serde(default)]
    pub serials: Vec<u64>,
    /// Receipts of child transactions spawned by this one
    #[serde(default)]
    pub children: Vec<TransactionReceipt>,
}

/// The operator account paying for and signing transactions.
struct Operator {
    account_id: AccountId,
    key: PrivateKey,
}

/// A client for a ledger node.
pub struct Client {
    node_url: String,
    mirror_url: String,
    operator: Option<Operator>,
    poll_interval: Duration,
    poll_attempts: u32,
    http: reqwest::Client,
}

impl Client {
    /// Creates a client for mainnet.
    pub fn for_mainnet() -> Self {
        Self::for_network(MAINNET_NODE_URL, MAINNET_MIRROR_URL)
    }

    /// Creates a client for testnet.
    pub fn for_testnet() -> Self {
        Self::for_network(TESTNET_NODE_URL, TESTNET_MIRROR_URL)
    }

    /// Creates a client for a custom node and mirror node.
    pub fn for_network(node_url: &str, mirror_url: &str) -> Self {
        Self {
            node_url: node_url.to_string(),
            mirror_url: mirror_url.to_string(),
            operator: None,
            poll_interval: RECEIPT_POLL_INTERVAL,
            poll_attempts: RECEIPT_POLL_ATTEMPTS,
            http: reqwest::Client::new(),
        }
    }

    /// Sets the operator account that pays for transactions.
    pub fn set_operator(&mut self, account_id: AccountId, key: PrivateKey) {
        self.operator = Some(Operator { account_id, key });
    }

    /// Overrides the receipt polling cadence.
    pub fn set_receipt_polling(&mut self, interval: Duration, attempts: u32) {
        self.poll_interval = interval;
        self.poll_attempts = attempts;
    }

    /// Gets the operator account ID.
    pub fn operator_account_id(&self) -> Result<AccountId, LedgerError> {
        self.operator
            .as_ref()
            .map(|op| op.account_id)
            .ok_or_else(|| LedgerError::NodeRequestFailed("no operator configured".to_string()))
    }

    /// Gets the operator's public key.
    pub fn operator_public_key(&self) -> Result<PublicKey, LedgerError> {
        self.operator
            .as_ref()
            .map(|op| op.key.public_key())
            .ok_or_else(|| LedgerError::NodeRequestFailed("no operator configured".to_string()))
    }

    /// Gets a mirror node client for the same network.
    pub fn mirror(&self) -> MirrorClient {
        MirrorClient::new(&self.mirror_url)
    }

    /// Submits a frozen transaction to the node. The operator signature is
    /// attached first if it is not already present.
    pub async fn execute(&self, tx: &mut Transaction) -> Result<TransactionResponse, LedgerError> {
        if !tx.is_frozen() {
            return Err(LedgerError::TransactionNotFrozen("execution"));
        }

        if let Some(operator) = &self.operator {
            if !tx.is_signed_by(&operator.key.public_key()) {
                tx.sign(&operator.key)?;
            }
        }

        debug!("Submitting transaction {}", hex::encode(tx.hash()?));

        let result = self
            .rpc_call("submitTransaction", serde_json::json!([tx.to_hex()?]))
            .await?;

        let transaction_id = result
            .as_str()
            .ok_or_else(|| {
                LedgerError::NodeRequestFailed(format!("invalid transaction ID: {}", result))
            })?
            .to_string();

        Ok(TransactionResponse { transaction_id })
    }

    /// Waits for the receipt of a transaction, polling until the status
    /// settles or the attempts run out.
    pub async fn wait_for_receipt(
        &self,
        response: &TransactionResponse,
    ) -> Result<TransactionReceipt, LedgerError> {
        for attempt in 0..self.poll_attempts {
            let result = self
                .rpc_call(
                    "getReceipt",
                    serde_json::json!([response.transaction_id]),
                )
                .await?;

            let receipt: TransactionReceipt = serde_json::from_value(result)
                .map_err(|e| LedgerError::NodeRequestFailed(format!("invalid receipt: {}", e)))?;

            match receipt.status {
                Status::Pending | Status::Unknown => {
                    debug!(
                        "Receipt for {} not ready (attempt {})",
                        response.transaction_id, attempt
                    );
                    tokio::time::sleep(self.poll_interval).await;
                }
                _ => return Ok(receipt),
            }
        }

        Err(LedgerError::ReceiptTimeout(
            response.transaction_id.clone(),
        ))
    }

    /// Makes a JSON-RPC call and returns the `result` member.
    async fn rpc_call(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, LedgerError> {
        let response = self
            .http
            .post(rpc_url(&self.node_url))
            .json(&serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": method,
                "params": params
            }))
            .send()
            .await
            .map_err(|e| LedgerError::Network(format!("failed to connect to node: {}", e)))?;

        let response_text = response
            .text()
            .await
            .map_err(|e| LedgerError::Network(format!("failed to read response: {}", e)))?;

        if response_text.is_empty() {
            return Err(LedgerError::Network("empty response from node".to_string()));
        }

        let response_json: serde_json::Value = serde_json::from_str(&response_text)
            .map_err(|e| LedgerError::Network(format!("failed to parse response: {}", e)))?;

        if let Some(error) = response_json.get("error") {
            if !error.is_null() {
                return Err(LedgerError::NodeRequestFailed(error.to_string()));
            }
        }

        response_json
            .get("result")
            .cloned()
            .ok_or_else(|| {
                LedgerError::NodeRequestFailed(format!("no result in response: {}", response_text))
            })
    }
}

/// Normalizes a node URL to its `/rpc` endpoint.
fn rpc_url(node_url: &str) -> String {
    if node_url.ends_with("/rpc") {
        node_url.to_string()
    } else {
        format!("{}/rpc", node_url.trim_end_matches('/'))
    }
}
