//! Client library for the distributed ledger.
//!
//! Everything a command-line operation needs: entity identifiers, key
//! material, transaction assembly and signing, a JSON-RPC node client with
//! receipt polling, a mirror node REST client, and a content-addressed
//! storage client.

pub mod client;
pub mod errors;
pub mod keys;
pub mod mirror;
pub mod storage;
pub mod transaction;
pub mod types;

// Re-export commonly used types
pub use client::{Client, Status, TransactionReceipt, TransactionResponse};
pub use errors::LedgerError;
pub use keys::{EcdsaPrivateKey, PrivateKey, PublicKey};
pub use mirror::MirrorClient;
pub use storage::{Cid, StorageClient};
pub use transaction::{
    RoyaltyFee, TokenSupplyType, TokenType, Transaction, TransactionBody, MAX_NFT_MINT_BATCH,
};
pub use types::{AccountId, EntityId, Hbar, NftId, TokenId, TopicId};
