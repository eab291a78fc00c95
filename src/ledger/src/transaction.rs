//! Transaction assembly and signing.
//!
//! Every operation the toolkit performs is a single [`Transaction`]: a body
//! describing the operation, a maximum fee fixed at freeze time, and one or
//! more ed25519 signatures over the frozen body bytes.

use crate::errors::LedgerError;
use crate::keys::{PrivateKey, PublicKey};
use crate::types::{AccountId, Hbar, TokenId, TopicId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Maximum number of metadata entries in a single mint transaction.
pub const MAX_NFT_MINT_BATCH: usize = 10;

/// Default maximum transaction fee (100 ℏ).
pub const DEFAULT_MAX_TRANSACTION_FEE: Hbar = Hbar::from_tinybars(100 * 100_000_000);

/// Whether a token is fungible or a collection of unique serials.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenType {
    /// Interchangeable units with a shared denomination
    FungibleCommon,
    /// Unique serials, each with its own metadata
    NonFungibleUnique,
}

/// Whether a token's supply is capped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenSupplyType {
    /// Supply is capped at `max_supply`
    Finite,
    /// Supply is unbounded
    Infinite,
}

/// A royalty fee attached to a token.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoyaltyFee {
    /// The account collecting the fee
    pub collector: AccountId,
    /// Fee numerator
    pub numerator: u64,
    /// Fee denominator
    pub denominator: u64,
    /// Fixed hbar fee charged when the exchanged value carries no fungible
    /// component
    pub fallback_fee: Option<Hbar>,
    /// Whether fee collectors are exempt from the fee
    pub all_collectors_exempt: bool,
}

/// The operation a transaction performs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum TransactionBody {
    /// Create a new account.
    AccountCreate {
        /// The account's key
        key: PublicKey,
        /// The starting balance, funded by the payer
        initial_balance: Hbar,
        /// Optional EVM address alias
        evm_alias: Option<[u8; 20]>,
    },

    /// Create a new token.
    TokenCreate {
        /// Token name
        name: String,
        /// Token symbol
        symbol: String,
        /// Number of decimal places
        decimals: u32,
        /// Units minted to the treasury at creation
        initial_supply: u64,
        /// Supply ceiling, required for finite supply
        max_supply: Option<u64>,
        /// The treasury account
        treasury: AccountId,
        /// Key allowed to update the token
        admin_key: Option<PublicKey>,
        /// Key allowed to mint and burn
        supply_key: Option<PublicKey>,
        /// Account paying for automatic renewal
        auto_renew_account: Option<AccountId>,
        /// Fungible or non-fungible
        token_type: TokenType,
        /// Finite or infinite supply
        supply_type: TokenSupplyType,
        /// Royalty fees charged on exchanges
        royalty_fees: Vec<RoyaltyFee>,
    },

    /// Mint serials (or units) of an existing token.
    TokenMint {
        /// The token to mint against
        token_id: TokenId,
        /// One metadata entry per serial
        metadata: Vec<Vec<u8>>,
    },

    /// Burn serials of an existing token.
    TokenBurn {
        /// The token to burn from
        token_id: TokenId,
        /// The serials to burn
        serials: Vec<u64>,
    },

    /// Move hbar and token units between accounts.
    CryptoTransfer {
        /// Hbar legs; must net to zero
        hbar_transfers: Vec<(AccountId, Hbar)>,
        /// Token legs; must net to zero per token
        token_transfers: Vec<(TokenId, AccountId, i64)>,
        /// Token legs addressed to EVM address aliases
        alias_transfers: Vec<(TokenId, [u8; 20], i64)>,
    },

    /// Approve an all-serials NFT allowance.
    AllowanceApprove {
        /// The token the allowance covers
        token_id: TokenId,
        /// The owner granting the allowance
        owner: AccountId,
        /// The spender receiving the allowance
        spender: AccountId,
    },

    /// Create an append-only topic.
    TopicCreate {
        /// Key allowed to update or delete the topic
        admin_key: Option<PublicKey>,
        /// Short topic description
        memo: String,
    },

    /// Submit a message to a topic.
    TopicSubmit {
        /// The topic to post to
        topic_id: TopicId,
        /// The message payload
        message: Vec<u8>,
    },
}

/// A public key paired with a signature over the transaction body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignaturePair {
    /// The signing key
    pub public_key: PublicKey,
    /// Hex-encoded ed25519 signature
    pub signature: String,
}

/// A single request to the ledger: body, fee ceiling, and signatures.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    /// The operation to perform
    pub body: TransactionBody,
    /// The maximum fee the payer will accept
    pub max_fee: Hbar,
    /// Signatures collected so far
    pub signatures: Vec<SignaturePair>,
    #[serde(skip, default)]
    frozen: bool,
}

impl Transaction {
    /// Creates a new transaction with the default maximum fee.
    pub fn new(body: TransactionBody) -> Self {
        Self {
            body,
            max_fee: DEFAULT_MAX_TRANSACTION_FEE,
            signatures: Vec::new(),
            frozen: false,
        }
    }

    /// Sets the maximum fee. Fails once the transaction is frozen.
    pub fn set_max_fee(mut self, max_fee: Hbar) -> Result<Self, LedgerError> {
        if self.frozen {
            return Err(LedgerError::TransactionFrozen);
        }
        self.max_fee = max_fee;
        Ok(self)
    }

    /// Validates the body and fixes the transaction for signing.
    pub fn freeze(mut self) -> Result<Self, LedgerError> {
        if self.frozen {
            return Err(LedgerError::TransactionFrozen);
        }
        self.validate_body()?;
        self.frozen = true;
        Ok(self)
    }

    /// Whether the transaction has been frozen.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// The bytes every signature covers: the serialized frozen body.
    pub fn sign_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        bincode::serialize(&self.body).map_err(|e| LedgerError::Serialization(e.to_string()))
    }

    /// Signs the transaction, appending a signature pair. Signing twice with
    /// the same key is a no-op.
    pub fn sign(&mut self, key: &PrivateKey) -> Result<(), LedgerError> {
        if !self.frozen {
            return Err(LedgerError::TransactionNotFrozen("signing"));
        }

        let public_key = key.public_key();
        if self.is_signed_by(&public_key) {
            return Ok(());
        }

        let signature = key.sign(&self.sign_bytes()?);
        self.signatures.push(SignaturePair {
            public_key,
            signature: hex::encode(signature.to_bytes()),
        });
        Ok(())
    }

    /// Whether a signature from the given key is already attached.
    pub fn is_signed_by(&self, public_key: &PublicKey) -> bool {
        self.signatures
            .iter()
            .any(|pair| &pair.public_key == public_key)
    }

    /// Hex-encodes the whole signed transaction for submission.
    pub fn to_hex(&self) -> Result<String, LedgerError> {
        let bytes =
            bincode::serialize(self).map_err(|e| LedgerError::Serialization(e.to_string()))?;
        Ok(hex::encode(bytes))
    }

    /// Computes the SHA-256 hash of the signed transaction.
    pub fn hash(&self) -> Result<[u8; 32], LedgerError> {
        let bytes =
            bincode::serialize(self).map_err(|e| LedgerError::Serialization(e.to_string()))?;
        let digest = Sha256::digest(&bytes);
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&digest);
        Ok(hash)
    }

    fn validate_body(&self) -> Result<(), LedgerError> {
        match &self.body {
            TransactionBody::TokenMint { metadata, .. } => {
                if metadata.len() > MAX_NFT_MINT_BATCH {
                    return Err(LedgerError::MintBatchTooLarge {
                        count: metadata.len(),
                        max: MAX_NFT_MINT_BATCH,
                    });
                }
                Ok(())
            }
            TransactionBody::CryptoTransfer {
                hbar_transfers,
                token_transfers,
                alias_transfers,
            } => {
                let hbar_sum: i128 = hbar_transfers
                    .iter()
                    .map(|(_, amount)| amount.to_tinybars() as i128)
                    .sum();
                if hbar_sum != 0 {
                    return Err(LedgerError::UnbalancedTransfer(format!(
                        "hbar legs net to {} tinybars",
                        hbar_sum
                    )));
                }

                let mut token_sums: HashMap<TokenId, i128> = HashMap::new();
                for (token_id, _, amount) in token_transfers {
                    *token_sums.entry(*token_id).or_default() += *amount as i128;
                }
                for (token_id, _, amount) in alias_transfers {
                    *token_sums.entry(*token_id).or_default() += *amount as i128;
                }
                for (token_id, sum) in token_sums {
                    if sum != 0 {
                        return Err(LedgerError::UnbalancedTransfer(format!(
                            "token {} legs net to {}",
                            token_id, sum
                        )));
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
