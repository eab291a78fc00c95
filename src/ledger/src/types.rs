//! Entity identifiers and amounts for the distributed ledger.

use crate::errors::LedgerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

/// Number of tinybars in one hbar.
pub const HBAR_TO_TINYBAR: i64 = 100_000_000;

/// An entity identifier in `shard.realm.num` form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityId {
    /// The shard number
    pub shard: u64,
    /// The realm number
    pub realm: u64,
    /// The entity number within the realm
    pub num: u64,
}

/// An account identifier.
pub type AccountId = EntityId;

/// A token identifier.
pub type TokenId = EntityId;

/// A topic identifier.
pub type TopicId = EntityId;

impl EntityId {
    /// Creates an entity ID in the default shard and realm.
    pub fn new(num: u64) -> Self {
        Self {
            shard: 0,
            realm: 0,
            num,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl FromStr for EntityId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 {
            return Err(LedgerError::InvalidEntityId(s.to_string()));
        }

        let parse = |part: &str| {
            part.parse::<u64>()
                .map_err(|_| LedgerError::InvalidEntityId(s.to_string()))
        };

        Ok(Self {
            shard: parse(parts[0])?,
            realm: parse(parts[1])?,
            num: parse(parts[2])?,
        })
    }
}

// Entity IDs travel as strings on every wire format this crate touches.
impl Serialize for EntityId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A single NFT, identified by its token and serial number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftId {
    /// The token the serial belongs to
    pub token_id: TokenId,
    /// The serial number within the token
    pub serial: u64,
}

impl NftId {
    /// Creates an NFT ID from a token ID and serial number.
    pub fn new(token_id: TokenId, serial: u64) -> Self {
        Self { token_id, serial }
    }
}

impl fmt::Display for NftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.token_id, self.serial)
    }
}

/// An hbar amount, carried as tinybars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hbar(i64);

impl Hbar {
    /// Creates an amount of zero.
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Creates an amount from a number of tinybars.
    pub const fn from_tinybars(tinybars: i64) -> Self {
        Self(tinybars)
    }

    /// Creates an amount from a whole number of hbar.
    pub fn from_hbar(hbar: i64) -> Result<Self, LedgerError> {
        hbar.checked_mul(HBAR_TO_TINYBAR)
            .map(Self)
            .ok_or(LedgerError::AmountOverflow(hbar))
    }

    /// Returns the amount in tinybars.
    pub fn to_tinybars(self) -> i64 {
        self.0
    }
}

impl Neg for Hbar {
    type Output = Hbar;

    fn neg(self) -> Self::Output {
        Hbar(-self.0)
    }
}

impl fmt::Display for Hbar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % HBAR_TO_TINYBAR == 0 {
            write!(f, "{} ℏ", self.0 / HBAR_TO_TINYBAR)
        } else {
            write!(f, "{} tℏ", self.0)
        }
    }
}
