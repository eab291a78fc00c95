//! Key material: ed25519 keys for ledger entities and secp256k1 keys for
//! EVM address aliases.

use crate::errors::LedgerError;
use ed25519_dalek::{Keypair, SecretKey, Signature, Signer, Verifier};
use ethers::core::k256::ecdsa::SigningKey;
use ethers::core::k256::elliptic_curve::sec1::ToEncodedPoint;
use ethers::utils::secret_key_to_address;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// DER prefix of a hex-encoded ed25519 private key.
const PRIVATE_KEY_DER_PREFIX: &str = "302e020100300506032b657004220420";

/// DER prefix of a hex-encoded ed25519 public key.
const PUBLIC_KEY_DER_PREFIX: &str = "302a300506032b6570032100";

/// An ed25519 private key.
#[derive(Clone)]
pub struct PrivateKey {
    seed: [u8; 32],
}

impl PrivateKey {
    /// Generates a new random private key.
    pub fn generate() -> Self {
        let mut seed = [0u8; 32];
        OsRng.fill_bytes(&mut seed);
        Self { seed }
    }

    /// Gets the public key for this private key.
    pub fn public_key(&self) -> PublicKey {
        let keypair = self.keypair();
        PublicKey {
            bytes: keypair.public.to_bytes(),
        }
    }

    /// Signs a message with this private key.
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.keypair().sign(message)
    }

    fn keypair(&self) -> Keypair {
        // The seed is always 32 bytes, so from_bytes cannot fail.
        let secret = SecretKey::from_bytes(&self.seed).unwrap();
        let public = (&secret).into();
        Keypair { secret, public }
    }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", PRIVATE_KEY_DER_PREFIX, hex::encode(self.seed))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never leak the seed through debug output.
        write!(f, "PrivateKey(..)")
    }
}

impl FromStr for PrivateKey {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_str = s
            .trim()
            .trim_start_matches("0x")
            .trim_start_matches(PRIVATE_KEY_DER_PREFIX);

        let bytes = hex::decode(hex_str)
            .map_err(|e| LedgerError::InvalidKey(format!("not valid hex: {}", e)))?;

        if bytes.len() != 32 {
            return Err(LedgerError::InvalidKey(format!(
                "expected 32 bytes of key material, got {}",
                bytes.len()
            )));
        }

        let mut seed = [0u8; 32];
        seed.copy_from_slice(&bytes);
        Ok(Self { seed })
    }
}

/// An ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    bytes: [u8; 32],
}

impl PublicKey {
    /// Gets the raw key bytes.
    pub fn to_bytes(self) -> [u8; 32] {
        self.bytes
    }

    /// Verifies a signature over a message.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), LedgerError> {
        let key = ed25519_dalek::PublicKey::from_bytes(&self.bytes)?;
        key.verify(message, signature)
            .map_err(|e| LedgerError::InvalidKey(format!("signature verification failed: {}", e)))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", PUBLIC_KEY_DER_PREFIX, hex::encode(self.bytes))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.bytes))
    }
}

impl FromStr for PublicKey {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_str = s
            .trim()
            .trim_start_matches("0x")
            .trim_start_matches(PUBLIC_KEY_DER_PREFIX);

        let bytes = hex::decode(hex_str)
            .map_err(|e| LedgerError::InvalidKey(format!("not valid hex: {}", e)))?;

        if bytes.len() != 32 {
            return Err(LedgerError::InvalidKey(format!(
                "expected 32 bytes of key material, got {}",
                bytes.len()
            )));
        }

        let mut key = [0u8; 32];
        key.copy_from_slice(&bytes);
        Ok(Self { bytes: key })
    }
}

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A secp256k1 private key with an EVM address, used for account aliases.
pub struct EcdsaPrivateKey {
    inner: SigningKey,
}

impl EcdsaPrivateKey {
    /// Generates a new random secp256k1 private key.
    pub fn generate() -> Self {
        Self {
            inner: SigningKey::random(&mut OsRng),
        }
    }

    /// Gets the EVM address derived from the public key.
    pub fn evm_address(&self) -> [u8; 20] {
        secret_key_to_address(&self.inner).0
    }

    /// Gets the compressed SEC1 public key as hex.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.inner.verifying_key().to_encoded_point(true).as_bytes())
    }

    /// Gets the private key scalar as hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.inner.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify() {
        let key = PrivateKey::generate();
        let message = b"freeze, sign, submit";

        let signature = key.sign(message);
        key.public_key().verify(message, &signature).unwrap();

        // A different message must not verify
        assert!(key.public_key().verify(b"other", &signature).is_err());
    }

    #[test]
    fn test_private_key_der_roundtrip() {
        let key = PrivateKey::generate();
        let der = key.to_string();
        assert!(der.starts_with(PRIVATE_KEY_DER_PREFIX));

        let parsed: PrivateKey = der.parse().unwrap();
        assert_eq!(parsed.public_key(), key.public_key());

        // Bare hex without the DER prefix parses too
        let bare = hex::encode(key.seed);
        let parsed: PrivateKey = bare.parse().unwrap();
        assert_eq!(parsed.public_key(), key.public_key());
    }

    #[test]
    fn test_public_key_der_roundtrip() {
        let key = PrivateKey::generate().public_key();
        let der = key.to_string();
        assert!(der.starts_with(PUBLIC_KEY_DER_PREFIX));

        let parsed: PublicKey = der.parse().unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn test_key_parse_rejects_bad_material() {
        assert!("zz".parse::<PrivateKey>().is_err());
        assert!("abcd".parse::<PrivateKey>().is_err());
        assert!("".parse::<PublicKey>().is_err());
    }

    #[test]
    fn test_evm_address_is_deterministic() {
        let key = EcdsaPrivateKey::generate();
        let address = key.evm_address();
        assert_eq!(address.len(), 20);
        assert_eq!(address, key.evm_address());

        // Compressed SEC1 public keys are 33 bytes
        assert_eq!(key.public_key_hex().len(), 66);
    }
}
