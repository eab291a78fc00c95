//! Input and output files.
//!
//! Commands read their batch inputs from JSON files under `input/` and write
//! generated key material to `output/`. Field names follow the camelCase
//! convention of the published file formats.

use crate::errors::CliError;
use ledger::{Hbar, RoyaltyFee};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Token details for create-token and create-ft.
pub const TOKEN_INFO_PATH: &str = "input/token_info.json";

/// The NFT descriptors to mint.
pub const MINT_QUEUE_PATH: &str = "input/mint_queue.json";

/// The serials to burn.
pub const SERIALS_TO_BURN_PATH: &str = "input/serials_to_burn.json";

/// Local media files referenced by the mint queue.
pub const MEDIA_ROOT: &str = "input/media";

/// Where generated key material is written.
pub const OUTPUT_DIR: &str = "output";

/// Token details as provided in `input/token_info.json`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfoInput {
    /// Token name
    pub token_name: String,
    /// Token symbol
    pub token_symbol: String,
    /// Decimal places (fungible tokens)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
    /// Supply ceiling (fungible tokens)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_supply: Option<u64>,
    /// Units minted to the treasury at creation (fungible tokens)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_supply: Option<u64>,
    /// Royalty schedule (NFT collections)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub royalties: Vec<RoyaltyInput>,
}

/// One royalty entry of the token info file.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoyaltyInput {
    /// Account collecting the royalty
    pub recipient: String,
    /// Royalty percentage, a whole number between 0 and 100
    pub percentage: f64,
    /// Fixed hbar fee charged when an exchange carries no fungible value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_fee_in_hbar: Option<f64>,
}

/// One NFT descriptor of the mint queue.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftDescriptor {
    /// Asset name
    pub name: String,
    /// Artist name(s)
    #[serde(default)]
    pub creator: Option<String>,
    /// Asset description
    #[serde(default)]
    pub description: Option<String>,
    /// Image: a URL, or a file path under `input/media/`
    pub image: String,
    /// MIME type of the image
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Number of serials to mint with this metadata
    #[serde(default = "default_quantity")]
    pub quantity: u64,
    /// Metadata format tag
    #[serde(default)]
    pub format: Option<String>,
    /// Additional files attached to the NFT
    #[serde(default)]
    pub files: Vec<FileRef>,
    /// Arbitrary properties
    #[serde(default)]
    pub properties: Option<serde_json::Value>,
    /// Trait attributes
    #[serde(default)]
    pub attributes: Option<Vec<Attribute>>,
}

fn default_quantity() -> u64 {
    1
}

/// A file reference on an NFT descriptor. Both fields are required; they are
/// optional here so the pipeline can report which one is missing.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    /// A URL, or a file path under `input/media/`
    #[serde(default)]
    pub uri: Option<String>,
    /// MIME type of the file
    #[serde(rename = "type", default)]
    pub mime_type: Option<String>,
}

/// A trait attribute on an NFT descriptor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Attribute {
    /// Name of the trait
    pub trait_type: String,
    /// Value of the trait
    pub value: serde_json::Value,
    /// Display hint for the value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_type: Option<String>,
    /// Maximum value for the trait
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<serde_json::Value>,
}

/// The burn request in `input/serials_to_burn.json`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnInput {
    /// The token to burn from
    pub token_id: String,
    /// The serials to burn
    pub serials: Vec<u64>,
    /// Supply key override; falls back to `NFT_SUPPLY_PRIVATE_KEY`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supply_key: Option<String>,
}

/// A generated keypair echoed into a secrets file.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPairOutput {
    /// DER-hex private key
    pub private_key: String,
    /// DER-hex public key
    pub public_key: String,
}

/// Contents of `output/account-secrets-<id>.json`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSecrets {
    /// The new account
    pub account_id: String,
    /// DER-hex private key
    pub private_key: String,
    /// DER-hex public key
    pub public_key: String,
}

/// Contents of the token secrets files.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSecrets {
    /// The new token
    pub token_id: String,
    /// Token name
    pub token_name: String,
    /// Token symbol
    pub token_symbol: String,
    /// Decimal places, echoed for fungible tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
    /// Supply ceiling, echoed for fungible tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_supply: Option<u64>,
    /// Initial supply, echoed for fungible tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_supply: Option<u64>,
    /// Royalty schedule, echoed for NFT collections
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub royalties: Vec<RoyaltyInput>,
    /// The supply key controlling mint and burn
    pub supply_key: KeyPairOutput,
}

/// Reads and parses a JSON input file.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, CliError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CliError::InputFile(path.to_string(), e.to_string()))?;
    serde_json::from_str(&contents).map_err(|e| CliError::InputFile(path.to_string(), e.to_string()))
}

/// Writes a pretty-printed secrets file under `output/`, creating the
/// directory if needed. Returns the path written.
pub fn write_secrets<T: Serialize>(file_name: &str, value: &T) -> Result<PathBuf, CliError> {
    write_secrets_in(Path::new(OUTPUT_DIR), file_name, value)
}

fn write_secrets_in<T: Serialize>(
    dir: &Path,
    file_name: &str,
    value: &T,
) -> Result<PathBuf, CliError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, serde_json::to_string_pretty(value)?)?;
    Ok(path)
}

/// Validates a token info file the way the network will: names bounded,
/// royalties capped in count and total percentage, recipients well-formed.
pub fn validate_token_info(token_info: &TokenInfoInput) -> Result<(), CliError> {
    if token_info.token_name.is_empty() || token_info.token_symbol.is_empty() {
        return Err(CliError::InvalidInput(
            "token info must contain 'tokenName' and 'tokenSymbol'".to_string(),
        ));
    }

    if token_info.token_name.len() > 100 {
        return Err(CliError::InvalidInput(
            "'tokenName' must be less than 100 characters".to_string(),
        ));
    }
    if token_info.token_symbol.len() > 100 {
        return Err(CliError::InvalidInput(
            "'tokenSymbol' must be less than 100 characters".to_string(),
        ));
    }

    if token_info.royalties.len() > 10 {
        return Err(CliError::InvalidInput(
            "cannot have more than 10 royalties".to_string(),
        ));
    }

    let total_percentage: f64 = token_info.royalties.iter().map(|r| r.percentage).sum();
    if total_percentage > 100.0 {
        return Err(CliError::InvalidInput(
            "total royalty percentage cannot exceed 100%".to_string(),
        ));
    }

    for royalty in &token_info.royalties {
        if royalty.recipient.parse::<ledger::AccountId>().is_err() {
            return Err(CliError::InvalidInput(format!(
                "royalty recipient {} must be a valid account ID",
                royalty.recipient
            )));
        }

        if !(0.0..=100.0).contains(&royalty.percentage) {
            return Err(CliError::InvalidInput(format!(
                "royalty percentage {} must be between 0 and 100",
                royalty.percentage
            )));
        }
        if royalty.percentage.fract() != 0.0 {
            return Err(CliError::InvalidInput(format!(
                "royalty percentage {} must be a whole number",
                royalty.percentage
            )));
        }

        if let Some(fallback) = royalty.fallback_fee_in_hbar {
            if fallback <= 0.0 {
                return Err(CliError::InvalidInput(format!(
                    "royalty fallback fee {} must be greater than 0",
                    fallback
                )));
            }
            if fallback.fract() != 0.0 {
                return Err(CliError::InvalidInput(format!(
                    "royalty fallback fee {} must be a whole number",
                    fallback
                )));
            }
        }
    }

    Ok(())
}

/// Converts a validated royalty schedule into custom fees: percentage over
/// a denominator of 100, collectors exempt, optional hbar fallback.
pub fn royalty_fees(royalties: &[RoyaltyInput]) -> Result<Vec<RoyaltyFee>, CliError> {
    royalties
        .iter()
        .map(|royalty| {
            let collector = royalty.recipient.parse::<ledger::AccountId>().map_err(|e| {
                CliError::InvalidInput(format!(
                    "royalty recipient {}: {}",
                    royalty.recipient, e
                ))
            })?;

            let fallback_fee = royalty
                .fallback_fee_in_hbar
                .map(|hbar| Hbar::from_hbar(hbar as i64))
                .transpose()?;

            Ok(RoyaltyFee {
                collector,
                numerator: royalty.percentage as u64,
                denominator: 100,
                fallback_fee,
                all_collectors_exempt: true,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn token_info(royalties: Vec<RoyaltyInput>) -> TokenInfoInput {
        TokenInfoInput {
            token_name: "Jedi Knights".to_string(),
            token_symbol: "JEDI".to_string(),
            decimals: None,
            max_supply: None,
            initial_supply: None,
            royalties,
        }
    }

    fn royalty(percentage: f64) -> RoyaltyInput {
        RoyaltyInput {
            recipient: "0.0.1234".to_string(),
            percentage,
            fallback_fee_in_hbar: None,
        }
    }

    #[test]
    fn test_token_info_accepts_valid_input() {
        validate_token_info(&token_info(vec![royalty(5.0), royalty(10.0)])).unwrap();
        validate_token_info(&token_info(vec![])).unwrap();
    }

    #[test]
    fn test_token_info_rejects_missing_names() {
        let mut info = token_info(vec![]);
        info.token_symbol = String::new();
        assert!(validate_token_info(&info).is_err());
    }

    #[test]
    fn test_token_info_rejects_long_names() {
        let mut info = token_info(vec![]);
        info.token_name = "x".repeat(101);
        assert!(validate_token_info(&info).is_err());
    }

    #[test]
    fn test_token_info_rejects_royalty_overflows() {
        // More than 10 entries
        let info = token_info(vec![royalty(1.0); 11]);
        assert!(validate_token_info(&info).is_err());

        // Total above 100%
        let info = token_info(vec![royalty(60.0), royalty(50.0)]);
        assert!(validate_token_info(&info).is_err());

        // Fractional percentage
        let info = token_info(vec![royalty(2.5)]);
        assert!(validate_token_info(&info).is_err());
    }

    #[test]
    fn test_token_info_rejects_bad_recipient_and_fallback() {
        let mut bad_recipient = royalty(5.0);
        bad_recipient.recipient = "treasury".to_string();
        assert!(validate_token_info(&token_info(vec![bad_recipient])).is_err());

        let mut bad_fallback = royalty(5.0);
        bad_fallback.fallback_fee_in_hbar = Some(-1.0);
        assert!(validate_token_info(&token_info(vec![bad_fallback])).is_err());

        let mut fractional_fallback = royalty(5.0);
        fractional_fallback.fallback_fee_in_hbar = Some(1.5);
        assert!(validate_token_info(&token_info(vec![fractional_fallback])).is_err());
    }

    #[test]
    fn test_royalty_fees_conversion() {
        let mut input = royalty(7.0);
        input.fallback_fee_in_hbar = Some(2.0);

        let fees = royalty_fees(&[input]).unwrap();
        assert_eq!(fees.len(), 1);
        assert_eq!(fees[0].numerator, 7);
        assert_eq!(fees[0].denominator, 100);
        assert_eq!(fees[0].fallback_fee, Some(Hbar::from_hbar(2).unwrap()));
        assert!(fees[0].all_collectors_exempt);
    }

    #[test]
    fn test_read_json_names_the_file() {
        let err = read_json::<BurnInput>("input/does_not_exist.json").unwrap_err();
        assert!(err.to_string().contains("input/does_not_exist.json"));
    }

    #[test]
    fn test_mint_queue_parsing_defaults() {
        let queue: Vec<NftDescriptor> = serde_json::from_value(serde_json::json!([{
            "name": "Blue Pod",
            "image": "pods/blue.png",
            "type": "image/png",
            "attributes": [{ "trait_type": "color", "value": "blue" }]
        }]))
        .unwrap();

        assert_eq!(queue[0].quantity, 1);
        assert!(queue[0].files.is_empty());
        assert!(queue[0].creator.is_none());
        assert_eq!(queue[0].attributes.as_ref().unwrap()[0].trait_type, "color");
    }

    #[test]
    fn test_secrets_roundtrip() {
        let dir = tempdir().unwrap();
        let secrets = AccountSecrets {
            account_id: "0.0.5005".to_string(),
            private_key: "302e...".to_string(),
            public_key: "302a...".to_string(),
        };

        let path =
            write_secrets_in(dir.path(), "account-secrets-0.0.5005.json", &secrets).unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        let back: AccountSecrets = serde_json::from_str(&contents).unwrap();
        assert_eq!(back.account_id, "0.0.5005");

        // camelCase on the wire
        assert!(contents.contains("\"accountId\""));
        assert!(contents.contains("\"privateKey\""));
    }
}
