//! Environment configuration for the toolkit.
//!
//! Every command reads its settings from environment variables, loaded from
//! an `.env.<name>` file chosen by `APP_ENV` (default `development`). Each
//! command validates exactly the variables it needs, so a missing variable
//! is reported by name at the point of use.

use crate::errors::CliError;
use ledger::{AccountId, Client, PrivateKey, TokenId};
use std::str::FromStr;
use tracing::info;

/// Loads environment variables from `.env.<name>`, falling back to `.env`.
pub fn load_environment(name: Option<&str>) {
    let environment = name
        .map(str::to_string)
        .or_else(|| std::env::var("APP_ENV").ok())
        .unwrap_or_else(|| "development".to_string());

    let path = format!(".env.{}", environment);
    if dotenv::from_filename(&path).is_ok() {
        info!("Loaded environment variables from {}", path);
    } else {
        dotenv::dotenv().ok();
    }
}

/// Gets a required environment variable.
pub fn require_env(name: &str) -> Result<String, CliError> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(CliError::MissingEnv(name.to_string())),
    }
}

/// Gets an optional environment variable, treating empty as absent.
pub fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Whether a boolean environment flag is set to `true`.
pub fn env_flag(name: &str) -> bool {
    env_opt(name).as_deref() == Some("true")
}

/// Gets a required environment variable parsed as an account ID.
pub fn account_id(name: &str) -> Result<AccountId, CliError> {
    parse_env(name)
}

/// Gets a required environment variable parsed as a token ID.
pub fn token_id(name: &str) -> Result<TokenId, CliError> {
    parse_env(name)
}

/// Gets a required environment variable parsed as a private key.
pub fn private_key(name: &str) -> Result<PrivateKey, CliError> {
    parse_env(name)
}

fn parse_env<T>(name: &str) -> Result<T, CliError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    require_env(name)?
        .parse()
        .map_err(|e| CliError::InvalidInput(format!("{} is invalid: {}", name, e)))
}

/// The network the toolkit targets.
pub fn network_name() -> String {
    env_opt("NETWORK").unwrap_or_else(|| "testnet".to_string())
}

/// Builds a node client for the configured network with the operator set.
pub fn build_client() -> Result<Client, CliError> {
    let mut client = match network_name().as_str() {
        "mainnet" => Client::for_mainnet(),
        "testnet" => Client::for_testnet(),
        "custom" => Client::for_network(
            &require_env("CUSTOM_NODE_URL")?,
            &require_env("CUSTOM_MIRROR_URL")?,
        ),
        other => {
            return Err(CliError::InvalidInput(format!(
                "NETWORK must be 'mainnet', 'testnet' or 'custom', got '{}'",
                other
            )))
        }
    };

    client.set_operator(
        account_id("OPERATOR_ACCOUNT_ID")?,
        private_key("OPERATOR_PRIVATE_KEY")?,
    );

    Ok(client)
}
