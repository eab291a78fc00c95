//! Create-topic command.

use crate::commands::ensure_success;
use crate::config;
use crate::errors::CliError;
use ledger::{Transaction, TransactionBody};

/// Runs the create-topic command: an append-only topic with the operator
/// key as admin key.
pub async fn run(memo: &str) -> Result<String, CliError> {
    let client = config::build_client()?;

    let body = TransactionBody::TopicCreate {
        admin_key: Some(client.operator_public_key()?),
        memo: memo.to_string(),
    };

    let mut tx = Transaction::new(body).freeze()?;
    let response = client.execute(&mut tx).await?;
    let receipt = client.wait_for_receipt(&response).await?;
    ensure_success(&receipt)?;

    let topic_id = receipt
        .topic_id
        .ok_or_else(|| CliError::InvalidInput("receipt carries no topic ID".to_string()))?;

    Ok(format!("🎉 Created topic {} with memo '{}'", topic_id, memo))
}
