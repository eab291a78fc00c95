//! Submit-message command.

use crate::commands::ensure_success;
use crate::config;
use crate::errors::CliError;
use ledger::{TopicId, Transaction, TransactionBody};

/// Runs the submit-message command.
pub async fn run(topic_id: TopicId, message: &str) -> Result<String, CliError> {
    let client = config::build_client()?;

    let body = TransactionBody::TopicSubmit {
        topic_id,
        message: message.as_bytes().to_vec(),
    };

    let mut tx = Transaction::new(body).freeze()?;
    let response = client.execute(&mut tx).await?;
    let receipt = client.wait_for_receipt(&response).await?;
    ensure_success(&receipt)?;

    Ok(format!("📤 Message submitted to topic {}", topic_id))
}
