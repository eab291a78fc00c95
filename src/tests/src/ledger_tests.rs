//! Tests for transaction assembly, signing, and wire encoding.

use ledger::{
    Client, EntityId, Hbar, LedgerError, PrivateKey, TokenSupplyType, TokenType, Transaction,
    TransactionBody, TransactionReceipt, TransactionResponse, MAX_NFT_MINT_BATCH,
};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn token_create_body(treasury_key: &PrivateKey, supply_key: &PrivateKey) -> TransactionBody {
    TransactionBody::TokenCreate {
        name: "Jedi Knights".to_string(),
        symbol: "JEDI".to_string(),
        decimals: 0,
        initial_supply: 0,
        max_supply: None,
        treasury: EntityId::new(1001),
        admin_key: Some(treasury_key.public_key()),
        supply_key: Some(supply_key.public_key()),
        auto_renew_account: Some(EntityId::new(1002)),
        token_type: TokenType::NonFungibleUnique,
        supply_type: TokenSupplyType::Infinite,
        royalty_fees: vec![],
    }
}

/// Assembles a token-create transaction, signs it with every required key,
/// and verifies each signature over the frozen body bytes.
#[test]
fn test_token_create_multi_sign() {
    let operator_key = PrivateKey::generate();
    let treasury_key = PrivateKey::generate();
    let auto_renew_key = PrivateKey::generate();
    let supply_key = PrivateKey::generate();

    let mut tx = Transaction::new(token_create_body(&treasury_key, &supply_key))
        .freeze()
        .unwrap();

    tx.sign(&treasury_key).unwrap();
    tx.sign(&auto_renew_key).unwrap();
    tx.sign(&supply_key).unwrap();
    tx.sign(&operator_key).unwrap();
    assert_eq!(tx.signatures.len(), 4);

    let sign_bytes = tx.sign_bytes().unwrap();
    for pair in &tx.signatures {
        let bytes = hex::decode(&pair.signature).unwrap();
        let signature = ed25519_dalek::Signature::from_bytes(&bytes).unwrap();
        pair.public_key.verify(&sign_bytes, &signature).unwrap();
    }

    // Each signer appears exactly once
    assert!(tx.is_signed_by(&treasury_key.public_key()));
    tx.sign(&treasury_key).unwrap();
    assert_eq!(tx.signatures.len(), 4);
}

/// A signed transaction survives the hex wire encoding with its signatures
/// intact.
#[test]
fn test_signed_transaction_wire_roundtrip() {
    let treasury_key = PrivateKey::generate();
    let supply_key = PrivateKey::generate();

    let mut tx = Transaction::new(token_create_body(&treasury_key, &supply_key))
        .freeze()
        .unwrap();
    tx.sign(&supply_key).unwrap();

    let wire = tx.to_hex().unwrap();
    let decoded: Transaction = bincode::deserialize(&hex::decode(wire).unwrap()).unwrap();

    assert_eq!(decoded.signatures.len(), 1);
    assert_eq!(decoded.signatures[0].public_key, supply_key.public_key());
    assert_eq!(decoded.sign_bytes().unwrap(), tx.sign_bytes().unwrap());
}

/// Transfer legs must net to zero in every currency before a transaction
/// can be frozen.
#[test]
fn test_transfer_balance_invariants() {
    let token = EntityId::new(500);
    let alias = [0x7eu8; 20];

    let balanced = TransactionBody::CryptoTransfer {
        hbar_transfers: vec![
            (EntityId::new(2), Hbar::from_tinybars(-1_000)),
            (EntityId::new(3), Hbar::from_tinybars(600)),
            (EntityId::new(4), Hbar::from_tinybars(400)),
        ],
        token_transfers: vec![(token, EntityId::new(2), -30)],
        alias_transfers: vec![(token, alias, 30)],
    };
    assert!(Transaction::new(balanced).freeze().is_ok());

    let unbalanced_token = TransactionBody::CryptoTransfer {
        hbar_transfers: vec![],
        token_transfers: vec![(token, EntityId::new(2), -30)],
        alias_transfers: vec![(token, alias, 29)],
    };
    assert!(Transaction::new(unbalanced_token).freeze().is_err());
}

/// The mint batch cap applies at freeze time, so an oversized batch never
/// reaches the node.
#[test]
fn test_mint_batch_cap() {
    let metadata_uri = b"ipfs://bafybeigdyrzt5example/metadata.json".to_vec();

    let full_batch = TransactionBody::TokenMint {
        token_id: EntityId::new(500),
        metadata: vec![metadata_uri.clone(); MAX_NFT_MINT_BATCH],
    };
    assert!(Transaction::new(full_batch).freeze().is_ok());

    let oversized = TransactionBody::TokenMint {
        token_id: EntityId::new(500),
        metadata: vec![metadata_uri; MAX_NFT_MINT_BATCH + 1],
    };
    assert!(Transaction::new(oversized).freeze().is_err());
}

/// Receipts deserialize from the node's camelCase JSON, including nested
/// child receipts from alias transfers.
#[test]
fn test_receipt_parsing_with_children() {
    let receipt: TransactionReceipt = serde_json::from_value(serde_json::json!({
        "status": "SUCCESS",
        "tokenId": "0.0.4821",
        "serials": [11, 12],
        "children": [
            { "status": "SUCCESS", "accountId": "0.0.9000" }
        ]
    }))
    .unwrap();

    assert_eq!(receipt.token_id, Some(EntityId::new(4821)));
    assert_eq!(receipt.serials, vec![11, 12]);
    assert_eq!(receipt.children[0].account_id, Some(EntityId::new(9000)));
}

/// Entity IDs print and parse in the dotted shard.realm.num form used in
/// every input file and environment variable.
#[test]
fn test_entity_id_text_form() {
    let id: EntityId = "0.0.4821".parse().unwrap();
    assert_eq!(id, EntityId::new(4821));
    assert_eq!(id.to_string(), "0.0.4821");

    assert!("4821".parse::<EntityId>().is_err());
    assert!("0.0.x".parse::<EntityId>().is_err());
}

/// Key material round-trips through the DER-hex text form used by the
/// environment and secrets files.
#[test]
fn test_key_text_roundtrip() {
    let key = PrivateKey::generate();

    let reparsed: PrivateKey = key.to_string().parse().unwrap();
    assert_eq!(reparsed.public_key(), key.public_key());

    let public: ledger::PublicKey = key.public_key().to_string().parse().unwrap();
    assert_eq!(public, key.public_key());
}

/// Serves the same canned JSON-RPC body on every connection.
async fn spawn_stub_node(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
        }
    });

    format!("http://{}", addr)
}

/// A receipt that never settles exhausts the polling attempts and surfaces
/// as a timeout instead of hanging.
#[tokio::test]
async fn test_receipt_polling_times_out() {
    let node_url =
        spawn_stub_node(r#"{"jsonrpc":"2.0","id":1,"result":{"status":"PENDING"}}"#).await;

    let mut client = Client::for_network(&node_url, "http://unused.invalid");
    client.set_receipt_polling(Duration::from_millis(1), 3);

    let response = TransactionResponse {
        transaction_id: "tx-timeout".to_string(),
    };
    let err = client.wait_for_receipt(&response).await.unwrap_err();
    assert!(matches!(err, LedgerError::ReceiptTimeout(_)));
    assert!(err.to_string().contains("tx-timeout"));
}

/// A receipt that settles mid-poll is returned as soon as it arrives.
#[tokio::test]
async fn test_receipt_polling_returns_settled_status() {
    let node_url = spawn_stub_node(
        r#"{"jsonrpc":"2.0","id":1,"result":{"status":"INVALID_SIGNATURE"}}"#,
    )
    .await;

    let mut client = Client::for_network(&node_url, "http://unused.invalid");
    client.set_receipt_polling(Duration::from_millis(1), 3);

    let response = TransactionResponse {
        transaction_id: "tx-settled".to_string(),
    };
    let receipt = client.wait_for_receipt(&response).await.unwrap();
    assert_eq!(
        receipt.status,
        ledger::Status::Failed("INVALID_SIGNATURE".to_string())
    );
}
