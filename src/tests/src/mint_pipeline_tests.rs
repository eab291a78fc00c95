//! Tests for the mint pipeline: descriptor parsing, metadata assembly, and
//! HIP-412 validation.

use cli::inputs::NftDescriptor;
use cli::minter::{batch_sizes, build_metadata, merged_properties};
use cli::{hip412, CliError};
use ledger::MAX_NFT_MINT_BATCH;

fn queue() -> Vec<NftDescriptor> {
    serde_json::from_value(serde_json::json!([
        {
            "name": "Blue Pod",
            "creator": "Pod Works",
            "description": "A very blue pod",
            "image": "pods/blue.png",
            "type": "image/png",
            "quantity": 25,
            "files": [
                { "uri": "https://example.com/pods/blue.mp4", "type": "video/mp4" }
            ],
            "properties": { "edition": 1 },
            "attributes": [
                { "trait_type": "color", "value": "blue" },
                { "trait_type": "level", "value": 3, "max_value": 10 }
            ]
        },
        {
            "name": "Red Pod",
            "image": "https://example.com/pods/red.png",
            "type": "image/png"
        }
    ]))
    .unwrap()
}

/// Every descriptor in the queue assembles into a document that passes
/// HIP-412 validation.
#[test]
fn test_queue_assembles_valid_metadata() {
    for nft in &queue() {
        let metadata = build_metadata(
            nft,
            "ipfs://bafybeigdyrzt5example",
            vec![],
            merged_properties(nft, false),
        );
        hip412::validate(&metadata).unwrap();
    }
}

/// The merge flag folds trait attributes into the properties object while
/// the attributes array stays in place for marketplaces that read it.
#[test]
fn test_attribute_merge() {
    let nft = &queue()[0];

    let properties = merged_properties(nft, true).unwrap();
    assert_eq!(properties["edition"], 1);
    assert_eq!(properties["color"], "blue");
    assert_eq!(properties["level"], 3);

    let metadata = build_metadata(nft, "ipfs://bafybeigdyrzt5example", vec![], Some(properties));
    hip412::validate(&metadata).unwrap();
    assert_eq!(metadata["attributes"].as_array().unwrap().len(), 2);
}

/// A document with a stray top-level field fails validation with a message
/// naming the offender.
#[test]
fn test_validation_rejects_unknown_fields() {
    let nft = &queue()[1];
    let mut metadata = build_metadata(nft, "ipfs://bafybeigdyrzt5example", vec![], None);
    metadata
        .as_object_mut()
        .unwrap()
        .insert("edition".to_string(), serde_json::json!(7));

    let err = hip412::validate(&metadata).unwrap_err();
    assert!(matches!(err, CliError::MetadataInvalid(_)));
    assert!(err.to_string().contains("HIP-412"));
}

/// Quantities split into node-sized mint batches whose sizes sum back to
/// the requested quantity.
#[test]
fn test_quantity_batching() {
    for quantity in [1usize, 9, 10, 11, 25, 100] {
        let sizes = batch_sizes(quantity, MAX_NFT_MINT_BATCH);
        assert_eq!(sizes.iter().sum::<usize>(), quantity);
        assert!(sizes.iter().all(|&size| size <= MAX_NFT_MINT_BATCH));
    }
}

/// Defaults fill in when the queue omits optional descriptor fields.
#[test]
fn test_descriptor_defaults() {
    let nft = &queue()[1];
    assert_eq!(nft.quantity, 1);
    assert!(nft.files.is_empty());
    assert!(nft.format.is_none());

    let metadata = build_metadata(nft, &nft.image, vec![], None);
    assert_eq!(metadata["format"], hip412::METADATA_FORMAT);
}
