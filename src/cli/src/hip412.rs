//! HIP-412 NFT metadata validation.
//!
//! The published HIP-412 v2 schema (JSON Schema draft-07), embedded
//! verbatim and compiled with format assertions on, the way the original
//! toolchain ran it through ajv with formats enabled.

use crate::errors::CliError;
use serde_json::{json, Value};

/// Metadata format tag for documents conforming to this schema.
pub const METADATA_FORMAT: &str = "HIP412@2.0.0";

/// The HIP-412 v2 metadata schema.
pub fn schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "name": {
                "type": "string",
                "description": "Identifies the asset to which this token represents."
            },
            "creator": {
                "type": "string",
                "description": "Identifies the artist name(s)."
            },
            "creatorDID": {
                "type": "string",
                "format": "uri",
                "description": "Points to a decentralized identifier to identify the creator."
            },
            "description": {
                "type": "string",
                "description": "Describes the asset to which this token represents."
            },
            "image": {
                "type": "string",
                "format": "uri",
                "description": "A URI pointing to a resource with mime type image/* representing the asset to which this token represents."
            },
            "checksum": {
                "type": "string",
                "description": "Cryptographic SHA-256 hash of the representation of the 'image' resource."
            },
            "type": {
                "type": "string",
                "description": "Sets the MIME type for the 'image' resource."
            },
            "format": {
                "type": "string",
                "default": METADATA_FORMAT,
                "description": "Name of the format or schema used by the NFT."
            },
            "properties": {
                "type": "object",
                "description": "Holds any arbitrary properties. Values may be strings, numbers, booleans, objects or arrays."
            },
            "files": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "uri": {
                            "type": "string",
                            "format": "uri",
                            "description": "A URI pointing to a resource."
                        },
                        "checksum": {
                            "type": "string",
                            "description": "Cryptographic SHA-256 hash of the representation of the 'uri' resource."
                        },
                        "type": {
                            "type": "string",
                            "description": "Sets the MIME type for the file."
                        },
                        "is_default_file": {
                            "type": "boolean",
                            "description": "Indicates if this file object is the main file representing the NFT."
                        },
                        "metadata": {
                            "type": "object",
                            "description": "A nested metadata object for the file, following the same metadata format as the root metadata."
                        },
                        "metadata_uri": {
                            "type": "string",
                            "format": "uri",
                            "description": "A URI pointing to a metadata resource following the same metadata format as the root metadata."
                        }
                    },
                    "required": ["uri", "type"],
                    "additionalProperties": false
                }
            },
            "attributes": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "trait_type": {
                            "type": "string",
                            "description": "Name of trait."
                        },
                        "display_type": {
                            "type": "string",
                            "description": "Sets the representation of the value of the trait."
                        },
                        "value": {
                            "type": ["string", "integer", "number", "boolean"],
                            "description": "Value for trait."
                        },
                        "max_value": {
                            "type": ["string", "integer", "number"],
                            "description": "Maximum value for trait."
                        }
                    },
                    "required": ["trait_type", "value"],
                    "additionalProperties": false
                }
            },
            "localization": {
                "type": "object",
                "required": ["uri", "default", "locales"],
                "properties": {
                    "uri": {
                        "type": "string",
                        "description": "The URI pattern to fetch localized data from, containing the substring `{locale}`."
                    },
                    "default": {
                        "type": "string",
                        "description": "The two-letter language code of the default locale."
                    },
                    "locales": {
                        "type": "array",
                        "description": "The list of locales for which data is available.",
                        "items": { "type": "string" }
                    }
                },
                "additionalProperties": false
            }
        },
        "required": ["name", "image", "type"]
    })
}

/// Validates a metadata document against the HIP-412 schema, listing every
/// violation on failure.
pub fn validate(metadata: &Value) -> Result<(), CliError> {
    let schema = schema();
    let validator = jsonschema::options()
        .should_validate_formats(true)
        .build(&schema)
        .map_err(|e| CliError::MetadataInvalid(e.to_string()))?;

    let errors: Vec<String> = validator
        .iter_errors(metadata)
        .map(|error| format!("{} (at instance path '{}')", error, error.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(CliError::MetadataInvalid(errors.join("\n")))
    }
}
