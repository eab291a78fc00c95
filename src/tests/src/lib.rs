//! Integration tests for the token toolkit.

pub mod ledger_tests;
pub mod mint_pipeline_tests;
