//! Command-line toolkit for token and topic operations on a distributed
//! ledger: account creation, fungible and non-fungible token creation,
//! NFT minting with HIP-412 metadata, burning, transfers, allowances, and
//! topic messaging.

pub mod commands;
pub mod config;
pub mod errors;
pub mod hip412;
pub mod inputs;
pub mod minter;

pub use errors::CliError;
pub use minter::Minter;
