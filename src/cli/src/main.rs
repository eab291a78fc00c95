//! Entry point for the `tokentool` binary.

use cli::commands;
use cli::config;
use cli::errors::CliError;
use colored::Colorize;
use ledger::{AccountId, TokenId, TopicId};
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

#[derive(StructOpt, Debug)]
#[structopt(name = "tokentool", about = "Token and topic operations on a distributed ledger")]
struct Opt {
    /// Environment to load variables from (.env.<name>)
    #[structopt(long)]
    env: Option<String>,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt, Debug)]
enum Command {
    /// Create a new account with a fresh ed25519 key
    CreateAccount {
        /// Starting balance in hbar, funded by the operator
        #[structopt(default_value = "10")]
        initial_balance: i64,
    },

    /// Create a new account aliased to a fresh EVM address
    CreateAccountFromEvm,

    /// Create an NFT collection from input/token_info.json
    CreateToken,

    /// Create a fungible token from input/token_info.json
    CreateFt,

    /// Clone a mainnet token and its NFT metadata onto the configured network
    CloneToken {
        /// The mainnet token to clone
        token_id: TokenId,
        /// Cap on the number of serials to clone
        total_supply: Option<usize>,
    },

    /// Mint the NFTs described in input/mint_queue.json
    MintNfts,

    /// Burn the serials listed in input/serials_to_burn.json
    BurnNfts,

    /// Approve an all-serials NFT allowance
    ApproveAllowance {
        /// The token the allowance covers
        token_id: TokenId,
        /// The owner granting the allowance
        owner: AccountId,
        /// The spender receiving the allowance
        spender: AccountId,
    },

    /// Send hbar from the operator to an account
    SendHbar {
        /// The receiving account
        to: AccountId,
        /// Amount in hbar
        amount: i64,
    },

    /// Send token units from the operator to an account
    SendToken {
        /// The token to send
        token_id: TokenId,
        /// The receiving account
        to: AccountId,
        /// Number of units
        amount: i64,
    },

    /// Send token units from the operator to an EVM address alias
    SendTokenToAlias {
        /// The token to send
        token_id: TokenId,
        /// The receiving EVM address
        evm_address: String,
        /// Number of units
        amount: i64,
    },

    /// Create an append-only topic
    CreateTopic {
        /// Short topic description
        #[structopt(long, default_value = "Vote")]
        memo: String,
    },

    /// Submit a message to a topic
    SubmitMessage {
        /// The topic to post to
        topic_id: TopicId,
        /// The message payload
        message: String,
    },
}

async fn dispatch(command: Command) -> Result<String, CliError> {
    match command {
        Command::CreateAccount { initial_balance } => {
            commands::create_account::run(initial_balance).await
        }
        Command::CreateAccountFromEvm => commands::create_account_from_evm::run().await,
        Command::CreateToken => commands::create_token::run().await,
        Command::CreateFt => commands::create_ft::run().await,
        Command::CloneToken {
            token_id,
            total_supply,
        } => commands::clone_token::run(token_id, total_supply).await,
        Command::MintNfts => commands::mint_nfts::run().await,
        Command::BurnNfts => commands::burn_nfts::run().await,
        Command::ApproveAllowance {
            token_id,
            owner,
            spender,
        } => commands::approve_allowance::run(token_id, owner, spender).await,
        Command::SendHbar { to, amount } => commands::send_hbar::run(to, amount).await,
        Command::SendToken {
            token_id,
            to,
            amount,
        } => commands::send_token::run(token_id, to, amount).await,
        Command::SendTokenToAlias {
            token_id,
            evm_address,
            amount,
        } => commands::send_token_to_alias::run(token_id, &evm_address, amount).await,
        Command::CreateTopic { memo } => commands::create_topic::run(&memo).await,
        Command::SubmitMessage { topic_id, message } => {
            commands::submit_message::run(topic_id, &message).await
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opt = Opt::from_args();
    config::load_environment(opt.env.as_deref());

    match dispatch(opt.command).await {
        Ok(message) => println!("{}", message.green()),
        Err(e) => {
            eprintln!("{}", format!("🚫 {}", e).red());
            std::process::exit(1);
        }
    }
}
