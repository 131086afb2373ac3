use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "cil",
    about = "Civic Integrity Log — append-only, hash-chained incident report ledger",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Base URL of the chain API.
    #[arg(long, global = true, default_value = "http://127.0.0.1:9318")]
    pub url: String,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the chain API server
    Serve(ServeArgs),
    /// Submit an incident report for append
    Submit(SubmitArgs),
    /// Show the chain, newest first
    Log(LogArgs),
    /// Show a single block and its decoded report
    Show(ShowArgs),
    /// Fetch the chain and verify its integrity locally
    Verify(VerifyArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Bind address; overrides the config file.
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// TOML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct SubmitArgs {
    /// Report text (usually the JSON-encoded record).
    pub text: String,
    /// Attachment identifiers.
    #[arg(long = "media")]
    pub media: Vec<String>,
    /// Submitter reference; omitted means anonymous.
    #[arg(long)]
    pub user: Option<String>,
}

#[derive(Args)]
pub struct LogArgs {
    /// Hide blocks below this index (bootstrap threshold).
    #[arg(long, default_value = "0")]
    pub min_index: u64,
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
    /// Oldest first instead of newest first.
    #[arg(long)]
    pub ascending: bool,
    #[arg(long)]
    pub oneline: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Raw chain index of the block.
    pub index: u64,
}

#[derive(Args)]
pub struct VerifyArgs {}
