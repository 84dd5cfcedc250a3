use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "notary",
    about = "Digital Notary — local document timestamping on a simulated ledger",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Directory holding session and registry state
    #[arg(long, global = true, default_value = ".notary")]
    pub data_dir: PathBuf,

    /// Skip simulated ledger latency
    #[arg(long, global = true)]
    pub instant: bool,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Connect a mock identity
    Connect(ConnectArgs),
    /// Disconnect the active identity
    Disconnect(DisconnectArgs),
    /// Show session and registry status
    Status(StatusArgs),
    /// Compute the SHA-256 digest of a file
    Hash(HashArgs),
    /// Notarize a file under the connected identity
    Stamp(StampArgs),
    /// Check whether a digest or file has been notarized
    Verify(VerifyArgs),
    /// Show a single record
    Show(ShowArgs),
    /// List registered records
    List(ListArgs),
    /// Export a certificate for a record
    Certificate(CertificateArgs),
    /// Show the effective configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct ConnectArgs {}

#[derive(Args)]
pub struct DisconnectArgs {}

#[derive(Args)]
pub struct StatusArgs {}

#[derive(Args)]
pub struct HashArgs {
    pub path: PathBuf,
}

#[derive(Args)]
pub struct StampArgs {
    pub path: PathBuf,
}

#[derive(Args)]
pub struct VerifyArgs {
    /// SHA-256 digest, 64 hex characters
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub digest: Option<String>,
    /// Digest this file and verify it
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Show every registration of the digest
    #[arg(long, requires = "digest")]
    pub all: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    pub id: String,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
    #[arg(long)]
    pub oneline: bool,
}

#[derive(Args)]
pub struct CertificateArgs {
    pub id: String,
}

#[derive(Args)]
pub struct ConfigArgs {}
