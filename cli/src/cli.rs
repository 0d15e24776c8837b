//! # CLI Interface
//!
//! Defines the command-line argument structure for `zkat` using `clap`
//! derive. Supports five subcommands: `setup`, `issue`, `transfer`,
//! `verify`, and `version`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use zkat_protocol::config::{DEFAULT_MAX_BATCH_SIZE, DEFAULT_RANGE_BASE, DEFAULT_RANGE_DIGITS};

/// ZKAT prover and verifier.
///
/// Generates public parameters, proves issue and transfer requests over
/// confidential tokens, and verifies the resulting proofs.
#[derive(Parser, Debug)]
#[command(
    name = "zkat",
    about = "Zero-knowledge asset transfer prover and verifier",
    version,
    propagate_version = true
)]
pub struct ZkatCli {
    /// Log output format: `pretty` or `json`.
    #[arg(long, global = true, env = "ZKAT_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the `zkat` binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate public parameters and write them to a file.
    Setup(SetupArgs),
    /// Prove an issue request and write the proof envelope.
    Issue(IssueArgs),
    /// Prove a transfer request, write the proof envelope, and check it.
    Transfer(TransferArgs),
    /// Verify a proof envelope.
    Verify(VerifyArgs),
    /// Print version information and exit.
    Version,
}

/// Where public parameters come from: a file written by `setup`, or a
/// fresh setup from base, digits, and seed.
#[derive(Args, Debug, Clone)]
pub struct ParamsArgs {
    /// Public parameter file produced by `zkat setup`.
    ///
    /// When given, the range and seed flags are ignored.
    #[arg(long, short = 'p', env = "ZKAT_PARAMS")]
    pub params: Option<PathBuf>,

    /// Range proof base.
    #[arg(long, env = "ZKAT_RANGE_BASE", default_value_t = DEFAULT_RANGE_BASE)]
    pub range_base: u64,

    /// Range proof digit count. Values must lie in `[0, base^digits)`.
    #[arg(long, env = "ZKAT_RANGE_DIGITS", default_value_t = DEFAULT_RANGE_DIGITS)]
    pub range_digits: u32,

    /// Public setup seed. Omit to use the built-in seed.
    #[arg(long, env = "ZKAT_SEED")]
    pub seed: Option<String>,

    /// Maximum number of tokens per side of a proof.
    #[arg(long, env = "ZKAT_MAX_BATCH_SIZE", default_value_t = DEFAULT_MAX_BATCH_SIZE)]
    pub max_batch_size: u32,
}

/// Arguments for the `setup` subcommand.
#[derive(Args, Debug)]
pub struct SetupArgs {
    #[command(flatten)]
    pub params: ParamsArgs,

    /// Output file for the encoded parameters.
    #[arg(long, short = 'o', default_value = "zkat-params.bin")]
    pub out: PathBuf,
}

/// Arguments for the `issue` subcommand.
#[derive(Args, Debug)]
pub struct IssueArgs {
    #[command(flatten)]
    pub params: ParamsArgs,

    /// Token type to issue.
    #[arg(long, short = 't', default_value = "USD")]
    pub token_type: String,

    /// Comma-separated token values.
    #[arg(long, value_delimiter = ',', required = true)]
    pub values: Vec<u64>,

    /// Skip the per-token range proofs.
    #[arg(long)]
    pub no_range_proof: bool,

    /// Output file for the proof envelope (JSON).
    #[arg(long, short = 'o', default_value = "issue-proof.json")]
    pub out: PathBuf,
}

/// Arguments for the `transfer` subcommand.
#[derive(Args, Debug)]
pub struct TransferArgs {
    #[command(flatten)]
    pub params: ParamsArgs,

    /// Token type being transferred.
    #[arg(long, short = 't', default_value = "USD")]
    pub token_type: String,

    /// Comma-separated input values.
    #[arg(long, value_delimiter = ',', required = true)]
    pub inputs: Vec<u64>,

    /// Comma-separated output values.
    #[arg(long, value_delimiter = ',', required = true)]
    pub outputs: Vec<u64>,

    /// Output file for the proof envelope (JSON).
    #[arg(long, short = 'o', default_value = "transfer-proof.json")]
    pub out: PathBuf,
}

/// Arguments for the `verify` subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub params: ParamsArgs,

    /// Proof envelope written by `issue` or `transfer`.
    pub proof: PathBuf,
}
