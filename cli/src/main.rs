// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # ZKAT Command-Line Tool
//!
//! Entry point for the `zkat` binary. Parses CLI arguments, initializes
//! logging, and drives the proof engine.
//!
//! The binary supports five subcommands:
//!
//! - `setup`    generate public parameters and write them to a file
//! - `issue`    prove an issue request, write a proof envelope
//! - `transfer` prove a transfer request, write and check the envelope
//! - `verify`   verify a proof envelope
//! - `version`  print build version information

mod cli;
mod envelope;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use zkat_protocol::zkp::{issue, transfer, CurveParams, PublicParams, Token, TokenDataWitness};

use cli::{Commands, ParamsArgs, ZkatCli};
use envelope::ProofEnvelope;
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = ZkatCli::parse();
    logging::init_logging(
        "zkat_cli=info,zkat_protocol=info",
        LogFormat::from_str_lossy(&cli.log_format),
    );

    match cli.command {
        Commands::Setup(args) => run_setup(args),
        Commands::Issue(args) => run_issue(args),
        Commands::Transfer(args) => run_transfer(args),
        Commands::Verify(args) => run_verify(args),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Generates parameters and writes their canonical encoding.
fn run_setup(args: cli::SetupArgs) -> Result<()> {
    let pp = fresh_params(&args.params)?;
    std::fs::write(&args.out, pp.to_bytes())
        .with_context(|| format!("failed to write parameters to {}", args.out.display()))?;

    tracing::info!(path = %args.out.display(), "public parameters written");
    println!("Public parameters written.");
    println!("  File    : {}", args.out.display());
    println!("  Range   : [0, {})", pp.range_bound());
    println!("  Digest  : {}", pp.digest_hex());
    Ok(())
}

fn run_issue(args: cli::IssueArgs) -> Result<()> {
    let pp = load_params(&args.params)?;
    let (witnesses, tokens) = mint(&pp, &args.token_type, &args.values);
    let attach_range_proof = !args.no_range_proof;

    let proof = issue::Prover::new(witnesses, tokens.clone(), attach_range_proof, Arc::clone(&pp))
        .prove()
        .context("issue proof generation failed")?;

    ProofEnvelope::issue(&pp, &tokens, &proof).write_to(&args.out)?;
    tracing::info!(tokens = tokens.len(), path = %args.out.display(), "issue proof written");
    println!("{}", args.out.display());
    Ok(())
}

/// Proves the transfer, writes the envelope, then verifies it. An
/// unbalanced transfer still gets an envelope on disk and fails here.
fn run_transfer(args: cli::TransferArgs) -> Result<()> {
    let pp = load_params(&args.params)?;
    let (inputs, input_tokens) = mint(&pp, &args.token_type, &args.inputs);
    let (outputs, output_tokens) = mint(&pp, &args.token_type, &args.outputs);

    let proof = transfer::Prover::new(
        inputs,
        outputs,
        input_tokens.clone(),
        output_tokens.clone(),
        Arc::clone(&pp),
    )
    .prove()
    .context("transfer proof generation failed")?;

    let envelope = ProofEnvelope::transfer(&pp, &input_tokens, &output_tokens, &proof);
    envelope.write_to(&args.out)?;
    tracing::info!(path = %args.out.display(), "transfer proof written");

    envelope.verify(pp).context("transfer proof does not verify")?;
    println!("{}", args.out.display());
    Ok(())
}

fn run_verify(args: cli::VerifyArgs) -> Result<()> {
    let pp = load_params(&args.params)?;
    let envelope = ProofEnvelope::read_from(&args.proof)?;
    envelope
        .verify(pp)
        .with_context(|| format!("{} proof rejected", envelope.kind()))?;
    println!("OK: {} proof verified", envelope.kind());
    Ok(())
}

fn print_version() {
    println!("zkat      {}", env!("CARGO_PKG_VERSION"));
    println!("protocol  {}", zkat_protocol::config::PROTOCOL_VERSION);
    println!("curve     {}", zkat_protocol::config::CURVE_NAME);
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn fresh_params(args: &ParamsArgs) -> Result<PublicParams> {
    let curve_params = args.seed.as_ref().map(|seed| CurveParams {
        seed: seed.as_bytes().to_vec(),
    });
    PublicParams::setup_with_batch_size(
        args.range_base,
        args.range_digits,
        args.max_batch_size,
        curve_params.as_ref(),
    )
    .context("public parameter setup failed")
}

/// Reads the parameter file if one was given, otherwise runs setup.
fn load_params(args: &ParamsArgs) -> Result<Arc<PublicParams>> {
    let pp = match &args.params {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read parameters from {}", path.display()))?;
            PublicParams::from_bytes(&bytes)
                .with_context(|| format!("{} does not hold valid parameters", path.display()))?
        }
        None => fresh_params(args)?,
    };
    tracing::debug!(digest = %pp.digest_hex(), "public parameters loaded");
    Ok(Arc::new(pp))
}

/// Fresh witnesses and tokens for `values`, all of one type.
fn mint(pp: &PublicParams, token_type: &str, values: &[u64]) -> (Vec<TokenDataWitness>, Vec<Token>) {
    let mut rng = rand::thread_rng();
    let witnesses: Vec<TokenDataWitness> = values
        .iter()
        .map(|v| TokenDataWitness::random(token_type, *v, &mut rng))
        .collect();
    let tokens = witnesses.iter().map(|w| w.to_token(pp)).collect();
    (witnesses, tokens)
}
