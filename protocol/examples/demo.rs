//! Interactive CLI demo of the ZKAT issue/transfer lifecycle.
//!
//! Walks through parameter setup, issuing confidential tokens, a balanced
//! transfer, a transfer that tries to mint value out of nowhere, and an
//! output that falls outside the authorized range. The output uses ANSI
//! escape codes for colored, storytelling-style terminal rendering.
//!
//! Run with:
//!   cargo run --example demo --release

use std::sync::Arc;
use std::time::Instant;

use zkat_protocol::zkp::{issue, transfer, PublicParams, Token, TokenDataWitness};
use zkat_protocol::ZkatError;

// ---------------------------------------------------------------------------
// ANSI color constants
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

const BG_BLUE: &str = "\x1b[44m";

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

fn banner() {
    println!();
    println!(
        "{BG_BLUE}{BOLD}{WHITE}                                                                    {RESET}"
    );
    println!(
        "{BG_BLUE}{BOLD}{WHITE}    ZKAT  --  Zero-Knowledge Asset Transfer Demo                    {RESET}"
    );
    println!(
        "{BG_BLUE}{BOLD}{WHITE}    Pedersen/BN254 + sigma protocols + BLAKE3 Fiat-Shamir           {RESET}"
    );
    println!(
        "{BG_BLUE}{BOLD}{WHITE}                                                                    {RESET}"
    );
    println!();
}

fn section(num: u32, title: &str) {
    println!();
    println!(
        "{BOLD}{CYAN}===[{YELLOW} Step {num} {CYAN}]=============================================================={RESET}"
    );
    println!("{BOLD}{WHITE}  {title}{RESET}");
    println!(
        "{CYAN}------------------------------------------------------------------------{RESET}"
    );
}

fn subsection(text: &str) {
    println!("{DIM}{CYAN}  >> {text}{RESET}");
}

fn success(text: &str) {
    println!("{GREEN}  [OK] {text}{RESET}");
}

fn rejected(text: &str) {
    println!("{RED}  [REJECTED] {text}{RESET}");
}

fn info(label: &str, value: &str) {
    println!("{WHITE}  {BOLD}{label}:{RESET} {YELLOW}{value}{RESET}");
}

fn timing(label: &str, elapsed: std::time::Duration) {
    let ms = elapsed.as_secs_f64() * 1000.0;
    println!("{DIM}{MAGENTA}  [{label}: {ms:.2} ms]{RESET}");
}

fn token_row(name: &str, token: &Token) {
    let hex = token.to_hex();
    println!(
        "  {BOLD}{name:<10}{RESET}  {DIM}{}...{}{RESET}",
        &hex[..10],
        &hex[hex.len() - 8..]
    );
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn mint(pp: &PublicParams, values: &[u64]) -> (Vec<TokenDataWitness>, Vec<Token>) {
    let mut rng = rand::thread_rng();
    let witnesses: Vec<TokenDataWitness> = values
        .iter()
        .map(|v| TokenDataWitness::random("USD", *v, &mut rng))
        .collect();
    let tokens = witnesses.iter().map(|w| w.to_token(pp)).collect();
    (witnesses, tokens)
}

fn run_transfer(
    pp: &Arc<PublicParams>,
    inputs: &[TokenDataWitness],
    input_tokens: &[Token],
    outputs: &[u64],
) -> Result<(), ZkatError> {
    let (out_witnesses, out_tokens) = mint(pp, outputs);
    for (i, token) in out_tokens.iter().enumerate() {
        token_row(&format!("out[{i}]"), token);
    }

    let start = Instant::now();
    let proof = transfer::Prover::new(
        inputs.to_vec(),
        out_witnesses,
        input_tokens.to_vec(),
        out_tokens.clone(),
        Arc::clone(pp),
    )
    .prove()?;
    timing("prove", start.elapsed());
    info("Proof size", &format!("{} bytes", proof.to_bytes().len()));

    let start = Instant::now();
    let verdict = transfer::Verifier::new(input_tokens.to_vec(), out_tokens, Arc::clone(pp))
        .verify(&proof);
    timing("verify", start.elapsed());
    verdict
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    banner();

    // --- Step 1: setup ---
    section(1, "Public parameter setup");
    subsection("Deriving T, G, H by hash-to-curve and building the digit table");
    let start = Instant::now();
    let pp = match PublicParams::setup(100, 2, None) {
        Ok(pp) => Arc::new(pp),
        Err(e) => {
            rejected(&e.to_string());
            return;
        }
    };
    timing("setup", start.elapsed());
    info("Authorized range", &format!("[0, {})", pp.range_bound()));
    info("Digest", &pp.digest_hex());

    // --- Step 2: issue ---
    section(2, "Issue 90 + 60 USD");
    let (issued, issued_tokens) = mint(&pp, &[90, 60]);
    for (i, token) in issued_tokens.iter().enumerate() {
        token_row(&format!("in[{i}]"), token);
    }
    let start = Instant::now();
    let proof = issue::Prover::new(issued.clone(), issued_tokens.clone(), true, Arc::clone(&pp))
        .prove();
    timing("prove", start.elapsed());
    match proof.and_then(|p| {
        issue::Verifier::new(issued_tokens.clone(), true, Arc::clone(&pp)).verify(&p)
    }) {
        Ok(()) => success("issue proof verified; nobody learned the values or the type"),
        Err(e) => rejected(&e.to_string()),
    }

    // --- Step 3: balanced transfer ---
    section(3, "Transfer 90 + 60 -> 50 + 100");
    match run_transfer(&pp, &issued, &issued_tokens, &[50, 100]) {
        Ok(()) => success("values balance and every output is in range"),
        Err(e) => rejected(&e.to_string()),
    }

    // --- Step 4: unbalanced transfer ---
    section(4, "Transfer 90 + 60 -> 110 + 45 (five USD from nowhere)");
    subsection("The prover happily produces a proof...");
    match run_transfer(&pp, &issued, &issued_tokens, &[110, 45]) {
        Ok(()) => success("accepted (this should never happen)"),
        Err(e) => rejected(&format!("...and the verifier says: {e}")),
    }

    // --- Step 5: out of range ---
    section(5, "Same transfer under base 10, 2 digits");
    let small = match PublicParams::setup(10, 2, None) {
        Ok(pp) => Arc::new(pp),
        Err(e) => {
            rejected(&e.to_string());
            return;
        }
    };
    let (issued, issued_tokens) = mint(&small, &[90, 60]);
    match run_transfer(&small, &issued, &issued_tokens, &[50, 100]) {
        Ok(()) => success("accepted (this should never happen)"),
        Err(e) => rejected(&format!("no proof at all: {e}")),
    }

    println!();
}
