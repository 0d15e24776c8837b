// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # ZKAT Protocol: Core Library
//!
//! Zero-knowledge asset transfer: tokens whose value, owner-side blinding,
//! and even type stay hidden, while anyone can still check that an issue
//! request is well-formed and that a transfer creates no money out of thin
//! air.
//!
//! ZKAT takes a boring stance on purpose: Pedersen commitments on BN254,
//! Schnorr-style sigma protocols made non-interactive with Fiat–Shamir over
//! BLAKE3, and range proofs built from digit decomposition plus OR-proofs.
//! No trusted setup, no circuits, no ceremony.
//!
//! ## Architecture
//!
//! - **crypto**: Algebra helpers, hashing, hash-to-curve, transcripts.
//! - **zkp**: Tokens, witnesses, range proofs, issue and transfer.
//! - **error**: One error type, with a typed reason for every rejection.
//! - **config**: Protocol constants and domain-separation labels.
//!
//! ## Quick tour
//!
//! ```
//! use std::sync::Arc;
//! use zkat_protocol::zkp::{issue, PublicParams, Token, TokenDataWitness};
//!
//! let pp = Arc::new(PublicParams::setup(100, 2, None).unwrap());
//! let mut rng = rand::thread_rng();
//! let witnesses = vec![TokenDataWitness::random("USD", 120, &mut rng)];
//! let tokens: Vec<Token> = witnesses.iter().map(|w| w.to_token(&pp)).collect();
//!
//! let proof = issue::Prover::new(witnesses, tokens.clone(), true, pp.clone())
//!     .prove()
//!     .unwrap();
//! issue::Verifier::new(tokens, true, pp).verify(&proof).unwrap();
//! ```
//!
//! ## Design Philosophy
//!
//! 1. Parameters are immutable and shared; provers and verifiers are cheap.
//! 2. Verification is stateless. Run it twice, run it on ten threads.
//! 3. Every rejection says which check failed, as data, not as a string.
//! 4. If it touches money, it has tests. Plural.

pub mod config;
pub mod crypto;
pub mod error;
pub mod zkp;

pub use error::{InvalidProofReason, Result, ZkatError};
