//! # Proof Envelopes
//!
//! A proof on its own is not enough to verify anything: the verifier also
//! needs the public tokens and the parameters the proof was made under.
//! An envelope bundles all of that into one JSON document, with tokens and
//! proof bytes hex-encoded.
//!
//! ```json
//! {
//!   "kind": "transfer",
//!   "params_digest": "9f1c…",
//!   "inputs": ["a3…", "0b…"],
//!   "outputs": ["77…", "c2…"],
//!   "proof": "0200…"
//! }
//! ```
//!
//! The parameters themselves are not embedded; `verify` is handed them and
//! refuses an envelope whose digest does not match.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use zkat_protocol::zkp::{issue, transfer, IssueProof, PublicParams, Token, TransferProof};

/// Serialized proof plus the public statement it is about.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProofEnvelope {
    Issue {
        params_digest: String,
        range_proofs: bool,
        tokens: Vec<String>,
        proof: String,
    },
    Transfer {
        params_digest: String,
        inputs: Vec<String>,
        outputs: Vec<String>,
        proof: String,
    },
}

impl ProofEnvelope {
    pub fn issue(pp: &PublicParams, tokens: &[Token], proof: &IssueProof) -> Self {
        ProofEnvelope::Issue {
            params_digest: pp.digest_hex(),
            range_proofs: proof.has_range_proofs(),
            tokens: encode_tokens(tokens),
            proof: hex::encode(proof.to_bytes()),
        }
    }

    pub fn transfer(
        pp: &PublicParams,
        inputs: &[Token],
        outputs: &[Token],
        proof: &TransferProof,
    ) -> Self {
        ProofEnvelope::Transfer {
            params_digest: pp.digest_hex(),
            inputs: encode_tokens(inputs),
            outputs: encode_tokens(outputs),
            proof: hex::encode(proof.to_bytes()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ProofEnvelope::Issue { .. } => "issue",
            ProofEnvelope::Transfer { .. } => "transfer",
        }
    }

    fn params_digest(&self) -> &str {
        match self {
            ProofEnvelope::Issue { params_digest, .. }
            | ProofEnvelope::Transfer { params_digest, .. } => params_digest,
        }
    }

    /// Write as pretty-printed JSON.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to encode proof envelope")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write proof envelope to {}", path.display()))
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read proof envelope from {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("{} is not a proof envelope", path.display()))
    }

    /// Decode everything and run the matching verifier.
    ///
    /// A verifier rejection comes back as the underlying
    /// [`zkat_protocol::ZkatError`], reachable through `downcast_ref`.
    pub fn verify(&self, pp: Arc<PublicParams>) -> Result<()> {
        if self.params_digest() != pp.digest_hex() {
            bail!(
                "envelope was made under parameters {} but {} were supplied",
                self.params_digest(),
                pp.digest_hex()
            );
        }

        match self {
            ProofEnvelope::Issue {
                range_proofs,
                tokens,
                proof,
                ..
            } => {
                let tokens = decode_tokens(tokens)?;
                let proof = IssueProof::from_bytes(&decode_hex(proof, "proof")?)
                    .context("failed to decode issue proof")?;
                issue::Verifier::new(tokens, *range_proofs, pp).verify(&proof)?;
            }
            ProofEnvelope::Transfer {
                inputs,
                outputs,
                proof,
                ..
            } => {
                let inputs = decode_tokens(inputs)?;
                let outputs = decode_tokens(outputs)?;
                let proof = TransferProof::from_bytes(&decode_hex(proof, "proof")?)
                    .context("failed to decode transfer proof")?;
                transfer::Verifier::new(inputs, outputs, pp).verify(&proof)?;
            }
        }
        Ok(())
    }
}

fn encode_tokens(tokens: &[Token]) -> Vec<String> {
    tokens.iter().map(Token::to_hex).collect()
}

fn decode_tokens(encoded: &[String]) -> Result<Vec<Token>> {
    encoded
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let bytes = decode_hex(s, "token")?;
            Token::from_bytes(&bytes).with_context(|| format!("token {} is not a valid point", i))
        })
        .collect()
}

fn decode_hex(s: &str, what: &str) -> Result<Vec<u8>> {
    hex::decode(s).with_context(|| format!("{} is not valid hex", what))
}
