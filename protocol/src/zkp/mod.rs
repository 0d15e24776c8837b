//! # Zero-Knowledge Asset Transfer Proofs
//!
//! The proof engine: confidential tokens as Pedersen commitments over
//! BN254/G1, and non-interactive sigma protocols (Fiat–Shamir) that let a
//! verifier check issue and transfer requests without learning any value,
//! blinding factor, or token type.
//!
//! ## Architecture
//!
//! ```text
//! params.rs          setup: generators, digit table, range configuration
//! commitment.rs      Token, commit / open
//! witness.rs         TokenDataWitness, WellFormednessWitness (prover secrets)
//! wellformedness.rs  opening proof with a shared type response
//! range.rs           digit decomposition + per-digit OR-proofs
//! issue.rs           issue Prover / Verifier
//! transfer.rs        transfer Prover / Verifier (adds conservation)
//! ```
//!
//! ## Security Model
//!
//! - **Commitment hiding**: perfect, for uniformly random blinding factors.
//! - **Commitment binding**: computational, under discrete log on BN254/G1.
//!   The generators come from hash-to-curve, so nobody knows their
//!   relative discrete logs.
//! - **Soundness**: special soundness of every sigma protocol, in the
//!   random oracle model for the BLAKE3 transcript.
//!
//! [`PublicParams`] are immutable after setup. Share them behind an `Arc`
//! across as many concurrent provers and verifiers as needed.

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

use crate::error::{Result, ZkatError};

pub mod commitment;
pub mod issue;
pub mod params;
pub mod range;
pub mod transfer;
pub mod wellformedness;
pub mod witness;

// Re-export the public API so callers can do `use zkat_protocol::zkp::*`.
pub use commitment::{commit, open, type_scalar, Token};
pub use issue::IssueProof;
pub use params::{CurveParams, PublicParams};
pub use range::RangeProof;
pub use transfer::{ConservationProof, TransferProof};
pub use wellformedness::WellFormednessProof;
pub use witness::{new_token_data_witnesses, TokenDataWitness, WellFormednessWitness};

/// Compressed canonical encoding of a proof.
pub(crate) fn encode<T: CanonicalSerialize>(value: &T) -> Vec<u8> {
    let mut buf = Vec::with_capacity(value.compressed_size());
    value
        .serialize_compressed(&mut buf)
        .expect("serialization into a Vec must not fail");
    buf
}

/// Decode `data` as exactly one `T`, validating every point.
pub(crate) fn decode_exact<T: CanonicalDeserialize>(data: &[u8], what: &str) -> Result<T> {
    let mut reader = data;
    let value = T::deserialize_compressed(&mut reader)?;
    if !reader.is_empty() {
        return Err(ZkatError::Serialization(format!(
            "{} trailing bytes after {}",
            reader.len(),
            what
        )));
    }
    Ok(value)
}

/// Every witness must open the token at the same position.
pub(crate) fn check_openings(
    params: &PublicParams,
    witnesses: &[TokenDataWitness],
    tokens: &[Token],
) -> Result<()> {
    for (i, (witness, token)) in witnesses.iter().zip(tokens).enumerate() {
        if witness.to_token(params) != *token {
            return Err(ZkatError::MalformedInput(format!(
                "witness {} does not open its token",
                i
            )));
        }
    }
    Ok(())
}
