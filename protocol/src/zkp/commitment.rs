//! # Token Commitments over BN254
//!
//! A token is a Pedersen commitment to three attributes:
//!
//! ```text
//! C = t·T + v·G + r·H          (additive notation on BN254/G1)
//!
//! t = H("token-type", type)  token type, as a scalar
//! v                           value
//! r                           blinding factor
//! ```
//!
//! In multiplicative notation this is the familiar
//! `C = G^v · H^r · T^t`. Putting the type on its own generator lets the
//! proofs show that several tokens share one type without revealing which.
//!
//! ## Security
//!
//! - **Hiding**: perfectly hiding for uniformly random `r`.
//! - **Binding**: opening `C` to two different triples yields a discrete-log
//!   relation between `T`, `G`, and `H`, which the setup makes infeasible
//!   to know.

use ark_bn254::{Fr, G1Affine, G1Projective};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use std::fmt;

use super::params::PublicParams;
use crate::config::TOKEN_TYPE_DOMAIN;
use crate::crypto::hash::domain_separated_hash;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A public token: the commitment point, nothing else.
///
/// This is what lands on the ledger and what verifiers see.
#[derive(Clone, Copy, PartialEq, Eq, Hash, CanonicalSerialize, CanonicalDeserialize)]
pub struct Token {
    point: G1Affine,
}

impl Token {
    /// Wrap a point received from elsewhere.
    pub fn from_point(point: G1Affine) -> Self {
        Self { point }
    }

    /// The commitment point.
    pub fn point(&self) -> &G1Affine {
        &self.point
    }

    /// Serialize to compressed bytes (32 bytes).
    pub fn to_bytes(&self) -> Vec<u8> {
        super::encode(self)
    }

    /// Deserialize from compressed bytes, validating the point.
    pub fn from_bytes(data: &[u8]) -> crate::Result<Self> {
        super::decode_exact(data, "token")
    }

    /// Lower-case hex of the compressed encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({})", self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Commit / Open
// ---------------------------------------------------------------------------

/// Map a token type name to the scalar committed on `T`.
pub fn type_scalar(token_type: &str) -> Fr {
    Fr::from_le_bytes_mod_order(&domain_separated_hash(
        TOKEN_TYPE_DOMAIN,
        token_type.as_bytes(),
    ))
}

/// `t·T + v·G + r·H` for an already-hashed type.
pub(crate) fn commit_raw(params: &PublicParams, t: &Fr, value: &Fr, blinding: &Fr) -> G1Projective {
    params.type_generator().into_group() * t
        + params.value_generator().into_group() * value
        + params.blinding_generator().into_group() * blinding
}

/// Compute the commitment `C = t·T + v·G + r·H`.
pub fn commit(params: &PublicParams, value: &Fr, blinding: &Fr, token_type: &str) -> Token {
    let t = type_scalar(token_type);
    Token {
        point: commit_raw(params, &t, value, blinding).into_affine(),
    }
}

/// Check that `token` opens to `(value, blinding, token_type)`.
///
/// This reveals the opening and is NOT part of any verifier. Use it for
/// tests, debugging, and prover-side sanity checks only.
pub fn open(
    params: &PublicParams,
    token: &Token,
    value: &Fr,
    blinding: &Fr,
    token_type: &str,
) -> bool {
    commit(params, value, blinding, token_type) == *token
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
