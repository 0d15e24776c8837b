//! Error types for the ZKAT proof engine.
//!
//! Every fallible operation in the crate returns a [`ZkatError`]. The
//! variants follow the lifecycle of a proof: parameters are configured,
//! inputs are validated, the prover may refuse an out-of-range value, and
//! the verifier may reject a proof. Verifier rejections carry a typed
//! [`InvalidProofReason`] so callers can branch on the failure class
//! instead of grepping error strings.

use std::fmt;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ZkatError>;

/// Errors produced by setup, proving, and verification.
#[derive(Debug, Error)]
pub enum ZkatError {
    /// The public-parameter configuration is unusable (base < 2, zero
    /// digits, range overflow, generator derivation failure, ...).
    #[error("invalid public parameters: {0}")]
    Configuration(String),

    /// Witnesses and commitments do not line up, a batch is empty or too
    /// large, witnesses mix token types, or a witness does not open its
    /// commitment.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A witness value cannot be proven inside `[0, bound)`. Raised by the
    /// prover before any proof leaves the process.
    #[error("can't compute range proof: value of token outside authorized range [0, {bound})")]
    RangeProof {
        /// Exclusive upper bound of the authorized range (`base^digits`).
        bound: u64,
    },

    /// The verifier rejected a proof.
    #[error("{reason}")]
    InvalidProof {
        /// Which check failed.
        reason: InvalidProofReason,
    },

    /// Encoding or decoding of parameters, tokens, or proofs failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ZkatError {
    /// Shorthand for a verifier rejection.
    pub fn invalid(reason: InvalidProofReason) -> Self {
        ZkatError::InvalidProof { reason }
    }

    /// The rejection reason, if this is a verifier rejection.
    pub fn invalid_proof_reason(&self) -> Option<InvalidProofReason> {
        match self {
            ZkatError::InvalidProof { reason } => Some(*reason),
            _ => None,
        }
    }
}

impl From<ark_serialize::SerializationError> for ZkatError {
    fn from(err: ark_serialize::SerializationError) -> Self {
        ZkatError::Serialization(err.to_string())
    }
}

/// The check that caused a verifier to reject a proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidProofReason {
    /// The proof's shape does not match the public statement (wrong number
    /// of tokens, missing or unexpected range proofs).
    Structure,
    /// A token's opening equation failed, or the tokens do not share one type.
    WellFormedness,
    /// Inputs and outputs do not carry the same total value.
    Conservation,
    /// A range sub-proof failed.
    RangeProof,
}

impl fmt::Display for InvalidProofReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            InvalidProofReason::Structure => "invalid proof: does not match the public statement",
            InvalidProofReason::WellFormedness => "invalid zero-knowledge well-formedness proof",
            InvalidProofReason::Conservation => {
                "invalid zero-knowledge transfer: input and output values do not balance"
            }
            InvalidProofReason::RangeProof => "invalid zero-knowledge range proof",
        };
        f.write_str(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_error_names_the_bound() {
        let err = ZkatError::RangeProof { bound: 100 };
        let msg = err.to_string();
        assert!(msg.contains("can't compute range proof: value of token outside authorized range"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn conservation_failure_reads_as_invalid_transfer() {
        let err = ZkatError::invalid(InvalidProofReason::Conservation);
        assert!(err.to_string().contains("invalid zero-knowledge transfer"));
        assert_eq!(
            err.invalid_proof_reason(),
            Some(InvalidProofReason::Conservation)
        );
    }

    #[test]
    fn only_verifier_rejections_carry_a_reason() {
        assert_eq!(
            ZkatError::MalformedInput("x".into()).invalid_proof_reason(),
            None
        );
        assert_eq!(
            ZkatError::invalid(InvalidProofReason::RangeProof).invalid_proof_reason(),
            Some(InvalidProofReason::RangeProof)
        );
    }
}
