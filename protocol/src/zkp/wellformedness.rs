//! # Well-Formedness Proofs
//!
//! A Schnorr-style proof of knowledge of the openings of a batch of
//! tokens that all share one (hidden) type:
//!
//! ```text
//! statement:  C_i = t·T + v_i·G + r_i·H        for every i
//!
//! commit:     A_i = a_t·T + a_vi·G + a_ri·H     (a_t shared by every i)
//! challenge:  c   = H(transcript ‖ C_* ‖ A_*)
//! respond:    z_t = a_t + c·t
//!             z_vi = a_vi + c·v_i
//!             z_ri = a_ri + c·r_i
//! verify:     z_t·T + z_vi·G + z_ri·H == A_i + c·C_i
//! ```
//!
//! The single `z_t` is what proves type equality: two accepting transcripts
//! with different challenges extract the same `t` for every token.
//!
//! The challenge itself is derived by the calling protocol (issue or
//! transfer), which may bind further first-round messages into it.

use ark_bn254::{Fr, G1Affine, G1Projective};
use ark_ec::AffineRepr;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand::{CryptoRng, Rng};

use super::commitment::{commit_raw, Token};
use super::params::PublicParams;
use super::witness::TokenDataWitness;
use crate::crypto::algebra::{normalize, random_scalar};
use crate::crypto::transcript::Transcript;
use crate::error::{InvalidProofReason, ZkatError};

/// First-round messages and responses for a batch of token openings.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct WellFormednessProof {
    /// `A_i`, one per token.
    pub(crate) commitments: Vec<G1Affine>,
    pub(crate) type_response: Fr,
    pub(crate) value_responses: Vec<Fr>,
    pub(crate) blinding_responses: Vec<Fr>,
}

/// Prover state between sampling nonces and answering the challenge.
pub(crate) struct OpeningNonces {
    type_nonce: Fr,
    value_nonces: Vec<Fr>,
    blinding_nonces: Vec<Fr>,
    commitments: Vec<G1Affine>,
}

impl OpeningNonces {
    /// Sample fresh nonces for `count` tokens and compute every `A_i`.
    pub(crate) fn sample<R: Rng + CryptoRng + ?Sized>(
        params: &PublicParams,
        count: usize,
        rng: &mut R,
    ) -> Self {
        let type_nonce = random_scalar(rng);
        let value_nonces: Vec<Fr> = (0..count).map(|_| random_scalar(rng)).collect();
        let blinding_nonces: Vec<Fr> = (0..count).map(|_| random_scalar(rng)).collect();

        let points: Vec<G1Projective> = value_nonces
            .iter()
            .zip(&blinding_nonces)
            .map(|(a_v, a_r)| commit_raw(params, &type_nonce, a_v, a_r))
            .collect();

        Self {
            type_nonce,
            value_nonces,
            blinding_nonces,
            commitments: normalize(&points),
        }
    }

    pub(crate) fn type_nonce(&self) -> &Fr {
        &self.type_nonce
    }

    pub(crate) fn commitments(&self) -> &[G1Affine] {
        &self.commitments
    }

    /// Answer the challenge. `witnesses` must be in token order and share
    /// the type whose scalar is `type_scalar`.
    pub(crate) fn respond(
        self,
        challenge: &Fr,
        type_scalar: &Fr,
        witnesses: &[&TokenDataWitness],
    ) -> WellFormednessProof {
        let value_responses = self
            .value_nonces
            .iter()
            .zip(witnesses)
            .map(|(a_v, w)| *a_v + *challenge * w.value)
            .collect();
        let blinding_responses = self
            .blinding_nonces
            .iter()
            .zip(witnesses)
            .map(|(a_r, w)| *a_r + *challenge * w.blinding_factor)
            .collect();

        WellFormednessProof {
            commitments: self.commitments,
            type_response: self.type_nonce + *challenge * type_scalar,
            value_responses,
            blinding_responses,
        }
    }
}

impl WellFormednessProof {
    /// Number of tokens this proof covers.
    pub fn len(&self) -> usize {
        self.commitments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commitments.is_empty()
    }

    /// The shared type response `z_t`.
    pub(crate) fn type_response(&self) -> &Fr {
        &self.type_response
    }

    /// Whether every vector has exactly `count` entries.
    pub(crate) fn has_shape(&self, count: usize) -> bool {
        self.commitments.len() == count
            && self.value_responses.len() == count
            && self.blinding_responses.len() == count
    }

    /// Bind the first-round messages into the caller's transcript.
    pub(crate) fn append_commitments(&self, transcript: &mut Transcript) {
        transcript.append_points(b"wf-commitments", &self.commitments);
    }

    /// Check every opening equation against `tokens` under `challenge`.
    ///
    /// Callers check the shape first; a length mismatch here is reported as
    /// a structural failure.
    pub(crate) fn verify(
        &self,
        params: &PublicParams,
        tokens: &[Token],
        challenge: &Fr,
    ) -> crate::Result<()> {
        if !self.has_shape(tokens.len()) {
            return Err(ZkatError::invalid(InvalidProofReason::Structure));
        }

        for (i, token) in tokens.iter().enumerate() {
            let lhs = commit_raw(
                params,
                &self.type_response,
                &self.value_responses[i],
                &self.blinding_responses[i],
            );
            let rhs = self.commitments[i].into_group() + token.point().into_group() * challenge;
            if lhs != rhs {
                tracing::debug!(index = i, "opening equation failed");
                return Err(ZkatError::invalid(InvalidProofReason::WellFormedness));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zkp::commitment::type_scalar;
    use rand::{rngs::StdRng, SeedableRng};

    fn prove_batch(
        params: &PublicParams,
        witnesses: &[TokenDataWitness],
        challenge: Fr,
    ) -> WellFormednessProof {
        let mut rng = StdRng::seed_from_u64(42);
        let nonces = OpeningNonces::sample(params, witnesses.len(), &mut rng);
        let refs: Vec<&TokenDataWitness> = witnesses.iter().collect();
        nonces.respond(&challenge, &type_scalar(&witnesses[0].token_type), &refs)
    }

    #[test]
    fn honest_openings_verify() {
        let mut rng = StdRng::seed_from_u64(42);
        let pp = PublicParams::setup(10, 2, None).unwrap();
        let ws = vec![
            TokenDataWitness::random("ABC", 5, &mut rng),
            TokenDataWitness::random("ABC", 7, &mut rng),
        ];
        let tokens: Vec<Token> = ws.iter().map(|w| w.to_token(&pp)).collect();
        let c = Fr::from(1234u64);

        let proof = prove_batch(&pp, &ws, c);
        assert_eq!(proof.len(), 2);
        assert!(proof.verify(&pp, &tokens, &c).is_ok());
    }

    #[test]
    fn wrong_challenge_fails() {
        let mut rng = StdRng::seed_from_u64(42);
        let pp = PublicParams::setup(10, 2, None).unwrap();
        let ws = vec![TokenDataWitness::random("ABC", 5, &mut rng)];
        let tokens: Vec<Token> = ws.iter().map(|w| w.to_token(&pp)).collect();

        let proof = prove_batch(&pp, &ws, Fr::from(1u64));
        let err = proof.verify(&pp, &tokens, &Fr::from(2u64)).unwrap_err();
        assert_eq!(
            err.invalid_proof_reason(),
            Some(InvalidProofReason::WellFormedness)
        );
    }

    #[test]
    fn mixed_types_cannot_share_a_type_response() {
        let mut rng = StdRng::seed_from_u64(42);
        let pp = PublicParams::setup(10, 2, None).unwrap();
        let ws = vec![
            TokenDataWitness::random("ABC", 5, &mut rng),
            TokenDataWitness::random("XYZ", 5, &mut rng),
        ];
        let tokens: Vec<Token> = ws.iter().map(|w| w.to_token(&pp)).collect();
        let c = Fr::from(99u64);

        let proof = prove_batch(&pp, &ws, c);
        assert!(proof.verify(&pp, &tokens, &c).is_err());
    }

    #[test]
    fn shape_mismatch_is_structural() {
        let mut rng = StdRng::seed_from_u64(42);
        let pp = PublicParams::setup(10, 2, None).unwrap();
        let ws = vec![TokenDataWitness::random("ABC", 5, &mut rng)];
        let c = Fr::from(3u64);
        let proof = prove_batch(&pp, &ws, c);

        let two_tokens = vec![ws[0].to_token(&pp), ws[0].to_token(&pp)];
        let err = proof.verify(&pp, &two_tokens, &c).unwrap_err();
        assert_eq!(err.invalid_proof_reason(), Some(InvalidProofReason::Structure));
    }
}
