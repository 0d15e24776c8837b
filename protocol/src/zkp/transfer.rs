//! # Transfer Protocol
//!
//! Spending input tokens into output tokens of the same type. One proof
//! shows, at once:
//!
//! 1. **Well-formedness**: the prover knows an opening of every input and
//!    every output, all under one shared type (this is also type
//!    preservation).
//! 2. **Conservation**: the input values sum to the output values.
//! 3. **Range**: every output value lies in `[0, base^digits)`. Inputs were
//!    range-checked when they were created.
//!
//! ## Conservation
//!
//! With `n` inputs and `m` outputs,
//!
//! ```text
//! D = ΣC_in − ΣC_out = (n−m)·t·T + (Σv_in − Σv_out)·G + δ·H
//!                                                  δ = Σr_in − Σr_out
//! ```
//!
//! The value term vanishes exactly when the sums match. The prover shows
//! `D = (n−m)·t·T + δ·H` for the same `t` used in the well-formedness
//! proof by reusing its type nonce:
//!
//! ```text
//! commit:   B   = (n−m)·a_t·T + b·H
//! respond:  z_δ = b + c·δ              (z_t comes from well-formedness)
//! verify:   (n−m)·z_t·T + z_δ·H == B + c·D
//! ```
//!
//! An unbalanced transfer still produces a proof. It is the verifier that
//! rejects it, with [`InvalidProofReason::Conservation`].

use ark_bn254::{Fr, G1Affine};
use ark_ec::{AffineRepr, CurveGroup};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand::{CryptoRng, Rng};
use std::sync::Arc;

use super::commitment::{type_scalar, Token};
use super::params::PublicParams;
use super::range::RangeProof;
use super::wellformedness::{OpeningNonces, WellFormednessProof};
use super::witness::{common_type, TokenDataWitness};
use super::{check_openings, decode_exact, encode};
use crate::config::TRANSFER_TRANSCRIPT_DOMAIN;
use crate::crypto::algebra::{random_scalar, sum_points};
use crate::crypto::transcript::Transcript;
use crate::error::{InvalidProofReason, ZkatError};

pub use super::witness::WellFormednessWitness;

// ---------------------------------------------------------------------------
// Proof types
// ---------------------------------------------------------------------------

/// Knowledge of `δ` in `D = (n−m)·t·T + δ·H`.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct ConservationProof {
    commitment: G1Affine,
    blinding_response: Fr,
}

/// Non-interactive proof for a transfer request.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct TransferProof {
    well_formedness: WellFormednessProof,
    conservation: ConservationProof,
    /// One per output, in output order.
    range_proofs: Vec<RangeProof>,
}

impl TransferProof {
    pub fn to_bytes(&self) -> Vec<u8> {
        encode(self)
    }

    /// Decode and validate every point. Trailing bytes are rejected.
    pub fn from_bytes(data: &[u8]) -> crate::Result<Self> {
        decode_exact(data, "transfer proof")
    }

    /// Number of output range proofs carried.
    pub fn outputs(&self) -> usize {
        self.range_proofs.len()
    }
}

// ---------------------------------------------------------------------------
// Prover
// ---------------------------------------------------------------------------

pub struct Prover {
    inputs: Vec<TokenDataWitness>,
    outputs: Vec<TokenDataWitness>,
    input_tokens: Vec<Token>,
    output_tokens: Vec<Token>,
    params: Arc<PublicParams>,
}

impl Prover {
    pub fn new(
        inputs: Vec<TokenDataWitness>,
        outputs: Vec<TokenDataWitness>,
        input_tokens: Vec<Token>,
        output_tokens: Vec<Token>,
        params: Arc<PublicParams>,
    ) -> Self {
        Self {
            inputs,
            outputs,
            input_tokens,
            output_tokens,
            params,
        }
    }

    /// Same as [`new`](Self::new), taking the witnesses as one aggregate.
    pub fn from_witness(
        witness: WellFormednessWitness,
        input_tokens: Vec<Token>,
        output_tokens: Vec<Token>,
        params: Arc<PublicParams>,
    ) -> Self {
        let (inputs, outputs) = witness.into_parts();
        Self::new(inputs, outputs, input_tokens, output_tokens, params)
    }

    pub fn prove(&self) -> crate::Result<TransferProof> {
        let mut rng = rand::thread_rng();
        self.prove_with_rng(&mut rng)
    }

    /// # Errors
    ///
    /// - [`ZkatError::MalformedInput`] for empty or oversized sides, count
    ///   mismatches, mixed types, or a witness that does not open its token.
    /// - [`ZkatError::RangeProof`] if an output value is out of range,
    ///   whether or not the transfer balances.
    pub fn prove_with_rng<R: Rng + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> crate::Result<TransferProof> {
        let params = self.params.as_ref();
        self.check_inputs()?;
        let token_type = common_type(self.inputs.iter().chain(&self.outputs)).ok_or_else(|| {
            ZkatError::MalformedInput("inputs and outputs must share one type".into())
        })?;

        tracing::debug!(
            inputs = self.inputs.len(),
            outputs = self.outputs.len(),
            "proving transfer"
        );

        let range_proofs = self
            .outputs
            .iter()
            .zip(&self.output_tokens)
            .map(|(w, token)| RangeProof::prove(params, token, w, rng))
            .collect::<crate::Result<Vec<_>>>()?;

        let count = self.inputs.len() + self.outputs.len();
        let nonces = OpeningNonces::sample(params, count, rng);

        let k = side_difference(self.inputs.len(), self.outputs.len());
        let blinding_nonce = random_scalar(rng);
        let conservation_commitment = (params.type_generator().into_group()
            * (k * nonces.type_nonce())
            + params.blinding_generator().into_group() * blinding_nonce)
            .into_affine();

        let mut transcript = start_transcript(params, &self.input_tokens, &self.output_tokens);
        transcript.append_points(b"wf-commitments", nonces.commitments());
        transcript.append_point(b"conservation-commitment", &conservation_commitment);
        let challenge = transcript.challenge_scalar(b"transfer-challenge");

        let witnesses: Vec<&TokenDataWitness> = self.inputs.iter().chain(&self.outputs).collect();
        let well_formedness = nonces.respond(&challenge, &type_scalar(token_type), &witnesses);

        let delta: Fr = self.inputs.iter().map(|w| w.blinding_factor).sum::<Fr>()
            - self.outputs.iter().map(|w| w.blinding_factor).sum::<Fr>();

        Ok(TransferProof {
            well_formedness,
            conservation: ConservationProof {
                commitment: conservation_commitment,
                blinding_response: blinding_nonce + challenge * delta,
            },
            range_proofs,
        })
    }

    fn check_inputs(&self) -> crate::Result<()> {
        let params = self.params.as_ref();
        let limit = params.max_batch_size();

        if self.inputs.is_empty() || self.outputs.is_empty() {
            return Err(ZkatError::MalformedInput(
                "a transfer needs at least one input and one output".into(),
            ));
        }
        if self.inputs.len() != self.input_tokens.len()
            || self.outputs.len() != self.output_tokens.len()
        {
            return Err(ZkatError::MalformedInput(format!(
                "{}/{} witnesses for {}/{} tokens",
                self.inputs.len(),
                self.outputs.len(),
                self.input_tokens.len(),
                self.output_tokens.len()
            )));
        }
        if self.inputs.len() > limit || self.outputs.len() > limit {
            return Err(ZkatError::MalformedInput(format!(
                "transfer side exceeds the batch limit of {}",
                limit
            )));
        }
        check_openings(params, &self.inputs, &self.input_tokens)?;
        check_openings(params, &self.outputs, &self.output_tokens)
    }
}

// ---------------------------------------------------------------------------
// Verifier
// ---------------------------------------------------------------------------

pub struct Verifier {
    input_tokens: Vec<Token>,
    output_tokens: Vec<Token>,
    params: Arc<PublicParams>,
}

impl Verifier {
    pub fn new(input_tokens: Vec<Token>, output_tokens: Vec<Token>, params: Arc<PublicParams>) -> Self {
        Self {
            input_tokens,
            output_tokens,
            params,
        }
    }

    /// Checks structure, then well-formedness, then conservation, then
    /// every output range proof, and reports the first failure.
    pub fn verify(&self, proof: &TransferProof) -> crate::Result<()> {
        let result = self.check(proof);
        match &result {
            Ok(()) => tracing::debug!(
                inputs = self.input_tokens.len(),
                outputs = self.output_tokens.len(),
                "transfer proof verified"
            ),
            Err(e) => tracing::warn!(error = %e, "transfer proof rejected"),
        }
        result
    }

    fn check(&self, proof: &TransferProof) -> crate::Result<()> {
        let params = self.params.as_ref();
        let (n, m) = (self.input_tokens.len(), self.output_tokens.len());
        let limit = params.max_batch_size();

        if n == 0 || m == 0 || n > limit || m > limit {
            return Err(ZkatError::invalid(InvalidProofReason::Structure));
        }
        if !proof.well_formedness.has_shape(n + m) || proof.range_proofs.len() != m {
            return Err(ZkatError::invalid(InvalidProofReason::Structure));
        }

        let mut transcript = start_transcript(params, &self.input_tokens, &self.output_tokens);
        proof.well_formedness.append_commitments(&mut transcript);
        transcript.append_point(b"conservation-commitment", &proof.conservation.commitment);
        let challenge = transcript.challenge_scalar(b"transfer-challenge");

        let all_tokens: Vec<Token> = self
            .input_tokens
            .iter()
            .chain(&self.output_tokens)
            .copied()
            .collect();
        proof.well_formedness.verify(params, &all_tokens, &challenge)?;

        let difference = sum_points(self.input_tokens.iter().map(Token::point))
            - sum_points(self.output_tokens.iter().map(Token::point));
        let k = side_difference(n, m);
        let lhs = params.type_generator().into_group()
            * (k * proof.well_formedness.type_response())
            + params.blinding_generator().into_group() * proof.conservation.blinding_response;
        let rhs = proof.conservation.commitment.into_group() + difference * challenge;
        if lhs != rhs {
            return Err(ZkatError::invalid(InvalidProofReason::Conservation));
        }

        for (range_proof, token) in proof.range_proofs.iter().zip(&self.output_tokens) {
            range_proof.verify(params, token)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `n − m` as a field element; negative when there are more outputs.
fn side_difference(inputs: usize, outputs: usize) -> Fr {
    if inputs >= outputs {
        Fr::from((inputs - outputs) as u64)
    } else {
        -Fr::from((outputs - inputs) as u64)
    }
}

fn start_transcript(params: &PublicParams, inputs: &[Token], outputs: &[Token]) -> Transcript {
    let mut transcript = Transcript::new(TRANSFER_TRANSCRIPT_DOMAIN);
    transcript.append_bytes(b"params", params.digest());
    transcript.append_u64(b"input-count", inputs.len() as u64);
    for token in inputs {
        transcript.append_point(b"input", token.point());
    }
    transcript.append_u64(b"output-count", outputs.len() as u64);
    for token in outputs {
        transcript.append_point(b"output", token.point());
    }
    transcript
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    struct Fixture {
        pp: Arc<PublicParams>,
        inputs: Vec<TokenDataWitness>,
        outputs: Vec<TokenDataWitness>,
    }

    impl Fixture {
        fn new(base: u64, digits: u32, ins: &[u64], outs: &[u64], rng: &mut StdRng) -> Self {
            let pp = Arc::new(PublicParams::setup(base, digits, None).unwrap());
            let inputs = ins
                .iter()
                .map(|v| TokenDataWitness::random("ABC", *v, rng))
                .collect();
            let outputs = outs
                .iter()
                .map(|v| TokenDataWitness::random("ABC", *v, rng))
                .collect();
            Self { pp, inputs, outputs }
        }

        fn tokens(&self) -> (Vec<Token>, Vec<Token>) {
            WellFormednessWitness::new(self.inputs.clone(), self.outputs.clone()).tokens(&self.pp)
        }

        fn prove(&self, rng: &mut StdRng) -> crate::Result<TransferProof> {
            let (ins, outs) = self.tokens();
            Prover::new(
                self.inputs.clone(),
                self.outputs.clone(),
                ins,
                outs,
                self.pp.clone(),
            )
            .prove_with_rng(rng)
        }

        fn verify(&self, proof: &TransferProof) -> crate::Result<()> {
            let (ins, outs) = self.tokens();
            Verifier::new(ins, outs, self.pp.clone()).verify(proof)
        }
    }

    #[test]
    fn balanced_transfer_verifies() {
        let mut rng = StdRng::seed_from_u64(42);
        let fx = Fixture::new(100, 2, &[90, 60], &[50, 100], &mut rng);
        let proof = fx.prove(&mut rng).unwrap();
        assert_eq!(proof.outputs(), 2);
        assert!(fx.verify(&proof).is_ok());
    }

    #[test]
    fn uneven_sides_verify() {
        let mut rng = StdRng::seed_from_u64(42);
        for (ins, outs) in [
            (&[150u64][..], &[50u64, 100][..]),
            (&[90, 60][..], &[150][..]),
            (&[10, 20, 30][..], &[1, 59][..]),
        ] {
            let fx = Fixture::new(100, 2, ins, outs, &mut rng);
            let proof = fx.prove(&mut rng).unwrap();
            assert!(fx.verify(&proof).is_ok(), "{:?} -> {:?}", ins, outs);
        }
    }

    #[test]
    fn unbalanced_transfer_proves_but_fails_conservation() {
        let mut rng = StdRng::seed_from_u64(42);
        let fx = Fixture::new(100, 2, &[90, 60], &[110, 45], &mut rng);
        let proof = fx.prove(&mut rng).expect("unbalanced transfer still proves");

        let err = fx.verify(&proof).unwrap_err();
        assert_eq!(
            err.invalid_proof_reason(),
            Some(InvalidProofReason::Conservation)
        );
        assert!(err.to_string().contains("invalid zero-knowledge transfer"));
    }

    #[test]
    fn out_of_range_output_fails_at_prove_time() {
        let mut rng = StdRng::seed_from_u64(42);
        let fx = Fixture::new(10, 2, &[90, 60], &[50, 100], &mut rng);
        match fx.prove(&mut rng) {
            Err(ZkatError::RangeProof { bound }) => assert_eq!(bound, 100),
            other => panic!("expected range error, got {:?}", other),
        }
    }

    #[test]
    fn mixed_types_are_malformed() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut fx = Fixture::new(100, 2, &[10], &[10], &mut rng);
        fx.outputs[0] = TokenDataWitness::random("XYZ", 10, &mut rng);
        assert!(matches!(fx.prove(&mut rng), Err(ZkatError::MalformedInput(_))));
    }

    #[test]
    fn swapped_output_tokens_fail() {
        let mut rng = StdRng::seed_from_u64(42);
        let fx = Fixture::new(100, 2, &[90, 60], &[50, 100], &mut rng);
        let proof = fx.prove(&mut rng).unwrap();

        let (ins, mut outs) = fx.tokens();
        outs.swap(0, 1);
        let err = Verifier::new(ins, outs, fx.pp.clone())
            .verify(&proof)
            .unwrap_err();
        assert_eq!(
            err.invalid_proof_reason(),
            Some(InvalidProofReason::WellFormedness)
        );
    }

    #[test]
    fn swapped_range_proofs_fail_range_check() {
        let mut rng = StdRng::seed_from_u64(42);
        let fx = Fixture::new(100, 2, &[90, 60], &[50, 100], &mut rng);
        let mut proof = fx.prove(&mut rng).unwrap();
        proof.range_proofs.swap(0, 1);

        let err = fx.verify(&proof).unwrap_err();
        assert_eq!(
            err.invalid_proof_reason(),
            Some(InvalidProofReason::RangeProof)
        );
        assert!(err.to_string().contains("invalid zero-knowledge range proof"));
    }

    #[test]
    fn from_witness_matches_new() {
        let mut rng = StdRng::seed_from_u64(42);
        let fx = Fixture::new(100, 2, &[30], &[10, 20], &mut rng);
        let (ins, outs) = fx.tokens();
        let wfw = WellFormednessWitness::new(fx.inputs.clone(), fx.outputs.clone());

        let proof = Prover::from_witness(wfw, ins, outs, fx.pp.clone())
            .prove_with_rng(&mut rng)
            .unwrap();
        assert!(fx.verify(&proof).is_ok());
    }

    #[test]
    fn proof_bytes_round_trip() {
        let mut rng = StdRng::seed_from_u64(42);
        let fx = Fixture::new(10, 2, &[9], &[4, 5], &mut rng);
        let proof = fx.prove(&mut rng).unwrap();

        let decoded = TransferProof::from_bytes(&proof.to_bytes()).unwrap();
        assert_eq!(decoded, proof);
        assert!(fx.verify(&decoded).is_ok());
    }

    #[test]
    fn side_difference_signs() {
        assert_eq!(side_difference(3, 1), Fr::from(2u64));
        assert_eq!(side_difference(2, 2), Fr::from(0u64));
        assert_eq!(side_difference(1, 3), -Fr::from(2u64));
    }
}
