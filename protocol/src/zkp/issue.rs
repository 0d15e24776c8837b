//! # Issue Protocol
//!
//! Minting new tokens. The issuer publishes a batch of tokens and a proof
//! that it knows an opening of every one of them, all under one token type
//! that the verifier never learns. Optionally each token also carries a
//! range proof.
//!
//! ```text
//! issuer                                   verifier
//! ──────                                   ────────
//! witnesses, tokens ──▶ Prover::prove ──▶ IssueProof ──▶ Verifier::verify
//!                          │                                 │
//!                          ├─ range proofs (optional)        ├─ shape
//!                          └─ opening proof, shared type     ├─ openings
//!                                                            └─ range proofs
//! ```
//!
//! The Fiat–Shamir challenge covers the parameter digest, the range-proof
//! flag, every token, and every opening commitment `A_i`.

use ark_bn254::Fr;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand::{CryptoRng, Rng};
use std::sync::Arc;

use super::commitment::{type_scalar, Token};
use super::params::PublicParams;
use super::range::RangeProof;
use super::wellformedness::{OpeningNonces, WellFormednessProof};
use super::witness::{common_type, TokenDataWitness};
use super::{check_openings, decode_exact, encode};
use crate::config::ISSUE_TRANSCRIPT_DOMAIN;
use crate::crypto::transcript::Transcript;
use crate::error::{InvalidProofReason, ZkatError};

// ---------------------------------------------------------------------------
// IssueProof
// ---------------------------------------------------------------------------

/// Non-interactive proof for an issue request.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct IssueProof {
    well_formedness: WellFormednessProof,
    range_proofs: Option<Vec<RangeProof>>,
}

impl IssueProof {
    /// Canonical compressed encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        encode(self)
    }

    /// Decode and validate every point. Trailing bytes are rejected.
    pub fn from_bytes(data: &[u8]) -> crate::Result<Self> {
        decode_exact(data, "issue proof")
    }

    /// Number of tokens covered.
    pub fn len(&self) -> usize {
        self.well_formedness.len()
    }

    pub fn is_empty(&self) -> bool {
        self.well_formedness.is_empty()
    }

    pub fn has_range_proofs(&self) -> bool {
        self.range_proofs.is_some()
    }
}

// ---------------------------------------------------------------------------
// Prover
// ---------------------------------------------------------------------------

/// Builds an [`IssueProof`] for a batch of freshly minted tokens.
pub struct Prover {
    witnesses: Vec<TokenDataWitness>,
    tokens: Vec<Token>,
    attach_range_proof: bool,
    params: Arc<PublicParams>,
}

impl Prover {
    /// `witnesses[i]` must open `tokens[i]`. Nothing is checked until
    /// [`prove`](Self::prove).
    pub fn new(
        witnesses: Vec<TokenDataWitness>,
        tokens: Vec<Token>,
        attach_range_proof: bool,
        params: Arc<PublicParams>,
    ) -> Self {
        Self {
            witnesses,
            tokens,
            attach_range_proof,
            params,
        }
    }

    /// Prove with the thread-local CSPRNG.
    pub fn prove(&self) -> crate::Result<IssueProof> {
        let mut rng = rand::thread_rng();
        self.prove_with_rng(&mut rng)
    }

    /// Prove with a caller-supplied CSPRNG.
    ///
    /// # Errors
    ///
    /// - [`ZkatError::MalformedInput`] for an empty or oversized batch, a
    ///   witness/token count mismatch, mixed types, or a witness that does
    ///   not open its token.
    /// - [`ZkatError::RangeProof`] if range proofs were requested and a
    ///   value is out of range.
    pub fn prove_with_rng<R: Rng + CryptoRng + ?Sized>(&self, rng: &mut R) -> crate::Result<IssueProof> {
        let params = self.params.as_ref();
        let count = self.tokens.len();

        if count == 0 {
            return Err(ZkatError::MalformedInput("issue of zero tokens".into()));
        }
        if self.witnesses.len() != count {
            return Err(ZkatError::MalformedInput(format!(
                "{} witnesses for {} tokens",
                self.witnesses.len(),
                count
            )));
        }
        if count > params.max_batch_size() {
            return Err(ZkatError::MalformedInput(format!(
                "batch of {} tokens exceeds the limit of {}",
                count,
                params.max_batch_size()
            )));
        }
        let token_type = common_type(&self.witnesses).ok_or_else(|| {
            ZkatError::MalformedInput("issued tokens must share one type".into())
        })?;
        check_openings(params, &self.witnesses, &self.tokens)?;

        tracing::debug!(tokens = count, range = self.attach_range_proof, "proving issue");

        // Range proofs first: an out-of-range value should fail before any
        // other work is done.
        let range_proofs = if self.attach_range_proof {
            Some(
                self.witnesses
                    .iter()
                    .zip(&self.tokens)
                    .map(|(w, token)| RangeProof::prove(params, token, w, rng))
                    .collect::<crate::Result<Vec<_>>>()?,
            )
        } else {
            None
        };

        let nonces = OpeningNonces::sample(params, count, rng);
        let mut transcript = start_transcript(params, &self.tokens, self.attach_range_proof);
        transcript.append_points(b"wf-commitments", nonces.commitments());
        let challenge = transcript.challenge_scalar(b"issue-challenge");

        let witnesses: Vec<&TokenDataWitness> = self.witnesses.iter().collect();
        let well_formedness = nonces.respond(&challenge, &type_scalar(token_type), &witnesses);

        Ok(IssueProof {
            well_formedness,
            range_proofs,
        })
    }
}

// ---------------------------------------------------------------------------
// Verifier
// ---------------------------------------------------------------------------

/// Checks an [`IssueProof`] against the published tokens. Holds no state
/// between calls.
pub struct Verifier {
    tokens: Vec<Token>,
    expect_range_proof: bool,
    params: Arc<PublicParams>,
}

impl Verifier {
    pub fn new(tokens: Vec<Token>, expect_range_proof: bool, params: Arc<PublicParams>) -> Self {
        Self {
            tokens,
            expect_range_proof,
            params,
        }
    }

    /// # Errors
    ///
    /// [`ZkatError::InvalidProof`] with the reason of the first failed check.
    pub fn verify(&self, proof: &IssueProof) -> crate::Result<()> {
        let result = self.check(proof);
        match &result {
            Ok(()) => tracing::debug!(tokens = self.tokens.len(), "issue proof verified"),
            Err(e) => tracing::warn!(error = %e, "issue proof rejected"),
        }
        result
    }

    fn check(&self, proof: &IssueProof) -> crate::Result<()> {
        let params = self.params.as_ref();
        let count = self.tokens.len();
        let structure = || ZkatError::invalid(InvalidProofReason::Structure);

        if count == 0 || count > params.max_batch_size() {
            return Err(structure());
        }
        if !proof.well_formedness.has_shape(count) {
            return Err(structure());
        }
        match (&proof.range_proofs, self.expect_range_proof) {
            (Some(proofs), true) if proofs.len() == count => {}
            (None, false) => {}
            _ => return Err(structure()),
        }

        let mut transcript = start_transcript(params, &self.tokens, self.expect_range_proof);
        proof.well_formedness.append_commitments(&mut transcript);
        let challenge: Fr = transcript.challenge_scalar(b"issue-challenge");
        proof
            .well_formedness
            .verify(params, &self.tokens, &challenge)?;

        if let Some(range_proofs) = &proof.range_proofs {
            for (range_proof, token) in range_proofs.iter().zip(&self.tokens) {
                range_proof.verify(params, token)?;
            }
        }
        Ok(())
    }
}

fn start_transcript(params: &PublicParams, tokens: &[Token], range: bool) -> Transcript {
    let mut transcript = Transcript::new(ISSUE_TRANSCRIPT_DOMAIN);
    transcript.append_bytes(b"params", params.digest());
    transcript.append_u64(b"range-proofs", u64::from(range));
    transcript.append_u64(b"token-count", tokens.len() as u64);
    for token in tokens {
        transcript.append_point(b"token", token.point());
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

    fn batch(
        pp: &PublicParams,
        token_type: &str,
        values: &[u64],
        rng: &mut StdRng,
    ) -> (Vec<TokenDataWitness>, Vec<Token>) {
        let witnesses: Vec<TokenDataWitness> = values
            .iter()
            .map(|v| TokenDataWitness::random(token_type, *v, rng))
            .collect();
        let tokens = witnesses.iter().map(|w| w.to_token(pp)).collect();
        (witnesses, tokens)
    }

    #[test]
    fn issue_with_range_proofs_verifies() {
        let mut rng = StdRng::seed_from_u64(42);
        let pp = Arc::new(PublicParams::setup(100, 2, None).unwrap());
        let (witnesses, tokens) = batch(&pp, "ABC", &[120, 190], &mut rng);

        let proof = Prover::new(witnesses, tokens.clone(), true, pp.clone())
            .prove_with_rng(&mut rng)
            .unwrap();
        assert_eq!(proof.len(), 2);
        assert!(proof.has_range_proofs());
        assert!(Verifier::new(tokens, true, pp).verify(&proof).is_ok());
    }

    #[test]
    fn issue_without_range_proofs_verifies() {
        let mut rng = StdRng::seed_from_u64(42);
        let pp = Arc::new(PublicParams::setup(10, 2, None).unwrap());
        // Out of range, but nobody asked for a range proof.
        let (witnesses, tokens) = batch(&pp, "ABC", &[500], &mut rng);

        let proof = Prover::new(witnesses, tokens.clone(), false, pp.clone())
            .prove_with_rng(&mut rng)
            .unwrap();
        assert!(!proof.has_range_proofs());
        assert!(Verifier::new(tokens, false, pp).verify(&proof).is_ok());
    }

    #[test]
    fn range_flag_must_match() {
        let mut rng = StdRng::seed_from_u64(42);
        let pp = Arc::new(PublicParams::setup(100, 2, None).unwrap());
        let (witnesses, tokens) = batch(&pp, "ABC", &[7], &mut rng);

        let with = Prover::new(witnesses.clone(), tokens.clone(), true, pp.clone())
            .prove_with_rng(&mut rng)
            .unwrap();
        let without = Prover::new(witnesses, tokens.clone(), false, pp.clone())
            .prove_with_rng(&mut rng)
            .unwrap();

        let err = Verifier::new(tokens.clone(), false, pp.clone())
            .verify(&with)
            .unwrap_err();
        assert_eq!(err.invalid_proof_reason(), Some(InvalidProofReason::Structure));
        assert!(Verifier::new(tokens, true, pp).verify(&without).is_err());
    }

    #[test]
    fn out_of_range_value_fails_at_prove_time() {
        let mut rng = StdRng::seed_from_u64(42);
        let pp = Arc::new(PublicParams::setup(10, 2, None).unwrap());
        let (witnesses, tokens) = batch(&pp, "ABC", &[5, 100], &mut rng);

        let result = Prover::new(witnesses, tokens, true, pp).prove_with_rng(&mut rng);
        assert!(matches!(result, Err(ZkatError::RangeProof { bound: 100 })));
    }

    #[test]
    fn malformed_batches_are_rejected() {
        let mut rng = StdRng::seed_from_u64(42);
        let pp = Arc::new(PublicParams::setup_with_batch_size(100, 2, 2, None).unwrap());

        // Empty.
        let r = Prover::new(vec![], vec![], true, pp.clone()).prove_with_rng(&mut rng);
        assert!(matches!(r, Err(ZkatError::MalformedInput(_))));

        // Count mismatch.
        let (witnesses, tokens) = batch(&pp, "ABC", &[1, 2], &mut rng);
        let r = Prover::new(witnesses[..1].to_vec(), tokens, true, pp.clone())
            .prove_with_rng(&mut rng);
        assert!(matches!(r, Err(ZkatError::MalformedInput(_))));

        // Over the batch limit.
        let (witnesses, tokens) = batch(&pp, "ABC", &[1, 2, 3], &mut rng);
        let r = Prover::new(witnesses, tokens, true, pp.clone()).prove_with_rng(&mut rng);
        assert!(matches!(r, Err(ZkatError::MalformedInput(_))));

        // Mixed types.
        let (mut witnesses, mut tokens) = batch(&pp, "ABC", &[1], &mut rng);
        let (other_w, other_t) = batch(&pp, "XYZ", &[1], &mut rng);
        witnesses.extend(other_w);
        tokens.extend(other_t);
        let r = Prover::new(witnesses, tokens, true, pp.clone()).prove_with_rng(&mut rng);
        assert!(matches!(r, Err(ZkatError::MalformedInput(_))));

        // Witness does not open its token.
        let (witnesses, mut tokens) = batch(&pp, "ABC", &[1, 2], &mut rng);
        tokens.swap(0, 1);
        let r = Prover::new(witnesses, tokens, true, pp).prove_with_rng(&mut rng);
        assert!(matches!(r, Err(ZkatError::MalformedInput(_))));
    }

    #[test]
    fn proof_does_not_transfer_to_other_tokens() {
        let mut rng = StdRng::seed_from_u64(42);
        let pp = Arc::new(PublicParams::setup(100, 2, None).unwrap());
        let (witnesses, tokens) = batch(&pp, "ABC", &[10, 20], &mut rng);
        let (_, other_tokens) = batch(&pp, "ABC", &[10, 20], &mut rng);

        let proof = Prover::new(witnesses, tokens, false, pp.clone())
            .prove_with_rng(&mut rng)
            .unwrap();
        let err = Verifier::new(other_tokens, false, pp).verify(&proof).unwrap_err();
        assert_eq!(
            err.invalid_proof_reason(),
            Some(InvalidProofReason::WellFormedness)
        );
    }

    #[test]
    fn proof_bytes_round_trip() {
        let mut rng = StdRng::seed_from_u64(42);
        let pp = Arc::new(PublicParams::setup(10, 2, None).unwrap());
        let (witnesses, tokens) = batch(&pp, "ABC", &[3, 4], &mut rng);

        let proof = Prover::new(witnesses, tokens.clone(), true, pp.clone())
            .prove_with_rng(&mut rng)
            .unwrap();
        let bytes = proof.to_bytes();
        let decoded = IssueProof::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, proof);
        assert!(Verifier::new(tokens, true, pp).verify(&decoded).is_ok());

        let mut extended = bytes;
        extended.push(0);
        assert!(matches!(
            IssueProof::from_bytes(&extended),
            Err(ZkatError::Serialization(_))
        ));
    }
}
