//! # Range Proofs
//!
//! Proves that a token `C = t·T + v·G + r·H` commits to `0 ≤ v < b^d`
//! (`b = range_base`, `d = range_digits`) without revealing `v`.
//!
//! ## Construction
//!
//! 1. Decompose `v = Σ v_i·b^i` with `0 ≤ v_i < b`.
//! 2. Commit to each digit, `C_i = v_i·G + r_i·H`, with the last `r_i`
//!    solved so that `Σ r_i·b^i = r`. Then `C − Σ b^i·C_i = t·T`.
//! 3. For every digit, an OR-proof that `C_i − k·G` is a multiple of `H`
//!    for some `k` in `0..b`. The true branch runs a real Schnorr proof,
//!    the other `b − 1` branches are simulated, and the branch challenges
//!    are forced to sum to the one global challenge.
//! 4. A Schnorr proof of knowledge of `t` with `C − Σ b^i·C_i = t·T`. This
//!    is the reconstruction identity with the type factor accounted for.
//!
//! The global challenge hashes the parameter digest, `C`, every `C_i`, every
//! branch announcement, and the type announcement. The proof stores the
//! challenge and responses only; the verifier recomputes the announcements
//! and checks that they hash back to the same challenge.
//!
//! ## Per-digit prover
//!
//! Each digit walks three states:
//!
//! ```text
//! DigitProver ──sample_commitments──▶ SampledDigit ──respond(c)──▶ DigitProof
//!   (witness)      (real nonce +         (announcements        (complement
//!                   simulated branches)   into transcript)      challenge)
//! ```
//!
//! Values at or above `b^d` (or scalars that are not small non-negative
//! integers at all) cannot be decomposed and fail with
//! [`ZkatError::RangeProof`] before anything is sampled.

use ark_bn254::{Fr, G1Affine, G1Projective};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{Field, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand::{CryptoRng, Rng};

use super::commitment::Token;
use super::params::{digit_weights, PublicParams};
use super::witness::TokenDataWitness;
use crate::config::RANGE_TRANSCRIPT_DOMAIN;
use crate::crypto::algebra::{linear_combination, normalize, random_scalar, scalar_to_u64};
use crate::crypto::transcript::Transcript;
use crate::error::{InvalidProofReason, ZkatError};

// ---------------------------------------------------------------------------
// Proof types
// ---------------------------------------------------------------------------

/// Membership proof for one digit commitment: one challenge and one
/// response per candidate digit value.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct DigitProof {
    challenges: Vec<Fr>,
    responses: Vec<Fr>,
}

/// Proof that one token's value lies in `[0, range_base^range_digits)`.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct RangeProof {
    challenge: Fr,
    digit_commitments: Vec<G1Affine>,
    digit_proofs: Vec<DigitProof>,
    type_response: Fr,
}

// ---------------------------------------------------------------------------
// Per-digit state machine
// ---------------------------------------------------------------------------

/// State 1: knows the digit, its blinding, and its commitment.
struct DigitProver<'a> {
    params: &'a PublicParams,
    commitment: G1Projective,
    digit: usize,
    blinding: Fr,
}

/// State 2: announcements fixed, waiting for the global challenge.
struct SampledDigit {
    digit: usize,
    blinding: Fr,
    nonce: Fr,
    challenges: Vec<Fr>,
    responses: Vec<Fr>,
    announcements: Vec<G1Affine>,
}

impl<'a> DigitProver<'a> {
    fn new(params: &'a PublicParams, commitment: G1Projective, digit: usize, blinding: Fr) -> Self {
        Self {
            params,
            commitment,
            digit,
            blinding,
        }
    }

    /// Real announcement `w·H` on the true branch; `z_k·H − c_k·(C_i − k·G)`
    /// with random `(c_k, z_k)` on every other branch.
    fn sample_commitments<R: Rng + CryptoRng + ?Sized>(self, rng: &mut R) -> SampledDigit {
        let h = self.params.blinding_generator().into_group();
        let table = self.params.digit_table();
        let nonce = random_scalar(rng);

        let mut challenges = vec![Fr::zero(); table.len()];
        let mut responses = vec![Fr::zero(); table.len()];
        let mut points = Vec::with_capacity(table.len());

        for (k, digit_point) in table.iter().enumerate() {
            if k == self.digit {
                points.push(h * nonce);
                continue;
            }
            let c_k = random_scalar(rng);
            let z_k = random_scalar(rng);
            let statement = self.commitment - digit_point.into_group();
            points.push(h * z_k - statement * c_k);
            challenges[k] = c_k;
            responses[k] = z_k;
        }

        SampledDigit {
            digit: self.digit,
            blinding: self.blinding,
            nonce,
            challenges,
            responses,
            announcements: normalize(&points),
        }
    }
}

impl SampledDigit {
    fn announcements(&self) -> &[G1Affine] {
        &self.announcements
    }

    /// State 3: the true branch takes whatever challenge is left over.
    fn respond(mut self, challenge: &Fr) -> DigitProof {
        let simulated: Fr = self.challenges.iter().sum();
        let real_challenge = *challenge - simulated;
        self.challenges[self.digit] = real_challenge;
        self.responses[self.digit] = self.nonce + real_challenge * self.blinding;
        DigitProof {
            challenges: self.challenges,
            responses: self.responses,
        }
    }
}

// ---------------------------------------------------------------------------
// Prove / Verify
// ---------------------------------------------------------------------------

impl RangeProof {
    /// Prove that `token` (opened by `witness`) carries a value in range.
    ///
    /// # Errors
    ///
    /// [`ZkatError::RangeProof`] if the value is not an integer in
    /// `[0, range_bound)`.
    pub fn prove<R: Rng + CryptoRng + ?Sized>(
        params: &PublicParams,
        token: &Token,
        witness: &TokenDataWitness,
        rng: &mut R,
    ) -> crate::Result<Self> {
        let bound = params.range_bound();
        let value = scalar_to_u64(&witness.value)
            .filter(|v| *v < bound)
            .ok_or(ZkatError::RangeProof { bound })?;

        let digits = decompose(value, params.range_base(), params.range_digits() as usize);
        let weights = digit_weights(params);
        let blindings = split_blinding(&witness.blinding_factor, &weights, rng)?;

        let h = params.blinding_generator().into_group();
        let table = params.digit_table();
        let digit_points: Vec<G1Projective> = digits
            .iter()
            .zip(&blindings)
            .map(|(d, r)| table[*d].into_group() + h * r)
            .collect();
        let digit_commitments = normalize(&digit_points);

        let sampled: Vec<SampledDigit> = digits
            .iter()
            .zip(blindings)
            .zip(digit_points)
            .map(|((d, r), c)| DigitProver::new(params, c, *d, r).sample_commitments(rng))
            .collect();

        let type_nonce = random_scalar(rng);
        let type_announcement = (params.type_generator().into_group() * type_nonce).into_affine();

        let mut transcript = start_transcript(params, token, &digit_commitments);
        for digit in &sampled {
            transcript.append_points(b"digit-announcements", digit.announcements());
        }
        transcript.append_point(b"type-announcement", &type_announcement);
        let challenge = transcript.challenge_scalar(b"range-challenge");

        let digit_proofs = sampled.into_iter().map(|d| d.respond(&challenge)).collect();
        let type_response = type_nonce + challenge * witness.type_scalar();

        Ok(Self {
            challenge,
            digit_commitments,
            digit_proofs,
            type_response,
        })
    }

    /// Verify this proof against `token`.
    ///
    /// # Errors
    ///
    /// `InvalidProof { reason: RangeProof }` on any failed check.
    pub fn verify(&self, params: &PublicParams, token: &Token) -> crate::Result<()> {
        let reject = || ZkatError::invalid(InvalidProofReason::RangeProof);

        let base = params.range_base() as usize;
        let digits = params.range_digits() as usize;
        let well_shaped = self.digit_commitments.len() == digits
            && self.digit_proofs.len() == digits
            && self
                .digit_proofs
                .iter()
                .all(|p| p.challenges.len() == base && p.responses.len() == base);
        if !well_shaped {
            return Err(reject());
        }

        let h = params.blinding_generator().into_group();
        let table = params.digit_table();
        let mut transcript = start_transcript(params, token, &self.digit_commitments);

        for (commitment, proof) in self.digit_commitments.iter().zip(&self.digit_proofs) {
            let challenge_sum: Fr = proof.challenges.iter().sum();
            if challenge_sum != self.challenge {
                return Err(reject());
            }

            let c_i = commitment.into_group();
            let announcements: Vec<G1Projective> = table
                .iter()
                .zip(proof.challenges.iter().zip(&proof.responses))
                .map(|(digit_point, (c_k, z_k))| h * z_k - (c_i - digit_point.into_group()) * c_k)
                .collect();
            transcript.append_points(b"digit-announcements", &normalize(&announcements));
        }

        // C − Σ b^i·C_i must be t·T for the t the prover knows.
        let weights = digit_weights(params);
        let residual =
            token.point().into_group() - linear_combination(&self.digit_commitments, &weights);
        let type_announcement = params.type_generator().into_group() * self.type_response
            - residual * self.challenge;
        transcript.append_point(b"type-announcement", &type_announcement.into_affine());

        if transcript.challenge_scalar(b"range-challenge") != self.challenge {
            return Err(reject());
        }
        Ok(())
    }

    /// Number of digit commitments carried.
    pub fn digits(&self) -> usize {
        self.digit_commitments.len()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn start_transcript(params: &PublicParams, token: &Token, digit_commitments: &[G1Affine]) -> Transcript {
    let mut transcript = Transcript::new(RANGE_TRANSCRIPT_DOMAIN);
    transcript.append_bytes(b"params", params.digest());
    transcript.append_point(b"token", token.point());
    transcript.append_points(b"digit-commitments", digit_commitments);
    transcript
}

/// Little-endian base-`base` digits of `value`, exactly `count` of them.
/// The caller guarantees `value < base^count`.
fn decompose(mut value: u64, base: u64, count: usize) -> Vec<usize> {
    let mut digits = Vec::with_capacity(count);
    for _ in 0..count {
        digits.push((value % base) as usize);
        value /= base;
    }
    digits
}

/// Random digit blindings `r_i` with `Σ r_i·weights[i] = blinding`.
fn split_blinding<R: Rng + CryptoRng + ?Sized>(
    blinding: &Fr,
    weights: &[Fr],
    rng: &mut R,
) -> crate::Result<Vec<Fr>> {
    let (last_weight, rest) = weights
        .split_last()
        .ok_or_else(|| ZkatError::Configuration("range proof needs at least one digit".into()))?;

    let mut blindings: Vec<Fr> = rest.iter().map(|_| random_scalar(rng)).collect();
    let partial: Fr = blindings.iter().zip(rest).map(|(r, w)| *r * w).sum();
    let inverse = last_weight
        .inverse()
        .ok_or_else(|| ZkatError::Configuration("digit weight is not invertible".into()))?;
    blindings.push((*blinding - partial) * inverse);
    Ok(blindings)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
