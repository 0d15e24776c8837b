//! # Public Parameters
//!
//! Everything a prover and verifier must agree on before a single proof is
//! produced:
//!
//! ```text
//! T, G, H       commitment generators (type, value, blinding)
//! base, digits  range-proof configuration; authorized range [0, base^digits)
//! digit_table   k·G for k in 0..base, the per-digit membership table
//! max_batch     upper bound on tokens per batch
//! ```
//!
//! ## Where do the generators come from?
//!
//! From [`hash_to_curve`] over a public seed. Anyone can re-derive them,
//! so nobody (including whoever ran setup) knows a discrete-log relation
//! between `T`, `G`, and `H`. Loading serialized parameters re-derives
//! the generators and refuses a mismatch, which means a tampered parameter
//! file cannot smuggle in a trapdoor.
//!
//! Parameters are immutable after construction. Share them behind an
//! [`Arc`](std::sync::Arc); every prover and verifier holds a clone.

use ark_bn254::{Fr, G1Affine, G1Projective};
use ark_ec::AffineRepr;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde::{Deserialize, Serialize};

use crate::config::{
    BLINDING_GENERATOR_LABEL, DEFAULT_MAX_BATCH_SIZE, DEFAULT_SETUP_SEED, MAX_RANGE_BASE,
    PARAMS_DIGEST_DOMAIN, PARAMS_FORMAT_VERSION, TYPE_GENERATOR_LABEL, VALUE_GENERATOR_LABEL,
};
use crate::crypto::algebra::normalize;
use crate::crypto::hash::{domain_separated_hash, hash_to_curve};
use crate::error::ZkatError;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Curve-level setup input: the public seed the generators are derived
/// from. `None` in [`PublicParams::setup`] means [`DEFAULT_SETUP_SEED`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveParams {
    /// Public, non-secret seed.
    pub seed: Vec<u8>,
}

impl Default for CurveParams {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SETUP_SEED.to_vec(),
        }
    }
}

/// Immutable public parameters shared by every prover and verifier.
#[derive(Clone, Debug)]
pub struct PublicParams {
    seed: Vec<u8>,
    range_base: u64,
    range_digits: u32,
    max_batch_size: u32,
    type_generator: G1Affine,
    value_generator: G1Affine,
    blinding_generator: G1Affine,
    /// `digit_table[k] = k·G`.
    digit_table: Vec<G1Affine>,
    /// `range_base^range_digits`.
    range_bound: u64,
    digest: [u8; 32],
}

/// Wire form of [`PublicParams`]. The digit table and digest are derived,
/// so they are not stored.
#[derive(CanonicalSerialize, CanonicalDeserialize)]
struct ParamsEncoding {
    version: u8,
    seed: Vec<u8>,
    range_base: u64,
    range_digits: u32,
    max_batch_size: u32,
    type_generator: G1Affine,
    value_generator: G1Affine,
    blinding_generator: G1Affine,
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

impl PublicParams {
    /// Generate public parameters for the range `[0, range_base^range_digits)`
    /// with the default batch bound.
    ///
    /// # Errors
    ///
    /// [`ZkatError::Configuration`] if `range_base < 2`, `range_digits < 1`,
    /// `range_base` exceeds [`MAX_RANGE_BASE`], `range_base^range_digits`
    /// overflows `u64`, or generator derivation fails.
    pub fn setup(
        range_base: u64,
        range_digits: u32,
        curve_params: Option<&CurveParams>,
    ) -> crate::Result<Self> {
        Self::setup_with_batch_size(range_base, range_digits, DEFAULT_MAX_BATCH_SIZE, curve_params)
    }

    /// Same as [`PublicParams::setup`] with an explicit batch bound.
    pub fn setup_with_batch_size(
        range_base: u64,
        range_digits: u32,
        max_batch_size: u32,
        curve_params: Option<&CurveParams>,
    ) -> crate::Result<Self> {
        let seed = curve_params
            .map(|cp| cp.seed.clone())
            .unwrap_or_else(|| DEFAULT_SETUP_SEED.to_vec());

        let (type_generator, value_generator, blinding_generator) = derive_generators(&seed)?;

        let params = Self::assemble(
            seed,
            range_base,
            range_digits,
            max_batch_size,
            type_generator,
            value_generator,
            blinding_generator,
        )?;

        tracing::debug!(
            range_base,
            range_digits,
            max_batch_size,
            digest = %params.digest_hex(),
            "public parameters generated"
        );
        Ok(params)
    }

    fn assemble(
        seed: Vec<u8>,
        range_base: u64,
        range_digits: u32,
        max_batch_size: u32,
        type_generator: G1Affine,
        value_generator: G1Affine,
        blinding_generator: G1Affine,
    ) -> crate::Result<Self> {
        if range_base < 2 {
            return Err(ZkatError::Configuration(format!(
                "range base must be at least 2, got {range_base}"
            )));
        }
        if range_base > MAX_RANGE_BASE {
            return Err(ZkatError::Configuration(format!(
                "range base {range_base} exceeds maximum {MAX_RANGE_BASE}"
            )));
        }
        if range_digits < 1 {
            return Err(ZkatError::Configuration(
                "range proof needs at least one digit".into(),
            ));
        }
        let range_bound = range_base.checked_pow(range_digits).ok_or_else(|| {
            ZkatError::Configuration(format!(
                "range {range_base}^{range_digits} does not fit in 64 bits"
            ))
        })?;
        if max_batch_size < 1 {
            return Err(ZkatError::Configuration(
                "maximum batch size must be at least 1".into(),
            ));
        }

        let digit_table = build_digit_table(&value_generator, range_base);

        let mut params = Self {
            seed,
            range_base,
            range_digits,
            max_batch_size,
            type_generator,
            value_generator,
            blinding_generator,
            digit_table,
            range_bound,
            digest: [0u8; 32],
        };
        params.digest = domain_separated_hash(PARAMS_DIGEST_DOMAIN, &params.to_bytes());
        Ok(params)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Generator carrying the token type.
    pub fn type_generator(&self) -> &G1Affine {
        &self.type_generator
    }

    /// Generator carrying the token value (`G`).
    pub fn value_generator(&self) -> &G1Affine {
        &self.value_generator
    }

    /// Generator carrying the blinding factor (`H`).
    pub fn blinding_generator(&self) -> &G1Affine {
        &self.blinding_generator
    }

    /// `k·G` for a digit value `k < range_base`.
    pub fn digit_point(&self, digit: usize) -> Option<&G1Affine> {
        self.digit_table.get(digit)
    }

    /// The whole membership table.
    pub fn digit_table(&self) -> &[G1Affine] {
        &self.digit_table
    }

    pub fn range_base(&self) -> u64 {
        self.range_base
    }

    pub fn range_digits(&self) -> u32 {
        self.range_digits
    }

    /// Exclusive upper bound of the authorized value range.
    pub fn range_bound(&self) -> u64 {
        self.range_bound
    }

    /// Largest value a range proof can cover.
    pub fn max_value(&self) -> u64 {
        self.range_bound - 1
    }

    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size as usize
    }

    pub fn seed(&self) -> &[u8] {
        &self.seed
    }

    /// Digest binding every transcript to this exact parameter set.
    pub fn digest(&self) -> &[u8; 32] {
        &self.digest
    }

    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    /// Canonical compressed encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        let encoding = ParamsEncoding {
            version: PARAMS_FORMAT_VERSION,
            seed: self.seed.clone(),
            range_base: self.range_base,
            range_digits: self.range_digits,
            max_batch_size: self.max_batch_size,
            type_generator: self.type_generator,
            value_generator: self.value_generator,
            blinding_generator: self.blinding_generator,
        };
        super::encode(&encoding)
    }

    /// Decode and re-validate parameters.
    ///
    /// The generators are re-derived from the stored seed; a mismatch is a
    /// configuration error, not something to paper over.
    pub fn from_bytes(data: &[u8]) -> crate::Result<Self> {
        let mut reader = data;
        let encoding = ParamsEncoding::deserialize_compressed(&mut reader)?;
        if !reader.is_empty() {
            return Err(ZkatError::Serialization(format!(
                "{} trailing bytes after public parameters",
                reader.len()
            )));
        }
        if encoding.version != PARAMS_FORMAT_VERSION {
            return Err(ZkatError::Serialization(format!(
                "unsupported parameter format version {}",
                encoding.version
            )));
        }

        let (t, g, h) = derive_generators(&encoding.seed)?;
        if (t, g, h)
            != (
                encoding.type_generator,
                encoding.value_generator,
                encoding.blinding_generator,
            )
        {
            return Err(ZkatError::Configuration(
                "generators do not match the published seed".into(),
            ));
        }

        Self::assemble(
            encoding.seed,
            encoding.range_base,
            encoding.range_digits,
            encoding.max_batch_size,
            t,
            g,
            h,
        )
    }
}

impl PartialEq for PublicParams {
    fn eq(&self, other: &Self) -> bool {
        self.digest == other.digest
    }
}

impl Eq for PublicParams {}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn derive_generators(seed: &[u8]) -> crate::Result<(G1Affine, G1Affine, G1Affine)> {
    let derive = |label: &[u8]| {
        hash_to_curve(seed, label).ok_or_else(|| {
            ZkatError::Configuration(format!(
                "hash-to-curve failed for {}",
                String::from_utf8_lossy(label)
            ))
        })
    };
    let t = derive(TYPE_GENERATOR_LABEL)?;
    let g = derive(VALUE_GENERATOR_LABEL)?;
    let h = derive(BLINDING_GENERATOR_LABEL)?;

    if t == g || g == h || t == h {
        return Err(ZkatError::Configuration(
            "derived generators are not distinct".into(),
        ));
    }
    Ok((t, g, h))
}

fn build_digit_table(value_generator: &G1Affine, range_base: u64) -> Vec<G1Affine> {
    let g = value_generator.into_group();
    let mut acc = G1Projective::from(G1Affine::zero());
    let mut table = Vec::with_capacity(range_base as usize);
    for _ in 0..range_base {
        table.push(acc);
        acc += g;
    }
    normalize(&table)
}

/// Scalar for the `i`-th digit weight, `base^i`.
pub(crate) fn digit_weights(params: &PublicParams) -> Vec<Fr> {
    crate::crypto::algebra::powers(params.range_base, params.range_digits as usize)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ec::CurveGroup;

    #[test]
    fn setup_accepts_test_configurations() {
        let pp = PublicParams::setup(100, 2, None).unwrap();
        assert_eq!(pp.range_bound(), 10_000);
        assert_eq!(pp.max_value(), 9_999);
        assert_eq!(pp.digit_table().len(), 100);

        let pp = PublicParams::setup(10, 2, None).unwrap();
        assert_eq!(pp.range_bound(), 100);
    }

    #[test]
    fn setup_rejects_bad_base_and_digits() {
        for (base, digits) in [(0, 2), (1, 2), (10, 0)] {
            match PublicParams::setup(base, digits, None) {
                Err(ZkatError::Configuration(_)) => {}
                other => panic!("expected Configuration error, got {:?}", other),
            }
        }
    }

    #[test]
    fn setup_rejects_overflowing_range() {
        assert!(matches!(
            PublicParams::setup(1 << 16, 5, None),
            Err(ZkatError::Configuration(_))
        ));
    }

    #[test]
    fn setup_rejects_oversized_base() {
        assert!(matches!(
            PublicParams::setup(MAX_RANGE_BASE + 1, 1, None),
            Err(ZkatError::Configuration(_))
        ));
    }

    #[test]
    fn setup_rejects_zero_batch() {
        assert!(matches!(
            PublicParams::setup_with_batch_size(10, 2, 0, None),
            Err(ZkatError::Configuration(_))
        ));
    }

    #[test]
    fn setup_is_deterministic_per_seed() {
        let a = PublicParams::setup(10, 2, None).unwrap();
        let b = PublicParams::setup(10, 2, None).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.value_generator(), b.value_generator());

        let other = CurveParams {
            seed: b"another seed".to_vec(),
        };
        let c = PublicParams::setup(10, 2, Some(&other)).unwrap();
        assert_ne!(a.value_generator(), c.value_generator());
        assert_ne!(a.digest(), c.digest());
    }

    #[test]
    fn digest_depends_on_range_configuration() {
        let a = PublicParams::setup(10, 2, None).unwrap();
        let b = PublicParams::setup(10, 3, None).unwrap();
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn generators_are_distinct() {
        let pp = PublicParams::setup(10, 2, None).unwrap();
        assert_ne!(pp.type_generator(), pp.value_generator());
        assert_ne!(pp.value_generator(), pp.blinding_generator());
        assert_ne!(pp.type_generator(), pp.blinding_generator());
    }

    #[test]
    fn digit_table_holds_multiples_of_g() {
        let pp = PublicParams::setup(10, 2, None).unwrap();
        assert!(pp.digit_point(0).unwrap().is_zero());
        for k in 0..10u64 {
            let expected = (pp.value_generator().into_group() * Fr::from(k)).into_affine();
            assert_eq!(pp.digit_point(k as usize), Some(&expected));
        }
        assert!(pp.digit_point(10).is_none());
    }

    #[test]
    fn params_serialization_round_trip() {
        let pp = PublicParams::setup_with_batch_size(100, 2, 8, None).unwrap();
        let restored = PublicParams::from_bytes(&pp.to_bytes()).unwrap();
        assert_eq!(pp, restored);
        assert_eq!(restored.max_batch_size(), 8);
        assert_eq!(restored.digit_table(), pp.digit_table());
    }

    #[test]
    fn from_bytes_rejects_trailing_data() {
        let pp = PublicParams::setup(10, 2, None).unwrap();
        let mut bytes = pp.to_bytes();
        bytes.push(0);
        assert!(matches!(
            PublicParams::from_bytes(&bytes),
            Err(ZkatError::Serialization(_))
        ));
    }

    #[test]
    fn from_bytes_rejects_swapped_generators() {
        let pp = PublicParams::setup(10, 2, None).unwrap();
        let forged = ParamsEncoding {
            version: PARAMS_FORMAT_VERSION,
            seed: pp.seed().to_vec(),
            range_base: 10,
            range_digits: 2,
            max_batch_size: 4,
            type_generator: *pp.type_generator(),
            value_generator: *pp.blinding_generator(),
            blinding_generator: *pp.value_generator(),
        };
        let mut bytes = Vec::new();
        forged.serialize_compressed(&mut bytes).unwrap();
        assert!(matches!(
            PublicParams::from_bytes(&bytes),
            Err(ZkatError::Configuration(_))
        ));
    }
}
