//! # Hashing Utilities
//!
//! BLAKE3 is the only hash function in ZKAT. It is used for:
//!
//! - **hash_to_field**: mapping token types to scalars.
//! - **hash_to_curve**: deriving commitment generators nobody knows the
//!   discrete logs of.
//! - **domain_separated_hash**: parameter digests and anything else that
//!   needs its own hash namespace.
//! - the Fiat–Shamir transcript (see [`super::transcript`]).
//!
//! ## hash_to_curve
//!
//! BN254/G1 has cofactor 1, so every affine point satisfying
//! `y^2 = x^3 + 3` is in the prime-order subgroup. We use try-and-increment:
//! hash `(data, counter)` to a base-field element, treat it as an
//! x-coordinate, and stop at the first one that lands on the curve. It is
//! not constant time, which is fine: the inputs are public labels.

use ark_bn254::{Fq, Fr, G1Affine};
use ark_ec::AffineRepr;
use ark_ff::PrimeField;

use crate::config::{HASH_TO_CURVE_DOMAIN, HASH_TO_CURVE_MAX_ATTEMPTS};

/// Compute the BLAKE3 hash of the input data.
pub fn blake3_hash(data: &[u8]) -> [u8; 32] {
    *blake3::hash(data).as_bytes()
}

/// Hash arbitrary data to a BN254 scalar field element.
///
/// 1. Hash the input with BLAKE3 to get 32 uniformly random bytes.
/// 2. Interpret those bytes as a little-endian integer.
/// 3. Reduce modulo the field order `r`.
///
/// The bias from the reduction is below 2^-128 and irrelevant for how we
/// use it (naming token types).
///
/// # Example
///
/// ```
/// use zkat_protocol::crypto::hash::hash_to_field;
///
/// let a = hash_to_field(b"ABC");
/// assert_eq!(a, hash_to_field(b"ABC"));
/// assert_ne!(a, hash_to_field(b"XYZ"));
/// ```
pub fn hash_to_field(data: &[u8]) -> Fr {
    let hash = blake3_hash(data);
    Fr::from_le_bytes_mod_order(&hash)
}

/// Compute a domain-separated hash using BLAKE3's `derive_key` mode.
///
/// `domain_separated_hash("a", data)` and `domain_separated_hash("b", data)`
/// never collide, because the context string selects a different IV.
pub fn domain_separated_hash(context: &str, data: &[u8]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new_derive_key(context);
    hasher.update(data);
    *hasher.finalize().as_bytes()
}

/// Deterministically map `(seed, label)` to a point on BN254/G1.
///
/// Returns `None` only if [`HASH_TO_CURVE_MAX_ATTEMPTS`] consecutive
/// candidates miss the curve, which does not happen in practice but is
/// surfaced as a setup failure rather than a panic.
pub fn hash_to_curve(seed: &[u8], label: &[u8]) -> Option<G1Affine> {
    for counter in 0..HASH_TO_CURVE_MAX_ATTEMPTS {
        let mut hasher = blake3::Hasher::new_derive_key(HASH_TO_CURVE_DOMAIN);
        hasher.update(&(seed.len() as u64).to_le_bytes());
        hasher.update(seed);
        hasher.update(&(label.len() as u64).to_le_bytes());
        hasher.update(label);
        hasher.update(&counter.to_le_bytes());

        // 64 bytes so the reduction mod q is close to uniform.
        let mut wide = [0u8; 64];
        hasher.finalize_xof().fill(&mut wide);
        let x = Fq::from_le_bytes_mod_order(&wide);
        let greatest = wide[0] & 1 == 1;

        if let Some(point) = G1Affine::get_point_from_x_unchecked(x, greatest) {
            if !point.is_zero()
                && point.is_on_curve()
                && point.is_in_correct_subgroup_assuming_on_curve()
            {
                return Some(point);
            }
        }
    }
    None
}
