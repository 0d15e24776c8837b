//! Scalar and group helpers over BN254.
//!
//! Points are kept in projective form while doing arithmetic and converted
//! to affine only when they are stored, hashed, or serialized.

use ark_bn254::{Fr, G1Affine, G1Projective};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{PrimeField, UniformRand, Zero};
use rand::{CryptoRng, Rng};

/// Lift an integer into the scalar field.
pub fn scalar_from_u64(value: u64) -> Fr {
    Fr::from(value)
}

/// Read a scalar back as an integer.
///
/// Returns `None` if the scalar's canonical representative does not fit in
/// 64 bits. Negative integers wrap around the field modulus and therefore
/// land here too.
pub fn scalar_to_u64(scalar: &Fr) -> Option<u64> {
    let limbs = scalar.into_bigint().0;
    if limbs[1..].iter().any(|limb| *limb != 0) {
        return None;
    }
    Some(limbs[0])
}

/// Sample a uniformly random scalar.
///
/// Every nonce and blinding factor in the crate goes through here. Reusing
/// one across two proofs over related secrets leaks the secret, so callers
/// always pass a fresh CSPRNG.
pub fn random_scalar<R: Rng + CryptoRng + ?Sized>(rng: &mut R) -> Fr {
    Fr::rand(rng)
}

/// `Σ scalars[i] · bases[i]`.
///
/// Callers guarantee equal lengths; extra elements on either side are
/// ignored.
pub fn linear_combination(bases: &[G1Affine], scalars: &[Fr]) -> G1Projective {
    bases
        .iter()
        .zip(scalars)
        .fold(G1Projective::zero(), |acc, (base, scalar)| {
            acc + base.into_group() * scalar
        })
}

/// Sum of a list of points.
pub fn sum_points<'a, I>(points: I) -> G1Projective
where
    I: IntoIterator<Item = &'a G1Affine>,
{
    points
        .into_iter()
        .fold(G1Projective::zero(), |acc, p| acc + p.into_group())
}

/// Batch-convert projective points to affine (one field inversion total).
pub fn normalize(points: &[G1Projective]) -> Vec<G1Affine> {
    G1Projective::normalize_batch(points)
}

/// `base^0, base^1, ..., base^(count-1)` as scalars.
pub fn powers(base: u64, count: usize) -> Vec<Fr> {
    let base = Fr::from(base);
    let mut out = Vec::with_capacity(count);
    let mut acc = Fr::from(1u64);
    for _ in 0..count {
        out.push(acc);
        acc *= base;
    }
    out
}
