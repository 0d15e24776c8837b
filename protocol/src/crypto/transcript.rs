//! Fiat–Shamir transcript.
//!
//! A thin wrapper over a BLAKE3 hasher in `derive_key` mode. Each append is
//! framed as `len(label) || label || len(data) || data`, so two different
//! sequences of appends can never hash the same bytes. Challenges are
//! squeezed as 64 bytes of XOF output reduced mod r, and then absorbed back
//! so consecutive challenges differ.
//!
//! The prover and verifier must build byte-identical transcripts: every
//! public value and every first-round message goes in, in the same order.

use ark_bn254::{Fr, G1Affine};
use ark_ff::PrimeField;
use ark_serialize::CanonicalSerialize;

/// Running hash of everything the challenge must depend on.
#[derive(Clone)]
pub struct Transcript {
    hasher: blake3::Hasher,
}

impl Transcript {
    /// Start a transcript in its own domain.
    pub fn new(domain: &str) -> Self {
        Self {
            hasher: blake3::Hasher::new_derive_key(domain),
        }
    }

    fn frame(&mut self, label: &[u8], data: &[u8]) {
        self.hasher.update(&(label.len() as u64).to_le_bytes());
        self.hasher.update(label);
        self.hasher.update(&(data.len() as u64).to_le_bytes());
        self.hasher.update(data);
    }

    /// Append raw bytes.
    pub fn append_bytes(&mut self, label: &[u8], data: &[u8]) {
        self.frame(label, data);
    }

    /// Append an integer.
    pub fn append_u64(&mut self, label: &[u8], value: u64) {
        self.frame(label, &value.to_le_bytes());
    }

    /// Append a point in compressed form.
    pub fn append_point(&mut self, label: &[u8], point: &G1Affine) {
        let mut buf = Vec::with_capacity(point.compressed_size());
        point
            .serialize_compressed(&mut buf)
            .expect("G1 serialization into a Vec must not fail");
        self.frame(label, &buf);
    }

    /// Append a list of points, prefixed by its length.
    pub fn append_points(&mut self, label: &[u8], points: &[G1Affine]) {
        self.append_u64(label, points.len() as u64);
        for point in points {
            self.append_point(label, point);
        }
    }

    /// Append a scalar.
    pub fn append_scalar(&mut self, label: &[u8], scalar: &Fr) {
        let mut buf = Vec::with_capacity(scalar.compressed_size());
        scalar
            .serialize_compressed(&mut buf)
            .expect("scalar serialization into a Vec must not fail");
        self.frame(label, &buf);
    }

    /// Derive a challenge from everything appended so far.
    pub fn challenge_scalar(&mut self, label: &[u8]) -> Fr {
        self.frame(label, &[]);
        let mut wide = [0u8; 64];
        self.hasher.finalize_xof().fill(&mut wide);
        self.hasher.update(&wide);
        Fr::from_le_bytes_mod_order(&wide)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ec::{CurveGroup, Group};

    fn generator() -> G1Affine {
        ark_bn254::G1Projective::generator().into_affine()
    }

    #[test]
    fn same_appends_same_challenge() {
        let mut a = Transcript::new("test");
        let mut b = Transcript::new("test");
        a.append_point(b"p", &generator());
        b.append_point(b"p", &generator());
        assert_eq!(a.challenge_scalar(b"c"), b.challenge_scalar(b"c"));
    }

    #[test]
    fn domain_changes_challenge() {
        let mut a = Transcript::new("domain-a");
        let mut b = Transcript::new("domain-b");
        assert_ne!(a.challenge_scalar(b"c"), b.challenge_scalar(b"c"));
    }

    #[test]
    fn framing_prevents_boundary_shifts() {
        let mut a = Transcript::new("test");
        a.append_bytes(b"x", b"ab");
        a.append_bytes(b"x", b"c");

        let mut b = Transcript::new("test");
        b.append_bytes(b"x", b"a");
        b.append_bytes(b"x", b"bc");

        assert_ne!(a.challenge_scalar(b"c"), b.challenge_scalar(b"c"));
    }

    #[test]
    fn consecutive_challenges_differ() {
        let mut t = Transcript::new("test");
        t.append_scalar(b"s", &Fr::from(7u64));
        let c1 = t.challenge_scalar(b"c");
        let c2 = t.challenge_scalar(b"c");
        assert_ne!(c1, c2);
    }

    #[test]
    fn point_list_length_is_bound() {
        let g = generator();
        let mut a = Transcript::new("test");
        a.append_points(b"p", &[g]);
        let mut b = Transcript::new("test");
        b.append_points(b"p", &[g, g]);
        assert_ne!(a.challenge_scalar(b"c"), b.challenge_scalar(b"c"));
    }
}
