//! # Cryptographic Primitives for ZKAT
//!
//! The algebra and hashing layer everything else is built on:
//!
//! - **algebra**: BN254 scalar/point helpers and randomness.
//! - **hash**: BLAKE3 hashing, hash-to-field, and hash-to-curve.
//! - **transcript**: the Fiat–Shamir transcript every proof is bound to.
//!
//! Nothing in here is novel. Group arithmetic comes from arkworks, hashing
//! from BLAKE3; this module only wires them together with domain separation.

pub mod algebra;
pub mod hash;
pub mod transcript;

pub use algebra::{random_scalar, scalar_from_u64, scalar_to_u64};
pub use hash::{blake3_hash, domain_separated_hash, hash_to_curve, hash_to_field};
pub use transcript::Transcript;
