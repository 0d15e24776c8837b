//! # Protocol Configuration & Constants
//!
//! Every magic number in ZKAT lives here. If you're hardcoding a domain
//! label somewhere else, you're doing it wrong and two protocols are one
//! typo away from sharing a transcript.
//!
//! Changing any of the domain labels or the setup seed after deployment
//! invalidates every proof and every commitment ever produced, so treat
//! them as consensus-critical.

// ---------------------------------------------------------------------------
// Versioning
// ---------------------------------------------------------------------------

/// Crate-level protocol version string, reported by the CLI.
pub const PROTOCOL_VERSION: &str = "0.1.0";

/// Version byte written at the front of serialized public parameters.
/// Bump when the parameter encoding changes.
pub const PARAMS_FORMAT_VERSION: u8 = 1;

// ---------------------------------------------------------------------------
// Curve
// ---------------------------------------------------------------------------

/// Curve the engine runs on. BN254 because it is pairing-friendly, has
/// EVM precompiles, and arkworks support is mature.
pub const CURVE_NAME: &str = "BN254";

/// Size of a compressed G1 point in bytes.
pub const G1_COMPRESSED_SIZE: usize = 32;

/// Size of a serialized scalar in bytes.
pub const SCALAR_SIZE: usize = 32;

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

/// Public seed the commitment generators are derived from when the caller
/// does not supply one. Anyone can re-derive the generators from this
/// string, which is the whole point: nobody knows their discrete logs.
pub const DEFAULT_SETUP_SEED: &[u8] = b"ZKAT/BN254/public-parameters/v1";

/// Default range-proof base.
pub const DEFAULT_RANGE_BASE: u64 = 100;

/// Default number of range-proof digits. With base 100 the authorized
/// range is `[0, 10_000)`.
pub const DEFAULT_RANGE_DIGITS: u32 = 2;

/// Largest base we accept. Range proofs carry `base` challenges and
/// `base` responses per digit, so huge bases mean huge proofs.
pub const MAX_RANGE_BASE: u64 = 1 << 16;

/// Default upper bound on the number of tokens in one issue batch or on
/// either side of a transfer.
pub const DEFAULT_MAX_BATCH_SIZE: u32 = 64;

/// Try-and-increment budget for hash-to-curve. Roughly half of all field
/// elements are valid x-coordinates, so 256 failures in a row is a
/// 2^-256 event, not bad luck.
pub const HASH_TO_CURVE_MAX_ATTEMPTS: u32 = 256;

// ---------------------------------------------------------------------------
// Domain separation
// ---------------------------------------------------------------------------

/// BLAKE3 derive-key context for hash-to-curve.
pub const HASH_TO_CURVE_DOMAIN: &str = "ZKAT 2026 hash-to-curve BN254-G1";

/// BLAKE3 derive-key context for mapping token types to scalars.
pub const TOKEN_TYPE_DOMAIN: &str = "ZKAT 2026 token-type scalar";

/// BLAKE3 derive-key context for the public-parameter digest.
pub const PARAMS_DIGEST_DOMAIN: &str = "ZKAT 2026 public-parameter digest";

/// Transcript domain for issue proofs.
pub const ISSUE_TRANSCRIPT_DOMAIN: &str = "ZKAT 2026 issue proof";

/// Transcript domain for transfer proofs.
pub const TRANSFER_TRANSCRIPT_DOMAIN: &str = "ZKAT 2026 transfer proof";

/// Transcript domain for range proofs.
pub const RANGE_TRANSCRIPT_DOMAIN: &str = "ZKAT 2026 range proof";

/// Labels for the three commitment generators.
pub const TYPE_GENERATOR_LABEL: &[u8] = b"generator/type";
pub const VALUE_GENERATOR_LABEL: &[u8] = b"generator/value";
pub const BLINDING_GENERATOR_LABEL: &[u8] = b"generator/blinding";
