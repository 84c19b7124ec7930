//! Digest primitives for hashcash stamps.
//!
//! - A registry of named digest algorithms (SHA-1 default, SHA-2, SHA-3, Blake2b)
//! - Leading-zero bit counting, the proof-of-work strength metric

pub mod bits;
pub mod hash;

pub use bits::leading_zero_bits;
pub use hash::{digest, HashFunction, DEFAULT_HASH_FUNCTION};
