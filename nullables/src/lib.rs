//! Nullable infrastructure for deterministic testing.
//!
//! The wall clock and the nonce source are the only outside inputs to
//! minting and verification. This crate provides stand-ins that:
//! - return fixed, caller-controlled values
//! - never read the system clock or the OS random source
//!
//! Usage: pass these where a `Clock` or `NonceSource` is expected.

pub mod clock;
pub mod random;

pub use clock::NullClock;
pub use random::NullRandom;
