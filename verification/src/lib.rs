//! Hashcash stamp verification.
//!
//! A [`Verifier`] applies a [`VerifyPolicy`] to stamp text and returns a
//! [`Verdict`] describing what was checked and why the stamp was refused,
//! if it was. Time is read through [`hashcash_types::Clock`] so callers can
//! pin it.

pub mod policy;
pub mod verifier;

pub use policy::{VerifyPolicy, DEFAULT_TIME_ALLOWANCE_MS};
pub use verifier::{FailureReason, TimeCheck, Verdict, Verifier};
