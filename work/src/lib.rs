//! Hashcash proof-of-work stamps.
//!
//! A stamp binds a resource and a date to a digest with a chosen number of
//! leading zero bits. Minting is a brute-force search whose expected cost
//! doubles with every bit; checking a stamp costs a single hash.

pub mod estimate;
pub mod generator;
pub mod token;

pub use estimate::{estimate_time, estimate_value, Estimator};
pub use generator::{mint, MintRequest, NonceSource, OsNonceSource, TokenMinter, MAX_REQUIRED_BITS};
pub use token::Token;

pub use hashcash_crypto::{HashFunction, DEFAULT_HASH_FUNCTION};
