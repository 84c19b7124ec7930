//! Stamp minting by brute-force search.
//!
//! The search appends a random salt and an incrementing counter to the stamp
//! prefix until the digest has enough leading zero bits. Expected work doubles
//! with every required bit and the search has no upper bound unless the caller
//! sets a cancellation flag or deadline.

use std::fmt::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::debug;

use crate::Token;
use hashcash_crypto::{leading_zero_bits, HashFunction, DEFAULT_HASH_FUNCTION};
use hashcash_types::{format_stamp_date, Extensions, HashcashError, Version};

/// Largest accepted bit target.
pub const MAX_REQUIRED_BITS: u32 = 160;

/// Iterations between cancellation/deadline checks.
const BATCH_SIZE: u64 = 4096;

/// Source of the random salt and initial counter.
pub trait NonceSource: Send + Sync {
    fn next_u64(&self) -> u64;
}

/// Draws from the operating system CSPRNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsNonceSource;

impl NonceSource for OsNonceSource {
    fn next_u64(&self) -> u64 {
        OsRng.next_u64()
    }
}

/// What to mint.
#[derive(Clone, Debug)]
pub struct MintRequest {
    resource: String,
    extensions: Extensions,
    timestamp: Option<DateTime<Utc>>,
    required_bits: u32,
    version: u32,
    hash_function: String,
}

impl MintRequest {
    /// A version 1, SHA-1 stamp for `resource`, dated at mint time.
    pub fn new(resource: impl Into<String>, required_bits: u32) -> Self {
        Self {
            resource: resource.into(),
            extensions: Extensions::new(),
            timestamp: None,
            required_bits,
            version: Version::V1.as_u32(),
            hash_function: DEFAULT_HASH_FUNCTION.to_string(),
        }
    }

    pub fn extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.timestamp = Some(at);
        self
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn hash_function(mut self, name: impl Into<String>) -> Self {
        self.hash_function = name.into();
        self
    }

    pub fn resource_str(&self) -> &str {
        &self.resource
    }

    pub fn required_bits(&self) -> u32 {
        self.required_bits
    }
}

/// Mints stamps on the calling thread.
pub struct TokenMinter<N = OsNonceSource> {
    nonces: N,
    cancel: Option<Arc<AtomicBool>>,
    deadline: Option<Duration>,
}

impl TokenMinter<OsNonceSource> {
    pub fn new() -> Self {
        Self::with_nonce_source(OsNonceSource)
    }
}

impl Default for TokenMinter<OsNonceSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NonceSource> TokenMinter<N> {
    pub fn with_nonce_source(nonces: N) -> Self {
        Self {
            nonces,
            cancel: None,
            deadline: None,
        }
    }

    /// Stop searching once `flag` is set.
    ///
    /// This is an extension over the classic unbounded search; without it
    /// the minter runs until it finds a stamp.
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Stop searching once `limit` has elapsed since the search began.
    pub fn deadline(mut self, limit: Duration) -> Self {
        self.deadline = Some(limit);
        self
    }

    /// Mint a stamp meeting `request`.
    ///
    /// All inputs are validated before any hashing happens.
    pub fn mint(&self, request: &MintRequest) -> Result<Token, HashcashError> {
        if request.required_bits > MAX_REQUIRED_BITS {
            return Err(HashcashError::validation(format!(
                "requiredBits must be between 0 and {MAX_REQUIRED_BITS}"
            )));
        }
        if request.resource.contains(':') {
            return Err(HashcashError::validation("resource may not contain a colon"));
        }
        let version = Version::try_from(request.version)?;
        let hash_function = HashFunction::from_name(&request.hash_function)?;
        let extensions = request.extensions.encode()?;

        let at = request.timestamp.unwrap_or_else(Utc::now);
        let date = format_stamp_date(&at);
        let mut prefix = match version {
            Version::V0 => format!("0:{date}:{}:{extensions}:", request.resource),
            Version::V1 => format!(
                "1:{}:{date}:{}:{extensions}:",
                request.required_bits, request.resource
            ),
        };
        let salt = self.nonces.next_u64();
        let counter = self.nonces.next_u64();
        let _ = write!(prefix, "{salt:x}:");

        let started = Instant::now();
        let (text, iterations) = self
            .search(&prefix, counter, request.required_bits, hash_function, started)
            .ok_or(HashcashError::Cancelled)?;
        debug!(
            resource = %request.resource,
            bits = request.required_bits,
            iterations,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "minted stamp"
        );

        let mut token = Token::parse_with_function(&text, hash_function)?;
        if version == Version::V0 {
            token.claimed_bits = token.computed_bits();
        }
        Ok(token)
    }

    /// Returns the accepted text and the number of candidates tried, or
    /// `None` if stopped first.
    fn search(
        &self,
        prefix: &str,
        mut counter: u64,
        required_bits: u32,
        hash_function: HashFunction,
        started: Instant,
    ) -> Option<(String, u64)> {
        let mut candidate = String::with_capacity(prefix.len() + 16);
        let mut iterations = 0u64;
        loop {
            if iterations % BATCH_SIZE == 0 && self.should_stop(started) {
                debug!(iterations, "mint search stopped");
                return None;
            }
            counter = counter.wrapping_add(1);
            iterations += 1;

            candidate.clear();
            candidate.push_str(prefix);
            let _ = write!(candidate, "{counter:x}");
            let digest = hash_function.digest(candidate.as_bytes());
            if leading_zero_bits(&digest) >= required_bits {
                return Some((candidate, iterations));
            }
        }
    }

    fn should_stop(&self, started: Instant) -> bool {
        let cancelled = self
            .cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed));
        let expired = self.deadline.is_some_and(|limit| started.elapsed() >= limit);
        cancelled || expired
    }
}

/// Mint a version 1 SHA-1 stamp for `resource`, dated now.
pub fn mint(resource: &str, required_bits: u32) -> Result<Token, HashcashError> {
    TokenMinter::new().mint(&MintRequest::new(resource, required_bits))
}
