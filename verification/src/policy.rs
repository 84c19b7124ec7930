//! What a verifier demands of a stamp.

use hashcash_types::Version;

/// Default freshness window: ten seconds either side of now.
pub const DEFAULT_TIME_ALLOWANCE_MS: i64 = 10_000;

/// Acceptance rules applied to a parsed stamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyPolicy {
    /// Minimum leading zero bits of the digest.
    pub required_bits: u32,
    /// Largest tolerated distance between the stamp date and now, in
    /// milliseconds. Negative disables the check.
    pub time_allowance_ms: i64,
    /// Resource the stamp must be bound to, if any.
    pub required_resource: Option<String>,
    /// Stamp version to accept, or any version when `None`.
    pub required_version: Option<Version>,
    /// Digest algorithm name; empty means SHA-1.
    pub hash_function: String,
}

impl VerifyPolicy {
    pub fn new(required_bits: u32) -> Self {
        Self {
            required_bits,
            time_allowance_ms: DEFAULT_TIME_ALLOWANCE_MS,
            required_resource: None,
            required_version: Some(Version::V1),
            hash_function: String::new(),
        }
    }

    pub fn time_allowance_ms(mut self, ms: i64) -> Self {
        self.time_allowance_ms = ms;
        self
    }

    pub fn disable_time_check(self) -> Self {
        self.time_allowance_ms(-1)
    }

    pub fn require_resource(mut self, resource: impl Into<String>) -> Self {
        self.required_resource = Some(resource.into());
        self
    }

    pub fn any_version(mut self) -> Self {
        self.required_version = None;
        self
    }

    pub fn hash_function(mut self, name: impl Into<String>) -> Self {
        self.hash_function = name.into();
        self
    }

    pub fn time_check_enabled(&self) -> bool {
        self.time_allowance_ms >= 0
    }
}
