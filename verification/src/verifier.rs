//! Stamp verification.
//!
//! Checks run in a fixed order (version, bits, freshness, resource) and stop
//! at the first failure. A stamp that cannot be parsed is a failed
//! verification, not an error.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::fmt;
use tracing::debug;

use crate::VerifyPolicy;
use hashcash_types::{Clock, HashcashError, SystemClock};
use hashcash_work::Token;

/// Why a stamp was refused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FailureReason {
    /// The text could not be parsed or hashed.
    Malformed(HashcashError),
    IncorrectVersion,
    InsufficientBits,
    TimestampCheckFailed,
    ResourceMismatch,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Malformed(e) => write!(f, "{e}"),
            FailureReason::IncorrectVersion => f.write_str("incorrect hashcash version"),
            FailureReason::InsufficientBits => f.write_str("hash collision insufficient"),
            FailureReason::TimestampCheckFailed => f.write_str("timestamp check failed"),
            FailureReason::ResourceMismatch => f.write_str("resource mismatch"),
        }
    }
}

/// Outcome of the freshness check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimeCheck {
    /// An earlier check failed first.
    NotReached,
    /// The policy allowance is negative.
    Disabled,
    Checked {
        minted_at: DateTime<Utc>,
        now: DateTime<Utc>,
        /// `now - minted_at`; positive when the stamp is in the past.
        delta_ms: i64,
    },
}

/// Result of verifying one stamp.
#[derive(Clone, Debug)]
pub struct Verdict {
    pub token: Option<Token>,
    pub required_bits: u32,
    pub computed_bits: Option<u32>,
    pub time_check: TimeCheck,
    pub reason: Option<FailureReason>,
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        self.reason.is_none()
    }

    fn malformed(required_bits: u32, error: HashcashError) -> Self {
        Self {
            token: None,
            required_bits,
            computed_bits: None,
            time_check: TimeCheck::NotReached,
            reason: Some(FailureReason::Malformed(error)),
        }
    }
}

/// Applies a [`VerifyPolicy`] to stamps, reading time from `C`.
pub struct Verifier<C = SystemClock> {
    policy: VerifyPolicy,
    clock: C,
}

impl Verifier<SystemClock> {
    pub fn new(policy: VerifyPolicy) -> Self {
        Self::with_clock(policy, SystemClock)
    }
}

impl<C: Clock> Verifier<C> {
    pub fn with_clock(policy: VerifyPolicy, clock: C) -> Self {
        Self { policy, clock }
    }

    pub fn policy(&self) -> &VerifyPolicy {
        &self.policy
    }

    /// Parse and verify stamp text.
    pub fn verify(&self, text: &str) -> Verdict {
        match Token::parse_with(text, &self.policy.hash_function) {
            Ok(token) => self.verify_token(token),
            Err(e) => {
                debug!(error = %e, "unparseable stamp");
                Verdict::malformed(self.policy.required_bits, e)
            }
        }
    }

    /// Verify an already parsed stamp.
    pub fn verify_token(&self, token: Token) -> Verdict {
        let mut verdict = Verdict {
            token: None,
            required_bits: self.policy.required_bits,
            computed_bits: Some(token.computed_bits()),
            time_check: TimeCheck::NotReached,
            reason: None,
        };
        verdict.reason = self.check(&token, &mut verdict.time_check);
        if let Some(reason) = &verdict.reason {
            debug!(%reason, resource = token.resource(), "stamp rejected");
        }
        verdict.token = Some(token);
        verdict
    }

    fn check(&self, token: &Token, time_check: &mut TimeCheck) -> Option<FailureReason> {
        let policy = &self.policy;

        if policy.required_version.is_some_and(|v| v != token.version()) {
            return Some(FailureReason::IncorrectVersion);
        }

        if token.computed_bits() < policy.required_bits {
            return Some(FailureReason::InsufficientBits);
        }

        if policy.time_check_enabled() {
            let now = self.clock.now();
            let minted_at = token.minted_at();
            let delta_ms = (now - minted_at).num_milliseconds();
            *time_check = TimeCheck::Checked {
                minted_at,
                now,
                delta_ms,
            };
            if delta_ms.unsigned_abs() > policy.time_allowance_ms.unsigned_abs() {
                return Some(FailureReason::TimestampCheckFailed);
            }
        } else {
            *time_check = TimeCheck::Disabled;
        }

        match &policy.required_resource {
            Some(resource) if resource != token.resource() => Some(FailureReason::ResourceMismatch),
            _ => None,
        }
    }
}

impl<C: Clock + Sync> Verifier<C> {
    /// Verify many stamps in parallel. Verdicts keep the input order.
    pub fn verify_all<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Vec<Verdict> {
        texts.par_iter().map(|t| self.verify(t.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use hashcash_work::{MintRequest, TokenMinter};

    const ADAM: &str = "1:20:1303030600:adam@cypherspace.org::McMybZIhxKXu57jd:ckvi";

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn adam_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2013, 3, 3, 6, 0, 0).unwrap()
    }

    #[test]
    fn old_stamp_fails_time_check() {
        let verifier = Verifier::new(VerifyPolicy::new(20));
        let verdict = verifier.verify(ADAM);
        assert!(!verdict.is_valid());
        assert_eq!(verdict.reason, Some(FailureReason::TimestampCheckFailed));
        assert_eq!(verdict.reason.unwrap().to_string(), "timestamp check failed");
        assert!(matches!(verdict.time_check, TimeCheck::Checked { delta_ms, .. } if delta_ms > 0));
    }

    #[test]
    fn disabled_time_check_accepts_old_stamp() {
        let verifier = Verifier::new(VerifyPolicy::new(20).disable_time_check());
        let verdict = verifier.verify(ADAM);
        assert!(verdict.is_valid());
        assert_eq!(verdict.computed_bits, Some(20));
        assert_eq!(verdict.time_check, TimeCheck::Disabled);
        assert_eq!(verdict.token.unwrap().resource(), "adam@cypherspace.org");
    }

    #[test]
    fn lower_requirement_still_valid() {
        let verifier = Verifier::new(VerifyPolicy::new(12).disable_time_check());
        let verdict = verifier.verify(ADAM);
        assert!(verdict.is_valid());
        assert_eq!(verdict.required_bits, 12);
    }

    #[test]
    fn insufficient_bits() {
        let verifier = Verifier::new(VerifyPolicy::new(24).disable_time_check());
        let verdict = verifier.verify(ADAM);
        assert_eq!(verdict.reason, Some(FailureReason::InsufficientBits));
        assert_eq!(verdict.time_check, TimeCheck::NotReached);
    }

    #[test]
    fn within_allowance_either_side() {
        for offset_ms in [-9_000i64, 0, 9_000] {
            let now = adam_date() + chrono::Duration::milliseconds(offset_ms);
            let verifier = Verifier::with_clock(VerifyPolicy::new(20), FixedClock(now));
            assert!(verifier.verify(ADAM).is_valid(), "offset {offset_ms}");
        }
        let future = adam_date() - chrono::Duration::milliseconds(10_001);
        let verifier = Verifier::with_clock(VerifyPolicy::new(20), FixedClock(future));
        let verdict = verifier.verify(ADAM);
        assert_eq!(verdict.reason, Some(FailureReason::TimestampCheckFailed));
        assert!(matches!(verdict.time_check, TimeCheck::Checked { delta_ms: -10_001, .. }));
    }

    #[test]
    fn zero_allowance_requires_exact_time() {
        let policy = VerifyPolicy::new(0).time_allowance_ms(0);
        assert!(Verifier::with_clock(policy.clone(), FixedClock(adam_date()))
            .verify(ADAM)
            .is_valid());
        let later = adam_date() + chrono::Duration::milliseconds(1);
        assert!(!Verifier::with_clock(policy, FixedClock(later)).verify(ADAM).is_valid());
    }

    #[test]
    fn version_zero_refused_by_default() {
        let v0 = "0:110303060015:bob::ab:cd";
        let verdict = Verifier::new(VerifyPolicy::new(0).disable_time_check()).verify(v0);
        assert_eq!(verdict.reason, Some(FailureReason::IncorrectVersion));
        let verdict = Verifier::new(VerifyPolicy::new(0).disable_time_check().any_version()).verify(v0);
        assert!(verdict.is_valid());
    }

    #[test]
    fn resource_binding() {
        let token = TokenMinter::new()
            .mint(&MintRequest::new("alice@example.org", 8))
            .unwrap();
        let matching = VerifyPolicy::new(8).require_resource("alice@example.org");
        assert!(Verifier::new(matching).verify(token.as_str()).is_valid());

        let other = VerifyPolicy::new(8).require_resource("bob@example.org");
        let verdict = Verifier::new(other).verify(token.as_str());
        assert_eq!(verdict.reason, Some(FailureReason::ResourceMismatch));
        assert_eq!(verdict.reason.unwrap().to_string(), "resource mismatch");
    }

    #[test]
    fn malformed_text_is_a_failed_verdict() {
        let verdict = Verifier::new(VerifyPolicy::new(20)).verify("seven");
        assert!(!verdict.is_valid());
        assert!(verdict.token.is_none());
        assert_eq!(verdict.reason.unwrap().to_string(), "malformed token");
    }

    #[test]
    fn unsupported_hash_is_a_failed_verdict() {
        let verdict = Verifier::new(VerifyPolicy::new(20).hash_function("MD17")).verify(ADAM);
        assert_eq!(
            verdict.reason,
            Some(FailureReason::Malformed(HashcashError::UnsupportedHashFunction("MD17".into())))
        );
    }

    #[test]
    fn batch_keeps_order() {
        let verifier = Verifier::new(VerifyPolicy::new(20).disable_time_check());
        let verdicts = verifier.verify_all(&[ADAM, "seven", ADAM]);
        let valid: Vec<bool> = verdicts.iter().map(Verdict::is_valid).collect();
        assert_eq!(valid, vec![true, false, true]);
    }
}
