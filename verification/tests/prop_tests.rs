use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use hashcash_nullables::{NullClock, NullRandom};
use hashcash_verification::{FailureReason, TimeCheck, Verifier, VerifyPolicy};
use hashcash_work::{MintRequest, TokenMinter};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Any text yields a verdict; unparseable text is never valid.
    #[test]
    fn verify_is_total(text in ".{0,64}", bits in 0u32..24) {
        let verdict = Verifier::new(VerifyPolicy::new(bits)).verify(&text);
        if verdict.token.is_none() {
            prop_assert!(!verdict.is_valid());
            prop_assert!(matches!(verdict.reason, Some(FailureReason::Malformed(_))));
        }
    }

    /// A fresh stamp verifies against its own target, resource and a clock
    /// within the allowance; one second past the allowance it does not.
    #[test]
    fn minted_stamps_verify(
        resource in "[a-z0-9@.]{0,16}",
        bits in 0u32..10,
        salt in any::<u64>(),
        skew_ms in -10_000i64..=10_000,
    ) {
        let minted_at = Utc.with_ymd_and_hms(2026, 10, 16, 8, 30, 5).unwrap();
        let token = TokenMinter::with_nonce_source(NullRandom::new(vec![salt, 0]))
            .mint(&MintRequest::new(resource.as_str(), bits).timestamp(minted_at))
            .unwrap();

        let clock = NullClock::new(minted_at + Duration::milliseconds(skew_ms));
        let policy = VerifyPolicy::new(bits).require_resource(resource.as_str());
        let verifier = Verifier::with_clock(policy, &clock);
        let verdict = verifier.verify(token.as_str());
        prop_assert!(verdict.is_valid(), "{:?}", verdict.reason);
        let checked = matches!(
            verdict.time_check,
            TimeCheck::Checked { delta_ms, .. } if delta_ms == skew_ms
        );
        prop_assert!(checked);

        clock.advance(Duration::milliseconds(if skew_ms >= 0 { 10_001 } else { -10_001 }));
        let verdict = verifier.verify(token.as_str());
        prop_assert_eq!(verdict.reason, Some(FailureReason::TimestampCheckFailed));
    }

    /// Raising the requirement past the computed bits always fails on bits.
    #[test]
    fn requirement_above_computed_fails(bits in 0u32..8) {
        let token = TokenMinter::new().mint(&MintRequest::new("r", bits)).unwrap();
        let policy = VerifyPolicy::new(token.computed_bits() + 1).disable_time_check();
        let verdict = Verifier::new(policy).verify_token(token);
        prop_assert_eq!(verdict.reason, Some(FailureReason::InsufficientBits));
    }
}
