#![no_main]

use libfuzzer_sys::fuzz_target;
use hashcash_verification::{Verifier, VerifyPolicy};

fuzz_target!(|data: &[u8]| {
    // First byte picks the threshold, the rest is stamp text.
    let Some((&bits, rest)) = data.split_first() else {
        return;
    };
    let Ok(text) = std::str::from_utf8(rest) else {
        return;
    };

    // Verification reports failures in the verdict; it must never panic.
    let verdict = Verifier::new(VerifyPolicy::new(u32::from(bits)).disable_time_check()).verify(text);
    if verdict.is_valid() {
        assert!(verdict.computed_bits.unwrap_or(0) >= u32::from(bits));
    }
});
