#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parsing arbitrary text must never panic, only fail.
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(token) = hashcash_work::Token::parse(text) {
        // Accepted stamps keep their literal text and a bounded bit count.
        assert_eq!(token.as_str(), text);
        assert!(token.computed_bits() <= 160);
    }

    // The hash name goes through the same lenient path.
    let _ = hashcash_work::Token::parse_with(text, "SHA-256");
});
