#![no_main]

use libfuzzer_sys::fuzz_target;
use hashcash_types::Extensions;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Decoding is total.
    let decoded = Extensions::decode(text);

    // Once encoded, the wire form is a fixed point of decode + encode.
    if let Ok(encoded) = decoded.encode() {
        let again = Extensions::decode(&encoded).encode();
        assert_eq!(again.ok(), Some(encoded));
    }
});
