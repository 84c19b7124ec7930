use proptest::prelude::*;

use hashcash_types::{Extensions, HashcashError, Version};
use hashcash_work::{MintRequest, Token, TokenMinter};

fn hash_function() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["SHA1", "SHA-256", "SHA3-256"])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// parse(mint(...).text) keeps resource and version and meets the target.
    #[test]
    fn minted_stamps_parse_back(
        resource in "[a-zA-Z0-9@._=;,-]{0,24}",
        bits in 0u32..10,
        version in 0u32..2,
        function in hash_function(),
    ) {
        let request = MintRequest::new(resource.clone(), bits)
            .version(version)
            .hash_function(function);
        let minted = TokenMinter::new().mint(&request).unwrap();
        let parsed = Token::parse_with(minted.as_str(), function).unwrap();

        prop_assert_eq!(parsed.resource(), resource.as_str());
        prop_assert_eq!(parsed.version(), Version::try_from(version).unwrap());
        prop_assert!(parsed.computed_bits() >= bits);
        prop_assert_eq!(parsed.computed_bits(), minted.computed_bits());
        prop_assert_eq!(parsed.digest(), minted.digest());
    }

    /// Extensions given to the minter come back out of the parsed stamp.
    #[test]
    fn minted_extensions_survive(
        ext in prop::collection::btree_map(
            "[a-z]{1,6}",
            prop::option::of(prop::collection::vec("[a-z0-9]{1,6}", 1..3)),
            0..4,
        ).prop_map(|m| m.into_iter().collect::<Extensions>()),
    ) {
        let request = MintRequest::new("r", 2).extensions(ext.clone());
        let token = TokenMinter::new().mint(&request).unwrap();
        let parsed = Token::parse(token.as_str()).unwrap();
        prop_assert_eq!(parsed.extensions(), &ext);
    }

    /// Any resource containing a colon is refused.
    #[test]
    fn colon_in_resource_rejected(a in "[a-z]{0,8}", b in "[a-z]{0,8}") {
        let request = MintRequest::new(format!("{a}:{b}"), 1);
        let err = TokenMinter::new().mint(&request).unwrap_err();
        prop_assert!(matches!(err, HashcashError::Validation(_)));
    }

    /// Parsing arbitrary text never panics.
    #[test]
    fn parse_is_total(text in ".{0,80}") {
        let _ = Token::parse(&text);
    }

    /// Arbitrary colon-separated text either parses or fails with a format error.
    #[test]
    fn parse_errors_are_format_errors(text in "[01]:[0-9a-z:]{0,40}") {
        if let Err(e) = Token::parse(&text) {
            prop_assert!(matches!(e, HashcashError::Format(_)));
        }
    }
}

/// Each target is met, however strong the previous stamp happened to be.
#[test]
fn stronger_targets_are_honoured() {
    let minter = TokenMinter::new();
    for bits in [4u32, 8, 12, 16] {
        let token = minter.mint(&MintRequest::new("monotonic", bits)).unwrap();
        assert!(token.computed_bits() >= bits, "target {bits}");
    }
}
