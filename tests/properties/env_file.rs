//! Property tests for env file parsing.

use std::collections::BTreeMap;
use std::path::Path;

use proptest::prelude::*;

use nopeus::config::parse_env_file;

fn var_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Z_][A-Z0-9_]{0,15}").unwrap()
}

fn plain_value() -> impl Strategy<Value = String> {
    // No quotes, no '#', no surrounding whitespace
    proptest::string::string_regex("[A-Za-z0-9:/._@=-]{0,24}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: parsing arbitrary text never panics.
    #[test]
    fn property_parse_never_panics(content in ".{0,256}") {
        let _ = parse_env_file(&content, Path::new(".env"));
    }

    /// PROPERTY: well-formed `KEY=VALUE` lines parse back to the same map,
    /// with the last assignment of a key winning.
    #[test]
    fn property_pairs_are_recovered(
        pairs in proptest::collection::vec((var_name(), plain_value()), 0..8)
    ) {
        let content: String = pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}\n"))
            .collect();
        let expected: BTreeMap<String, String> = pairs.into_iter().collect();

        let parsed = parse_env_file(&content, Path::new(".env")).unwrap();
        prop_assert_eq!(parsed, expected);
    }

    /// PROPERTY: comments, blank lines and `export` prefixes do not change the result.
    #[test]
    fn property_decorations_are_ignored(
        pairs in proptest::collection::vec((var_name(), plain_value()), 1..6)
    ) {
        let plain: String = pairs.iter().map(|(k, v)| format!("{k}={v}\n")).collect();
        let decorated: String = pairs
            .iter()
            .map(|(k, v)| format!("# {k}\n\nexport {k}={v}\n"))
            .collect();

        let plain = parse_env_file(&plain, Path::new(".env")).unwrap();
        let decorated = parse_env_file(&decorated, Path::new(".env")).unwrap();
        prop_assert_eq!(plain, decorated);
    }
}
