//! Property tests for `{{ name }}` placeholder rendering.

use std::collections::BTreeMap;

use proptest::prelude::*;

use nopeus::domain::services::render_placeholders;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: rendering arbitrary content never panics.
    #[test]
    fn property_render_never_panics(content in ".{0,256}") {
        let vars = BTreeMap::from([("name", "shop".to_string())]);
        let _ = render_placeholders("main.tf", &content, &vars);
    }

    /// PROPERTY: content without placeholders is returned unchanged,
    /// including `${...}` interpolation.
    #[test]
    fn property_plain_content_is_untouched(content in "[^{}]{0,128}") {
        let rendered = render_placeholders("main.tf", &content, &BTreeMap::new()).unwrap();
        prop_assert_eq!(rendered, content);
    }

    /// PROPERTY: every occurrence of a placeholder is replaced.
    #[test]
    fn property_placeholders_are_substituted(
        value in "[a-z0-9-]{0,16}",
        repeats in 1usize..5,
    ) {
        let content = "cluster = \"{{ name }}\"\n".repeat(repeats);
        let vars = BTreeMap::from([("name", value.clone())]);

        let rendered = render_placeholders("main.tf", &content, &vars).unwrap();
        prop_assert_eq!(rendered, format!("cluster = \"{value}\"\n").repeat(repeats));
    }
}
