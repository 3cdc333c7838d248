//! Property tests for unit checksums and the skip gate.

use std::collections::BTreeMap;

use proptest::prelude::*;

use nopeus::domain::entities::{DeployableUnit, UnitKind, ValuesPayload};
use nopeus::domain::services::{build_checksum_map, should_skip};

fn environment() -> impl Strategy<Value = BTreeMap<String, String>> {
    proptest::collection::btree_map("[A-Z]{1,8}", "[a-z0-9]{0,12}", 0..6)
}

fn service(environment: BTreeMap<String, String>, version: &str) -> DeployableUnit {
    DeployableUnit::new(
        UnitKind::Default,
        "api",
        "salfatigroup/service",
        "nopeus-app",
        ValuesPayload::named("api")
            .with_image("acme/api", version)
            .with_environment(environment),
    )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: the checksum depends on content, not on insertion order.
    #[test]
    fn property_checksum_ignores_insertion_order(env in environment()) {
        let reversed: BTreeMap<String, String> = env
            .iter()
            .rev()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let a = service(env, "1.0.0").checksum().unwrap();
        let b = service(reversed, "1.0.0").checksum().unwrap();
        prop_assert_eq!(a, b);
    }

    /// PROPERTY: a unit recorded by a previous run is skipped, and changing
    /// its version always brings it back.
    #[test]
    fn property_recorded_unit_is_skipped_until_it_changes(
        env in environment(),
        version in "[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}",
    ) {
        let unit = service(env.clone(), &version);
        let recorded = build_checksum_map(std::slice::from_ref(&unit)).unwrap();
        prop_assert!(should_skip(&unit, &recorded).unwrap());

        let bumped = service(env, &format!("{version}-next"));
        prop_assert!(!should_skip(&bumped, &recorded).unwrap());
    }

    /// PROPERTY: nothing is skipped without a record.
    #[test]
    fn property_empty_record_skips_nothing(env in environment()) {
        let unit = service(env, "1.0.0");
        prop_assert!(!should_skip(&unit, &BTreeMap::new()).unwrap());
    }
}
