#![no_main]

use libfuzzer_sys::fuzz_target;
use nopeus::domain::entities::DeploymentSnapshot;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Anything that parses must serialize and parse back to the same snapshot
        if let Ok(snapshot) = DeploymentSnapshot::from_json(content) {
            let json = snapshot.to_json().expect("snapshot serializes");
            let reparsed = DeploymentSnapshot::from_json(&json).expect("snapshot round-trips");
            assert_eq!(snapshot, reparsed);
        }
    }
});
