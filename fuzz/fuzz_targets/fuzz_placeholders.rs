#![no_main]

use std::collections::BTreeMap;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let vars = BTreeMap::from([
            ("environment", "prod".to_string()),
            ("name", "shop".to_string()),
            ("vendor", "aws".to_string()),
        ]);
        let _ = nopeus::domain::services::render_placeholders("fuzz.tf", content, &vars);
    }
});
