#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let _ = nopeus::config::parse_env_file(content, std::path::Path::new(".env"));
    }
});
