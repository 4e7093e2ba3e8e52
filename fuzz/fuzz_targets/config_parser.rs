#![no_main]

use dnshdr::config::Config;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Try to parse random bytes as YAML configuration
    // This should not panic regardless of input
    if let Ok(yaml_str) = std::str::from_utf8(data) {
        let _ = Config::from_yaml(yaml_str);
    }
});
