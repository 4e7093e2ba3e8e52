#![no_main]

use dnshdr::dns::{patch_counts, Header};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parsing arbitrary bytes must not panic; known flag bits round-trip
    if let Ok(header) = Header::parse(data) {
        let bytes = header.to_bytes();
        assert_eq!(&bytes[..2], &data[..2]);
        assert_eq!(&bytes[4..], &data[4..12]);
    }

    let mut message = data.to_vec();
    let _ = patch_counts(&mut message, 1, 2, 3);
});
