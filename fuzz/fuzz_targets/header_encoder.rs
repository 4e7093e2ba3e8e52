#![no_main]

use dnshdr::dns::{
    encode_header, HeaderEncoder, HeaderPolicy, RcodeOverflowPolicy, ShortRequestPolicy,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First byte picks the response code, the rest is the request
    let Some((&rcode, request)) = data.split_first() else {
        return;
    };

    if let Ok(header) = encode_header(request, rcode) {
        assert_eq!(&header[0..2], &request[0..2]);
        assert_eq!(&header[4..6], &request[4..6]);
        assert_eq!(header[2], 0x80);
        assert_eq!(header[3], rcode & 0x0F);
        assert_eq!(&header[6..], &[0u8; 6]);
    } else {
        assert!(request.len() < 6);
    }

    // Zero-fill never fails on length
    let lenient = HeaderEncoder::new(HeaderPolicy {
        short_request: ShortRequestPolicy::ZeroFill,
        rcode_overflow: RcodeOverflowPolicy::Reject,
    });
    let res = lenient.encode(request, Some(rcode));
    assert_eq!(res.is_ok(), rcode <= 15);
});
