#![no_main]

use libfuzzer_sys::fuzz_target;
use wirecheck::checksum::{decode_response, encode_response};

fuzz_target!(|data: &[u8]| {
    // An accepted response must re-encode to the exact input
    if let Ok(decoded) = decode_response(data) {
        let again = encode_response(&decoded.header, &decoded.tree, decoded.variant)
            .expect("decoded trees fit their counts");
        assert_eq!(again, data);
    }
});
