#![no_main]

use libfuzzer_sys::fuzz_target;
use wirecheck::config::TRACE_MAGIC;
use wirecheck::trace::TraceCapture;

fuzz_target!(|data: &[u8]| {
    // Arbitrary record bodies behind a valid magic must never fail or panic
    let mut framed = TRACE_MAGIC.to_vec();
    framed.extend_from_slice(data);
    let capture = TraceCapture::parse(&framed).expect("body errors are not fatal");
    assert!(capture.truncated_tail() <= data.len());

    let _ = TraceCapture::parse(data);
});
