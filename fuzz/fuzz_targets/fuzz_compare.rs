#![no_main]

use libfuzzer_sys::fuzz_target;
use wirecheck::compare::compare;

fuzz_target!(|data: &[u8]| {
    // First half as the payload, second half as the reference
    let (payload, reference) = data.split_at(data.len() / 2);
    let _ = compare(payload, Some(reference));
    let _ = compare(payload, None);
});
