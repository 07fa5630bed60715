#![no_main]
use libfuzzer_sys::fuzz_target;
use oxilz78::format::{self, FactorReader};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must only ever produce errors, never panics.
    let _ = format::read_all(data);

    // Same bytes behind a valid header reach the record decoder.
    let mut framed = b"OX78\x01\x00".to_vec();
    framed.extend_from_slice(data);
    if let Ok(reader) = FactorReader::new(&framed) {
        for item in reader {
            if item.is_err() {
                break;
            }
        }
    }
});
