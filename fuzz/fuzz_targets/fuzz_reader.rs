#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Deserialization must reject arbitrary input without panicking
    let _ = fmx::FmIndex::from_bytes(data);
});
