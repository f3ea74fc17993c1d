//! Fuzz target for source document JSON parsing.

#![no_main]

use labelprep::source::fuzz_parse_document;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };

    fuzz_parse_document(json);
});
