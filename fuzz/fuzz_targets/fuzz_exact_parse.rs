//! Fuzz target for exact number parsing.
//!
//! Accepted values must print back to a string that parses to the same
//! rational.

#![no_main]

use libfuzzer_sys::fuzz_target;
use mt_config::parse_exact;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(value) = parse_exact(text) {
            let reparsed = parse_exact(&value.to_string()).expect("printed value must parse");
            assert_eq!(reparsed, value);
        }
    }
});
