//! Fuzz symbol name lookup and interning
//!
//! This target exercises the hashed name table with arbitrary names,
//! including the reserved singletons and repeated lookups. Interning
//! must stay idempotent and must never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use symconf::ConfigTable;

fuzz_target!(|data: &[u8]| {
    // Try to interpret the data as UTF-8
    if let Ok(input) = std::str::from_utf8(data) {
        let mut table = ConfigTable::new();
        for name in input.split_whitespace() {
            let first = table.lookup(name, false);
            let second = table.lookup(name, false);
            assert_eq!(first, second);
            // const interning must reuse the non-const entry rules
            let as_const = table.lookup(name, true);
            assert_eq!(as_const, table.lookup(name, true));
            // a pure find never creates and agrees with lookup
            if let Some(found) = table.find(name) {
                assert_eq!(found, first);
            }
        }
    }
});
