//! Fuzz the string-input mutation path
//!
//! This target pushes arbitrary text through set_string on each scalar
//! symbol type. Validation may reject the input, but resolution and
//! value rendering must never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use symconf::{ConfigTable, SymbolType, Tristate};

fuzz_target!(|data: &[u8]| {
    // Try to interpret the data as UTF-8
    if let Ok(input) = std::str::from_utf8(data) {
        let mut table = ConfigTable::new();
        let Ok(modules) = table.declare("MODULES", SymbolType::Boolean) else {
            return;
        };
        table.add_prompt(modules, "MODULES", None);
        table.set_modules_sym(modules);
        let _ = table.set_tristate(modules, Tristate::Yes);

        for (name, ty) in [
            ("TRI", SymbolType::Tristate),
            ("INT", SymbolType::Int),
            ("HEX", SymbolType::Hex),
            ("STR", SymbolType::String),
        ] {
            let Ok(id) = table.declare(name, ty) else {
                return;
            };
            table.add_prompt(id, name, None);
            // A rejected input returns false; it must not panic
            let _ = table.string_valid(id, input);
            let _ = table.set_string(id, input);
            let _ = table.string_value(id);
            let _ = table.tristate_value(id);
        }
    }
});
