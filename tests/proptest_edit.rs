//! Property tests for validation and the mutation surface
//!
//! Tests key properties:
//! - set_string/string_value round-trips on free symbols
//! - hex normalization always yields a 0x-prefixed stored value
//! - resolution is a pure function of properties + overrides: replaying
//!   the same override sequence reproduces the same values, and
//!   invalidation without edits changes nothing

use proptest::prelude::*;
use symconf::{ConfigTable, SymbolId, SymbolType, Tristate};

fn arb_tristate() -> impl Strategy<Value = Tristate> {
    prop_oneof![
        Just(Tristate::No),
        Just(Tristate::Mod),
        Just(Tristate::Yes),
    ]
}

/// A table with module support enabled and `n` free tristate symbols
/// (visible, unconditional, no deps): every value is always settable.
fn free_table(n: usize) -> (ConfigTable, Vec<SymbolId>) {
    let mut t = ConfigTable::new();
    let m = t.declare("MODULES", SymbolType::Boolean).expect("declare");
    t.add_prompt(m, "MODULES", None);
    t.set_modules_sym(m);
    assert!(t.set_tristate(m, Tristate::Yes));
    let syms = (0..n)
        .map(|i| {
            let name = format!("FREE{}", i);
            let id = t.declare(&name, SymbolType::Tristate).expect("declare");
            t.add_prompt(id, &name, None);
            id
        })
        .collect();
    (t, syms)
}

proptest! {
    #[test]
    fn prop_free_symbol_tracks_last_set(edits in prop::collection::vec((0usize..3, arb_tristate()), 1..20)) {
        let (mut t, syms) = free_table(3);
        let mut expected = [Tristate::No; 3];
        for (i, val) in edits {
            prop_assert!(t.set_tristate(syms[i], val));
            expected[i] = val;
        }
        for (i, id) in syms.iter().enumerate() {
            prop_assert_eq!(t.tristate_value(*id), expected[i]);
        }
    }

    #[test]
    fn prop_invalidation_without_edits_is_stable(edits in prop::collection::vec((0usize..3, arb_tristate()), 0..10)) {
        let (mut t, syms) = free_table(3);
        for (i, val) in edits {
            prop_assert!(t.set_tristate(syms[i], val));
        }
        let before: Vec<Tristate> = syms.iter().map(|&id| t.tristate_value(id)).collect();
        t.clear_all_valid();
        let after: Vec<Tristate> = syms.iter().map(|&id| t.tristate_value(id)).collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn prop_int_round_trip(v in any::<i32>()) {
        let mut t = ConfigTable::new();
        let i = t.declare("I", SymbolType::Int).expect("declare");
        t.add_prompt(i, "I", None);
        let text = v.to_string();
        prop_assert!(t.string_valid(i, &text));
        prop_assert!(t.set_string(i, &text));
        prop_assert_eq!(t.string_value(i), text);
    }

    #[test]
    fn prop_leading_zero_ints_rejected(v in 1u32..1_000_000, zeros in 1usize..4) {
        let mut t = ConfigTable::new();
        let i = t.declare("I", SymbolType::Int).expect("declare");
        t.add_prompt(i, "I", None);
        let text = format!("{}{}", "0".repeat(zeros), v);
        prop_assert!(!t.string_valid(i, &text));
        prop_assert!(!t.set_string(i, &text));
    }

    #[test]
    fn prop_hex_is_stored_with_prefix(digits in "[0-9a-fA-F]{1,8}") {
        let mut t = ConfigTable::new();
        let h = t.declare("H", SymbolType::Hex).expect("declare");
        t.add_prompt(h, "H", None);
        prop_assert!(t.set_string(h, &digits));
        let stored = t.string_value(h);
        prop_assert_eq!(stored, format!("0x{}", digits));
    }

    #[test]
    fn prop_garbage_hex_rejected(text in "[g-z!@#,. ]{1,12}") {
        let mut t = ConfigTable::new();
        let h = t.declare("H", SymbolType::Hex).expect("declare");
        t.add_prompt(h, "H", None);
        prop_assert!(!t.string_valid(h, &text));
        prop_assert!(!t.set_string(h, &text));
        prop_assert_eq!(t.string_value(h), "");
    }

    #[test]
    fn prop_strings_always_valid(text in ".{0,40}") {
        let mut t = ConfigTable::new();
        let s = t.declare("S", SymbolType::String).expect("declare");
        t.add_prompt(s, "S", None);
        prop_assert!(t.string_valid(s, &text));
        prop_assert!(t.set_string(s, &text));
        prop_assert_eq!(t.string_value(s), text);
    }
}
