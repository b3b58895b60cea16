//! The user-facing mutation surface: validation, settability, overrides.
//!
//! Everything here is driven by an interactive front end (or a config
//! loader replaying saved answers). Failure is never fatal: a rejected
//! value leaves the symbol untouched and returns `false`, per the
//! engine-wide policy that bad input is the caller's problem to re-ask.
//!
//! An accepted override that actually changes the stored value drops the
//! whole table's memoized state; see `ConfigTable::clear_all_valid`.

use crate::expr::SymRef;
use crate::id::{get_sym, some_sym, SymbolId};
use crate::symbol::SymbolType;
use crate::table::ConfigTable;
use crate::tristate::Tristate;

/// A decimal integer: optional leading `-`, at least one digit, no
/// leading zero unless the value is exactly zero.
fn valid_int(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s).as_bytes();
    match digits {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        _ => digits.iter().all(|b| b.is_ascii_digit()),
    }
}

/// A hex value: optional `0x`/`0X` prefix, then at least one hex digit.
fn valid_hex(s: &str) -> bool {
    let digits = strip_hex_prefix(s).as_bytes();
    !digits.is_empty() && digits.iter().all(|b| b.is_ascii_hexdigit())
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s)
}

/// Parse a numeric string in the given base, tolerating a hex prefix.
/// Text that does not fit an i64 is a parse failure, never a value:
/// an overflowing user input must not alias zero and slip past a range.
fn parse_scalar(s: &str, base: u32) -> Option<i64> {
    let s = if base == 16 { strip_hex_prefix(s) } else { s };
    i64::from_str_radix(s, base).ok()
}

impl ConfigTable {
    fn range_bound(&self, r: SymRef, base: u32) -> i64 {
        let name = match r {
            SymRef::Sym(id) => self.symbols[id].name.as_deref().unwrap_or(""),
            _ => r.const_str().unwrap_or(""),
        };
        // a malformed declared bound degrades to zero
        parse_scalar(name, base).unwrap_or(0)
    }

    /// Whether `text` is a well-formed value for the symbol's declared
    /// type. Purely syntactic; range and settability are separate checks.
    pub fn string_valid(&self, id: SymbolId, text: &str) -> bool {
        match self.symbols[id].sym_type {
            SymbolType::String => true,
            SymbolType::Int => valid_int(text),
            SymbolType::Hex => valid_hex(text),
            SymbolType::Boolean | SymbolType::Tristate => {
                Tristate::from_input(text).is_some()
            }
            SymbolType::Unknown => false,
        }
    }

    /// Whether `text` is well-formed *and* inside the currently visible
    /// declared range (int/hex), or inside the settability window
    /// (boolean/tristate).
    pub fn string_within_range(&mut self, id: SymbolId, text: &str) -> bool {
        match self.symbols[id].sym_type {
            SymbolType::String => self.string_valid(id, text),
            SymbolType::Int => {
                if !self.string_valid(id, text) {
                    return false;
                }
                match self.range_prop(id) {
                    Some((min, max)) => match parse_scalar(text, 10) {
                        Some(val) => {
                            val >= self.range_bound(min, 10) && val <= self.range_bound(max, 10)
                        }
                        // well-formed but unrepresentable: outside any range
                        None => false,
                    },
                    None => true,
                }
            }
            SymbolType::Hex => {
                if !self.string_valid(id, text) {
                    return false;
                }
                match self.range_prop(id) {
                    Some((min, max)) => match parse_scalar(text, 16) {
                        Some(val) => {
                            val >= self.range_bound(min, 16) && val <= self.range_bound(max, 16)
                        }
                        None => false,
                    },
                    None => true,
                }
            }
            SymbolType::Boolean | SymbolType::Tristate => match Tristate::from_input(text) {
                Some(val) => self.tristate_within_range(id, val),
                None => false,
            },
            SymbolType::Unknown => false,
        }
    }

    /// The settability window for boolean/tristate symbols: `val` must lie
    /// in `[reverse-dependency floor, visibility]`, `mod` is never
    /// settable on a boolean, a fully pinned symbol (visibility at or
    /// below its floor) is unsettable, and an active-visible choice member
    /// accepts only `yes`.
    pub fn tristate_within_range(&mut self, id: SymbolId, val: Tristate) -> bool {
        self.resolve(id);
        let ty = self.effective_type(id);
        let sym = &self.symbols[id];

        if sym.visible == Tristate::No {
            return false;
        }
        if !ty.is_logic() {
            return false;
        }
        if ty == SymbolType::Boolean && val == Tristate::Mod {
            return false;
        }
        if sym.visible <= sym.rev_dep_tri {
            return false;
        }
        if sym.is_choice_member() && sym.visible == Tristate::Yes {
            return val == Tristate::Yes;
        }
        val >= sym.rev_dep_tri && val <= sym.visible
    }

    /// Store a tristate override. Setting the value it already resolves to
    /// is a no-op success; anything outside the settability window is
    /// rejected. An actual change invalidates the whole table, and a
    /// change to the modules symbol additionally marks every symbol
    /// changed (it can alter every effective type).
    pub fn set_tristate(&mut self, id: SymbolId, val: Tristate) -> bool {
        let oldval = self.tristate_value(id);
        if oldval != val && !self.tristate_within_range(id, val) {
            return false;
        }

        if self.symbols[id].new {
            self.symbols[id].new = false;
            self.set_changed(id);
        }
        if self.symbols[id].is_choice_member() && val == Tristate::Yes {
            if let Some(owner) = get_sym(self.symbols[id].choice) {
                self.symbols[owner].user_choice = some_sym(id);
                self.symbols[owner].new = false;
            }
        }

        self.symbols[id].user_tri = Some(val);
        if oldval != val {
            self.clear_all_valid();
            if self.modules_sym() == Some(id) {
                self.set_all_changed();
            }
        }
        true
    }

    /// Cycle `no -> mod -> yes -> no`, skipping values the settability
    /// window rejects; lands back on the current value when nothing else
    /// is accepted.
    pub fn toggle(&mut self, id: SymbolId) -> Tristate {
        let oldval = self.tristate_value(id);
        let mut newval = oldval;
        loop {
            newval = match newval {
                Tristate::No => Tristate::Mod,
                Tristate::Mod => Tristate::Yes,
                Tristate::Yes => Tristate::No,
            };
            if self.set_tristate(id, newval) {
                break;
            }
            if newval == oldval {
                break;
            }
        }
        newval
    }

    /// Store a string override. Boolean/tristate symbols dispatch on the
    /// leading `y`/`m`/`n`; hex values missing their `0x` prefix are
    /// normalized before storing. Storing the text already stored is a
    /// no-op success without invalidation.
    pub fn set_string(&mut self, id: SymbolId, text: &str) -> bool {
        match self.symbols[id].sym_type {
            SymbolType::Boolean | SymbolType::Tristate => {
                return match Tristate::from_input(text) {
                    Some(val) => self.set_tristate(id, val),
                    None => false,
                };
            }
            _ => {}
        }

        if !self.string_within_range(id, text) {
            return false;
        }

        if self.symbols[id].new {
            self.symbols[id].new = false;
            self.set_changed(id);
        }

        let needs_prefix = self.symbols[id].sym_type == SymbolType::Hex
            && !text.starts_with("0x")
            && !text.starts_with("0X");
        let normalized = if needs_prefix {
            format!("0x{}", text)
        } else {
            text.to_string()
        };

        if self.symbols[id].user_text.as_deref() == Some(normalized.as_str()) {
            return true;
        }
        self.symbols[id].user_text = Some(normalized);
        self.clear_all_valid();
        true
    }

    /// Whether the user can influence this symbol at all: visibility must
    /// strictly exceed the reverse-dependency floor.
    pub fn is_changeable(&mut self, id: SymbolId) -> bool {
        self.resolve(id);
        self.symbols[id].visible > self.symbols[id].rev_dep_tri
    }
}
