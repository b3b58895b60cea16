//! The configuration table: the explicit context object for everything.
//!
//! `ConfigTable` owns the symbol arena, the expression arena, the hashed
//! name index, the change-tracking epoch, and the modules-symbol cache.
//! There is no hidden global state anywhere in the crate; every operation
//! takes the table.
//!
//! The declaration half of this module (declare/add_*/make_choice) is the
//! interface consumed by the external parser collaborator; the tracking
//! half (invalidation, change flags) is consumed by UI/persistence
//! collaborators. Value computation itself lives in `resolve` and the
//! user mutation surface in `edit`, both as further impls on `ConfigTable`.

use std::fmt;

use log::debug;

use crate::expr::{ExprArena, SymRef};
use crate::id::{get_sym, some_sym, ExprId, OptSym, SymbolId};
use crate::symbol::{Property, PropertyKind, Symbol, SymbolType, ValueState};
use crate::tristate::Tristate;

/// Number of hashed buckets; one extra overflow bucket holds anonymous
/// symbols, which have no name to hash.
const BUCKETS: usize = 256;

/// Errors from the declaration surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableError {
    /// `y`, `m`, and `n` are reserved constants and cannot be declared.
    ReservedName(String),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::ReservedName(name) => {
                write!(f, "'{}' is a reserved constant symbol", name)
            }
        }
    }
}

impl std::error::Error for TableError {}

/// The symbol table and all process-wide resolver state.
#[derive(Debug)]
pub struct ConfigTable {
    pub(crate) symbols: Vec<Symbol>,
    pub(crate) exprs: ExprArena,
    /// Hashed name index: chained buckets, newest entry first, with the
    /// const/non-const partition applied at probe time.
    buckets: Vec<Vec<SymbolId>>,
    /// Invalidation epoch: bumped every time any override actually changes.
    change_count: u64,
    /// The designated "modules enabled" symbol, if any.
    pub(crate) modules_sym: OptSym,
    /// Cached tristate of the modules symbol; when `No`, tristate degrades
    /// to boolean table-wide.
    pub(crate) modules_val: Tristate,
}

impl ConfigTable {
    pub fn new() -> Self {
        ConfigTable {
            symbols: Vec::new(),
            exprs: ExprArena::new(),
            buckets: vec![Vec::new(); BUCKETS + 1],
            change_count: 0,
            modules_sym: None,
            modules_val: Tristate::No,
        }
    }

    /// Additive byte-sum hash, masked to the bucket count. Collision
    /// tolerance is the only requirement here; chains preserve creation
    /// order (newest first).
    fn hash(name: &str) -> usize {
        let mut h: usize = 0;
        for b in name.bytes() {
            h = h.wrapping_add(b as usize);
        }
        h & (BUCKETS - 1)
    }

    fn alloc(&mut self, name: Option<String>, is_const: bool, bucket: usize) -> SymbolId {
        let id = self.symbols.len();
        self.symbols.push(Symbol::new(name, is_const));
        self.buckets[bucket].insert(0, id);
        id
    }

    /// Create-or-get a symbol by name. Single-character `y`/`m`/`n` always
    /// dispatch to the reserved constants, ignoring `is_const`; everything
    /// else probes the hashed index within the requested partition and
    /// allocates an `Unknown`-typed symbol on a miss.
    pub fn lookup(&mut self, name: &str, is_const: bool) -> SymRef {
        if let Some(r) = SymRef::reserved(name) {
            return r;
        }
        let h = Self::hash(name);
        for &id in &self.buckets[h] {
            let sym = &self.symbols[id];
            if sym.name.as_deref() == Some(name) && sym.is_const == is_const {
                return SymRef::Sym(id);
            }
        }
        SymRef::Sym(self.alloc(Some(name.to_string()), is_const, h))
    }

    /// Like `lookup`, but never creates, and only sees the non-const
    /// partition (plus the reserved constants).
    pub fn find(&self, name: &str) -> Option<SymRef> {
        if let Some(r) = SymRef::reserved(name) {
            return Some(r);
        }
        let h = Self::hash(name);
        self.buckets[h]
            .iter()
            .copied()
            .find(|&id| {
                let sym = &self.symbols[id];
                sym.name.as_deref() == Some(name) && !sym.is_const
            })
            .map(SymRef::Sym)
    }

    /// Declare (or re-type) a named, non-const symbol.
    pub fn declare(&mut self, name: &str, ty: SymbolType) -> Result<SymbolId, TableError> {
        match self.lookup(name, false) {
            SymRef::Sym(id) => {
                self.symbols[id].sym_type = ty;
                Ok(id)
            }
            _ => Err(TableError::ReservedName(name.to_string())),
        }
    }

    /// Declare an anonymous symbol (the internal anchor of an unnamed
    /// choice group). Anonymous symbols live in the overflow bucket.
    pub fn declare_anon(&mut self, ty: SymbolType) -> SymbolId {
        let id = self.alloc(None, false, BUCKETS);
        self.symbols[id].sym_type = ty;
        id
    }

    /// Declare a string symbol whose default is seeded from a process
    /// environment variable, when that variable is set. The symbol is
    /// flagged auto: its value is machine-provided, not user state.
    pub fn env_default(&mut self, name: &str, var: &str) -> Result<SymbolId, TableError> {
        let id = self.declare(name, SymbolType::String)?;
        self.symbols[id].auto = true;
        if let Ok(value) = std::env::var(var) {
            self.add_default_literal(id, &value);
        }
        Ok(id)
    }

    // ---- symbol access ------------------------------------------------

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id]
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// All arena ids, in creation order.
    pub fn ids(&self) -> std::ops::Range<SymbolId> {
        0..self.symbols.len()
    }

    // ---- expression building -----------------------------------------

    pub fn expr(&self, id: ExprId) -> crate::expr::Expr {
        self.exprs.node(id)
    }

    pub fn expr_sym(&mut self, s: SymRef) -> ExprId {
        self.exprs.sym(s)
    }

    pub fn expr_not(&mut self, e: ExprId) -> ExprId {
        self.exprs.not(e)
    }

    pub fn expr_or(&mut self, a: ExprId, b: ExprId) -> ExprId {
        self.exprs.or(a, b)
    }

    pub fn expr_and(&mut self, a: ExprId, b: ExprId) -> ExprId {
        self.exprs.and(a, b)
    }

    pub fn expr_equal(&mut self, a: SymRef, b: SymRef) -> ExprId {
        self.exprs.equal(a, b)
    }

    pub fn expr_unequal(&mut self, a: SymRef, b: SymRef) -> ExprId {
        self.exprs.unequal(a, b)
    }

    // ---- property attachment -----------------------------------------

    fn add_prop(&mut self, id: SymbolId, kind: PropertyKind, cond: Option<ExprId>) {
        self.symbols[id].props.push(Property { kind, cond });
    }

    pub fn add_prompt(&mut self, id: SymbolId, text: &str, cond: Option<ExprId>) {
        self.add_prop(id, PropertyKind::Prompt { text: text.to_string() }, cond);
    }

    pub fn add_menu(&mut self, id: SymbolId, text: &str, cond: Option<ExprId>) {
        self.add_prop(id, PropertyKind::Menu { text: text.to_string() }, cond);
    }

    pub fn add_comment(&mut self, id: SymbolId, text: &str, cond: Option<ExprId>) {
        self.add_prop(id, PropertyKind::Comment { text: text.to_string() }, cond);
    }

    pub fn add_default(&mut self, id: SymbolId, value: ExprId, cond: Option<ExprId>) {
        self.add_prop(id, PropertyKind::Default { value }, cond);
    }

    /// Default to another symbol's value.
    pub fn add_default_sym(&mut self, id: SymbolId, value: SymRef, cond: Option<ExprId>) {
        let e = self.exprs.sym(value);
        self.add_default(id, e, cond);
    }

    /// Default to a const literal (interned in the const partition).
    pub fn add_default_literal(&mut self, id: SymbolId, value: &str) {
        let lit = self.lookup(value, true);
        self.add_default_sym(id, lit, None);
    }

    pub fn add_range(&mut self, id: SymbolId, min: SymRef, max: SymRef, cond: Option<ExprId>) {
        self.add_prop(id, PropertyKind::Range { min, max }, cond);
    }

    /// Accumulate a select-style contribution into the target's
    /// reverse-dependency expression. Contributions OR together; they are
    /// never replaced.
    pub fn add_reverse_dep(&mut self, id: SymbolId, e: ExprId) {
        let combined = match self.symbols[id].rev_dep {
            Some(prev) => self.exprs.or(prev, e),
            None => e,
        };
        self.symbols[id].rev_dep = Some(combined);
    }

    /// Turn `anchor` into a choice group over `members` (declaration
    /// order preserved). Each member records its owning anchor.
    pub fn make_choice(&mut self, anchor: SymbolId, members: &[SymbolId]) {
        self.symbols[anchor].members = members.to_vec();
        for &m in members {
            self.symbols[m].choice = some_sym(anchor);
        }
    }

    /// Designate the table-wide "modules enabled" symbol.
    pub fn set_modules_sym(&mut self, id: SymbolId) {
        self.modules_sym = some_sym(id);
    }

    pub fn modules_sym(&self) -> Option<SymbolId> {
        get_sym(self.modules_sym)
    }

    // ---- change tracking and invalidation ----------------------------

    /// The invalidation epoch. Consumers can watch this to learn that a
    /// resolve pass may now produce different answers.
    pub fn change_count(&self) -> u64 {
        self.change_count
    }

    pub(crate) fn set_changed(&mut self, id: SymbolId) {
        self.symbols[id].changed = true;
    }

    /// Mark every symbol changed, for transitions (like toggling module
    /// support) that can alter every effective type in the table.
    pub fn set_all_changed(&mut self) {
        for sym in &mut self.symbols {
            sym.changed = true;
        }
    }

    pub fn is_changed(&self, id: SymbolId) -> bool {
        self.symbols[id].changed
    }

    /// Acknowledge a change notification.
    pub fn clear_changed(&mut self, id: SymbolId) {
        self.symbols[id].changed = false;
    }

    /// Drop every memoized value. Invalidation is deliberately table-wide,
    /// not incremental: visibility expressions can reference arbitrary
    /// other symbols, so correctness wins over precision. The modules
    /// symbol is re-resolved immediately to refresh the table-wide cache.
    pub fn clear_all_valid(&mut self) {
        for sym in &mut self.symbols {
            sym.state = ValueState::Stale;
        }
        self.change_count += 1;
        debug!("invalidated all symbols (epoch {})", self.change_count);
        if let Some(m) = get_sym(self.modules_sym) {
            self.resolve(m);
        }
    }
}

impl Default for ConfigTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_dedup() {
        let mut t = ConfigTable::new();
        let a = t.lookup("FOO", false);
        let b = t.lookup("FOO", false);
        assert_eq!(a, b);
        assert_eq!(t.symbol_count(), 1);
    }

    #[test]
    fn test_const_partition() {
        let mut t = ConfigTable::new();
        let plain = t.lookup("FOO", false);
        let lit = t.lookup("FOO", true);
        assert_ne!(plain, lit);
        assert_eq!(t.symbol_count(), 2);
        // find only sees the non-const partition
        assert_eq!(t.find("FOO"), Some(plain));
    }

    #[test]
    fn test_reserved_dispatch_skips_arena() {
        let mut t = ConfigTable::new();
        assert_eq!(t.lookup("y", true), SymRef::Yes);
        assert_eq!(t.lookup("m", false), SymRef::Mod);
        assert_eq!(t.lookup("n", false), SymRef::No);
        assert_eq!(t.symbol_count(), 0);
        assert_eq!(t.find("y"), Some(SymRef::Yes));
    }

    #[test]
    fn test_find_never_creates() {
        let t = ConfigTable::new();
        assert_eq!(t.find("MISSING"), None);
        assert_eq!(t.symbol_count(), 0);
    }

    #[test]
    fn test_colliding_names_chain() {
        // "AB" and "BA" have the same byte sum, so they share a bucket
        let mut t = ConfigTable::new();
        let ab = t.lookup("AB", false);
        let ba = t.lookup("BA", false);
        assert_ne!(ab, ba);
        assert_eq!(t.find("AB"), Some(ab));
        assert_eq!(t.find("BA"), Some(ba));
    }

    #[test]
    fn test_declare_reserved_rejected() {
        let mut t = ConfigTable::new();
        let err = t.declare("y", SymbolType::Boolean).unwrap_err();
        assert_eq!(err, TableError::ReservedName("y".to_string()));
    }

    #[test]
    fn test_reverse_deps_accumulate() {
        let mut t = ConfigTable::new();
        let a = t.declare("A", SymbolType::Boolean).expect("declare");
        let e1 = t.expr_sym(SymRef::Yes);
        let e2 = t.expr_sym(SymRef::Mod);
        t.add_reverse_dep(a, e1);
        t.add_reverse_dep(a, e2);
        let top = t.symbol(a).rev_dep.expect("rev_dep");
        assert_eq!(t.expr(top), crate::expr::Expr::Or(e1, e2));
    }
}
