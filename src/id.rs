//! Index types for the configuration table arenas.
//!
//! Symbols and expressions live in append-only arenas owned by
//! `table::ConfigTable`; everything else refers to them by plain index.
//! Indices are stable for the life of the table (nothing is ever removed),
//! so they can be stored freely inside symbols, properties, and tests.

pub use nonminmax::NonMaxUsize;

/// Index of a symbol in the table's symbol arena (0..N-1).
///
/// The three reserved constants `y`/`m`/`n` and the empty-string constant
/// are *not* symbols in the arena; see `expr::SymRef`.
pub type SymbolId = usize;

/// Index of an expression node in the table's expression arena.
pub type ExprId = usize;

/// A SymbolId that can be stored in Option without doubling size.
/// Uses NonMaxUsize so that Option<NonMaxUsize> is the same size as usize,
/// with usize::MAX serving as the niche for None.
pub type OptSym = Option<NonMaxUsize>;

/// Convert a SymbolId to OptSym.
#[inline]
pub fn some_sym(id: SymbolId) -> OptSym {
    NonMaxUsize::new(id)
}

/// Extract a SymbolId from OptSym.
#[inline]
pub fn get_sym(opt: OptSym) -> Option<SymbolId> {
    opt.map(|n| n.get())
}
