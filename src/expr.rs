//! Immutable expression trees over configuration symbols.
//!
//! Expressions are binary trees built once by the declaration collaborator
//! (the parser) and never mutated afterwards. Nodes live in an append-only
//! arena and refer to each other and to symbols by index only, so a single
//! subtree can be shared by any number of properties without ownership
//! questions.
//!
//! Evaluation lives in `resolve`, because evaluating a symbol reference
//! may force that symbol's own (memoized) resolution.

use crate::id::{ExprId, SymbolId};
use crate::tristate::Tristate;

/// A reference to a symbol as it appears inside an expression.
///
/// The reserved constants `y`/`m`/`n` and the canonical empty string are
/// dispatched structurally here, before any table lookup: they are never
/// stored in the arena, never invalidated, and never mutated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SymRef {
    /// The reserved constant `y` (tristate yes).
    Yes,
    /// The reserved constant `m` (tristate mod).
    Mod,
    /// The reserved constant `n` (tristate no).
    No,
    /// The anonymous empty-string constant, the neutral value for
    /// string/int/hex symbols.
    Empty,
    /// An ordinary symbol in the table arena.
    Sym(SymbolId),
}

impl SymRef {
    /// Reserved-name dispatch: single-character `y`/`m`/`n` always refer
    /// to the constants, ahead of and instead of any hashed lookup.
    pub fn reserved(name: &str) -> Option<SymRef> {
        match name.as_bytes() {
            [b'y'] => Some(SymRef::Yes),
            [b'm'] => Some(SymRef::Mod),
            [b'n'] => Some(SymRef::No),
            _ => None,
        }
    }

    /// The fixed tristate value of a constant reference, if this is one.
    pub fn const_tristate(self) -> Option<Tristate> {
        match self {
            SymRef::Yes => Some(Tristate::Yes),
            SymRef::Mod => Some(Tristate::Mod),
            SymRef::No | SymRef::Empty => Some(Tristate::No),
            SymRef::Sym(_) => None,
        }
    }

    /// The fixed string value of a constant reference, if this is one.
    pub fn const_str(self) -> Option<&'static str> {
        match self {
            SymRef::Yes => Some("y"),
            SymRef::Mod => Some("m"),
            SymRef::No => Some("n"),
            SymRef::Empty => Some(""),
            SymRef::Sym(_) => None,
        }
    }
}

/// One node of an expression tree.
///
/// Equality/inequality compare the *string* renderings of two symbols,
/// regardless of declared type; the logical connectives operate on
/// tristate values under the lattice.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    /// The referenced symbol's resolved tristate value.
    Sym(SymRef),
    /// Lattice negation of a subtree.
    Not(ExprId),
    /// Lattice join (max) of two subtrees.
    Or(ExprId, ExprId),
    /// Lattice meet (min) of two subtrees.
    And(ExprId, ExprId),
    /// String equality of two symbols, mapped to yes/no.
    Equal(SymRef, SymRef),
    /// String inequality of two symbols; the logical NOT of `Equal`.
    Unequal(SymRef, SymRef),
}

/// Append-only arena of expression nodes.
#[derive(Debug, Default)]
pub struct ExprArena {
    nodes: Vec<Expr>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, node: Expr) -> ExprId {
        let id = self.nodes.len();
        self.nodes.push(node);
        id
    }

    /// Fetch a node by id. Nodes are `Copy`, so callers get a value and
    /// never hold a borrow across resolution.
    #[inline]
    pub fn node(&self, id: ExprId) -> Expr {
        self.nodes[id]
    }

    pub fn sym(&mut self, s: SymRef) -> ExprId {
        self.push(Expr::Sym(s))
    }

    pub fn not(&mut self, e: ExprId) -> ExprId {
        self.push(Expr::Not(e))
    }

    pub fn or(&mut self, a: ExprId, b: ExprId) -> ExprId {
        self.push(Expr::Or(a, b))
    }

    pub fn and(&mut self, a: ExprId, b: ExprId) -> ExprId {
        self.push(Expr::And(a, b))
    }

    pub fn equal(&mut self, a: SymRef, b: SymRef) -> ExprId {
        self.push(Expr::Equal(a, b))
    }

    pub fn unequal(&mut self, a: SymRef, b: SymRef) -> ExprId {
        self.push(Expr::Unequal(a, b))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
