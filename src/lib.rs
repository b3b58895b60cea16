//! symconf: a symbolic configuration evaluator
//!
//! Given a table of named configuration symbols (boolean, tristate, int,
//! hex, string), boolean expressions relating them, and user-supplied
//! overrides, symconf computes a consistent, memoized value for every
//! symbol, respecting visibility conditions, reverse dependencies, and
//! mutually exclusive choice groups, and recomputes incrementally as the
//! user edits values.
//!
//! The engine is deliberately small and single-threaded:
//!
//! - Values live on a three-point lattice `no < mod < yes` (`tristate`).
//! - Expressions are immutable arena-allocated trees (`expr`).
//! - All state hangs off one explicit [`ConfigTable`] context (`table`);
//!   there are no process-wide statics.
//! - Resolution is lazy and memoized, invalidated table-wide whenever any
//!   override actually changes (`resolve`).
//! - User edits go through a validated mutation surface (`edit`).
//! - Recursive dependency chains are a reportable authoring bug, not a
//!   crash (`cycle`).
//!
//! A grammar/parser that builds the symbol table, and a front end that
//! renders prompts and persists results, are external collaborators: the
//! declaration API on [`ConfigTable`] is their interface.

pub mod cycle;
pub mod edit;
pub mod expr;
pub mod id;
pub mod resolve;
pub mod symbol;
pub mod table;
pub mod tristate;

pub use expr::{Expr, ExprArena, SymRef};
pub use id::{ExprId, OptSym, SymbolId};
pub use symbol::{CheckState, Property, PropertyKind, Symbol, SymbolType, ValueState};
pub use table::{ConfigTable, TableError};
pub use tristate::Tristate;
