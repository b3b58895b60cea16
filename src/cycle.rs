//! Dependency cycle detection.
//!
//! A diagnostic depth-first walk over every expression a symbol's
//! resolution can read: its reverse-dependency expression, each property's
//! enabling condition, and each default's value expression (except on
//! choice anchors, whose defaults name members and are structurally
//! exempt, as is choice membership itself; neither can force resolution
//! recursion on its own).
//!
//! The walk mutates only the per-symbol check state, never values. A
//! symbol revisited while still mid-walk closes a cycle; a symbol walked
//! once is never walked again, independent of the value-validity epoch.
//! Cycles are a configuration-authoring bug, reported and survivable:
//! resolution itself terminates on them via its placeholder values.

use indexmap::IndexSet;
use log::warn;

use crate::expr::{Expr, SymRef};
use crate::id::{ExprId, SymbolId};
use crate::symbol::{CheckState, PropertyKind};
use crate::table::ConfigTable;

impl ConfigTable {
    /// Check one symbol's transitive dependencies. Returns the symbol at
    /// which a cycle closes, or None. Results are memoized: a symbol
    /// already checked (by this or any earlier call) reports nothing.
    pub fn check_deps(&mut self, id: SymbolId) -> Option<SymbolId> {
        let mut stack = IndexSet::new();
        self.check_sym(id, &mut stack)
    }

    /// Pre-flight pass over the whole table, as run after parsing a fresh
    /// configuration: returns every symbol at which some cycle closes.
    pub fn check_all(&mut self) -> Vec<SymbolId> {
        let mut found = Vec::new();
        for id in self.ids() {
            let mut stack = IndexSet::new();
            if let Some(culprit) = self.check_sym(id, &mut stack) {
                found.push(culprit);
            }
        }
        found
    }

    fn check_sym(&mut self, id: SymbolId, stack: &mut IndexSet<SymbolId>) -> Option<SymbolId> {
        match self.symbols[id].check {
            CheckState::Checked => return None,
            CheckState::Checking => {
                let pos = stack.get_index_of(&id).unwrap_or(0);
                let chain: Vec<&str> = stack
                    .iter()
                    .skip(pos)
                    .chain(std::iter::once(&id))
                    .map(|&s| self.symbols[s].display_name())
                    .collect();
                warn!("recursive dependency detected: {}", chain.join(" -> "));
                return Some(id);
            }
            CheckState::Unchecked => {}
        }

        self.symbols[id].check = CheckState::Checking;
        stack.insert(id);

        let mut found = self.check_expr_opt(self.symbols[id].rev_dep, stack);

        if found.is_none() {
            let is_choice = self.symbols[id].is_choice();
            for i in 0..self.symbols[id].props.len() {
                let cond = self.symbols[id].props[i].cond;
                found = self.check_expr_opt(cond, stack);
                if found.is_some() {
                    break;
                }
                let value = match self.symbols[id].props[i].kind {
                    PropertyKind::Default { value } if !is_choice => value,
                    _ => continue,
                };
                found = self.check_expr(value, stack);
                if found.is_some() {
                    break;
                }
            }
        }

        stack.pop();
        self.symbols[id].check = CheckState::Checked;
        found
    }

    fn check_expr_opt(
        &mut self,
        e: Option<ExprId>,
        stack: &mut IndexSet<SymbolId>,
    ) -> Option<SymbolId> {
        e.and_then(|eid| self.check_expr(eid, stack))
    }

    fn check_expr(&mut self, e: ExprId, stack: &mut IndexSet<SymbolId>) -> Option<SymbolId> {
        match self.expr(e) {
            Expr::Sym(r) => self.check_ref(r, stack),
            Expr::Not(a) => self.check_expr(a, stack),
            Expr::Or(a, b) | Expr::And(a, b) => self
                .check_expr(a, stack)
                .or_else(|| self.check_expr(b, stack)),
            Expr::Equal(a, b) | Expr::Unequal(a, b) => self
                .check_ref(a, stack)
                .or_else(|| self.check_ref(b, stack)),
        }
    }

    fn check_ref(&mut self, r: SymRef, stack: &mut IndexSet<SymbolId>) -> Option<SymbolId> {
        match r {
            SymRef::Sym(id) => self.check_sym(id, stack),
            _ => None,
        }
    }
}
