//! Lazy value and visibility resolution.
//!
//! Resolution is a memoized, recursive pass over the dependency graph.
//! Reading any symbol's value forces its resolution; resolving a symbol
//! evaluates its prompt conditions, defaults, and reverse dependencies,
//! which reads (and therefore resolves) the symbols those expressions
//! mention. Memoization is a per-symbol state tag, dropped table-wide by
//! `ConfigTable::clear_all_valid` whenever any override actually changes.
//!
//! A symbol being resolved is tagged `Resolving`; a reentrant read during
//! that window (a symbol whose expressions reach back into itself) sees
//! the neutral placeholder installed at the start of the pass instead of
//! recursing forever. The cycle checker reports such graphs; the resolver
//! just terminates on them.

use log::debug;

use crate::expr::{Expr, SymRef};
use crate::id::{get_sym, some_sym, ExprId, SymbolId};
use crate::symbol::{PropertyKind, SymbolType, ValueState};
use crate::table::ConfigTable;
use crate::tristate::Tristate;

impl ConfigTable {
    /// Evaluate an optional condition/value expression to a tristate.
    /// An absent expression is an unconditional `yes`, never `no`: optional
    /// visibility and default conditions default to enabled.
    pub fn eval(&mut self, e: Option<ExprId>) -> Tristate {
        let Some(eid) = e else {
            return Tristate::Yes;
        };
        match self.expr(eid) {
            Expr::Sym(r) => self.tristate_of(r),
            Expr::Not(a) => self.eval(Some(a)).not(),
            Expr::Or(a, b) => {
                let l = self.eval(Some(a));
                let r = self.eval(Some(b));
                l.or(r)
            }
            Expr::And(a, b) => {
                let l = self.eval(Some(a));
                let r = self.eval(Some(b));
                l.and(r)
            }
            // comparisons are over string renderings, whatever the types
            Expr::Equal(a, b) => Tristate::from_bool(self.str_of(a) == self.str_of(b)),
            Expr::Unequal(a, b) => Tristate::from_bool(self.str_of(a) != self.str_of(b)),
        }
    }

    /// The resolved tristate of a symbol reference, forcing resolution.
    pub fn tristate_of(&mut self, r: SymRef) -> Tristate {
        match r {
            SymRef::Sym(id) => self.tristate_value(id),
            SymRef::Yes => Tristate::Yes,
            SymRef::Mod => Tristate::Mod,
            SymRef::No | SymRef::Empty => Tristate::No,
        }
    }

    /// The resolved string rendering of a symbol reference.
    pub fn str_of(&mut self, r: SymRef) -> String {
        match r {
            SymRef::Sym(id) => self.string_value(id),
            SymRef::Yes => "y".to_string(),
            SymRef::Mod => "m".to_string(),
            SymRef::No => "n".to_string(),
            SymRef::Empty => String::new(),
        }
    }

    /// Effective type: tristate degrades to boolean when the symbol is a
    /// fully visible choice member, or table-wide while module support is
    /// off.
    pub fn effective_type(&self, id: SymbolId) -> SymbolType {
        let sym = &self.symbols[id];
        if sym.sym_type == SymbolType::Tristate {
            if sym.is_choice_member() && sym.visible == Tristate::Yes {
                return SymbolType::Boolean;
            }
            if self.modules_val == Tristate::No {
                return SymbolType::Boolean;
            }
        }
        sym.sym_type
    }

    /// First default property whose condition is currently visible,
    /// in declaration order; yields its value expression.
    pub(crate) fn default_prop_value(&mut self, id: SymbolId) -> Option<ExprId> {
        for i in 0..self.symbols[id].props.len() {
            let (value, cond) = match self.symbols[id].props[i].kind {
                PropertyKind::Default { value } => (value, self.symbols[id].props[i].cond),
                _ => continue,
            };
            if self.eval(cond) != Tristate::No {
                return Some(value);
            }
        }
        None
    }

    /// First range property whose condition is currently visible.
    pub(crate) fn range_prop(&mut self, id: SymbolId) -> Option<(SymRef, SymRef)> {
        for i in 0..self.symbols[id].props.len() {
            let (min, max) = match self.symbols[id].props[i].kind {
                PropertyKind::Range { min, max } => (min, max),
                _ => continue,
            };
            let cond = self.symbols[id].props[i].cond;
            if self.eval(cond) != Tristate::No {
                return Some((min, max));
            }
        }
        None
    }

    /// Recompute visibility (the OR over all prompt-like conditions) and,
    /// for non-members, the reverse-dependency floor. Flags the symbol
    /// changed on any transition. For choice members the floor is never
    /// computed; the owning choice drives their value.
    pub(crate) fn calc_visibility(&mut self, id: SymbolId) {
        let mut tri = Tristate::No;
        for i in 0..self.symbols[id].props.len() {
            let prop = &self.symbols[id].props[i];
            if prop.kind.prompt_text().is_none() {
                continue;
            }
            let cond = prop.cond;
            tri = tri.or(self.eval(cond));
        }
        // a mod-strength prompt on a type that cannot show mod becomes yes
        if tri == Tristate::Mod
            && (self.symbols[id].sym_type != SymbolType::Tristate
                || self.modules_val == Tristate::No)
        {
            tri = Tristate::Yes;
        }
        if self.symbols[id].visible != tri {
            self.symbols[id].visible = tri;
            self.set_changed(id);
        }

        if self.symbols[id].is_choice_member() {
            return;
        }

        let mut tri = Tristate::No;
        if let Some(e) = self.symbols[id].rev_dep {
            tri = self.eval(Some(e));
        }
        if tri == Tristate::Mod && self.effective_type(id) == SymbolType::Boolean {
            tri = Tristate::Yes;
        }
        if self.symbols[id].rev_dep_tri != tri {
            self.symbols[id].rev_dep_tri = tri;
            self.set_changed(id);
        }
    }

    /// Pick the active member of a choice group: the user's pick if still
    /// visible, else the first visible declared default, else the first
    /// member that is visible when probed in declaration order, else none
    /// (the group collapses).
    fn calc_choice(&mut self, id: SymbolId) -> Option<SymbolId> {
        if let Some(pick) = get_sym(self.symbols[id].user_choice) {
            self.calc_visibility(pick);
            if self.symbols[pick].visible != Tristate::No {
                return Some(pick);
            }
        }

        for i in 0..self.symbols[id].props.len() {
            let value = match self.symbols[id].props[i].kind {
                PropertyKind::Default { value } => value,
                _ => continue,
            };
            let cond = self.symbols[id].props[i].cond;
            if self.eval(cond) == Tristate::No {
                continue;
            }
            if let Expr::Sym(SymRef::Sym(target)) = self.expr(value) {
                self.calc_visibility(target);
                if self.symbols[target].visible != Tristate::No {
                    return Some(target);
                }
            }
        }

        let members = self.symbols[id].members.clone();
        for m in members {
            self.calc_visibility(m);
            if self.symbols[m].visible != Tristate::No {
                return Some(m);
            }
        }
        None
    }

    /// Resolve a symbol's current value. No-op when already resolved; a
    /// reentrant call during this symbol's own resolution reads the
    /// neutral placeholder and returns.
    pub fn resolve(&mut self, id: SymbolId) {
        match self.symbols[id].state {
            ValueState::Resolved => return,
            ValueState::Resolving => {
                debug!(
                    "reentrant resolution of {}: reading placeholder value",
                    self.symbols[id].display_name()
                );
                return;
            }
            ValueState::Stale => {}
        }
        self.symbols[id].state = ValueState::Resolving;

        let old = {
            let sym = &self.symbols[id];
            (sym.curr_tri, sym.curr_text.clone(), sym.active_member)
        };

        // untyped symbols are their own value: the name is the payload
        if self.symbols[id].sym_type == SymbolType::Unknown {
            let name = self.symbols[id].name.clone().unwrap_or_default();
            let sym = &mut self.symbols[id];
            sym.curr_tri = Tristate::No;
            sym.curr_text = Some(name);
            sym.active_member = None;
            sym.state = ValueState::Resolved;
            return;
        }

        let is_logic = self.symbols[id].sym_type.is_logic();
        if !self.symbols[id].is_choice_member() {
            self.symbols[id].write = false;
        }

        self.calc_visibility(id);

        // neutral placeholder, observable by reentrant reads
        {
            let sym = &mut self.symbols[id];
            sym.curr_tri = Tristate::No;
            sym.curr_text = if is_logic { None } else { Some(String::new()) };
            sym.active_member = None;
        }

        let mut new_tri = Tristate::No;
        let mut new_text: Option<String> = if is_logic { None } else { Some(String::new()) };

        match self.effective_type(id) {
            SymbolType::Boolean | SymbolType::Tristate => {
                let visible = self.symbols[id].visible;
                let floor = self.symbols[id].rev_dep_tri;
                if self.symbols[id].is_choice_member() && visible == Tristate::Yes {
                    // the owning choice decides; mirror its (fresh) pick
                    let mut active = None;
                    if let Some(owner) = get_sym(self.symbols[id].choice) {
                        self.resolve(owner);
                        active = get_sym(self.symbols[owner].active_member);
                    }
                    new_tri = Tristate::from_bool(active == Some(id));
                } else if visible.or(floor) != Tristate::No {
                    self.symbols[id].write = true;
                    if let Some(user) = self.symbols[id].user_tri {
                        new_tri = user;
                    } else if !self.symbols[id].is_choice() {
                        if let Some(value) = self.default_prop_value(id) {
                            new_tri = self.eval(Some(value));
                        }
                    }
                    let visible = self.symbols[id].visible;
                    let floor = self.symbols[id].rev_dep_tri;
                    new_tri = new_tri.and(visible).or(floor);
                } else if !self.symbols[id].is_choice() {
                    // invisible symbols still follow their defaults
                    if let Some(value) = self.default_prop_value(id) {
                        self.symbols[id].write = true;
                        new_tri = self.eval(Some(value));
                    }
                }
                if new_tri == Tristate::Mod && self.effective_type(id) == SymbolType::Boolean {
                    new_tri = Tristate::Yes;
                }
            }
            SymbolType::Int | SymbolType::Hex | SymbolType::String => {
                let mut took_user = false;
                if self.symbols[id].visible != Tristate::No {
                    self.symbols[id].write = true;
                    if self.symbols[id].has_user_value() {
                        new_text = self.symbols[id].user_text.clone();
                        took_user = true;
                    }
                }
                if !took_user {
                    if let Some(value) = self.default_prop_value(id) {
                        if let Expr::Sym(target) = self.expr(value) {
                            self.symbols[id].write = true;
                            new_text = Some(self.str_of(target));
                        }
                    }
                }
            }
            SymbolType::Unknown => {}
        }

        {
            let sym = &mut self.symbols[id];
            sym.curr_tri = new_tri;
            sym.curr_text = new_text;
        }

        if self.symbols[id].is_choice() && new_tri == Tristate::Yes {
            match self.calc_choice(id) {
                Some(m) => self.symbols[id].active_member = some_sym(m),
                None => {
                    // malformed choice: no visible member, group collapses
                    self.symbols[id].active_member = None;
                    self.symbols[id].curr_tri = Tristate::No;
                }
            }
        }

        self.symbols[id].state = ValueState::Resolved;

        let new = {
            let sym = &self.symbols[id];
            (sym.curr_tri, sym.curr_text.clone(), sym.active_member)
        };
        if old != new {
            self.set_changed(id);
        }

        if get_sym(self.modules_sym) == Some(id) {
            self.modules_val = self.symbols[id].curr_tri;
        }

        if self.symbols[id].is_choice() {
            // members inherit the anchor's changed/write status
            let changed = self.symbols[id].changed;
            let write = self.symbols[id].write;
            let members = self.symbols[id].members.clone();
            for m in members {
                self.symbols[m].write |= write;
                if changed {
                    self.set_changed(m);
                }
            }
        }
    }

    /// Resolve and read a symbol's tristate value.
    pub fn tristate_value(&mut self, id: SymbolId) -> Tristate {
        self.resolve(id);
        self.symbols[id].curr_tri
    }

    /// Resolve and read a symbol's string rendering: `n`/`m`/`y` for
    /// boolean/tristate symbols, the string payload otherwise.
    pub fn string_value(&mut self, id: SymbolId) -> String {
        self.resolve(id);
        let sym = &self.symbols[id];
        if sym.sym_type.is_logic() {
            sym.curr_tri.as_str().to_string()
        } else {
            sym.curr_text.clone().unwrap_or_default()
        }
    }

    /// Resolve a choice anchor and read its active member, if any.
    pub fn choice_value(&mut self, id: SymbolId) -> Option<SymbolId> {
        self.resolve(id);
        get_sym(self.symbols[id].active_member)
    }
}
