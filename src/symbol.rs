//! Symbol records and their declared properties.
//!
//! A `Symbol` is one named configuration variable: its declared type, its
//! append-ordered property list, its user override (if any), and the
//! memoized results of the last resolution pass (current value, visibility,
//! reverse-dependency floor). Symbols are created by table lookup, live in
//! the table arena for the life of the process, and are never destroyed.
//!
//! Nothing in this module computes anything; the resolver (`resolve`) and
//! the mutation surface (`edit`) do, through the owning `ConfigTable`.

use crate::id::{ExprId, OptSym, SymbolId};
use crate::expr::SymRef;
use crate::tristate::Tristate;

/// Declared type of a symbol.
///
/// `Unknown` is the state between first lookup and the declaration
/// collaborator attaching a type; const literal symbols (quoted strings,
/// numbers) stay `Unknown` forever and resolve to their own name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SymbolType {
    Unknown,
    Boolean,
    Tristate,
    Int,
    Hex,
    String,
}

impl SymbolType {
    /// Display name for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            SymbolType::Boolean => "boolean",
            SymbolType::Tristate => "tristate",
            SymbolType::Int => "integer",
            SymbolType::Hex => "hex",
            SymbolType::String => "string",
            SymbolType::Unknown => "unknown",
        }
    }

    /// Whether values of this type are tristate-valued (as opposed to
    /// carrying a string payload).
    pub fn is_logic(self) -> bool {
        matches!(self, SymbolType::Boolean | SymbolType::Tristate)
    }
}

/// Memoization state of a symbol's current value.
///
/// `Resolving` is observable only from a reentrant read during the
/// symbol's own resolution; such a read sees the neutral placeholder value
/// installed at the start of the pass. The whole table drops back to
/// `Stale` whenever any user override actually changes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueState {
    Stale,
    Resolving,
    Resolved,
}

/// Cycle-checker bookkeeping, independent of the value-validity epoch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CheckState {
    /// Never visited.
    Unchecked,
    /// On the current depth-first walk; revisiting closes a cycle.
    Checking,
    /// Fully walked once; never walked again.
    Checked,
}

/// One declared fact attached to a symbol, in declaration order.
#[derive(Clone, Debug)]
pub struct Property {
    pub kind: PropertyKind,
    /// Enabling condition; absent means unconditionally enabled (`yes`).
    pub cond: Option<ExprId>,
}

/// The kinds of declared property.
#[derive(Clone, Debug)]
pub enum PropertyKind {
    /// A user-visible prompt; its condition drives visibility.
    Prompt { text: String },
    /// A menu grouping marker; prompt-like for visibility purposes.
    Menu { text: String },
    /// A comment marker; prompt-like for visibility purposes.
    Comment { text: String },
    /// A default value expression, consulted when no override applies.
    Default { value: ExprId },
    /// Numeric bounds for int/hex symbols; the endpoints are (typically
    /// const literal) symbols whose names parse in the symbol's base.
    Range { min: SymRef, max: SymRef },
}

impl PropertyKind {
    /// Display name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            PropertyKind::Prompt { .. } => "prompt",
            PropertyKind::Menu { .. } => "menu",
            PropertyKind::Comment { .. } => "comment",
            PropertyKind::Default { .. } => "default",
            PropertyKind::Range { .. } => "range",
        }
    }

    /// Prompt-like properties carry display text and participate in the
    /// visibility OR.
    pub fn prompt_text(&self) -> Option<&str> {
        match self {
            PropertyKind::Prompt { text }
            | PropertyKind::Menu { text }
            | PropertyKind::Comment { text } => Some(text),
            _ => None,
        }
    }
}

/// A named configuration variable and its memoized resolution results.
///
/// Fields are grouped as: identity, declarations (written by the parser
/// collaborator), user state (written by `edit`), and memoized results
/// (written only by the resolver).
#[derive(Debug)]
pub struct Symbol {
    /// Unique name, or None for anonymous internal choice symbols.
    pub name: Option<String>,
    /// Declared type; `Unknown` until the declaration collaborator says.
    pub sym_type: SymbolType,

    /// Append-ordered declared properties.
    pub props: Vec<Property>,
    /// Accumulated reverse-dependency (select-style) expression.
    pub rev_dep: Option<ExprId>,
    /// Owning choice symbol, if this symbol is a choice member.
    pub choice: OptSym,
    /// Members in declaration order, if this symbol anchors a choice.
    pub members: Vec<SymbolId>,

    /// User override for boolean/tristate symbols.
    pub user_tri: Option<Tristate>,
    /// User override for int/hex/string symbols.
    pub user_text: Option<String>,
    /// User-picked member, on choice anchors.
    pub user_choice: OptSym,

    /// Resolved tristate value.
    pub curr_tri: Tristate,
    /// Resolved string payload for int/hex/string/unknown symbols.
    pub curr_text: Option<String>,
    /// Active member of this pass, on choice anchors.
    pub active_member: OptSym,
    /// Computed prompt visibility.
    pub visible: Tristate,
    /// Computed reverse-dependency floor.
    pub rev_dep_tri: Tristate,

    /// Memoization state of `curr_*`.
    pub state: ValueState,
    /// Cycle-checker state.
    pub check: CheckState,

    /// Freshly created, no value seen by the user yet.
    pub new: bool,
    /// Value transitioned since the last time a consumer cleared it.
    pub changed: bool,
    /// Resolved value would need persisting by a config writer.
    pub write: bool,
    /// Machine-provided (e.g. environment-seeded), not user-visible state.
    pub auto: bool,
    /// Const literal partition of the name index.
    pub is_const: bool,
}

impl Symbol {
    /// A fresh, untyped symbol as created by table lookup.
    pub fn new(name: Option<String>, is_const: bool) -> Self {
        Symbol {
            name,
            sym_type: SymbolType::Unknown,
            props: Vec::new(),
            rev_dep: None,
            choice: None,
            members: Vec::new(),
            user_tri: None,
            user_text: None,
            user_choice: None,
            curr_tri: Tristate::No,
            curr_text: None,
            active_member: None,
            visible: Tristate::No,
            rev_dep_tri: Tristate::No,
            state: ValueState::Stale,
            check: CheckState::Unchecked,
            new: true,
            changed: false,
            write: false,
            auto: false,
            is_const,
        }
    }

    /// Name for diagnostics; anonymous symbols render as `<choice>`.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<choice>")
    }

    /// Whether this symbol is a member of a choice group.
    pub fn is_choice_member(&self) -> bool {
        self.choice.is_some()
    }

    /// Whether this symbol anchors a choice group.
    pub fn is_choice(&self) -> bool {
        !self.members.is_empty()
    }

    /// Whether the user has supplied an override appropriate to the
    /// declared type.
    pub fn has_user_value(&self) -> bool {
        if self.sym_type.is_logic() {
            self.user_tri.is_some()
        } else {
            self.user_text.is_some()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_names() {
        assert_eq!(SymbolType::Boolean.name(), "boolean");
        assert_eq!(SymbolType::Int.name(), "integer");
        assert_eq!(SymbolType::Unknown.name(), "unknown");
        let kinds = [
            PropertyKind::Prompt { text: String::new() }.name(),
            PropertyKind::Menu { text: String::new() }.name(),
            PropertyKind::Comment { text: String::new() }.name(),
            PropertyKind::Default { value: 0 }.name(),
            PropertyKind::Range { min: SymRef::Empty, max: SymRef::Empty }.name(),
        ];
        assert_eq!(kinds, ["prompt", "menu", "comment", "default", "range"]);
    }

    #[test]
    fn test_has_user_value_respects_type() {
        let mut s = Symbol::new(Some("A".to_string()), false);
        s.sym_type = SymbolType::Tristate;
        assert!(!s.has_user_value());
        // a stray text override does not count for a logic symbol
        s.user_text = Some("ignored".to_string());
        assert!(!s.has_user_value());
        s.user_tri = Some(Tristate::Yes);
        assert!(s.has_user_value());
    }
}
