//! The tristate lattice: three-valued logic with `no < mod < yes`.
//!
//! Every visibility and dependency computation in the resolver is built
//! from exactly three operations on this lattice:
//!
//! - `or`  = max under the order
//! - `and` = min under the order
//! - `not` swaps yes/no and fixes mod
//!
//! No other arithmetic on tristate values is permitted anywhere in the
//! crate; the lattice is the whole algebra.

use std::fmt;

/// A three-valued configuration state, totally ordered `No < Mod < Yes`.
///
/// `Mod` is the "enabled as a loadable module" middle state: weaker than
/// fully built-in (`Yes`), stronger than absent (`No`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tristate {
    No,
    Mod,
    Yes,
}

impl Tristate {
    /// Lattice join: the stronger of the two values.
    #[inline]
    pub fn or(self, other: Tristate) -> Tristate {
        self.max(other)
    }

    /// Lattice meet: the weaker of the two values.
    #[inline]
    pub fn and(self, other: Tristate) -> Tristate {
        self.min(other)
    }

    /// Negation: swaps `Yes` and `No`, leaves `Mod` fixed.
    #[inline]
    pub fn not(self) -> Tristate {
        match self {
            Tristate::No => Tristate::Yes,
            Tristate::Mod => Tristate::Mod,
            Tristate::Yes => Tristate::No,
        }
    }

    /// Map a boolean comparison result into the lattice.
    #[inline]
    pub fn from_bool(b: bool) -> Tristate {
        if b {
            Tristate::Yes
        } else {
            Tristate::No
        }
    }

    /// Parse the leading character of user input (`y`/`m`/`n`, either
    /// case). Trailing characters are deliberately ignored, matching the
    /// accepted input format for boolean/tristate prompts.
    pub fn from_input(s: &str) -> Option<Tristate> {
        match s.as_bytes().first() {
            Some(b'y') | Some(b'Y') => Some(Tristate::Yes),
            Some(b'm') | Some(b'M') => Some(Tristate::Mod),
            Some(b'n') | Some(b'N') => Some(Tristate::No),
            _ => None,
        }
    }

    /// The canonical one-character rendering (`"n"`, `"m"`, `"y"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Tristate::No => "n",
            Tristate::Mod => "m",
            Tristate::Yes => "y",
        }
    }
}

impl fmt::Display for Tristate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Tristate::*;

    const ALL: [Tristate; 3] = [No, Mod, Yes];

    #[test]
    fn test_or_is_max() {
        assert_eq!(No.or(Mod), Mod);
        assert_eq!(Mod.or(Yes), Yes);
        assert_eq!(No.or(No), No);
    }

    #[test]
    fn test_and_is_min() {
        assert_eq!(Yes.and(Mod), Mod);
        assert_eq!(Mod.and(No), No);
        assert_eq!(Yes.and(Yes), Yes);
    }

    #[test]
    fn test_not_involution() {
        for t in ALL {
            assert_eq!(t.not().not(), t);
        }
    }

    #[test]
    fn test_de_morgan_exhaustive() {
        for a in ALL {
            for b in ALL {
                assert_eq!(a.or(b).not(), a.not().and(b.not()));
                assert_eq!(a.and(b).not(), a.not().or(b.not()));
            }
        }
    }

    #[test]
    fn test_from_input() {
        assert_eq!(Tristate::from_input("yes please"), Some(Yes));
        assert_eq!(Tristate::from_input("M"), Some(Mod));
        assert_eq!(Tristate::from_input("nope"), Some(No));
        assert_eq!(Tristate::from_input(""), None);
        assert_eq!(Tristate::from_input("x"), None);
    }
}
