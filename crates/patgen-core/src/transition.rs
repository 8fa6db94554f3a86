// Edge triple exchanged between the trie, the minimizer and the solver.

use std::fmt;

/// Dense state index. The root / initial state of a trie is 0.
pub type StateId = usize;

/// An automaton edge: `from --symbol--> to`.
///
/// Immutable once constructed; the fields are only reachable through
/// accessors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transition<T> {
    from: StateId,
    to: StateId,
    symbol: T,
}

impl<T> Transition<T> {
    pub fn new(from: StateId, to: StateId, symbol: T) -> Self {
        Self { from, to, symbol }
    }

    /// Source state.
    #[inline]
    pub fn from(&self) -> StateId {
        self.from
    }

    /// Target state.
    #[inline]
    pub fn to(&self) -> StateId {
        self.to
    }

    /// Input symbol.
    #[inline]
    pub fn symbol(&self) -> &T {
        &self.symbol
    }

    /// Split into `(from, to, symbol)`.
    pub fn into_parts(self) -> (StateId, StateId, T) {
        (self.from, self.to, self.symbol)
    }
}

/// Renders as `<from> <symbol> <to>`, the line format of the automaton dump.
impl<T: fmt::Display> fmt::Display for Transition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.from, self.symbol, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let t = Transition::new(3, 5, 'x');
        assert_eq!(t.from(), 3);
        assert_eq!(t.to(), 5);
        assert_eq!(*t.symbol(), 'x');
        assert_eq!(t.into_parts(), (3, 5, 'x'));
    }

    #[test]
    fn display_matches_dump_line() {
        assert_eq!(Transition::new(4, 3, '2').to_string(), "4 2 3");
    }
}
