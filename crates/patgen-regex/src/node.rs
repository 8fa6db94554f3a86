// Regular expression tree built by the equation solver.

use std::fmt;

use patgen_core::{PatternError, Result, StateId};

/// A regular expression over literal text.
///
/// While an equation system is being solved, a `Literal` may still refer to
/// the state it has to be prefixed with (`origin`). Substituting the solution
/// of that state resolves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexNode {
    Literal {
        value: String,
        origin: Option<StateId>,
        solved: bool,
    },
    Alternation {
        parts: Vec<RegexNode>,
    },
    Conjunction {
        left: Box<RegexNode>,
        right: Box<RegexNode>,
    },
}

impl RegexNode {
    /// A resolved literal.
    pub fn literal(value: impl Into<String>) -> Self {
        RegexNode::Literal {
            value: value.into(),
            origin: None,
            solved: true,
        }
    }

    /// A literal still waiting for the solution of `origin`.
    pub fn pending(value: impl Into<String>, origin: StateId) -> Self {
        RegexNode::Literal {
            value: value.into(),
            origin: Some(origin),
            solved: false,
        }
    }

    /// The empty word.
    pub fn epsilon() -> Self {
        Self::literal("")
    }

    /// A raw two-part concatenation, no merging.
    pub fn conjunction(left: RegexNode, right: RegexNode) -> Self {
        RegexNode::Conjunction {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// A raw alternation, kept as given.
    pub fn alternation(parts: Vec<RegexNode>) -> Self {
        RegexNode::Alternation { parts }
    }

    /// Alternation in normal form.
    ///
    /// Nested alternations are flattened and duplicates removed. Literal
    /// branches come first in lexicographic order, composite branches follow
    /// in their original order. A single remaining branch is returned as is.
    pub fn union(parts: impl IntoIterator<Item = RegexNode>) -> Self {
        let mut literals: Vec<RegexNode> = Vec::new();
        let mut composites: Vec<RegexNode> = Vec::new();

        let mut pending: Vec<RegexNode> = parts.into_iter().collect();
        pending.reverse();
        while let Some(part) = pending.pop() {
            match part {
                RegexNode::Alternation { parts } => pending.extend(parts.into_iter().rev()),
                RegexNode::Literal { .. } => literals.push(part),
                _ => {
                    if !composites.contains(&part) {
                        composites.push(part);
                    }
                }
            }
        }

        literals.sort_by(|a, b| a.literal_text().cmp(&b.literal_text()));
        literals.dedup();
        literals.extend(composites);

        if literals.len() == 1 {
            return literals.pop().unwrap_or_else(Self::epsilon);
        }
        RegexNode::Alternation { parts: literals }
    }

    /// Concatenation that merges adjacent resolved literals and drops
    /// resolved empty ones.
    pub fn concat(left: RegexNode, right: RegexNode) -> Self {
        if left.is_empty_literal() {
            return right;
        }
        if right.is_empty_literal() {
            return left;
        }
        match (left, right) {
            (
                RegexNode::Literal {
                    value: a,
                    solved: true,
                    ..
                },
                RegexNode::Literal {
                    value: b,
                    solved: true,
                    ..
                },
            ) => Self::literal(a + &b),
            (
                RegexNode::Conjunction { left, right: inner },
                RegexNode::Literal {
                    value: b,
                    solved: true,
                    ..
                },
            ) if inner.is_solved_literal() => {
                let a = inner.literal_text().unwrap_or_default();
                Self::conjunction(*left, Self::literal(format!("{a}{b}")))
            }
            (
                RegexNode::Literal {
                    value: a,
                    solved: true,
                    ..
                },
                RegexNode::Conjunction { left: inner, right },
            ) if inner.is_solved_literal() => {
                let b = inner.literal_text().unwrap_or_default();
                Self::conjunction(Self::literal(format!("{a}{b}")), *right)
            }
            (left, right) => Self::conjunction(left, right),
        }
    }

    /// Whether the node no longer depends on an unresolved state.
    pub fn is_solved(&self) -> bool {
        match self {
            RegexNode::Literal { solved, .. } => *solved,
            RegexNode::Alternation { parts } => parts.iter().all(RegexNode::is_solved),
            RegexNode::Conjunction { left, right } => left.is_solved() && right.is_solved(),
        }
    }

    /// Substitute the solution of state `from` into this node.
    ///
    /// Returns whether the node is fully solved afterwards. `replacement`
    /// must itself be solved.
    pub fn substitute(&mut self, from: StateId, replacement: &RegexNode) -> bool {
        match self {
            RegexNode::Literal {
                value,
                origin,
                solved,
            } => {
                if *solved {
                    return true;
                }
                if *origin != Some(from) {
                    return false;
                }
                match replacement {
                    RegexNode::Literal { value: prefix, .. } => {
                        value.insert_str(0, prefix);
                        *origin = None;
                        *solved = true;
                    }
                    _ => {
                        let suffix = Self::literal(std::mem::take(value));
                        *self = Self::concat(replacement.clone(), suffix);
                    }
                }
                true
            }
            RegexNode::Alternation { parts } => {
                let mut all = true;
                for part in parts.iter_mut().filter(|part| !part.is_solved()) {
                    all &= part.substitute(from, replacement);
                }
                all
            }
            RegexNode::Conjunction { left, right } => {
                let left_done = left.substitute(from, replacement);
                let right_done = right.substitute(from, replacement);
                left_done && right_done
            }
        }
    }

    /// Normalize a solved alternation, see [`RegexNode::union`].
    pub fn normalize(self) -> Self {
        match self {
            RegexNode::Alternation { parts } => Self::union(parts),
            other => other,
        }
    }

    /// Text of the literal exposed at the left end of the node.
    pub fn left_literal(&self) -> Option<&str> {
        match self {
            RegexNode::Literal { value, .. } => Some(value),
            RegexNode::Conjunction { left, .. } => left.left_literal(),
            RegexNode::Alternation { .. } => None,
        }
    }

    /// Text of the literal exposed at the right end of the node.
    pub fn right_literal(&self) -> Option<&str> {
        match self {
            RegexNode::Literal { value, .. } => Some(value),
            RegexNode::Conjunction { right, .. } => right.right_literal(),
            RegexNode::Alternation { .. } => None,
        }
    }

    /// Remove `prefix` from the left-exposed literal.
    pub fn strip_prefix(self, prefix: &str) -> Result<Self> {
        match self {
            RegexNode::Literal { value, .. } => match value.strip_prefix(prefix) {
                Some(rest) => Ok(Self::literal(rest)),
                None => Err(PatternError::Logic(format!(
                    "literal `{value}` does not start with `{prefix}`"
                ))),
            },
            RegexNode::Conjunction { left, right } => {
                Ok(Self::concat(left.strip_prefix(prefix)?, *right))
            }
            RegexNode::Alternation { .. } => Err(PatternError::Logic(format!(
                "cannot strip prefix `{prefix}` from an alternation"
            ))),
        }
    }

    /// Remove `suffix` from the right-exposed literal.
    pub fn strip_suffix(self, suffix: &str) -> Result<Self> {
        match self {
            RegexNode::Literal { value, .. } => match value.strip_suffix(suffix) {
                Some(rest) => Ok(Self::literal(rest)),
                None => Err(PatternError::Logic(format!(
                    "literal `{value}` does not end with `{suffix}`"
                ))),
            },
            RegexNode::Conjunction { left, right } => {
                Ok(Self::concat(*left, right.strip_suffix(suffix)?))
            }
            RegexNode::Alternation { .. } => Err(PatternError::Logic(format!(
                "cannot strip suffix `{suffix}` from an alternation"
            ))),
        }
    }

    /// Number of alternation branches (1 for anything else).
    pub fn branch_count(&self) -> usize {
        match self {
            RegexNode::Alternation { parts } => parts.len(),
            _ => 1,
        }
    }

    fn literal_text(&self) -> Option<&str> {
        match self {
            RegexNode::Literal { value, .. } => Some(value),
            _ => None,
        }
    }

    fn is_solved_literal(&self) -> bool {
        matches!(self, RegexNode::Literal { solved: true, .. })
    }

    fn is_empty_literal(&self) -> bool {
        matches!(self, RegexNode::Literal { value, solved: true, .. } if value.is_empty())
    }
}

/// Renders in the `regex` crate dialect.
impl fmt::Display for RegexNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegexNode::Literal { value, .. } => f.write_str(&regex::escape(value)),
            RegexNode::Alternation { parts } => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "{part}")?;
                }
                Ok(())
            }
            RegexNode::Conjunction { left, right } => {
                for side in [left, right] {
                    if side.branch_count() > 1 {
                        write!(f, "({side})")?;
                    } else {
                        write!(f, "{side}")?;
                    }
                }
                Ok(())
            }
        }
    }
}
