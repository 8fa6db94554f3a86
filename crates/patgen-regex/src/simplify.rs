// Factoring of shared literal runs out of an alternation.

use std::collections::BTreeMap;

use patgen_automata::Trie;
use patgen_core::{CancelFlag, Result};
use tracing::trace;

use crate::node::RegexNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Rewrites an alternation into an equivalent, more compact node.
///
/// Three strategies are tried in order and the first that applies wins:
///
/// - factor a common prefix out of the largest group of branches sharing
///   their first symbol
/// - factor the longest substring common to all literal branches (when
///   `factor_interior` is set; this may widen the language)
/// - factor a common suffix, symmetric to the prefix case
///
/// The result is simplified again until nothing applies. Alternations nested
/// inside the input's conjunctions are left alone.
#[derive(Debug, Clone, Copy)]
pub struct Simplifier {
    factor_interior: bool,
}

impl Default for Simplifier {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Simplifier {
    pub fn new(factor_interior: bool) -> Self {
        Self { factor_interior }
    }

    pub fn simplify(&self, node: RegexNode, cancel: &CancelFlag) -> Result<RegexNode> {
        let branches = match node {
            RegexNode::Alternation { parts } => parts,
            other => return Ok(other),
        };

        let mut parts: Vec<RegexNode> = Vec::with_capacity(branches.len());
        for part in node_parts(branches) {
            if !parts.contains(&part) {
                parts.push(part);
            }
        }

        // Every successful step replaces at least two branches by one.
        loop {
            cancel.check()?;
            if parts.len() < 2 {
                break;
            }

            let reduced = match self.reduce_side(&parts, Side::Left, cancel)? {
                Some(reduced) => Some(reduced),
                None => match self.reduce_middle(&parts, cancel)? {
                    Some(reduced) => Some(reduced),
                    None => self.reduce_side(&parts, Side::Right, cancel)?,
                },
            };
            match reduced {
                Some(reduced) => parts = reduced,
                None => break,
            }
        }
        Ok(RegexNode::union(parts))
    }

    /// Factor the common prefix (or suffix) of the largest group of branches
    /// that expose a literal starting (or ending) with the same symbol.
    fn reduce_side(
        &self,
        parts: &[RegexNode],
        side: Side,
        cancel: &CancelFlag,
    ) -> Result<Option<Vec<RegexNode>>> {
        let mut groups: BTreeMap<char, Vec<usize>> = BTreeMap::new();
        for (i, part) in parts.iter().enumerate() {
            let symbol = match side {
                Side::Left => part.left_literal().and_then(|text| text.chars().next()),
                Side::Right => part.right_literal().and_then(|text| text.chars().next_back()),
            };
            if let Some(symbol) = symbol {
                groups.entry(symbol).or_default().push(i);
            }
        }

        // Largest group wins, ties go to the smallest symbol.
        let mut best: Option<&Vec<usize>> = None;
        for members in groups.values() {
            if members.len() >= 2 && best.is_none_or(|b| members.len() > b.len()) {
                best = Some(members);
            }
        }
        let Some(members) = best else {
            return Ok(None);
        };

        let texts: Vec<String> = members
            .iter()
            .filter_map(|&i| match side {
                Side::Left => parts[i].left_literal().map(str::to_string),
                Side::Right => parts[i].right_literal().map(|t| t.chars().rev().collect()),
            })
            .collect();
        let common = Trie::find_common_prefix_of(&texts);
        let common: String = match side {
            Side::Left => common,
            Side::Right => common.chars().rev().collect(),
        };
        trace!(?side, common = %common, branches = members.len(), "factoring literal");

        let mut stripped = Vec::with_capacity(members.len());
        for &i in members {
            let part = parts[i].clone();
            stripped.push(match side {
                Side::Left => part.strip_prefix(&common)?,
                Side::Right => part.strip_suffix(&common)?,
            });
        }
        let inner = self.simplify(RegexNode::alternation(stripped), cancel)?;
        let factored = match side {
            Side::Left => RegexNode::concat(RegexNode::literal(common), inner),
            Side::Right => RegexNode::concat(inner, RegexNode::literal(common)),
        };

        let mut reduced = vec![factored];
        reduced.extend(
            parts
                .iter()
                .enumerate()
                .filter(|(i, _)| !members.contains(i))
                .map(|(_, part)| part.clone()),
        );
        Ok(Some(reduced))
    }

    /// Split the literal branches around their longest common substring.
    fn reduce_middle(
        &self,
        parts: &[RegexNode],
        cancel: &CancelFlag,
    ) -> Result<Option<Vec<RegexNode>>> {
        if !self.factor_interior {
            return Ok(None);
        }

        let literals: Vec<&str> = parts
            .iter()
            .filter_map(|part| match part {
                RegexNode::Literal { value, .. } => Some(value.as_str()),
                _ => None,
            })
            .collect();
        if literals.len() < 2 {
            return Ok(None);
        }
        let root = find_root(&literals);
        if root.is_empty() {
            return Ok(None);
        }
        trace!(root = %root, branches = literals.len(), "factoring interior literal");

        let mut before = Vec::with_capacity(literals.len());
        let mut after = Vec::with_capacity(literals.len());
        for text in &literals {
            if let Some((head, tail)) = text.split_once(root.as_str()) {
                before.push(RegexNode::literal(head));
                after.push(RegexNode::literal(tail));
            }
        }
        let before = self.simplify(RegexNode::union(before), cancel)?;
        let after = self.simplify(RegexNode::union(after), cancel)?;
        let factored = RegexNode::concat(
            before,
            RegexNode::concat(RegexNode::literal(root), after),
        );

        let mut reduced = vec![factored];
        reduced.extend(
            parts
                .iter()
                .filter(|part| !matches!(part, RegexNode::Literal { .. }))
                .cloned(),
        );
        Ok(Some(reduced))
    }
}

fn node_parts(parts: Vec<RegexNode>) -> Vec<RegexNode> {
    let mut flat = Vec::with_capacity(parts.len());
    for part in parts {
        match part {
            RegexNode::Alternation { parts } => flat.extend(node_parts(parts)),
            other => flat.push(other),
        }
    }
    flat
}

/// Longest substring contained in every one of `strings`.
///
/// Candidates are taken from the first string, longest first, then by
/// starting position. Brute force, O(n·L²) substring tests.
pub fn find_root(strings: &[&str]) -> String {
    let Some(first) = strings.first() else {
        return String::new();
    };
    let bounds: Vec<usize> = first
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(first.len()))
        .collect();
    let chars = bounds.len() - 1;

    for len in (1..=chars).rev() {
        for start in 0..=chars - len {
            let candidate = &first[bounds[start]..bounds[start + len]];
            if strings[1..].iter().all(|s| s.contains(candidate)) {
                return candidate.to_string();
            }
        }
    }
    String::new()
}
