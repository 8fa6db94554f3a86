//! Property-based tests for the trie and the minimizer
//!
//! Checks that:
//! - every added word is contained in the trie, and nothing else is
//! - two trie states share a block exactly when their residual languages agree
//! - minimizing an already minimal automaton changes nothing

use std::collections::BTreeSet;

use patgen_automata::{AutomatonDump, DfaMinimizer, Trie};
use patgen_core::{CancelFlag, StateId};
use proptest::prelude::*;

fn word() -> impl Strategy<Value = String> {
    "[ab]{0,4}"
}

fn word_set() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(word(), 1..7)
}

/// Every suffix that leads from `state` to an accepting state.
fn residual(trie: &Trie<char>, state: StateId) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    let mut stack = vec![(state, String::new())];
    while let Some((s, suffix)) = stack.pop() {
        let node = &trie.states()[s];
        if node.is_accepting() {
            out.insert(suffix.clone());
        }
        for (&symbol, child) in node.children() {
            let mut next = suffix.clone();
            next.push(symbol);
            stack.push((child, next));
        }
    }
    out
}

proptest! {
    #[test]
    fn trie_contains_exactly_added_words(words in word_set(), candidate in word()) {
        let trie = Trie::from_strs(&words);
        for w in &words {
            prop_assert!(trie.contains_str(w));
        }
        prop_assert_eq!(trie.contains_str(&candidate), words.contains(&candidate));
    }

    #[test]
    fn blocks_are_residual_classes(words in word_set()) {
        let trie = Trie::from_strs(&words);
        let minimizer = DfaMinimizer::minimize(&trie, &CancelFlag::new()).unwrap();

        let residuals: Vec<_> = (0..trie.state_count()).map(|s| residual(&trie, s)).collect();
        for p in 0..trie.state_count() {
            for q in 0..trie.state_count() {
                let same_block = minimizer.block_of(p) == minimizer.block_of(q);
                prop_assert_eq!(same_block, residuals[p] == residuals[q], "states {} and {}", p, q);
            }
        }

        let distinct: BTreeSet<_> = residuals.into_iter().collect();
        prop_assert_eq!(minimizer.automata_info().unwrap().state_count, distinct.len());
    }

    #[test]
    fn minimization_is_idempotent(words in word_set()) {
        let cancel = CancelFlag::new();
        let trie = Trie::from_strs(&words);
        let first = DfaMinimizer::minimize(&trie, &cancel).unwrap();
        let text = first.dump().unwrap().to_string();

        let dump: AutomatonDump<char> = text.parse().unwrap();
        let second = DfaMinimizer::minimize_dump(&dump, &cancel).unwrap();

        let a = first.automata_info().unwrap();
        let b = second.automata_info().unwrap();
        prop_assert_eq!(a.state_count, b.state_count);
        prop_assert_eq!(a.transition_count, b.transition_count);
        prop_assert_eq!(a.accepting_count, b.accepting_count);
    }
}
