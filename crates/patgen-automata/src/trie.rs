// Deterministic prefix tree over the sample words.

use std::hash::Hash;

use hashbrown::HashSet;
use patgen_core::{StateId, Transition};

/// One node of the prefix tree.
///
/// Children are kept in insertion order. The order is what makes the
/// transition sequence, and therefore the minimized automaton dump,
/// reproducible from run to run.
#[derive(Debug, Clone)]
pub struct TrieState<T> {
    id: StateId,
    children: Vec<(T, StateId)>,
    accepting: bool,
}

impl<T: Eq> TrieState<T> {
    fn new(id: StateId) -> Self {
        Self {
            id,
            children: Vec::new(),
            accepting: false,
        }
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    /// Whether some added word ends in this state.
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// Outgoing edges as `(symbol, child)` in insertion order.
    pub fn children(&self) -> impl Iterator<Item = (&T, StateId)> {
        self.children.iter().map(|(symbol, child)| (symbol, *child))
    }

    /// The child reached on `symbol`, if any.
    pub fn child(&self, symbol: &T) -> Option<StateId> {
        self.children
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|&(_, child)| child)
    }
}

/// Prefix tree (digital tree) over words of symbols `T`.
///
/// State 0 is the root. States only ever get added: there is no removal,
/// so ids stay dense.
#[derive(Debug, Clone)]
pub struct Trie<T = char> {
    states: Vec<TrieState<T>>,
    /// Accepting states in the order their words were first added.
    accepting: Vec<StateId>,
    /// Distinct symbols in first-seen order.
    alphabet: Vec<T>,
    seen: HashSet<T>,
}

impl<T: Clone + Eq + Hash> Default for Trie<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Eq + Hash> Trie<T> {
    /// Create a trie holding only the root.
    pub fn new() -> Self {
        Self {
            states: vec![TrieState::new(0)],
            accepting: Vec::new(),
            alphabet: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Insert a word, creating the missing states along its path.
    ///
    /// Adding a word twice reuses the existing path; the terminal state is
    /// only recorded as accepting once.
    pub fn add<I>(&mut self, word: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut state = 0;
        for symbol in word {
            state = match self.states[state].child(&symbol) {
                Some(next) => next,
                None => {
                    let next = self.states.len();
                    if self.seen.insert(symbol.clone()) {
                        self.alphabet.push(symbol.clone());
                    }
                    self.states[state].children.push((symbol, next));
                    self.states.push(TrieState::new(next));
                    next
                }
            };
        }

        let terminal = &mut self.states[state];
        if !terminal.accepting {
            terminal.accepting = true;
            self.accepting.push(state);
        }
        self
    }

    /// Insert every word of `words`.
    pub fn add_range<W, I>(&mut self, words: W) -> &mut Self
    where
        W: IntoIterator<Item = I>,
        I: IntoIterator<Item = T>,
    {
        for word in words {
            self.add(word);
        }
        self
    }

    /// Whether `word` was added.
    pub fn contains<I>(&self, word: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let mut state = 0;
        for symbol in word {
            match self.states[state].child(&symbol) {
                Some(next) => state = next,
                None => return false,
            }
        }
        self.states[state].accepting
    }

    /// Symbols along the unbranching path from the root.
    ///
    /// The walk stops at the first state that branches, has no children or
    /// is accepting (a word ends there).
    pub fn find_common_prefix(&self) -> Vec<T> {
        let mut prefix = Vec::new();
        let mut state = &self.states[0];
        while !state.accepting && state.children.len() == 1 {
            let (symbol, next) = &state.children[0];
            prefix.push(symbol.clone());
            state = &self.states[*next];
        }
        prefix
    }

    /// Lazy preorder walk over every edge.
    ///
    /// Each call starts a fresh walk; children are visited in insertion
    /// order.
    pub fn transitions(&self) -> Transitions<'_, T> {
        Transitions {
            trie: self,
            stack: vec![(0, 0)],
        }
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Every state but the root has exactly one incoming edge.
    pub fn transition_count(&self) -> usize {
        self.states.len() - 1
    }

    /// Number of distinct words added.
    pub fn accepting_count(&self) -> usize {
        self.accepting.len()
    }

    /// Accepting states in first-insertion order.
    pub fn accepting_states(&self) -> &[StateId] {
        &self.accepting
    }

    pub fn states(&self) -> &[TrieState<T>] {
        &self.states
    }

    /// Distinct symbols in first-seen order.
    pub fn alphabet(&self) -> &[T] {
        &self.alphabet
    }
}

impl Trie<char> {
    /// Build a trie from string samples.
    pub fn from_strs<S: AsRef<str>>(words: impl IntoIterator<Item = S>) -> Self {
        let mut trie = Self::new();
        trie.add_strs(words);
        trie
    }

    pub fn add_str(&mut self, word: &str) -> &mut Self {
        self.add(word.chars())
    }

    pub fn add_strs<S: AsRef<str>>(&mut self, words: impl IntoIterator<Item = S>) -> &mut Self {
        for word in words {
            self.add(word.as_ref().chars());
        }
        self
    }

    pub fn contains_str(&self, word: &str) -> bool {
        self.contains(word.chars())
    }

    /// Longest prefix shared by at least two of `strings`.
    ///
    /// After sorting, any two strings sharing a prefix are separated only by
    /// strings that share it as well, so it is enough to compare
    /// lexicographic neighbours column by column (stopping at the first
    /// mismatching column or the end of the shorter string) and keep the
    /// longest match. A single string is its own answer; an empty list
    /// yields `""`.
    pub fn find_longest_common_prefix<S: AsRef<str>>(strings: &[S]) -> String {
        let mut sorted: Vec<&str> = strings.iter().map(AsRef::as_ref).collect();
        sorted.sort_unstable();
        match sorted.as_slice() {
            [] => String::new(),
            [only] => (*only).to_string(),
            _ => sorted
                .windows(2)
                .map(|pair| column_prefix(pair[0], pair[1]))
                .max_by_key(|prefix| prefix.chars().count())
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// Prefix common to every one of `strings`.
    ///
    /// Equal to the shortest neighbour match of the sorted list, computed in
    /// one linear pass after the sort.
    pub fn find_common_prefix_of<S: AsRef<str>>(strings: &[S]) -> String {
        let mut sorted: Vec<&str> = strings.iter().map(AsRef::as_ref).collect();
        sorted.sort_unstable();
        match sorted.as_slice() {
            [] => String::new(),
            [only] => (*only).to_string(),
            _ => sorted
                .windows(2)
                .map(|pair| column_prefix(pair[0], pair[1]))
                .min_by_key(|prefix| prefix.chars().count())
                .unwrap_or_default()
                .to_string(),
        }
    }
}

/// Column-wise common prefix of two strings, as a slice of `a`.
fn column_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let end = a
        .char_indices()
        .zip(b.chars())
        .find(|((_, ca), cb)| ca != cb)
        .map(|((i, _), _)| i)
        .unwrap_or_else(|| a.len().min(b.len()));
    &a[..end]
}

/// Preorder edge iterator returned by [`Trie::transitions`].
///
/// Keeps an explicit `(state, next child index)` stack instead of recursing,
/// so deep tries cannot overflow the call stack.
pub struct Transitions<'a, T> {
    trie: &'a Trie<T>,
    stack: Vec<(StateId, usize)>,
}

impl<T: Clone> Iterator for Transitions<'_, T> {
    type Item = Transition<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let trie = self.trie;
        while let Some(top) = self.stack.last_mut() {
            let (state, index) = *top;
            let children = &trie.states[state].children;
            if index < children.len() {
                top.1 += 1;
                let (symbol, child) = &children[index];
                self.stack.push((*child, 0));
                return Some(Transition::new(state, *child, symbol.clone()));
            }
            self.stack.pop();
        }
        None
    }
}
