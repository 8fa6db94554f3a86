// Hopcroft DFA minimization over index-partitioned arrays.

use std::hash::Hash;

use patgen_core::{CancelFlag, PatternError, Result, StateId, Transition};
use tracing::debug;

use crate::adjacency::{AdjacencyIndex, Direction};
use crate::dump::AutomatonDump;
use crate::partition::{Partition, SetId};
use crate::trie::Trie;

/// Shape of a minimized automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AutomataInfo {
    pub state_count: usize,
    pub transition_count: usize,
    pub initial_state: StateId,
    pub accepting_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Phase {
    Created,
    TransitionsLoaded,
    FinalStatesSet,
    Partitioned,
    Minimized,
}

impl Phase {
    fn operation(self) -> &'static str {
        match self {
            Phase::Created => "new",
            Phase::TransitionsLoaded => "load_transitions",
            Phase::FinalStatesSet => "set_final_states",
            Phase::Partitioned => "partition_transitions",
            Phase::Minimized => "split_blocks_and_cords",
        }
    }
}

/// Single-use DFA minimizer.
///
/// Driven through its phases in a fixed order:
///
/// 1. [`load_transitions`](Self::load_transitions) -- copy the edges and drop
///    whatever the initial state cannot reach
/// 2. [`set_final_states`](Self::set_final_states) -- record the accepting
///    states
/// 3. [`partition_transitions`](Self::partition_transitions) -- drop states
///    that reach no accepting state, seed the blocks and the cords
/// 4. [`split_blocks_and_cords`](Self::split_blocks_and_cords) -- Hopcroft
///    refinement
///
/// after which the result is read through [`transitions`](Self::transitions),
/// [`automata_info`](Self::automata_info) and [`dump`](Self::dump). Calling a
/// phase out of order is a [`PatternError::Logic`] error.
///
/// The input must be deterministic (at most one edge per symbol per state).
/// Every phase polls the [`CancelFlag`]; after `Cancelled` the instance must
/// be discarded.
#[derive(Debug, Clone)]
pub struct DfaMinimizer<T> {
    state_count: usize,
    initial_state: StateId,
    from: Vec<StateId>,
    to: Vec<StateId>,
    symbols: Vec<T>,
    /// States partitioned into blocks. During pruning the reached states are
    /// gathered at the front of the element array.
    blocks: Partition,
    /// Transitions partitioned into cords.
    cords: Partition,
    reach_count: usize,
    final_count: usize,
    live_count: usize,
    phase: Phase,
}

impl<T: Ord + Clone> DfaMinimizer<T> {
    /// Create a minimizer for states `0..state_count`.
    ///
    /// The transition and accepting counts are advisory and never trusted
    /// for allocation; only the initial state is validated here.
    pub fn new(
        state_count: usize,
        _transition_count: usize,
        initial_state: StateId,
        _accepting_count: usize,
    ) -> Result<Self> {
        if initial_state >= state_count {
            return Err(PatternError::state_out_of_range(
                "initial_state",
                initial_state,
                state_count,
            ));
        }
        Ok(Self {
            state_count,
            initial_state,
            from: Vec::new(),
            to: Vec::new(),
            symbols: Vec::new(),
            blocks: Partition::new(state_count),
            cords: Partition::new(0),
            reach_count: 0,
            final_count: 0,
            live_count: state_count,
            phase: Phase::Created,
        })
    }

    /// Minimize the automaton of a trie (initial state 0).
    pub fn minimize(trie: &Trie<T>, cancel: &CancelFlag) -> Result<Self>
    where
        T: Hash,
    {
        let mut minimizer = Self::new(
            trie.state_count(),
            trie.transition_count(),
            0,
            trie.accepting_count(),
        )?;
        minimizer.load_transitions(trie.transitions(), cancel)?;
        minimizer.set_final_states(trie.accepting_states().iter().copied(), cancel)?;
        minimizer.process(cancel)?;
        Ok(minimizer)
    }

    /// Minimize the automaton described by a parsed dump.
    pub fn minimize_dump(dump: &AutomatonDump<T>, cancel: &CancelFlag) -> Result<Self> {
        let mut minimizer = Self::new(
            dump.state_count(),
            dump.transitions().len(),
            dump.initial_state(),
            dump.accepting_states().len(),
        )?;
        minimizer.load_transitions(dump.transitions().iter().cloned(), cancel)?;
        minimizer.set_final_states(dump.accepting_states().iter().copied(), cancel)?;
        minimizer.process(cancel)?;
        Ok(minimizer)
    }

    /// Copy the transitions and discard everything unreachable from the
    /// initial state.
    pub fn load_transitions<I>(&mut self, transitions: I, cancel: &CancelFlag) -> Result<()>
    where
        I: IntoIterator<Item = Transition<T>>,
    {
        self.expect_phase(Phase::Created, Phase::TransitionsLoaded)?;
        cancel.check()?;

        for transition in transitions {
            cancel.check()?;
            let (from, to, symbol) = transition.into_parts();
            for state in [from, to] {
                if state >= self.state_count {
                    return Err(PatternError::state_out_of_range(
                        "transitions",
                        state,
                        self.state_count,
                    ));
                }
            }
            self.from.push(from);
            self.to.push(to);
            self.symbols.push(symbol);
        }
        let loaded = self.from.len();

        self.reach(self.initial_state);
        self.remove_unreachable(Direction::Forward, cancel)?;

        debug!(
            states = self.live_count,
            transitions = self.from.len(),
            dropped = loaded - self.from.len(),
            "pruned states unreachable from the initial state"
        );
        self.phase = Phase::TransitionsLoaded;
        Ok(())
    }

    /// Record the accepting states. Accepting states that were pruned as
    /// unreachable are ignored.
    pub fn set_final_states<I>(&mut self, states: I, cancel: &CancelFlag) -> Result<()>
    where
        I: IntoIterator<Item = StateId>,
    {
        self.expect_phase(Phase::TransitionsLoaded, Phase::FinalStatesSet)?;
        cancel.check()?;

        for state in states {
            cancel.check()?;
            if state >= self.state_count {
                return Err(PatternError::state_out_of_range(
                    "accepting_states",
                    state,
                    self.state_count,
                ));
            }
            if self.is_live(state) {
                self.reach(state);
            }
        }
        self.final_count = self.reach_count;

        debug!(accepting = self.final_count, "accepting states recorded");
        self.phase = Phase::FinalStatesSet;
        Ok(())
    }

    /// Discard states that cannot reach an accepting state, split the blocks
    /// into accepting and non-accepting, and cut the transitions into cords
    /// of equal symbol.
    pub fn partition_transitions(&mut self, cancel: &CancelFlag) -> Result<()> {
        self.expect_phase(Phase::FinalStatesSet, Phase::Partitioned)?;
        cancel.check()?;

        if self.final_count == 0 {
            return Err(PatternError::invalid(
                "accepting_states",
                "no accepting state is reachable, the language is empty",
            ));
        }

        self.remove_unreachable(Direction::Backward, cancel)?;

        self.blocks.split_prefix(0, self.final_count);
        self.blocks.split(cancel)?;

        let mut order: Vec<usize> = (0..self.symbols.len()).collect();
        let symbols = &self.symbols;
        order.sort_by(|&a, &b| symbols[a].cmp(&symbols[b]));
        self.cords = Partition::from_groups(order, |a, b| symbols[a] == symbols[b]);

        debug!(
            states = self.live_count,
            transitions = self.from.len(),
            blocks = self.blocks.set_count(),
            cords = self.cords.set_count(),
            "partitioned blocks and cords"
        );
        self.phase = Phase::Partitioned;
        Ok(())
    }

    /// Refine blocks and cords until no block can be split further.
    pub fn split_blocks_and_cords(&mut self, cancel: &CancelFlag) -> Result<()> {
        self.expect_phase(Phase::Partitioned, Phase::Minimized)?;
        cancel.check()?;

        let incoming =
            AdjacencyIndex::for_direction(self.state_count, Direction::Backward, &self.from, &self.to);

        // Block 0 never needs to be used as a splitter.
        let mut block: SetId = 1;
        let mut cord: SetId = 0;
        while cord < self.cords.set_count() {
            for i in self.cords.first(cord)..self.cords.past(cord) {
                cancel.check()?;
                let t = self.cords.element_at(i);
                self.blocks.mark(self.from[t]);
            }
            self.blocks.split(cancel)?;
            cord += 1;

            while block < self.blocks.set_count() {
                for i in self.blocks.first(block)..self.blocks.past(block) {
                    cancel.check()?;
                    let state = self.blocks.element_at(i);
                    for &t in incoming.edges(state) {
                        self.cords.mark(t);
                    }
                }
                self.cords.split(cancel)?;
                block += 1;
            }
        }

        debug!(
            blocks = self.blocks.set_count(),
            cords = self.cords.set_count(),
            "refinement finished"
        );
        self.phase = Phase::Minimized;
        Ok(())
    }

    /// Run [`partition_transitions`](Self::partition_transitions) and
    /// [`split_blocks_and_cords`](Self::split_blocks_and_cords).
    pub fn process(&mut self, cancel: &CancelFlag) -> Result<()> {
        self.partition_transitions(cancel)?;
        self.split_blocks_and_cords(cancel)
    }

    /// Minimized transitions, addressed by block id.
    ///
    /// One transition per (block, symbol) pair: only the edges leaving the
    /// representative state of a block are emitted, in internal transition
    /// order.
    pub fn transitions(&self) -> Result<impl Iterator<Item = Transition<T>> + '_> {
        self.expect_minimized("transitions")?;
        Ok((0..self.from.len())
            .filter(|&t| self.blocks.is_representative(self.from[t]))
            .map(|t| {
                Transition::new(
                    self.blocks.set_of(self.from[t]),
                    self.blocks.set_of(self.to[t]),
                    self.symbols[t].clone(),
                )
            }))
    }

    /// Accepting block ids, ascending.
    pub fn accepting_blocks(&self) -> Result<Vec<SetId>> {
        self.expect_minimized("accepting_blocks")?;
        // The accepting states occupy the front of the element array and
        // splits never move elements across set boundaries.
        Ok((0..self.blocks.set_count())
            .filter(|&b| self.blocks.first(b) < self.final_count)
            .collect())
    }

    pub fn automata_info(&self) -> Result<AutomataInfo> {
        Ok(AutomataInfo {
            state_count: self.blocks.set_count(),
            transition_count: self.transitions()?.count(),
            initial_state: self.blocks.set_of(self.initial_state),
            accepting_count: self.accepting_blocks()?.len(),
        })
    }

    /// Block of an original state, or `None` if the state was pruned, is out
    /// of range, or minimization has not finished.
    pub fn block_of(&self, state: StateId) -> Option<SetId> {
        if self.phase != Phase::Minimized || state >= self.state_count || !self.is_live(state) {
            return None;
        }
        Some(self.blocks.set_of(state))
    }

    /// Snapshot of the minimized automaton in dump form.
    pub fn dump(&self) -> Result<AutomatonDump<T>> {
        Ok(AutomatonDump::new(
            self.blocks.set_count(),
            self.blocks.set_of(self.initial_state),
            self.transitions()?.collect(),
            self.accepting_blocks()?,
        ))
    }

    fn expect_phase(&self, expected: Phase, next: Phase) -> Result<()> {
        if self.phase == expected {
            return Ok(());
        }
        Err(PatternError::Logic(format!(
            "`{}` must follow `{}`, but the last completed step was `{}`",
            next.operation(),
            expected.operation(),
            self.phase.operation(),
        )))
    }

    fn expect_minimized(&self, operation: &str) -> Result<()> {
        if self.phase == Phase::Minimized {
            return Ok(());
        }
        Err(PatternError::Logic(format!(
            "`{operation}` called before minimization finished"
        )))
    }

    /// Whether `state` survived pruning so far.
    #[inline]
    fn is_live(&self, state: StateId) -> bool {
        self.blocks.location(state) < self.live_count
    }

    /// Move `state` into the reached prefix of the block elements.
    fn reach(&mut self, state: StateId) {
        let i = self.blocks.location(state);
        if i < self.reach_count {
            return;
        }
        self.blocks.swap_positions(i, self.reach_count);
        self.reach_count += 1;
    }

    /// Reach everything walkable from the reached prefix in `direction`, then
    /// drop the unreached states and every transition leaving them.
    fn remove_unreachable(&mut self, direction: Direction, cancel: &CancelFlag) -> Result<()> {
        let index = AdjacencyIndex::for_direction(self.state_count, direction, &self.from, &self.to);

        let mut i = 0;
        while i < self.reach_count {
            cancel.check()?;
            let state = self.blocks.element_at(i);
            for &t in index.edges(state) {
                let (_, heads) = direction.orient(&self.from, &self.to);
                let head = heads[t];
                self.reach(head);
            }
            i += 1;
        }

        let mut kept = 0;
        for t in 0..self.from.len() {
            cancel.check()?;
            let (tails, _) = direction.orient(&self.from, &self.to);
            if self.blocks.location(tails[t]) >= self.reach_count {
                continue;
            }
            self.from[kept] = self.from[t];
            self.to[kept] = self.to[t];
            self.symbols.swap(kept, t);
            kept += 1;
        }
        self.from.truncate(kept);
        self.to.truncate(kept);
        self.symbols.truncate(kept);

        self.live_count = self.reach_count;
        self.blocks.truncate_first_set(self.reach_count);
        self.reach_count = 0;
        Ok(())
    }
}
