// Brzozowski state elimination over a minimized, acyclic automaton.
//
// Every non-initial state s gets the equation
//
//   X(s) = X(p1)·a1 | X(p2)·a2 | ...      for each edge (pi --ai--> s)
//
// and the initial state is solved as the empty word. Solutions are pushed
// forward round by round until every equation is solved.

use hashbrown::HashMap;
use patgen_automata::AutomataInfo;
use patgen_core::{CancelFlag, PatternError, Result, StateId, Transition};
use tracing::trace;

use crate::node::RegexNode;

/// Equation system of a minimized automaton.
#[derive(Debug, Clone)]
pub struct EquationSystem {
    state_count: usize,
    initial_state: StateId,
    unsolved: HashMap<StateId, RegexNode>,
    solved: HashMap<StateId, RegexNode>,
}

impl EquationSystem {
    /// Build one equation per non-initial state.
    ///
    /// With `group_predecessors`, edges into a state that share a
    /// predecessor are merged into `X(p)·(a|b|...)`.
    ///
    /// Only acyclic automata have a star-free solution: a cycle, or any
    /// state other than the initial one without an incoming edge, is
    /// rejected as [`PatternError::InvalidInput`].
    pub fn new<I>(info: AutomataInfo, transitions: I, group_predecessors: bool) -> Result<Self>
    where
        I: IntoIterator<Item = Transition<char>>,
    {
        let state_count = info.state_count;
        let initial_state = info.initial_state;
        if initial_state >= state_count {
            return Err(PatternError::state_out_of_range(
                "initial_state",
                initial_state,
                state_count,
            ));
        }

        // Incoming edges per target, grouped by predecessor in first-seen order.
        let mut incoming: HashMap<StateId, Vec<(StateId, Vec<char>)>> = HashMap::new();
        let mut edges = Vec::new();
        for transition in transitions {
            let (from, to, symbol) = transition.into_parts();
            for state in [from, to] {
                if state >= state_count {
                    return Err(PatternError::state_out_of_range(
                        "transitions",
                        state,
                        state_count,
                    ));
                }
            }
            edges.push((from, to));
            let into = incoming.entry(to).or_default();
            match into.iter_mut().find(|(p, _)| group_predecessors && *p == from) {
                Some((_, symbols)) => symbols.push(symbol),
                None => into.push((from, vec![symbol])),
            }
        }

        let mut unsolved = HashMap::new();
        for state in (0..state_count).filter(|&s| s != initial_state) {
            let Some(predecessors) = incoming.remove(&state) else {
                return Err(PatternError::invalid(
                    "transitions",
                    format!("state {state} has no incoming transition"),
                ));
            };
            let parts = predecessors
                .into_iter()
                .map(|(from, symbols)| match symbols.as_slice() {
                    [symbol] => RegexNode::pending(symbol.to_string(), from),
                    _ => RegexNode::conjunction(
                        RegexNode::pending("", from),
                        RegexNode::union(symbols.iter().map(|c| RegexNode::literal(c.to_string()))),
                    ),
                })
                .collect();
            unsolved.insert(state, RegexNode::alternation(parts));
        }

        check_acyclic(state_count, &edges)?;

        let mut solved = HashMap::with_capacity(state_count);
        solved.insert(initial_state, RegexNode::epsilon());

        Ok(Self {
            state_count,
            initial_state,
            unsolved,
            solved,
        })
    }

    /// Eliminate states until every equation is solved.
    ///
    /// Fails with [`PatternError::Logic`] when a round makes no progress.
    /// Construction already rejects cyclic input, so that indicates a bug.
    pub fn solve(&mut self, cancel: &CancelFlag) -> Result<()> {
        let mut frontier = vec![(self.initial_state, RegexNode::epsilon())];
        let mut round = 0usize;

        while self.solved.len() < self.state_count {
            cancel.check()?;
            if frontier.is_empty() {
                return Err(PatternError::Logic(format!(
                    "equation system does not converge: {} of {} states solved",
                    self.solved.len(),
                    self.state_count
                )));
            }

            for (state, expression) in &frontier {
                for equation in self.unsolved.values_mut() {
                    cancel.check()?;
                    equation.substitute(*state, expression);
                }
            }

            let mut done: Vec<StateId> = self
                .unsolved
                .iter()
                .filter(|(_, equation)| equation.is_solved())
                .map(|(&state, _)| state)
                .collect();
            done.sort_unstable();

            frontier.clear();
            for state in done {
                if let Some(equation) = self.unsolved.remove(&state) {
                    let equation = equation.normalize();
                    self.solved.insert(state, equation.clone());
                    frontier.push((state, equation));
                }
            }

            round += 1;
            trace!(
                round,
                newly_solved = frontier.len(),
                remaining = self.unsolved.len(),
                "solver round"
            );
        }
        Ok(())
    }

    /// Solution of `state`, once solved.
    pub fn solution(&self, state: StateId) -> Option<&RegexNode> {
        self.solved.get(&state)
    }

    pub fn is_solved(&self) -> bool {
        self.unsolved.is_empty()
    }

    /// Union of the solutions of the accepting states, in ascending order.
    pub fn union_of(&self, accepting: &[StateId]) -> Result<RegexNode> {
        let mut states = accepting.to_vec();
        states.sort_unstable();
        states.dedup();

        let mut parts = Vec::with_capacity(states.len());
        for state in states {
            let solution = self.solution(state).ok_or_else(|| {
                PatternError::Logic(format!("accepting state {state} has no solution"))
            })?;
            parts.push(solution.clone());
        }
        match parts.len() {
            0 => Err(PatternError::invalid(
                "accepting_states",
                "no accepting state, the language is empty",
            )),
            1 => Ok(parts.remove(0)),
            _ => Ok(RegexNode::union(parts)),
        }
    }
}

/// Kahn's peel: every state must drop to in-degree zero.
fn check_acyclic(state_count: usize, edges: &[(StateId, StateId)]) -> Result<()> {
    let mut indegree = vec![0usize; state_count];
    let mut outgoing: HashMap<StateId, Vec<StateId>> = HashMap::new();
    for &(from, to) in edges {
        indegree[to] += 1;
        outgoing.entry(from).or_default().push(to);
    }

    let mut ready: Vec<StateId> = (0..state_count).filter(|&s| indegree[s] == 0).collect();
    let mut peeled = 0;
    while let Some(state) = ready.pop() {
        peeled += 1;
        for &next in outgoing.get(&state).into_iter().flatten() {
            indegree[next] -= 1;
            if indegree[next] == 0 {
                ready.push(next);
            }
        }
    }

    if peeled < state_count {
        return Err(PatternError::invalid(
            "transitions",
            format!(
                "automaton is cyclic: {} of {state_count} states lie on or behind a cycle",
                state_count - peeled
            ),
        ));
    }
    Ok(())
}
