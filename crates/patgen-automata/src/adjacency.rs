// CSR adjacency over the parallel transition arrays of the minimizer.

use patgen_core::StateId;

/// Which endpoint of a transition an [`AdjacencyIndex`] is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Keyed by source state: outgoing edges.
    Forward,
    /// Keyed by target state: incoming edges.
    Backward,
}

impl Direction {
    /// Split `(from, to)` into `(tails, heads)` for this direction.
    ///
    /// Walking forward goes from tails to heads.
    #[inline]
    pub fn orient<'a>(
        self,
        from: &'a [StateId],
        to: &'a [StateId],
    ) -> (&'a [StateId], &'a [StateId]) {
        match self {
            Self::Forward => (from, to),
            Self::Backward => (to, from),
        }
    }
}

/// Transition indices bucketed by state.
///
/// `adjacent[offset[s]..offset[s + 1]]` holds, in ascending order, the
/// indices of the transitions whose tail is `s`. Built with one counting
/// pass and one placement pass; rebuilt whenever the transition arrays
/// change.
#[derive(Debug, Clone)]
pub struct AdjacencyIndex {
    offset: Vec<usize>,
    adjacent: Vec<usize>,
}

impl AdjacencyIndex {
    /// Build the index for `tails[t]` over states `0..state_count`.
    pub fn build(state_count: usize, tails: &[StateId]) -> Self {
        let mut offset = vec![0usize; state_count + 1];
        for &tail in tails {
            offset[tail] += 1;
        }
        for s in 0..state_count {
            offset[s + 1] += offset[s];
        }

        // Filling back to front leaves each bucket in ascending order and
        // `offset` pointing at bucket starts.
        let mut adjacent = vec![0usize; tails.len()];
        for (t, &tail) in tails.iter().enumerate().rev() {
            offset[tail] -= 1;
            adjacent[offset[tail]] = t;
        }

        Self { offset, adjacent }
    }

    /// Build the index for `direction` over the parallel endpoint arrays.
    pub fn for_direction(
        state_count: usize,
        direction: Direction,
        from: &[StateId],
        to: &[StateId],
    ) -> Self {
        let (tails, _) = direction.orient(from, to);
        Self::build(state_count, tails)
    }

    /// Indices of the transitions whose tail is `state`.
    #[inline]
    pub fn edges(&self, state: StateId) -> &[usize] {
        &self.adjacent[self.offset[state]..self.offset[state + 1]]
    }
}
