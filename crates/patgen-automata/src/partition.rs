// Index-partitioned arena used for both the state blocks and the transition
// cords of the minimizer.

use patgen_core::{CancelFlag, PatternError};

/// Id of a partitioned element (a state or a transition index).
pub type ElementId = usize;

/// Id of a set within a [`Partition`].
pub type SetId = usize;

/// A partition of the ids `0..n` into disjoint sets.
///
/// Each set occupies the contiguous range `elements[first[s]..past[s]]`;
/// `location` is the inverse permutation of `elements`, which gives O(1)
/// membership tests and O(1) moves within a set. Marking an element swaps it
/// into the marked prefix of its set; splitting carves the smaller side of
/// every partially marked set into a new set.
#[derive(Debug, Clone)]
pub struct Partition {
    elements: Vec<ElementId>,
    location: Vec<usize>,
    set_of: Vec<SetId>,
    first: Vec<usize>,
    past: Vec<usize>,
    set_count: usize,
    /// Number of marked elements per set.
    marked: Vec<usize>,
    /// Sets with at least one marked element, in first-touch order.
    touched: Vec<SetId>,
}

impl Partition {
    /// A partition holding `0..n` in a single set (no set when `n == 0`).
    pub fn new(n: usize) -> Self {
        let capacity = n.max(1);
        let mut first = vec![0; capacity];
        let mut past = vec![0; capacity];
        first[0] = 0;
        past[0] = n;
        Self {
            elements: (0..n).collect(),
            location: (0..n).collect(),
            set_of: vec![0; n],
            first,
            past,
            set_count: usize::from(n != 0),
            marked: vec![0; capacity],
            touched: Vec::new(),
        }
    }

    /// A partition whose sets are the maximal runs of `order` in which
    /// `same_group(previous, current)` holds.
    ///
    /// `order` must be a permutation of `0..order.len()`.
    pub fn from_groups<F>(order: Vec<ElementId>, mut same_group: F) -> Self
    where
        F: FnMut(ElementId, ElementId) -> bool,
    {
        let n = order.len();
        let mut partition = Self::new(n);
        if n == 0 {
            return partition;
        }

        partition.set_count = 0;
        partition.first[0] = 0;
        for (i, &element) in order.iter().enumerate() {
            if i > 0 && !same_group(order[i - 1], element) {
                partition.past[partition.set_count] = i;
                partition.set_count += 1;
                partition.first[partition.set_count] = i;
            }
            partition.set_of[element] = partition.set_count;
            partition.location[element] = i;
        }
        partition.past[partition.set_count] = n;
        partition.set_count += 1;
        partition.elements = order;

        debug_assert!(partition.check_invariants());
        partition
    }

    /// Number of sets.
    #[inline]
    pub fn set_count(&self) -> usize {
        self.set_count
    }

    /// Number of partitioned ids, live or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Set containing `element`.
    #[inline]
    pub fn set_of(&self, element: ElementId) -> SetId {
        self.set_of[element]
    }

    /// Position of `element` in the element array.
    #[inline]
    pub fn location(&self, element: ElementId) -> usize {
        self.location[element]
    }

    /// Element stored at `position`.
    #[inline]
    pub fn element_at(&self, position: usize) -> ElementId {
        self.elements[position]
    }

    /// Start of `set`'s range.
    #[inline]
    pub fn first(&self, set: SetId) -> usize {
        self.first[set]
    }

    /// One past the end of `set`'s range.
    #[inline]
    pub fn past(&self, set: SetId) -> usize {
        self.past[set]
    }

    /// Members of `set`. The first member is the set's representative.
    #[inline]
    pub fn members(&self, set: SetId) -> &[ElementId] {
        &self.elements[self.first[set]..self.past[set]]
    }

    /// Whether `element` is the first member of its set.
    #[inline]
    pub fn is_representative(&self, element: ElementId) -> bool {
        self.location[element] == self.first[self.set_of[element]]
    }

    /// Exchange the elements at positions `i` and `j`, keeping `location`
    /// the inverse of `elements`.
    #[inline]
    pub fn swap_positions(&mut self, i: usize, j: usize) {
        self.elements.swap(i, j);
        self.location[self.elements[i]] = i;
        self.location[self.elements[j]] = j;
        debug_assert_eq!(self.location[self.elements[i]], i);
        debug_assert_eq!(self.location[self.elements[j]], j);
    }

    /// Shrink set 0 to its first `len` positions.
    ///
    /// Used after reachability pruning: the pruned ids stay in the arrays
    /// past the end of set 0 but no longer belong to any set.
    pub fn truncate_first_set(&mut self, len: usize) {
        debug_assert_eq!(self.set_count, 1);
        self.past[0] = len;
    }

    /// Swap `element` to the boundary of its set's marked region.
    ///
    /// The set is pushed onto the touched worklist the first time one of its
    /// members gets marked. Marking an already-marked element is a no-op.
    pub fn mark(&mut self, element: ElementId) {
        let set = self.set_of[element];
        let i = self.location[element];
        let j = self.first[set] + self.marked[set];
        if i < j {
            return;
        }
        self.swap_positions(i, j);

        if self.marked[set] == 0 {
            self.touched.push(set);
        }
        self.marked[set] += 1;
    }

    /// Treat the first `len` members of `set` as marked.
    ///
    /// Follow with [`Partition::split`] to separate them from the rest.
    pub fn split_prefix(&mut self, set: SetId, len: usize) {
        debug_assert_eq!(self.marked[set], 0);
        if len == 0 {
            return;
        }
        self.marked[set] = len;
        self.touched.push(set);
    }

    /// Split every touched set along its marked boundary.
    ///
    /// The smaller side becomes a new set; on a tie the marked side does.
    /// Sets that are fully marked are left as they are. Cancellation is
    /// checked before each touched set, never in the middle of moving a
    /// range.
    pub fn split(&mut self, cancel: &CancelFlag) -> Result<(), PatternError> {
        while let Some(set) = self.touched.pop() {
            cancel.check()?;

            let first_unmarked = self.first[set] + self.marked[set];
            if first_unmarked == self.past[set] {
                self.marked[set] = 0;
                continue;
            }

            let new_set = self.set_count;
            if self.marked[set] <= self.past[set] - first_unmarked {
                self.first[new_set] = self.first[set];
                self.past[new_set] = first_unmarked;
                self.first[set] = first_unmarked;
            } else {
                self.past[new_set] = self.past[set];
                self.first[new_set] = first_unmarked;
                self.past[set] = first_unmarked;
            }

            for i in self.first[new_set]..self.past[new_set] {
                self.set_of[self.elements[i]] = new_set;
            }

            self.marked[new_set] = 0;
            self.marked[set] = 0;
            self.set_count += 1;
        }

        debug_assert!(self.check_invariants());
        Ok(())
    }

    /// Verify the structural invariants of the live sets.
    ///
    /// Checks that `location` inverts `elements`, that set ranges are
    /// disjoint and contiguous from position 0, and that `set_of` agrees with
    /// the ranges.
    pub fn check_invariants(&self) -> bool {
        let inverse = self
            .elements
            .iter()
            .enumerate()
            .all(|(i, &element)| self.location[element] == i);
        if !inverse {
            return false;
        }

        let mut ranges: Vec<(usize, usize, SetId)> = (0..self.set_count)
            .map(|s| (self.first[s], self.past[s], s))
            .collect();
        ranges.sort_unstable();

        let mut cursor = 0;
        for (first, past, set) in ranges {
            if first != cursor || first >= past {
                return false;
            }
            if self.elements[first..past]
                .iter()
                .any(|&element| self.set_of[element] != set)
            {
                return false;
            }
            cursor = past;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_members(p: &Partition, set: SetId) -> Vec<ElementId> {
        let mut members = p.members(set).to_vec();
        members.sort_unstable();
        members
    }

    #[test]
    fn new_partition_is_single_set() {
        let p = Partition::new(5);
        assert_eq!(p.set_count(), 1);
        assert_eq!(p.members(0), &[0, 1, 2, 3, 4]);
        assert!(p.check_invariants());
        assert!(p.is_representative(0));
        assert!(!p.is_representative(3));
    }

    #[test]
    fn empty_partition() {
        let p = Partition::new(0);
        assert_eq!(p.set_count(), 0);
        assert!(p.is_empty());
        assert!(p.check_invariants());
    }

    #[test]
    fn split_makes_smaller_marked_side_new() {
        let mut p = Partition::new(5);
        p.mark(3);
        p.mark(1);
        p.split(&CancelFlag::new()).unwrap();

        assert_eq!(p.set_count(), 2);
        assert_eq!(sorted_members(&p, 1), vec![1, 3]);
        assert_eq!(sorted_members(&p, 0), vec![0, 2, 4]);
        assert_eq!(p.set_of(3), 1);
        assert!(p.check_invariants());
    }

    #[test]
    fn split_makes_smaller_unmarked_side_new() {
        let mut p = Partition::new(4);
        for e in [0, 1, 2] {
            p.mark(e);
        }
        p.split(&CancelFlag::new()).unwrap();

        assert_eq!(p.set_count(), 2);
        assert_eq!(sorted_members(&p, 0), vec![0, 1, 2]);
        assert_eq!(sorted_members(&p, 1), vec![3]);
    }

    #[test]
    fn marking_twice_is_noop() {
        let mut p = Partition::new(3);
        p.mark(2);
        p.mark(2);
        p.split(&CancelFlag::new()).unwrap();
        assert_eq!(p.set_count(), 2);
        assert_eq!(p.members(1), &[2]);
        assert!(p.check_invariants());
    }

    #[test]
    fn tie_moves_marked_side() {
        let mut p = Partition::new(4);
        p.mark(2);
        p.mark(3);
        p.split(&CancelFlag::new()).unwrap();

        assert_eq!(sorted_members(&p, 1), vec![2, 3]);
        assert_eq!(sorted_members(&p, 0), vec![0, 1]);
    }

    #[test]
    fn fully_marked_set_is_untouched() {
        let mut p = Partition::new(3);
        for e in 0..3 {
            p.mark(e);
        }
        p.split(&CancelFlag::new()).unwrap();
        assert_eq!(p.set_count(), 1);

        // Marks were reset, so a later partial mark splits normally.
        p.mark(1);
        p.split(&CancelFlag::new()).unwrap();
        assert_eq!(p.set_count(), 2);
        assert_eq!(p.members(1), &[1]);
    }

    #[test]
    fn split_prefix_seeds_split() {
        let mut p = Partition::new(6);
        p.split_prefix(0, 2);
        p.split(&CancelFlag::new()).unwrap();
        assert_eq!(p.members(1), &[0, 1]);
        assert_eq!(p.members(0), &[2, 3, 4, 5]);
    }

    #[test]
    fn from_groups_cuts_runs_of_equal_keys() {
        let keys = ['b', 'a', 'b', 'c', 'a'];
        let mut order: Vec<usize> = (0..keys.len()).collect();
        order.sort_by_key(|&i| keys[i]);
        let p = Partition::from_groups(order, |a, b| keys[a] == keys[b]);

        assert_eq!(p.set_count(), 3);
        assert_eq!(p.members(0), &[1, 4]);
        assert_eq!(p.members(1), &[0, 2]);
        assert_eq!(p.members(2), &[3]);
        assert!(p.check_invariants());
    }

    #[test]
    fn split_across_several_sets() {
        let keys = [0, 0, 0, 1, 1, 1];
        let p0: Vec<usize> = (0..6).collect();
        let mut p = Partition::from_groups(p0, |a, b| keys[a] == keys[b]);
        p.mark(1);
        p.mark(4);
        p.mark(5);
        p.split(&CancelFlag::new()).unwrap();

        assert_eq!(p.set_count(), 4);
        assert!(p.check_invariants());
        assert_ne!(p.set_of(1), p.set_of(0));
        assert_ne!(p.set_of(3), p.set_of(4));
        assert_eq!(p.set_of(4), p.set_of(5));
    }

    #[test]
    fn cancelled_split_reports_error() {
        let mut p = Partition::new(4);
        p.mark(0);
        let cancel = CancelFlag::new();
        cancel.cancel();
        assert_eq!(p.split(&cancel), Err(PatternError::Cancelled));
    }

    #[test]
    fn truncated_first_set_ignores_tail() {
        let mut p = Partition::new(5);
        p.swap_positions(0, 4);
        p.truncate_first_set(3);
        assert_eq!(p.members(0), &[4, 1, 2]);
        assert!(p.check_invariants());
    }
}
