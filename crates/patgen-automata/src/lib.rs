//! Automata stage of the patgen pipeline.
//!
//! Sample strings are collected into a prefix tree, whose edges are handed to
//! a Hopcroft partition-refinement minimizer. The minimized automaton is read
//! back as a transition list (or as the canonical text dump) by the regular
//! expression stage.
//!
//! # Architecture
//!
//! - [`trie`] -- Deterministic prefix tree over the samples
//! - [`partition`] -- Index-partitioned arena with O(1) mark and split
//! - [`adjacency`] -- CSR adjacency index over a transition table
//! - [`minimizer`] -- Reachability pruning and Hopcroft refinement
//! - [`dump`] -- Canonical text form of a minimized automaton

pub mod adjacency;
pub mod dump;
pub mod minimizer;
pub mod partition;
pub mod trie;

pub use dump::AutomatonDump;
pub use minimizer::{AutomataInfo, DfaMinimizer};
pub use partition::Partition;
pub use trie::Trie;
