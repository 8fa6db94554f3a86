//! Regular expression stage of the patgen pipeline.
//!
//! A minimized automaton is turned back into a regular expression by
//! Brzozowski state elimination, and the result is compacted by factoring
//! shared literal runs out of alternations.
//!
//! # Architecture
//!
//! - [`node`] -- `RegexNode` tree (literal, alternation, conjunction)
//! - [`solver`] -- Per-state equations and their elimination
//! - [`simplify`] -- Prefix, interior and suffix factoring
//! - [`generator`] -- `PatternGenerator`, wiring samples to a pattern string

pub mod generator;
pub mod node;
pub mod simplify;
pub mod solver;

pub use generator::{PatternGenerator, PatternOptions, find_pattern};
pub use node::RegexNode;
pub use simplify::Simplifier;
pub use solver::EquationSystem;
