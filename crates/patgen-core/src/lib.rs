//! Shared types for the patgen pipeline.
//!
//! Every stage of the pipeline (trie, minimizer, equation solver) exchanges
//! data through the types defined here, so the higher crates never depend on
//! each other's internals.
//!
//! - [`transition`] -- `StateId` and the `Transition` edge triple
//! - [`error`] -- the `PatternError` type shared by all crates
//! - [`cancel`] -- cooperative cancellation flag

pub mod cancel;
pub mod error;
pub mod transition;

pub use cancel::CancelFlag;
pub use error::PatternError;
pub use transition::{StateId, Transition};

/// Result alias used throughout the pipeline.
pub type Result<T> = std::result::Result<T, PatternError>;
