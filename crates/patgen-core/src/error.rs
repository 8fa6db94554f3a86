// Error type shared by the trie, minimizer, solver and generator.

/// Error type for the pattern inference pipeline.
///
/// `Cancelled` is kept distinct from the other variants so callers can tell
/// "aborted by request" apart from "could not compute".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// A caller-supplied argument is unusable.
    #[error("invalid `{argument}`: {reason}")]
    InvalidInput {
        /// Name of the offending argument.
        argument: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// A cooperative cancellation request was observed. The instance that
    /// returned this error is left in an unspecified state.
    #[error("operation cancelled")]
    Cancelled,

    /// An internal invariant does not hold. This is a defect in the
    /// pipeline, never a consequence of bad input.
    #[error("internal logic error: {0}")]
    Logic(String),
}

impl PatternError {
    /// Shorthand for [`PatternError::InvalidInput`].
    pub fn invalid(argument: &'static str, reason: impl Into<String>) -> Self {
        PatternError::InvalidInput {
            argument,
            reason: reason.into(),
        }
    }

    /// Shorthand for a state id that does not fit the declared state count.
    pub fn state_out_of_range(argument: &'static str, state: usize, state_count: usize) -> Self {
        Self::invalid(
            argument,
            format!("state {state} is out of range (state count {state_count})"),
        )
    }

    /// Whether this error was caused by cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PatternError::Cancelled)
    }
}
