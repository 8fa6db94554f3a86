// End-to-end pattern inference: samples -> trie -> minimized DFA -> regex.

use patgen_automata::{DfaMinimizer, Trie};
use patgen_core::{CancelFlag, PatternError, Result};
use tracing::debug;

use crate::node::RegexNode;
use crate::simplify::Simplifier;
use crate::solver::EquationSystem;

/// Knobs for [`PatternGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternOptions {
    /// Run the simplifier on the solved expression.
    pub simplify: bool,
    /// Let the simplifier factor substrings out of the middle of literals.
    /// Such factoring can widen the matched language.
    pub factor_interior: bool,
    /// Merge edges sharing a predecessor while building equations.
    pub group_predecessors: bool,
    /// Wrap the pattern as `^(?:...)$`.
    pub anchored: bool,
}

impl Default for PatternOptions {
    fn default() -> Self {
        Self {
            simplify: true,
            factor_interior: true,
            group_predecessors: false,
            anchored: false,
        }
    }
}

/// Infers a regular expression matching every loaded sample.
///
/// ```
/// use patgen_core::CancelFlag;
/// use patgen_regex::{PatternGenerator, PatternOptions};
///
/// let pattern = PatternGenerator::new(PatternOptions::default())
///     .load_strings(["234", "2301", "501", "01"])
///     .find_pattern(&CancelFlag::new())
///     .unwrap();
/// assert_eq!(pattern, "234|(0|230|50)1");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PatternGenerator {
    options: PatternOptions,
    samples: Trie<char>,
}

impl PatternGenerator {
    pub fn new(options: PatternOptions) -> Self {
        Self {
            options,
            samples: Trie::new(),
        }
    }

    pub fn options(&self) -> PatternOptions {
        self.options
    }

    /// Add samples. Duplicates are ignored.
    pub fn load_strings<S: AsRef<str>>(&mut self, strings: impl IntoIterator<Item = S>) -> &mut Self {
        self.samples.add_strs(strings);
        self
    }

    /// Number of distinct samples loaded so far.
    pub fn sample_count(&self) -> usize {
        self.samples.accepting_count()
    }

    /// Minimized automaton of the samples.
    pub fn minimize(&self, cancel: &CancelFlag) -> Result<DfaMinimizer<char>> {
        if self.samples.accepting_count() == 0 {
            return Err(PatternError::invalid("samples", "sample set is empty"));
        }
        debug!(
            samples = self.samples.accepting_count(),
            states = self.samples.state_count(),
            "built sample trie"
        );
        DfaMinimizer::minimize(&self.samples, cancel)
    }

    /// Solved (and, unless disabled, simplified) expression of the samples.
    pub fn find_expression(&self, cancel: &CancelFlag) -> Result<RegexNode> {
        let minimizer = self.minimize(cancel)?;
        let info = minimizer.automata_info()?;
        debug!(
            states = info.state_count,
            transitions = info.transition_count,
            accepting = info.accepting_count,
            "minimized sample automaton"
        );

        let mut system =
            EquationSystem::new(info, minimizer.transitions()?, self.options.group_predecessors)?;
        system.solve(cancel)?;
        let expression = system.union_of(&minimizer.accepting_blocks()?)?;
        debug!(branches = expression.branch_count(), "solved equation system");

        if !self.options.simplify {
            return Ok(expression);
        }
        let simplified = Simplifier::new(self.options.factor_interior).simplify(expression, cancel)?;
        debug!(branches = simplified.branch_count(), "simplified expression");
        Ok(simplified)
    }

    /// The inferred pattern in the `regex` crate dialect.
    ///
    /// Every sample matches. With `factor_interior` on (the default) the
    /// pattern may also match strings that were never loaded: `1a5`, `2a6`
    /// becomes `(1|2)a(5|6)`, which accepts `1a6`. Turn it off for a pattern
    /// matching exactly the samples.
    pub fn find_pattern(&self, cancel: &CancelFlag) -> Result<String> {
        let pattern = self.find_expression(cancel)?.to_string();
        if self.options.anchored {
            return Ok(format!("^(?:{pattern})$"));
        }
        Ok(pattern)
    }
}

/// Infer a pattern for `samples` with default options.
///
/// The defaults factor shared interior substrings, so the result can match
/// more than `samples`; see [`PatternGenerator::find_pattern`].
pub fn find_pattern<S: AsRef<str>>(samples: impl IntoIterator<Item = S>) -> Result<String> {
    PatternGenerator::new(PatternOptions::default())
        .load_strings(samples)
        .find_pattern(&CancelFlag::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_pattern() {
        assert_eq!(
            find_pattern(["234", "2301", "501", "01"]).unwrap(),
            "234|(0|230|50)1"
        );
    }

    #[test]
    fn duplicate_samples() {
        assert_eq!(find_pattern(["abc", "abc"]).unwrap(), "abc");
    }

    #[test]
    fn empty_samples_are_rejected() {
        let err = find_pattern(Vec::<String>::new()).unwrap_err();
        assert_eq!(err, PatternError::invalid("samples", "sample set is empty"));
    }

    #[test]
    fn cancelled_before_start() {
        let cancel = CancelFlag::new();
        cancel.cancel();
        let err = PatternGenerator::default()
            .load_strings(["a", "b"])
            .find_pattern(&cancel)
            .unwrap_err();
        assert_eq!(err, PatternError::Cancelled);
    }

    #[test]
    fn options_change_output() {
        let samples = ["testa", "testb"];
        let plain = PatternOptions {
            simplify: false,
            ..PatternOptions::default()
        };
        let anchored = PatternOptions {
            anchored: true,
            ..PatternOptions::default()
        };

        let mut generator = PatternGenerator::new(plain);
        generator.load_strings(samples);
        assert_eq!(generator.find_pattern(&CancelFlag::new()).unwrap(), "testa|testb");

        let mut generator = PatternGenerator::new(anchored);
        generator.load_strings(samples);
        assert_eq!(
            generator.find_pattern(&CancelFlag::new()).unwrap(),
            "^(?:test(a|b))$"
        );
    }

    #[test]
    fn interior_factoring_widens_by_default() {
        let widened = find_pattern(["1a5", "2a6"]).unwrap();
        assert_eq!(widened, "(1|2)a(5|6)");
        let full = regex::Regex::new(&format!("^(?:{widened})$")).unwrap();
        assert!(full.is_match("1a6"));

        let exact = PatternOptions {
            factor_interior: false,
            ..PatternOptions::default()
        };
        let mut generator = PatternGenerator::new(exact);
        generator.load_strings(["1a5", "2a6"]);
        let pattern = generator.find_pattern(&CancelFlag::new()).unwrap();
        assert_eq!(pattern, "1a5|2a6");
        let full = regex::Regex::new(&format!("^(?:{pattern})$")).unwrap();
        assert!(!full.is_match("1a6"));
    }

    #[test]
    fn empty_word_sample() {
        assert_eq!(find_pattern(["", "a"]).unwrap(), "|a");
    }
}
