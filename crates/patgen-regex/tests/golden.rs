//! Golden tests: inferred patterns for fixed sample sets.
//!
//! `exact` cases pin the full pattern text. `matching` cases only require the
//! anchored pattern to compile and to match every sample.
//!
//! Run: cargo test -p patgen-regex --test golden

use std::path::PathBuf;

use patgen_core::CancelFlag;
use patgen_regex::{PatternGenerator, PatternOptions, find_pattern};
use regex::Regex;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Fixtures {
    exact: Vec<ExactCase>,
    matching: Vec<MatchingCase>,
}

#[derive(Debug, Deserialize)]
struct ExactCase {
    name: String,
    samples: Vec<String>,
    pattern: String,
}

#[derive(Debug, Deserialize)]
struct MatchingCase {
    name: String,
    samples: Vec<String>,
}

fn load_fixtures() -> Fixtures {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/golden/patterns.json");
    let contents = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read golden file {}: {}", path.display(), e));
    serde_json::from_str(&contents)
        .unwrap_or_else(|e| panic!("failed to parse golden file {}: {}", path.display(), e))
}

fn assert_matches_all(name: &str, pattern: &str, samples: &[String]) {
    let anchored = format!("^(?:{pattern})$");
    let re = Regex::new(&anchored)
        .unwrap_or_else(|e| panic!("[{name}] pattern {pattern:?} does not compile: {e}"));
    for sample in samples {
        assert!(
            re.is_match(sample),
            "[{name}] pattern {pattern:?} does not match {sample:?}"
        );
    }
}

#[test]
fn exact_patterns() {
    for case in load_fixtures().exact {
        let pattern = find_pattern(&case.samples)
            .unwrap_or_else(|e| panic!("[{}] inference failed: {}", case.name, e));
        assert_eq!(pattern, case.pattern, "[{}]", case.name);
        assert_matches_all(&case.name, &pattern, &case.samples);
    }
}

#[test]
fn matching_patterns() {
    for case in load_fixtures().matching {
        let pattern = find_pattern(&case.samples)
            .unwrap_or_else(|e| panic!("[{}] inference failed: {}", case.name, e));
        assert_matches_all(&case.name, &pattern, &case.samples);
    }
}

#[test]
fn every_option_combination_matches() {
    let fixtures = load_fixtures();
    let sample_sets = fixtures
        .exact
        .iter()
        .map(|case| (&case.name, &case.samples))
        .chain(fixtures.matching.iter().map(|case| (&case.name, &case.samples)));

    for (name, samples) in sample_sets {
        for bits in 0..8u8 {
            let options = PatternOptions {
                simplify: bits & 1 != 0,
                factor_interior: bits & 2 != 0,
                group_predecessors: bits & 4 != 0,
                anchored: true,
            };
            let pattern = PatternGenerator::new(options)
                .load_strings(samples)
                .find_pattern(&CancelFlag::new())
                .unwrap_or_else(|e| panic!("[{name}] inference failed with {options:?}: {e}"));
            let re = Regex::new(&pattern).unwrap();
            for sample in samples {
                assert!(
                    re.is_match(sample),
                    "[{name}] {pattern:?} ({options:?}) does not match {sample:?}"
                );
            }
        }
    }
}

#[test]
fn common_prefix_of_file_names() {
    let names = ["CommonData", "CommonLinq", "Controlz"];
    assert_eq!(
        patgen_automata::Trie::find_longest_common_prefix(&names),
        "Common"
    );
}
