// Criterion benchmarks for patgen-regex.
//
// Sample sets are generated, so no fixture files are needed.
//
// Run:
//   cargo bench -p patgen-regex

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use patgen_automata::{DfaMinimizer, Trie};
use patgen_core::CancelFlag;
use patgen_regex::{PatternGenerator, PatternOptions};

// ---------------------------------------------------------------------------
// Sample generation
// ---------------------------------------------------------------------------

/// File names shaped like `<letter>zero<digit>go<digit>.txt`.
fn file_names(letters: usize) -> Vec<String> {
    let mut names = Vec::new();
    for letter in ('A'..='Z').take(letters) {
        for middle in 0..10 {
            for last in 0..10 {
                names.push(format!("{letter}zero{middle}go{last}.txt"));
            }
        }
    }
    names
}

/// Decimal numbers below `count`, which share long suffix runs.
fn numbers(count: usize) -> Vec<String> {
    (0..count).map(|n| n.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_minimize(c: &mut Criterion) {
    let mut group = c.benchmark_group("minimize");
    for size in [100, 1_000, 10_000] {
        let trie = Trie::from_strs(numbers(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &trie, |b, trie| {
            b.iter(|| {
                std::hint::black_box(DfaMinimizer::minimize(trie, &CancelFlag::new()).unwrap());
            });
        });
    }
    group.finish();
}

fn bench_find_pattern(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_pattern");
    for letters in [1, 4, 26] {
        let names = file_names(letters);
        group.bench_with_input(BenchmarkId::new("file_names", names.len()), &names, |b, names| {
            b.iter(|| {
                let pattern = PatternGenerator::new(PatternOptions::default())
                    .load_strings(names)
                    .find_pattern(&CancelFlag::new())
                    .unwrap();
                std::hint::black_box(pattern);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_minimize, bench_find_pattern);
criterion_main!(benches);
