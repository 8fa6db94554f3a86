// patgen: Infer a regular expression matching every sample string.
//
// Reads samples (one per line, blank lines skipped) from the given files or
// from stdin and prints a single pattern in the `regex` crate dialect.
//
// Usage:
//   patgen [OPTIONS] [FILE...]
//
// Options:
//   --no-simplify     Print the solved expression without factoring
//   --no-interior     Do not factor substrings out of the middle of samples
//   --group           Group edges sharing a predecessor while solving
//   --anchored        Wrap the pattern as ^(?:...)$
//   -v, -vv           Log pipeline phases (debug, trace) to stderr
//   -h, --help        Print help

use std::io::{self, Write};

use patgen_core::CancelFlag;
use patgen_regex::PatternGenerator;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if patgen_cli::wants_help(&args) {
        println!("patgen: Infer a regular expression matching every sample string.");
        println!();
        println!("Usage: patgen [OPTIONS] [FILE...]");
        println!();
        println!("Reads samples from FILEs (or stdin), one per line; blank lines are skipped.");
        println!();
        println!("Options:");
        println!("  --no-simplify     Print the solved expression without factoring");
        println!("  --no-interior     Do not factor substrings out of the middle of samples");
        println!("  --group           Group edges sharing a predecessor while solving");
        println!("  --anchored        Wrap the pattern as ^(?:...)$");
        println!("  -v, -vv           Log pipeline phases (debug, trace) to stderr");
        println!("  -h, --help        Print this help");
        return;
    }

    let cli = patgen_cli::parse_args(&args).unwrap_or_else(|e| patgen_cli::fatal(&e));
    patgen_cli::init_logging(cli.verbosity);

    let samples = patgen_cli::read_samples(&cli.files).unwrap_or_else(|e| patgen_cli::fatal(&e));

    let pattern = PatternGenerator::new(cli.options)
        .load_strings(&samples)
        .find_pattern(&CancelFlag::new())
        .unwrap_or_else(|e| patgen_cli::fatal(&e.to_string()));

    let mut out = io::stdout().lock();
    if let Err(e) = writeln!(out, "{pattern}") {
        patgen_cli::fatal(&format!("failed to write output: {e}"));
    }
}
