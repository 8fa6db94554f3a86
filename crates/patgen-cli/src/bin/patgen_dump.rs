// patgen-dump: Print the minimized automaton of the sample strings.
//
// Builds the prefix tree of the samples, minimizes it and prints the
// canonical dump:
//   <states> <transitions> <initial> <accepting>
//   <from> <symbol> <to>     (one line per transition)
//   <block>                  (one line per accepting block)
//
// Usage:
//   patgen-dump [-v] [FILE...]
//
// Options:
//   -v, -vv           Log pipeline phases (debug, trace) to stderr
//   -h, --help        Print help

use std::io::{self, Write};

use patgen_automata::AutomatonDump;
use patgen_core::CancelFlag;
use patgen_regex::PatternGenerator;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if patgen_cli::wants_help(&args) {
        println!("patgen-dump: Print the minimized automaton of the sample strings.");
        println!();
        println!("Usage: patgen-dump [OPTIONS] [FILE...]");
        println!();
        println!("Reads samples from FILEs (or stdin), one per line; blank lines are skipped.");
        println!("Prints a header line `<states> <transitions> <initial> <accepting>`,");
        println!("then one `<from> <symbol> <to>` line per transition and one line per");
        println!("accepting block.");
        println!();
        println!("Options:");
        println!("  -v, -vv           Log pipeline phases (debug, trace) to stderr");
        println!("  -h, --help        Print this help");
        return;
    }

    let cli = patgen_cli::parse_args(&args).unwrap_or_else(|e| patgen_cli::fatal(&e));
    patgen_cli::init_logging(cli.verbosity);

    let samples = patgen_cli::read_samples(&cli.files).unwrap_or_else(|e| patgen_cli::fatal(&e));

    let dump: AutomatonDump<char> = PatternGenerator::new(cli.options)
        .load_strings(&samples)
        .minimize(&CancelFlag::new())
        .and_then(|minimizer| minimizer.dump())
        .unwrap_or_else(|e| patgen_cli::fatal(&e.to_string()));

    let mut out = io::BufWriter::new(io::stdout().lock());
    if let Err(e) = write!(out, "{dump}").and_then(|()| out.flush()) {
        patgen_cli::fatal(&format!("failed to write output: {e}"));
    }
}
