// patgen-cli: shared utilities for CLI tools.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process;

use patgen_regex::PatternOptions;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Parsed command line shared by the tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub options: PatternOptions,
    /// 0 = silent, 1 = debug, 2 or more = trace.
    pub verbosity: u8,
    /// Sample files; empty means stdin. `-` also reads stdin.
    pub files: Vec<PathBuf>,
}

/// Parse the options common to `patgen` and `patgen-dump`.
///
/// `--help` is not handled here, check [`wants_help`] first.
pub fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut options = PatternOptions::default();
    let mut verbosity = 0u8;
    let mut files = Vec::new();
    let mut only_files = false;

    for arg in args {
        if only_files || arg == "-" || !arg.starts_with('-') {
            files.push(PathBuf::from(arg));
            continue;
        }
        match arg.as_str() {
            "--" => only_files = true,
            "--no-simplify" => options.simplify = false,
            "--no-interior" => options.factor_interior = false,
            "--group" => options.group_predecessors = true,
            "--anchored" => options.anchored = true,
            "--verbose" => verbosity = verbosity.saturating_add(1),
            flags if flags.len() > 1 && flags[1..].bytes().all(|b| b == b'v') => {
                let count = u8::try_from(flags.len() - 1).unwrap_or(u8::MAX);
                verbosity = verbosity.saturating_add(count);
            }
            other => return Err(format!("unknown option `{other}` (see --help)")),
        }
    }

    Ok(CliArgs {
        options,
        verbosity,
        files,
    })
}

/// Read samples, one per line, skipping blank lines.
pub fn read_samples_from(reader: impl BufRead) -> io::Result<Vec<String>> {
    let mut samples = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            samples.push(line);
        }
    }
    Ok(samples)
}

/// Read samples from `files` in order, or from stdin when none are given.
pub fn read_samples(files: &[PathBuf]) -> Result<Vec<String>, String> {
    if files.is_empty() {
        return read_samples_from(io::stdin().lock())
            .map_err(|e| format!("failed to read stdin: {e}"));
    }

    let mut samples = Vec::new();
    for path in files {
        let read = if path.as_os_str() == "-" {
            read_samples_from(io::stdin().lock())
        } else {
            File::open(path).and_then(|file| read_samples_from(BufReader::new(file)))
        };
        samples.extend(read.map_err(|e| format!("failed to read {}: {}", path.display(), e))?);
    }
    Ok(samples)
}

/// Install a stderr `tracing` subscriber for `-v` (debug) and `-vv` (trace).
///
/// Without `-v` no subscriber is installed and the pipeline stays silent.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => return,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        fatal(&format!("failed to set tracing subscriber: {e}"));
    }
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// Check if `--help` or `-h` is in the args.
pub fn wants_help(args: &[String]) -> bool {
    args.iter().any(|a| a == "--help" || a == "-h")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults() {
        let parsed = parse_args(&[]).unwrap();
        assert_eq!(parsed.options, PatternOptions::default());
        assert_eq!(parsed.verbosity, 0);
        assert!(parsed.files.is_empty());
    }

    #[test]
    fn flags_and_files() {
        let parsed = parse_args(&args(&[
            "--no-simplify",
            "names.txt",
            "--group",
            "-vv",
            "--anchored",
            "-",
            "--no-interior",
        ]))
        .unwrap();
        assert!(!parsed.options.simplify);
        assert!(!parsed.options.factor_interior);
        assert!(parsed.options.group_predecessors);
        assert!(parsed.options.anchored);
        assert_eq!(parsed.verbosity, 2);
        assert_eq!(
            parsed.files,
            vec![PathBuf::from("names.txt"), PathBuf::from("-")]
        );
    }

    #[test]
    fn double_dash_ends_options() {
        let parsed = parse_args(&args(&["-v", "--", "--group"])).unwrap();
        assert_eq!(parsed.verbosity, 1);
        assert!(!parsed.options.group_predecessors);
        assert_eq!(parsed.files, vec![PathBuf::from("--group")]);
    }

    #[test]
    fn unknown_option() {
        let err = parse_args(&args(&["--fast"])).unwrap_err();
        assert!(err.contains("--fast"));
        assert!(parse_args(&args(&["-vx"])).is_err());
    }

    #[test]
    fn blank_lines_are_skipped() {
        let input = "alpha\n\n  \nbeta gamma\r\nalpha\n";
        let samples = read_samples_from(input.as_bytes()).unwrap();
        assert_eq!(samples, vec!["alpha", "beta gamma", "alpha"]);
    }

    #[test]
    fn help_flag() {
        assert!(wants_help(&args(&["x", "-h"])));
        assert!(!wants_help(&args(&["x"])));
    }
}
