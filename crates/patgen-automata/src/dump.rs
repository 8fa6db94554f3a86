// Canonical text form of a minimized automaton.
//
//   <stateCount> <transitionCount> <initialState> <acceptingCount>
//   <from> <symbol> <to>          one line per transition
//   <blockId>                     one line per accepting block
//
// Every line ends with '\n'. The symbol is everything between the first and
// the last space of a transition line, so a space symbol survives a round
// trip; a newline symbol does not.

use std::fmt;
use std::str::FromStr;

use patgen_core::{PatternError, StateId, Transition};

use crate::minimizer::AutomataInfo;

/// A minimized automaton in dump form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomatonDump<T> {
    state_count: usize,
    initial_state: StateId,
    transitions: Vec<Transition<T>>,
    accepting: Vec<StateId>,
}

impl<T> AutomatonDump<T> {
    pub fn new(
        state_count: usize,
        initial_state: StateId,
        transitions: Vec<Transition<T>>,
        accepting: Vec<StateId>,
    ) -> Self {
        Self {
            state_count,
            initial_state,
            transitions,
            accepting,
        }
    }

    pub fn state_count(&self) -> usize {
        self.state_count
    }

    pub fn initial_state(&self) -> StateId {
        self.initial_state
    }

    pub fn transitions(&self) -> &[Transition<T>] {
        &self.transitions
    }

    pub fn accepting_states(&self) -> &[StateId] {
        &self.accepting
    }

    pub fn info(&self) -> AutomataInfo {
        AutomataInfo {
            state_count: self.state_count,
            transition_count: self.transitions.len(),
            initial_state: self.initial_state,
            accepting_count: self.accepting.len(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for AutomatonDump<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {} {} {}",
            self.state_count,
            self.transitions.len(),
            self.initial_state,
            self.accepting.len()
        )?;
        for transition in &self.transitions {
            writeln!(f, "{transition}")?;
        }
        for state in &self.accepting {
            writeln!(f, "{state}")?;
        }
        Ok(())
    }
}

fn malformed(line: usize, reason: impl fmt::Display) -> PatternError {
    PatternError::invalid("dump", format!("line {line}: {reason}"))
}

fn parse_number(line: usize, field: &str, text: &str) -> Result<usize, PatternError> {
    text.parse()
        .map_err(|_| malformed(line, format_args!("{field} `{text}` is not a number")))
}

fn parse_state(
    line: usize,
    field: &str,
    text: &str,
    state_count: usize,
) -> Result<StateId, PatternError> {
    let state = parse_number(line, field, text)?;
    if state >= state_count {
        return Err(malformed(
            line,
            format_args!("{field} {state} is out of range (state count {state_count})"),
        ));
    }
    Ok(state)
}

impl<T: FromStr> FromStr for AutomatonDump<T> {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines().enumerate().map(|(i, text)| (i + 1, text));

        let (n, header) = lines.next().ok_or_else(|| malformed(1, "missing header"))?;
        let fields: Vec<&str> = header.split(' ').collect();
        let [states, transitions, initial, accepting] = fields[..] else {
            return Err(malformed(n, "header needs four fields"));
        };
        let state_count = parse_number(n, "state count", states)?;
        let transition_count = parse_number(n, "transition count", transitions)?;
        let initial_state = parse_state(n, "initial state", initial, state_count)?;
        let accepting_count = parse_number(n, "accepting count", accepting)?;

        let mut parsed = Vec::new();
        for _ in 0..transition_count {
            let (n, text) = lines
                .next()
                .ok_or_else(|| malformed(n + 1 + parsed.len(), "missing transition line"))?;
            let (from, rest) = text
                .split_once(' ')
                .ok_or_else(|| malformed(n, "expected `<from> <symbol> <to>`"))?;
            let (symbol, to) = rest
                .rsplit_once(' ')
                .ok_or_else(|| malformed(n, "expected `<from> <symbol> <to>`"))?;
            let from = parse_state(n, "source", from, state_count)?;
            let to = parse_state(n, "target", to, state_count)?;
            let symbol = symbol
                .parse()
                .map_err(|_| malformed(n, format_args!("cannot parse symbol `{symbol}`")))?;
            parsed.push(Transition::new(from, to, symbol));
        }

        let mut accepting = Vec::new();
        for _ in 0..accepting_count {
            let (n, text) = lines.next().ok_or_else(|| {
                malformed(
                    n + 1 + transition_count + accepting.len(),
                    "missing accepting state line",
                )
            })?;
            accepting.push(parse_state(n, "accepting state", text, state_count)?);
        }

        if let Some((n, _)) = lines.find(|(_, text)| !text.is_empty()) {
            return Err(malformed(n, "unexpected trailing line"));
        }

        Ok(Self::new(state_count, initial_state, parsed, accepting))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOLDEN: &str = "6 8 4 1\n4 2 3\n3 3 5\n5 4 1\n5 0 0\n0 1 1\n4 5 2\n2 0 0\n4 0 0\n1\n";

    #[test]
    fn parse_and_render_golden() {
        let dump: AutomatonDump<char> = GOLDEN.parse().unwrap();
        assert_eq!(
            dump.info(),
            AutomataInfo {
                state_count: 6,
                transition_count: 8,
                initial_state: 4,
                accepting_count: 1,
            }
        );
        assert_eq!(dump.transitions()[2], Transition::new(5, 1, '4'));
        assert_eq!(dump.accepting_states(), &[1]);
        assert_eq!(dump.to_string(), GOLDEN);
    }

    #[test]
    fn space_symbol() {
        let text = "2 1 0 1\n0   1\n1\n";
        let dump: AutomatonDump<char> = text.parse().unwrap();
        assert_eq!(*dump.transitions()[0].symbol(), ' ');
        assert_eq!(dump.to_string(), text);
    }

    #[test]
    fn multi_character_symbols() {
        let dump: AutomatonDump<String> = "2 1 0 1\n0 ab 1\n1\n".parse().unwrap();
        assert_eq!(dump.transitions()[0].symbol(), "ab");
    }

    fn parse_err(text: &str) -> String {
        match text.parse::<AutomatonDump<char>>() {
            Err(PatternError::InvalidInput { argument, reason }) => {
                assert_eq!(argument, "dump");
                reason
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn malformed_dumps() {
        assert_eq!(parse_err(""), "line 1: missing header");
        assert_eq!(parse_err("1 0 0\n"), "line 1: header needs four fields");
        assert_eq!(parse_err("x 0 0 0\n"), "line 1: state count `x` is not a number");
        assert_eq!(
            parse_err("2 0 2 0\n"),
            "line 1: initial state 2 is out of range (state count 2)"
        );
        assert_eq!(parse_err("2 1 0 0\n"), "line 2: missing transition line");
        assert_eq!(
            parse_err("2 1 0 0\n0 a 9\n"),
            "line 2: target 9 is out of range (state count 2)"
        );
        assert_eq!(parse_err("2 1 0 0\n0 ab 1\n"), "line 2: cannot parse symbol `ab`");
        assert_eq!(parse_err("2 1 0 1\n0 a 1\n"), "line 3: missing accepting state line");
        assert_eq!(parse_err("1 0 0 1\n0\n5\n"), "line 3: unexpected trailing line");
        assert_eq!(
            parse_err("1 18446744073709551615 0 0\n"),
            "line 2: missing transition line"
        );
        assert_eq!(
            parse_err("1 0 0 18446744073709551615\n0\n"),
            "line 3: missing accepting state line"
        );
    }
}
