use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

use crate::action::Action;
use crate::player::Player;
use crate::state::Observation;
use crate::visualize::render_observation;

/// Agent that asks a human which dice to reroll.
///
/// Input is three `0`/`1` digits, one per die from highest to lowest (e.g. `101`).
/// Anything else, including a failed read, counts as a pass.
pub struct InteractiveAgent<I: BufRead, W: Write> {
    name: String,
    input: I,
    output: W,
}

impl InteractiveAgent<BufReader<Stdin>, Stdout> {
    pub fn stdio(name: impl Into<String>) -> Self {
        Self::new(name, BufReader::new(io::stdin()), io::stdout())
    }
}

impl<I: BufRead, W: Write> InteractiveAgent<I, W> {
    pub fn new(name: impl Into<String>, input: I, output: W) -> Self {
        Self {
            name: name.into(),
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Prompts, reads one line and echoes the parsed action. Unparsable input is a pass.
    fn prompt(&mut self, observation: &Observation) -> io::Result<Action> {
        writeln!(self.output, "\n=== {}'s turn ===", self.name)?;
        writeln!(self.output, "{}", render_observation(observation))?;
        write!(self.output, "Which dice will you throw? ")?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        let action = Action::parse_mask(&line).unwrap_or(Action::PASS);
        writeln!(self.output, "Action chosen: {action}")?;
        Ok(action)
    }
}

impl<I: BufRead, W: Write> Player for InteractiveAgent<I, W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_action(&mut self, observation: &Observation) -> Action {
        self.prompt(observation).unwrap_or(Action::PASS)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn observation() -> Observation {
        Observation {
            player_comb: [6, 3, 1],
            opp_comb: [0, 0, 0],
            round_nb: 2,
            max_throws: 3,
            current_throws: 1,
            state_round: 0,
            player_score: 5,
            opp_score: 7,
        }
    }

    #[test]
    fn reads_one_mask_per_decision() {
        let input = Cursor::new("011\n100\n");
        let mut agent = InteractiveAgent::new("Ana", input, Vec::new());
        assert_eq!(agent.choose_action(&observation()), Action([false, true, true]));
        assert_eq!(agent.choose_action(&observation()), Action([true, false, false]));
        let transcript = String::from_utf8(agent.into_output()).expect("utf8");
        assert!(transcript.contains("Ana's turn"));
        assert!(transcript.contains("[6 3 1]"));
        assert!(transcript.contains("Action chosen: 100"));
    }

    #[test]
    fn invalid_or_missing_input_passes() {
        let input = Cursor::new("2\nyes\n");
        let mut agent = InteractiveAgent::new("Ana", input, Vec::new());
        assert_eq!(agent.choose_action(&observation()), Action::PASS);
        assert_eq!(agent.choose_action(&observation()), Action::PASS);
        // End of input.
        assert_eq!(agent.choose_action(&observation()), Action::PASS);
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn unwritable_output_passes() {
        let mut agent = InteractiveAgent::new("Ana", Cursor::new("111\n"), BrokenPipe);
        assert_eq!(agent.choose_action(&observation()), Action::PASS);
    }
}
