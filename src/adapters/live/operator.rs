//! Interactive operator reading answers from a terminal.

use std::error::Error;
use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};
use std::sync::Mutex;

use crate::ports::operator::{Confirmation, Operator};

/// Asks questions on a writer and reads `y`/`n` answers from a reader.
///
/// Unrecognised answers repeat the question. End of input counts as "no",
/// so a run piped from a closed stream never merges anything unconfirmed.
pub struct TerminalOperator<R, W> {
    io: Mutex<(R, W)>,
}

impl<R: BufRead + Send, W: Write + Send> TerminalOperator<R, W> {
    /// Creates an operator over the given input and output streams.
    pub fn new(reader: R, writer: W) -> Self {
        Self { io: Mutex::new((reader, writer)) }
    }
}

impl TerminalOperator<BufReader<Stdin>, Stdout> {
    /// Creates an operator on the process's standard streams.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead + Send, W: Write + Send> Operator for TerminalOperator<R, W> {
    fn confirm(&self, request: &Confirmation) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let mut guard = self.io.lock().map_err(|e| format!("operator lock poisoned: {e}"))?;
        let (reader, writer) = &mut *guard;

        writeln!(writer)?;
        writeln!(writer, "== {}", request.sentence)?;
        for line in &request.context {
            writeln!(writer, "{line}")?;
        }

        loop {
            write!(writer, "{} [y/n] ", request.question)?;
            writer.flush()?;

            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 {
                writeln!(writer)?;
                return Ok(false);
            }
            match parse_answer(&line) {
                Some(answer) => return Ok(answer),
                None => writeln!(writer, "Please answer 'y' or 'n'.")?,
            }
        }
    }
}

fn parse_answer(line: &str) -> Option<bool> {
    match line.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}
