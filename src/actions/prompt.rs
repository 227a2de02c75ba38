//! The per-file yes/no question asked in interactive mode.

use std::io::{self, BufRead, Write};
use std::path::Path;

/// Answer to "delete this file?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Remove the file.
    Delete,
    /// Leave the file alone.
    Keep,
    /// Stop the whole run.
    Abort,
}

/// Something that can be asked whether to delete a file.
///
/// Any `FnMut(&Path) -> Decision` is a prompt, which lets tests script
/// their answers.
pub trait Prompt {
    /// Ask about one path.
    ///
    /// # Errors
    ///
    /// Returns an error if the question cannot be shown or the answer
    /// cannot be read.
    fn ask(&mut self, path: &Path) -> io::Result<Decision>;
}

impl<F> Prompt for F
where
    F: FnMut(&Path) -> Decision,
{
    fn ask(&mut self, path: &Path) -> io::Result<Decision> {
        Ok(self(path))
    }
}

/// Map one line of user input to a decision.
///
/// `y`/`yes` deletes, `q`/`quit`/`abort` stops the run, and anything else
/// (including an empty line) keeps the file.
#[must_use]
pub fn parse_answer(line: &str) -> Decision {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Decision::Delete,
        "q" | "quit" | "abort" => Decision::Abort,
        _ => Decision::Keep,
    }
}

/// Prompt that writes the question to one stream and reads the answer
/// from another.
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompt<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on the terminal: question on stderr, answer from stdin.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    /// Create a prompt over arbitrary streams.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompt for ConsolePrompt<R, W> {
    fn ask(&mut self, path: &Path) -> io::Result<Decision> {
        write!(self.output, "Delete {}? [y/N/q] ", path.display())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            // End of input: nobody is left to answer.
            writeln!(self.output)?;
            return Ok(Decision::Abort);
        }
        Ok(parse_answer(&line))
    }
}
