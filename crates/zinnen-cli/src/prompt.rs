//! Line-based terminal prompting

use std::fmt::Display;
use std::io::{self, BufRead, Write};

/// Inputs that end an interactive session
const QUIT_WORDS: &[&str] = &["q", ":q", "quit"];

/// Reads answers line by line and writes prompts and feedback
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.output, "{}", line)
    }

    /// Show `label` and read one line.
    ///
    /// `None` on end of input or a quit word.
    pub fn ask(&mut self, label: impl Display) -> io::Result<Option<String>> {
        write!(self.output, "{} ", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if QUIT_WORDS.contains(&line.trim()) {
            return Ok(None);
        }
        Ok(Some(line.to_string()))
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}
