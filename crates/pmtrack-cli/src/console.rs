//! Line-oriented console I/O
//!
//! Generic over reader and writer so shells can run against scripted input
//! in tests. Alert colors follow the historical console scheme.

use std::io::{self, BufRead, Write};

const RESET: &str = "\x1b[0m";

/// Alert severities, each with its own color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Warning,
    Error,
    Info,
}

impl AlertKind {
    fn color(self) -> &'static str {
        match self {
            AlertKind::Success => "\x1b[92m",
            AlertKind::Warning => "\x1b[93m",
            AlertKind::Error => "\x1b[91m",
            AlertKind::Info => "\x1b[94m",
        }
    }

    fn label(self) -> &'static str {
        match self {
            AlertKind::Success => "SUCCESS",
            AlertKind::Warning => "WARNING",
            AlertKind::Error => "ERROR",
            AlertKind::Info => "INFO",
        }
    }
}

/// Paired input/output streams for one interactive session
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Recover the underlying streams, e.g. to inspect scripted output.
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }

    pub fn line(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.output, "{}", text.as_ref())
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.output)
    }

    pub fn rule(&mut self) -> io::Result<()> {
        writeln!(self.output, "=======================================")
    }

    /// Print `message` and read one trimmed line. `None` on end of input.
    pub fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Wait for Enter, discarding the line.
    pub fn pause(&mut self) -> io::Result<()> {
        self.prompt("Press Enter to continue...")?;
        Ok(())
    }

    /// Colored alert block in the historical style.
    pub fn alert(&mut self, kind: AlertKind, message: impl AsRef<str>) -> io::Result<()> {
        writeln!(
            self.output,
            "\n{}--- {} ---\n{}{}\n",
            kind.color(),
            kind.label(),
            message.as_ref(),
            RESET
        )
    }
}
