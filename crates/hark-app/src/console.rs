//! Line-oriented console loop.

use std::io::{self, BufRead, Write};

use hark_dispatch::{CommandTree, Output};
use hark_types::ConsoleConfig;

use crate::session::Session;

/// [`Output`] that writes one line per call to an `io::Write`.
pub struct WriterOutput<W: Write> {
    writer: W,
}

impl<W: Write> WriterOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn prompt(&mut self, prompt: &str) -> io::Result<()> {
        write!(self.writer, "{prompt}")?;
        self.writer.flush()
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Output for WriterOutput<W> {
    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.writer, "{text}") {
            log::warn!("Failed to write output: {e}");
        }
    }
}

/// Prompt, read, and dispatch lines from `input` until EOF.
///
/// Returns the number of lines dispatched.
pub fn run<R: BufRead, W: Write>(
    tree: &CommandTree<Session>,
    session: &mut Session,
    config: &ConsoleConfig,
    input: R,
    out: &mut WriterOutput<W>,
) -> io::Result<usize> {
    if let Some(greeting) = &config.greeting {
        out.line(greeting);
    }

    let mut count = 0;
    let mut lines = input.lines();
    loop {
        out.prompt(&config.prompt)?;
        let Some(line) = lines.next() else {
            break;
        };
        let outcome = tree.dispatch(session, &line?, out);
        log::debug!("console: line {count} -> {outcome:?}");
        count += 1;
    }
    Ok(count)
}
