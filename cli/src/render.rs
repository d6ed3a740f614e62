//! Terminal rendering of the message list.
//!
//! New entries are printed as they are appended, which keeps the newest
//! message at the bottom of the terminal.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::io::Write;

use panel::{MessageEntry, MessageList};

/// Format one entry as a transcript line.
pub fn line(entry: &MessageEntry, peer: &str) -> String {
    let author = if entry.from_self { "you" } else { peer };
    format!("{author}: {}", entry.text)
}

/// Banner printed when a conversation opens.
pub fn header(peer: &str, count: usize) -> String {
    let noun = if count == 1 { "message" } else { "messages" };
    format!("--- conversation with {peer} ({count} {noun}) ---")
}

/// Write `lines` to `out` and flush.
pub fn write_lines(out: &mut impl Write, lines: &[String]) -> std::io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

/// Tracks which entries have already been printed.
#[derive(Debug)]
pub struct Transcript {
    peer: String,
    printed: usize,
}

impl Transcript {
    pub fn new(peer: impl Into<String>) -> Self {
        Self { peer: peer.into(), printed: 0 }
    }

    /// Mark everything in `list` as printed without rendering it.
    pub fn skip(&mut self, list: &MessageList) {
        self.printed = list.len();
    }

    /// Lines for entries appended since the last call.
    ///
    /// A list shorter than what was printed means it was cleared, so
    /// rendering restarts from the top.
    pub fn pending(&mut self, list: &MessageList) -> Vec<String> {
        if list.len() < self.printed {
            self.printed = 0;
        }
        let lines = list.entries()[self.printed..]
            .iter()
            .map(|entry| line(entry, &self.peer))
            .collect();
        self.printed = list.len();
        lines
    }
}
