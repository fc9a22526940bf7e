//! View module.
//!
//! Rather than printing from inside every effect handler, output lines are
//! collected here and flushed once per turn: wrapped to the configured width
//! and indented the way the game formats its prose. Tests read the collected
//! lines directly instead of capturing stdout.

use textwrap::{Options, termwidth};

const INDENT: &str = "  ";

/// Collects the lines produced while resolving one input.
#[derive(Debug, Clone)]
pub struct View {
    pub width: usize,
    pub lines: Vec<String>,
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

impl View {
    /// A view wrapped to the terminal width.
    pub fn new() -> Self {
        Self::with_width(termwidth())
    }

    /// A view wrapped to an explicit width (the game config caps line length).
    pub fn with_width(width: usize) -> Self {
        Self {
            width,
            lines: Vec::new(),
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Print and clear everything collected this turn.
    pub fn flush(&mut self) {
        let options = Options::new(self.width)
            .initial_indent(INDENT)
            .subsequent_indent(INDENT);
        for line in self.lines.drain(..) {
            println!();
            for paragraph in line.split('\n') {
                println!("{}", textwrap::fill(paragraph, &options));
            }
        }
    }

    /// Drain the collected lines without printing. Used by tests.
    pub fn take_lines(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_take_round_trip() {
        let mut view = View::with_width(80);
        view.push("first");
        view.push(String::from("second"));
        assert_eq!(view.take_lines(), vec!["first", "second"]);
        assert!(view.is_empty());
    }

    #[test]
    fn flush_clears_the_buffer() {
        let mut view = View::with_width(40);
        view.push("a line long enough to wrap at forty columns without trouble");
        view.flush();
        assert!(view.is_empty());
    }
}
