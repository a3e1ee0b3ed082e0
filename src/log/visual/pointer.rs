use std::{
    cmp::{max, min},
    fmt::{Formatter, Result},
};

use super::{
    super::{RESET, YELLOW},
    {get_width, Visual, BLANK, EQUAL, HIGHLIGHT, PIPE},
};
use crate::region::Region;

/// A type of `Visual` that points to a specific location within source text.
#[derive(Debug, PartialEq)]
pub struct Pointer {
    /// The line that the Pointer is pointing to.
    ///
    /// This number should be zero indexed.
    line: usize,
    /// The column that the Pointer is pointing to, measured in display width.
    ///
    /// This number should be zero indexed.
    column: usize,
    /// The display width of the object being highlighted.
    length: usize,
    /// The actual line of text that is being pointed to.
    text: String,
}

impl Pointer {
    /// Create a new Visual over the given source text and Region.
    ///
    /// Only the first line covered by the Region is highlighted.
    pub fn new(source: &str, region: Region) -> Self {
        let begin = min(region.begin, source.len());
        let before = source.get(..begin).unwrap_or_default();
        let after = source.get(begin..).unwrap_or_default();

        let line_begin = before.rfind('\n').map(|n| n + 1).unwrap_or(0);
        let line_end = after.find('\n').map(|n| begin + n).unwrap_or(source.len());
        let end = region.end.clamp(begin, line_end);

        let text = source
            .get(line_begin..line_end)
            .unwrap_or_default()
            .trim_end_matches('\r')
            .to_string();
        let column = get_width(source.get(line_begin..begin).unwrap_or_default());
        let length = max(1, get_width(source.get(begin..end).unwrap_or_default()));

        Self {
            line: region.line(source) - 1,
            column,
            length,
            text,
        }
    }

    /// Return the zero indexed line that the [`Pointer`] is pointing to.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Return the zero indexed column that the [`Pointer`] is pointing to.
    pub fn column(&self) -> usize {
        self.column
    }
}

impl Visual for Pointer {
    fn display(
        &self,
        formatter: &mut Formatter<'_>,
        template: Option<&str>,
        help: Option<&str>,
    ) -> Result {
        let num = (self.line + 1).to_string();
        let col = self.column + 1;
        let pad = get_width(&num);
        let align = self.column + self.length;

        let name = template.unwrap_or("?");
        let text = &self.text;
        let underline = HIGHLIGHT.repeat(self.length);

        write!(
            formatter,
            "\n {BLANK:pad$}--> {name}:{num}:{col}\
             \n {BLANK:pad$} {PIPE}\
             \n {num:>} {PIPE} {text}\
             \n {BLANK:pad$} {PIPE} {YELLOW}{underline:>align$}{RESET}\
             \n {BLANK:pad$} {PIPE}\n",
        )?;

        if let Some(help) = help {
            writeln!(formatter, " {BLANK:pad$} {EQUAL} help: {help}")?;
        }

        Ok(())
    }
}
