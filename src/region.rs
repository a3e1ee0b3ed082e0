use std::{
    cmp::{max, min},
    ops::Range,
};

/// Represents an area within source text.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub struct Region {
    /// The beginning of the range, inclusive.
    pub begin: usize,
    /// The ending of the range, exclusive.
    pub end: usize,
}

impl Region {
    /// Create a new Region from the given range.
    pub fn new(position: Range<usize>) -> Self {
        Self {
            begin: position.start,
            end: position.end,
        }
    }

    /// Combine will merge the indices of two [`Region`] instances.
    pub fn combine(self, other: Self) -> Self {
        Self {
            begin: min(self.begin, other.begin),
            end: max(self.end, other.end),
        }
    }

    /// Move the [`Region`] forward by the given amount.
    ///
    /// Used to translate a `Region` within an expression into a `Region`
    /// within the template that contains the expression.
    pub fn offset(self, by: usize) -> Self {
        Self {
            begin: self.begin + by,
            end: self.end + by,
        }
    }

    /// Return true if the [`Region`] covers no text.
    pub fn is_empty(&self) -> bool {
        self.begin >= self.end
    }

    /// Access the literal value of a [`Region`].
    ///
    /// A `Region` that falls outside of the source, or splits a character,
    /// yields an empty string.
    pub fn literal<'source>(&self, source: &'source str) -> &'source str {
        source.get(self.begin..self.end).unwrap_or_default()
    }

    /// Return the line number of the beginning of the [`Region`].
    ///
    /// Line numbers start at 1 and are found by counting every newline
    /// that precedes the `Region`.
    pub fn line(&self, source: &str) -> usize {
        let until = min(self.begin, source.len());

        source.as_bytes()[..until]
            .iter()
            .filter(|byte| **byte == b'\n')
            .count()
            + 1
    }
}

impl From<Range<usize>> for Region {
    fn from(value: Range<usize>) -> Self {
        Self {
            begin: value.start,
            end: value.end,
        }
    }
}
