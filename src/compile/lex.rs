pub mod token;

use self::token::Token;
use crate::region::Region;
use morel::Finder;

/// A single delimiter separated part of the source.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Segment {
    /// Kind of the segment.
    pub token: Token,
    /// Region of the text, excluding the delimiters.
    pub inner: Region,
    /// Region of the text, including the delimiters on either side.
    pub outer: Region,
}

/// Splits a source string into alternating literal and control [`Segment`]
/// instances.
///
/// The first segment is always literal. A control segment that is never
/// closed runs to the end of the source.
pub struct Lexer<'source> {
    /// Reference to the source text.
    pub source: &'source str,
    /// Position within source.
    pub cursor: usize,
    /// Compiled [`Finder`] instance used to search for the delimiter
    /// in the source text.
    finder: &'source Finder,
    /// Kind of the segment that will be returned next.
    state: Token,
    /// Start of the delimiter that opened the current segment.
    opened: usize,
    /// True after the final segment has been returned.
    finished: bool,
}

impl<'source> Lexer<'source> {
    /// Create a new [`Lexer`] from the given source and [`Finder`].
    #[inline]
    pub fn new(source: &'source str, finder: &'source Finder) -> Self {
        Self {
            source,
            cursor: 0,
            finder,
            state: Token::Literal,
            opened: 0,
            finished: false,
        }
    }

    /// Return the next [`Segment`].
    ///
    /// Empty segments are returned as well, so the alternation of kinds
    /// is never broken.
    pub fn next(&mut self) -> Option<Segment> {
        if self.finished {
            return None;
        }

        let from = self.cursor;
        let (inner, next_opened) = match self.finder.next(self.source, from) {
            Some((_, marker_begin, marker_end)) => {
                self.cursor = marker_end;
                ((from..marker_begin).into(), marker_begin)
            }
            None => {
                self.cursor = self.source.len();
                self.finished = true;
                ((from..self.source.len()).into(), self.source.len())
            }
        };

        let segment = Segment {
            token: self.state,
            inner,
            outer: Region::new(self.opened..self.cursor),
        };
        self.state = self.state.flip();
        self.opened = next_opened;

        Some(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::{token::Token, Lexer, Segment};
    use crate::{region::Region, Syntax};

    #[test]
    fn test_lex_alternates() {
        let source = "Before##=value##\n##if cond##After\n##/##";
        let syntax = Syntax::default();
        let mut lexer = Lexer::new(source, &syntax.finder);

        let expect = [
            (Token::Literal, 0..6),
            (Token::Control, 8..14),
            (Token::Literal, 16..17),
            (Token::Control, 19..26),
            (Token::Literal, 28..34),
            (Token::Control, 36..37),
            (Token::Literal, 39..39),
        ];
        for (token, inner) in expect {
            let segment = lexer.next().unwrap();
            assert_eq!(segment.token, token);
            assert_eq!(segment.inner, Region::new(inner));
        }

        assert_eq!(lexer.next(), None);
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_lex_outer_includes_delimiters() {
        let source = "a##=b##";
        let syntax = Syntax::default();
        let mut lexer = Lexer::new(source, &syntax.finder);

        lexer.next();
        assert_eq!(
            lexer.next(),
            Some(Segment {
                token: Token::Control,
                inner: Region::new(3..5),
                outer: Region::new(1..7),
            })
        );
    }

    #[test]
    fn test_lex_unclosed_control() {
        let source = "text##if open";
        let syntax = Syntax::default();
        let mut lexer = Lexer::new(source, &syntax.finder);

        assert_eq!(lexer.next().map(|s| s.token), Some(Token::Literal));
        let control = lexer.next().unwrap();
        assert_eq!(control.token, Token::Control);
        assert_eq!(control.inner.literal(source), "if open");
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_lex_no_delimiter() {
        let source = "plain text";
        let syntax = Syntax::default();
        let mut lexer = Lexer::new(source, &syntax.finder);

        assert_eq!(lexer.next().map(|s| s.inner), Some(Region::new(0..10)));
        assert_eq!(lexer.next(), None);
    }
}
