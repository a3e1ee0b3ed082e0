pub mod token;

use self::token::Token;
use crate::{
    expression::Operator,
    log::{expected_operator, EvaluateError, EvaluateErrorKind, UNEXPECTED_TOKEN},
    region::Region,
};

pub type TokenResult = Result<Option<(Token, Region)>, EvaluateError>;

/// Provides methods to read an expression as [`Token`] instances.
pub struct Lexer<'source> {
    /// Reference to the expression text.
    pub source: &'source str,
    /// Position within source.
    pub cursor: usize,
}

impl<'source> Lexer<'source> {
    /// Create a new [`Lexer`] over the given expression.
    #[inline]
    pub fn new(source: &'source str) -> Self {
        Self { source, cursor: 0 }
    }

    /// Return the next [`Token`] and [`Region`].
    ///
    /// Any instance of [`Token::Whitespace`] is ignored.
    ///
    /// # Errors
    ///
    /// Returns an [`EvaluateError`] when an unexpected character is found.
    pub fn next(&mut self) -> TokenResult {
        loop {
            let from = self.cursor;
            let mut iterator = self.source[from..]
                .char_indices()
                .map(|(d, c)| (from + d, c));
            let Some((index, char)) = iterator.next() else {
                return Ok(None);
            };

            let (token, region) = match char {
                '+' => self.advance(index, 1, Token::Operator(Operator::Add)),
                '-' => self.advance(index, 1, Token::Operator(Operator::Subtract)),
                '*' => self.advance(index, 1, Token::Operator(Operator::Multiply)),
                '/' => self.advance(index, 1, Token::Operator(Operator::Divide)),
                '%' => self.advance(index, 1, Token::Operator(Operator::Remainder)),
                '.' => self.advance(index, 1, Token::Period),
                ',' => self.advance(index, 1, Token::Comma),
                ':' => self.advance(index, 1, Token::Colon),
                '?' => self.advance(index, 1, Token::Question),
                '(' => self.advance(index, 1, Token::LeftParen),
                ')' => self.advance(index, 1, Token::RightParen),
                '[' => self.advance(index, 1, Token::LeftBracket),
                ']' => self.advance(index, 1, Token::RightBracket),
                '"' | '\'' => self.lex_string(iterator, index, char)?,
                '=' | '!' | '>' | '<' | '|' | '&' => self.lex_operator(index, char)?,
                c if c.is_whitespace() => self.lex_whitespace(iterator, index),
                c if c.is_ascii_digit() => self.lex_digit(index),
                c if is_ident_start(c) => self.lex_ident_or_keyword(iterator, index),
                _ => {
                    return Err(EvaluateError::new(
                        EvaluateErrorKind::Syntax,
                        index..index + char.len_utf8(),
                    )
                    .with_help(format!("{UNEXPECTED_TOKEN} `{char}`")))
                }
            };

            if token != Token::Whitespace {
                return Ok(Some((token, region)));
            }
        }
    }

    /// Move the cursor past a token of the given length.
    fn advance(&mut self, from: usize, length: usize, token: Token) -> (Token, Region) {
        self.cursor = from + length;

        (token, (from..self.cursor).into())
    }

    /// Return a [`Token`] and [`Region`] based on the operator character
    /// and the characters that follow it.
    ///
    /// All of these are recognized:
    ///
    /// `===`, `!==`, `==`, `!=`, `>=`, `<=`, `||`, `&&`, `>`, `<`, `!`
    ///
    /// # Errors
    ///
    /// Returns an [`EvaluateError`] for a lone `=`, `|` or `&`.
    fn lex_operator(
        &mut self,
        from: usize,
        previous: char,
    ) -> Result<(Token, Region), EvaluateError> {
        let rest = &self.source[from..];
        let (length, token) = match previous {
            '=' if rest.starts_with("===") => (3, Token::Operator(Operator::Equal)),
            '=' if rest.starts_with("==") => (2, Token::Operator(Operator::Equal)),
            '!' if rest.starts_with("!==") => (3, Token::Operator(Operator::NotEqual)),
            '!' if rest.starts_with("!=") => (2, Token::Operator(Operator::NotEqual)),
            '>' if rest.starts_with(">=") => (2, Token::Operator(Operator::GreaterOrEqual)),
            '<' if rest.starts_with("<=") => (2, Token::Operator(Operator::LesserOrEqual)),
            '|' if rest.starts_with("||") => (2, Token::Operator(Operator::Or)),
            '&' if rest.starts_with("&&") => (2, Token::Operator(Operator::And)),
            '!' => (1, Token::Exclamation),
            '>' => (1, Token::Operator(Operator::Greater)),
            '<' => (1, Token::Operator(Operator::Lesser)),
            _ => {
                return Err(EvaluateError::new(EvaluateErrorKind::Syntax, from..from + 1)
                    .with_help(expected_operator(previous)));
            }
        };

        Ok(self.advance(from, length, token))
    }

    /// Return a [`Token`] and [`Region`] containing [`Token::Number`].
    ///
    /// A period is only part of the number when a digit follows it, so
    /// `1.5` is one number while `items.0` is not.
    fn lex_digit(&mut self, from: usize) -> (Token, Region) {
        let bytes = self.source.as_bytes();
        let mut to = from;
        while to < bytes.len() && bytes[to].is_ascii_digit() {
            to += 1;
        }
        if to + 1 < bytes.len() && bytes[to] == b'.' && bytes[to + 1].is_ascii_digit() {
            to += 1;
            while to < bytes.len() && bytes[to].is_ascii_digit() {
                to += 1;
            }
        }
        self.cursor = to;

        (Token::Number, (from..to).into())
    }

    /// Return a [`Token`] and [`Region`] containing [`Token::Whitespace`].
    fn lex_whitespace<T>(&mut self, mut iter: T, from: usize) -> (Token, Region)
    where
        T: Iterator<Item = (usize, char)>,
    {
        loop {
            match iter.next() {
                Some((index, char)) if !char.is_whitespace() => {
                    self.cursor = index;

                    break (Token::Whitespace, (from..index).into());
                }
                Some((_, _)) => continue,
                None => {
                    self.cursor = self.source.len();

                    break (Token::Whitespace, (from..self.source.len()).into());
                }
            }
        }
    }

    /// Return a [`Token`] and [`Region`] containing [`Token::String`] using
    /// the given iterator.
    ///
    /// # Errors
    ///
    /// Returns an [`EvaluateError`] when the string is never closed.
    fn lex_string<T>(
        &mut self,
        mut iter: T,
        from: usize,
        quote: char,
    ) -> Result<(Token, Region), EvaluateError>
    where
        T: Iterator<Item = (usize, char)>,
    {
        let mut escaped = false;
        loop {
            match iter.next() {
                Some((index, char)) if char == quote && !escaped => {
                    // Add one to the index of the character to comply with string slice
                    // semantics.
                    let to = index + 1;
                    self.cursor = to;

                    return Ok((Token::String, (from..to).into()));
                }
                Some((_, char)) => {
                    escaped = char == '\\' && !escaped;
                }
                None => {
                    return Err(
                        EvaluateError::new(EvaluateErrorKind::Syntax, from..self.source.len())
                            .with_help(format!(
                                "this might be an undelimited string, try closing it with `{quote}`"
                            )),
                    );
                }
            }
        }
    }

    /// Return a [`Token`] and [`Region`] from the given iterator.
    ///
    /// The `Token` will be [`Token::Identifier`] or one of the literal keywords.
    fn lex_ident_or_keyword<T>(&mut self, mut iter: T, from: usize) -> (Token, Region)
    where
        T: Iterator<Item = (usize, char)>,
    {
        let to = loop {
            match iter.next() {
                Some((index, char)) if !is_ident_continue(char) => break index,
                Some((_, _)) => continue,
                None => break self.source.len(),
            }
        };

        let token = match &self.source[from..to] {
            "true" => Token::True,
            "false" => Token::False,
            "null" | "undefined" => Token::Null,
            _ => Token::Identifier,
        };
        self.cursor = to;

        (token, (from..to).into())
    }
}

/// Return true if the given character is a recognized beginning identifier,
/// meaning '_', '$' or an `xid_start`.
pub fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || unicode_ident::is_xid_start(c)
}

/// Return true if the given character is a recognized continue identifier,
/// meaning '$' or an `xid_continue`.
pub fn is_ident_continue(c: char) -> bool {
    c == '$' || unicode_ident::is_xid_continue(c)
}

/// Return true if the given text is a single identifier that is not one
/// of the literal keywords.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    let valid = match chars.next() {
        Some(first) => is_ident_start(first) && chars.all(is_ident_continue),
        None => false,
    };

    valid && !matches!(text, "true" | "false" | "null" | "undefined")
}
