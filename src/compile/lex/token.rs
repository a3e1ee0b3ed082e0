/// Types emitted by the segment Lexer.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Token {
    /// Text outside of the delimiters, copied to the output verbatim.
    Literal,
    /// Text between a pair of delimiters.
    Control,
}

impl Token {
    /// Return the kind of the segment that follows this one.
    ///
    /// Segments strictly alternate, beginning with [`Token::Literal`].
    pub fn flip(self) -> Self {
        match self {
            Token::Literal => Token::Control,
            Token::Control => Token::Literal,
        }
    }
}
