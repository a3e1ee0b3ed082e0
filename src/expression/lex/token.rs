use crate::expression::Operator;
use std::fmt::Display;

/// Types emitted by the expression Lexer.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Token {
    /// String literal, including the surrounding quotes.
    String,
    /// Number literal.
    Number,
    /// Identifier (unquoted name).
    Identifier,
    /// Whitespace between other tokens.
    Whitespace,
    /// A boolean true.
    True,
    /// A boolean false.
    False,
    /// `null` or `undefined`.
    Null,
    /// .
    Period,
    /// ,
    Comma,
    /// :
    Colon,
    /// ?
    Question,
    /// !
    Exclamation,
    /// (
    LeftParen,
    /// )
    RightParen,
    /// [
    LeftBracket,
    /// ]
    RightBracket,
    /// Describes an action taken on one or two values.
    Operator(Operator),
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::String => write!(f, "string"),
            Token::Number => write!(f, "number"),
            Token::Identifier => write!(f, "identifier"),
            Token::Whitespace => write!(f, "whitespace"),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Null => write!(f, "null"),
            Token::Period => write!(f, "period (.)"),
            Token::Comma => write!(f, "comma (,)"),
            Token::Colon => write!(f, "colon (:)"),
            Token::Question => write!(f, "question mark (?)"),
            Token::Exclamation => write!(f, "exclamation (!)"),
            Token::LeftParen => write!(f, "left parenthesis (()"),
            Token::RightParen => write!(f, "right parenthesis ())"),
            Token::LeftBracket => write!(f, "left bracket ([)"),
            Token::RightBracket => write!(f, "right bracket (])"),
            Token::Operator(operator) => write!(f, "operator {operator}"),
        }
    }
}
