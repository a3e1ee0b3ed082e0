//! Expression parser.
//!
//! Utilizes a Lexer to receive instances of Token, which it arranges into an
//! [`Expr`] tree by precedence climbing.
use super::{
    lex::{token::Token, Lexer, TokenResult},
    tree::{Array, Binary, Call, Conditional, Expr, Index, Literal, Member, Prefix, Unary},
    Operator,
};
use crate::{
    format::number_value,
    log::{EvaluateError, EvaluateErrorKind, UNEXPECTED_EOF, UNEXPECTED_TOKEN},
    region::Region,
};
use serde_json::Value;

pub struct Parser<'source> {
    /// Lexer used to pull from source as tokens instead of raw text.
    lexer: Lexer<'source>,
    /// Store peeked tokens.
    ///
    /// Double option is used to remember when the next token is None.
    buffer: Option<Option<(Token, Region)>>,
}

impl<'source> Parser<'source> {
    /// Create a new Parser from the given string.
    #[inline]
    pub fn new(source: &'source str) -> Self {
        Self {
            lexer: Lexer::new(source),
            buffer: None,
        }
    }

    /// Parse the entire source as a single [`Expr`].
    ///
    /// # Errors
    ///
    /// Returns an [`EvaluateError`] with [`EvaluateErrorKind::Syntax`] when
    /// the source is empty, is not well formed, or has tokens left over
    /// after a complete expression.
    pub fn parse(mut self) -> Result<Expr, EvaluateError> {
        let expression = self.parse_expression(0)?;

        match self.next()? {
            Some((token, region)) => Err(self.error(region, format!("{UNEXPECTED_TOKEN} {token}"))),
            None => Ok(expression),
        }
    }

    /// Parse an expression whose binary operators all bind tighter than
    /// `minimum`.
    ///
    /// A conditional (`a ? b : c`) binds loosest of all, so it is only
    /// recognized when `minimum` is zero.
    fn parse_expression(&mut self, minimum: u8) -> Result<Expr, EvaluateError> {
        let mut left = self.parse_unary()?;

        loop {
            match self.peek()? {
                Some((Token::Operator(operator), _)) if operator.precedence() > minimum => {
                    self.next()?;
                    let right = self.parse_expression(operator.precedence())?;
                    let region = left.get_region().combine(right.get_region());

                    left = Expr::Binary(Binary {
                        left: Box::new(left),
                        operator,
                        right: Box::new(right),
                        region,
                    });
                }
                Some((Token::Question, _)) if minimum == 0 => {
                    self.next()?;
                    let then = self.parse_expression(0)?;
                    self.next_must(Token::Colon)?;
                    let otherwise = self.parse_expression(0)?;
                    let region = left.get_region().combine(otherwise.get_region());

                    left = Expr::Conditional(Conditional {
                        condition: Box::new(left),
                        then: Box::new(then),
                        otherwise: Box::new(otherwise),
                        region,
                    });
                }
                _ => break,
            }
        }

        Ok(left)
    }

    /// Parse an operand, along with any prefix operators in front of it.
    fn parse_unary(&mut self) -> Result<Expr, EvaluateError> {
        let operator = match self.peek()? {
            Some((Token::Exclamation, region)) => Some((Prefix::Not, region)),
            Some((Token::Operator(Operator::Subtract), region)) => Some((Prefix::Negate, region)),
            Some((Token::Operator(Operator::Add), region)) => Some((Prefix::Plus, region)),
            _ => None,
        };

        match operator {
            Some((operator, region)) => {
                self.next()?;
                let operand = self.parse_unary()?;
                let region = region.combine(operand.get_region());

                Ok(Expr::Unary(Unary {
                    operator,
                    operand: Box::new(operand),
                    region,
                }))
            }
            None => self.parse_postfix(),
        }
    }

    /// Parse a primary expression followed by any number of member accesses,
    /// index accesses and calls.
    fn parse_postfix(&mut self) -> Result<Expr, EvaluateError> {
        let mut expression = self.parse_primary()?;

        loop {
            if self.next_is(Token::Period)? {
                self.next()?;
                let (_, name) = self.next_must(Token::Identifier)?;
                let region = expression.get_region().combine(name);

                expression = Expr::Member(Member {
                    receiver: Box::new(expression),
                    name,
                    region,
                });
            } else if self.next_is(Token::LeftBracket)? {
                self.next()?;
                let index = self.parse_expression(0)?;
                let (_, close) = self.next_must(Token::RightBracket)?;
                let region = expression.get_region().combine(close);

                expression = Expr::Index(Index {
                    receiver: Box::new(expression),
                    index: Box::new(index),
                    region,
                });
            } else if self.next_is(Token::LeftParen)? {
                self.next()?;
                let (arguments, close) = self.parse_list(Token::RightParen)?;
                let region = expression.get_region().combine(close);

                expression = Expr::Call(Call {
                    callee: Box::new(expression),
                    arguments,
                    region,
                });
            } else {
                break;
            }
        }

        Ok(expression)
    }

    /// Parse a literal, a name, a parenthesized expression or an array.
    fn parse_primary(&mut self) -> Result<Expr, EvaluateError> {
        let (token, region) = self.next_any_must()?;

        let expression = match token {
            Token::Number => Expr::Literal(self.parse_number_literal(region)?),
            Token::String => Expr::Literal(Literal {
                value: Value::String(self.parse_string(region)),
                region,
            }),
            Token::True => Expr::Literal(Literal {
                value: Value::Bool(true),
                region,
            }),
            Token::False => Expr::Literal(Literal {
                value: Value::Bool(false),
                region,
            }),
            Token::Null => Expr::Literal(Literal {
                value: Value::Null,
                region,
            }),
            Token::Identifier => Expr::Variable(region),
            Token::LeftParen => {
                let inner = self.parse_expression(0)?;
                self.next_must(Token::RightParen)?;

                inner
            }
            Token::LeftBracket => {
                let (items, close) = self.parse_list(Token::RightBracket)?;

                Expr::Array(Array {
                    items,
                    region: region.combine(close),
                })
            }
            token => {
                return Err(self.error(region, format!("{UNEXPECTED_TOKEN} {token}")));
            }
        };

        Ok(expression)
    }

    /// Parse a comma separated list of expressions ending with `close`.
    ///
    /// Returns the expressions and the Region of the closing token.
    fn parse_list(&mut self, close: Token) -> Result<(Vec<Expr>, Region), EvaluateError> {
        let mut items = vec![];

        if self.next_is(close)? {
            let (_, region) = self.next_must(close)?;
            return Ok((items, region));
        }

        loop {
            items.push(self.parse_expression(0)?);

            match self.next_any_must()? {
                (Token::Comma, _) => continue,
                (token, region) if token == close => return Ok((items, region)),
                (token, region) => {
                    return Err(self.error(
                        region,
                        format!("expected comma (,) or {close}, found {token}"),
                    ))
                }
            }
        }
    }

    /// Parse a Literal containing a Value::Number from the given Region.
    ///
    /// # Errors
    ///
    /// Returns an error if the literal value of the Region cannot be
    /// represented as a finite number.
    fn parse_number_literal(&self, region: Region) -> Result<Literal, EvaluateError> {
        let value = region
            .literal(self.lexer.source)
            .parse::<f64>()
            .ok()
            .and_then(number_value)
            .ok_or_else(|| self.error(region, "unrecognizable number"))?;

        Ok(Literal { value, region })
    }

    /// Parse a String from the literal value of the given Region.
    ///
    /// The Region includes the quotes. An escaped character that has no
    /// special meaning stands for itself.
    fn parse_string(&self, region: Region) -> String {
        let window = region.literal(self.lexer.source);
        let inner = window.get(1..window.len().saturating_sub(1)).unwrap_or_default();
        if !inner.contains('\\') {
            return inner.to_owned();
        }

        let mut string = String::with_capacity(inner.len());
        let mut iter = inner.chars();
        while let Some(c) = iter.next() {
            if c != '\\' {
                string.push(c);
                continue;
            }
            match iter.next() {
                Some('n') => string.push('\n'),
                Some('r') => string.push('\r'),
                Some('t') => string.push('\t'),
                Some(other) => string.push(other),
                None => string.push('\\'),
            }
        }

        string
    }

    /// Create a syntax [`EvaluateError`] covering the given Region.
    fn error<T>(&self, region: Region, help: T) -> EvaluateError
    where
        T: Into<String>,
    {
        EvaluateError::new(EvaluateErrorKind::Syntax, region).with_help(help)
    }

    /// Create a syntax [`EvaluateError`] at the end of the source.
    fn error_eof<T>(&self, help: T) -> EvaluateError
    where
        T: Into<String>,
    {
        let length = self.lexer.source.len();

        EvaluateError::new(EvaluateErrorKind::Syntax, length..length)
            .with_help(format!("{UNEXPECTED_EOF}, {}", help.into()))
    }

    /// Peek the next token.
    ///
    /// # Errors
    ///
    /// Propagates any error reported by the underlying Lexer.
    fn peek(&mut self) -> TokenResult {
        if let o @ None = &mut self.buffer {
            *o = Some(self.lexer.next()?);
        }

        Ok(self.buffer.flatten())
    }

    /// Get the next token.
    ///
    /// Prefers to pull a token from the internal buffer first, but will pull from
    /// the lexer when the buffer is empty.
    fn next(&mut self) -> TokenResult {
        match self.buffer.take() {
            Some(t) => Ok(t),
            None => self.lexer.next(),
        }
    }

    /// Returns true if the given token matches the upcoming token.
    fn next_is(&mut self, expect: Token) -> Result<bool, EvaluateError> {
        Ok(self.peek()?.is_some_and(|(token, _)| token == expect))
    }

    /// Get the next token, and compare it to the given token.
    ///
    /// # Errors
    ///
    /// An error is returned if the next token does not match the given token,
    /// or when [next()] returns None.
    fn next_must(&mut self, expect: Token) -> Result<(Token, Region), EvaluateError> {
        match self.next()? {
            Some((token, region)) if token == expect => Ok((token, region)),
            Some((token, region)) => {
                Err(self.error(region, format!("expected {expect}, found {token}")))
            }
            None => Err(self.error_eof(format!("expected {expect}"))),
        }
    }

    /// Get the next token.
    ///
    /// Similar to "next()" but requires that a token is returned.
    fn next_any_must(&mut self) -> Result<(Token, Region), EvaluateError> {
        match self.next()? {
            Some(next) => Ok(next),
            None => Err(self.error_eof("expected a value")),
        }
    }
}
