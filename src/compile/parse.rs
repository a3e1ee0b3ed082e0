//! Hashblock parser.
//!
//! Utilizes a Lexer to receive instances of Segment, which it uses to construct
//! the Scope of a new Template containing the Abstract Syntax Tree.
//!
//! Open blocks are tracked on an explicit stack, so the depth of nesting
//! is limited only by memory.
pub mod scope;
pub mod tree;

mod state;

use self::{
    scope::Scope,
    state::BlockState,
    tree::{Node, Output},
};
use crate::{
    compile::lex::{token::Token, Lexer, Segment},
    expression::is_identifier,
    log::{ParseError, ParseErrorKind},
    region::Region,
    Syntax,
};

/// The action requested by a control segment.
enum Control {
    /// Add the Node to the current Scope.
    Append(Node),
    /// Begin a new block.
    Open(BlockState),
    /// Switch the current block to its alternate branch.
    Alternate,
    /// Complete the current block.
    Close,
    /// Nothing to add.
    Skip,
}

pub struct Parser<'source> {
    /// Lexer used to pull from source as segments instead of raw text.
    lexer: Lexer<'source>,
    /// Markers used to classify control segments.
    syntax: &'source Syntax,
}

impl<'source> Parser<'source> {
    /// Create a new Parser from the given string and [`Syntax`].
    #[inline]
    pub fn new(source: &'source str, syntax: &'source Syntax) -> Self {
        Self {
            lexer: Lexer::new(source, &syntax.finder),
            syntax,
        }
    }

    /// Compile the template.
    ///
    /// Returns the root [`Scope`] of the Abstract Syntax Tree.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the blocks of the source are not
    /// balanced, an alternate marker is misplaced, or an iteration block
    /// has no valid binding name.
    pub fn compile(mut self) -> Result<Scope, ParseError> {
        // Blocks that have been opened but not yet closed, innermost last.
        let mut states: Vec<BlockState> = vec![];
        let mut root = Scope::new();

        while let Some(segment) = self.lexer.next() {
            let control = match segment.token {
                Token::Literal => self.parse_literal(segment.inner),
                Token::Control => self.parse_control(segment)?,
            };

            let node = match control {
                Control::Append(node) => node,
                Control::Open(state) => {
                    states.push(state);
                    continue;
                }
                Control::Alternate => {
                    let Some(state) = states.last_mut() else {
                        return Err(self.error(ParseErrorKind::ElseNotAllowed, segment.outer));
                    };
                    if state.has_else() {
                        return Err(self.error(ParseErrorKind::OnlyOneElseAllowed, segment.outer));
                    }
                    state.begin_else();
                    continue;
                }
                Control::Close => match states.pop() {
                    Some(state) => state.close(segment.outer),
                    None => return Err(self.error(ParseErrorKind::TooManyEndings, segment.outer)),
                },
                Control::Skip => continue,
            };

            match states.last_mut() {
                Some(state) => state.target().data.push(node),
                None => root.data.push(node),
            }
        }

        if let Some(state) = states.last() {
            return Err(self.error(ParseErrorKind::UnclosedBlock, state.region()));
        }

        Ok(root)
    }

    /// Parse text that is copied to the output verbatim.
    ///
    /// Empty text produces no Node.
    fn parse_literal(&self, region: Region) -> Control {
        if region.is_empty() {
            Control::Skip
        } else {
            Control::Append(Node::Text(region))
        }
    }

    /// Parse the text between a pair of delimiters.
    ///
    /// Text that matches none of the markers is treated as literal text,
    /// without the delimiters.
    fn parse_control(&self, segment: Segment) -> Result<Control, ParseError> {
        let Segment { inner, outer, .. } = segment;
        let text = inner.literal(self.lexer.source);
        let after = |prefix: &str| Region::new(inner.begin + prefix.len()..inner.end);

        let control = if text.starts_with(&self.syntax.output) {
            Control::Append(Node::Output(Output {
                expression: after(&self.syntax.output),
                region: outer,
            }))
        } else if text == self.syntax.close {
            Control::Close
        } else if text == self.syntax.alternate {
            Control::Alternate
        } else if text.starts_with(&self.syntax.conditional) {
            Control::Open(BlockState::If {
                condition: after(&self.syntax.conditional),
                then_branch: Scope::new(),
                else_branch: None,
                region: outer,
            })
        } else if text.starts_with(&self.syntax.iteration) {
            self.parse_each(after(&self.syntax.iteration), outer)?
        } else {
            self.parse_literal(inner)
        };

        Ok(control)
    }

    /// Parse the remainder of an iteration segment, such as
    /// `locations as location`.
    ///
    /// The last occurrence of the separator divides the collection from the
    /// binding name, so the collection may itself contain the separator.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the separator or binding name is missing,
    /// or the binding name is not a valid identifier.
    fn parse_each(&self, rest: Region, outer: Region) -> Result<Control, ParseError> {
        let text = rest.literal(self.lexer.source);
        let Some(index) = text.rfind(self.syntax.separator.as_str()) else {
            return Err(self.error(ParseErrorKind::ItemReferenceNameRequired, outer));
        };

        let name_begin = rest.begin + index + self.syntax.separator.len();
        let raw = &text[index + self.syntax.separator.len()..];
        let name = raw.trim();
        if name.is_empty() {
            return Err(self.error(ParseErrorKind::ItemReferenceNameRequired, outer));
        }
        if !is_identifier(name) {
            return Err(self.error(ParseErrorKind::InvalidItemReferenceName, outer));
        }

        let leading = raw.len() - raw.trim_start().len();
        let binding = Region::new(name_begin + leading..name_begin + leading + name.len());

        Ok(Control::Open(BlockState::Each {
            items: Region::new(rest.begin..rest.begin + index),
            binding,
            body: Scope::new(),
            else_branch: None,
            region: outer,
        }))
    }

    /// Create a [`ParseError`] pointing at the given [`Region`].
    fn error(&self, kind: ParseErrorKind, region: Region) -> ParseError {
        ParseError::new(kind, self.lexer.source, region)
    }
}

#[cfg(test)]
mod tests {
    use super::{tree::Node, Parser};
    use crate::{log::ParseErrorKind, Builder, Syntax};

    fn parse(source: &str) -> Result<super::Scope, crate::ParseError> {
        Parser::new(source, &Syntax::default()).compile()
    }

    fn parse_err(source: &str) -> (ParseErrorKind, usize) {
        let error = parse(source).unwrap_err();
        (error.kind(), error.line())
    }

    #[test]
    fn test_parse_nodes() {
        let source = "Before##=value##\n##if cond##After\n##/##";
        let scope = parse(source).unwrap();

        assert_eq!(scope.data.len(), 4);
        assert!(matches!(scope.data[0], Node::Text(region) if region.literal(source) == "Before"));
        assert!(matches!(
            &scope.data[1],
            Node::Output(output) if output.expression.literal(source) == "value"
        ));
        assert!(matches!(scope.data[2], Node::Text(region) if region.literal(source) == "\n"));

        let Node::If(block) = &scope.data[3] else {
            panic!("expected an if block");
        };
        assert_eq!(block.condition.literal(source), "cond");
        assert_eq!(block.then_branch.data.len(), 1);
        assert!(block.else_branch.is_empty());
        assert_eq!(block.region.literal(source), "##if cond##After\n##/##");
    }

    #[test]
    fn test_parse_each() {
        let source = "##each data.filter as  location ##<li>##=location##</li>##else##none##/##";
        let scope = parse(source).unwrap();

        let Node::Each(block) = &scope.data[0] else {
            panic!("expected an each block");
        };
        assert_eq!(block.items.literal(source), "data.filter");
        assert_eq!(block.binding.literal(source), "location");
        assert_eq!(block.body.data.len(), 3);
        assert_eq!(block.else_branch.data.len(), 1);
    }

    #[test]
    fn test_parse_each_last_separator() {
        let source = "##each a ? b as c : d as item##x##/##";
        let scope = parse(source).unwrap();

        let Node::Each(block) = &scope.data[0] else {
            panic!("expected an each block");
        };
        assert_eq!(block.items.literal(source), "a ? b as c : d");
        assert_eq!(block.binding.literal(source), "item");
    }

    #[test]
    fn test_parse_nested() {
        let source = "##if a####each b as c####if c##x##else##y##/####/####else##z##/##";
        let scope = parse(source).unwrap();

        let Node::If(outer) = &scope.data[0] else {
            panic!("expected an if block");
        };
        let Node::Each(each) = &outer.then_branch.data[0] else {
            panic!("expected an each block");
        };
        let Node::If(inner) = &each.body.data[0] else {
            panic!("expected an if block");
        };
        assert_eq!(inner.else_branch.data.len(), 1);
        assert!(each.else_branch.is_empty());
        assert_eq!(outer.else_branch.data.len(), 1);
    }

    #[test]
    fn test_parse_deep_nesting() {
        let depth = 100_000;
        let source = format!("{}x{}", "##if a##".repeat(depth), "##/##".repeat(depth));

        assert!(parse(&source).is_ok());
    }

    #[test]
    fn test_parse_unknown_control_is_text() {
        let source = "a##b##c####d";
        let scope = parse(source).unwrap();
        let text: Vec<&str> = scope
            .data
            .iter()
            .map(|node| node.get_region().literal(source))
            .collect();

        assert_eq!(text, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_error_too_many_endings() {
        assert_eq!(
            parse_err("one\ntwo\n##/##"),
            (ParseErrorKind::TooManyEndings, 3)
        );
        assert_eq!(
            parse_err("##if a##\n##/##\n\n##/##"),
            (ParseErrorKind::TooManyEndings, 4)
        );
    }

    #[test]
    fn test_error_else_not_allowed() {
        assert_eq!(
            parse_err("a\n##else##"),
            (ParseErrorKind::ElseNotAllowed, 2)
        );
    }

    #[test]
    fn test_error_only_one_else() {
        assert_eq!(
            parse_err("##if a##\nx##else##y\n##else##z##/##"),
            (ParseErrorKind::OnlyOneElseAllowed, 3)
        );
        assert_eq!(
            parse_err("##each a as b##x##else##y##else##z##/##"),
            (ParseErrorKind::OnlyOneElseAllowed, 1)
        );
    }

    #[test]
    fn test_error_binding_name() {
        assert_eq!(
            parse_err("##each items##x##/##"),
            (ParseErrorKind::ItemReferenceNameRequired, 1)
        );
        assert_eq!(
            parse_err("\n##each items as  ##x##/##"),
            (ParseErrorKind::ItemReferenceNameRequired, 2)
        );
        assert_eq!(
            parse_err("##each items as 2b##x##/##"),
            (ParseErrorKind::InvalidItemReferenceName, 1)
        );
        assert_eq!(
            parse_err("##each items as a.b##x##/##"),
            (ParseErrorKind::InvalidItemReferenceName, 1)
        );
        assert_eq!(
            parse_err("##each items as null##x##/##"),
            (ParseErrorKind::InvalidItemReferenceName, 1)
        );
    }

    #[test]
    fn test_error_unclosed_block() {
        assert_eq!(
            parse_err("##if a##\n##each b as c##\nx##/##"),
            (ParseErrorKind::UnclosedBlock, 1)
        );
        assert_eq!(
            parse_err("##if a##x##/##\n\n##each b as c##"),
            (ParseErrorKind::UnclosedBlock, 3)
        );
    }

    #[test]
    fn test_parse_custom_syntax() {
        let syntax = Builder::new()
            .with_delimiter("%%")
            .with_output("-")
            .with_iteration("for", "in")
            .with_close("end")
            .to_syntax()
            .unwrap();
        let source = "%%for items in item%%%%-item%%%%end%%";
        let scope = Parser::new(source, &syntax).compile().unwrap();

        let Node::Each(block) = &scope.data[0] else {
            panic!("expected an each block");
        };
        assert_eq!(block.binding.literal(source), "item");
        assert!(matches!(&block.body.data[0], Node::Output(_)));
    }
}
