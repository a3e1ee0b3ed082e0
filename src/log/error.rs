use super::Diagnostic;
use crate::region::Region;
use std::fmt::{Display, Formatter, Result};

/// Describes why a template could not be compiled.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ParseErrorKind {
    /// A close marker was found with no open block.
    TooManyEndings,
    /// An alternate marker was found with no open block.
    ElseNotAllowed,
    /// A second alternate marker was found for the same block.
    OnlyOneElseAllowed,
    /// An iteration block does not name its binding.
    ItemReferenceNameRequired,
    /// An iteration block names a binding that is not an identifier.
    InvalidItemReferenceName,
    /// A block is still open when the template ends.
    UnclosedBlock,
}

impl ParseErrorKind {
    /// Return the stable code of the [`ParseErrorKind`].
    pub fn code(&self) -> &'static str {
        match self {
            ParseErrorKind::TooManyEndings => "too_many_endings",
            ParseErrorKind::ElseNotAllowed => "else_not_allowed",
            ParseErrorKind::OnlyOneElseAllowed => "only_one_else_allowed",
            ParseErrorKind::ItemReferenceNameRequired => "item_reference_name_required",
            ParseErrorKind::InvalidItemReferenceName => "invalid_item_reference_name",
            ParseErrorKind::UnclosedBlock => "unclosed_block",
        }
    }

    /// Return a help text describing how the failure may be fixed.
    fn help(&self) -> &'static str {
        match self {
            ParseErrorKind::TooManyEndings => {
                "there is no open `if` or `each` block to close here"
            }
            ParseErrorKind::ElseNotAllowed => {
                "an alternate branch may only appear inside of an `if` or `each` block"
            }
            ParseErrorKind::OnlyOneElseAllowed => {
                "this block already has an alternate branch, remove one of them"
            }
            ParseErrorKind::ItemReferenceNameRequired => {
                "name the loop item, as in `each items as item`"
            }
            ParseErrorKind::InvalidItemReferenceName => {
                "the loop item name must be an identifier such as `item` or `location`"
            }
            ParseErrorKind::UnclosedBlock => "did you close this block with a close marker?",
        }
    }
}

impl Display for ParseErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.code())
    }
}

/// A template could not be compiled.
///
/// Carries the kind of failure and the 1-based line of the offending
/// control segment. Printing with `{:#}` shows a pointer into the source.
#[derive(Debug, PartialEq)]
pub struct ParseError {
    kind: ParseErrorKind,
    line: usize,
    diagnostic: Diagnostic,
}

impl ParseError {
    /// Create a new [`ParseError`] pointing at the given [`Region`] of the source.
    pub(crate) fn new(kind: ParseErrorKind, source: &str, region: Region) -> Self {
        Self {
            kind,
            line: region.line(source),
            diagnostic: Diagnostic::build(kind.code())
                .with_pointer(source, region)
                .with_help(kind.help()),
        }
    }

    /// Set the name of the template the [`ParseError`] belongs to.
    pub(crate) fn with_name<T>(mut self, name: T) -> Self
    where
        T: Into<String>,
    {
        self.diagnostic = self.diagnostic.with_name(name);

        self
    }

    /// Return the [`ParseErrorKind`].
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    /// Return the line the failure was found on, starting at 1.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Return the [`Diagnostic`] describing the failure.
    pub fn diagnostic(&self) -> &Diagnostic {
        &self.diagnostic
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if f.alternate() {
            return write!(f, "{:#}", self.diagnostic);
        }

        match self.diagnostic.get_name() {
            Some(name) => write!(f, "{} at {name}:{}", self.kind, self.line),
            None => write!(f, "{} at line {}", self.kind, self.line),
        }
    }
}

impl std::error::Error for ParseError {}

/// Describes why an expression could not be evaluated.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EvaluateErrorKind {
    /// The expression is not well formed.
    Syntax,
    /// The expression references a name that is absent from the context.
    UndefinedReference,
    /// An operator or member access was applied to a value of the wrong type.
    IncompatibleTypes,
    /// Something other than a method was called.
    NotCallable,
    /// The method does not exist for the receiver's type.
    UnknownMethod,
    /// A method received arguments it cannot accept.
    InvalidArguments,
    /// An iteration block received something other than a sequence.
    NotIterable,
    /// Arithmetic produced a number that cannot be represented.
    NonFiniteNumber,
}

impl EvaluateErrorKind {
    /// Return the stable code of the [`EvaluateErrorKind`].
    pub fn code(&self) -> &'static str {
        match self {
            EvaluateErrorKind::Syntax => "syntax",
            EvaluateErrorKind::UndefinedReference => "undefined_reference",
            EvaluateErrorKind::IncompatibleTypes => "incompatible_types",
            EvaluateErrorKind::NotCallable => "not_callable",
            EvaluateErrorKind::UnknownMethod => "unknown_method",
            EvaluateErrorKind::InvalidArguments => "invalid_arguments",
            EvaluateErrorKind::NotIterable => "not_iterable",
            EvaluateErrorKind::NonFiniteNumber => "non_finite_number",
        }
    }
}

impl Display for EvaluateErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.code())
    }
}

/// An expression could not be evaluated.
///
/// The [`Region`] is relative to the expression text.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct EvaluateError {
    kind: EvaluateErrorKind,
    region: Region,
    help: Option<String>,
}

impl EvaluateError {
    /// Create a new [`EvaluateError`] covering the given [`Region`].
    pub(crate) fn new<T>(kind: EvaluateErrorKind, region: T) -> Self
    where
        T: Into<Region>,
    {
        Self {
            kind,
            region: region.into(),
            help: None,
        }
    }

    /// Set the help text.
    pub(crate) fn with_help<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.help = Some(text.into());

        self
    }

    /// Return the [`EvaluateErrorKind`].
    pub fn kind(&self) -> EvaluateErrorKind {
        self.kind
    }

    /// Return the [`Region`] of the expression text that caused the failure.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Return the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }
}

impl Display for EvaluateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match &self.help {
            Some(help) => write!(f, "{}: {help}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for EvaluateError {}

/// A template could not be rendered.
///
/// Wraps the [`EvaluateErrorKind`] of the failed expression along with the
/// 1-based line of the template it was found on.
#[derive(Debug, PartialEq)]
pub struct RenderError {
    kind: EvaluateErrorKind,
    line: usize,
    diagnostic: Diagnostic,
}

impl RenderError {
    /// Position an [`EvaluateError`] within the template source.
    ///
    /// The `expression` [`Region`] locates the expression text within `source`.
    pub(crate) fn from_evaluate(
        error: EvaluateError,
        source: &str,
        expression: Region,
        name: Option<&str>,
    ) -> Self {
        let mut region = error.region.offset(expression.begin);
        if region.is_empty() || region.end > expression.end {
            region = region.combine(expression);
        }

        let mut diagnostic = Diagnostic::build(error.kind.code()).with_pointer(source, region);
        if let Some(help) = error.help {
            diagnostic = diagnostic.with_help(help);
        }
        if let Some(name) = name {
            diagnostic = diagnostic.with_name(name);
        }

        Self {
            kind: error.kind,
            line: region.line(source),
            diagnostic,
        }
    }

    /// Return the [`EvaluateErrorKind`] of the expression that failed.
    pub fn kind(&self) -> EvaluateErrorKind {
        self.kind
    }

    /// Return the line the failed expression was found on, starting at 1.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Return the [`Diagnostic`] describing the failure.
    pub fn diagnostic(&self) -> &Diagnostic {
        &self.diagnostic
    }
}

impl Display for RenderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if f.alternate() {
            return write!(f, "{:#}", self.diagnostic);
        }

        write!(f, "{} at line {}", self.kind, self.line)?;
        if let Some(help) = self.diagnostic.get_help() {
            write!(f, ": {help}")?;
        }

        Ok(())
    }
}

impl std::error::Error for RenderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_line() {
        let source = "a\nb\n##/##";
        let error = ParseError::new(ParseErrorKind::TooManyEndings, source, Region::new(4..9));

        assert_eq!(error.kind(), ParseErrorKind::TooManyEndings);
        assert_eq!(error.line(), 3);
        assert_eq!(error.to_string(), "too_many_endings at line 3");
        assert_eq!(
            error.with_name("index.html").to_string(),
            "too_many_endings at index.html:3"
        );
    }

    #[test]
    fn test_render_error_translates_region() {
        // The expression `missing` begins at byte 10, on the second line.
        let source = "Before\n##=missing##";
        let error = EvaluateError::new(EvaluateErrorKind::UndefinedReference, 0..7)
            .with_help("`missing` is not defined");
        let error = RenderError::from_evaluate(error, source, Region::new(10..17), Some("t"));

        assert_eq!(error.kind(), EvaluateErrorKind::UndefinedReference);
        assert_eq!(error.line(), 2);
        assert_eq!(
            error.to_string(),
            "undefined_reference at line 2: `missing` is not defined"
        );
        assert!(format!("{error:#}").contains("--> t:2:4"));
    }
}
