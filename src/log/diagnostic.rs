use super::{Pointer, RED, RESET};
use crate::{log::Visual, region::Region};
use std::fmt::{Debug, Display, Formatter, Result};

/// Describes a failure, and allows adding a contextual help text and visualization.
///
/// # Examples
///
/// Creating a [`Diagnostic`] that includes a [`Visual`] of type [`Pointer`]:
///
/// ```
/// use hashblock::Diagnostic;
///
/// let diagnostic = Diagnostic::build("too_many_endings")
///     .with_pointer("one\n##/##", 4..9)
///     .with_name("index.html")
///     .with_help("there is no open `if` or `each` block to close");
///
/// assert_eq!(diagnostic.get_name(), Some("index.html"));
/// ```
///
/// When printed with `println!("{:#}", diagnostic)` the [`Diagnostic`] produces this output:
///
/// ```text
/// error: too_many_endings
///  --> index.html:2:1
///   |
/// 2 | ##/##
///   | ^^^^^
///   |
///   = help: there is no open `if` or `each` block to close
/// ```
pub struct Diagnostic {
    /// Describes the cause of the [`Diagnostic`].
    reason: String,
    /// A visualization to help illustrate the [`Diagnostic`].
    visual: Option<Box<dyn Visual + Send + Sync>>,
    /// Additional information to display with the [`Diagnostic`].
    help: Option<String>,
    /// The name of the Template that the [`Diagnostic`] comes from.
    name: Option<String>,
}

impl Diagnostic {
    /// Create a new [`Diagnostic`] with the given reason text.
    ///
    /// The additional fields may be populated using the various methods
    /// defined on `Diagnostic`.
    pub fn build<T>(reason: T) -> Self
    where
        T: Into<String>,
    {
        Diagnostic {
            reason: reason.into(),
            name: None,
            visual: None,
            help: None,
        }
    }

    /// Set the name text, which is the name of the [`Template`][`crate::Template`]
    /// that the [`Diagnostic`] is related to.
    pub fn with_name<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.name = Some(text.into());

        self
    }

    /// Set the [`Visual`], which is a visualization that helps illustrate the
    /// cause of the failure.
    pub fn with_visual(mut self, visual: impl Visual + Send + Sync + 'static) -> Self {
        self.visual = Some(Box::new(visual));

        self
    }

    /// Set the visualization to a new [`Pointer`] with the given source text and
    /// [`Region`].
    ///
    /// This is a shortcut for creating a `Pointer` yourself and passing it to
    /// `with_visual`.
    pub fn with_pointer<T>(self, source: &str, region: T) -> Self
    where
        T: Into<Region>,
    {
        self.with_visual(Pointer::new(source, region.into()))
    }

    /// Set the help text, which is contextual information to accompany the
    /// reason text.
    pub fn with_help<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.help = Some(text.into());

        self
    }

    /// Return the reason text.
    pub fn get_reason(&self) -> &str {
        &self.reason
    }

    /// Return the help text, if any.
    pub fn get_help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Return the name of the `Template` that the failure is related to.
    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Debug for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("Diagnostic")
            .field("reason", &self.reason)
            .field("name", &self.name)
            .field("visual", &self.visual)
            .field("help", &self.help)
            .finish()
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if !f.alternate() {
            return write!(f, "error: {}", self.reason);
        }

        write!(f, "{RED}error{RESET}: {}", self.reason)?;
        match &self.visual {
            Some(visual) => visual.display(f, self.name.as_deref(), self.help.as_deref()),
            None => match &self.help {
                Some(help) => write!(f, "\n  = help: {help}\n"),
                None => Ok(()),
            },
        }
    }
}

impl PartialEq for Diagnostic {
    fn eq(&self, other: &Self) -> bool {
        self.reason == other.reason && self.help == other.help && self.name == other.name
    }
}

#[cfg(test)]
mod tests {
    use super::Diagnostic;

    #[test]
    fn test_display_plain() {
        let diagnostic = Diagnostic::build("too_many_endings").with_help("close fewer blocks");

        assert_eq!(diagnostic.to_string(), "error: too_many_endings");
    }

    #[test]
    fn test_display_alternate() {
        let diagnostic = Diagnostic::build("too_many_endings")
            .with_pointer("one\n##/##", 4..9)
            .with_name("index.html")
            .with_help("close fewer blocks");
        let output = format!("{diagnostic:#}");

        assert!(output.contains("--> index.html:2:1"));
        assert!(output.contains("2 | ##/##"));
        assert!(output.contains("^^^^^"));
        assert!(output.contains("= help: close fewer blocks"));
    }

    #[test]
    fn test_display_alternate_without_visual() {
        let diagnostic = Diagnostic::build("missing template").with_help("add it first");
        let output = format!("{diagnostic:#}");

        assert!(output.ends_with("= help: add it first\n"));
    }
}
