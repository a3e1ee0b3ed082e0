use crate::{syntax::Syntax, Error};
use morel::Finder;

/// Identifier of the delimiter within the [`Finder`].
///
/// Keywords are only recognized at the beginning of a segment enclosed
/// by delimiters, so the delimiter is the only marker that must be found
/// by scanning.
const DELIMITER: usize = 0;

/// Provides methods to build a `Syntax`.
///
/// # Example
///
/// ```
/// use hashblock::Builder;
///
/// let syntax = Builder::new()
///     .with_delimiter("%%")
///     .with_iteration("for", "in")
///     .to_syntax();
///
/// assert!(syntax.is_ok());
/// ```
pub struct Builder<'marker> {
    delimiter: &'marker str,
    output: &'marker str,
    conditional: &'marker str,
    iteration: (&'marker str, &'marker str),
    alternate: &'marker str,
    close: &'marker str,
}

impl<'marker> Builder<'marker> {
    /// Create a new [`Builder`].
    ///
    /// The `Builder` has default markers:
    ///
    /// ```text
    /// Delimiter: ##
    /// Output: ##=name##
    /// Conditional: ##if name## ... ##/##
    /// Iteration: ##each names as name## ... ##/##
    /// Alternate: ##else##
    /// ```
    ///
    /// To proceed with these defaults, you may immediately call `to_syntax` to receive the
    /// [`Syntax`] instance.
    #[inline]
    pub fn new() -> Self {
        Self {
            delimiter: "##",
            output: "=",
            conditional: "if",
            iteration: ("each", "as"),
            alternate: "else",
            close: "/",
        }
    }

    /// Set the delimiter that surrounds control segments.
    ///
    /// # Examples
    ///
    /// ```
    /// use hashblock::Builder;
    ///
    /// let mut builder = Builder::new();
    /// builder.set_delimiter("%%");
    /// ```
    #[inline]
    pub fn set_delimiter(&mut self, delimiter: &'marker str) {
        self.delimiter = delimiter;
    }

    /// Set the delimiter that surrounds control segments.
    ///
    /// Returns the [`Builder`], so additional methods may be chained.
    #[inline]
    pub fn with_delimiter(mut self, delimiter: &'marker str) -> Self {
        self.set_delimiter(delimiter);

        self
    }

    /// Set the sigil that marks an escaped output segment.
    #[inline]
    pub fn set_output(&mut self, sigil: &'marker str) {
        self.output = sigil;
    }

    /// Set the sigil that marks an escaped output segment.
    ///
    /// Returns the [`Builder`], so additional methods may be chained.
    #[inline]
    pub fn with_output(mut self, sigil: &'marker str) -> Self {
        self.set_output(sigil);

        self
    }

    /// Set the keyword that begins a conditional block.
    #[inline]
    pub fn set_conditional(&mut self, keyword: &'marker str) {
        self.conditional = keyword;
    }

    /// Set the keyword that begins a conditional block.
    ///
    /// Returns the [`Builder`], so additional methods may be chained.
    #[inline]
    pub fn with_conditional(mut self, keyword: &'marker str) -> Self {
        self.set_conditional(keyword);

        self
    }

    /// Set the keyword that begins an iteration block, and the keyword
    /// that separates the collection from the binding name.
    #[inline]
    pub fn set_iteration(&mut self, keyword: &'marker str, separator: &'marker str) {
        self.iteration = (keyword, separator);
    }

    /// Set the keyword that begins an iteration block, and the keyword
    /// that separates the collection from the binding name.
    ///
    /// Returns the [`Builder`], so additional methods may be chained.
    #[inline]
    pub fn with_iteration(mut self, keyword: &'marker str, separator: &'marker str) -> Self {
        self.set_iteration(keyword, separator);

        self
    }

    /// Set the keyword that begins an alternate branch.
    #[inline]
    pub fn set_alternate(&mut self, keyword: &'marker str) {
        self.alternate = keyword;
    }

    /// Set the keyword that begins an alternate branch.
    ///
    /// Returns the [`Builder`], so additional methods may be chained.
    #[inline]
    pub fn with_alternate(mut self, keyword: &'marker str) -> Self {
        self.set_alternate(keyword);

        self
    }

    /// Set the marker that closes a block.
    #[inline]
    pub fn set_close(&mut self, marker: &'marker str) {
        self.close = marker;
    }

    /// Set the marker that closes a block.
    ///
    /// Returns the [`Builder`], so additional methods may be chained.
    #[inline]
    pub fn with_close(mut self, marker: &'marker str) -> Self {
        self.set_close(marker);

        self
    }

    /// Return a Syntax instance from the markers in this [`Builder`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when any marker is empty, or a keyword contains
    /// whitespace.
    pub fn to_syntax(self) -> Result<Syntax, Error> {
        let markers = [
            ("delimiter", self.delimiter),
            ("output", self.output),
            ("conditional", self.conditional),
            ("iteration", self.iteration.0),
            ("separator", self.iteration.1),
            ("alternate", self.alternate),
            ("close", self.close),
        ];

        for (name, marker) in markers {
            if marker.is_empty() {
                return Err(Error::Syntax(format!("the {name} marker must not be empty")));
            }
            if marker.contains(char::is_whitespace) {
                return Err(Error::Syntax(format!(
                    "the {name} marker `{marker}` must not contain whitespace"
                )));
            }
        }

        Ok(self.build())
    }

    /// Build the [`Syntax`] without validating the markers.
    pub(crate) fn build(self) -> Syntax {
        let markers = vec![(DELIMITER, self.delimiter.to_string())];
        let (iteration, separator) = self.iteration;

        Syntax {
            finder: Finder::new(morel::Syntax::new(markers)),
            output: self.output.to_string(),
            conditional: format!("{} ", self.conditional),
            iteration: format!("{iteration} "),
            separator: format!(" {separator} "),
            alternate: self.alternate.to_string(),
            close: self.close.to_string(),
        }
    }
}

impl Default for Builder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Builder;
    use crate::Error;

    #[test]
    fn test_default_markers() {
        let syntax = Builder::new().to_syntax().unwrap();

        assert_eq!(syntax.output, "=");
        assert_eq!(syntax.conditional, "if ");
        assert_eq!(syntax.iteration, "each ");
        assert_eq!(syntax.separator, " as ");
        assert_eq!(syntax.alternate, "else");
        assert_eq!(syntax.close, "/");
    }

    #[test]
    fn test_custom_delimiter_is_found() {
        let syntax = Builder::new().with_delimiter("%%").to_syntax().unwrap();

        assert_eq!(syntax.finder.next("a##b%%c", 0), Some((0, 4, 6)));
        assert_eq!(syntax.finder.next("a##b%%c", 6), None);
    }

    #[test]
    fn test_empty_marker() {
        let result = Builder::new().with_delimiter("").to_syntax();

        assert!(matches!(result, Err(Error::Syntax(_))));
    }

    #[test]
    fn test_whitespace_marker() {
        let result = Builder::new().with_iteration("for", "in side").to_syntax();

        assert!(matches!(result, Err(Error::Syntax(_))));
    }
}
