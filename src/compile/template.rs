use super::{tree::Node, Parser, Scope};
use crate::{log::ParseError, render::Renderer, Context, RenderError, Syntax};
use tracing::debug;

/// A compiled template that can be rendered with a [`Context`].
///
/// The tree is never modified after compilation, so a `Template` may be
/// rendered from many threads at once.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// The name of the [`Template`].
    name: Option<String>,
    /// The Abstract Syntax Tree generated during compilation.
    scope: Scope,
    /// The source data from which this [`Template`] was generated.
    source: String,
}

impl Template {
    /// Compile a new [`Template`] from the given source and [`Syntax`].
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the source is malformed. When a name
    /// is given, the error refers to the template by that name.
    pub(crate) fn compile(
        source: String,
        name: Option<String>,
        syntax: &Syntax,
    ) -> Result<Self, ParseError> {
        let scope = match Parser::new(&source, syntax).compile() {
            Ok(scope) => scope,
            Err(error) => {
                return Err(match name {
                    Some(name) => error.with_name(name),
                    None => error,
                })
            }
        };
        debug!(
            template = name.as_deref().unwrap_or("?"),
            nodes = scope.data.len(),
            "compiled template"
        );

        Ok(Self {
            name,
            scope,
            source,
        })
    }

    /// Render the [`Template`] with the given [`Context`].
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] when an expression cannot be evaluated.
    /// No output is returned in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use hashblock::{compile, Context};
    /// use serde_json::json;
    ///
    /// let template = compile("##each names as name##<b>##=name##</b>##/##").unwrap();
    /// let context = Context::new().with_value("names", json!(["Zuma", "Venice"]));
    ///
    /// assert_eq!(template.render(&context).unwrap(), "<b>Zuma</b><b>Venice</b>");
    /// ```
    pub fn render(&self, context: &Context) -> Result<String, RenderError> {
        Renderer::new(self).render(context)
    }

    /// Return the name of the [`Template`], if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Return the source text the [`Template`] was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Return the top level [`Node`] instances of the [`Template`].
    pub fn nodes(&self) -> &[Node] {
        &self.scope.data
    }

    pub(crate) fn scope(&self) -> &Scope {
        &self.scope
    }
}
