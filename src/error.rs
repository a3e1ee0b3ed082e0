use crate::log::{ParseError, RenderError};
use std::{
    fmt::{Display, Formatter},
    io,
    path::PathBuf,
};

/// Crate level error type.
///
/// Compiling a [`Template`][`crate::Template`] only ever fails with a
/// [`ParseError`], and rendering one only ever fails with a [`RenderError`].
/// This type gathers those together with the failures of the surrounding
/// operations, such as reading template files.
#[derive(Debug)]
pub enum Error {
    /// A template file could not be read.
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying failure.
        source: io::Error,
    },
    /// A value could not be converted for use in a [`Context`][`crate::Context`].
    Serialize(serde_json::Error),
    /// A [`Builder`][`crate::Builder`] was given an unusable marker.
    Syntax(String),
    /// A template could not be compiled.
    Parse(ParseError),
    /// A template could not be rendered.
    Render(RenderError),
    /// A template with the same name is already registered in an
    /// [`Engine`][`crate::Engine`].
    TemplateExists(String),
    /// No template with the given name is registered in an
    /// [`Engine`][`crate::Engine`].
    MissingTemplate(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io { path, source } => {
                write!(f, "unable to read template `{}`: {source}", path.display())
            }
            Error::Serialize(error) => write!(f, "unable to serialize value: {error}"),
            Error::Syntax(reason) => write!(f, "invalid syntax configuration: {reason}"),
            Error::Parse(error) if f.alternate() => write!(f, "{error:#}"),
            Error::Parse(error) => write!(f, "{error}"),
            Error::Render(error) if f.alternate() => write!(f, "{error:#}"),
            Error::Render(error) => write!(f, "{error}"),
            Error::TemplateExists(name) => write!(
                f,
                "template with name `{name}` already exists in engine"
            ),
            Error::MissingTemplate(name) => write!(
                f,
                "template with name `{name}` not found in engine, add it with `.add_template`"
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            Error::Serialize(error) => Some(error),
            Error::Parse(error) => Some(error),
            Error::Render(error) => Some(error),
            Error::Syntax(_) | Error::TemplateExists(_) | Error::MissingTemplate(_) => None,
        }
    }
}

impl From<ParseError> for Error {
    fn from(error: ParseError) -> Self {
        Self::Parse(error)
    }
}

impl From<RenderError> for Error {
    fn from(error: RenderError) -> Self {
        Self::Render(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialize(error)
    }
}
