mod lex;
mod parse;
mod template;

pub use self::{
    parse::{scope::Scope, tree},
    template::Template,
};

use self::parse::Parser;
use crate::{log::ParseError, Error, Syntax};
use std::{fs, path::Path};

/// Compile a [`Template`] from the given text.
///
/// Provides a shortcut to quickly compile a `Template` with the default
/// [`Syntax`] without creating an [`Engine`][`crate::Engine`].
///
/// # Errors
///
/// Returns a [`ParseError`] when the blocks of the text are malformed.
///
/// # Examples
///
/// ```
/// use hashblock::compile;
///
/// assert!(compile("##if ready##Hello##/##").is_ok());
/// assert!(compile("Hello##/##").is_err());
/// ```
pub fn compile(text: &str) -> Result<Template, ParseError> {
    Template::compile(text.to_owned(), None, &Syntax::default())
}

/// Read a file and compile it into a [`Template`] named after the file.
///
/// The whole file is read before compilation begins, so a malformed template
/// is reported before anything is rendered.
///
/// # Errors
///
/// Returns an [`Error::Io`] if the file cannot be read as UTF-8 text, and
/// an [`Error::Parse`] if it cannot be compiled.
pub fn compile_file<P>(path: P) -> Result<Template, Error>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let (name, source) = read_template(path)?;

    Ok(Template::compile(source, Some(name), &Syntax::default())?)
}

/// Read the file at the given path, returning a name for it and its text.
///
/// The name is the file stem, or the full path when there is none.
pub(crate) fn read_template(path: &Path) -> Result<(String, String), Error> {
    let source = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok((name, source))
}

#[cfg(test)]
mod tests {
    use super::{compile, compile_file};
    use crate::{Context, Error};
    use serde_json::json;

    #[test]
    fn test_compile_file() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/test.html");
        let template = compile_file(path).unwrap();

        assert_eq!(template.name(), Some("test"));
        let context = Context::try_from(json!({ "value": "<3", "cond": true })).unwrap();
        assert_eq!(template.render(&context).unwrap(), "Before&lt;3\nAfter\n");
    }

    #[test]
    fn test_compile_file_missing() {
        let result = compile_file("does/not/exist.html");

        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_compile_output_only() {
        let template = compile("##=a##").unwrap();

        assert_eq!(template.nodes().len(), 1);
    }
}
