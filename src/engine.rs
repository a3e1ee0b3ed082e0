use crate::{
    compile::{read_template, Template},
    log::ParseError,
    Context, Error, Syntax,
};
use std::{collections::HashMap, fs, path::Path};
use tracing::debug;

/// Facilitates compiling and rendering templates, and provides storage
/// for named templates that share one [`Syntax`].
///
/// Templates are compiled when they are added, so a malformed template is
/// reported while the `Engine` is being assembled rather than when it is
/// first rendered.
#[derive(Debug, Default)]
pub struct Engine {
    /// Markers used to compile every template in this Engine.
    syntax: Syntax,
    /// Templates that this Engine is aware of.
    templates: HashMap<String, Template>,
}

impl Engine {
    /// Create a new instance of [`Engine`] with the given [`Syntax`].
    ///
    /// # Examples
    ///
    /// ```
    /// use hashblock::{Builder, Context, Engine};
    ///
    /// let syntax = Builder::new().with_delimiter("%%").to_syntax().unwrap();
    /// let engine = Engine::new(syntax);
    /// let template = engine.compile("%%=1 + 2%%").unwrap();
    ///
    /// assert_eq!(engine.render(&template, &Context::new()).unwrap(), "3");
    /// ```
    #[inline]
    pub fn new(syntax: Syntax) -> Self {
        Self {
            syntax,
            templates: HashMap::new(),
        }
    }

    /// Compile a new [`Template`] without storing it.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when compilation fails, which most likely means
    /// the blocks in the text are not balanced.
    ///
    /// # Examples
    ///
    /// ```
    /// use hashblock::Engine;
    ///
    /// let engine = Engine::default();
    /// let template = engine.compile("hello, ##=name##!");
    /// assert!(template.is_ok());
    /// ```
    #[inline]
    pub fn compile(&self, text: &str) -> Result<Template, ParseError> {
        Template::compile(text.to_owned(), None, &self.syntax)
    }

    /// Render a [`Template`] with the given [`Context`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error::Render`] if an expression within the `Template`
    /// cannot be evaluated.
    ///
    /// # Examples
    ///
    /// ```
    /// use hashblock::{Context, Engine};
    ///
    /// let engine = Engine::default();
    /// let template = engine.compile("hello, ##=name##!").unwrap();
    /// let result = engine.render(&template, &Context::new().with("name", "taylor").unwrap());
    ///
    /// assert_eq!(result.unwrap(), "hello, taylor!")
    /// ```
    #[inline]
    pub fn render(&self, template: &Template, context: &Context) -> Result<String, Error> {
        Ok(template.render(context)?)
    }

    /// Render the named [`Template`] with the given [`Context`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error::MissingTemplate`] if no `Template` has the name,
    /// or an [`Error::Render`] if rendering fails.
    pub fn render_named(&self, name: &str, context: &Context) -> Result<String, Error> {
        let template = self
            .get_template(name)
            .ok_or_else(|| Error::MissingTemplate(name.to_owned()))?;

        self.render(template, context)
    }

    /// Compile and store a new [`Template`] with the given name.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when a `Template` with the given name already exists,
    /// or when compilation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use hashblock::Engine;
    ///
    /// let mut engine = Engine::default();
    /// let result = engine.add_template("index", "hello, ##=name##!");
    /// assert!(result.is_ok());
    ///
    /// let second = engine.add_template("index", "hello again");
    /// assert!(second.is_err());
    /// ```
    pub fn add_template<N, T>(&mut self, name: N, text: T) -> Result<(), Error>
    where
        N: Into<String>,
        T: Into<String>,
    {
        let name = name.into();
        if self.templates.contains_key(&name) {
            return Err(Error::TemplateExists(name));
        }

        let template = Template::compile(text.into(), Some(name.clone()), &self.syntax)?;
        debug!(template = %name, "registered template");
        self.templates.insert(name, template);

        Ok(())
    }

    /// Read, compile and store the file at the given path.
    ///
    /// The `Template` is named after the file stem, so `views/index.html`
    /// becomes `index`.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the file cannot be read, a `Template` with
    /// the same name already exists, or compilation fails.
    pub fn add_template_file<P>(&mut self, path: P) -> Result<(), Error>
    where
        P: AsRef<Path>,
    {
        let (name, source) = read_template(path.as_ref())?;

        self.add_template(name, source)
    }

    /// Add every file in the directory that has the given extension.
    ///
    /// Subdirectories are not searched. Files are added in order of their
    /// names. Returns the number of templates that were added.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the directory cannot be read, or any file
    /// cannot be added.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use hashblock::Engine;
    ///
    /// let mut engine = Engine::default();
    /// engine.load_directory("views", "html").unwrap();
    ///
    /// assert!(engine.get_template("index").is_some());
    /// ```
    pub fn load_directory<P>(&mut self, directory: P, extension: &str) -> Result<usize, Error>
    where
        P: AsRef<Path>,
    {
        let directory = directory.as_ref();
        let io = |source| Error::Io {
            path: directory.to_path_buf(),
            source,
        };

        let mut paths = vec![];
        for entry in fs::read_dir(directory).map_err(io)? {
            let path = entry.map_err(io)?.path();
            if path.is_file() && path.extension().is_some_and(|e| e == extension) {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            self.add_template_file(path)?;
        }
        debug!(
            directory = %directory.display(),
            count = paths.len(),
            "loaded templates"
        );

        Ok(paths.len())
    }

    /// Return the named [`Template`].
    ///
    /// # Examples
    ///
    /// ```
    /// use hashblock::Engine;
    ///
    /// let mut engine = Engine::default();
    /// engine.add_template("index", "hello, ##=name##!").unwrap();
    ///
    /// assert!(engine.get_template("index").is_some());
    /// assert!(engine.get_template("ghost").is_none());
    /// ```
    #[inline]
    pub fn get_template(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }
}
