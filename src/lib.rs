//! Hashblock - Template Engine
//!
//! Templates are plain text with control segments enclosed in `##` pairs:
//!
//! ```text
//! <h1>##=title##</h1>
//! ##each locations as location##
//!   <p>##=location.title## (##=location.dry_grade##)</p>
//! ##else##
//!   <p>Nothing within ##=range## miles.</p>
//! ##/##
//! ```
//!
//! A template is compiled once, and may then be rendered any number of times
//! with a [`Context`]. All output is escaped for HTML.
//!
//! ```
//! use hashblock::{compile, Context};
//! use serde_json::json;
//!
//! let template = compile("##if lat > 34##north##else##south##/## of ##=place##").unwrap();
//! let context = Context::try_from(json!({ "lat": 34.2, "place": "<Point Dume>" })).unwrap();
//!
//! assert_eq!(template.render(&context).unwrap(), "north of &lt;Point Dume&gt;");
//! ```
mod compile;
mod context;
mod engine;
mod error;
mod expression;
mod format;
mod log;
mod pipe;
mod region;
mod render;
mod syntax;

pub use compile::{
    compile, compile_file,
    tree::{Each, If, Node, Output},
    Scope, Template,
};
pub use context::{Binding, Context, Lookup};
pub use engine::Engine;
pub use error::Error;
pub use expression::evaluate;
pub use log::{
    Diagnostic, EvaluateError, EvaluateErrorKind, ParseError, ParseErrorKind, Pointer,
    RenderError, Visual,
};
pub use pipe::escape;
pub use region::Region;
pub use render::render;
pub use syntax::{Builder, Syntax};
