//! Hashblock uses a type known as a Syntax to understand which markers
//! you would like to use in your templates. This module defines the
//! Builder type, which provides methods to easily generate a `Syntax`.
//!
//! After a Syntax has been created, it can be passed to an Engine
//! and used to compile templates.
mod builder;

pub use builder::Builder;

use morel::Finder;
use std::fmt::{Debug, Formatter};

/// The compiled set of markers used to split and classify template source.
///
/// The default `Syntax` recognizes the hash-block grammar:
///
/// ```text
/// ##=expression##
/// ##if expression## ... ##else## ... ##/##
/// ##each expression as item## ... ##else## ... ##/##
/// ```
pub struct Syntax {
    /// Searches source text for the block delimiter.
    pub(crate) finder: Finder,
    /// Prefix of an escaped output segment.
    pub(crate) output: String,
    /// Prefix of a conditional segment, including the trailing space.
    pub(crate) conditional: String,
    /// Prefix of an iteration segment, including the trailing space.
    pub(crate) iteration: String,
    /// Divides the collection from the binding name, including the
    /// surrounding spaces.
    pub(crate) separator: String,
    /// Content of an alternate branch segment.
    pub(crate) alternate: String,
    /// Content of a close segment.
    pub(crate) close: String,
}

impl Default for Syntax {
    fn default() -> Self {
        Builder::new().build()
    }
}

impl Debug for Syntax {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Syntax")
            .field("output", &self.output)
            .field("conditional", &self.conditional)
            .field("iteration", &self.iteration)
            .field("separator", &self.separator)
            .field("alternate", &self.alternate)
            .field("close", &self.close)
            .finish_non_exhaustive()
    }
}
