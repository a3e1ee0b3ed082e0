use super::scope::Scope;
use crate::region::Region;

/// The Abstract Syntax Tree.
///
/// Every [`Region`] points into the source of the
/// [`Template`][`crate::Template`] that owns the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Static text, copied to the output verbatim.
    Text(Region),
    /// An expression to evaluate, escape and write to the output.
    Output(Output),
    /// A conditional block.
    If(If),
    /// An iteration block.
    Each(Each),
}

impl Node {
    /// Get the Region from the underlying Node kind.
    pub fn get_region(&self) -> Region {
        match self {
            Node::Text(region) => *region,
            Node::Output(output) => output.region,
            Node::If(block) => block.region,
            Node::Each(block) => block.region,
        }
    }
}

/// Represents a call to render some expression, such as `##=name##`.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    /// Location of the expression text.
    pub expression: Region,
    /// Location of the full segment, including delimiters.
    pub region: Region,
}

/// Represents `##if cond## ... ##else## ... ##/##`.
#[derive(Debug, Clone, PartialEq)]
pub struct If {
    /// Location of the condition expression text.
    pub condition: Region,
    /// Rendered when the condition is truthy.
    pub then_branch: Scope,
    /// Rendered when the condition is falsy. Empty when no alternate
    /// branch was declared.
    pub else_branch: Scope,
    /// Location of the opening segment through the close segment.
    pub region: Region,
}

/// Represents `##each items as item## ... ##else## ... ##/##`.
#[derive(Debug, Clone, PartialEq)]
pub struct Each {
    /// Location of the collection expression text.
    pub items: Region,
    /// Location of the binding name.
    pub binding: Region,
    /// Rendered once for every item of the collection.
    pub body: Scope,
    /// Rendered when the collection is empty.
    pub else_branch: Scope,
    /// Location of the opening segment through the close segment.
    pub region: Region,
}
