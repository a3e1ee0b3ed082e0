use super::{
    scope::Scope,
    tree::{Each, If, Node},
};
use crate::region::Region;

/// Describes a block that the `Parser` has opened but not yet closed.
pub enum BlockState {
    /// The `Parser` is evaluating an "if" block.
    If {
        /// Location of the condition expression.
        condition: Region,
        /// Nodes before the alternate marker.
        then_branch: Scope,
        /// Nodes after the alternate marker, if one has been found.
        else_branch: Option<Scope>,
        /// Region spanning the opening segment.
        region: Region,
    },
    /// The `Parser` is evaluating an "each" block.
    Each {
        /// Location of the collection expression.
        items: Region,
        /// Location of the binding name.
        binding: Region,
        /// Nodes before the alternate marker.
        body: Scope,
        /// Nodes after the alternate marker, if one has been found.
        else_branch: Option<Scope>,
        /// Region spanning the opening segment.
        region: Region,
    },
}

impl BlockState {
    /// Return the Scope that new Node instances are added to.
    pub fn target(&mut self) -> &mut Scope {
        match self {
            BlockState::If {
                then_branch: body,
                else_branch,
                ..
            }
            | BlockState::Each {
                body, else_branch, ..
            } => match else_branch {
                Some(alternate) => alternate,
                None => body,
            },
        }
    }

    /// Return true if the block has switched to its alternate branch.
    pub fn has_else(&self) -> bool {
        match self {
            BlockState::If { else_branch, .. } | BlockState::Each { else_branch, .. } => {
                else_branch.is_some()
            }
        }
    }

    /// Switch the block to its alternate branch.
    pub fn begin_else(&mut self) {
        match self {
            BlockState::If { else_branch, .. } | BlockState::Each { else_branch, .. } => {
                *else_branch = Some(Scope::new())
            }
        }
    }

    /// Return the Region of the opening segment.
    pub fn region(&self) -> Region {
        match self {
            BlockState::If { region, .. } | BlockState::Each { region, .. } => *region,
        }
    }

    /// Complete the block, producing a Node that spans through the close
    /// segment.
    pub fn close(self, close: Region) -> Node {
        match self {
            BlockState::If {
                condition,
                then_branch,
                else_branch,
                region,
            } => Node::If(If {
                condition,
                then_branch,
                else_branch: else_branch.unwrap_or_default(),
                region: region.combine(close),
            }),
            BlockState::Each {
                items,
                binding,
                body,
                else_branch,
                region,
            } => Node::Each(Each {
                items,
                binding,
                body,
                else_branch: else_branch.unwrap_or_default(),
                region: region.combine(close),
            }),
        }
    }
}
