use super::tree::Node;

/// A distinct set of Node instances, such as the body of a block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    pub data: Vec<Node>,
}

impl Scope {
    /// Create a new Scope.
    #[inline]
    pub fn new() -> Self {
        Self { data: vec![] }
    }

    /// Return true if the Scope contains no Node instances.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Move the Scope instances of every block in this Scope into `pending`.
    fn take_children(&mut self, pending: &mut Vec<Scope>) {
        for node in self.data.drain(..) {
            match node {
                Node::If(block) => pending.extend([block.then_branch, block.else_branch]),
                Node::Each(block) => pending.extend([block.body, block.else_branch]),
                Node::Text(_) | Node::Output(_) => {}
            }
        }
    }
}

impl Drop for Scope {
    /// Nested blocks are flattened into a list before they are dropped,
    /// so dropping a deep tree does not recurse.
    fn drop(&mut self) {
        if self.data.iter().all(|node| matches!(node, Node::Text(_) | Node::Output(_))) {
            return;
        }

        let mut pending = vec![];
        self.take_children(&mut pending);
        while let Some(mut scope) = pending.pop() {
            scope.take_children(&mut pending);
        }
    }
}
