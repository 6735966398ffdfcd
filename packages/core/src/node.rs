//! Tree nodes and borrowed views of them.

use crate::path::Path;
use crate::tree::PathTree;
use crate::value::Scalar;

/// Index of a node in its tree's arena.
///
/// Only meaningful for the tree that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

/// One node of a [`PathTree`].
///
/// A node holds a value only when it has no children.
#[derive(Clone, Debug, Default)]
pub(crate) struct Node {
    pub(crate) path: Path,
    pub(crate) value: Option<Scalar>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) is_sequence: bool,
    pub(crate) parent: Option<NodeId>,
}

/// A borrowed view of a node and, through it, its subtree.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    pub(crate) tree: &'a PathTree,
    pub(crate) id: NodeId,
}

impl<'a> NodeRef<'a> {
    fn node(&self) -> &'a Node {
        self.tree.node_data(self.id)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Absolute path of this node.
    pub fn path(&self) -> &'a Path {
        &self.node().path
    }

    /// Last path segment; `None` for the root.
    pub fn segment(&self) -> Option<&'a str> {
        self.node().path.last()
    }

    /// The scalar held by a leaf.
    pub fn value(&self) -> Option<&'a Scalar> {
        self.node().value.as_ref()
    }

    pub fn is_leaf(&self) -> bool {
        self.node().value.is_some()
    }

    pub fn is_branch(&self) -> bool {
        !self.node().children.is_empty()
    }

    /// True when the children render as an ordered list.
    pub fn is_sequence(&self) -> bool {
        self.node().is_sequence
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.node().children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node().children.is_empty()
    }

    /// Children in insertion order.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        self.node()
            .children
            .iter()
            .map(move |&id| NodeRef { tree, id })
    }

    /// The direct child with the given segment.
    pub fn child(&self, segment: &str) -> Option<NodeRef<'a>> {
        self.tree
            .find_child(self.id, segment)
            .map(|id| NodeRef { tree: self.tree, id })
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node().parent.map(|id| NodeRef {
            tree: self.tree,
            id,
        })
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("path", self.path())
            .field("value", &self.value())
            .field("children", &self.len())
            .field("is_sequence", &self.is_sequence())
            .finish()
    }
}
