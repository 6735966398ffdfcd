//! The path tree: construction, lookup and value decomposition.

use log::{debug, trace};

use crate::node::{Node, NodeId, NodeRef};
use crate::path::Path;
use crate::value::{Scalar, Value};
use crate::Error;

/// A mutation about to be applied to the tree.
///
/// Observers see each change before it is applied; an observer error aborts
/// the insert and leaves that change unapplied.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Change<'a> {
    NodeCreated(&'a Path),
    ValueSet(&'a Path, &'a Scalar),
}

/// An in-memory tree of nested data addressed by slash-delimited paths.
///
/// Nodes live in an arena and are addressed by [`NodeId`]; parents own their
/// children through index lists and children refer back by index only.
/// Nodes are created on write, never on read, and never removed.
///
/// # Example
///
/// ```rust
/// use pathtree_core::{PathTree, Value};
///
/// let mut tree = PathTree::new();
/// tree.create("/a/b/c", 42).unwrap();
/// tree.create("/list", vec!["x", "y"]).unwrap();
/// tree.create("/map", Value::mapping([("k", true)])).unwrap();
///
/// assert_eq!(tree.get("/a/b/c").unwrap().value().unwrap().as_i64(), Some(42));
/// assert_eq!(tree.get("/list").unwrap().to_text(), r#"["x","y"]"#);
/// assert_eq!(
///     tree.to_text(),
///     r#"{"a":{"b":{"c":42}},"list":["x","y"],"map":{"k":true}}"#
/// );
/// ```
///
/// # Partial failure
///
/// Inserting a composite value is not transactional. When an element fails
/// (for example [`Value::Unsupported`]), the insert returns the error and
/// every node created for earlier elements stays in place.
#[derive(Clone, Debug)]
pub struct PathTree {
    nodes: Vec<Node>,
}

impl Default for PathTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PathTree {
    /// Create a tree holding only an empty root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }

    pub fn root(&self) -> NodeRef<'_> {
        self.node(NodeId::ROOT)
    }

    /// View a node by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this tree.
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }

    /// Total number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when nothing was ever written: the root has no children and no value.
    pub fn is_empty(&self) -> bool {
        let root = &self.nodes[NodeId::ROOT.0];
        root.children.is_empty() && root.value.is_none()
    }

    pub(crate) fn node_data(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn find_child(&self, parent: NodeId, segment: &str) -> Option<NodeId> {
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .find(|child| self.nodes[child.0].path.last() == Some(segment))
    }

    /// Locate the node at `path` without creating anything.
    pub fn resolve(&self, path: &Path) -> Result<NodeId, Error> {
        trace!("resolving {}", path);
        let mut current = NodeId::ROOT;
        for segment in path.iter() {
            current = self
                .find_child(current, segment)
                .ok_or_else(|| Error::NotFound { path: path.clone() })?;
        }
        Ok(current)
    }

    /// Locate the node at `path`, creating missing intermediate nodes.
    pub fn resolve_or_create(&mut self, path: &Path) -> Result<NodeId, Error> {
        self.resolve_or_create_observed(path, &mut |_| Ok(()))
    }

    pub(crate) fn resolve_or_create_observed(
        &mut self,
        path: &Path,
        observer: &mut dyn FnMut(Change<'_>) -> Result<(), Error>,
    ) -> Result<NodeId, Error> {
        let mut current = NodeId::ROOT;
        for segment in path.iter() {
            current = self.child_or_create(current, segment, observer)?;
        }
        Ok(current)
    }

    fn child_or_create(
        &mut self,
        parent: NodeId,
        segment: &str,
        observer: &mut dyn FnMut(Change<'_>) -> Result<(), Error>,
    ) -> Result<NodeId, Error> {
        if let Some(child) = self.find_child(parent, segment) {
            return Ok(child);
        }

        let parent_node = &self.nodes[parent.0];
        if parent_node.value.is_some() {
            return Err(Error::LeafConflict {
                path: parent_node.path.clone(),
            });
        }

        let path = parent_node.path.child(segment)?;
        observer(Change::NodeCreated(&path))?;
        debug!("creating node {}", path);

        let id = NodeId(self.nodes.len());
        let parent_node = &mut self.nodes[parent.0];
        // A sequence only stays one while children are appended in index order.
        if parent_node.is_sequence && segment != parent_node.children.len().to_string() {
            parent_node.is_sequence = false;
        }
        parent_node.children.push(id);
        self.nodes.push(Node {
            path,
            value: None,
            children: Vec::new(),
            is_sequence: false,
            parent: Some(parent),
        });
        Ok(id)
    }

    /// Insert `value` at `path`, decomposing sequences and mappings into
    /// child paths.
    pub fn insert(&mut self, path: &Path, value: Value) -> Result<(), Error> {
        self.insert_observed(path, value, &mut |_| Ok(()))
    }

    pub(crate) fn insert_observed(
        &mut self,
        path: &Path,
        value: Value,
        observer: &mut dyn FnMut(Change<'_>) -> Result<(), Error>,
    ) -> Result<(), Error> {
        let target = self.resolve_or_create_observed(path, observer)?;
        self.insert_at(target, value, observer)
    }

    fn insert_at(
        &mut self,
        target: NodeId,
        value: Value,
        observer: &mut dyn FnMut(Change<'_>) -> Result<(), Error>,
    ) -> Result<(), Error> {
        match value {
            Value::Scalar(scalar) => self.write_leaf(target, scalar, observer),
            Value::Sequence(items) => {
                let is_sequence =
                    self.nodes[target.0].value.is_none() && self.children_are_indices(target);
                self.nodes[target.0].is_sequence = is_sequence;
                for (index, item) in items.into_iter().enumerate() {
                    let child = self.child_or_create(target, &index.to_string(), observer)?;
                    self.insert_at(child, item, observer)?;
                }
                Ok(())
            }
            Value::Mapping(entries) => {
                self.nodes[target.0].is_sequence = false;
                for (key, item) in entries {
                    let child = self.child_or_create(target, &key, observer)?;
                    self.insert_at(child, item, observer)?;
                }
                Ok(())
            }
            Value::Unsupported(type_name) => Err(Error::UnsupportedType { type_name }),
        }
    }

    pub(crate) fn write_leaf(
        &mut self,
        target: NodeId,
        scalar: Scalar,
        observer: &mut dyn FnMut(Change<'_>) -> Result<(), Error>,
    ) -> Result<(), Error> {
        let node = &self.nodes[target.0];
        if !node.children.is_empty() {
            return Err(Error::BranchConflict {
                path: node.path.clone(),
            });
        }
        observer(Change::ValueSet(&node.path, &scalar))?;
        debug!("setting {} value at {}", scalar.kind(), node.path);

        let node = &mut self.nodes[target.0];
        node.value = Some(scalar);
        node.is_sequence = false;
        Ok(())
    }

    fn children_are_indices(&self, id: NodeId) -> bool {
        self.nodes[id.0]
            .children
            .iter()
            .enumerate()
            .all(|(index, child)| {
                self.nodes[child.0].path.last() == Some(index.to_string().as_str())
            })
    }

    /// Parse `path` and insert `value` there.
    pub fn create(&mut self, path: &str, value: impl Into<Value>) -> Result<(), Error> {
        let path = Path::parse(path)?;
        self.insert(&path, value.into())
    }

    /// Parse `path` and look up its node.
    pub fn get(&self, path: &str) -> Result<NodeRef<'_>, Error> {
        let path = Path::parse(path)?;
        let id = self.resolve(&path)?;
        Ok(self.node(id))
    }

    /// True when `path` names an existing leaf.
    pub fn contains_leaf(&self, path: &str) -> bool {
        self.get(path).is_ok_and(|node| node.is_leaf())
    }

    /// JSON text of the whole tree.
    pub fn to_text(&self) -> String {
        self.root().to_text()
    }
}
