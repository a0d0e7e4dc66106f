//! Read-only scene hierarchy snapshot.
//!
//! Nodes live in an index-addressed arena and refer to each other through
//! [`NodeId`] handles. A parent link is a handle used for upward navigation
//! only; the arena owns every node. Nodes can only be appended under an
//! existing parent, so the hierarchy is acyclic by construction.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::InvalidReferenceError;

/// Type-safe scene node identifier (index into the graph arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node in the scene hierarchy
#[derive(Debug, Clone, Serialize)]
pub struct SceneNode {
    pub id: NodeId,
    /// Parent node (None for top-level nodes)
    pub parent: Option<NodeId>,
    /// Children in hierarchy order
    pub children: Vec<NodeId>,
    /// Stripped from builds, so it never counts towards runtime cost
    pub editor_only: bool,
}

/// Arena-backed scene hierarchy
///
/// A graph may hold several top-level nodes (for example a scene with more
/// than one avatar). Every calculation is scoped to one designated root.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Append a top-level node
    pub fn add_root(&mut self, editor_only: bool) -> NodeId {
        self.push(None, editor_only)
    }

    /// Append a node as the last child of `parent`
    pub fn add_child(
        &mut self,
        parent: NodeId,
        editor_only: bool,
    ) -> Result<NodeId, InvalidReferenceError> {
        self.node(parent)?;
        let id = self.push(Some(parent), editor_only);
        self.nodes[parent.index()].children.push(id);
        Ok(id)
    }

    /// Change the editor-only flag of an existing node
    pub fn set_editor_only(
        &mut self,
        node: NodeId,
        editor_only: bool,
    ) -> Result<(), InvalidReferenceError> {
        let entry = self
            .nodes
            .get_mut(node.index())
            .ok_or(InvalidReferenceError::UnknownNode { node })?;
        entry.editor_only = editor_only;
        Ok(())
    }

    fn push(&mut self, parent: Option<NodeId>, editor_only: bool) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SceneNode {
            id,
            parent,
            children: Vec::new(),
            editor_only,
        });
        id
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get node by ID
    pub fn node(&self, id: NodeId) -> Result<&SceneNode, InvalidReferenceError> {
        self.nodes
            .get(id.index())
            .ok_or(InvalidReferenceError::UnknownNode { node: id })
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, InvalidReferenceError> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], InvalidReferenceError> {
        Ok(&self.node(id)?.children)
    }

    pub fn is_editor_only(&self, id: NodeId) -> Result<bool, InvalidReferenceError> {
        Ok(self.node(id)?.editor_only)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ========================================================================
    // Hierarchy Queries
    // ========================================================================

    /// Whether `node` sits strictly below `ancestor`
    pub fn is_descendant_of(
        &self,
        node: NodeId,
        ancestor: NodeId,
    ) -> Result<bool, InvalidReferenceError> {
        self.node(ancestor)?;
        let mut current = self.parent(node)?;
        while let Some(id) = current {
            if id == ancestor {
                return Ok(true);
            }
            current = self.parent(id)?;
        }
        Ok(false)
    }

    /// Whether `node` is stripped at build time when building `root`.
    ///
    /// The node's own flag is always checked. After that the walk goes up
    /// through its ancestors and stops once the next parent is `root` or the
    /// node is top-level, so the designated root never excludes its own
    /// contents. When `node` is `root` itself the walk starts above it, so a
    /// flagged ancestor of the root still excludes it.
    pub fn is_effectively_excluded(
        &self,
        root: NodeId,
        node: NodeId,
    ) -> Result<bool, InvalidReferenceError> {
        if !self.contains(root) {
            return Err(InvalidReferenceError::UnknownRoot { root });
        }
        let mut current = node;
        loop {
            let entry = self.node(current)?;
            if entry.editor_only {
                return Ok(true);
            }
            match entry.parent {
                None => return Ok(false),
                Some(parent) if parent == root => return Ok(false),
                Some(parent) => current = parent,
            }
        }
    }

    /// Count every descendant of `node`, pruning each ignored node together
    /// with its whole subtree. `node` itself is neither counted nor pruned.
    pub fn count_descendants(
        &self,
        node: NodeId,
        ignores: &HashSet<NodeId>,
    ) -> Result<usize, InvalidReferenceError> {
        let mut count = 0;
        let mut stack: Vec<NodeId> = self.children(node)?.to_vec();
        while let Some(id) = stack.pop() {
            if ignores.contains(&id) {
                continue;
            }
            count += 1;
            stack.extend_from_slice(self.children(id)?);
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// root -> a -> b -> c, root -> d
    fn create_test_graph() -> (SceneGraph, [NodeId; 5]) {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(false);
        let a = graph.add_child(root, false).unwrap();
        let b = graph.add_child(a, false).unwrap();
        let c = graph.add_child(b, false).unwrap();
        let d = graph.add_child(root, false).unwrap();
        (graph, [root, a, b, c, d])
    }

    #[test]
    fn test_navigation() {
        let (graph, [root, a, b, _c, d]) = create_test_graph();
        assert_eq!(graph.len(), 5);
        assert_eq!(graph.parent(root).unwrap(), None);
        assert_eq!(graph.parent(b).unwrap(), Some(a));
        assert_eq!(graph.children(root).unwrap(), &[a, d]);
    }

    #[test]
    fn test_add_child_unknown_parent() {
        let mut graph = SceneGraph::new();
        let err = graph.add_child(NodeId(3), false).unwrap_err();
        assert_eq!(err, InvalidReferenceError::UnknownNode { node: NodeId(3) });
        assert!(graph.is_empty());
    }

    #[test]
    fn test_is_descendant_of() {
        let (graph, [root, a, _b, c, d]) = create_test_graph();
        assert!(graph.is_descendant_of(c, root).unwrap());
        assert!(graph.is_descendant_of(c, a).unwrap());
        assert!(!graph.is_descendant_of(d, a).unwrap());
        assert!(!graph.is_descendant_of(a, a).unwrap());
        assert!(graph.is_descendant_of(NodeId(42), root).is_err());
    }

    #[test]
    fn test_count_descendants() {
        let (graph, [root, a, b, _c, _d]) = create_test_graph();
        assert_eq!(graph.count_descendants(root, &HashSet::new()).unwrap(), 4);
        assert_eq!(graph.count_descendants(a, &HashSet::new()).unwrap(), 2);

        // Ignoring b prunes b and c
        let ignores = HashSet::from([b]);
        assert_eq!(graph.count_descendants(root, &ignores).unwrap(), 2);

        // The start node is never pruned
        let ignores = HashSet::from([a]);
        assert_eq!(graph.count_descendants(a, &ignores).unwrap(), 2);
    }

    #[test]
    fn test_exclusion_own_flag() {
        let (mut graph, [root, _a, b, _c, d]) = create_test_graph();
        graph.set_editor_only(b, true).unwrap();
        assert!(graph.is_effectively_excluded(root, b).unwrap());
        assert!(!graph.is_effectively_excluded(root, d).unwrap());
    }

    #[test]
    fn test_exclusion_inherited_from_ancestor() {
        let (mut graph, [root, a, _b, c, d]) = create_test_graph();
        graph.set_editor_only(a, true).unwrap();
        assert!(graph.is_effectively_excluded(root, c).unwrap());
        assert!(!graph.is_effectively_excluded(root, d).unwrap());
    }

    #[test]
    fn test_exclusion_stops_at_root() {
        let mut graph = SceneGraph::new();
        let scene = graph.add_root(true);
        let avatar = graph.add_child(scene, true).unwrap();
        let child = graph.add_child(avatar, false).unwrap();

        // The designated root and everything above it are never tested
        assert!(!graph.is_effectively_excluded(avatar, child).unwrap());
        // Scoping to the scene instead makes the avatar itself count
        assert!(graph.is_effectively_excluded(scene, child).unwrap());
    }

    #[test]
    fn test_exclusion_unknown_root() {
        let (graph, [_root, a, ..]) = create_test_graph();
        let err = graph.is_effectively_excluded(NodeId(99), a).unwrap_err();
        assert_eq!(err, InvalidReferenceError::UnknownRoot { root: NodeId(99) });
    }
}
