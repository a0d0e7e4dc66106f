//! Plain component shapes extracted from the host scene.
//!
//! These are filled in by an adapter (see [`crate::adapter`]) and only ever
//! read by the calculator.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::InvalidReferenceError;
use crate::graph::{NodeId, SceneGraph};

/// Opaque collider identity used to match bone references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColliderId(pub u32);

/// A jiggle-physics component attached to a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicsBone {
    /// Node the component is attached to
    pub owner: NodeId,
    /// Alternate subtree root (the owner when unset)
    pub root_transform: Option<NodeId>,
    /// Subtrees excluded from this bone's accounting
    pub ignores: Vec<NodeId>,
    /// Referenced colliders. `None` is a dangling reference left by the host.
    pub colliders: Vec<Option<ColliderId>>,
}

impl DynamicsBone {
    pub fn new(owner: NodeId) -> Self {
        Self {
            owner,
            root_transform: None,
            ignores: Vec::new(),
            colliders: Vec::new(),
        }
    }

    pub fn with_root_transform(mut self, root: NodeId) -> Self {
        self.root_transform = Some(root);
        self
    }

    pub fn with_ignores(mut self, ignores: impl IntoIterator<Item = NodeId>) -> Self {
        self.ignores.extend(ignores);
        self
    }

    pub fn with_colliders(mut self, colliders: impl IntoIterator<Item = ColliderId>) -> Self {
        self.colliders.extend(colliders.into_iter().map(Some));
        self
    }

    /// Node the affected subtree starts from
    pub fn effective_root(&self) -> NodeId {
        self.root_transform.unwrap_or(self.owner)
    }

    pub fn ignore_set(&self) -> HashSet<NodeId> {
        self.ignores.iter().copied().collect()
    }

    /// Whether the reference list mentions `collider` at least once
    pub fn references(&self, collider: ColliderId) -> bool {
        self.colliders.contains(&Some(collider))
    }

    /// Distinct non-null collider references
    pub fn distinct_colliders(&self) -> HashSet<ColliderId> {
        self.colliders.iter().flatten().copied().collect()
    }

    fn validate(&self, graph: &SceneGraph) -> Result<(), InvalidReferenceError> {
        graph.node(self.owner)?;
        if let Some(root) = self.root_transform {
            graph.node(root)?;
        }
        for &ignore in &self.ignores {
            graph.node(ignore)?;
        }
        Ok(())
    }
}

/// A collider volume that bones can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColliderVolume {
    pub id: ColliderId,
    pub owner: NodeId,
}

/// A contact sender or receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSensor {
    pub owner: NodeId,
}

/// The dynamics bones of one snapshot, in host order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DynamicsBoneSet {
    bones: Vec<DynamicsBone>,
}

impl DynamicsBoneSet {
    pub fn new(bones: Vec<DynamicsBone>) -> Self {
        Self { bones }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DynamicsBone> {
        self.bones.iter()
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Check every node handle against the graph
    pub fn validate(&self, graph: &SceneGraph) -> Result<(), InvalidReferenceError> {
        self.bones.iter().try_for_each(|bone| bone.validate(graph))
    }
}

impl FromIterator<DynamicsBone> for DynamicsBoneSet {
    fn from_iter<I: IntoIterator<Item = DynamicsBone>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// The collider volumes of one snapshot, unique by identity
#[derive(Debug, Clone, Default, Serialize)]
pub struct ColliderSet {
    colliders: Vec<ColliderVolume>,
    #[serde(skip)]
    ids: HashSet<ColliderId>,
}

impl ColliderSet {
    /// Build a set, rejecting two colliders that share an identity
    pub fn new(colliders: Vec<ColliderVolume>) -> Result<Self, InvalidReferenceError> {
        let mut ids = HashSet::with_capacity(colliders.len());
        for collider in &colliders {
            if !ids.insert(collider.id) {
                return Err(InvalidReferenceError::DuplicateCollider {
                    collider: collider.id,
                });
            }
        }
        Ok(Self { colliders, ids })
    }

    pub fn contains(&self, id: ColliderId) -> bool {
        self.ids.contains(&id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColliderVolume> {
        self.colliders.iter()
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    pub fn validate(&self, graph: &SceneGraph) -> Result<(), InvalidReferenceError> {
        self.colliders
            .iter()
            .try_for_each(|collider| graph.node(collider.owner).map(|_| ()))
    }
}

/// The contact sensors of one snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactSet {
    contacts: Vec<ContactSensor>,
}

impl ContactSet {
    pub fn new(contacts: Vec<ContactSensor>) -> Self {
        Self { contacts }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContactSensor> {
        self.contacts.iter()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn validate(&self, graph: &SceneGraph) -> Result<(), InvalidReferenceError> {
        self.contacts
            .iter()
            .try_for_each(|contact| graph.node(contact.owner).map(|_| ()))
    }
}
