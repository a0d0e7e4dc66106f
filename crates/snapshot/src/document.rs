//! Serialized snapshot document types.
//!
//! Nodes are addressed by a unique name (typically the hierarchy path) and
//! must be listed after their parent. Components refer to nodes by that name.

use serde::{Deserialize, Serialize};

/// A name-addressed capture of one avatar
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    /// Name of the avatar root node
    pub root: String,
    pub nodes: Vec<NodeEntry>,
    #[serde(default)]
    pub dynamics_bones: Vec<BoneEntry>,
    #[serde(default)]
    pub colliders: Vec<ColliderEntry>,
    #[serde(default)]
    pub contacts: Vec<ContactEntry>,
}

/// A scene node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeEntry {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub editor_only: bool,
}

/// A dynamics bone component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoneEntry {
    /// Node the component sits on
    pub node: String,
    #[serde(default)]
    pub root_transform: Option<String>,
    #[serde(default)]
    pub ignores: Vec<String>,
    /// Collider ids; `null` for a missing reference. Ids that match no
    /// collider entry are kept as references outside the collider set.
    #[serde(default)]
    pub colliders: Vec<Option<String>>,
}

/// A collider volume component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColliderEntry {
    pub id: String,
    pub node: String,
}

/// A contact sender or receiver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactEntry {
    pub node: String,
}
