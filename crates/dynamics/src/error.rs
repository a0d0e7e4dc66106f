//! Error types for the dynamics stats calculation.

use crate::components::ColliderId;
use crate::graph::NodeId;

/// A node, root or collider reference that does not resolve against the
/// supplied snapshot.
///
/// Fatal to the call that produced it: the calculator never returns partial
/// stats.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidReferenceError {
    #[error("Node {node:?} is not part of the scene graph")]
    UnknownNode { node: NodeId },

    #[error("Root {root:?} is not part of the scene graph")]
    UnknownRoot { root: NodeId },

    #[error("Collider {collider:?} appears more than once in the collider set")]
    DuplicateCollider { collider: ColliderId },
}
