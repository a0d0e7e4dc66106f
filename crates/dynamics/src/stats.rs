//! Calculation results.

use serde::{Deserialize, Serialize};

use crate::graph::NodeId;

/// Aggregate dynamics cost of one avatar
///
/// A pure value: built once by the calculator and never updated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerformanceStats {
    dynamics_bone_count: usize,
    affected_node_count: usize,
    collider_count: usize,
    collision_check_count: usize,
    contact_count: usize,
}

impl PerformanceStats {
    pub fn new(
        dynamics_bone_count: usize,
        affected_node_count: usize,
        collider_count: usize,
        collision_check_count: usize,
        contact_count: usize,
    ) -> Self {
        Self {
            dynamics_bone_count,
            affected_node_count,
            collider_count,
            collision_check_count,
            contact_count,
        }
    }

    /// Dynamics bones that survive build-time stripping
    pub fn dynamics_bone_count(&self) -> usize {
        self.dynamics_bone_count
    }

    /// Transforms moved by dynamics bones, summed per bone
    pub fn affected_node_count(&self) -> usize {
        self.affected_node_count
    }

    /// Colliders referenced by at least one active bone
    pub fn collider_count(&self) -> usize {
        self.collider_count
    }

    /// Per-frame transform/collider pair checks
    pub fn collision_check_count(&self) -> usize {
        self.collision_check_count
    }

    pub fn contact_count(&self) -> usize {
        self.contact_count
    }
}

/// Cost breakdown for a single dynamics bone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoneStats {
    pub owner: NodeId,
    /// False when the bone is stripped as editor-only (all counts are then zero)
    pub active: bool,
    /// The effective root plus every non-ignored descendant
    pub affected_transforms: usize,
    pub collision_checks: usize,
    /// Distinct referenced colliders present in the collider set
    pub referenced_colliders: usize,
}

impl BoneStats {
    pub fn inactive(owner: NodeId) -> Self {
        Self {
            owner,
            active: false,
            affected_transforms: 0,
            collision_checks: 0,
            referenced_colliders: 0,
        }
    }
}

/// Totals plus the per-bone breakdown they were summed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsReport {
    pub stats: PerformanceStats,
    /// One entry per input bone, in input order
    pub bones: Vec<BoneStats>,
}

impl StatsReport {
    /// Active bones ordered from most to least collision checks
    pub fn most_expensive_bones(&self) -> Vec<BoneStats> {
        let mut bones: Vec<BoneStats> = self.bones.iter().filter(|b| b.active).copied().collect();
        bones.sort_by(|a, b| b.collision_checks.cmp(&a.collision_checks));
        bones
    }
}
