//! Performance stats calculation for avatar dynamics.
//!
//! Counting follows the target platform's own rating rules:
//! - Bones under an editor-only node are stripped before anything is counted
//! - A bone affects its effective root plus every descendant outside its
//!   ignored subtrees, with no de-duplication between bones
//! - A collider counts once when any active bone references it
//! - Collision checks are (affected transforms - 1, minus the first segment of
//!   each chain when there are several) times the referenced colliders

use questkit_config::StatsConfig;
use tracing::{debug, trace, warn};

use crate::components::{ColliderSet, ContactSet, DynamicsBone, DynamicsBoneSet};
use crate::error::InvalidReferenceError;
use crate::graph::{NodeId, SceneGraph};
use crate::stats::{BoneStats, PerformanceStats, StatsReport};

/// Stateless calculator; holds only its configuration between calls
#[derive(Debug, Clone, Default)]
pub struct PerformanceStatsCalculator {
    config: StatsConfig,
}

impl PerformanceStatsCalculator {
    pub fn new(config: StatsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StatsConfig {
        &self.config
    }

    /// Compute the aggregate stats for the avatar under `root`.
    ///
    /// Every node reference is checked before counting starts, so an invalid
    /// reference fails the whole call.
    pub fn calculate(
        &self,
        graph: &SceneGraph,
        root: NodeId,
        bones: &DynamicsBoneSet,
        colliders: &ColliderSet,
        contacts: &ContactSet,
    ) -> Result<PerformanceStats, InvalidReferenceError> {
        self.calculate_report(graph, root, bones, colliders, contacts)
            .map(|report| report.stats)
    }

    /// Same as [`Self::calculate`], keeping the per-bone breakdown
    pub fn calculate_report(
        &self,
        graph: &SceneGraph,
        root: NodeId,
        bones: &DynamicsBoneSet,
        colliders: &ColliderSet,
        contacts: &ContactSet,
    ) -> Result<StatsReport, InvalidReferenceError> {
        if !graph.contains(root) {
            return Err(InvalidReferenceError::UnknownRoot { root });
        }
        bones.validate(graph)?;
        colliders.validate(graph)?;
        contacts.validate(graph)?;

        let mut exclusion = ExclusionFilter::new(graph, root, self.config.memoize_exclusion);

        let mut active_bones: Vec<&DynamicsBone> = Vec::with_capacity(bones.len());
        let mut breakdown = Vec::with_capacity(bones.len());
        let mut affected_node_count = 0;
        let mut collision_check_count = 0;

        for bone in bones.iter() {
            if exclusion.is_excluded(bone.owner)? {
                trace!("Skipping editor-only dynamics bone on {:?}", bone.owner);
                breakdown.push(BoneStats::inactive(bone.owner));
                continue;
            }

            let cost = bone_cost(graph, bone, colliders)?;
            trace!(
                "Dynamics bone on {:?}: {} affected transforms, {} colliders, {} checks",
                bone.owner,
                cost.affected_transforms,
                cost.referenced_colliders,
                cost.collision_checks
            );

            affected_node_count += cost.affected_transforms;
            collision_check_count += cost.collision_checks;
            active_bones.push(bone);
            breakdown.push(cost);
        }

        let collider_count = count_referenced_colliders(&active_bones, colliders);

        let contact_count = if self.config.filters_contacts() {
            let mut count = 0;
            for contact in contacts.iter() {
                if !exclusion.is_excluded(contact.owner)? {
                    count += 1;
                }
            }
            count
        } else {
            contacts.len()
        };

        let stats = PerformanceStats::new(
            active_bones.len(),
            affected_node_count,
            collider_count,
            collision_check_count,
            contact_count,
        );

        debug!(
            "Dynamics stats for {:?}: {}/{} bones active, {} affected, {} colliders, {} checks, {} contacts",
            root,
            active_bones.len(),
            bones.len(),
            affected_node_count,
            collider_count,
            collision_check_count,
            contact_count
        );

        Ok(StatsReport {
            stats,
            bones: breakdown,
        })
    }
}

/// Cost of one active bone
fn bone_cost(
    graph: &SceneGraph,
    bone: &DynamicsBone,
    colliders: &ColliderSet,
) -> Result<BoneStats, InvalidReferenceError> {
    let root = bone.effective_root();
    let ignores = bone.ignore_set();

    let affected_transforms = 1 + graph.count_descendants(root, &ignores)?;

    // The effective root never pairs with itself
    let mut transform_count = affected_transforms - 1;
    let direct_children = graph
        .children(root)?
        .iter()
        .filter(|child| !ignores.contains(*child))
        .count();
    // Each counted child is part of the affected set, so this never underflows
    if direct_children > 1 {
        transform_count -= direct_children;
    }

    let referenced = bone.distinct_colliders();
    let unresolved = referenced.iter().filter(|id| !colliders.contains(**id)).count();
    if unresolved > 0 {
        warn!(
            "Dynamics bone on {:?} references {} collider(s) outside the collider set",
            bone.owner, unresolved
        );
    }
    let referenced_colliders = referenced.len() - unresolved;

    Ok(BoneStats {
        owner: bone.owner,
        active: true,
        affected_transforms,
        collision_checks: transform_count * referenced_colliders,
        referenced_colliders,
    })
}

/// Colliders referenced by at least one active bone, each counted once
fn count_referenced_colliders(active_bones: &[&DynamicsBone], colliders: &ColliderSet) -> usize {
    colliders
        .iter()
        .filter(|collider| active_bones.iter().any(|bone| bone.references(collider.id)))
        .count()
}

/// Editor-only lookups scoped to one calculation, optionally memoized.
///
/// The cache is only valid while the graph borrow is held, which is exactly
/// the lifetime of one call.
struct ExclusionFilter<'a> {
    graph: &'a SceneGraph,
    root: NodeId,
    cache: Option<Vec<Option<bool>>>,
}

impl<'a> ExclusionFilter<'a> {
    fn new(graph: &'a SceneGraph, root: NodeId, memoize: bool) -> Self {
        Self {
            graph,
            root,
            cache: memoize.then(|| vec![None; graph.len()]),
        }
    }

    fn is_excluded(&mut self, node: NodeId) -> Result<bool, InvalidReferenceError> {
        let Some(cache) = self.cache.as_mut() else {
            return self.graph.is_effectively_excluded(self.root, node);
        };

        // Every node visited before the walk resolves shares its answer:
        // none of them is flagged, so each inherits from its parent.
        let mut path = Vec::new();
        let mut current = node;
        let excluded = loop {
            if let Some(known) = cache.get(current.0 as usize).copied().flatten() {
                break known;
            }
            let entry = self.graph.node(current)?;
            path.push(current);
            if entry.editor_only {
                break true;
            }
            match entry.parent {
                None => break false,
                Some(parent) if parent == self.root => break false,
                Some(parent) => current = parent,
            }
        };

        for id in path {
            cache[id.0 as usize] = Some(excluded);
        }
        Ok(excluded)
    }
}
