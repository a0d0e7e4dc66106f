//! JSON snapshot adapter for QuestKit dynamics
//!
//! Turns a [`SnapshotDocument`] (names instead of handles) into the plain
//! shapes the calculator consumes. Parsing works on in-memory strings only.

mod document;
mod error;

use std::collections::HashMap;

use dynamics::{
    AvatarSnapshot, ColliderId, ColliderSet, ColliderVolume, ContactSensor, ContactSet,
    DynamicsBone, DynamicsBoneSet, DynamicsSource, NodeId, PerformanceStats,
    PerformanceStatsCalculator, SceneGraph,
};
use tracing::debug;

pub use document::{BoneEntry, ColliderEntry, ContactEntry, NodeEntry, SnapshotDocument};
pub use error::SnapshotError;

impl SnapshotDocument {
    /// Parse a document from JSON text
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the document to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Resolve names into an arena-backed snapshot
    pub fn resolve(&self) -> Result<AvatarSnapshot, SnapshotError> {
        let mut graph = SceneGraph::with_capacity(self.nodes.len());
        let mut nodes: HashMap<&str, NodeId> = HashMap::with_capacity(self.nodes.len());

        for entry in &self.nodes {
            if nodes.contains_key(entry.name.as_str()) {
                return Err(SnapshotError::DuplicateNode(entry.name.clone()));
            }
            let id = match &entry.parent {
                None => graph.add_root(entry.editor_only),
                Some(parent) => {
                    let parent_id = nodes.get(parent.as_str()).copied().ok_or_else(|| {
                        SnapshotError::UnknownParent {
                            node: entry.name.clone(),
                            parent: parent.clone(),
                        }
                    })?;
                    graph.add_child(parent_id, entry.editor_only)?
                }
            };
            nodes.insert(entry.name.as_str(), id);
        }

        let lookup = |name: &str| -> Result<NodeId, SnapshotError> {
            nodes
                .get(name)
                .copied()
                .ok_or_else(|| SnapshotError::UnknownNode(name.to_string()))
        };

        let root = lookup(self.root.as_str())?;

        // Declared colliders take ids in order; unmatched references get ids
        // past the end so they stay distinct but never match the set.
        let mut collider_ids: HashMap<&str, ColliderId> = HashMap::with_capacity(self.colliders.len());
        let mut colliders = Vec::with_capacity(self.colliders.len());
        for entry in &self.colliders {
            let id = ColliderId(collider_ids.len() as u32);
            if collider_ids.insert(entry.id.as_str(), id).is_some() {
                return Err(SnapshotError::DuplicateCollider(entry.id.clone()));
            }
            colliders.push(ColliderVolume {
                id,
                owner: lookup(entry.node.as_str())?,
            });
        }

        let mut bones = Vec::with_capacity(self.dynamics_bones.len());
        for entry in &self.dynamics_bones {
            let mut bone = DynamicsBone::new(lookup(entry.node.as_str())?);
            if let Some(root_transform) = &entry.root_transform {
                bone.root_transform = Some(lookup(root_transform.as_str())?);
            }
            for ignore in &entry.ignores {
                bone.ignores.push(lookup(ignore.as_str())?);
            }
            for reference in &entry.colliders {
                let id = reference.as_deref().map(|name| {
                    let next = ColliderId(collider_ids.len() as u32);
                    *collider_ids.entry(name).or_insert(next)
                });
                bone.colliders.push(id);
            }
            bones.push(bone);
        }

        let contacts = self
            .contacts
            .iter()
            .map(|entry| {
                Ok(ContactSensor {
                    owner: lookup(entry.node.as_str())?,
                })
            })
            .collect::<Result<Vec<_>, SnapshotError>>()?;

        debug!(
            "Resolved snapshot: {} nodes, {} bones, {} colliders, {} contacts",
            graph.len(),
            bones.len(),
            colliders.len(),
            contacts.len()
        );

        Ok(AvatarSnapshot {
            graph,
            root,
            bones: DynamicsBoneSet::new(bones),
            colliders: ColliderSet::new(colliders)?,
            contacts: ContactSet::new(contacts),
        })
    }
}

impl DynamicsSource for SnapshotDocument {
    type Error = SnapshotError;

    fn snapshot(&self) -> Result<AvatarSnapshot, Self::Error> {
        self.resolve()
    }
}

/// Parse, resolve and calculate in one step
pub fn calculate_json(
    json: &str,
    calculator: &PerformanceStatsCalculator,
) -> Result<PerformanceStats, SnapshotError> {
    let snapshot = SnapshotDocument::from_json(json)?.resolve()?;
    Ok(snapshot.calculate(calculator)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const AVATAR_JSON: &str = r#"{
        "root": "Avatar",
        "nodes": [
            { "name": "Scene" },
            { "name": "Avatar", "parent": "Scene" },
            { "name": "Avatar/Hair", "parent": "Avatar" },
            { "name": "Avatar/Hair/L", "parent": "Avatar/Hair" },
            { "name": "Avatar/Hair/L/Tip", "parent": "Avatar/Hair/L" },
            { "name": "Avatar/Hair/R", "parent": "Avatar/Hair" },
            { "name": "Avatar/Hair/R/Tip", "parent": "Avatar/Hair/R" },
            { "name": "Avatar/Head", "parent": "Avatar" },
            { "name": "Avatar/Debug", "parent": "Avatar", "editor_only": true },
            { "name": "Avatar/Debug/Tail", "parent": "Avatar/Debug" }
        ],
        "dynamics_bones": [
            { "node": "Avatar/Hair", "colliders": ["head", "head", null, "missing"] },
            { "node": "Avatar/Debug/Tail", "colliders": ["head"] }
        ],
        "colliders": [
            { "id": "head", "node": "Avatar/Head" },
            { "id": "unused", "node": "Avatar/Head" }
        ],
        "contacts": [
            { "node": "Avatar/Head" },
            { "node": "Avatar/Debug" }
        ]
    }"#;

    #[test]
    fn test_calculate_json() {
        let stats = calculate_json(AVATAR_JSON, &PerformanceStatsCalculator::default()).unwrap();
        // Hair + 4 descendants, two chains: (5 - 1 - 2) * 1 collider
        assert_eq!(stats, PerformanceStats::new(1, 5, 1, 2, 2));
    }

    #[test]
    fn test_resolve_keeps_unmatched_collider_references() {
        let snapshot = SnapshotDocument::from_json(AVATAR_JSON).unwrap().resolve().unwrap();
        let hair = snapshot.bones.iter().next().unwrap();
        assert_eq!(hair.colliders.len(), 4);
        assert_eq!(hair.colliders[0], hair.colliders[1]);
        assert_eq!(hair.colliders[2], None);
        let missing = hair.colliders[3].unwrap();
        assert!(!snapshot.colliders.contains(missing));
    }

    #[test]
    fn test_round_trip_json() {
        let document = SnapshotDocument::from_json(AVATAR_JSON).unwrap();
        let json = document.to_json().unwrap();
        assert_eq!(SnapshotDocument::from_json(&json).unwrap(), document);
    }

    #[test]
    fn test_unknown_node_reference() {
        let json = r#"{
            "root": "Avatar",
            "nodes": [{ "name": "Avatar" }],
            "contacts": [{ "node": "Avatar/Hand" }]
        }"#;
        let err = SnapshotDocument::from_json(json).unwrap().resolve().unwrap_err();
        assert!(matches!(err, SnapshotError::UnknownNode(name) if name == "Avatar/Hand"));
    }

    #[test]
    fn test_parent_must_be_declared_first() {
        let json = r#"{
            "root": "Avatar",
            "nodes": [
                { "name": "Avatar/Hips", "parent": "Avatar" },
                { "name": "Avatar" }
            ]
        }"#;
        let err = SnapshotDocument::from_json(json).unwrap().resolve().unwrap_err();
        assert!(matches!(err, SnapshotError::UnknownParent { .. }));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut document = SnapshotDocument {
            root: "Avatar".into(),
            nodes: vec![
                NodeEntry {
                    name: "Avatar".into(),
                    parent: None,
                    editor_only: false,
                },
                NodeEntry {
                    name: "Avatar".into(),
                    parent: None,
                    editor_only: false,
                },
            ],
            ..Default::default()
        };
        assert!(matches!(document.resolve(), Err(SnapshotError::DuplicateNode(_))));

        document.nodes.pop();
        document.colliders = vec![
            ColliderEntry {
                id: "c".into(),
                node: "Avatar".into(),
            },
            ColliderEntry {
                id: "c".into(),
                node: "Avatar".into(),
            },
        ];
        assert!(matches!(document.resolve(), Err(SnapshotError::DuplicateCollider(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            SnapshotDocument::from_json("{ \"root\": 3 }"),
            Err(SnapshotError::Json(_))
        ));
    }
}
