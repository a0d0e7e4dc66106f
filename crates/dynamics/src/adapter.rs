//! Boundary between a host scene and the calculator.
//!
//! A host (editor integration, SDK bridge, file importer) implements
//! [`DynamicsSource`] to capture one consistent [`AvatarSnapshot`]. The
//! calculator only ever sees the snapshot, never the host's object model.

use crate::calculator::PerformanceStatsCalculator;
use crate::components::{ColliderSet, ContactSet, DynamicsBoneSet};
use crate::error::InvalidReferenceError;
use crate::graph::{NodeId, SceneGraph};
use crate::stats::{PerformanceStats, StatsReport};

/// Something that can capture the dynamics components of one avatar
pub trait DynamicsSource {
    type Error;

    /// Capture a snapshot that stays stable for the duration of a calculation
    fn snapshot(&self) -> Result<AvatarSnapshot, Self::Error>;
}

/// An owned capture of one avatar's hierarchy and dynamics components
#[derive(Debug, Clone)]
pub struct AvatarSnapshot {
    pub graph: SceneGraph,
    /// The avatar root that scopes editor-only exclusion
    pub root: NodeId,
    pub bones: DynamicsBoneSet,
    pub colliders: ColliderSet,
    pub contacts: ContactSet,
}

impl AvatarSnapshot {
    pub fn calculate(
        &self,
        calculator: &PerformanceStatsCalculator,
    ) -> Result<PerformanceStats, InvalidReferenceError> {
        calculator.calculate(&self.graph, self.root, &self.bones, &self.colliders, &self.contacts)
    }

    pub fn calculate_report(
        &self,
        calculator: &PerformanceStatsCalculator,
    ) -> Result<StatsReport, InvalidReferenceError> {
        calculator.calculate_report(&self.graph, self.root, &self.bones, &self.colliders, &self.contacts)
    }
}
