//! QuestKit dynamics - performance stats for avatar jiggle physics
//!
//! This crate computes the counts a platform's performance rating uses for
//! avatar dynamics:
//! - [`graph::SceneGraph`] - Arena-backed hierarchy snapshot with editor-only flags
//! - [`components`] - Dynamics bones, colliders and contacts as plain data
//! - [`calculator::PerformanceStatsCalculator`] - The counting rules
//! - [`stats::PerformanceStats`] - The five aggregate counts
//! - [`adapter::DynamicsSource`] - Seam for hosts that capture snapshots
//!
//! Everything here is a pure function of its inputs: no I/O, no global state,
//! no mutation of the scene.

pub mod adapter;
pub mod calculator;
pub mod components;
pub mod error;
pub mod graph;
pub mod stats;

pub use adapter::*;
pub use calculator::*;
pub use components::*;
pub use error::*;
pub use graph::*;
pub use stats::*;

pub use questkit_config::{ContactFilter, StatsConfig};
