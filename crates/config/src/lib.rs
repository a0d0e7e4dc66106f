//! Shared configuration for QuestKit
//!
//! This crate provides the single source of truth for how a dynamics
//! performance stats calculation is run. The configuration is always passed
//! explicitly to the calculator; nothing here is global state.

use serde::{Deserialize, Serialize};

/// Default for [`StatsConfig::memoize_exclusion`]
pub const DEFAULT_MEMOIZE_EXCLUSION: bool = true;

/// How contact sensors are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContactFilter {
    /// Every contact counts, even when it sits under an editor-only node.
    /// This matches the platform's own contact accounting.
    #[default]
    Unfiltered,
    /// Contacts whose owning node is effectively editor-only are skipped,
    /// the same way dynamics bones are.
    ExcludeEditorOnly,
}

/// Configuration for one performance stats calculator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Contact counting rule
    pub contact_filter: ContactFilter,
    /// Cache per-node editor-only results for the duration of one calculation
    pub memoize_exclusion: bool,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            contact_filter: ContactFilter::default(),
            memoize_exclusion: DEFAULT_MEMOIZE_EXCLUSION,
        }
    }
}

impl StatsConfig {
    /// Create a config with the given contact filter
    pub fn new(contact_filter: ContactFilter) -> Self {
        Self {
            contact_filter,
            memoize_exclusion: DEFAULT_MEMOIZE_EXCLUSION,
        }
    }

    /// Builder-style toggle for exclusion memoization
    pub fn with_memoize_exclusion(mut self, memoize: bool) -> Self {
        self.memoize_exclusion = memoize;
        self
    }

    /// Whether contacts go through the editor-only filter
    pub fn filters_contacts(&self) -> bool {
        self.contact_filter == ContactFilter::ExcludeEditorOnly
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StatsConfig::default();
        assert_eq!(config.contact_filter, ContactFilter::Unfiltered);
        assert_eq!(config.memoize_exclusion, DEFAULT_MEMOIZE_EXCLUSION);
        assert!(!config.filters_contacts());
    }

    #[test]
    fn test_contact_filter_toggle() {
        let config = StatsConfig::new(ContactFilter::ExcludeEditorOnly).with_memoize_exclusion(false);
        assert!(config.filters_contacts());
        assert!(!config.memoize_exclusion);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: StatsConfig =
            serde_json::from_str(r#"{ "contact_filter": "exclude_editor_only" }"#).unwrap();
        assert_eq!(config.contact_filter, ContactFilter::ExcludeEditorOnly);
        assert!(config.memoize_exclusion);
    }
}
