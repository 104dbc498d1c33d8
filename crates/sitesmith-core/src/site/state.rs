//! Per-session mutable generation state

use std::collections::BTreeMap;

use super::SiteSpec;

/// The single mutable record threaded through every tool call of one session.
///
/// Only tool bodies mutate it. `pages` holds html that either passed the
/// content validator (`write_page`) or was committed by an edit despite
/// failing it (`edit_page`).
#[derive(Debug, Clone, Default)]
pub struct GenerationState {
    pub spec: Option<SiteSpec>,
    pub pages: BTreeMap<String, String>,
    pub validation_passed: bool,
}

impl GenerationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a state from an existing site that is being revised.
    pub fn seeded(spec: Option<SiteSpec>, pages: BTreeMap<String, String>) -> Self {
        Self {
            spec,
            pages,
            validation_passed: false,
        }
    }

    /// Comma-separated filenames, for not-found diagnostics.
    pub fn available_pages(&self) -> String {
        if self.pages.is_empty() {
            "(none yet)".to_string()
        } else {
            self.pages.keys().cloned().collect::<Vec<_>>().join(", ")
        }
    }
}
