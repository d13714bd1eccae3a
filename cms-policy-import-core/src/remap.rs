//! Template-identifier to real-identifier mapping.
//!
//! The remap is a two-pass transform: pass 1 builds a total mapping over
//! the policy list, pass 2 (the emitters) rewrites every policy reference
//! through it. The map is scoped to a single run; identifiers are never
//! reused across runs.

use std::collections::HashMap;

use uuid::Uuid;

use crate::types::Policy;

/// One-to-one mapping from template policy identifiers to real identifiers.
///
/// The SQL path mints its own UUIDs up front; the API path inserts the
/// identifiers the instance assigns (or that a name lookup recovered).
#[derive(Debug, Clone, Default)]
pub struct PolicyIdMap {
    entries: HashMap<String, String>,
}

impl PolicyIdMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh v4 UUID for every policy in the list, keyed by the
    /// policy's template identifier. One entry per input policy.
    pub fn mint(policies: &[Policy]) -> Self {
        let entries = policies
            .iter()
            .map(|policy| (policy.id.clone(), Uuid::new_v4().to_string()))
            .collect();
        Self { entries }
    }

    /// Record a real identifier for a template identifier.
    pub fn insert(&mut self, template_id: impl Into<String>, real_id: impl Into<String>) {
        self.entries.insert(template_id.into(), real_id.into());
    }

    /// Resolve a template identifier to its real identifier, if mapped.
    pub fn resolve(&self, template_id: &str) -> Option<&str> {
        self.entries.get(template_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
