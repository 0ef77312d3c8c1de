use std::sync::Arc;

use optsync_core::{NodeId, Result, SectionKey, SettingsDocument};

use super::tables::PolicySets;

/// Outcome for one section of a settings document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionDecision {
    /// Load the section, leaving the listed properties untouched.
    Allowed { skipped: Vec<String> },
    /// Never load this section from shared data.
    Blocked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionReport {
    pub section: SectionKey,
    pub node: NodeId,
    pub decision: SectionDecision,
}

/// Stateless decisions over shared, immutable `PolicySets`.
/// Construct once at startup, then clone freely.
#[derive(Debug, Clone)]
pub struct PolicyEngine {
    sets: Arc<PolicySets>,
}

impl Default for PolicyEngine {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PolicyEngine {
    pub fn new(sets: PolicySets) -> Self {
        Self {
            sets: Arc::new(sets),
        }
    }

    pub fn builtin() -> Self {
        Self::new(PolicySets::builtin().clone())
    }

    pub fn sets(&self) -> &PolicySets {
        &self.sets
    }

    /// False iff the subcategory is blocked (case-insensitive). The category
    /// is not consulted.
    pub fn is_allowed(&self, section: &SectionKey) -> bool {
        !self.sets.is_blocked_subcategory(section.subcategory())
    }

    /// True iff `property` is a known-unreliable property of `section`.
    pub fn should_skip(&self, section: &SectionKey, property: &str) -> bool {
        self.sets.is_blocked_property(section, property)
    }

    /// Sections to create in a new settings document, in order. Existing
    /// documents keep whatever sections they already contain.
    pub fn default_categories(&self) -> &[SectionKey] {
        self.sets.default_categories()
    }

    /// Decide every section of `doc`. The first malformed section or
    /// property aborts the walk.
    pub fn evaluate(&self, doc: &SettingsDocument) -> Result<Vec<SectionReport>> {
        let mut out = Vec::new();
        for entry in doc.sections() {
            let (section, node) = entry?;

            let decision = if self.is_allowed(&section) {
                let mut skipped = Vec::new();
                for prop in SectionKey::properties(node) {
                    let (name, _) = prop?;
                    if self.should_skip(&section, name) {
                        skipped.push(name.to_string());
                    }
                }
                tracing::debug!(section = %section, skipped = skipped.len(), "section allowed");
                SectionDecision::Allowed { skipped }
            } else {
                tracing::debug!(section = %section, "section blocked");
                SectionDecision::Blocked
            };

            out.push(SectionReport {
                section,
                node: node.id(),
                decision,
            });
        }
        Ok(out)
    }
}
