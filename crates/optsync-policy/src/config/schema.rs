use std::collections::HashSet;

use serde::Deserialize;
use optsync_core::error::{OptSyncError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyOverrides {
    pub version: u32,

    /// Added to the builtin blocked set (case-insensitive).
    #[serde(default)]
    pub blocked_subcategories: Vec<String>,

    #[serde(default)]
    pub blocked_properties: Vec<BlockedPropertiesEntry>,

    /// Replaces the builtin defaults when present.
    #[serde(default)]
    pub default_categories: Option<Vec<SectionEntry>>,
}

impl PolicyOverrides {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(OptSyncError::UnsupportedVersion);
        }

        for name in &self.blocked_subcategories {
            if name.trim().is_empty() {
                return Err(OptSyncError::BadConfig(
                    "blocked_subcategories entries must not be empty".into(),
                ));
            }
        }

        for entry in &self.blocked_properties {
            entry.section().validate("blocked_properties")?;
            if entry.properties.is_empty() {
                return Err(OptSyncError::BadConfig(format!(
                    "blocked_properties entry {}/{} lists no properties",
                    entry.category, entry.subcategory
                )));
            }
            if entry.properties.iter().any(|p| p.is_empty()) {
                return Err(OptSyncError::BadConfig(format!(
                    "blocked_properties entry {}/{} has an empty property name",
                    entry.category, entry.subcategory
                )));
            }
        }

        if let Some(defaults) = &self.default_categories {
            let mut seen = HashSet::new();
            for d in defaults {
                d.validate("default_categories")?;
                if !seen.insert((d.category.as_str(), d.subcategory.as_str())) {
                    return Err(OptSyncError::BadConfig(format!(
                        "default_categories lists {}/{} twice",
                        d.category, d.subcategory
                    )));
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionEntry {
    pub category: String,
    pub subcategory: String,
}

impl SectionEntry {
    fn validate(&self, field: &str) -> Result<()> {
        if self.category.is_empty() || self.subcategory.is_empty() {
            return Err(OptSyncError::BadConfig(format!(
                "{field}: category and subcategory must not be empty"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockedPropertiesEntry {
    pub category: String,
    pub subcategory: String,
    pub properties: Vec<String>,
}

impl BlockedPropertiesEntry {
    fn section(&self) -> SectionEntry {
        SectionEntry {
            category: self.category.clone(),
            subcategory: self.subcategory.clone(),
        }
    }
}
