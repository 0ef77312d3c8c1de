//! Seeding a settings document that does not exist yet.

use optsync_core::section::{CATEGORY, NAME_ATTR, SUBCATEGORY, TOOLS_OPTIONS};
use optsync_core::{NodeId, Result, SettingsDocument};

use super::engine::PolicyEngine;

pub const ROOT: &str = "UserSettings";

/// New document holding the engine's default sections, grouped under one
/// category element per distinct category in first-appearance order.
pub fn seed_document(engine: &PolicyEngine) -> Result<SettingsDocument> {
    let mut doc = SettingsDocument::new();
    let root = doc.create_element(ROOT);
    doc.append_child(doc.document().id(), root)?;
    let options = doc.create_element(TOOLS_OPTIONS);
    doc.append_child(root, options)?;

    let mut categories: Vec<(&str, NodeId)> = Vec::new();
    for section in engine.default_categories() {
        let category = match categories.iter().find(|(name, _)| *name == section.category()) {
            Some(&(_, id)) => id,
            None => {
                let id = doc.create_element(CATEGORY);
                doc.set_attribute(id, NAME_ATTR, section.category())?;
                doc.append_child(options, id)?;
                categories.push((section.category(), id));
                id
            }
        };

        let sub = doc.create_element(SUBCATEGORY);
        doc.set_attribute(sub, NAME_ATTR, section.subcategory())?;
        doc.append_child(category, sub)?;
    }

    tracing::info!(
        sections = engine.default_categories().len(),
        "seeded new settings document"
    );
    Ok(doc)
}
