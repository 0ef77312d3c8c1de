//! Section identity: the (category, subcategory) pair the host groups options by.
//!
//! Equality and hashing are derived, so both fields compare ordinally
//! (byte-exact, case-sensitive). Case-insensitive matching belongs to the
//! policy tables, not to the key.

use std::fmt;

use crate::document::{Node, SettingsDocument};
use crate::error::{OptSyncError, Result};

pub const TOOLS_OPTIONS: &str = "ToolsOptions";
pub const CATEGORY: &str = "ToolsOptionsCategory";
pub const SUBCATEGORY: &str = "ToolsOptionsSubCategory";
pub const PROPERTY: &str = "PropertyValue";
pub const NAME_ATTR: &str = "name";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SectionKey {
    category: String,
    subcategory: String,
}

impl SectionKey {
    /// Stores both names verbatim.
    pub fn new(category: impl Into<String>, subcategory: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            subcategory: subcategory.into(),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn subcategory(&self) -> &str {
        &self.subcategory
    }

    /// Key for a subcategory element: its own `name` is the subcategory, its
    /// parent's `name` is the category. Empty names are accepted.
    pub fn from_node(node: Node<'_>) -> Result<Self> {
        let subcategory = node.attribute(NAME_ATTR).ok_or_else(|| {
            OptSyncError::MalformedDocument(format!(
                "<{}> has no name attribute",
                node.name().unwrap_or("#document")
            ))
        })?;

        let parent = node.parent().ok_or_else(|| {
            OptSyncError::MalformedDocument(format!(
                "subcategory {subcategory:?} has no parent category"
            ))
        })?;

        let category = parent.attribute(NAME_ATTR).ok_or_else(|| {
            OptSyncError::MalformedDocument(format!(
                "parent of subcategory {subcategory:?} has no name attribute"
            ))
        })?;

        Ok(Self::new(category, subcategory))
    }

    /// Walks `ToolsOptions / ToolsOptionsCategory / ToolsOptionsSubCategory`
    /// beneath `root` and yields each subcategory node with its key, in
    /// document order. Nothing is materialized up front; call again to restart.
    pub fn from_document<'a>(
        root: Node<'a>,
    ) -> impl Iterator<Item = Result<(SectionKey, Node<'a>)>> + 'a {
        root.elements(TOOLS_OPTIONS)
            .flat_map(|options| options.elements(CATEGORY))
            .flat_map(|category| category.elements(SUBCATEGORY))
            .map(|node| SectionKey::from_node(node).map(|key| (key, node)))
    }

    /// Property names under a subcategory node, in document order.
    pub fn properties<'a>(node: Node<'a>) -> impl Iterator<Item = Result<(&'a str, Node<'a>)>> + 'a {
        node.elements(PROPERTY).map(|prop| {
            prop.attribute(NAME_ATTR)
                .map(|name| (name, prop))
                .ok_or_else(|| {
                    OptSyncError::MalformedDocument(format!(
                        "<{PROPERTY}> without a name attribute"
                    ))
                })
        })
    }
}

impl fmt::Display for SectionKey {
    /// `category/subcategory`, unescaped. For diagnostics only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.subcategory)
    }
}

impl SettingsDocument {
    /// All sections beneath the root element. Empty if there is no root.
    pub fn sections(&self) -> impl Iterator<Item = Result<(SectionKey, Node<'_>)>> + '_ {
        self.root().into_iter().flat_map(SectionKey::from_document)
    }
}
