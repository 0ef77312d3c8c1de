//! Policy tables and the builtin values.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use optsync_core::SectionKey;

use crate::config::PolicyOverrides;

/// Subcategories that must never be loaded from untrusted or shared data.
const BLOCKED_SUBCATEGORIES: &[&str] = &[
    // AutoSaveFile points the host at a settings file to load on startup,
    // which can live on a hostile network share.
    "Import and Export Settings",
    "ImportAndExportSettings",
    // ProjectTemplatesLocation can serve pre-infected project templates.
    "ProjectsAndSolution",
    // HomePage enables advertising; ViewSourceExternalProgram runs arbitrary programs.
    "WebBrowser",
    // StartPageRSSUrl enables advertising and is installation-wide anyway.
    "Startup",
];

/// Properties the host cannot reliably read or write.
const BLOCKED_PROPERTIES: &[(&str, &str, &[&str])] = &[
    // read fails with DISP_E_EXCEPTION
    ("TextEditor", "C/C++ Specific", &["IntellisenseOptions"]),
    // write fails with DISP_E_MEMBERNOTFOUND
    ("TextEditor", "JavaScript Specific", &["ImplicitReferences"]),
    // misspelled in some host builds
    ("TextEditor", "CSharp-Specific", &["NewLineQueryExpression_EachClause"]),
];

/// Sections written into a brand-new settings document, in order.
/// HTML Specific and HTMLX Specific are left out: too slow and unreliable.
const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Environment", "TaskList"),
    ("TextEditor", "CSharp-Specific"),
    ("TextEditor", "JavaScript Specific"),
    ("TextEditor", "C/C++ Specific"),
    ("TextEditor", "TypeScript Specific"),
    ("TextEditor", "XAML Specific"),
];

/// Ordinal ignore-case key.
fn fold(name: &str) -> String {
    name.to_uppercase()
}

/// Immutable lookup tables consulted by `PolicyEngine`.
#[derive(Debug, Clone)]
pub struct PolicySets {
    blocked_subcategories: HashSet<String>,
    blocked_properties: HashMap<SectionKey, HashSet<String>>,
    default_categories: Vec<SectionKey>,
}

impl PolicySets {
    pub fn new<S, P>(
        blocked_subcategories: impl IntoIterator<Item = S>,
        blocked_properties: impl IntoIterator<Item = (SectionKey, P)>,
        default_categories: Vec<SectionKey>,
    ) -> Self
    where
        S: AsRef<str>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        let mut props: HashMap<SectionKey, HashSet<String>> = HashMap::new();
        for (section, names) in blocked_properties {
            props
                .entry(section)
                .or_default()
                .extend(names.into_iter().map(Into::into));
        }

        Self {
            blocked_subcategories: blocked_subcategories
                .into_iter()
                .map(|s| fold(s.as_ref()))
                .collect(),
            blocked_properties: props,
            default_categories,
        }
    }

    /// Process-wide builtin tables, built on first use.
    pub fn builtin() -> &'static PolicySets {
        static BUILTIN: OnceLock<PolicySets> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            PolicySets::new(
                BLOCKED_SUBCATEGORIES.iter().copied(),
                BLOCKED_PROPERTIES
                    .iter()
                    .map(|(c, s, props)| (SectionKey::new(*c, *s), props.iter().copied())),
                DEFAULT_CATEGORIES
                    .iter()
                    .map(|(c, s)| SectionKey::new(*c, *s))
                    .collect(),
            )
        })
    }

    /// Copy of `self` with validated overrides applied. Blocked entries are
    /// added; `default_categories`, when present, replaces the list.
    pub fn with_overrides(&self, overrides: &PolicyOverrides) -> Self {
        let mut out = self.clone();
        out.blocked_subcategories
            .extend(overrides.blocked_subcategories.iter().map(|s| fold(s)));
        for entry in &overrides.blocked_properties {
            out.blocked_properties
                .entry(SectionKey::new(&entry.category, &entry.subcategory))
                .or_default()
                .extend(entry.properties.iter().cloned());
        }
        if let Some(defaults) = &overrides.default_categories {
            out.default_categories = defaults
                .iter()
                .map(|d| SectionKey::new(&d.category, &d.subcategory))
                .collect();
        }
        out
    }

    pub fn is_blocked_subcategory(&self, subcategory: &str) -> bool {
        self.blocked_subcategories.contains(&fold(subcategory))
    }

    /// Exact match on both the section and the property name.
    pub fn is_blocked_property(&self, section: &SectionKey, property: &str) -> bool {
        self.blocked_properties
            .get(section)
            .is_some_and(|set| set.contains(property))
    }

    pub fn default_categories(&self) -> &[SectionKey] {
        &self.default_categories
    }
}
