//! Policy decision vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod vector_loader;

use optsync_core::SectionKey;
use optsync_policy::PolicyEngine;

use vector_loader::{load, AllowVector, SkipVector};

#[test]
fn is_allowed_vectors() {
    let engine = PolicyEngine::builtin();
    for v in load::<AllowVector>("is_allowed.json") {
        let key = SectionKey::new(&v.category, &v.subcategory);
        assert_eq!(engine.is_allowed(&key), v.allowed, "{}", v.description);
    }
}

#[test]
fn should_skip_vectors() {
    let engine = PolicyEngine::builtin();
    for v in load::<SkipVector>("should_skip.json") {
        let key = SectionKey::new(&v.category, &v.subcategory);
        assert_eq!(engine.should_skip(&key, &v.property), v.skip, "{}", v.description);
    }
}

#[test]
fn default_categories_are_fixed_and_ordered() {
    let engine = PolicyEngine::builtin();
    let names: Vec<String> = engine
        .default_categories()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        names,
        [
            "Environment/TaskList",
            "TextEditor/CSharp-Specific",
            "TextEditor/JavaScript Specific",
            "TextEditor/C/C++ Specific",
            "TextEditor/TypeScript Specific",
            "TextEditor/XAML Specific",
        ]
    );
    let defaults = engine.default_categories();
    assert!(!defaults.contains(&SectionKey::new("TextEditor", "HTMLX Specific")));
    assert!(!defaults.contains(&SectionKey::new("TextEditor", "HTML Specific")));
}

#[test]
fn repeated_calls_agree() {
    let engine = PolicyEngine::builtin();
    let key = SectionKey::new("TextEditor", "C/C++ Specific");
    let first = (
        engine.is_allowed(&key),
        engine.should_skip(&key, "IntellisenseOptions"),
        engine.default_categories().to_vec(),
    );
    for _ in 0..3 {
        assert_eq!(engine.is_allowed(&key), first.0);
        assert_eq!(engine.should_skip(&key, "IntellisenseOptions"), first.1);
        assert_eq!(engine.default_categories(), first.2.as_slice());
    }
    assert_eq!(PolicyEngine::builtin().default_categories(), first.2.as_slice());
}

#[test]
fn concurrent_lookups_share_one_engine() {
    let engine = PolicyEngine::builtin();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = engine.clone();
            std::thread::spawn(move || {
                let blocked = SectionKey::new("Environment", "ProjectsAndSolution");
                let ok = SectionKey::new("Environment", "TaskList");
                !engine.is_allowed(&blocked) && engine.is_allowed(&ok)
            })
        })
        .collect();
    for h in handles {
        assert!(h.join().unwrap());
    }
}
