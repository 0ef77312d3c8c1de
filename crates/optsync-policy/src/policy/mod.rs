//! Policy layer (blocked subcategories, skipped properties, default sections).
//!
//! Tables are built once, wrapped in an `Arc`, and only read afterwards, so
//! every lookup is lock-free and safe from any thread.

pub mod engine;
pub mod seed;
pub mod tables;

pub use engine::{PolicyEngine, SectionDecision, SectionReport};
pub use seed::seed_document;
pub use tables::PolicySets;
