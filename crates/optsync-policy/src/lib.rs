//! optsync policy library entry.
//!
//! Decides which settings sections may be loaded from shared data, which
//! properties inside them to leave alone, and which sections seed a new file.
//! Consumed by the `optsync-policy` binary and by host integrations.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod policy;

pub use policy::{PolicyEngine, PolicySets, SectionDecision, SectionReport};
