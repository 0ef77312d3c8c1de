//! optsync core: section identity, the settings document tree, and the error
//! surface shared by the policy crate and any host integration.
//!
//! This crate carries no policy tables. It only knows how to name a settings
//! section and how to find sections inside an already-loaded document.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! Malformed documents surface as `OptSyncError::MalformedDocument` so a bad
//! settings file never takes the host process down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod document;
pub mod error;
pub mod section;

/// Shared result type.
pub use error::{Result, OptSyncError};
pub use document::{Node, NodeId, SettingsDocument};
pub use section::SectionKey;
