//! Policy overrides loader (strict parsing).

pub mod schema;

use std::fs;

use optsync_core::error::{OptSyncError, Result};

pub use schema::{BlockedPropertiesEntry, PolicyOverrides, SectionEntry};

pub fn load_from_file(path: &str) -> Result<PolicyOverrides> {
    let s = fs::read_to_string(path)
        .map_err(|e| OptSyncError::Internal(format!("read policy overrides failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<PolicyOverrides> {
    let cfg: PolicyOverrides = serde_yaml::from_str(s)
        .map_err(|e| OptSyncError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
