//! Top-level facade crate for optsync.
//!
//! Re-exports section identity and the policy engine so hosts can depend on a single crate.

pub mod core {
    pub use optsync_core::*;
}

pub mod policy {
    pub use optsync_policy::*;
}
