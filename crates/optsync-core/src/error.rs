//! Shared error type across optsync crates.

use thiserror::Error;

/// Stable error codes for callers that branch on the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Settings document is missing a parent or a `name` attribute.
    MalformedDocument,
    /// Settings text is not well-formed XML.
    InvalidXml,
    /// Policy overrides were rejected.
    BadConfig,
    /// Policy overrides declare an unknown schema version.
    UnsupportedVersion,
    /// I/O or anything else.
    Internal,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MalformedDocument => "MALFORMED_DOCUMENT",
            ErrorCode::InvalidXml => "INVALID_XML",
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, OptSyncError>;

/// Unified error type used by core and policy.
#[derive(Debug, Error)]
pub enum OptSyncError {
    #[error("malformed settings document: {0}")]
    MalformedDocument(String),
    #[error("invalid xml: {0}")]
    InvalidXml(String),
    #[error("bad policy config: {0}")]
    BadConfig(String),
    #[error("unsupported policy config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl OptSyncError {
    pub fn code(&self) -> ErrorCode {
        match self {
            OptSyncError::MalformedDocument(_) => ErrorCode::MalformedDocument,
            OptSyncError::InvalidXml(_) => ErrorCode::InvalidXml,
            OptSyncError::BadConfig(_) => ErrorCode::BadConfig,
            OptSyncError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            OptSyncError::Internal(_) => ErrorCode::Internal,
        }
    }
}
