//! Error types for the licensing module.

use thiserror::Error;

/// Licensing-specific errors.
///
/// Activation outcomes (revoked, expired, device mismatch, ...) are not
/// errors; see [`crate::ActivationOutcome`].
#[derive(Debug, Error)]
pub enum LicenseError {
    /// Plan token is malformed or out of range.
    #[error("invalid plan: {0}")]
    InvalidPlan(String),

    /// A license with this code already exists.
    #[error("duplicate license code: {0}")]
    DuplicateCode(String),

    /// No license with this code.
    #[error("license not found: {0}")]
    NotFound(String),

    /// Missing or incorrect admin credential.
    #[error("unauthorized")]
    Unauthorized,

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for LicenseError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
