//! The persisted license record and its derived lifecycle state.

use crate::expiry::is_expired;
use crate::plan::Plan;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Observable lifecycle state of a license.
///
/// Only `Pending`/activated and `revoked` are stored; `Expired` is derived
/// from `expires_at` and the current instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseState {
    /// Created but never activated.
    Pending,
    /// Activated and within its validity window.
    Active,
    /// Activated and past `expires_at`.
    Expired,
    /// Revoked by an admin.
    Revoked,
}

impl LicenseState {
    /// Returns true if the license currently grants access.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// A single license as held by a [`crate::LicenseStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    /// Unique license code.
    pub code: String,
    /// Plan the license was issued for.
    pub plan: Plan,
    /// When the license was created.
    pub created_at: DateTime<Utc>,
    /// First successful activation, if any.
    pub activated_at: Option<DateTime<Utc>>,
    /// Expiry computed at first activation, if any.
    pub expires_at: Option<DateTime<Utc>>,
    /// Whether the license was revoked.
    pub revoked: bool,
    /// Device bound at first activation, if any.
    pub device_id: Option<String>,
}

impl LicenseRecord {
    /// Creates a pending record.
    #[must_use]
    pub fn pending(code: impl Into<String>, plan: Plan, created_at: DateTime<Utc>) -> Self {
        Self {
            code: code.into(),
            plan,
            created_at,
            activated_at: None,
            expires_at: None,
            revoked: false,
            device_id: None,
        }
    }

    /// Returns true once the license has been activated.
    #[must_use]
    pub fn is_activated(&self) -> bool {
        self.activated_at.is_some()
    }

    /// Returns the lifecycle state as of `now`.
    #[must_use]
    pub fn state(&self, now: DateTime<Utc>) -> LicenseState {
        if self.revoked {
            return LicenseState::Revoked;
        }
        match self.expires_at {
            None => LicenseState::Pending,
            Some(exp) if is_expired(exp, now) => LicenseState::Expired,
            Some(_) => LicenseState::Active,
        }
    }
}
