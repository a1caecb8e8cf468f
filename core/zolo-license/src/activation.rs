//! Activation decision logic.
//!
//! Checks run in a fixed order and the first match wins:
//! unknown code, revoked, first-activation stamp, device mismatch, expiry.

use crate::error::{LicenseError, LicenseResult};
use crate::expiry::is_expired;
use crate::service::LicenseService;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

/// Status returned to an activating client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivationStatus {
    /// License is activated and valid.
    Ok,
    /// No license with this code.
    Invalid,
    /// License was revoked.
    Revoked,
    /// License is past its expiry.
    Expired,
    /// License is bound to a different device.
    DeviceMismatch,
}

/// Outcome of an activation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationOutcome {
    pub status: ActivationStatus,
    /// Set for `Ok` and `Expired`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Set for `Ok`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activated_at: Option<DateTime<Utc>>,
}

impl ActivationOutcome {
    fn bare(status: ActivationStatus) -> Self {
        Self {
            status,
            expires_at: None,
            activated_at: None,
        }
    }

    /// Returns true if the client may use the license.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == ActivationStatus::Ok
    }
}

impl LicenseService {
    /// Activates or validates `code` as of the current instant.
    ///
    /// # Errors
    ///
    /// Only storage failures are errors; every business outcome is an
    /// [`ActivationOutcome`].
    pub fn activate(
        &self,
        code: &str,
        device_id: Option<&str>,
    ) -> LicenseResult<ActivationOutcome> {
        self.activate_at(code, device_id, Utc::now())
    }

    /// Activates or validates `code` as of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Storage`] if the store fails or holds a
    /// half-activated record. Unknown, revoked, expired and mismatched
    /// licenses are outcomes, not errors.
    pub fn activate_at(
        &self,
        code: &str,
        device_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> LicenseResult<ActivationOutcome> {
        let device_id = device_id.map(str::trim).filter(|d| !d.is_empty());
        let outcome = self.decide(code, device_id, now).inspect_err(|e| {
            error!(code, error = %e, "activation failed");
        })?;
        debug!(code, status = ?outcome.status, "activation outcome");
        Ok(outcome)
    }

    fn decide(
        &self,
        code: &str,
        device_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> LicenseResult<ActivationOutcome> {
        let record = match self.store.get(code) {
            Ok(record) => record,
            Err(LicenseError::NotFound(_)) => {
                return Ok(ActivationOutcome::bare(ActivationStatus::Invalid));
            }
            Err(e) => return Err(e),
        };

        if record.revoked {
            return Ok(ActivationOutcome::bare(ActivationStatus::Revoked));
        }

        let record = if record.is_activated() {
            record
        } else {
            match self.store.activate_if_pending(code, now, device_id) {
                Ok(commit) => {
                    if commit.stamped {
                        info!(
                            code,
                            expires_at = ?commit.record.expires_at,
                            bound = commit.record.device_id.is_some(),
                            "license activated"
                        );
                    }
                    commit.record
                }
                Err(LicenseError::NotFound(_)) => {
                    return Ok(ActivationOutcome::bare(ActivationStatus::Invalid));
                }
                Err(e) => return Err(e),
            }
        };

        // A revoke may have committed between the read and the stamp.
        if record.revoked {
            return Ok(ActivationOutcome::bare(ActivationStatus::Revoked));
        }

        let (Some(activated_at), Some(expires_at)) = (record.activated_at, record.expires_at)
        else {
            return Err(LicenseError::Storage(format!(
                "license {code} has a partial activation"
            )));
        };

        if let (Some(requested), Some(bound)) = (device_id, record.device_id.as_deref()) {
            if requested != bound && !self.config.multi_device {
                return Ok(ActivationOutcome::bare(ActivationStatus::DeviceMismatch));
            }
        }

        if is_expired(expires_at, now) {
            return Ok(ActivationOutcome {
                status: ActivationStatus::Expired,
                expires_at: Some(expires_at),
                activated_at: None,
            });
        }

        Ok(ActivationOutcome {
            status: ActivationStatus::Ok,
            expires_at: Some(expires_at),
            activated_at: Some(activated_at),
        })
    }
}
