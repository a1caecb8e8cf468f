//! Admin authorization and admin-only license operations.
//!
//! Admin operations take an [`AdminGrant`], which can only be obtained from
//! [`AdminGate::authorize`].

use crate::code::generate_code;
use crate::error::{LicenseError, LicenseResult};
use crate::expiry::compute_expiry;
use crate::plan::Plan;
use crate::record::LicenseRecord;
use crate::service::LicenseService;
use chrono::{DateTime, Utc};
use subtle::ConstantTimeEq;
use tracing::{info, warn};

/// Checks admin credentials against the configured key.
///
/// With no key configured every request is rejected.
#[derive(Clone)]
pub struct AdminGate {
    key: Option<Vec<u8>>,
}

impl AdminGate {
    /// Creates a gate. `None` or an empty key disables admin access.
    #[must_use]
    pub fn new(key: Option<String>) -> Self {
        Self {
            key: key.filter(|k| !k.is_empty()).map(String::into_bytes),
        }
    }

    /// Returns true if an admin key is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.key.is_some()
    }

    /// Authorizes a caller presenting `provided`.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Unauthorized`] if no key is configured, no
    /// credential was provided, or the credential does not match.
    pub fn authorize(&self, provided: Option<&str>) -> LicenseResult<AdminGrant> {
        let (Some(expected), Some(provided)) = (self.key.as_deref(), provided) else {
            warn!(configured = self.is_configured(), "admin request rejected");
            return Err(LicenseError::Unauthorized);
        };

        if bool::from(expected.ct_eq(provided.as_bytes())) {
            Ok(AdminGrant { _private: () })
        } else {
            warn!("admin request rejected: key mismatch");
            Err(LicenseError::Unauthorized)
        }
    }
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate")
            .field("configured", &self.is_configured())
            .finish()
    }
}

/// Proof that the caller passed [`AdminGate::authorize`].
#[derive(Debug)]
pub struct AdminGrant {
    _private: (),
}

impl LicenseService {
    /// Issues a new pending license for `plan`.
    ///
    /// # Errors
    ///
    /// `InvalidPlan` for a bad token, `DuplicateCode` if every generated
    /// code collided.
    pub fn create(&self, grant: &AdminGrant, plan: &str) -> LicenseResult<LicenseRecord> {
        self.create_at(grant, plan, Utc::now())
    }

    /// Issues a new pending license stamped with `created_at`.
    ///
    /// A plan whose expiry would not be a representable instant is
    /// rejected here rather than at first activation.
    ///
    /// # Errors
    ///
    /// `InvalidPlan` for a bad token or an unrepresentable expiry,
    /// `DuplicateCode` if every generated code collided, `Storage` if the
    /// store fails.
    pub fn create_at(
        &self,
        _grant: &AdminGrant,
        plan: &str,
        created_at: DateTime<Utc>,
    ) -> LicenseResult<LicenseRecord> {
        let plan = Plan::parse_with_max(plan, self.config.max_plan_quantity)?;
        compute_expiry(created_at, &plan)?;
        let attempts = self.config.max_code_attempts.max(1);

        for attempt in 1..=attempts {
            let code = generate_code(&plan);
            match self.store.create(&code, plan, created_at) {
                Ok(record) => {
                    info!(code = %record.code, %plan, "license created");
                    return Ok(record);
                }
                Err(LicenseError::DuplicateCode(_)) => {
                    warn!(attempt, "license code collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        }

        Err(LicenseError::DuplicateCode(format!(
            "no unique {plan} code after {attempts} attempts"
        )))
    }

    /// Revokes `code`. Revoking twice is a no-op.
    pub fn revoke(&self, _grant: &AdminGrant, code: &str) -> LicenseResult<LicenseRecord> {
        let record = self.store.revoke(code)?;
        info!(code, "license revoked");
        Ok(record)
    }

    /// Returns every license, newest first.
    pub fn list(&self, _grant: &AdminGrant) -> LicenseResult<Vec<LicenseRecord>> {
        self.store.list()
    }

    /// Looks up a single license.
    pub fn get(&self, _grant: &AdminGrant, code: &str) -> LicenseResult<LicenseRecord> {
        self.store.get(code)
    }
}
