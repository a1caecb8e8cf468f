//! Expiry computation.
//!
//! A year is exactly 365 days; expiry is not calendar-aware.

use crate::error::{LicenseError, LicenseResult};
use crate::plan::Plan;
use chrono::{DateTime, Duration, Utc};

/// Returns the instant at which a license activated at `activated_at`
/// with `plan` expires.
///
/// # Errors
///
/// Returns [`LicenseError::InvalidPlan`] if the result is not a
/// representable instant.
pub fn compute_expiry(activated_at: DateTime<Utc>, plan: &Plan) -> LicenseResult<DateTime<Utc>> {
    Duration::try_days(plan.total_days())
        .and_then(|length| activated_at.checked_add_signed(length))
        .ok_or_else(|| LicenseError::InvalidPlan(format!("{plan} expiry is out of range")))
}

/// Returns true once `now` is strictly after `expires_at`.
#[must_use]
pub fn is_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now > expires_at
}
