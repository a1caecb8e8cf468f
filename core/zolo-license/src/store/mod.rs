//! License storage abstraction.
//!
//! The store is the only shared mutable state in the system. Every backend
//! must make [`LicenseStore::activate_if_pending`] a single atomic
//! read-modify-write per code.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::LicenseResult;
use crate::plan::Plan;
use crate::record::LicenseRecord;
use chrono::{DateTime, Utc};

/// Result of [`LicenseStore::activate_if_pending`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationCommit {
    /// The record after the call.
    pub record: LicenseRecord,
    /// True if this call stamped the activation; false if it was already
    /// activated.
    pub stamped: bool,
}

/// Keyed collection of license records.
pub trait LicenseStore: Send + Sync {
    /// Inserts a pending record.
    ///
    /// Fails with `DuplicateCode` if `code` already exists.
    fn create(
        &self,
        code: &str,
        plan: Plan,
        created_at: DateTime<Utc>,
    ) -> LicenseResult<LicenseRecord>;

    /// Returns the record for `code`, or `NotFound`.
    fn get(&self, code: &str) -> LicenseResult<LicenseRecord>;

    /// Stamps `activated_at`, `expires_at` and `device_id` if the record is
    /// still pending; otherwise returns the stored activation untouched.
    ///
    /// Concurrent callers for the same code all observe the values written
    /// by exactly one of them.
    fn activate_if_pending(
        &self,
        code: &str,
        now: DateTime<Utc>,
        device_id: Option<&str>,
    ) -> LicenseResult<ActivationCommit>;

    /// Marks the record revoked. Idempotent.
    fn revoke(&self, code: &str) -> LicenseResult<LicenseRecord>;

    /// Returns every record, newest first.
    fn list(&self) -> LicenseResult<Vec<LicenseRecord>>;
}
