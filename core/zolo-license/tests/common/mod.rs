//! Shared test helpers for license tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use zolo_license::{
    ActivationCommit, AdminGate, AdminGrant, LicenseConfig, LicenseError, LicenseRecord,
    LicenseResult, LicenseService, LicenseStore, MemoryStore, Plan, SqliteStore,
};

pub const ADMIN_KEY: &str = "test-admin-key";

/// A fixed instant with a sub-millisecond component, to catch lossy storage.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap() + chrono::Duration::nanoseconds(123_456_789)
}

pub fn grant() -> AdminGrant {
    AdminGate::new(Some(ADMIN_KEY.to_string()))
        .authorize(Some(ADMIN_KEY))
        .unwrap()
}

pub fn memory_service(config: LicenseConfig) -> LicenseService {
    LicenseService::new(Arc::new(MemoryStore::new()), config)
}

pub fn sqlite_service(config: LicenseConfig) -> LicenseService {
    LicenseService::new(Arc::new(SqliteStore::open_in_memory().unwrap()), config)
}

/// Both store backends, for tests that must hold for each of them.
pub fn all_stores() -> Vec<(&'static str, Arc<dyn LicenseStore>)> {
    vec![
        ("memory", Arc::new(MemoryStore::new())),
        ("sqlite", Arc::new(SqliteStore::open_in_memory().unwrap())),
    ]
}

/// Issues a license with `plan` created at [`t0`].
pub fn issue(service: &LicenseService, plan: &str) -> String {
    service.create_at(&grant(), plan, t0()).unwrap().code
}

/// Store whose `create` always reports a collision.
#[derive(Default)]
pub struct CollidingStore {
    pub create_calls: AtomicUsize,
}

impl LicenseStore for CollidingStore {
    fn create(
        &self,
        code: &str,
        _plan: Plan,
        _created_at: DateTime<Utc>,
    ) -> LicenseResult<LicenseRecord> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        Err(LicenseError::DuplicateCode(code.to_string()))
    }

    fn get(&self, code: &str) -> LicenseResult<LicenseRecord> {
        Err(LicenseError::NotFound(code.to_string()))
    }

    fn activate_if_pending(
        &self,
        code: &str,
        _now: DateTime<Utc>,
        _device_id: Option<&str>,
    ) -> LicenseResult<ActivationCommit> {
        Err(LicenseError::NotFound(code.to_string()))
    }

    fn revoke(&self, code: &str) -> LicenseResult<LicenseRecord> {
        Err(LicenseError::NotFound(code.to_string()))
    }

    fn list(&self) -> LicenseResult<Vec<LicenseRecord>> {
        Ok(Vec::new())
    }
}

/// Store that fails every call, as a broken backend would.
pub struct FailingStore;

impl LicenseStore for FailingStore {
    fn create(&self, _: &str, _: Plan, _: DateTime<Utc>) -> LicenseResult<LicenseRecord> {
        Err(LicenseError::Storage("disk on fire".into()))
    }

    fn get(&self, _: &str) -> LicenseResult<LicenseRecord> {
        Err(LicenseError::Storage("disk on fire".into()))
    }

    fn activate_if_pending(
        &self,
        _: &str,
        _: DateTime<Utc>,
        _: Option<&str>,
    ) -> LicenseResult<ActivationCommit> {
        Err(LicenseError::Storage("disk on fire".into()))
    }

    fn revoke(&self, _: &str) -> LicenseResult<LicenseRecord> {
        Err(LicenseError::Storage("disk on fire".into()))
    }

    fn list(&self) -> LicenseResult<Vec<LicenseRecord>> {
        Err(LicenseError::Storage("disk on fire".into()))
    }
}

/// Memory store that revokes a code just before stamping it, as if an
/// admin revoke landed between the activation's read and its stamp.
#[derive(Default)]
pub struct RevokeBeforeStampStore {
    inner: MemoryStore,
}

impl LicenseStore for RevokeBeforeStampStore {
    fn create(
        &self,
        code: &str,
        plan: Plan,
        created_at: DateTime<Utc>,
    ) -> LicenseResult<LicenseRecord> {
        self.inner.create(code, plan, created_at)
    }

    fn get(&self, code: &str) -> LicenseResult<LicenseRecord> {
        self.inner.get(code)
    }

    fn activate_if_pending(
        &self,
        code: &str,
        now: DateTime<Utc>,
        device_id: Option<&str>,
    ) -> LicenseResult<ActivationCommit> {
        self.inner.revoke(code)?;
        self.inner.activate_if_pending(code, now, device_id)
    }

    fn revoke(&self, code: &str) -> LicenseResult<LicenseRecord> {
        self.inner.revoke(code)
    }

    fn list(&self) -> LicenseResult<Vec<LicenseRecord>> {
        self.inner.list()
    }
}
