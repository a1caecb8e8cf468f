use super::{ActivationCommit, LicenseStore};
use crate::error::{LicenseError, LicenseResult};
use crate::expiry::compute_expiry;
use crate::plan::Plan;
use crate::record::LicenseRecord;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Inner {
    records: HashMap<String, Entry>,
    next_seq: u64,
}

struct Entry {
    seq: u64,
    record: LicenseRecord,
}

/// In-memory store. Records live for the lifetime of the process.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> LicenseResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| LicenseError::Storage("memory store lock poisoned".to_string()))
    }
}

impl LicenseStore for MemoryStore {
    fn create(
        &self,
        code: &str,
        plan: Plan,
        created_at: DateTime<Utc>,
    ) -> LicenseResult<LicenseRecord> {
        let mut inner = self.lock()?;
        if inner.records.contains_key(code) {
            return Err(LicenseError::DuplicateCode(code.to_string()));
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        let record = LicenseRecord::pending(code, plan, created_at);
        inner.records.insert(
            code.to_string(),
            Entry {
                seq,
                record: record.clone(),
            },
        );
        Ok(record)
    }

    fn get(&self, code: &str) -> LicenseResult<LicenseRecord> {
        self.lock()?
            .records
            .get(code)
            .map(|e| e.record.clone())
            .ok_or_else(|| LicenseError::NotFound(code.to_string()))
    }

    fn activate_if_pending(
        &self,
        code: &str,
        now: DateTime<Utc>,
        device_id: Option<&str>,
    ) -> LicenseResult<ActivationCommit> {
        let mut inner = self.lock()?;
        let record = &mut inner
            .records
            .get_mut(code)
            .ok_or_else(|| LicenseError::NotFound(code.to_string()))?
            .record;

        if record.is_activated() {
            return Ok(ActivationCommit {
                record: record.clone(),
                stamped: false,
            });
        }

        let expires_at = compute_expiry(now, &record.plan)?;
        record.activated_at = Some(now);
        record.expires_at = Some(expires_at);
        record.device_id = device_id.map(str::to_string);

        Ok(ActivationCommit {
            record: record.clone(),
            stamped: true,
        })
    }

    fn revoke(&self, code: &str) -> LicenseResult<LicenseRecord> {
        let mut inner = self.lock()?;
        let entry = inner
            .records
            .get_mut(code)
            .ok_or_else(|| LicenseError::NotFound(code.to_string()))?;
        entry.record.revoked = true;
        Ok(entry.record.clone())
    }

    fn list(&self) -> LicenseResult<Vec<LicenseRecord>> {
        let inner = self.lock()?;
        let mut entries: Vec<&Entry> = inner.records.values().collect();
        entries.sort_by(|a, b| {
            b.record
                .created_at
                .cmp(&a.record.created_at)
                .then(b.seq.cmp(&a.seq))
        });
        Ok(entries.into_iter().map(|e| e.record.clone()).collect())
    }
}
