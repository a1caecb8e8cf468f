//! SQLite-backed license store.
//!
//! Instants are stored as fixed-width RFC 3339 UTC strings with nanosecond
//! precision, so lexical order equals chronological order and values
//! round-trip exactly.

use super::{ActivationCommit, LicenseStore};
use crate::error::{LicenseError, LicenseResult};
use crate::expiry::compute_expiry;
use crate::plan::Plan;
use crate::record::LicenseRecord;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

const LICENSE_COLS: &str =
    "code, plan, created_at, activated_at, expires_at, revoked, device_id";

/// Persistent store for licenses backed by SQLite.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens (or creates) a license database at the given path.
    pub fn open(path: impl AsRef<Path>) -> LicenseResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            LicenseError::Storage(format!("failed to open {}: {e}", path.display()))
        })?;
        Self::from_connection(conn)
    }

    /// Opens an in-memory database (for testing).
    pub fn open_in_memory() -> LicenseResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            LicenseError::Storage(format!("failed to open in-memory license store: {e}"))
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> LicenseResult<Self> {
        // Other processes may hold the write lock while activating.
        conn.busy_timeout(Duration::from_secs(5))?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> LicenseResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS licenses (
                code TEXT PRIMARY KEY,
                plan TEXT NOT NULL,
                created_at TEXT NOT NULL,
                activated_at TEXT,
                expires_at TEXT,
                revoked INTEGER NOT NULL DEFAULT 0,
                device_id TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_licenses_expires_at ON licenses(expires_at);
            ",
        )
        .map_err(|e| LicenseError::Storage(format!("failed to init license schema: {e}")))?;
        Ok(())
    }

    fn lock(&self) -> LicenseResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| LicenseError::Storage("license store lock poisoned".to_string()))
    }

    fn select(conn: &Connection, code: &str) -> LicenseResult<Option<LicenseRecord>> {
        let raw = conn
            .query_row(
                &format!("SELECT {LICENSE_COLS} FROM licenses WHERE code = ?1"),
                params![code],
                RawRow::from_row,
            )
            .optional()?;
        raw.map(RawRow::into_record).transpose()
    }
}

impl LicenseStore for SqliteStore {
    fn create(
        &self,
        code: &str,
        plan: Plan,
        created_at: DateTime<Utc>,
    ) -> LicenseResult<LicenseRecord> {
        let conn = self.lock()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO licenses (code, plan, created_at, revoked) VALUES (?1, ?2, ?3, 0)",
            params![code, plan.to_string(), encode_instant(created_at)],
        )?;
        if inserted == 0 {
            return Err(LicenseError::DuplicateCode(code.to_string()));
        }
        Ok(LicenseRecord::pending(code, plan, created_at))
    }

    fn get(&self, code: &str) -> LicenseResult<LicenseRecord> {
        let conn = self.lock()?;
        Self::select(&conn, code)?.ok_or_else(|| LicenseError::NotFound(code.to_string()))
    }

    fn activate_if_pending(
        &self,
        code: &str,
        now: DateTime<Utc>,
        device_id: Option<&str>,
    ) -> LicenseResult<ActivationCommit> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current =
            Self::select(&tx, code)?.ok_or_else(|| LicenseError::NotFound(code.to_string()))?;
        if current.is_activated() {
            return Ok(ActivationCommit {
                record: current,
                stamped: false,
            });
        }

        let expires_at = compute_expiry(now, &current.plan)?;
        let updated = tx.execute(
            "UPDATE licenses SET activated_at = ?1, expires_at = ?2, device_id = ?3
             WHERE code = ?4 AND activated_at IS NULL",
            params![
                encode_instant(now),
                encode_instant(expires_at),
                device_id,
                code
            ],
        )?;

        let record =
            Self::select(&tx, code)?.ok_or_else(|| LicenseError::NotFound(code.to_string()))?;
        tx.commit()?;

        Ok(ActivationCommit {
            record,
            stamped: updated == 1,
        })
    }

    fn revoke(&self, code: &str) -> LicenseResult<LicenseRecord> {
        let conn = self.lock()?;
        let affected = conn.execute(
            "UPDATE licenses SET revoked = 1 WHERE code = ?1",
            params![code],
        )?;
        if affected == 0 {
            return Err(LicenseError::NotFound(code.to_string()));
        }
        Self::select(&conn, code)?.ok_or_else(|| LicenseError::NotFound(code.to_string()))
    }

    fn list(&self) -> LicenseResult<Vec<LicenseRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {LICENSE_COLS} FROM licenses ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt.query_map([], RawRow::from_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into_record()?);
        }
        Ok(records)
    }
}

/// Column values as read from SQLite, before validation.
struct RawRow {
    code: String,
    plan: String,
    created_at: String,
    activated_at: Option<String>,
    expires_at: Option<String>,
    revoked: bool,
    device_id: Option<String>,
}

impl RawRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            code: row.get(0)?,
            plan: row.get(1)?,
            created_at: row.get(2)?,
            activated_at: row.get(3)?,
            expires_at: row.get(4)?,
            revoked: row.get(5)?,
            device_id: row.get(6)?,
        })
    }

    fn into_record(self) -> LicenseResult<LicenseRecord> {
        let plan = Plan::parse_with_max(&self.plan, u32::MAX)
            .map_err(|e| LicenseError::Storage(format!("corrupt plan for {}: {e}", self.code)))?;
        Ok(LicenseRecord {
            plan,
            created_at: decode_instant(&self.created_at)?,
            activated_at: self.activated_at.as_deref().map(decode_instant).transpose()?,
            expires_at: self.expires_at.as_deref().map(decode_instant).transpose()?,
            revoked: self.revoked,
            device_id: self.device_id,
            code: self.code,
        })
    }
}

fn encode_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn decode_instant(raw: &str) -> LicenseResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| LicenseError::Storage(format!("corrupt timestamp `{raw}`: {e}")))
}
