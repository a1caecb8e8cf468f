//! Licensing and activation for Zolo.
//!
//! This crate handles:
//! - Plan parsing (`30D`, `1Y`, ...)
//! - License code generation from a CSPRNG
//! - First-activation stamping with optional device binding
//! - Expiry and revocation checks
//!
//! # Lifecycle
//!
//! A license is created *pending*. The first successful activation stamps
//! `activated_at`, `expires_at` and (optionally) `device_id` exactly once.
//! Revocation can happen at any time and is permanent. *Expired* is derived
//! from `expires_at`, never stored.
//!
//! # Code Format
//!
//! Codes are formatted as `ZOLO-<plan>-<12 alphanumeric chars>`.

mod activation;
mod admin;
mod code;
mod error;
mod expiry;
mod plan;
mod record;
mod service;
mod store;

pub use activation::{ActivationOutcome, ActivationStatus};
pub use admin::{AdminGate, AdminGrant};
pub use code::{generate_code, CODE_PREFIX, CODE_SUFFIX_LEN};
pub use error::{LicenseError, LicenseResult};
pub use expiry::{compute_expiry, is_expired};
pub use plan::{Plan, PlanUnit, DEFAULT_MAX_PLAN_QUANTITY};
pub use record::{LicenseRecord, LicenseState};
pub use service::{LicenseConfig, LicenseService};
pub use store::{ActivationCommit, LicenseStore, MemoryStore, SqliteStore};
