//! HTTP API for the Zolo license service.

pub mod error;
pub mod extractors;

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use zolo_license::{ActivationOutcome, AdminGate, LicenseRecord, LicenseResult, LicenseService};

use crate::error::Result;
use crate::extractors::{Admin, Json};

pub use crate::extractors::ADMIN_KEY_HEADER;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<LicenseService>,
    pub gate: Arc<AdminGate>,
}

impl AppState {
    pub fn new(service: LicenseService, gate: AdminGate) -> Self {
        Self {
            service: Arc::new(service),
            gate: Arc::new(gate),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ActivateRequest {
    pub code: String,
    #[serde(default)]
    pub device_id: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CreateRequest {
    pub plan: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CreateResponse {
    pub code: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RevokeRequest {
    pub code: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RevokeResponse {
    pub status: String,
}

/// Runs a store-backed service call on the blocking pool.
///
/// Stores do synchronous I/O under a mutex and may wait on SQLite's busy
/// timeout, which must not stall a runtime worker.
async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> LicenseResult<T> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// POST /activate
///
/// Always answers 200 with an outcome unless storage fails.
async fn activate_handler(
    State(state): State<AppState>,
    Json(body): Json<ActivateRequest>,
) -> Result<Json<ActivationOutcome>> {
    let service = Arc::clone(&state.service);
    let outcome =
        blocking(move || service.activate(&body.code, body.device_id.as_deref())).await?;
    Ok(Json(outcome))
}

/// POST /admin/create
async fn create_handler(
    State(state): State<AppState>,
    Admin(grant): Admin,
    Json(body): Json<CreateRequest>,
) -> Result<Json<CreateResponse>> {
    let service = Arc::clone(&state.service);
    let record = blocking(move || service.create(&grant, &body.plan)).await?;
    Ok(Json(CreateResponse { code: record.code }))
}

/// POST /admin/revoke
async fn revoke_handler(
    State(state): State<AppState>,
    Admin(grant): Admin,
    Json(body): Json<RevokeRequest>,
) -> Result<Json<RevokeResponse>> {
    let service = Arc::clone(&state.service);
    blocking(move || service.revoke(&grant, &body.code)).await?;
    Ok(Json(RevokeResponse {
        status: "REVOKED".to_string(),
    }))
}

/// GET /admin/licenses
async fn list_handler(
    State(state): State<AppState>,
    Admin(grant): Admin,
) -> Result<Json<Vec<LicenseRecord>>> {
    let service = Arc::clone(&state.service);
    Ok(Json(blocking(move || service.list(&grant)).await?))
}

/// GET /admin/licenses/{code}
async fn get_handler(
    State(state): State<AppState>,
    Admin(grant): Admin,
    Path(code): Path<String>,
) -> Result<Json<LicenseRecord>> {
    let service = Arc::clone(&state.service);
    Ok(Json(blocking(move || service.get(&grant, &code)).await?))
}

/// Build the HTTP API router with the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/activate", post(activate_handler))
        .route("/admin/create", post(create_handler))
        .route("/admin/revoke", post(revoke_handler))
        .route("/admin/licenses", get(list_handler))
        .route("/admin/licenses/{code}", get(get_handler))
        .with_state(state)
}
