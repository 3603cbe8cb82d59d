use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, Redirect},
    Form, Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::api::pages;
use crate::errors::AppError;
use crate::models::history::{HistoryEntry, HistoryForm};
use crate::models::service::ServiceStatus;
use crate::models::snapshot::{BalanceData, CommonData, DeviceStatus, ObdData};
use crate::AppState;

// ── Response DTOs ────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: DeviceStatus,
    pub indicator: &'static str,
    pub mileage: Option<i64>,
    pub updated_at: Option<String>,
    pub services: Vec<ServiceStatus>,
    /// Fuel and odometer readings of the first device.
    pub obd: Option<ObdData>,
    /// Battery, temperatures and signal levels of the first device.
    pub common: Option<CommonData>,
    /// SIM balance entries of the first device.
    pub balance: Vec<BalanceData>,
}

/// Everything the dashboard shows, read fresh from disk.
pub(crate) fn current_status(state: &AppState) -> StatusResponse {
    let snapshot = state.snapshots.load();
    let mileage = snapshot.mileage();
    let services = mileage.map(|m| state.services.list(m)).unwrap_or_default();
    let status = snapshot.status();

    StatusResponse {
        status,
        indicator: status.indicator(),
        mileage,
        updated_at: snapshot.update_timestamp(),
        services,
        obd: snapshot.obd(),
        common: snapshot.common(),
        balance: snapshot.balance(),
    }
}

// ── Handlers ─────────────────────────────────────────────────

/// GET / — mileage, status, last update and service reminders
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Html<String> {
    let status = current_status(&state);
    tracing::debug!(services = status.services.len(), "rendering dashboard");
    Html(pages::dashboard(&status))
}

/// GET /history — service log plus the entry form
pub async fn history(State(state): State<Arc<AppState>>) -> Html<String> {
    let mileage = state.snapshots.load().mileage();
    let entries = state.history.load();
    // only well-formed reminders are offered, and none until mileage is known
    let service_names: Vec<String> = mileage
        .map(|m| state.services.list(m))
        .unwrap_or_default()
        .into_iter()
        .map(|s| s.description)
        .collect();
    let today = chrono::Local::now().format("%d.%m.%Y").to_string();

    Html(pages::history(&entries, &service_names, mileage, &today))
}

/// POST /history/add — validate, append, bump the matching reminder
pub async fn add_history_entry(
    State(state): State<Arc<AppState>>,
    Form(form): Form<HistoryForm>,
) -> Result<Redirect, AppError> {
    let entry = match HistoryEntry::try_from(form) {
        Ok(entry) => entry,
        Err(e) => {
            tracing::warn!("rejected history entry: {}", e);
            return Ok(Redirect::to("/history"));
        }
    };

    let service = entry.service.clone();
    let mileage = entry.mileage;
    state.history.append(entry)?;
    state.services.record_action(&service, mileage)?;

    Ok(Redirect::to("/history"))
}

/// GET /api/v1/status
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(current_status(&state))
}

/// GET /api/v1/snapshot — raw cached vendor document, `{}` before the first refresh
pub async fn snapshot(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(state.snapshots.load().into_raw())
}
