use axum::{extract::State, http::StatusCode};
use sea_orm::DbErr;

use crate::state::AppState;

/// Handler for `GET /healthz` — liveness check.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Handler for `GET /readyz` — readiness check backed by a database ping.
/// Not ready means the gateway should stop routing here, not that the
/// process should restart.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    let ping = state.db.ping().await;
    if let Err(ref e) = ping {
        tracing::warn!(error = %e, "database ping failed");
    }
    readiness_status(ping)
}

fn readiness_status(ping: Result<(), DbErr>) -> StatusCode {
    match ping {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
