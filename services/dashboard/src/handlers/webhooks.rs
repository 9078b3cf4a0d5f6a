use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use serde_json::Value;
use subtle::ConstantTimeEq as _;

use crate::domain::types::IdentityEvent;
use crate::error::DashboardError;
use crate::state::AppState;
use crate::usecase::sync::SyncIdentityEventUseCase;

/// Header carrying the shared webhook secret.
pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

// ── POST /webhooks/identity ──────────────────────────────────────────────────

/// Receives identity-provider lifecycle events.
///
/// Returns 200 for applied events, dropped events, and unrecognized event
/// names alike — the provider only needs to retry transport/persistence
/// failures.
pub async fn receive_identity_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<StatusCode, DashboardError> {
    verify_secret(&headers, &state.webhook_secret)?;

    let Some(event) = parse_event(body)? else {
        return Ok(StatusCode::OK);
    };

    let uc = SyncIdentityEventUseCase {
        users: state.user_repo(),
        organizations: state.organization_repo(),
        memberships: state.membership_repo(),
    };
    uc.execute(event).await?;
    Ok(StatusCode::OK)
}

fn verify_secret(headers: &HeaderMap, expected: &str) -> Result<(), DashboardError> {
    let provided = headers
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    // Constant-time comparison; a short-circuiting == would leak the
    // matching prefix length through response timing.
    if bool::from(provided.as_bytes().ct_eq(expected.as_bytes())) {
        Ok(())
    } else {
        Err(DashboardError::InvalidWebhookSecret)
    }
}

/// Parse the webhook envelope. `Ok(None)` means an event name this service
/// does not consume; a malformed payload for a known event is an error.
fn parse_event(body: Value) -> Result<Option<IdentityEvent>, DashboardError> {
    let name = body
        .get("event")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .ok_or(DashboardError::MissingData)?;
    if !IdentityEvent::is_known_event(&name) {
        tracing::debug!(event = %name, "ignoring unrecognized identity event");
        return Ok(None);
    }
    serde_json::from_value(body)
        .map(Some)
        .map_err(|_| DashboardError::MissingData)
}
