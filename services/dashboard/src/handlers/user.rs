use axum::{Json, extract::State};
use serde::Serialize;
use uuid::Uuid;

use siteplane_identity::identity::Identity;

use crate::domain::types::User;
use crate::error::DashboardError;
use crate::handlers::organizations::OrganizationResponse;
use crate::state::AppState;
use crate::usecase::user::{GetCurrentUserUseCase, GetUserOrganizationsUseCase};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub auth_id: String,
    pub email: String,
    pub name: Option<String>,
    #[serde(serialize_with = "siteplane_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "siteplane_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            auth_id: user.auth_id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ── GET /users/@me ───────────────────────────────────────────────────────────

pub async fn get_me(
    identity: Option<Identity>,
    State(state): State<AppState>,
) -> Result<Json<Option<UserResponse>>, DashboardError> {
    let uc = GetCurrentUserUseCase {
        users: state.user_repo(),
    };
    let user = uc
        .execute(identity.as_ref().map(|i| i.auth_id.as_str()))
        .await?;
    Ok(Json(user.map(UserResponse::from)))
}

// ── GET /users/@me/organizations ─────────────────────────────────────────────

pub async fn get_my_organizations(
    identity: Option<Identity>,
    State(state): State<AppState>,
) -> Result<Json<Vec<OrganizationResponse>>, DashboardError> {
    let uc = GetUserOrganizationsUseCase {
        users: state.user_repo(),
        organizations: state.organization_repo(),
        memberships: state.membership_repo(),
    };
    let organizations = uc
        .execute(identity.as_ref().map(|i| i.auth_id.as_str()))
        .await?;
    Ok(Json(
        organizations
            .into_iter()
            .map(OrganizationResponse::from)
            .collect(),
    ))
}
