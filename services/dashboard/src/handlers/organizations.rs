use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::types::Organization;
use crate::error::DashboardError;
use crate::state::AppState;
use crate::usecase::user::GetOrganizationByExternalIdUseCase;

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct OrganizationResponse {
    pub id: Uuid,
    pub external_id: String,
    pub name: String,
    #[serde(serialize_with = "siteplane_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "siteplane_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Organization> for OrganizationResponse {
    fn from(org: Organization) -> Self {
        Self {
            id: org.id,
            external_id: org.external_id,
            name: org.name,
            created_at: org.created_at,
            updated_at: org.updated_at,
        }
    }
}

// ── GET /organizations/{external_id} ─────────────────────────────────────────

pub async fn get_organization(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
) -> Result<Json<Option<OrganizationResponse>>, DashboardError> {
    let uc = GetOrganizationByExternalIdUseCase {
        organizations: state.organization_repo(),
    };
    let organization = uc.execute(&external_id).await?;
    Ok(Json(organization.map(OrganizationResponse::from)))
}
