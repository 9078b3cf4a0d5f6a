use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use siteplane_domain::site::SiteStatus;
use siteplane_identity::identity::Identity;

use crate::domain::types::{Site, SiteChanges};
use crate::error::DashboardError;
use crate::state::AppState;
use crate::usecase::sites::{
    CreateSiteInput, CreateSiteUseCase, DeleteSiteUseCase, GetSiteBySlugUseCase,
    ListSitesUseCase, UpdateSiteUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SiteResponse {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub created_by: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub status: SiteStatus,
    #[serde(serialize_with = "siteplane_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "siteplane_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Site> for SiteResponse {
    fn from(site: Site) -> Self {
        Self {
            id: site.id,
            organization_id: site.organization_id,
            created_by: site.created_by,
            name: site.name,
            slug: site.slug,
            description: site.description,
            status: site.status,
            created_at: site.created_at,
            updated_at: site.updated_at,
        }
    }
}

// ── GET /organizations/{external_id}/sites ───────────────────────────────────

pub async fn list_sites(
    identity: Option<Identity>,
    State(state): State<AppState>,
    Path(external_id): Path<String>,
) -> Result<Json<Vec<SiteResponse>>, DashboardError> {
    let uc = ListSitesUseCase {
        access: state.access_resolver(),
        sites: state.site_repo(),
        default_org: state.default_org.clone(),
    };
    let sites = uc
        .execute(identity.as_ref().map(|i| i.auth_id.as_str()), &external_id)
        .await?;
    Ok(Json(sites.into_iter().map(SiteResponse::from).collect()))
}

// ── GET /organizations/{external_id}/sites/{slug} ────────────────────────────

pub async fn get_site_by_slug(
    identity: Option<Identity>,
    State(state): State<AppState>,
    Path((external_id, slug)): Path<(String, String)>,
) -> Result<Json<Option<SiteResponse>>, DashboardError> {
    let uc = GetSiteBySlugUseCase {
        access: state.access_resolver(),
        sites: state.site_repo(),
        default_org: state.default_org.clone(),
    };
    let site = uc
        .execute(
            identity.as_ref().map(|i| i.auth_id.as_str()),
            &external_id,
            &slug,
        )
        .await?;
    Ok(Json(site.map(SiteResponse::from)))
}

// ── POST /organizations/{external_id}/sites ──────────────────────────────────

#[derive(Deserialize)]
pub struct CreateSiteRequest {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub status: SiteStatus,
}

pub async fn create_site(
    identity: Identity,
    State(state): State<AppState>,
    Path(external_id): Path<String>,
    Json(body): Json<CreateSiteRequest>,
) -> Result<(StatusCode, Json<SiteResponse>), DashboardError> {
    let uc = CreateSiteUseCase {
        access: state.access_resolver(),
        sites: state.site_repo(),
    };
    let site = uc
        .execute(
            &identity.auth_id,
            &external_id,
            CreateSiteInput {
                name: body.name,
                slug: body.slug,
                description: body.description,
                status: body.status,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(SiteResponse::from(site))))
}

// ── PATCH /sites/{site_id} ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateSiteRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub status: Option<SiteStatus>,
}

pub async fn update_site(
    identity: Identity,
    State(state): State<AppState>,
    Path(site_id): Path<Uuid>,
    Json(body): Json<UpdateSiteRequest>,
) -> Result<StatusCode, DashboardError> {
    let uc = UpdateSiteUseCase {
        access: state.access_resolver(),
        sites: state.site_repo(),
        default_org: state.default_org.clone(),
    };
    uc.execute(
        &identity.auth_id,
        site_id,
        SiteChanges {
            name: body.name,
            slug: body.slug,
            description: body.description,
            status: body.status,
        },
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /sites/{site_id} ──────────────────────────────────────────────────

pub async fn delete_site(
    identity: Identity,
    State(state): State<AppState>,
    Path(site_id): Path<Uuid>,
) -> Result<StatusCode, DashboardError> {
    let uc = DeleteSiteUseCase {
        access: state.access_resolver(),
        sites: state.site_repo(),
        default_org: state.default_org.clone(),
    };
    uc.execute(&identity.auth_id, site_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
