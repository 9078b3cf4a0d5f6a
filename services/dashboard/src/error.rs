use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Dashboard service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("user not found")]
    UserNotFound,
    #[error("organization not found")]
    OrganizationNotFound,
    #[error("site not found")]
    SiteNotFound,
    #[error("not a member of this organization")]
    NotAMember,
    #[error("you can only modify your own sites")]
    NotSiteOwner,
    #[error("a site with this slug already exists")]
    DuplicateSlug,
    #[error("invalid slug")]
    InvalidSlug,
    #[error("missing data")]
    MissingData,
    #[error("invalid webhook secret")]
    InvalidWebhookSecret,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl DashboardError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::OrganizationNotFound => "ORGANIZATION_NOT_FOUND",
            Self::SiteNotFound => "SITE_NOT_FOUND",
            Self::NotAMember => "NOT_A_MEMBER",
            Self::NotSiteOwner => "NOT_SITE_OWNER",
            Self::DuplicateSlug => "DUPLICATE_SLUG",
            Self::InvalidSlug => "INVALID_SLUG",
            Self::MissingData => "MISSING_DATA",
            Self::InvalidWebhookSecret => "INVALID_WEBHOOK_SECRET",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// True for the authorization guard-chain failures that read
    /// operations soften to empty/None instead of surfacing.
    pub fn is_access_guard(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound | Self::OrganizationNotFound | Self::NotAMember
        )
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UserNotFound | Self::OrganizationNotFound | Self::SiteNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::NotAMember | Self::NotSiteOwner => StatusCode::FORBIDDEN,
            Self::DuplicateSlug => StatusCode::CONFLICT,
            Self::InvalidSlug | Self::MissingData => StatusCode::BAD_REQUEST,
            Self::InvalidWebhookSecret => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — the TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
