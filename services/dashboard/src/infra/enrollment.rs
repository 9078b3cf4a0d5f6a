use anyhow::Context as _;
use serde_json::json;

use siteplane_domain::role::MembershipRole;

use crate::domain::repository::EnrollmentPort;
use crate::error::DashboardError;

/// Identity-provider management API client.
#[derive(Clone)]
pub struct HttpEnrollmentClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpEnrollmentClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

impl EnrollmentPort for HttpEnrollmentClient {
    async fn create_membership(
        &self,
        auth_user_id: &str,
        org_external_id: &str,
        role: MembershipRole,
    ) -> Result<(), DashboardError> {
        let response = self
            .http
            .post(format!(
                "{}/user_management/organization_memberships",
                self.base_url
            ))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "user_id": auth_user_id,
                "organization_id": org_external_id,
                "role_slug": role.as_slug(),
            }))
            .send()
            .await
            .context("send enrollment request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DashboardError::Internal(anyhow::anyhow!(
                "enrollment request failed with {status}: {body}"
            )));
        }
        Ok(())
    }
}
