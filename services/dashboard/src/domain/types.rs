use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use siteplane_domain::role::MembershipRole;
use siteplane_domain::site::SiteStatus;

/// Local mirror of an identity-provider user.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub auth_id: String,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Local mirror of an identity-provider organization.
#[derive(Debug, Clone)]
pub struct Organization {
    pub id: Uuid,
    pub external_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Membership linking a user to an organization.
#[derive(Debug, Clone)]
pub struct Membership {
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub role: MembershipRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Content container owned by an organization.
#[derive(Debug, Clone)]
pub struct Site {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub created_by: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub status: SiteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field-level changes for a partial site update. `None` means "leave
/// unchanged"; there is no way to clear a description through an update.
/// An all-`None` update is valid and refreshes `updated_at` only.
#[derive(Debug, Clone, Default)]
pub struct SiteChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub status: Option<SiteStatus>,
}

/// Outbox event awaiting dispatch.
#[derive(Debug, Clone)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
    pub attempts: i32,
}

/// Provider id of the default "personal workspace" organization.
///
/// Carried in `AppState` and injected into the usecases that special-case
/// it; never read from a global.
#[derive(Debug, Clone)]
pub struct DefaultOrg(String);

impl DefaultOrg {
    pub fn new(external_id: impl Into<String>) -> Self {
        Self(external_id.into())
    }

    pub fn matches(&self, external_id: &str) -> bool {
        self.0 == external_id
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ── Identity-provider webhook events ─────────────────────────────────────────

/// User lifecycle event payload (`user.created` / `user.updated`).
#[derive(Debug, Clone, Deserialize)]
pub struct UserEventData {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Deletion payload carrying only the provider id.
#[derive(Debug, Clone, Deserialize)]
pub struct DeletedEventData {
    pub id: String,
}

/// Organization lifecycle event payload.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationEventData {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleData {
    pub slug: String,
}

/// Membership lifecycle event payload. `role` is absent on deletions.
#[derive(Debug, Clone, Deserialize)]
pub struct MembershipEventData {
    pub user_id: String,
    pub organization_id: String,
    pub role: Option<RoleData>,
}

/// Parsed identity-provider lifecycle event.
///
/// Wire format: `{"event": "<name>", "data": {...}}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum IdentityEvent {
    #[serde(rename = "user.created")]
    UserCreated(UserEventData),
    #[serde(rename = "user.updated")]
    UserUpdated(UserEventData),
    #[serde(rename = "user.deleted")]
    UserDeleted(DeletedEventData),
    #[serde(rename = "organization.created")]
    OrganizationCreated(OrganizationEventData),
    #[serde(rename = "organization.updated")]
    OrganizationUpdated(OrganizationEventData),
    #[serde(rename = "organization.deleted")]
    OrganizationDeleted(DeletedEventData),
    #[serde(rename = "organization_membership.created")]
    MembershipCreated(MembershipEventData),
    #[serde(rename = "organization_membership.updated")]
    MembershipUpdated(MembershipEventData),
    #[serde(rename = "organization_membership.deleted")]
    MembershipDeleted(MembershipEventData),
}

impl IdentityEvent {
    /// Event names this service consumes. Anything else is acknowledged
    /// and ignored by the webhook handler.
    pub fn is_known_event(name: &str) -> bool {
        matches!(
            name,
            "user.created"
                | "user.updated"
                | "user.deleted"
                | "organization.created"
                | "organization.updated"
                | "organization.deleted"
                | "organization_membership.created"
                | "organization_membership.updated"
                | "organization_membership.deleted"
        )
    }
}
