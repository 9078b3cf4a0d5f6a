#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use siteplane_domain::role::MembershipRole;

use crate::domain::types::{
    Membership, Organization, OutboxEvent, Site, SiteChanges, User,
};
use crate::error::DashboardError;

/// Repository for the local user mirror.
pub trait UserRepository: Send + Sync {
    async fn find_by_auth_id(&self, auth_id: &str) -> Result<Option<User>, DashboardError>;

    /// Idempotent insert keyed on `auth_id` — a redelivered create event
    /// must not fail on the unique index.
    async fn insert(&self, user: &User) -> Result<(), DashboardError>;

    /// Insert a user and an outbox event atomically (same transaction).
    async fn insert_with_outbox(
        &self,
        user: &User,
        event: &OutboxEvent,
    ) -> Result<(), DashboardError>;

    async fn update_profile(
        &self,
        id: Uuid,
        email: &str,
        name: Option<&str>,
    ) -> Result<(), DashboardError>;

    async fn delete(&self, id: Uuid) -> Result<(), DashboardError>;
}

/// Repository for the local organization mirror.
pub trait OrganizationRepository: Send + Sync {
    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Organization>, DashboardError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Organization>, DashboardError>;

    /// Idempotent insert keyed on `external_id`.
    async fn insert(&self, organization: &Organization) -> Result<(), DashboardError>;

    async fn update_name(&self, id: Uuid, name: &str) -> Result<(), DashboardError>;

    async fn delete(&self, id: Uuid) -> Result<(), DashboardError>;
}

/// Repository for organization memberships.
pub trait MembershipRepository: Send + Sync {
    async fn find(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<Membership>, DashboardError>;

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Membership>, DashboardError>;

    async fn insert(&self, membership: &Membership) -> Result<(), DashboardError>;

    async fn update_role(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
        role: MembershipRole,
    ) -> Result<(), DashboardError>;

    /// Delete one membership. Returns `true` if a row was deleted.
    async fn delete(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<bool, DashboardError>;

    /// Delete all memberships for a user. Returns the number of rows deleted.
    async fn delete_by_user(&self, user_id: Uuid) -> Result<u64, DashboardError>;

    /// Delete all memberships for an organization. Returns the number of rows deleted.
    async fn delete_by_organization(&self, organization_id: Uuid)
    -> Result<u64, DashboardError>;
}

/// Repository for sites.
pub trait SiteRepository: Send + Sync {
    async fn list_by_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<Site>, DashboardError>;

    async fn find_by_slug(
        &self,
        organization_id: Uuid,
        slug: &str,
    ) -> Result<Option<Site>, DashboardError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Site>, DashboardError>;

    async fn insert(&self, site: &Site) -> Result<(), DashboardError>;

    /// Apply a partial update; `updated_at` is always refreshed.
    async fn update(&self, id: Uuid, changes: &SiteChanges) -> Result<(), DashboardError>;

    /// Delete a site. Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, DashboardError>;
}

/// Repository for the enrollment outbox.
pub trait OutboxRepository: Send + Sync {
    /// Fetch events due for dispatch (unprocessed, unfailed,
    /// `next_attempt_at <= now`), oldest first.
    async fn fetch_due(&self, limit: u64) -> Result<Vec<OutboxEvent>, DashboardError>;

    async fn mark_processed(&self, id: Uuid) -> Result<(), DashboardError>;

    /// Record a failed attempt and schedule the next one.
    async fn record_failure(
        &self,
        id: Uuid,
        error: &str,
        next_attempt_at: DateTime<Utc>,
    ) -> Result<(), DashboardError>;

    /// Mark an event permanently failed (dead-letter).
    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), DashboardError>;
}

/// Port for the identity provider's management API.
pub trait EnrollmentPort: Send + Sync {
    /// Create a membership on the provider side.
    async fn create_membership(
        &self,
        auth_user_id: &str,
        org_external_id: &str,
        role: MembershipRole,
    ) -> Result<(), DashboardError>;
}
