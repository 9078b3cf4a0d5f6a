//! Identity event synchronizer.
//!
//! Applies provider lifecycle events to the local user/organization/
//! membership mirror. Every handler is idempotent and tolerant of
//! redelivery and out-of-order arrival: upsert-or-drop, no queueing.
//! Membership events that reference a user or organization not yet
//! mirrored are dropped (warn on create, silent on update/delete);
//! recovery relies on the provider's own redelivery.

use chrono::Utc;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use siteplane_domain::role::MembershipRole;

use crate::domain::repository::{
    MembershipRepository, OrganizationRepository, UserRepository,
};
use crate::domain::types::{
    DeletedEventData, IdentityEvent, Membership, MembershipEventData, Organization,
    OrganizationEventData, OutboxEvent, User, UserEventData,
};
use crate::error::DashboardError;

/// Outbox event kind for default-organization enrollment.
pub const ENROLL_DEFAULT_ORG: &str = "enroll_default_org";

pub struct SyncIdentityEventUseCase<U, O, M>
where
    U: UserRepository,
    O: OrganizationRepository,
    M: MembershipRepository,
{
    pub users: U,
    pub organizations: O,
    pub memberships: M,
}

impl<U, O, M> SyncIdentityEventUseCase<U, O, M>
where
    U: UserRepository,
    O: OrganizationRepository,
    M: MembershipRepository,
{
    pub async fn execute(&self, event: IdentityEvent) -> Result<(), DashboardError> {
        match event {
            IdentityEvent::UserCreated(data) => self.user_created(data).await,
            IdentityEvent::UserUpdated(data) => self.user_updated(data).await,
            IdentityEvent::UserDeleted(data) => self.user_deleted(data).await,
            IdentityEvent::OrganizationCreated(data) => self.organization_created(data).await,
            IdentityEvent::OrganizationUpdated(data) => self.organization_updated(data).await,
            IdentityEvent::OrganizationDeleted(data) => self.organization_deleted(data).await,
            IdentityEvent::MembershipCreated(data) => self.membership_created(data).await,
            IdentityEvent::MembershipUpdated(data) => self.membership_updated(data).await,
            IdentityEvent::MembershipDeleted(data) => self.membership_deleted(data).await,
        }
    }

    async fn user_created(&self, data: UserEventData) -> Result<(), DashboardError> {
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            auth_id: data.id.clone(),
            email: data.email,
            name: display_name(data.first_name.as_deref(), data.last_name.as_deref()),
            created_at: now,
            updated_at: now,
        };
        // Enrollment into the default organization is an outbox entry written
        // in the same transaction, not a fire-and-forget call.
        let event = OutboxEvent {
            id: Uuid::new_v4(),
            kind: ENROLL_DEFAULT_ORG.to_owned(),
            payload: json!({ "auth_user_id": data.id }),
            idempotency_key: format!("{ENROLL_DEFAULT_ORG}:{}", data.id),
            attempts: 0,
        };
        self.users.insert_with_outbox(&user, &event).await
    }

    async fn user_updated(&self, data: UserEventData) -> Result<(), DashboardError> {
        let name = display_name(data.first_name.as_deref(), data.last_name.as_deref());
        match self.users.find_by_auth_id(&data.id).await? {
            Some(user) => {
                self.users
                    .update_profile(user.id, &data.email, name.as_deref())
                    .await
            }
            // Update racing ahead of its create: implicit create, without
            // re-triggering default-org enrollment.
            None => {
                let now = Utc::now();
                self.users
                    .insert(&User {
                        id: Uuid::now_v7(),
                        auth_id: data.id,
                        email: data.email,
                        name,
                        created_at: now,
                        updated_at: now,
                    })
                    .await
            }
        }
    }

    async fn user_deleted(&self, data: DeletedEventData) -> Result<(), DashboardError> {
        let Some(user) = self.users.find_by_auth_id(&data.id).await? else {
            return Ok(());
        };
        // Memberships first for referential cleanliness; each call is atomic
        // on its own, there is no transaction spanning both.
        self.memberships.delete_by_user(user.id).await?;
        self.users.delete(user.id).await
    }

    async fn organization_created(&self, data: OrganizationEventData) -> Result<(), DashboardError> {
        let now = Utc::now();
        self.organizations
            .insert(&Organization {
                id: Uuid::now_v7(),
                external_id: data.id,
                name: data.name,
                created_at: now,
                updated_at: now,
            })
            .await
    }

    async fn organization_updated(&self, data: OrganizationEventData) -> Result<(), DashboardError> {
        match self.organizations.find_by_external_id(&data.id).await? {
            Some(org) => self.organizations.update_name(org.id, &data.name).await,
            None => self.organization_created(data).await,
        }
    }

    async fn organization_deleted(&self, data: DeletedEventData) -> Result<(), DashboardError> {
        let Some(org) = self.organizations.find_by_external_id(&data.id).await? else {
            return Ok(());
        };
        self.memberships.delete_by_organization(org.id).await?;
        self.organizations.delete(org.id).await
    }

    async fn membership_created(&self, data: MembershipEventData) -> Result<(), DashboardError> {
        let Some(user) = self.users.find_by_auth_id(&data.user_id).await? else {
            warn!(user_id = %data.user_id, "user not found for membership event, dropping");
            return Ok(());
        };
        let Some(org) = self
            .organizations
            .find_by_external_id(&data.organization_id)
            .await?
        else {
            warn!(organization_id = %data.organization_id, "organization not found for membership event, dropping");
            return Ok(());
        };
        let Some(role) = membership_role(&data) else {
            warn!(user_id = %data.user_id, "unknown role for membership event, dropping");
            return Ok(());
        };
        if self.memberships.find(user.id, org.id).await?.is_some() {
            return Ok(());
        }
        let now = Utc::now();
        self.memberships
            .insert(&Membership {
                user_id: user.id,
                organization_id: org.id,
                role,
                created_at: now,
                updated_at: now,
            })
            .await
    }

    async fn membership_updated(&self, data: MembershipEventData) -> Result<(), DashboardError> {
        let Some(user) = self.users.find_by_auth_id(&data.user_id).await? else {
            return Ok(());
        };
        let Some(org) = self
            .organizations
            .find_by_external_id(&data.organization_id)
            .await?
        else {
            return Ok(());
        };
        let Some(role) = membership_role(&data) else {
            return Ok(());
        };
        if self.memberships.find(user.id, org.id).await?.is_none() {
            return Ok(());
        }
        self.memberships.update_role(user.id, org.id, role).await
    }

    async fn membership_deleted(&self, data: MembershipEventData) -> Result<(), DashboardError> {
        let Some(user) = self.users.find_by_auth_id(&data.user_id).await? else {
            return Ok(());
        };
        let Some(org) = self
            .organizations
            .find_by_external_id(&data.organization_id)
            .await?
        else {
            return Ok(());
        };
        self.memberships.delete(user.id, org.id).await?;
        Ok(())
    }
}

fn membership_role(data: &MembershipEventData) -> Option<MembershipRole> {
    data.role
        .as_ref()
        .and_then(|r| MembershipRole::from_slug(&r.slug))
}

/// Combine optional first/last name parts, provider-style: joined by a
/// single space, trimmed, `None` when both are empty.
fn display_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    let combined = format!("{} {}", first.unwrap_or(""), last.unwrap_or(""));
    let trimmed = combined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
