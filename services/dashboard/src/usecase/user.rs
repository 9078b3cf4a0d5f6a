//! Current-user and organization read operations. All fail soft.

use crate::domain::repository::{
    MembershipRepository, OrganizationRepository, UserRepository,
};
use crate::domain::types::{Organization, User};
use crate::error::DashboardError;

// ── GetCurrentUser ───────────────────────────────────────────────────────────

pub struct GetCurrentUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetCurrentUserUseCase<U> {
    pub async fn execute(&self, auth_id: Option<&str>) -> Result<Option<User>, DashboardError> {
        let Some(auth_id) = auth_id else {
            return Ok(None);
        };
        self.users.find_by_auth_id(auth_id).await
    }
}

// ── GetUserOrganizations ─────────────────────────────────────────────────────

pub struct GetUserOrganizationsUseCase<U, O, M>
where
    U: UserRepository,
    O: OrganizationRepository,
    M: MembershipRepository,
{
    pub users: U,
    pub organizations: O,
    pub memberships: M,
}

impl<U, O, M> GetUserOrganizationsUseCase<U, O, M>
where
    U: UserRepository,
    O: OrganizationRepository,
    M: MembershipRepository,
{
    pub async fn execute(
        &self,
        auth_id: Option<&str>,
    ) -> Result<Vec<Organization>, DashboardError> {
        let Some(auth_id) = auth_id else {
            return Ok(vec![]);
        };
        let Some(user) = self.users.find_by_auth_id(auth_id).await? else {
            return Ok(vec![]);
        };
        let memberships = self.memberships.list_by_user(user.id).await?;
        let mut organizations = Vec::with_capacity(memberships.len());
        for membership in memberships {
            // A membership may briefly outlive its organization between the
            // two deletes of an organization.deleted event; skip those.
            if let Some(org) = self
                .organizations
                .find_by_id(membership.organization_id)
                .await?
            {
                organizations.push(org);
            }
        }
        Ok(organizations)
    }
}

// ── GetOrganizationByExternalId ──────────────────────────────────────────────

pub struct GetOrganizationByExternalIdUseCase<O: OrganizationRepository> {
    pub organizations: O,
}

impl<O: OrganizationRepository> GetOrganizationByExternalIdUseCase<O> {
    pub async fn execute(
        &self,
        external_id: &str,
    ) -> Result<Option<Organization>, DashboardError> {
        self.organizations.find_by_external_id(external_id).await
    }
}
