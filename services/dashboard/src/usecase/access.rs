//! Organization access resolution.
//!
//! Every sites operation runs the same guard chain: local user record →
//! target organization → active membership. It lives here once; read
//! usecases soften guard failures with [`soften`], write usecases let them
//! surface.

use uuid::Uuid;

use crate::domain::repository::{
    MembershipRepository, OrganizationRepository, UserRepository,
};
use crate::domain::types::{Membership, Organization, User};
use crate::error::DashboardError;

/// Proof that a caller may act within an organization.
#[derive(Debug, Clone)]
pub struct OrgAccess {
    pub user: User,
    pub organization: Organization,
    pub membership: Membership,
}

pub struct OrgAccessResolver<U, O, M>
where
    U: UserRepository,
    O: OrganizationRepository,
    M: MembershipRepository,
{
    pub users: U,
    pub organizations: O,
    pub memberships: M,
}

impl<U, O, M> OrgAccessResolver<U, O, M>
where
    U: UserRepository,
    O: OrganizationRepository,
    M: MembershipRepository,
{
    /// Full guard chain for operations addressing an organization by its
    /// provider id.
    pub async fn resolve(
        &self,
        auth_id: &str,
        org_external_id: &str,
    ) -> Result<OrgAccess, DashboardError> {
        let user = self.require_user(auth_id).await?;
        let organization = self
            .organizations
            .find_by_external_id(org_external_id)
            .await?
            .ok_or(DashboardError::OrganizationNotFound)?;
        let membership = self
            .memberships
            .find(user.id, organization.id)
            .await?
            .ok_or(DashboardError::NotAMember)?;
        Ok(OrgAccess {
            user,
            organization,
            membership,
        })
    }

    /// First guard link on its own, for operations that must report a
    /// missing user before looking at the target resource.
    pub async fn require_user(&self, auth_id: &str) -> Result<User, DashboardError> {
        self.users
            .find_by_auth_id(auth_id)
            .await?
            .ok_or(DashboardError::UserNotFound)
    }

    /// Remaining guard links for operations that already resolved the user
    /// and know the organization's local id (update/delete by site id).
    pub async fn resolve_membership(
        &self,
        user: &User,
        organization_id: Uuid,
    ) -> Result<(Organization, Membership), DashboardError> {
        let organization = self
            .organizations
            .find_by_id(organization_id)
            .await?
            .ok_or(DashboardError::OrganizationNotFound)?;
        let membership = self
            .memberships
            .find(user.id, organization.id)
            .await?
            .ok_or(DashboardError::NotAMember)?;
        Ok((organization, membership))
    }
}

/// Map access-guard failures to `None` for fail-soft reads.
pub fn soften<T>(result: Result<T, DashboardError>) -> Result<Option<T>, DashboardError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_access_guard() => Ok(None),
        Err(e) => Err(e),
    }
}
