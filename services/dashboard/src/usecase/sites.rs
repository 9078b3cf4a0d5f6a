//! Site operations.
//!
//! Reads fail soft (empty list / `None`), writes fail hard with descriptive
//! errors. The default organization is special-cased everywhere: sites
//! there are visible and mutable only to their creator, even for valid
//! members.

use chrono::Utc;
use uuid::Uuid;

use siteplane_domain::site::{SiteStatus, validate_slug};

use crate::domain::repository::{
    MembershipRepository, OrganizationRepository, SiteRepository, UserRepository,
};
use crate::domain::types::{DefaultOrg, Site, SiteChanges};
use crate::error::DashboardError;
use crate::usecase::access::{OrgAccessResolver, soften};

// ── ListSites ────────────────────────────────────────────────────────────────

pub struct ListSitesUseCase<U, O, M, S>
where
    U: UserRepository,
    O: OrganizationRepository,
    M: MembershipRepository,
    S: SiteRepository,
{
    pub access: OrgAccessResolver<U, O, M>,
    pub sites: S,
    pub default_org: DefaultOrg,
}

impl<U, O, M, S> ListSitesUseCase<U, O, M, S>
where
    U: UserRepository,
    O: OrganizationRepository,
    M: MembershipRepository,
    S: SiteRepository,
{
    pub async fn execute(
        &self,
        auth_id: Option<&str>,
        org_external_id: &str,
    ) -> Result<Vec<Site>, DashboardError> {
        let Some(auth_id) = auth_id else {
            return Ok(vec![]);
        };
        let Some(access) = soften(self.access.resolve(auth_id, org_external_id).await)? else {
            return Ok(vec![]);
        };
        let sites = self
            .sites
            .list_by_organization(access.organization.id)
            .await?;
        if self.default_org.matches(org_external_id) {
            Ok(sites
                .into_iter()
                .filter(|site| site.created_by == access.user.id)
                .collect())
        } else {
            Ok(sites)
        }
    }
}

// ── GetSiteBySlug ────────────────────────────────────────────────────────────

pub struct GetSiteBySlugUseCase<U, O, M, S>
where
    U: UserRepository,
    O: OrganizationRepository,
    M: MembershipRepository,
    S: SiteRepository,
{
    pub access: OrgAccessResolver<U, O, M>,
    pub sites: S,
    pub default_org: DefaultOrg,
}

impl<U, O, M, S> GetSiteBySlugUseCase<U, O, M, S>
where
    U: UserRepository,
    O: OrganizationRepository,
    M: MembershipRepository,
    S: SiteRepository,
{
    pub async fn execute(
        &self,
        auth_id: Option<&str>,
        org_external_id: &str,
        slug: &str,
    ) -> Result<Option<Site>, DashboardError> {
        let Some(auth_id) = auth_id else {
            return Ok(None);
        };
        let Some(access) = soften(self.access.resolve(auth_id, org_external_id).await)? else {
            return Ok(None);
        };
        let Some(site) = self
            .sites
            .find_by_slug(access.organization.id, slug)
            .await?
        else {
            return Ok(None);
        };
        if self.default_org.matches(org_external_id) && site.created_by != access.user.id {
            return Ok(None);
        }
        Ok(Some(site))
    }
}

// ── CreateSite ───────────────────────────────────────────────────────────────

pub struct CreateSiteInput {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub status: SiteStatus,
}

pub struct CreateSiteUseCase<U, O, M, S>
where
    U: UserRepository,
    O: OrganizationRepository,
    M: MembershipRepository,
    S: SiteRepository,
{
    pub access: OrgAccessResolver<U, O, M>,
    pub sites: S,
}

impl<U, O, M, S> CreateSiteUseCase<U, O, M, S>
where
    U: UserRepository,
    O: OrganizationRepository,
    M: MembershipRepository,
    S: SiteRepository,
{
    pub async fn execute(
        &self,
        auth_id: &str,
        org_external_id: &str,
        input: CreateSiteInput,
    ) -> Result<Site, DashboardError> {
        if !validate_slug(&input.slug) {
            return Err(DashboardError::InvalidSlug);
        }
        let access = self.access.resolve(auth_id, org_external_id).await?;
        if self
            .sites
            .find_by_slug(access.organization.id, &input.slug)
            .await?
            .is_some()
        {
            return Err(DashboardError::DuplicateSlug);
        }
        let now = Utc::now();
        let site = Site {
            id: Uuid::now_v7(),
            organization_id: access.organization.id,
            created_by: access.user.id,
            name: input.name,
            slug: input.slug,
            description: input.description,
            status: input.status,
            created_at: now,
            updated_at: now,
        };
        self.sites.insert(&site).await?;
        Ok(site)
    }
}

// ── UpdateSite ───────────────────────────────────────────────────────────────

pub struct UpdateSiteUseCase<U, O, M, S>
where
    U: UserRepository,
    O: OrganizationRepository,
    M: MembershipRepository,
    S: SiteRepository,
{
    pub access: OrgAccessResolver<U, O, M>,
    pub sites: S,
    pub default_org: DefaultOrg,
}

impl<U, O, M, S> UpdateSiteUseCase<U, O, M, S>
where
    U: UserRepository,
    O: OrganizationRepository,
    M: MembershipRepository,
    S: SiteRepository,
{
    pub async fn execute(
        &self,
        auth_id: &str,
        site_id: Uuid,
        changes: SiteChanges,
    ) -> Result<(), DashboardError> {
        let user = self.access.require_user(auth_id).await?;
        let site = self
            .sites
            .find_by_id(site_id)
            .await?
            .ok_or(DashboardError::SiteNotFound)?;
        let (organization, _membership) = self
            .access
            .resolve_membership(&user, site.organization_id)
            .await?;
        if self.default_org.matches(&organization.external_id) && site.created_by != user.id {
            return Err(DashboardError::NotSiteOwner);
        }
        if let Some(new_slug) = &changes.slug {
            if !validate_slug(new_slug) {
                return Err(DashboardError::InvalidSlug);
            }
            if *new_slug != site.slug
                && self
                    .sites
                    .find_by_slug(site.organization_id, new_slug)
                    .await?
                    .is_some()
            {
                return Err(DashboardError::DuplicateSlug);
            }
        }
        self.sites.update(site.id, &changes).await
    }
}

// ── DeleteSite ───────────────────────────────────────────────────────────────

pub struct DeleteSiteUseCase<U, O, M, S>
where
    U: UserRepository,
    O: OrganizationRepository,
    M: MembershipRepository,
    S: SiteRepository,
{
    pub access: OrgAccessResolver<U, O, M>,
    pub sites: S,
    pub default_org: DefaultOrg,
}

impl<U, O, M, S> DeleteSiteUseCase<U, O, M, S>
where
    U: UserRepository,
    O: OrganizationRepository,
    M: MembershipRepository,
    S: SiteRepository,
{
    pub async fn execute(&self, auth_id: &str, site_id: Uuid) -> Result<(), DashboardError> {
        let user = self.access.require_user(auth_id).await?;
        let site = self
            .sites
            .find_by_id(site_id)
            .await?
            .ok_or(DashboardError::SiteNotFound)?;
        let (organization, _membership) = self
            .access
            .resolve_membership(&user, site.organization_id)
            .await?;
        if self.default_org.matches(&organization.external_id) && site.created_by != user.id {
            return Err(DashboardError::NotSiteOwner);
        }
        self.sites.delete(site.id).await?;
        Ok(())
    }
}
