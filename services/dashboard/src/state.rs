use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::domain::types::DefaultOrg;
use crate::infra::db::{
    DbMembershipRepository, DbOrganizationRepository, DbOutboxRepository, DbSiteRepository,
    DbUserRepository,
};
use crate::infra::enrollment::HttpEnrollmentClient;
use crate::usecase::access::OrgAccessResolver;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub default_org: DefaultOrg,
    pub webhook_secret: Arc<str>,
    pub enrollment: HttpEnrollmentClient,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn organization_repo(&self) -> DbOrganizationRepository {
        DbOrganizationRepository {
            db: self.db.clone(),
        }
    }

    pub fn membership_repo(&self) -> DbMembershipRepository {
        DbMembershipRepository {
            db: self.db.clone(),
        }
    }

    pub fn site_repo(&self) -> DbSiteRepository {
        DbSiteRepository {
            db: self.db.clone(),
        }
    }

    pub fn outbox_repo(&self) -> DbOutboxRepository {
        DbOutboxRepository {
            db: self.db.clone(),
        }
    }

    pub fn access_resolver(
        &self,
    ) -> OrgAccessResolver<DbUserRepository, DbOrganizationRepository, DbMembershipRepository>
    {
        OrgAccessResolver {
            users: self.user_repo(),
            organizations: self.organization_repo(),
            memberships: self.membership_repo(),
        }
    }

    pub fn enrollment_client(&self) -> HttpEnrollmentClient {
        self.enrollment.clone()
    }
}
