use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use siteplane_dashboard_schema::{
    organization_memberships, organizations, outbox_events, sites, users,
};
use siteplane_domain::role::MembershipRole;
use siteplane_domain::site::SiteStatus;

use crate::domain::repository::{
    MembershipRepository, OrganizationRepository, OutboxRepository, SiteRepository,
    UserRepository,
};
use crate::domain::types::{
    Membership, Organization, OutboxEvent, Site, SiteChanges, User,
};
use crate::error::DashboardError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_auth_id(&self, auth_id: &str) -> Result<Option<User>, DashboardError> {
        let model = users::Entity::find()
            .filter(users::Column::AuthId.eq(auth_id))
            .one(&self.db)
            .await
            .context("find user by auth id")?;
        Ok(model.map(user_from_model))
    }

    async fn insert(&self, user: &User) -> Result<(), DashboardError> {
        users::Entity::insert(user_active_model(user))
            .on_conflict(
                OnConflict::column(users::Column::AuthId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("insert user")?;
        Ok(())
    }

    async fn insert_with_outbox(
        &self,
        user: &User,
        event: &OutboxEvent,
    ) -> Result<(), DashboardError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let user = user.clone();
                let event = event.clone();
                Box::pin(async move {
                    insert_user(txn, &user).await?;
                    insert_outbox_event(txn, &event).await?;
                    Ok(())
                })
            })
            .await
            .context("insert user with outbox")?;
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        email: &str,
        name: Option<&str>,
    ) -> Result<(), DashboardError> {
        users::ActiveModel {
            id: Set(id),
            email: Set(email.to_owned()),
            name: Set(name.map(str::to_owned)),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update user profile")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DashboardError> {
        users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(())
    }
}

async fn insert_user(txn: &DatabaseTransaction, user: &User) -> Result<(), sea_orm::DbErr> {
    users::Entity::insert(user_active_model(user))
        .on_conflict(
            OnConflict::column(users::Column::AuthId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(txn)
        .await?;
    Ok(())
}

async fn insert_outbox_event(
    txn: &DatabaseTransaction,
    event: &OutboxEvent,
) -> Result<(), sea_orm::DbErr> {
    let now = Utc::now();
    outbox_events::Entity::insert(outbox_events::ActiveModel {
        id: Set(event.id),
        kind: Set(event.kind.clone()),
        payload: Set(event.payload.clone()),
        idempotency_key: Set(event.idempotency_key.clone()),
        attempts: Set(0),
        last_error: Set(None),
        created_at: Set(now),
        next_attempt_at: Set(now),
        processed_at: Set(None),
        failed_at: Set(None),
    })
    // Redelivered user.created events reuse the same idempotency key; the
    // enrollment must still happen at most once.
    .on_conflict(
        OnConflict::column(outbox_events::Column::IdempotencyKey)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(txn)
    .await?;
    Ok(())
}

fn user_active_model(user: &User) -> users::ActiveModel {
    users::ActiveModel {
        id: Set(user.id),
        auth_id: Set(user.auth_id.clone()),
        email: Set(user.email.clone()),
        name: Set(user.name.clone()),
        created_at: Set(user.created_at),
        updated_at: Set(user.updated_at),
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        auth_id: model.auth_id,
        email: model.email,
        name: model.name,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Organization repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOrganizationRepository {
    pub db: DatabaseConnection,
}

impl OrganizationRepository for DbOrganizationRepository {
    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Organization>, DashboardError> {
        let model = organizations::Entity::find()
            .filter(organizations::Column::ExternalId.eq(external_id))
            .one(&self.db)
            .await
            .context("find organization by external id")?;
        Ok(model.map(organization_from_model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Organization>, DashboardError> {
        let model = organizations::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find organization by id")?;
        Ok(model.map(organization_from_model))
    }

    async fn insert(&self, organization: &Organization) -> Result<(), DashboardError> {
        organizations::Entity::insert(organizations::ActiveModel {
            id: Set(organization.id),
            external_id: Set(organization.external_id.clone()),
            name: Set(organization.name.clone()),
            created_at: Set(organization.created_at),
            updated_at: Set(organization.updated_at),
        })
        .on_conflict(
            OnConflict::column(organizations::Column::ExternalId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("insert organization")?;
        Ok(())
    }

    async fn update_name(&self, id: Uuid, name: &str) -> Result<(), DashboardError> {
        organizations::ActiveModel {
            id: Set(id),
            name: Set(name.to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update organization name")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DashboardError> {
        organizations::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete organization")?;
        Ok(())
    }
}

fn organization_from_model(model: organizations::Model) -> Organization {
    Organization {
        id: model.id,
        external_id: model.external_id,
        name: model.name,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Membership repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbMembershipRepository {
    pub db: DatabaseConnection,
}

impl MembershipRepository for DbMembershipRepository {
    async fn find(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<Membership>, DashboardError> {
        let model = organization_memberships::Entity::find_by_id((user_id, organization_id))
            .one(&self.db)
            .await
            .context("find membership")?;
        model.map(membership_from_model).transpose()
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Membership>, DashboardError> {
        let models = organization_memberships::Entity::find()
            .filter(organization_memberships::Column::UserId.eq(user_id))
            .order_by_asc(organization_memberships::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list memberships by user")?;
        models.into_iter().map(membership_from_model).collect()
    }

    async fn insert(&self, membership: &Membership) -> Result<(), DashboardError> {
        organization_memberships::Entity::insert(organization_memberships::ActiveModel {
            user_id: Set(membership.user_id),
            organization_id: Set(membership.organization_id),
            role: Set(membership.role.as_slug().to_owned()),
            created_at: Set(membership.created_at),
            updated_at: Set(membership.updated_at),
        })
        .on_conflict(
            OnConflict::columns([
                organization_memberships::Column::UserId,
                organization_memberships::Column::OrganizationId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("insert membership")?;
        Ok(())
    }

    async fn update_role(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
        role: MembershipRole,
    ) -> Result<(), DashboardError> {
        organization_memberships::ActiveModel {
            user_id: Set(user_id),
            organization_id: Set(organization_id),
            role: Set(role.as_slug().to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update membership role")?;
        Ok(())
    }

    async fn delete(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<bool, DashboardError> {
        let result = organization_memberships::Entity::delete_many()
            .filter(organization_memberships::Column::UserId.eq(user_id))
            .filter(organization_memberships::Column::OrganizationId.eq(organization_id))
            .exec(&self.db)
            .await
            .context("delete membership")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_by_user(&self, user_id: Uuid) -> Result<u64, DashboardError> {
        let result = organization_memberships::Entity::delete_many()
            .filter(organization_memberships::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete memberships by user")?;
        Ok(result.rows_affected)
    }

    async fn delete_by_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<u64, DashboardError> {
        let result = organization_memberships::Entity::delete_many()
            .filter(organization_memberships::Column::OrganizationId.eq(organization_id))
            .exec(&self.db)
            .await
            .context("delete memberships by organization")?;
        Ok(result.rows_affected)
    }
}

fn membership_from_model(
    model: organization_memberships::Model,
) -> Result<Membership, DashboardError> {
    let role = MembershipRole::from_slug(&model.role).ok_or_else(|| {
        DashboardError::Internal(anyhow::anyhow!("unknown role slug in db: {}", model.role))
    })?;
    Ok(Membership {
        user_id: model.user_id,
        organization_id: model.organization_id,
        role,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Site repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSiteRepository {
    pub db: DatabaseConnection,
}

impl SiteRepository for DbSiteRepository {
    async fn list_by_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<Site>, DashboardError> {
        let models = sites::Entity::find()
            .filter(sites::Column::OrganizationId.eq(organization_id))
            .order_by_asc(sites::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list sites by organization")?;
        models.into_iter().map(site_from_model).collect()
    }

    async fn find_by_slug(
        &self,
        organization_id: Uuid,
        slug: &str,
    ) -> Result<Option<Site>, DashboardError> {
        let model = sites::Entity::find()
            .filter(sites::Column::OrganizationId.eq(organization_id))
            .filter(sites::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .context("find site by slug")?;
        model.map(site_from_model).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Site>, DashboardError> {
        let model = sites::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find site by id")?;
        model.map(site_from_model).transpose()
    }

    async fn insert(&self, site: &Site) -> Result<(), DashboardError> {
        sites::ActiveModel {
            id: Set(site.id),
            organization_id: Set(site.organization_id),
            created_by: Set(site.created_by),
            name: Set(site.name.clone()),
            slug: Set(site.slug.clone()),
            description: Set(site.description.clone()),
            status: Set(site.status.as_str().to_owned()),
            created_at: Set(site.created_at),
            updated_at: Set(site.updated_at),
        }
        .insert(&self.db)
        .await
        .context("insert site")?;
        Ok(())
    }

    async fn update(&self, id: Uuid, changes: &SiteChanges) -> Result<(), DashboardError> {
        let mut am = sites::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(name) = &changes.name {
            am.name = Set(name.clone());
        }
        if let Some(slug) = &changes.slug {
            am.slug = Set(slug.clone());
        }
        if let Some(description) = &changes.description {
            am.description = Set(Some(description.clone()));
        }
        if let Some(status) = changes.status {
            am.status = Set(status.as_str().to_owned());
        }
        am.updated_at = Set(Utc::now());
        am.update(&self.db).await.context("update site")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DashboardError> {
        let result = sites::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete site")?;
        Ok(result.rows_affected > 0)
    }
}

fn site_from_model(model: sites::Model) -> Result<Site, DashboardError> {
    let status = SiteStatus::from_str_value(&model.status).ok_or_else(|| {
        DashboardError::Internal(anyhow::anyhow!("unknown site status in db: {}", model.status))
    })?;
    Ok(Site {
        id: model.id,
        organization_id: model.organization_id,
        created_by: model.created_by,
        name: model.name,
        slug: model.slug,
        description: model.description,
        status,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Outbox repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOutboxRepository {
    pub db: DatabaseConnection,
}

impl OutboxRepository for DbOutboxRepository {
    async fn fetch_due(&self, limit: u64) -> Result<Vec<OutboxEvent>, DashboardError> {
        let models = outbox_events::Entity::find()
            .filter(outbox_events::Column::ProcessedAt.is_null())
            .filter(outbox_events::Column::FailedAt.is_null())
            .filter(outbox_events::Column::NextAttemptAt.lte(Utc::now()))
            .order_by_asc(outbox_events::Column::NextAttemptAt)
            .limit(limit)
            .all(&self.db)
            .await
            .context("fetch due outbox events")?;
        Ok(models.into_iter().map(outbox_event_from_model).collect())
    }

    async fn mark_processed(&self, id: Uuid) -> Result<(), DashboardError> {
        outbox_events::ActiveModel {
            id: Set(id),
            processed_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark outbox event processed")?;
        Ok(())
    }

    async fn record_failure(
        &self,
        id: Uuid,
        error: &str,
        next_attempt_at: DateTime<Utc>,
    ) -> Result<(), DashboardError> {
        outbox_events::Entity::update_many()
            .col_expr(
                outbox_events::Column::Attempts,
                Expr::col(outbox_events::Column::Attempts).add(1),
            )
            .col_expr(outbox_events::Column::LastError, Expr::value(error))
            .col_expr(
                outbox_events::Column::NextAttemptAt,
                Expr::value(next_attempt_at),
            )
            .filter(outbox_events::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("record outbox failure")?;
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), DashboardError> {
        let now = Utc::now();
        outbox_events::Entity::update_many()
            .col_expr(
                outbox_events::Column::Attempts,
                Expr::col(outbox_events::Column::Attempts).add(1),
            )
            .col_expr(outbox_events::Column::LastError, Expr::value(error))
            .col_expr(outbox_events::Column::FailedAt, Expr::value(Some(now)))
            .filter(outbox_events::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("mark outbox event failed")?;
        Ok(())
    }
}

fn outbox_event_from_model(model: outbox_events::Model) -> OutboxEvent {
    OutboxEvent {
        id: model.id,
        kind: model.kind,
        payload: model.payload,
        idempotency_key: model.idempotency_key,
        attempts: model.attempts,
    }
}
