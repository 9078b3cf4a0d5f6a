use sea_orm_migration::prelude::*;

mod m20260815_000001_create_users;
mod m20260815_000002_create_organizations;
mod m20260815_000003_create_organization_memberships;
mod m20260815_000004_create_sites;
mod m20260815_000005_create_outbox_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260815_000001_create_users::Migration),
            Box::new(m20260815_000002_create_organizations::Migration),
            Box::new(m20260815_000003_create_organization_memberships::Migration),
            Box::new(m20260815_000004_create_sites::Migration),
            Box::new(m20260815_000005_create_outbox_events::Migration),
        ]
    }
}
