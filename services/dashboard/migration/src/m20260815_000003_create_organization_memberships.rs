use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrganizationMemberships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrganizationMemberships::UserId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrganizationMemberships::OrganizationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrganizationMemberships::Role)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrganizationMemberships::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrganizationMemberships::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(OrganizationMemberships::UserId)
                            .col(OrganizationMemberships::OrganizationId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                OrganizationMemberships::Table,
                                OrganizationMemberships::UserId,
                            )
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                OrganizationMemberships::Table,
                                OrganizationMemberships::OrganizationId,
                            )
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The composite PK covers user-scoped lookups; organization-scoped
        // cascade deletes need their own index.
        manager
            .create_index(
                Index::create()
                    .table(OrganizationMemberships::Table)
                    .col(OrganizationMemberships::OrganizationId)
                    .name("idx_organization_memberships_organization_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrganizationMemberships::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum OrganizationMemberships {
    Table,
    UserId,
    OrganizationId,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Organizations {
    Table,
    Id,
}
