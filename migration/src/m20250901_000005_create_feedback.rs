use sea_orm_migration::prelude::*;

use crate::m20250901_000002_create_catalog::{
    Events, index_deleted_at, pk, soft_delete_cols, timestamp,
};

#[derive(DeriveIden)]
enum Surveys {
    Table,
    Id,
    Title,
    Description,
    EventId,
    OpensAt,
    ClosesAt,
    IsActive,
    DeletedAt,
    DeletedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Reviews {
    Table,
    Id,
    EventId,
    ReviewerName,
    ReviewerEmail,
    Rating,
    Comment,
    IsPublished,
    DeletedAt,
    DeletedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let [mut deleted_at, mut deleted_by] =
            soft_delete_cols(Surveys::DeletedAt, Surveys::DeletedBy);
        manager
            .create_table(
                Table::create()
                    .table(Surveys::Table)
                    .if_not_exists()
                    .col(&mut pk(Surveys::Id))
                    .col(ColumnDef::new(Surveys::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Surveys::Description).text().null())
                    .col(ColumnDef::new(Surveys::EventId).big_integer().null())
                    .col(
                        ColumnDef::new(Surveys::OpensAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Surveys::ClosesAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Surveys::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(&mut deleted_at)
                    .col(&mut deleted_by)
                    .col(&mut timestamp(Surveys::CreatedAt))
                    .col(&mut timestamp(Surveys::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_surveys_event")
                            .from(Surveys::Table, Surveys::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;
        index_deleted_at(
            manager,
            "idx_surveys_deleted_at",
            Surveys::Table,
            Surveys::DeletedAt,
        )
        .await?;

        // Reviews (rating 1..=5 is checked by the service)
        let [mut deleted_at, mut deleted_by] =
            soft_delete_cols(Reviews::DeletedAt, Reviews::DeletedBy);
        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(&mut pk(Reviews::Id))
                    .col(ColumnDef::new(Reviews::EventId).big_integer().not_null())
                    .col(ColumnDef::new(Reviews::ReviewerName).string_len(255).not_null())
                    .col(ColumnDef::new(Reviews::ReviewerEmail).string_len(255).null())
                    .col(ColumnDef::new(Reviews::Rating).integer().not_null())
                    .col(ColumnDef::new(Reviews::Comment).text().null())
                    .col(
                        ColumnDef::new(Reviews::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(&mut deleted_at)
                    .col(&mut deleted_by)
                    .col(&mut timestamp(Reviews::CreatedAt))
                    .col(&mut timestamp(Reviews::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_event")
                            .from(Reviews::Table, Reviews::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        index_deleted_at(
            manager,
            "idx_reviews_deleted_at",
            Reviews::Table,
            Reviews::DeletedAt,
        )
        .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reviews::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Surveys::Table).to_owned())
            .await
    }
}
