use sea_orm_migration::prelude::*;

use crate::m20250901_000001_create_users::Users;

#[derive(DeriveIden)]
pub enum Categories {
    Table,
    Id,
    Name,
    Slug,
    Description,
    ParentId,
    DeletedAt,
    DeletedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Teams {
    Table,
    Id,
    Name,
    Description,
    DeletedAt,
    DeletedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TeamMembers {
    Table,
    Id,
    TeamId,
    UserId,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Venues {
    Table,
    Id,
    Name,
    Address,
    City,
    Capacity,
    DeletedAt,
    DeletedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Events {
    Table,
    Id,
    Title,
    Slug,
    Description,
    CategoryId,
    VenueId,
    StartsAt,
    EndsAt,
    Status,
    DeletedAt,
    DeletedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum TicketTypes {
    Table,
    Id,
    EventId,
    Name,
    Price,
    Quantity,
    QuantitySold,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Speakers {
    Table,
    Id,
    Name,
    Title,
    Company,
    Bio,
    Email,
    DeletedAt,
    DeletedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Sponsors {
    Table,
    Id,
    Name,
    Tier,
    Website,
    LogoUrl,
    DeletedAt,
    DeletedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Vendors {
    Table,
    Id,
    Name,
    ServiceType,
    ContactEmail,
    Phone,
    DeletedAt,
    DeletedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Pages {
    Table,
    Id,
    Title,
    Slug,
    Content,
    IsPublished,
    DeletedAt,
    DeletedBy,
    CreatedAt,
    UpdatedAt,
}

pub(crate) fn pk<T: IntoIden + 'static>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

pub(crate) fn timestamp<T: IntoIden + 'static>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

/// deleted_at / deleted_by pair shared by every trashable table
pub(crate) fn soft_delete_cols<A, B>(deleted_at: A, deleted_by: B) -> [ColumnDef; 2]
where
    A: IntoIden + 'static,
    B: IntoIden + 'static,
{
    [
        ColumnDef::new(deleted_at)
            .timestamp_with_time_zone()
            .null()
            .to_owned(),
        ColumnDef::new(deleted_by).big_integer().null().to_owned(),
    ]
}

pub(crate) async fn index_deleted_at<T, C>(
    manager: &SchemaManager<'_>,
    name: &str,
    table: T,
    col: C,
) -> Result<(), DbErr>
where
    T: IntoIden + 'static,
    C: IntoIden + 'static,
{
    manager
        .create_index(
            Index::create()
                .if_not_exists()
                .name(name)
                .table(table)
                .col(col)
                .to_owned(),
        )
        .await
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Categories (self-referencing tree)
        let [mut deleted_at, mut deleted_by] =
            soft_delete_cols(Categories::DeletedAt, Categories::DeletedBy);
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(&mut pk(Categories::Id))
                    .col(ColumnDef::new(Categories::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Categories::Slug).string_len(255).not_null())
                    .col(ColumnDef::new(Categories::Description).text().null())
                    .col(ColumnDef::new(Categories::ParentId).big_integer().null())
                    .col(&mut deleted_at)
                    .col(&mut deleted_by)
                    .col(&mut timestamp(Categories::CreatedAt))
                    .col(&mut timestamp(Categories::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_categories_parent")
                            .from(Categories::Table, Categories::ParentId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;
        index_deleted_at(
            manager,
            "idx_categories_deleted_at",
            Categories::Table,
            Categories::DeletedAt,
        )
        .await?;

        // Teams
        let [mut deleted_at, mut deleted_by] = soft_delete_cols(Teams::DeletedAt, Teams::DeletedBy);
        manager
            .create_table(
                Table::create()
                    .table(Teams::Table)
                    .if_not_exists()
                    .col(&mut pk(Teams::Id))
                    .col(ColumnDef::new(Teams::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Teams::Description).text().null())
                    .col(&mut deleted_at)
                    .col(&mut deleted_by)
                    .col(&mut timestamp(Teams::CreatedAt))
                    .col(&mut timestamp(Teams::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        index_deleted_at(manager, "idx_teams_deleted_at", Teams::Table, Teams::DeletedAt).await?;

        manager
            .create_table(
                Table::create()
                    .table(TeamMembers::Table)
                    .if_not_exists()
                    .col(&mut pk(TeamMembers::Id))
                    .col(ColumnDef::new(TeamMembers::TeamId).big_integer().not_null())
                    .col(ColumnDef::new(TeamMembers::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(TeamMembers::Role)
                            .string_len(50)
                            .not_null()
                            .default("member"),
                    )
                    .col(&mut timestamp(TeamMembers::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_members_team")
                            .from(TeamMembers::Table, TeamMembers::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_members_user")
                            .from(TeamMembers::Table, TeamMembers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_team_members_team_user_unique")
                    .table(TeamMembers::Table)
                    .col(TeamMembers::TeamId)
                    .col(TeamMembers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Venues
        let [mut deleted_at, mut deleted_by] = soft_delete_cols(Venues::DeletedAt, Venues::DeletedBy);
        manager
            .create_table(
                Table::create()
                    .table(Venues::Table)
                    .if_not_exists()
                    .col(&mut pk(Venues::Id))
                    .col(ColumnDef::new(Venues::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Venues::Address).string_len(500).not_null())
                    .col(ColumnDef::new(Venues::City).string_len(255).not_null())
                    .col(ColumnDef::new(Venues::Capacity).big_integer().null())
                    .col(&mut deleted_at)
                    .col(&mut deleted_by)
                    .col(&mut timestamp(Venues::CreatedAt))
                    .col(&mut timestamp(Venues::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        index_deleted_at(manager, "idx_venues_deleted_at", Venues::Table, Venues::DeletedAt)
            .await?;

        // Events
        let [mut deleted_at, mut deleted_by] = soft_delete_cols(Events::DeletedAt, Events::DeletedBy);
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(&mut pk(Events::Id))
                    .col(ColumnDef::new(Events::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Events::Slug).string_len(255).not_null())
                    .col(ColumnDef::new(Events::Description).text().null())
                    .col(ColumnDef::new(Events::CategoryId).big_integer().null())
                    .col(ColumnDef::new(Events::VenueId).big_integer().null())
                    .col(
                        ColumnDef::new(Events::StartsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Events::EndsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Events::Status)
                            .string_len(20)
                            .not_null()
                            .default("draft"),
                    )
                    .col(&mut deleted_at)
                    .col(&mut deleted_by)
                    .col(&mut timestamp(Events::CreatedAt))
                    .col(&mut timestamp(Events::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_events_category")
                            .from(Events::Table, Events::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_events_venue")
                            .from(Events::Table, Events::VenueId)
                            .to(Venues::Table, Venues::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;
        index_deleted_at(manager, "idx_events_deleted_at", Events::Table, Events::DeletedAt)
            .await?;

        // Ticket types (quantity_sold <= quantity is kept by conditional updates)
        manager
            .create_table(
                Table::create()
                    .table(TicketTypes::Table)
                    .if_not_exists()
                    .col(&mut pk(TicketTypes::Id))
                    .col(ColumnDef::new(TicketTypes::EventId).big_integer().not_null())
                    .col(ColumnDef::new(TicketTypes::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(TicketTypes::Price)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(TicketTypes::Quantity).big_integer().not_null())
                    .col(
                        ColumnDef::new(TicketTypes::QuantitySold)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(&mut timestamp(TicketTypes::CreatedAt))
                    .col(&mut timestamp(TicketTypes::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ticket_types_event")
                            .from(TicketTypes::Table, TicketTypes::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Speakers
        let [mut deleted_at, mut deleted_by] = soft_delete_cols(Speakers::DeletedAt, Speakers::DeletedBy);
        manager
            .create_table(
                Table::create()
                    .table(Speakers::Table)
                    .if_not_exists()
                    .col(&mut pk(Speakers::Id))
                    .col(ColumnDef::new(Speakers::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Speakers::Title).string_len(255).null())
                    .col(ColumnDef::new(Speakers::Company).string_len(255).null())
                    .col(ColumnDef::new(Speakers::Bio).text().null())
                    .col(ColumnDef::new(Speakers::Email).string_len(255).null())
                    .col(&mut deleted_at)
                    .col(&mut deleted_by)
                    .col(&mut timestamp(Speakers::CreatedAt))
                    .col(&mut timestamp(Speakers::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        index_deleted_at(
            manager,
            "idx_speakers_deleted_at",
            Speakers::Table,
            Speakers::DeletedAt,
        )
        .await?;

        // Sponsors
        let [mut deleted_at, mut deleted_by] = soft_delete_cols(Sponsors::DeletedAt, Sponsors::DeletedBy);
        manager
            .create_table(
                Table::create()
                    .table(Sponsors::Table)
                    .if_not_exists()
                    .col(&mut pk(Sponsors::Id))
                    .col(ColumnDef::new(Sponsors::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Sponsors::Tier)
                            .string_len(20)
                            .not_null()
                            .default("bronze"),
                    )
                    .col(ColumnDef::new(Sponsors::Website).string_len(500).null())
                    .col(ColumnDef::new(Sponsors::LogoUrl).string_len(500).null())
                    .col(&mut deleted_at)
                    .col(&mut deleted_by)
                    .col(&mut timestamp(Sponsors::CreatedAt))
                    .col(&mut timestamp(Sponsors::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        index_deleted_at(
            manager,
            "idx_sponsors_deleted_at",
            Sponsors::Table,
            Sponsors::DeletedAt,
        )
        .await?;

        // Vendors
        let [mut deleted_at, mut deleted_by] = soft_delete_cols(Vendors::DeletedAt, Vendors::DeletedBy);
        manager
            .create_table(
                Table::create()
                    .table(Vendors::Table)
                    .if_not_exists()
                    .col(&mut pk(Vendors::Id))
                    .col(ColumnDef::new(Vendors::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Vendors::ServiceType).string_len(100).not_null())
                    .col(ColumnDef::new(Vendors::ContactEmail).string_len(255).null())
                    .col(ColumnDef::new(Vendors::Phone).string_len(50).null())
                    .col(&mut deleted_at)
                    .col(&mut deleted_by)
                    .col(&mut timestamp(Vendors::CreatedAt))
                    .col(&mut timestamp(Vendors::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        index_deleted_at(
            manager,
            "idx_vendors_deleted_at",
            Vendors::Table,
            Vendors::DeletedAt,
        )
        .await?;

        // Pages
        let [mut deleted_at, mut deleted_by] = soft_delete_cols(Pages::DeletedAt, Pages::DeletedBy);
        manager
            .create_table(
                Table::create()
                    .table(Pages::Table)
                    .if_not_exists()
                    .col(&mut pk(Pages::Id))
                    .col(ColumnDef::new(Pages::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Pages::Slug).string_len(255).not_null())
                    .col(ColumnDef::new(Pages::Content).text().not_null())
                    .col(
                        ColumnDef::new(Pages::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(&mut deleted_at)
                    .col(&mut deleted_by)
                    .col(&mut timestamp(Pages::CreatedAt))
                    .col(&mut timestamp(Pages::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_pages_slug_unique")
                    .table(Pages::Table)
                    .col(Pages::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Pages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vendors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sponsors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Speakers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TicketTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Venues::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeamMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teams::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await
    }
}
