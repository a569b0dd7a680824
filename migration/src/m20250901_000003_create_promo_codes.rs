use sea_orm_migration::prelude::*;

use crate::m20250901_000001_create_users::Users;
use crate::m20250901_000002_create_catalog::{Categories, Events, TicketTypes};

/// Promo codes. `discount_value` is basis points for percentage codes and
/// cents for fixed codes; all money columns are cents.
#[derive(DeriveIden)]
enum PromoCodes {
    Table,
    Id,
    Code,
    Description,
    DiscountType,
    DiscountValue,
    ApplicableTo,
    MaxUses,
    MaxUsesPerUser,
    CurrentUses,
    MinOrderAmount,
    ValidFrom,
    ValidUntil,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PromoCodeEvents {
    Table,
    Id,
    PromoCodeId,
    EventId,
}

#[derive(DeriveIden)]
enum PromoCodeCategories {
    Table,
    Id,
    PromoCodeId,
    CategoryId,
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    OrderNumber,
    UserId,
    EventId,
    TicketTypeId,
    Quantity,
    Subtotal,
    DiscountAmount,
    Total,
    PromoCodeId,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PromoCodeUsages {
    Table,
    Id,
    PromoCodeId,
    UserId,
    OrderId,
    DiscountAmount,
    CreatedAt,
}

fn pk<T: IntoIden + 'static>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn timestamp<T: IntoIden + 'static>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PromoCodes::Table)
                    .if_not_exists()
                    .col(&mut pk(PromoCodes::Id))
                    .col(ColumnDef::new(PromoCodes::Code).string_len(64).not_null())
                    .col(ColumnDef::new(PromoCodes::Description).text().null())
                    .col(
                        ColumnDef::new(PromoCodes::DiscountType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PromoCodes::DiscountValue)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PromoCodes::ApplicableTo)
                            .string_len(30)
                            .not_null()
                            .default("all"),
                    )
                    // NULL = no global cap
                    .col(ColumnDef::new(PromoCodes::MaxUses).big_integer().null())
                    .col(
                        ColumnDef::new(PromoCodes::MaxUsesPerUser)
                            .big_integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(PromoCodes::CurrentUses)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(PromoCodes::MinOrderAmount).big_integer().null())
                    .col(
                        ColumnDef::new(PromoCodes::ValidFrom)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PromoCodes::ValidUntil)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PromoCodes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(&mut timestamp(PromoCodes::CreatedAt))
                    .col(&mut timestamp(PromoCodes::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_promo_codes_code_unique")
                    .table(PromoCodes::Table)
                    .col(PromoCodes::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PromoCodeEvents::Table)
                    .if_not_exists()
                    .col(&mut pk(PromoCodeEvents::Id))
                    .col(
                        ColumnDef::new(PromoCodeEvents::PromoCodeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PromoCodeEvents::EventId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_promo_code_events_promo")
                            .from(PromoCodeEvents::Table, PromoCodeEvents::PromoCodeId)
                            .to(PromoCodes::Table, PromoCodes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_promo_code_events_event")
                            .from(PromoCodeEvents::Table, PromoCodeEvents::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PromoCodeCategories::Table)
                    .if_not_exists()
                    .col(&mut pk(PromoCodeCategories::Id))
                    .col(
                        ColumnDef::new(PromoCodeCategories::PromoCodeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PromoCodeCategories::CategoryId)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_promo_code_categories_promo")
                            .from(PromoCodeCategories::Table, PromoCodeCategories::PromoCodeId)
                            .to(PromoCodes::Table, PromoCodes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_promo_code_categories_category")
                            .from(PromoCodeCategories::Table, PromoCodeCategories::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Orders keep their history when the event is force-deleted
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(&mut pk(Orders::Id))
                    .col(ColumnDef::new(Orders::OrderNumber).string_len(40).not_null())
                    .col(ColumnDef::new(Orders::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Orders::EventId).big_integer().null())
                    .col(ColumnDef::new(Orders::TicketTypeId).big_integer().null())
                    .col(ColumnDef::new(Orders::Quantity).big_integer().not_null())
                    .col(ColumnDef::new(Orders::Subtotal).big_integer().not_null())
                    .col(
                        ColumnDef::new(Orders::DiscountAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Orders::Total).big_integer().not_null())
                    .col(ColumnDef::new(Orders::PromoCodeId).big_integer().null())
                    .col(
                        ColumnDef::new(Orders::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(&mut timestamp(Orders::CreatedAt))
                    .col(&mut timestamp(Orders::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_user")
                            .from(Orders::Table, Orders::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_event")
                            .from(Orders::Table, Orders::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_ticket_type")
                            .from(Orders::Table, Orders::TicketTypeId)
                            .to(TicketTypes::Table, TicketTypes::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_promo_code")
                            .from(Orders::Table, Orders::PromoCodeId)
                            .to(PromoCodes::Table, PromoCodes::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_orders_order_number_unique")
                    .table(Orders::Table)
                    .col(Orders::OrderNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PromoCodeUsages::Table)
                    .if_not_exists()
                    .col(&mut pk(PromoCodeUsages::Id))
                    .col(
                        ColumnDef::new(PromoCodeUsages::PromoCodeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PromoCodeUsages::UserId).big_integer().not_null())
                    .col(ColumnDef::new(PromoCodeUsages::OrderId).big_integer().not_null())
                    .col(
                        ColumnDef::new(PromoCodeUsages::DiscountAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(&mut timestamp(PromoCodeUsages::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_promo_code_usages_promo")
                            .from(PromoCodeUsages::Table, PromoCodeUsages::PromoCodeId)
                            .to(PromoCodes::Table, PromoCodes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_promo_code_usages_order")
                            .from(PromoCodeUsages::Table, PromoCodeUsages::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_promo_code_usages_promo_user")
                    .table(PromoCodeUsages::Table)
                    .col(PromoCodeUsages::PromoCodeId)
                    .col(PromoCodeUsages::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PromoCodeUsages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PromoCodeCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PromoCodeEvents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PromoCodes::Table).to_owned())
            .await
    }
}
