use sea_orm_migration::prelude::*;

use crate::m20250901_000001_create_users::Users;

/// One-time codes for password reset
#[derive(DeriveIden)]
enum PasswordResets {
    Table,
    Id,
    Email,
    Code,
    ExpiresAt,
    Attempts,
    UsedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SocialAccounts {
    Table,
    Id,
    UserId,
    Provider,
    ProviderUserId,
    Email,
    CreatedAt,
}

/// Single-row table (id = 1) edited from the settings screen
#[derive(DeriveIden)]
enum MailSettings {
    Table,
    Id,
    ApiBaseUrl,
    ApiKey,
    FromAddress,
    FromName,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PasswordResets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PasswordResets::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PasswordResets::Email).string_len(255).not_null())
                    .col(ColumnDef::new(PasswordResets::Code).string_len(16).not_null())
                    .col(
                        ColumnDef::new(PasswordResets::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PasswordResets::Attempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PasswordResets::UsedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PasswordResets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_password_resets_email")
                    .table(PasswordResets::Table)
                    .col(PasswordResets::Email)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SocialAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SocialAccounts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SocialAccounts::UserId).big_integer().not_null())
                    .col(ColumnDef::new(SocialAccounts::Provider).string_len(20).not_null())
                    .col(
                        ColumnDef::new(SocialAccounts::ProviderUserId)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(SocialAccounts::Email).string_len(255).null())
                    .col(
                        ColumnDef::new(SocialAccounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_social_accounts_user")
                            .from(SocialAccounts::Table, SocialAccounts::UserId)
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
                    .name("idx_social_accounts_provider_uid_unique")
                    .table(SocialAccounts::Table)
                    .col(SocialAccounts::Provider)
                    .col(SocialAccounts::ProviderUserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MailSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MailSettings::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MailSettings::ApiBaseUrl).string_len(500).not_null())
                    .col(ColumnDef::new(MailSettings::ApiKey).string_len(500).not_null())
                    .col(ColumnDef::new(MailSettings::FromAddress).string_len(255).not_null())
                    .col(ColumnDef::new(MailSettings::FromName).string_len(255).not_null())
                    .col(
                        ColumnDef::new(MailSettings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MailSettings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SocialAccounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PasswordResets::Table).to_owned())
            .await
    }
}
