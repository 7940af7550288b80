//! Migration: Create USER table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Every column but the key is nullable: nothing is required to persist a user
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(User::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(User::Name).string().null())
                    .col(ColumnDef::new(User::Password).string().null())
                    .col(ColumnDef::new(User::Enabled).boolean().null())
                    .col(ColumnDef::new(User::CreatedDate).date_time().null())
                    .col(ColumnDef::new(User::LastLogin).date_time().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum User {
    #[sea_orm(iden = "USER")]
    Table,
    #[sea_orm(iden = "ID")]
    Id,
    #[sea_orm(iden = "NAME")]
    Name,
    #[sea_orm(iden = "PASSWORD")]
    Password,
    #[sea_orm(iden = "ENABLED")]
    Enabled,
    #[sea_orm(iden = "CREATED_DATE")]
    CreatedDate,
    #[sea_orm(iden = "LAST_LOGIN")]
    LastLogin,
}
