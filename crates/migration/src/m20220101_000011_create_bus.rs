//! Create `bus` table.
//!
//! Owned by fleet management; the plate number scopes a bus's menu.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bus::Table)
                    .if_not_exists()
                    .col(pk_auto(Bus::Id))
                    .col(string_len(Bus::PlateNumber, 32).unique_key().not_null())
                    .col(ColumnDef::new(Bus::Description).string_len(512).null())
                    .col(timestamp_with_time_zone(Bus::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Bus::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Bus::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Bus { Table, Id, PlateNumber, Description, CreatedAt, UpdatedAt }
