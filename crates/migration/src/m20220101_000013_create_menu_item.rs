//! Create `menu_item` table with FK to `category`.
//!
//! Items are owned by their category and go away with it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MenuItem::Table)
                    .if_not_exists()
                    .col(pk_auto(MenuItem::Id))
                    .col(integer(MenuItem::CategoryId).not_null())
                    .col(string_len(MenuItem::Name, 128).not_null())
                    .col(integer(MenuItem::PriceCents).not_null())
                    .col(timestamp_with_time_zone(MenuItem::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_menu_item_category")
                            .from(MenuItem::Table, MenuItem::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(MenuItem::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum MenuItem { Table, Id, CategoryId, Name, PriceCents, CreatedAt }

#[derive(DeriveIden)]
enum Category { Table, Id }
