use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Category: lookups by owning bus drive the delete cascade
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_category_bus")
                    .table(Category::Table)
                    .col(Category::BusId)
                    .to_owned(),
            )
            .await?;

        // MenuItem: index on category_id
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_menu_item_category")
                    .table(MenuItem::Table)
                    .col(MenuItem::CategoryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_menu_item_category").table(MenuItem::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_category_bus").table(Category::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Category { Table, BusId }

#[derive(DeriveIden)]
enum MenuItem { Table, CategoryId }
