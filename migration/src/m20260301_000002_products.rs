use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Product::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Product::Name).string().not_null())
                    .col(ColumnDef::new(Product::Description).text().not_null())
                    .col(ColumnDef::new(Product::Price).double().not_null())
                    .col(ColumnDef::new(Product::Image).text().not_null())
                    .col(ColumnDef::new(Product::Category).string().not_null())
                    .col(ColumnDef::new(Product::SubCategory).string().not_null())
                    .col(ColumnDef::new(Product::Sizes).text().not_null())
                    .col(
                        ColumnDef::new(Product::Bestseller)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Product::Date).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 列表按创建时间排序
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_products_date")
                    .table(Product::Table)
                    .col(Product::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_products_date").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Product::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Product {
    #[sea_orm(iden = "products")]
    Table,
    Id,
    Name,
    Description,
    Price,
    Image,
    Category,
    SubCategory,
    Sizes,
    Bestseller,
    Date,
}
