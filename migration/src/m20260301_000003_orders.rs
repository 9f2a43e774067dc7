use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Order::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Order::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Order::UserId).string().not_null())
                    .col(ColumnDef::new(Order::Items).text().not_null())
                    .col(ColumnDef::new(Order::Amount).double().not_null())
                    .col(ColumnDef::new(Order::Address).text().not_null())
                    .col(
                        ColumnDef::new(Order::Status)
                            .string()
                            .not_null()
                            .default("Order Placed"),
                    )
                    .col(ColumnDef::new(Order::PaymentMethod).string().not_null())
                    .col(
                        ColumnDef::new(Order::Payment)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Order::PaymentRef).string().null())
                    .col(ColumnDef::new(Order::Date).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 用户订单查询
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_orders_user_id")
                    .table(Order::Table)
                    .col(Order::UserId)
                    .col(Order::Date)
                    .to_owned(),
            )
            .await?;

        // Razorpay / Stripe 回查
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_orders_payment_ref")
                    .table(Order::Table)
                    .col(Order::PaymentRef)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_orders_payment_ref").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_orders_user_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Order::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Order {
    #[sea_orm(iden = "orders")]
    Table,
    Id,
    UserId,
    Items,
    Amount,
    Address,
    Status,
    PaymentMethod,
    Payment,
    PaymentRef,
    Date,
}
