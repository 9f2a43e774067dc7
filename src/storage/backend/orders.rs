//! orders 表读写

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, sea_query::Expr};
use tracing::info;

use super::{SeaOrmStorage, retry};
use crate::errors::Result;
use crate::storage::models::{Order, OrderStatus};
use migration::entities::order;

use super::converters::{model_to_order, order_to_active_model};

impl SeaOrmStorage {
    pub async fn insert_order(&self, order: &Order) -> Result<()> {
        let db = &self.db;
        let active_model = order_to_active_model(order)?;

        retry::with_retry("insert_order", self.retry_config, || {
            let model = active_model.clone();
            async move { order::Entity::insert(model).exec_without_returning(db).await }
        })
        .await?;

        info!(
            "Order inserted: {} (user: {}, method: {}, amount: {})",
            order.id, order.user_id, order.payment_method, order.amount
        );
        Ok(())
    }

    pub async fn get_order(&self, id: &str) -> Result<Option<Order>> {
        let db = &self.db;
        let model = retry::with_retry(&format!("get_order({})", id), self.retry_config, || async {
            order::Entity::find_by_id(id).one(db).await
        })
        .await?;

        model.map(model_to_order).transpose()
    }

    /// 用户订单，按下单时间升序
    pub async fn list_orders_for_user(&self, user_id: &str) -> Result<Vec<Order>> {
        let db = &self.db;
        let models = retry::with_retry("list_orders_for_user", self.retry_config, || async {
            order::Entity::find()
                .filter(order::Column::UserId.eq(user_id))
                .order_by_asc(order::Column::Date)
                .all(db)
                .await
        })
        .await?;

        models.into_iter().map(model_to_order).collect()
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        let db = &self.db;
        let models = retry::with_retry("list_orders", self.retry_config, || async {
            order::Entity::find()
                .order_by_asc(order::Column::Date)
                .all(db)
                .await
        })
        .await?;

        models.into_iter().map(model_to_order).collect()
    }

    /// 记录支付网关的 session / order id
    pub async fn set_payment_ref(&self, id: &str, payment_ref: &str) -> Result<bool> {
        self.update_order_column(id, order::Column::PaymentRef, payment_ref.to_string())
            .await
    }

    pub async fn mark_order_paid(&self, id: &str) -> Result<bool> {
        self.update_order_column(id, order::Column::Payment, true)
            .await
    }

    pub async fn update_order_status(&self, id: &str, status: OrderStatus) -> Result<bool> {
        self.update_order_column(id, order::Column::Status, status.to_string())
            .await
    }

    pub async fn delete_order(&self, id: &str) -> Result<bool> {
        let db = &self.db;
        let result = retry::with_retry(&format!("delete_order({})", id), self.retry_config, || async {
            order::Entity::delete_by_id(id).exec(db).await
        })
        .await?;

        Ok(result.rows_affected > 0)
    }

    async fn update_order_column<V>(&self, id: &str, column: order::Column, value: V) -> Result<bool>
    where
        V: Into<sea_orm::Value> + Clone,
    {
        let db = &self.db;
        let result = retry::with_retry(&format!("update_order({})", id), self.retry_config, || {
            let value = value.clone();
            async move {
                order::Entity::update_many()
                    .col_expr(column, Expr::value(value))
                    .filter(order::Column::Id.eq(id))
                    .exec(db)
                    .await
            }
        })
        .await?;

        Ok(result.rows_affected > 0)
    }
}
