//! products 表读写

use std::collections::HashMap;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::info;

use super::{SeaOrmStorage, retry};
use crate::errors::Result;
use crate::storage::models::Product;
use migration::entities::product;

use super::converters::{model_to_product, product_to_active_model};

impl SeaOrmStorage {
    pub async fn insert_product(&self, product: &Product) -> Result<()> {
        let db = &self.db;
        let active_model = product_to_active_model(product)?;

        retry::with_retry("insert_product", self.retry_config, || {
            let model = active_model.clone();
            async move { product::Entity::insert(model).exec_without_returning(db).await }
        })
        .await?;

        info!("Product inserted: {} ({})", product.id, product.name);
        Ok(())
    }

    /// 按创建时间升序列出全部商品
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let db = &self.db;
        let models = retry::with_retry("list_products", self.retry_config, || async {
            product::Entity::find()
                .order_by_asc(product::Column::Date)
                .order_by_asc(product::Column::Id)
                .all(db)
                .await
        })
        .await?;

        models.into_iter().map(model_to_product).collect()
    }

    pub async fn get_product(&self, id: &str) -> Result<Option<Product>> {
        let db = &self.db;
        let model = retry::with_retry(&format!("get_product({})", id), self.retry_config, || async {
            product::Entity::find_by_id(id).one(db).await
        })
        .await?;

        model.map(model_to_product).transpose()
    }

    /// 批量查询，返回 id → Product
    pub async fn get_products(&self, ids: &[String]) -> Result<HashMap<String, Product>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let db = &self.db;
        let models = retry::with_retry("get_products", self.retry_config, || async {
            product::Entity::find()
                .filter(product::Column::Id.is_in(ids.iter().cloned()))
                .all(db)
                .await
        })
        .await?;

        models
            .into_iter()
            .map(|m| model_to_product(m).map(|p| (p.id.clone(), p)))
            .collect()
    }

    /// 删除商品，返回是否存在
    pub async fn delete_product(&self, id: &str) -> Result<bool> {
        let db = &self.db;
        let result = retry::with_retry(&format!("delete_product({})", id), self.retry_config, || async {
            product::Entity::delete_by_id(id).exec(db).await
        })
        .await?;

        Ok(result.rows_affected > 0)
    }
}
