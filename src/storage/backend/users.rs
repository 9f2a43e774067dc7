//! users 表读写

use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, SqlErr, sea_query::Expr,
};
use tracing::{debug, error};

use super::{SeaOrmStorage, retry};
use crate::errors::{Result, ShopError};
use crate::storage::models::{Cart, User};
use migration::entities::user;

use super::converters::{model_to_user, user_to_active_model};

impl SeaOrmStorage {
    pub async fn find_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let db = &self.db;
        let model = retry::with_retry(&format!("find_user({})", id), self.retry_config, || async {
            user::Entity::find_by_id(id).one(db).await
        })
        .await?;

        model.map(model_to_user).transpose()
    }

    /// 按邮箱查找（邮箱应已规范化）
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let db = &self.db;
        let model = retry::with_retry("find_user_by_email", self.retry_config, || async {
            user::Entity::find()
                .filter(user::Column::Email.eq(email))
                .one(db)
                .await
        })
        .await?;

        model.map(model_to_user).transpose()
    }

    /// 新建用户；邮箱唯一索引冲突映射为 UserExists
    pub async fn create_user(&self, user: &User) -> Result<()> {
        let db = &self.db;
        let active_model = user_to_active_model(user)?;

        let result = retry::with_retry("create_user", self.retry_config, || {
            let model = active_model.clone();
            async move { user::Entity::insert(model).exec_without_returning(db).await }
        })
        .await;

        match result {
            Ok(_) => {
                debug!("User created: {}", user.id);
                Ok(())
            }
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(ShopError::user_exists("User already exists"))
                }
                _ => {
                    error!("创建用户失败: {}", e);
                    Err(ShopError::database_operation(format!("创建用户失败: {}", e)))
                }
            },
        }
    }

    /// 整体写回购物车，返回用户是否存在
    pub async fn save_cart(&self, user_id: &str, cart: &Cart) -> Result<bool> {
        let db = &self.db;
        let cart_json = serde_json::to_string(cart)?;

        let result = retry::with_retry(&format!("save_cart({})", user_id), self.retry_config, || {
            let cart_json = cart_json.clone();
            async move {
                user::Entity::update_many()
                    .col_expr(user::Column::CartData, Expr::value(cart_json))
                    .filter(user::Column::Id.eq(user_id))
                    .exec(db)
                    .await
            }
        })
        .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_users(&self) -> Result<u64> {
        Ok(user::Entity::find().count(&self.db).await?)
    }
}
