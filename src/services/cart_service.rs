//! 购物车服务
//!
//! 购物车内嵌在用户记录上：读取 → 合并 → 整体写回。
//! 同一用户的并发修改按最后写入生效。

use std::sync::Arc;

use tracing::debug;

use crate::errors::{Result, ShopError};
use crate::storage::{Cart, SeaOrmStorage};

pub struct CartService {
    storage: Arc<SeaOrmStorage>,
}

impl CartService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    async fn load_cart(&self, user_id: &str) -> Result<Cart> {
        self.storage
            .find_user_by_id(user_id)
            .await?
            .map(|user| user.cart)
            .ok_or_else(|| ShopError::user_not_found("User not found"))
    }

    async fn store_cart(&self, user_id: &str, cart: &Cart) -> Result<()> {
        if !self.storage.save_cart(user_id, cart).await? {
            return Err(ShopError::user_not_found("User not found"));
        }
        Ok(())
    }

    fn validate_key(item_id: &str, size: &str) -> Result<()> {
        if item_id.trim().is_empty() || size.trim().is_empty() {
            return Err(ShopError::validation("Item and size are required"));
        }
        Ok(())
    }

    pub async fn get_cart(&self, user_id: &str) -> Result<Cart> {
        self.load_cart(user_id).await
    }

    /// 数量 +1（不存在时置为 1）
    pub async fn add_to_cart(&self, user_id: &str, item_id: &str, size: &str) -> Result<Cart> {
        Self::validate_key(item_id, size)?;

        let mut cart = self.load_cart(user_id).await?;
        cart.add_item(item_id, size);
        self.store_cart(user_id, &cart).await?;

        debug!("Cart add: user={} item={} size={}", user_id, item_id, size);
        Ok(cart)
    }

    /// 设置数量，0 表示移除
    pub async fn update_cart(
        &self,
        user_id: &str,
        item_id: &str,
        size: &str,
        quantity: u32,
    ) -> Result<Cart> {
        Self::validate_key(item_id, size)?;

        let mut cart = self.load_cart(user_id).await?;
        cart.set_quantity(item_id, size, quantity);
        self.store_cart(user_id, &cart).await?;

        debug!(
            "Cart update: user={} item={} size={} quantity={}",
            user_id, item_id, size, quantity
        );
        Ok(cart)
    }

    /// 下单成功后清空
    pub async fn clear_cart(&self, user_id: &str) -> Result<()> {
        self.store_cart(user_id, &Cart::new()).await
    }
}
