use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use ts_rs::TS;

use crate::api::services::shop::types::TS_EXPORT_PATH;

/// 购物车：item_id → (size → quantity)
///
/// 空购物车序列化为 `{}`。数量为 0 的尺码不保留。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(transparent)]
pub struct Cart(pub BTreeMap<String, BTreeMap<String, u32>>);

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// 加入购物车：已有尺码数量 +1，否则置为 1
    pub fn add_item(&mut self, item_id: &str, size: &str) {
        let sizes = self.0.entry(item_id.to_string()).or_default();
        let quantity = sizes.entry(size.to_string()).or_insert(0);
        *quantity = quantity.saturating_add(1);
    }

    /// 直接设置数量；0 表示移除该尺码，商品下无尺码时一并移除
    pub fn set_quantity(&mut self, item_id: &str, size: &str, quantity: u32) {
        if quantity == 0 {
            if let Some(sizes) = self.0.get_mut(item_id) {
                sizes.remove(size);
                if sizes.is_empty() {
                    self.0.remove(item_id);
                }
            }
            return;
        }

        self.0
            .entry(item_id.to_string())
            .or_default()
            .insert(size.to_string(), quantity);
    }

    pub fn quantity(&self, item_id: &str, size: &str) -> u32 {
        self.0
            .get(item_id)
            .and_then(|sizes| sizes.get(size))
            .copied()
            .unwrap_or(0)
    }

    /// 商品件数总和
    pub fn total_quantity(&self) -> u64 {
        self.0
            .values()
            .flat_map(|sizes| sizes.values())
            .map(|&q| q as u64)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Argon2 哈希
    #[serde(skip_serializing)]
    pub password: String,
    pub cart: Cart,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: Vec<String>,
    pub category: String,
    pub sub_category: String,
    pub sizes: Vec<String>,
    pub bestseller: bool,
    /// 创建时间（毫秒）
    #[ts(type = "number")]
    pub date: i64,
}

/// 新建商品的字段（图片已上传为 URL）
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: Vec<String>,
    pub category: String,
    pub sub_category: String,
    pub sizes: Vec<String>,
    pub bestseller: bool,
}

/// 订单状态（与管理后台下拉选项一致）
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    TS,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "Order Placed")]
    #[strum(serialize = "Order Placed")]
    OrderPlaced,
    #[serde(rename = "Packing")]
    #[strum(serialize = "Packing")]
    Packing,
    #[serde(rename = "Shipped")]
    #[strum(serialize = "Shipped")]
    Shipped,
    #[serde(rename = "Out for delivery")]
    #[strum(serialize = "Out for delivery")]
    OutForDelivery,
    #[serde(rename = "Delivered")]
    #[strum(serialize = "Delivered")]
    Delivered,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    TS,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub enum PaymentMethod {
    #[serde(rename = "COD")]
    #[strum(serialize = "COD")]
    Cod,
    Stripe,
    Razorpay,
}

/// 下单时的商品快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(rename = "_id")]
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub image: Vec<String>,
    pub category: String,
    pub sub_category: String,
    pub size: String,
    pub quantity: u32,
}

impl OrderItem {
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub amount: f64,
    /// 收货地址，结构由前端决定
    pub address: serde_json::Value,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment: bool,
    /// Stripe session id / Razorpay order id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_ref: Option<String>,
    pub date: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_cart_add_item_increments() {
        let mut cart = Cart::new();
        cart.add_item("p1", "M");
        cart.add_item("p1", "M");
        cart.add_item("p1", "L");
        cart.add_item("p2", "S");

        assert_eq!(cart.quantity("p1", "M"), 2);
        assert_eq!(cart.quantity("p1", "L"), 1);
        assert_eq!(cart.quantity("p2", "S"), 1);
        assert_eq!(cart.total_quantity(), 4);
    }

    #[test]
    fn test_cart_set_quantity_creates_entry() {
        let mut cart = Cart::new();
        cart.set_quantity("p1", "XL", 3);
        assert_eq!(cart.quantity("p1", "XL"), 3);
    }

    #[test]
    fn test_cart_set_quantity_zero_removes() {
        let mut cart = Cart::new();
        cart.add_item("p1", "M");
        cart.add_item("p1", "L");

        cart.set_quantity("p1", "M", 0);
        assert_eq!(cart.quantity("p1", "M"), 0);
        assert!(!cart.is_empty());

        cart.set_quantity("p1", "L", 0);
        assert!(cart.is_empty());

        // 不存在的条目设置为 0 不应创建空对象
        cart.set_quantity("ghost", "M", 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_serializes_as_plain_map() {
        let mut cart = Cart::new();
        assert_eq!(serde_json::to_string(&cart).unwrap(), "{}");

        cart.add_item("p1", "M");
        assert_eq!(serde_json::to_string(&cart).unwrap(), r#"{"p1":{"M":1}}"#);

        let parsed: Cart = serde_json::from_str(r#"{"a":{"S":2,"M":1}}"#).unwrap();
        assert_eq!(parsed.quantity("a", "S"), 2);
    }

    #[test]
    fn test_order_status_strings() {
        assert_eq!(OrderStatus::OrderPlaced.to_string(), "Order Placed");
        assert_eq!(
            OrderStatus::from_str("Out for delivery").unwrap(),
            OrderStatus::OutForDelivery
        );
        assert!(OrderStatus::from_str("Lost").is_err());
        assert_eq!(
            serde_json::to_string(&OrderStatus::Delivered).unwrap(),
            "\"Delivered\""
        );
    }

    #[test]
    fn test_payment_method_strings() {
        assert_eq!(PaymentMethod::Cod.to_string(), "COD");
        assert_eq!(PaymentMethod::from_str("Razorpay").unwrap(), PaymentMethod::Razorpay);
        assert_eq!(serde_json::to_string(&PaymentMethod::Cod).unwrap(), "\"COD\"");
    }

    #[test]
    fn test_product_wire_names() {
        let product = Product {
            id: "id-1".into(),
            name: "Tee".into(),
            description: "Cotton".into(),
            price: 25.0,
            image: vec!["http://img/1.png".into()],
            category: "Men".into(),
            sub_category: "Topwear".into(),
            sizes: vec!["M".into()],
            bestseller: true,
            date: 1,
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["_id"], "id-1");
        assert_eq!(json["subCategory"], "Topwear");
    }

    #[test]
    fn test_order_item_line_total() {
        let item = OrderItem {
            product_id: "p".into(),
            name: "n".into(),
            price: 12.5,
            image: vec![],
            category: "c".into(),
            sub_category: "s".into(),
            size: "M".into(),
            quantity: 4,
        };
        assert_eq!(item.line_total(), 50.0);
    }
}
