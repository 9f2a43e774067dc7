use std::str::FromStr;

use crate::errors::{Result, ShopError};
use crate::storage::models::{Cart, Order, OrderItem, OrderStatus, PaymentMethod, Product, User};
use migration::entities::{order, product, user};

/// 将 users Model 转换为 User
pub fn model_to_user(model: user::Model) -> Result<User> {
    let cart: Cart = serde_json::from_str(&model.cart_data).map_err(|e| {
        ShopError::serialization(format!("用户 {} 的 cart_data 无法解析: {}", model.id, e))
    })?;

    Ok(User {
        id: model.id,
        name: model.name,
        email: model.email,
        password: model.password,
        cart,
        created_at: model.created_at,
    })
}

/// 将 User 转换为 ActiveModel（用于插入）
pub fn user_to_active_model(user: &User) -> Result<user::ActiveModel> {
    use sea_orm::ActiveValue::Set;

    Ok(user::ActiveModel {
        id: Set(user.id.clone()),
        name: Set(user.name.clone()),
        email: Set(user.email.clone()),
        password: Set(user.password.clone()),
        cart_data: Set(serde_json::to_string(&user.cart)?),
        created_at: Set(user.created_at),
    })
}

pub fn model_to_product(model: product::Model) -> Result<Product> {
    let image: Vec<String> = serde_json::from_str(&model.image)?;
    let sizes: Vec<String> = serde_json::from_str(&model.sizes)?;

    Ok(Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        image,
        category: model.category,
        sub_category: model.sub_category,
        sizes,
        bestseller: model.bestseller,
        date: model.date,
    })
}

pub fn product_to_active_model(product: &Product) -> Result<product::ActiveModel> {
    use sea_orm::ActiveValue::Set;

    Ok(product::ActiveModel {
        id: Set(product.id.clone()),
        name: Set(product.name.clone()),
        description: Set(product.description.clone()),
        price: Set(product.price),
        image: Set(serde_json::to_string(&product.image)?),
        category: Set(product.category.clone()),
        sub_category: Set(product.sub_category.clone()),
        sizes: Set(serde_json::to_string(&product.sizes)?),
        bestseller: Set(product.bestseller),
        date: Set(product.date),
    })
}

pub fn model_to_order(model: order::Model) -> Result<Order> {
    let items: Vec<OrderItem> = serde_json::from_str(&model.items)?;
    let address: serde_json::Value = serde_json::from_str(&model.address)?;
    let status = OrderStatus::from_str(&model.status).map_err(|_| {
        ShopError::serialization(format!(
            "订单 {} 状态未知: {}",
            model.id, model.status
        ))
    })?;
    let payment_method = PaymentMethod::from_str(&model.payment_method).map_err(|_| {
        ShopError::serialization(format!(
            "订单 {} 支付方式未知: {}",
            model.id, model.payment_method
        ))
    })?;

    Ok(Order {
        id: model.id,
        user_id: model.user_id,
        items,
        amount: model.amount,
        address,
        status,
        payment_method,
        payment: model.payment,
        payment_ref: model.payment_ref,
        date: model.date,
    })
}

pub fn order_to_active_model(order: &Order) -> Result<order::ActiveModel> {
    use sea_orm::ActiveValue::Set;

    Ok(order::ActiveModel {
        id: Set(order.id.clone()),
        user_id: Set(order.user_id.clone()),
        items: Set(serde_json::to_string(&order.items)?),
        amount: Set(order.amount),
        address: Set(serde_json::to_string(&order.address)?),
        status: Set(order.status.to_string()),
        payment_method: Set(order.payment_method.to_string()),
        payment: Set(order.payment),
        payment_ref: Set(order.payment_ref.clone()),
        date: Set(order.date),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    fn create_test_user_model() -> user::Model {
        user::Model {
            id: "u1".to_string(),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            password: "$argon2id$hash".to_string(),
            cart_data: r#"{"p1":{"M":2}}"#.to_string(),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_model_to_user_parses_cart() {
        let user = model_to_user(create_test_user_model()).unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.cart.quantity("p1", "M"), 2);
    }

    #[test]
    fn test_model_to_user_rejects_corrupt_cart() {
        let mut model = create_test_user_model();
        model.cart_data = "not json".to_string();
        let err = model_to_user(model).unwrap_err();
        assert!(matches!(err, ShopError::Serialization(_)));
    }

    #[test]
    fn test_user_to_active_model_empty_cart() {
        let mut user = model_to_user(create_test_user_model()).unwrap();
        user.cart.clear();
        let active = user_to_active_model(&user).unwrap();
        assert_eq!(active.cart_data, ActiveValue::Set("{}".to_string()));
    }

    #[test]
    fn test_product_json_columns() {
        let model = product::Model {
            id: "p1".to_string(),
            name: "Tee".to_string(),
            description: "Soft".to_string(),
            price: 30.0,
            image: r#"["http://a/1.png","http://a/2.png"]"#.to_string(),
            category: "Women".to_string(),
            sub_category: "Topwear".to_string(),
            sizes: r#"["S","M"]"#.to_string(),
            bestseller: false,
            date: 1_700_000_000_000,
        };
        let product = model_to_product(model).unwrap();
        assert_eq!(product.image.len(), 2);
        assert_eq!(product.sizes, vec!["S", "M"]);

        let active = product_to_active_model(&product).unwrap();
        assert_eq!(active.sizes, ActiveValue::Set(r#"["S","M"]"#.to_string()));
    }

    #[test]
    fn test_order_round_trip_through_model() {
        let model = order::Model {
            id: "o1".to_string(),
            user_id: "u1".to_string(),
            items: r#"[{"_id":"p1","name":"Tee","price":30.0,"image":[],"category":"Men","subCategory":"Topwear","size":"M","quantity":2}]"#.to_string(),
            amount: 70.0,
            address: r#"{"city":"Pune"}"#.to_string(),
            status: "Shipped".to_string(),
            payment_method: "COD".to_string(),
            payment: false,
            payment_ref: None,
            date: 1,
        };
        let order = model_to_order(model).unwrap();
        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(order.payment_method, PaymentMethod::Cod);
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.address["city"], "Pune");

        let active = order_to_active_model(&order).unwrap();
        assert_eq!(active.status, ActiveValue::Set("Shipped".to_string()));
    }

    #[test]
    fn test_model_to_order_unknown_status() {
        let model = order::Model {
            id: "o1".to_string(),
            user_id: "u1".to_string(),
            items: "[]".to_string(),
            amount: 0.0,
            address: "{}".to_string(),
            status: "Teleported".to_string(),
            payment_method: "COD".to_string(),
            payment: false,
            payment_ref: None,
            date: 1,
        };
        assert!(model_to_order(model).is_err());
    }
}
