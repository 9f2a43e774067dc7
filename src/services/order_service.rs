//! 订单与支付服务
//!
//! 金额由服务端根据商品目录重新计算：Σ price × quantity + 运费。
//! 在线支付先落库（payment = false），网关确认后标记已支付并清空购物车。

use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::config::ShopConfig;
use crate::errors::{Result, ShopError};
use crate::payments::{
    CheckoutLineItem, CheckoutSessionRequest, PaymentGateways, RazorpayOrder, is_valid_order_id,
    to_minor_units,
};
use crate::storage::{Cart, Order, OrderItem, OrderStatus, PaymentMethod, SeaOrmStorage};
use crate::utils::now_millis;

/// Stripe 额外行项目名称
pub const DELIVERY_LINE_ITEM: &str = "Delivery Charges";

/// 下单请求中的一行，只取 id / size / quantity，其余字段以目录为准
#[derive(Debug, Clone, Deserialize)]
pub struct OrderLineRequest {
    #[serde(rename = "_id")]
    pub product_id: String,
    pub size: String,
    pub quantity: u32,
}

#[derive(Debug, Clone)]
pub struct PlaceOrderRequest {
    pub items: Vec<OrderLineRequest>,
    pub address: serde_json::Value,
}

#[derive(Debug, Clone, Default)]
pub struct VerifyRazorpayRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: Option<String>,
    pub razorpay_signature: Option<String>,
}

pub struct OrderService {
    storage: Arc<SeaOrmStorage>,
    gateways: PaymentGateways,
    currency: String,
    delivery_charge: f64,
    storefront_url: String,
}

impl OrderService {
    pub fn new(storage: Arc<SeaOrmStorage>, gateways: PaymentGateways, shop: &ShopConfig) -> Self {
        Self {
            storage,
            gateways,
            currency: shop.currency.to_lowercase(),
            delivery_charge: shop.delivery_charge.max(0.0),
            storefront_url: shop.storefront_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn delivery_charge(&self) -> f64 {
        self.delivery_charge
    }

    /// 根据目录快照商品并计算金额
    async fn build_order(
        &self,
        user_id: &str,
        req: PlaceOrderRequest,
        payment_method: PaymentMethod,
    ) -> Result<Order> {
        if req.items.is_empty() {
            return Err(ShopError::cart_empty("Cart is empty"));
        }
        if let Some(line) = req.items.iter().find(|l| l.quantity == 0) {
            return Err(ShopError::validation(format!(
                "Invalid quantity for item {}",
                line.product_id
            )));
        }

        let mut ids: Vec<String> = req.items.iter().map(|l| l.product_id.clone()).collect();
        ids.sort();
        ids.dedup();
        let catalog = self.storage.get_products(&ids).await?;

        let items = req
            .items
            .into_iter()
            .map(|line| {
                let product = catalog
                    .get(&line.product_id)
                    .ok_or_else(|| ShopError::product_not_found("Product not found"))?;
                Ok(OrderItem {
                    product_id: product.id.clone(),
                    name: product.name.clone(),
                    price: product.price,
                    image: product.image.clone(),
                    category: product.category.clone(),
                    sub_category: product.sub_category.clone(),
                    size: line.size,
                    quantity: line.quantity,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let subtotal: f64 = items.iter().map(OrderItem::line_total).sum();
        let amount = ((subtotal + self.delivery_charge) * 100.0).round() / 100.0;

        Ok(Order {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            items,
            amount,
            address: req.address,
            status: OrderStatus::default(),
            payment_method,
            payment: false,
            payment_ref: None,
            date: now_millis(),
        })
    }

    async fn clear_cart(&self, user_id: &str) -> Result<()> {
        if !self.storage.save_cart(user_id, &Cart::new()).await? {
            warn!("Cart not cleared: user {} no longer exists", user_id);
        }
        Ok(())
    }

    /// 网关调用失败时撤销刚创建的订单
    async fn discard_order(&self, order_id: &str) {
        if let Err(e) = self.storage.delete_order(order_id).await {
            error!("Failed to discard order {}: {}", order_id, e);
        }
    }

    /// 货到付款
    pub async fn place_cod(&self, user_id: &str, req: PlaceOrderRequest) -> Result<Order> {
        let order = self.build_order(user_id, req, PaymentMethod::Cod).await?;
        self.storage.insert_order(&order).await?;
        self.clear_cart(user_id).await?;
        Ok(order)
    }

    /// 创建 Stripe Checkout Session，返回跳转 URL
    ///
    /// `origin` 为请求的 Origin 头，缺省使用配置的店面地址
    pub async fn place_stripe(
        &self,
        user_id: &str,
        req: PlaceOrderRequest,
        origin: Option<&str>,
    ) -> Result<String> {
        let order = self.build_order(user_id, req, PaymentMethod::Stripe).await?;
        self.storage.insert_order(&order).await?;

        let origin = origin
            .map(|o| o.trim_end_matches('/'))
            .filter(|o| !o.is_empty())
            .unwrap_or(&self.storefront_url);

        let mut line_items: Vec<CheckoutLineItem> = order
            .items
            .iter()
            .map(|item| CheckoutLineItem {
                name: item.name.clone(),
                unit_amount: to_minor_units(item.price),
                quantity: item.quantity,
            })
            .collect();
        line_items.push(CheckoutLineItem {
            name: DELIVERY_LINE_ITEM.to_string(),
            unit_amount: to_minor_units(self.delivery_charge),
            quantity: 1,
        });

        let request = CheckoutSessionRequest {
            currency: self.currency.clone(),
            line_items,
            success_url: format!("{}/verify?success=true&orderId={}", origin, order.id),
            cancel_url: format!("{}/verify?success=false&orderId={}", origin, order.id),
            order_id: order.id.clone(),
        };

        let session = match self.gateways.stripe.create_checkout_session(request).await {
            Ok(session) => session,
            Err(e) => {
                self.discard_order(&order.id).await;
                return Err(e);
            }
        };

        let Some(session_url) = session.url.clone() else {
            self.discard_order(&order.id).await;
            return Err(ShopError::payment_gateway(
                "Stripe did not return a checkout URL",
            ));
        };

        self.storage.set_payment_ref(&order.id, &session.id).await?;
        Ok(session_url)
    }

    /// 校验 Stripe 支付结果，返回是否已支付
    ///
    /// 未支付（或用户取消）时删除订单。
    pub async fn verify_stripe(&self, user_id: &str, order_id: &str, success: bool) -> Result<bool> {
        let order = self
            .storage
            .get_order(order_id)
            .await?
            .filter(|o| o.user_id == user_id && o.payment_method == PaymentMethod::Stripe)
            .ok_or_else(|| ShopError::order_not_found("Order not found"))?;

        if order.payment {
            return Ok(true);
        }

        let paid = match (success, order.payment_ref.as_deref()) {
            (true, Some(session_id)) => self
                .gateways
                .stripe
                .retrieve_checkout_session(session_id)
                .await?
                .is_paid(),
            _ => false,
        };

        if paid {
            self.storage.mark_order_paid(&order.id).await?;
            self.clear_cart(user_id).await?;
            info!("Stripe payment confirmed for order {}", order.id);
        } else {
            self.storage.delete_order(&order.id).await?;
            info!("Stripe payment not completed, order {} removed", order.id);
        }

        Ok(paid)
    }

    /// 创建 Razorpay 订单，返回网关订单（前端用于拉起 Checkout）
    pub async fn place_razorpay(&self, user_id: &str, req: PlaceOrderRequest) -> Result<RazorpayOrder> {
        let order = self
            .build_order(user_id, req, PaymentMethod::Razorpay)
            .await?;
        self.storage.insert_order(&order).await?;

        let created = self
            .gateways
            .razorpay
            .create_order(to_minor_units(order.amount), &self.currency, &order.id)
            .await;

        let razorpay_order = match created {
            Ok(o) => o,
            Err(e) => {
                self.discard_order(&order.id).await;
                return Err(e);
            }
        };

        self.storage
            .set_payment_ref(&order.id, &razorpay_order.id)
            .await?;
        Ok(razorpay_order)
    }

    /// 校验 Razorpay 支付结果，返回是否已支付
    pub async fn verify_razorpay(&self, user_id: &str, req: VerifyRazorpayRequest) -> Result<bool> {
        if req.razorpay_order_id.trim().is_empty() {
            return Err(ShopError::validation("Missing razorpay_order_id"));
        }
        if !is_valid_order_id(&req.razorpay_order_id) {
            return Err(ShopError::validation("Invalid razorpay_order_id"));
        }

        if let Some(signature) = req.razorpay_signature.as_deref() {
            let payment_id = req
                .razorpay_payment_id
                .as_deref()
                .ok_or_else(|| ShopError::validation("Missing razorpay_payment_id"))?;
            if !self.gateways.razorpay.verify_payment_signature(
                &req.razorpay_order_id,
                payment_id,
                signature,
            ) {
                warn!(
                    "Razorpay signature mismatch for order {}",
                    req.razorpay_order_id
                );
                return Err(ShopError::invalid_signature("Invalid payment signature"));
            }
        }

        let razorpay_order = self
            .gateways
            .razorpay
            .fetch_order(&req.razorpay_order_id)
            .await?;

        if !razorpay_order.is_paid() {
            return Ok(false);
        }

        let receipt = razorpay_order
            .receipt
            .as_deref()
            .ok_or_else(|| ShopError::order_not_found("Order not found"))?;
        let order = self
            .storage
            .get_order(receipt)
            .await?
            .filter(|o| o.user_id == user_id)
            .ok_or_else(|| ShopError::order_not_found("Order not found"))?;

        if !order.payment {
            self.storage.mark_order_paid(&order.id).await?;
        }
        self.clear_cart(user_id).await?;
        info!("Razorpay payment confirmed for order {}", order.id);
        Ok(true)
    }

    pub async fn user_orders(&self, user_id: &str) -> Result<Vec<Order>> {
        self.storage.list_orders_for_user(user_id).await
    }

    pub async fn all_orders(&self) -> Result<Vec<Order>> {
        self.storage.list_orders().await
    }

    pub async fn update_status(&self, order_id: &str, status: &str) -> Result<OrderStatus> {
        let status = OrderStatus::from_str(status.trim())
            .map_err(|_| ShopError::invalid_order_status(format!("Invalid order status: {}", status)))?;

        if !self.storage.update_order_status(order_id, status).await? {
            return Err(ShopError::order_not_found("Order not found"));
        }
        info!("Order {} status -> {}", order_id, status);
        Ok(status)
    }
}
