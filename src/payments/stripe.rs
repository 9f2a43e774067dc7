//! Stripe Checkout 客户端（form-encoded REST）

use async_trait::async_trait;
use tracing::{debug, info};

use super::{CheckoutSession, CheckoutSessionRequest, StripeApi};
use crate::errors::{Result, ShopError};
use crate::utils::http::{get_agent, read_json_response, run_blocking, transport_error};

const SERVICE: &str = "Stripe";

pub struct StripeClient {
    api_base: String,
    secret_key: String,
}

impl StripeClient {
    pub fn new(api_base: &str, secret_key: &str) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            secret_key: secret_key.to_string(),
        }
    }

    fn ensure_configured(&self) -> Result<()> {
        if self.secret_key.is_empty() {
            return Err(ShopError::payment_gateway("Stripe is not configured"));
        }
        Ok(())
    }
}

/// 构建 Checkout Session 的表单字段
fn checkout_form(request: &CheckoutSessionRequest) -> Vec<(String, String)> {
    let mut form = vec![
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
        ("client_reference_id".to_string(), request.order_id.clone()),
        ("metadata[order_id]".to_string(), request.order_id.clone()),
    ];

    for (i, item) in request.line_items.iter().enumerate() {
        let prefix = format!("line_items[{}]", i);
        form.push((
            format!("{}[price_data][currency]", prefix),
            request.currency.clone(),
        ));
        form.push((
            format!("{}[price_data][product_data][name]", prefix),
            item.name.clone(),
        ));
        form.push((
            format!("{}[price_data][unit_amount]", prefix),
            item.unit_amount.to_string(),
        ));
        form.push((format!("{}[quantity]", prefix), item.quantity.to_string()));
    }

    form
}

#[async_trait]
impl StripeApi for StripeClient {
    async fn create_checkout_session(
        &self,
        request: CheckoutSessionRequest,
    ) -> Result<CheckoutSession> {
        self.ensure_configured()?;

        let url = format!("{}/v1/checkout/sessions", self.api_base);
        let auth = format!("Bearer {}", self.secret_key);
        let form = checkout_form(&request);
        debug!(
            "Creating Stripe checkout session for order {} ({} line items)",
            request.order_id,
            request.line_items.len()
        );

        let session: CheckoutSession = run_blocking(SERVICE, move || {
            let resp = get_agent()
                .post(&url)
                .header("Authorization", &auth)
                .send_form(form)
                .map_err(|e| transport_error(SERVICE, e))?;
            read_json_response(SERVICE, resp)
        })
        .await?;

        info!(
            "Stripe checkout session {} created for order {}",
            session.id, request.order_id
        );
        Ok(session)
    }

    async fn retrieve_checkout_session(&self, session_id: &str) -> Result<CheckoutSession> {
        self.ensure_configured()?;

        let url = format!("{}/v1/checkout/sessions/{}", self.api_base, session_id);
        let auth = format!("Bearer {}", self.secret_key);

        run_blocking(SERVICE, move || {
            let resp = get_agent()
                .get(&url)
                .header("Authorization", &auth)
                .call()
                .map_err(|e| transport_error(SERVICE, e))?;
            read_json_response(SERVICE, resp)
        })
        .await
    }
}
