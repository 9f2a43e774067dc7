//! HTTP timing middleware
//!
//! 所有请求以 debug 记录耗时，超过阈值的慢请求以 warn 记录。

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    dev::{ServiceRequest, ServiceResponse},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::api::constants::SLOW_REQUEST_MS;

/// HTTP timing middleware factory
#[derive(Clone)]
pub struct TimingMiddleware {
    slow_threshold_ms: u128,
}

impl Default for TimingMiddleware {
    fn default() -> Self {
        Self {
            slow_threshold_ms: SLOW_REQUEST_MS,
        }
    }
}

impl TimingMiddleware {
    pub fn with_threshold_ms(slow_threshold_ms: u128) -> Self {
        Self { slow_threshold_ms }
    }
}

impl<S, B> Transform<S, ServiceRequest> for TimingMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TimingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TimingService {
            service: Rc::new(service),
            slow_threshold_ms: self.slow_threshold_ms,
        }))
    }
}

pub struct TimingService<S> {
    service: Rc<S>,
    slow_threshold_ms: u128,
}

impl<S, B> Service<ServiceRequest> for TimingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let threshold = self.slow_threshold_ms;
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();

        Box::pin(async move {
            let result = srv.call(req).await;

            let elapsed = start.elapsed();
            let status = match &result {
                Ok(response) => response.status().as_u16(),
                Err(_) => 500,
            };

            if elapsed.as_millis() >= threshold {
                warn!(
                    "Slow request: {} {} -> {} in {:?}",
                    method, path, status, elapsed
                );
            } else {
                debug!("{} {} -> {} in {:?}", method, path, status, elapsed);
            }

            result
        })
    }
}
