//! Service layer for business logic
//!
//! Shared between the HTTP handlers and the CLI.

mod cart_service;
mod order_service;
mod product_service;
mod user_service;

pub use cart_service::CartService;
pub use order_service::{
    DELIVERY_LINE_ITEM, OrderLineRequest, OrderService, PlaceOrderRequest, VerifyRazorpayRequest,
};
pub use product_service::{AddProductRequest, MAX_PRODUCT_IMAGES, ProductService};
pub use user_service::{MIN_PASSWORD_LEN, RegisterRequest, UserService};
