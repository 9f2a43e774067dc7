//! CLI command implementations

mod config_gen;
mod hash_password;
mod orders;
mod products;

pub use config_gen::config_generate;
pub use hash_password::run_hash_password;
pub use orders::list_orders;
pub use products::{list_products, remove_product};
