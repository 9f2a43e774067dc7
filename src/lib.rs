//! Adorna - REST backend for the Adorna storefront and admin dashboard
//!
//! Accounts, product catalog, per-user carts and orders paid by cash on
//! delivery, Stripe Checkout or Razorpay.
//!
//! # Architecture
//! - `api`: HTTP handlers, JWT and middleware
//! - `services`: business logic shared by HTTP and CLI
//! - `storage`: SeaORM storage backend and domain models
//! - `payments`: Stripe / Razorpay gateway clients
//! - `media`: product image storage (local disk or Cloudinary)
//! - `interfaces`: offline management CLI
//! - `config`: configuration loading
//! - `runtime`: application lifecycle and server mode
//! - `system`: logging

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod media;
pub mod payments;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
