//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for adorna using clap's derive macros.

use clap::{Parser, Subcommand};

/// Adorna - REST backend for the Adorna storefront and admin dashboard
#[derive(Parser)]
#[command(name = "adorna")]
#[command(version)]
#[command(about = "REST backend for the Adorna storefront and admin dashboard", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default when no subcommand is given)
    Serve,

    /// Print an Argon2 hash for `auth.admin_password`
    HashPassword {
        /// Password to hash (if not provided, will prompt interactively)
        #[arg(long)]
        password: Option<String>,

        /// Read password from stdin (for scripting)
        #[arg(long)]
        stdin: bool,
    },

    /// Manage catalog products
    Product {
        #[command(subcommand)]
        action: ProductCommands,
    },

    /// Inspect orders
    Order {
        #[command(subcommand)]
        action: OrderCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Product commands
#[derive(Subcommand)]
pub enum ProductCommands {
    /// List all products
    List,

    /// Remove a product by id
    Remove {
        /// Product id
        id: String,
    },
}

/// Order commands
#[derive(Subcommand)]
pub enum OrderCommands {
    /// List all orders
    List,
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}
