//! CLI interface module
//!
//! Offline management commands for adorna. They talk to the database
//! directly, so they also work while the server is stopped.

pub mod commands;

use std::fmt;

use crate::cli::{Commands, ConfigCommands, OrderCommands, ProductCommands};
use crate::config::get_config;
use crate::media::create_image_store;
use crate::services::ProductService;
use crate::storage::{SeaOrmStorage, StorageFactory};
use commands::{config_generate, list_orders, list_products, remove_product, run_hash_password};
use std::sync::Arc;

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::ShopError> for CliError {
    fn from(err: crate::errors::ShopError) -> Self {
        if err.is_client_error() {
            CliError::CommandError(err.message().to_string())
        } else {
            CliError::StorageError(err.to_string())
        }
    }
}

async fn open_storage() -> Result<Arc<SeaOrmStorage>, CliError> {
    StorageFactory::create()
        .await
        .map_err(|e| CliError::StorageError(e.to_string()))
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    match cmd {
        Commands::Serve => Err(CliError::CommandError(
            "serve is handled by the server runtime".to_string(),
        )),

        // 以下两个命令不需要数据库
        Commands::HashPassword { password, stdin } => run_hash_password(password, stdin),

        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => config_generate(output_path, force).await,

        Commands::Product { action } => {
            let storage = open_storage().await?;
            match action {
                ProductCommands::List => list_products(storage).await,
                ProductCommands::Remove { id } => {
                    let images = create_image_store(&get_config().media);
                    let service = ProductService::new(storage, images, &get_config().shop);
                    remove_product(&service, &id).await
                }
            }
        }

        Commands::Order {
            action: OrderCommands::List,
        } => list_orders(open_storage().await?).await,
    }
}
