//! Product management commands

use colored::Colorize;
use std::sync::Arc;

use crate::interfaces::cli::CliError;
use crate::services::ProductService;
use crate::storage::SeaOrmStorage;

pub async fn list_products(storage: Arc<SeaOrmStorage>) -> Result<(), CliError> {
    let products = storage
        .list_products()
        .await
        .map_err(|e| CliError::CommandError(format!("Failed to load products: {}", e)))?;

    if products.is_empty() {
        println!("{} No products found", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Product list:".bold().green());
    println!();
    for product in &products {
        let mut info_parts = vec![
            product.id.cyan().to_string(),
            product.name.bold().to_string(),
            format!("{:.2}", product.price).green().to_string(),
            format!("{}/{}", product.category, product.sub_category)
                .dimmed()
                .to_string(),
        ];

        if !product.sizes.is_empty() {
            info_parts.push(format!("[{}]", product.sizes.join(",")).yellow().to_string());
        }

        if product.bestseller {
            info_parts.push("★".yellow().to_string());
        }

        println!("  {}", info_parts.join(" "));
    }
    println!();
    println!(
        "{} Total {} products",
        "ℹ".bold().blue(),
        products.len().to_string().green()
    );
    Ok(())
}

pub async fn remove_product(service: &ProductService, id: &str) -> Result<(), CliError> {
    service.remove_product(id).await?;
    println!("{} Removed product: {}", "✓".bold().green(), id.cyan());
    Ok(())
}
