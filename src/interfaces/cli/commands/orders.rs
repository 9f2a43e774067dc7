//! Order listing command

use colored::Colorize;
use std::sync::Arc;

use crate::interfaces::cli::CliError;
use crate::storage::{Order, SeaOrmStorage};

fn describe_order(order: &Order) -> String {
    let date = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(order.date)
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| order.date.to_string());

    let payment = if order.payment {
        "paid".green().to_string()
    } else {
        "unpaid".red().to_string()
    };

    format!(
        "{} {} {} {} {} ({}) {}",
        order.id.cyan(),
        date.dimmed(),
        format!("{:.2}", order.amount).green(),
        order.payment_method.as_ref().blue(),
        payment,
        order.status.as_ref().yellow(),
        format!("{} items", order.items.len()).dimmed()
    )
}

pub async fn list_orders(storage: Arc<SeaOrmStorage>) -> Result<(), CliError> {
    let orders = storage
        .list_orders()
        .await
        .map_err(|e| CliError::CommandError(format!("Failed to load orders: {}", e)))?;

    if orders.is_empty() {
        println!("{} No orders found", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Order list:".bold().green());
    println!();
    for order in &orders {
        println!("  {}", describe_order(order));
    }
    println!();
    println!(
        "{} Total {} orders",
        "ℹ".bold().blue(),
        orders.len().to_string().green()
    );
    Ok(())
}
