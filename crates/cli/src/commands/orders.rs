//! Checkout and order history commands.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use comptoir_client::ApiClient;
use comptoir_core::{CreateOrderDto, OrderId, OrderQuery, OrderStatus};

use super::CommandError;
use crate::output::{Printer, render_order, render_order_list, render_order_summaries};

/// Order listing filters.
#[derive(Debug, Clone, Default, Args)]
pub struct OrderFilters {
    /// `pending`, `confirmed`, `processing`, `shipped`, `delivered` or `cancelled`
    #[arg(long)]
    pub status: Option<OrderStatus>,

    /// First day, `YYYY-MM-DD`
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day, `YYYY-MM-DD`
    #[arg(long)]
    pub to: Option<NaiveDate>,

    #[arg(long)]
    pub page: Option<u32>,

    #[arg(long)]
    pub limit: Option<u32>,
}

impl From<OrderFilters> for OrderQuery {
    fn from(filters: OrderFilters) -> Self {
        Self {
            status: filters.status,
            start_date: filters.from,
            end_date: filters.to,
            page: filters.page,
            limit: filters.limit,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum OrdersCommand {
    /// Your orders
    List(OrderFilters),
    /// One of your orders
    Show { id: String },
    /// Check out the current cart
    Create {
        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },
    /// Cancel an order that has not shipped
    Cancel { id: String },
    /// Condensed order history
    Summaries,
}

/// Run an `orders` subcommand.
///
/// # Errors
///
/// Returns `CommandError` if the backend call fails.
pub async fn run(
    client: &ApiClient,
    printer: Printer,
    command: OrdersCommand,
) -> Result<(), CommandError> {
    let orders = client.orders();
    match command {
        OrdersCommand::List(filters) => {
            let list = orders.get_user_orders(&filters.into()).await?;
            printer.emit(&list.data, render_order_list)?;
        }
        OrdersCommand::Show { id } => {
            let order = orders.get_order(&OrderId::new(id)).await?;
            printer.emit(&order.data, render_order)?;
        }
        OrdersCommand::Create { address, notes } => {
            let order = CreateOrderDto {
                shipping_address: address,
                notes,
            };
            let created = orders.create_order(&order).await?;
            printer.emit(&created.data, render_order)?;
        }
        OrdersCommand::Cancel { id } => {
            let order = orders.cancel_order(&OrderId::new(id)).await?;
            printer.emit(&order.data, render_order)?;
        }
        OrdersCommand::Summaries => {
            let summaries = orders.get_order_summaries().await?;
            printer.emit(summaries.data.as_slice(), render_order_summaries)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_map_dates() {
        let filters = OrderFilters {
            status: Some(OrderStatus::Pending),
            from: NaiveDate::from_ymd_opt(2026, 10, 1),
            ..OrderFilters::default()
        };
        let query: OrderQuery = filters.into();
        assert_eq!(
            query.to_pairs(),
            vec![
                ("status", "pending".to_owned()),
                ("startDate", "2026-10-01".to_owned()),
            ]
        );
    }
}
