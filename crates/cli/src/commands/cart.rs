//! Cart commands.
//!
//! Without a signed-in user the anonymous cart of the stored session token
//! is used; the token is created on the first cart command.

use clap::Subcommand;
use comptoir_client::ApiClient;
use comptoir_core::{AddToCartDto, CartItemId, ProductId, Quantity, UpdateCartItemDto};

use super::{CommandError, parse_quantity};
use crate::output::{Printer, render_cart, render_cart_item, render_cart_summary};

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Show the cart
    Show,
    /// Add a product
    Add {
        product_id: String,

        #[arg(short, long, default_value = "1", value_parser = parse_quantity)]
        quantity: Quantity,
    },
    /// Change the quantity of a cart line
    Update {
        item_id: String,

        #[arg(value_parser = parse_quantity)]
        quantity: Quantity,
    },
    /// Remove a cart line
    Remove { item_id: String },
    /// Remove every line
    Empty,
    /// Totals only
    Summary,
}

/// Run a `cart` subcommand.
///
/// # Errors
///
/// Returns `CommandError` if the backend call fails.
pub async fn run(
    client: &ApiClient,
    printer: Printer,
    command: CartCommand,
) -> Result<(), CommandError> {
    let cart = client.cart();
    match command {
        CartCommand::Show => {
            let response = cart.get_cart().await?;
            printer.emit(&response.data, render_cart)?;
        }
        CartCommand::Add {
            product_id,
            quantity,
        } => {
            let item = AddToCartDto {
                product_id: ProductId::new(product_id),
                quantity,
            };
            let response = cart.add_to_cart(&item).await?;
            printer.emit(&response.data, render_cart_item)?;
        }
        CartCommand::Update { item_id, quantity } => {
            let response = cart
                .update_cart_item(&CartItemId::new(item_id), &UpdateCartItemDto { quantity })
                .await?;
            printer.emit(&response.data, render_cart_item)?;
        }
        CartCommand::Remove { item_id } => {
            cart.remove_cart_item(&CartItemId::new(item_id)).await?;
            printer.done("Article retiré du panier.");
        }
        CartCommand::Empty => {
            cart.empty_cart().await?;
            printer.done("Panier vidé.");
        }
        CartCommand::Summary => {
            let response = cart.get_cart_summary().await?;
            printer.emit(&response.data, render_cart_summary)?;
        }
    }
    Ok(())
}
