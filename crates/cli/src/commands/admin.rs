//! Admin console commands.
//!
//! # Usage
//!
//! ```bash
//! comptoir admin dashboard
//! comptoir admin set-status <order-id> shipped
//! comptoir admin create-product --name "Bissap 1L" --price 1500 --stock 40
//! comptoir admin set-role <user-id> admin
//! ```
//!
//! Access is enforced by the backend; the console only warns when the
//! stored user is not an admin.

use clap::Subcommand;
use comptoir_client::ApiClient;
use comptoir_core::{
    CategoryId, CategoryUpdate, NewCategory, NewProduct, OrderId, OrderStatus, Price, ProductId,
    ProductUpdate, UserId, UserQuery, UserRole,
};
use rust_decimal::Decimal;
use tracing::warn;

use super::CommandError;
use super::catalog::ProductFilters;
use super::orders::OrderFilters;
use crate::output::{
    Printer, render_category, render_dashboard, render_order, render_order_list,
    render_product, render_product_page, render_user, render_user_page,
};

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Sales and counts
    Dashboard,
    /// Every order
    Orders(OrderFilters),
    /// Any order by id
    Order { id: String },
    /// Move an order to a new status
    SetStatus { id: String, status: OrderStatus },
    /// List users
    Users {
        /// `customer` or `admin`
        #[arg(long)]
        role: Option<UserRole>,

        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        limit: Option<u32>,
    },
    /// Change a user's role
    SetRole { id: String, role: UserRole },
    /// Every product, including inactive ones
    Products(ProductFilters),
    /// Create a product
    CreateProduct {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long)]
        price: Decimal,

        #[arg(long, default_value_t = 0)]
        stock: i64,

        #[arg(long)]
        image_url: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// Create the product hidden from the storefront
        #[arg(long)]
        inactive: bool,
    },
    /// Change product fields
    UpdateProduct {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        price: Option<Decimal>,

        #[arg(long)]
        stock: Option<i64>,

        #[arg(long)]
        image_url: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a product
    DeleteProduct { id: String },
    /// Create a category
    CreateCategory {
        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        inactive: bool,
    },
    /// Change category fields
    UpdateCategory {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a category
    DeleteCategory { id: String },
    /// Flip a category between active and inactive
    ToggleCategory { id: String },
}

/// Run an `admin` subcommand.
///
/// # Errors
///
/// Returns `CommandError` if the backend call fails or an update is empty.
#[allow(clippy::too_many_lines)]
pub async fn run(
    client: &ApiClient,
    printer: Printer,
    command: AdminCommand,
) -> Result<(), CommandError> {
    if !client.is_admin().await {
        warn!("the stored user is not an admin, the backend will likely refuse this command");
    }

    match command {
        AdminCommand::Dashboard => {
            let stats = client.dashboard().get_admin_dashboard().await?;
            printer.emit(&stats.data, render_dashboard)?;
        }
        AdminCommand::Orders(filters) => {
            let list = client.orders().get_all_orders(&filters.into()).await?;
            printer.emit(&list.data, render_order_list)?;
        }
        AdminCommand::Order { id } => {
            let order = client.orders().get_order_by_id(&OrderId::new(id)).await?;
            printer.emit(&order.data, render_order)?;
        }
        AdminCommand::SetStatus { id, status } => {
            let order = client
                .orders()
                .update_order_status(&OrderId::new(id), status)
                .await?;
            printer.emit(&order.data, render_order)?;
        }
        AdminCommand::Users {
            role,
            search,
            page,
            limit,
        } => {
            let query = UserQuery {
                role,
                search,
                page,
                limit,
            };
            let users = client.users().get_all_users(&query).await?;
            printer.emit(&users.data, render_user_page)?;
        }
        AdminCommand::SetRole { id, role } => {
            let user = client
                .users()
                .update_user_role(&UserId::new(id), role)
                .await?;
            printer.emit(&user.data, render_user)?;
        }
        AdminCommand::Products(filters) => {
            let page = client
                .products()
                .get_admin_products(&filters.into())
                .await?;
            printer.emit(&page.data, render_product_page)?;
        }
        AdminCommand::CreateProduct {
            name,
            description,
            price,
            stock,
            image_url,
            category,
            inactive,
        } => {
            let product = NewProduct {
                name,
                description,
                price: Price::new(price),
                stock_quantity: stock,
                image_url,
                is_active: !inactive,
                category_id: category.map(CategoryId::new),
            };
            let created = client.products().create_product(&product).await?;
            printer.emit(&created.data, render_product)?;
        }
        AdminCommand::UpdateProduct {
            id,
            name,
            description,
            price,
            stock,
            image_url,
            category,
            active,
        } => {
            let update = ProductUpdate {
                name,
                description,
                price: price.map(Price::new),
                stock_quantity: stock,
                image_url,
                is_active: active,
                category_id: category.map(CategoryId::new),
            };
            if update.is_empty() {
                return Err(CommandError::InvalidInput("nothing to update".to_owned()));
            }
            let updated = client
                .products()
                .update_product(&ProductId::new(id), &update)
                .await?;
            printer.emit(&updated.data, render_product)?;
        }
        AdminCommand::DeleteProduct { id } => {
            client.products().delete_product(&ProductId::new(id)).await?;
            printer.done("Produit supprimé.");
        }
        AdminCommand::CreateCategory {
            name,
            description,
            inactive,
        } => {
            let category = NewCategory {
                name,
                description,
                is_active: !inactive,
            };
            let created = client.categories().create_category(&category).await?;
            printer.emit(&created.data, render_category)?;
        }
        AdminCommand::UpdateCategory {
            id,
            name,
            description,
            active,
        } => {
            if name.is_none() && description.is_none() && active.is_none() {
                return Err(CommandError::InvalidInput("nothing to update".to_owned()));
            }
            let update = CategoryUpdate {
                name,
                description,
                is_active: active,
            };
            let updated = client
                .categories()
                .update_category(&CategoryId::new(id), &update)
                .await?;
            printer.emit(&updated.data, render_category)?;
        }
        AdminCommand::DeleteCategory { id } => {
            client
                .categories()
                .delete_category(&CategoryId::new(id))
                .await?;
            printer.done("Catégorie supprimée.");
        }
        AdminCommand::ToggleCategory { id } => {
            let category = client
                .categories()
                .toggle_category_status(&CategoryId::new(id))
                .await?;
            printer.emit(&category.data, render_category)?;
        }
    }
    Ok(())
}
