//! Catalogue browsing: products and categories.

use clap::{Args, Subcommand};
use comptoir_client::ApiClient;
use comptoir_core::{CategoryId, Price, ProductId, ProductQuery, ProductSortBy, SortOrder};
use rust_decimal::Decimal;

use super::CommandError;
use crate::output::{
    Printer, render_categories, render_category, render_product, render_product_page,
    render_products,
};

/// Listing filters shared by the storefront and admin product lists.
#[derive(Debug, Clone, Default, Args)]
pub struct ProductFilters {
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub search: Option<String>,

    #[arg(long)]
    pub min_price: Option<Decimal>,

    #[arg(long)]
    pub max_price: Option<Decimal>,

    /// `name`, `price` or `createdAt`
    #[arg(long)]
    pub sort_by: Option<ProductSortBy>,

    /// `asc` or `desc`
    #[arg(long)]
    pub sort_order: Option<SortOrder>,

    #[arg(long)]
    pub page: Option<u32>,

    #[arg(long)]
    pub limit: Option<u32>,
}

impl From<ProductFilters> for ProductQuery {
    fn from(filters: ProductFilters) -> Self {
        Self {
            category_id: filters.category.map(CategoryId::new),
            search: filters.search,
            min_price: filters.min_price.map(Price::new),
            max_price: filters.max_price.map(Price::new),
            sort_by: filters.sort_by,
            sort_order: filters.sort_order,
            page: filters.page,
            limit: filters.limit,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// List products
    List(ProductFilters),
    /// Show one product
    Show { id: String },
    /// Full-text search
    Search { query: String },
    /// Products of one category
    ByCategory { category_id: String },
}

#[derive(Debug, Subcommand)]
pub enum CategoriesCommand {
    /// List categories
    List {
        /// Only active categories
        #[arg(long)]
        active: bool,
    },
    /// Show one category
    Show {
        id: String,

        /// Include the category's products
        #[arg(long)]
        products: bool,
    },
}

/// Run a `products` subcommand.
///
/// # Errors
///
/// Returns `CommandError` if the backend call fails.
pub async fn run_products(
    client: &ApiClient,
    printer: Printer,
    command: ProductsCommand,
) -> Result<(), CommandError> {
    let products = client.products();
    match command {
        ProductsCommand::List(filters) => {
            let page = products.get_products(&filters.into()).await?;
            printer.emit(&page.data, render_product_page)?;
        }
        ProductsCommand::Show { id } => {
            let product = products.get_product(&ProductId::new(id)).await?;
            printer.emit(&product.data, render_product)?;
        }
        ProductsCommand::Search { query } => {
            let found = products.search_products(&query).await?;
            printer.emit(found.data.as_slice(), render_products)?;
        }
        ProductsCommand::ByCategory { category_id } => {
            let found = products
                .get_products_by_category(&CategoryId::new(category_id))
                .await?;
            printer.emit(found.data.as_slice(), render_products)?;
        }
    }
    Ok(())
}

/// Run a `categories` subcommand.
///
/// # Errors
///
/// Returns `CommandError` if the backend call fails.
pub async fn run_categories(
    client: &ApiClient,
    printer: Printer,
    command: CategoriesCommand,
) -> Result<(), CommandError> {
    let categories = client.categories();
    match command {
        CategoriesCommand::List { active } => {
            let list = if active {
                categories.get_active_categories().await?
            } else {
                categories.get_categories().await?
            };
            printer.emit(list.data.as_slice(), render_categories)?;
        }
        CategoriesCommand::Show { id, products } => {
            let id = CategoryId::new(id);
            let category = if products {
                categories.get_category_with_products(&id).await?
            } else {
                categories.get_category(&id).await?
            };
            printer.emit(&category.data, render_category)?;
        }
    }
    Ok(())
}
