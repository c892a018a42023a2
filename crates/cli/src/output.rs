//! Rendering of backend records for the terminal.
//!
//! Every command prints either a plain-text view (built by the `render_*`
//! functions below) or, with `--json`, the record as pretty JSON.

use std::fmt::Write as _;

use comptoir_core::format::{format_date, format_date_range, format_date_time};
use comptoir_core::{
    AdminDashboardStats, Cart, CartItem, CartSummaryDto, Category, DataListResponse, Order,
    OrderListResponse, OrderSummaryDto, PageMeta, Product, StockLevel, User,
};
use serde::Serialize;

/// Writes command results to stdout.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    json: bool,
}

#[allow(clippy::print_stdout)]
impl Printer {
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    /// Print `value` as JSON, or as text produced by `render`.
    pub fn emit<T: Serialize + ?Sized>(
        self,
        value: &T,
        render: impl FnOnce(&T) -> String,
    ) -> Result<(), serde_json::Error> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", render(value).trim_end());
        }
        Ok(())
    }

    /// Confirmation line for operations without a result body.
    pub fn done(self, message: &str) {
        if self.json {
            println!("{}", serde_json::json!({ "ok": true, "message": message }));
        } else {
            println!("{message}");
        }
    }
}

fn stock_text(product: &Product) -> String {
    if product.in_stock() {
        format!("{} en stock", product.stock_quantity)
    } else {
        "Rupture de stock".to_owned()
    }
}

const fn stock_marker(level: StockLevel) -> &'static str {
    match level {
        StockLevel::High => "+++",
        StockLevel::Medium => "++ ",
        StockLevel::Low => "+  ",
    }
}

fn page_footer(meta: &PageMeta) -> String {
    format!(
        "page {}/{} ({} au total)",
        meta.page, meta.total_pages, meta.total
    )
}

pub fn render_product_row(product: &Product) -> String {
    let inactive = if product.is_active { "" } else { " [inactif]" };
    format!(
        "{:<38} {:<30} {:>16}  {} {}{inactive}",
        product.id,
        product.name,
        product.price.display(),
        stock_marker(product.stock_level()),
        stock_text(product),
    )
}

pub fn render_products(products: &[Product]) -> String {
    if products.is_empty() {
        return "Aucun produit.".to_owned();
    }
    products.iter().fold(String::new(), |mut out, product| {
        let _ = writeln!(out, "{}", render_product_row(product));
        out
    })
}

pub fn render_product_page(page: &DataListResponse<Product>) -> String {
    let mut out = render_products(&page.data);
    let _ = write!(out, "\n{}", page_footer(&page.meta));
    out
}

pub fn render_product(product: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", product.name, product.id);
    let _ = writeln!(out, "Prix: {}", product.price.display());
    let _ = writeln!(out, "Stock: {}", stock_text(product));
    let _ = writeln!(
        out,
        "Statut: {}",
        if product.is_active { "Actif" } else { "Inactif" }
    );
    if let Some(category) = product.category_ref() {
        let _ = writeln!(out, "Catégorie: {category}");
    }
    if let Some(image) = &product.image_url {
        let _ = writeln!(out, "Image: {image}");
    }
    if !product.description.is_empty() {
        let _ = writeln!(out, "\n{}", product.description);
    }
    out
}

pub fn render_categories(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "Aucune catégorie.".to_owned();
    }
    categories.iter().fold(String::new(), |mut out, category| {
        let count = category
            .count()
            .map_or_else(String::new, |n| format!(" ({n} produits)"));
        let inactive = if category.is_active { "" } else { " [inactive]" };
        let _ = writeln!(out, "{:<38} {}{count}{inactive}", category.id, category.name);
        out
    })
}

pub fn render_category(category: &Category) -> String {
    let mut out = render_categories(std::slice::from_ref(category));
    if let Some(description) = &category.description {
        let _ = writeln!(out, "{description}");
    }
    if let Some(products) = &category.products {
        let _ = write!(out, "\n{}", render_products(products));
    }
    out
}

pub fn render_cart_item(item: &CartItem) -> String {
    let name = item
        .product
        .as_ref()
        .map_or_else(|| item.product_id.to_string(), |p| p.name.clone());
    let total = item
        .line_total()
        .map_or_else(String::new, |price| price.display());
    format!("{:<38} {name:<30} x{:<4} {total:>16}", item.id, item.quantity)
}

pub fn render_cart(cart: &Cart) -> String {
    if cart.items.is_empty() {
        return "Votre panier est vide.".to_owned();
    }
    let mut out = cart.items.iter().fold(String::new(), |mut out, item| {
        let _ = writeln!(out, "{}", render_cart_item(item));
        out
    });
    let _ = write!(
        out,
        "\n{} article(s), sous-total {}",
        cart.total_units(),
        cart.subtotal()
            .map_or_else(|| "indisponible".to_owned(), |price| price.display())
    );
    out
}

pub fn render_cart_summary(summary: &CartSummaryDto) -> String {
    format!(
        "{} article(s), {} produit(s) distinct(s), total {}",
        summary.total_items,
        summary.unique_products,
        summary.total_value.display()
    )
}

fn order_row(order: &Order) -> String {
    let date = order
        .created_at
        .as_ref()
        .map_or_else(String::new, format_date);
    format!(
        "{:<38} {:<12} {:>16}  {date}",
        order.id,
        order.status.label(),
        order.total_amount.display()
    )
}

pub fn render_order_list(list: &OrderListResponse) -> String {
    if list.orders.is_empty() {
        return "Aucune commande.".to_owned();
    }
    let mut out = list.orders.iter().fold(String::new(), |mut out, order| {
        let _ = writeln!(out, "{}", order_row(order));
        out
    });
    let dates = list.orders.iter().filter_map(|order| order.created_at.as_ref());
    if let (Some(first), Some(last)) = (dates.clone().min(), dates.max()) {
        let _ = write!(out, "\nPériode: {}", format_date_range(first, last));
    }
    let _ = write!(
        out,
        "\npage {}/{} ({} au total)",
        list.page, list.total_pages, list.total
    );
    out
}

pub fn render_order(order: &Order) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Commande {}", order.id);
    if order.status.is_terminal() {
        let _ = writeln!(out, "Statut: {} (définitif)", order.status.label());
    } else {
        let _ = writeln!(out, "Statut: {}", order.status.label());
    }
    if let Some(created_at) = &order.created_at {
        let _ = writeln!(out, "Date: {}", format_date_time(created_at));
    }
    if let Some(user) = &order.user {
        let _ = writeln!(out, "Client: {}", user.display_name());
    }
    if let Some(address) = &order.shipping_address {
        let _ = writeln!(out, "Livraison: {address}");
    }
    if let Some(notes) = &order.notes {
        let _ = writeln!(out, "Notes: {notes}");
    }
    let _ = writeln!(out);
    for item in &order.items {
        let name = item
            .product
            .as_ref()
            .map_or_else(|| item.product_id.to_string(), |p| p.name.clone());
        let _ = writeln!(
            out,
            "  {name:<30} x{:<4} {:>16}",
            item.quantity,
            item.price_at_time.display()
        );
    }
    let _ = write!(
        out,
        "\n{} article(s), total {}",
        order.total_units(),
        order.total_amount.display()
    );
    out
}

pub fn render_order_summaries(summaries: &[OrderSummaryDto]) -> String {
    if summaries.is_empty() {
        return "Aucune commande.".to_owned();
    }
    summaries.iter().fold(String::new(), |mut out, summary| {
        let _ = writeln!(
            out,
            "{:<38} {:<12} {:>4} article(s) {:>16}  {}",
            summary.id,
            summary.status.label(),
            summary.total_items,
            summary.total_amount.display(),
            format_date(&summary.created_at)
        );
        out
    })
}

pub fn render_user(user: &User) -> String {
    format!(
        "{} <{}> [{}] {}",
        user.display_name(),
        user.email,
        user.role.label(),
        user.id
    )
}

pub fn render_user_page(page: &DataListResponse<User>) -> String {
    if page.is_empty() {
        return "Aucun utilisateur.".to_owned();
    }
    let mut out = page.data.iter().fold(String::new(), |mut out, user| {
        let _ = writeln!(out, "{}", render_user(user));
        out
    });
    let _ = write!(out, "\n{}", page_footer(&page.meta));
    out
}

pub fn render_dashboard(stats: &AdminDashboardStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Chiffre d'affaires: {}", stats.total_sales.display());
    let _ = writeln!(out, "Commandes:          {}", stats.total_orders);
    let _ = writeln!(out, "Produits:           {}", stats.total_products);
    let _ = writeln!(out, "Utilisateurs:       {}", stats.total_users);
    if !stats.recent_orders.is_empty() {
        let _ = writeln!(out, "\nCommandes récentes:");
        for order in &stats.recent_orders {
            let _ = writeln!(
                out,
                "  {:<38} {:<24} {:<12} {:>16}  {}",
                order.id,
                order.customer_name,
                order.status.label(),
                order.total_amount.display(),
                format_date(&order.created_at)
            );
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn product(stock: i64) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": "p-1",
            "name": "Bissap 1L",
            "description": "Jus d'hibiscus",
            "price": 1500,
            "stockQuantity": stock,
            "categoryId": "c-1"
        }))
        .unwrap()
    }

    #[test]
    fn test_product_row_shows_price_and_stock() {
        let row = render_product_row(&product(25));
        assert!(row.contains("Bissap 1L"));
        assert!(row.contains("1 500 FCFA"));
        assert!(row.contains("25 en stock"));
        assert!(row.contains("+++"));
    }

    #[test]
    fn test_out_of_stock_product() {
        let text = render_product(&product(0));
        assert!(text.contains("Rupture de stock"));
        assert!(text.contains("Catégorie: c-1"));
    }

    #[test]
    fn test_empty_cart() {
        let cart: Cart = serde_json::from_value(serde_json::json!({
            "id": "cart-1",
            "userSession": "s-1",
            "items": []
        }))
        .unwrap();
        assert_eq!(render_cart(&cart), "Votre panier est vide.");
    }

    #[test]
    fn test_cart_subtotal() {
        let cart: Cart = serde_json::from_value(serde_json::json!({
            "id": "cart-1",
            "items": [
                {"id": "i-1", "quantity": 2, "productId": "p-1", "product": {"id": "p-1", "name": "Bissap 1L", "price": 1500}}
            ]
        }))
        .unwrap();
        let text = render_cart(&cart);
        assert!(text.contains("x2"));
        assert!(text.contains("2 article(s), sous-total 3 000 FCFA"));
    }

    #[test]
    fn test_order_summaries_use_french_labels() {
        let summaries: Vec<OrderSummaryDto> = serde_json::from_value(serde_json::json!([
            {"id": "o-1", "totalAmount": 4500, "status": "shipped", "totalItems": 3, "createdAt": "2026-10-05T09:00:00Z"}
        ]))
        .unwrap();
        let text = render_order_summaries(&summaries);
        assert!(text.contains("Expédiée"));
        assert!(text.contains("05/10/2026"));
    }

    #[test]
    fn test_order_list_shows_period_and_final_status() {
        let list: OrderListResponse = serde_json::from_value(serde_json::json!({
            "orders": [
                {"id": "o-2", "totalAmount": 1500, "status": "delivered", "createdAt": "2026-10-12T10:00:00Z"},
                {"id": "o-1", "totalAmount": 3000, "status": "pending", "createdAt": "2026-10-01T08:00:00Z"}
            ],
            "total": 2, "page": 1, "totalPages": 1
        }))
        .unwrap();

        let text = render_order_list(&list);
        assert!(text.contains("Période: 01/10/2026 - 12/10/2026"));

        assert!(render_order(&list.orders[0]).contains("Statut: Livrée (définitif)"));
        assert!(render_order(&list.orders[1]).contains("Statut: En attente\n"));
    }

    #[test]
    fn test_cart_subtotal_overflow_is_reported() {
        let cart: Cart = serde_json::from_value(serde_json::json!({
            "id": "cart-1",
            "items": [
                {"id": "i-1", "quantity": 4_000_000_000_u32, "productId": "p-1",
                 "product": {"id": "p-1", "name": "Lot", "price": "79000000000000000000000000000"}}
            ]
        }))
        .unwrap();
        assert!(render_cart(&cart).contains("sous-total indisponible"));
    }
}
