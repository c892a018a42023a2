//! Orders, order history filters and status updates.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Product, User, push_pair};
use crate::types::{OrderId, OrderItemId, OrderStatus, Price, ProductId, UserId};

/// An order: an immutable snapshot of cart lines at purchase time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub total_amount: Price,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Box<User>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Total number of units ordered.
    #[must_use]
    pub fn total_units(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

/// One line of an order, priced as it was when the order was placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub quantity: u32,
    pub price_at_time: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    pub product_id: ProductId,
}

/// Checkout form.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of the admin status change call.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UpdateOrderStatusDto {
    pub status: OrderStatus,
}

/// Condensed order row for the customer's order history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummaryDto {
    pub id: OrderId,
    pub total_amount: Price,
    pub status: OrderStatus,
    pub total_items: u64,
    pub created_at: DateTime<Utc>,
}

/// Filters for order listings (customer and admin).
#[derive(Debug, Clone, Default)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl OrderQuery {
    /// Query-string pairs for the fields that are set.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_pair(&mut pairs, "status", self.status.as_ref());
        push_pair(&mut pairs, "startDate", self.start_date.as_ref());
        push_pair(&mut pairs, "endDate", self.end_date.as_ref());
        push_pair(&mut pairs, "page", self.page.as_ref());
        push_pair(&mut pairs, "limit", self.limit.as_ref());
        pairs
    }
}

/// Page of orders as returned by `/orders` and `/orders/admin/all`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListResponse {
    #[serde(default)]
    pub orders: Vec<Order>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
}
