//! Carts for authenticated users and anonymous sessions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Product, User};
use crate::types::{CartId, CartItemId, Price, ProductId, Quantity, UserId};

/// A shopping cart, owned either by a user or by an anonymous session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Box<User>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    /// Session token of the anonymous owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_session: Option<String>,
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Cart {
    /// Whether the cart belongs to an anonymous session.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        self.user_id.is_none() && self.user_session.is_some()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn total_units(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of line totals for lines whose product was embedded.
    ///
    /// `None` if the amounts overflow.
    #[must_use]
    pub fn subtotal(&self) -> Option<Price> {
        self.items
            .iter()
            .filter(|item| item.product.is_some())
            .try_fold(Decimal::ZERO, |sum, item| {
                item.line_total()
                    .and_then(|line| sum.checked_add(line.amount()))
            })
            .map(Price::new)
    }
}

/// One product line of a cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cart_id: Option<CartId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    pub product_id: ProductId,
}

impl CartItem {
    /// Unit price times quantity, when the product is embedded and the
    /// product does not overflow.
    #[must_use]
    pub fn line_total(&self) -> Option<Price> {
        self.product.as_ref().and_then(|product| {
            product
                .price
                .amount()
                .checked_mul(Decimal::from(self.quantity))
                .map(Price::new)
        })
    }
}

/// Body of the add-to-cart call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartDto {
    pub product_id: ProductId,
    pub quantity: Quantity,
}

/// Body of the cart line update call.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UpdateCartItemDto {
    pub quantity: Quantity,
}

/// Aggregate figures for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummaryDto {
    pub total_items: u64,
    pub total_value: Price,
    pub unique_products: u64,
}
