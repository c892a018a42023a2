//! Catalogue products and listing filters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::push_pair;
use crate::types::{CategoryId, Price, ProductId, StockLevel};

/// A catalogue item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Category reference as sent by the listing endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

const fn default_true() -> bool {
    true
}

impl Product {
    /// The category this product belongs to, whichever key carried it.
    #[must_use]
    pub fn category_ref(&self) -> Option<&CategoryId> {
        self.category_id.as_ref().or(self.category.as_ref())
    }

    /// Stock availability bucket.
    #[must_use]
    pub const fn stock_level(&self) -> StockLevel {
        StockLevel::from_quantity(self.stock_quantity)
    }

    /// Whether at least one unit can be ordered.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}

/// Payload for creating a product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub stock_quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

/// Partial product update; only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

impl ProductUpdate {
    /// Whether no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock_quantity.is_none()
            && self.image_url.is_none()
            && self.is_active.is_none()
            && self.category_id.is_none()
    }
}

/// Sort key for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProductSortBy {
    Name,
    Price,
    CreatedAt,
}

impl std::fmt::Display for ProductSortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Price => "price",
            Self::CreatedAt => "createdAt",
        })
    }
}

impl std::str::FromStr for ProductSortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "price" => Ok(Self::Price),
            "createdAt" | "created_at" => Ok(Self::CreatedAt),
            _ => Err(format!("invalid sort key: {s}")),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        })
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(format!("invalid sort order: {s}")),
        }
    }
}

/// Filters for product listings (storefront and admin).
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub category_id: Option<CategoryId>,
    pub search: Option<String>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
    pub sort_by: Option<ProductSortBy>,
    pub sort_order: Option<SortOrder>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ProductQuery {
    /// Query-string pairs for the fields that are set.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_pair(&mut pairs, "categoryId", self.category_id.as_ref());
        push_pair(&mut pairs, "search", self.search.as_ref());
        push_pair(
            &mut pairs,
            "minPrice",
            self.min_price.map(|p| p.amount().normalize()).as_ref(),
        );
        push_pair(
            &mut pairs,
            "maxPrice",
            self.max_price.map(|p| p.amount().normalize()).as_ref(),
        );
        push_pair(&mut pairs, "sortBy", self.sort_by.as_ref());
        push_pair(&mut pairs, "sortOrder", self.sort_order.as_ref());
        push_pair(&mut pairs, "page", self.page.as_ref());
        push_pair(&mut pairs, "limit", self.limit.as_ref());
        pairs
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_decodes_backend_shape() {
        let json = r#"{
            "id": "p1",
            "name": "Casque Bluetooth",
            "description": "Son immersif",
            "price": 89,
            "stockQuantity": 15,
            "isActive": true,
            "categoryId": "c2",
            "createdAt": "2026-10-01T08:00:00.000Z",
            "cartItems": []
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, Price::from_units(89));
        assert_eq!(product.category_ref().map(CategoryId::as_str), Some("c2"));
        assert_eq!(product.stock_level(), StockLevel::Medium);
        assert!(product.in_stock());
    }

    #[test]
    fn test_product_query_pairs() {
        let query = ProductQuery {
            search: Some("casque".to_string()),
            min_price: Some(Price::from_units(10)),
            sort_by: Some(ProductSortBy::CreatedAt),
            sort_order: Some(SortOrder::Desc),
            limit: Some(12),
            ..ProductQuery::default()
        };
        assert_eq!(
            query.to_pairs(),
            vec![
                ("search", "casque".to_string()),
                ("minPrice", "10".to_string()),
                ("sortBy", "createdAt".to_string()),
                ("sortOrder", "desc".to_string()),
                ("limit", "12".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_query_has_no_pairs() {
        assert!(ProductQuery::default().to_pairs().is_empty());
    }

    #[test]
    fn test_product_update_only_sends_set_fields() {
        let update = ProductUpdate {
            stock_quantity: Some(4),
            is_active: Some(false),
            ..ProductUpdate::default()
        };
        assert!(!update.is_empty());
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"stockQuantity": 4, "isActive": false}));
    }
}
