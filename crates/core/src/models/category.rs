//! Product categories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Product;
use crate::types::CategoryId;

/// A grouping of products.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    /// Present on the `/categories/:id/products` response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Product>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Category {
    /// Product count, from the explicit counter or the embedded product list.
    #[must_use]
    pub fn count(&self) -> Option<u64> {
        self.product_count.or_else(|| {
            self.products
                .as_ref()
                .and_then(|products| u64::try_from(products.len()).ok())
        })
    }
}

/// Payload for creating a category.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
}

/// Partial category update; only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_count_prefers_explicit_counter() {
        let category: Category =
            serde_json::from_str(r#"{"id": "c1", "name": "Audio", "isActive": true, "productCount": 7}"#)
                .unwrap();
        assert_eq!(category.count(), Some(7));
    }

    #[test]
    fn test_count_falls_back_to_products() {
        let category: Category = serde_json::from_str(
            r#"{"id": "c1", "name": "Audio", "isActive": true,
                "products": [{"id": "p1", "name": "Casque", "price": 89}]}"#,
        )
        .unwrap();
        assert_eq!(category.count(), Some(1));
    }

    #[test]
    fn test_count_unknown() {
        let category: Category =
            serde_json::from_str(r#"{"id": "c1", "name": "Audio"}"#).unwrap();
        assert_eq!(category.count(), None);
        assert!(!category.is_active);
    }
}
