//! Admin dashboard statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{OrderId, OrderStatus, Price};

/// Headline figures for the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboardStats {
    pub total_sales: Price,
    pub total_orders: u64,
    pub total_products: u64,
    pub total_users: u64,
    #[serde(default)]
    pub recent_orders: Vec<DashboardRecentOrder>,
}

/// A recent order row on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardRecentOrder {
    pub id: OrderId,
    pub total_amount: Price,
    pub status: OrderStatus,
    pub customer_name: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_decodes() {
        let json = r#"{
            "totalSales": 1250000,
            "totalOrders": 42,
            "totalProducts": 18,
            "totalUsers": 7,
            "recentOrders": [{
                "id": "o9",
                "totalAmount": 699,
                "status": "pending",
                "customerName": "Awa Diop",
                "createdAt": "2026-10-14T17:30:00Z"
            }]
        }"#;
        let stats: AdminDashboardStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.total_sales.display(), "1 250 000 FCFA");
        assert_eq!(stats.recent_orders.len(), 1);
    }
}
