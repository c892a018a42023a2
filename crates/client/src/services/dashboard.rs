use comptoir_core::AdminDashboardStats;

use crate::error::ApiError;
use crate::resource::{ApiResponse, BaseResource, Call};

/// Admin dashboard statistics.
#[derive(Debug, Clone)]
pub struct DashboardService {
    base: BaseResource,
}

impl DashboardService {
    pub(crate) const fn new(base: BaseResource) -> Self {
        Self { base }
    }

    /// Sales, counts and the most recent orders.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` (401/403) for non-admins.
    pub async fn get_admin_dashboard(&self) -> Result<ApiResponse<AdminDashboardStats>, ApiError> {
        self.base
            .execute(Call::get("/catalogue/admin/dashboard"))
            .await
    }
}
