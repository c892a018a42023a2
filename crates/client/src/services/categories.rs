//! Categories: public listing and admin management.

use comptoir_core::{Category, CategoryId, CategoryUpdate, NewCategory};
use tracing::instrument;

use crate::error::ApiError;
use crate::resource::{ApiResponse, BaseResource, Call, segment};

/// `/categories` and `/admin/categories` endpoints.
#[derive(Debug, Clone)]
pub struct CategoryService {
    base: BaseResource,
}

impl CategoryService {
    pub(crate) const fn new(base: BaseResource) -> Self {
        Self { base }
    }

    /// All categories.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn get_categories(&self) -> Result<ApiResponse<Vec<Category>>, ApiError> {
        self.base.execute(Call::get("/categories")).await
    }

    /// Only active categories.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn get_active_categories(&self) -> Result<ApiResponse<Vec<Category>>, ApiError> {
        self.base.execute(Call::get("/categories/active")).await
    }

    /// One category.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` (404) for an unknown id.
    pub async fn get_category(&self, id: &CategoryId) -> Result<ApiResponse<Category>, ApiError> {
        let path = format!("/categories/{}", segment(id.as_str()));
        self.base.execute(Call::get(path)).await
    }

    /// One category with its products embedded.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` (404) for an unknown id.
    pub async fn get_category_with_products(
        &self,
        id: &CategoryId,
    ) -> Result<ApiResponse<Category>, ApiError> {
        let path = format!("/categories/{}/products", segment(id.as_str()));
        self.base.execute(Call::get(path)).await
    }

    /// Admin: create a category.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` on validation failure.
    #[instrument(skip_all, fields(name = %category.name))]
    pub async fn create_category(
        &self,
        category: &NewCategory,
    ) -> Result<ApiResponse<Category>, ApiError> {
        self.base
            .execute(Call::post("/admin/categories").json(category)?)
            .await
    }

    /// Admin: partially update a category.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` for an unknown id.
    #[instrument(skip_all, fields(category_id = %id))]
    pub async fn update_category(
        &self,
        id: &CategoryId,
        update: &CategoryUpdate,
    ) -> Result<ApiResponse<Category>, ApiError> {
        let path = format!("/admin/categories/{}", segment(id.as_str()));
        self.base.execute(Call::patch(path).json(update)?).await
    }

    /// Admin: delete a category.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` for an unknown id.
    #[instrument(skip_all, fields(category_id = %id))]
    pub async fn delete_category(&self, id: &CategoryId) -> Result<ApiResponse<()>, ApiError> {
        let path = format!("/admin/categories/{}", segment(id.as_str()));
        self.base.execute_empty(Call::delete(path)).await
    }

    /// Admin: flip a category between active and inactive.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` for an unknown id.
    #[instrument(skip_all, fields(category_id = %id))]
    pub async fn toggle_category_status(
        &self,
        id: &CategoryId,
    ) -> Result<ApiResponse<Category>, ApiError> {
        let path = format!("/admin/categories/{}/toggle-status", segment(id.as_str()));
        self.base.execute(Call::patch(path)).await
    }
}
