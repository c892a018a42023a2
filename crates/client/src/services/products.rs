//! Catalogue browsing and admin product management.

use comptoir_core::{
    CategoryId, DataListResponse, NewProduct, Product, ProductId, ProductQuery, ProductUpdate,
};
use tracing::instrument;

use crate::error::ApiError;
use crate::resource::{ApiResponse, BaseResource, Call, segment};

/// `/catalogue` endpoints.
#[derive(Debug, Clone)]
pub struct ProductService {
    base: BaseResource,
}

impl ProductService {
    pub(crate) const fn new(base: BaseResource) -> Self {
        Self { base }
    }

    /// Paginated, filtered product listing.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn get_products(
        &self,
        query: &ProductQuery,
    ) -> Result<ApiResponse<DataListResponse<Product>>, ApiError> {
        self.base
            .execute(Call::get("/catalogue").query(query.to_pairs()))
            .await
    }

    /// A single product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` (404) for an unknown id.
    pub async fn get_product(&self, id: &ProductId) -> Result<ApiResponse<Product>, ApiError> {
        let path = format!("/catalogue/{}", segment(id.as_str()));
        self.base.execute(Call::get(path)).await
    }

    /// Full-text search.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn search_products(&self, q: &str) -> Result<ApiResponse<Vec<Product>>, ApiError> {
        self.base
            .execute(Call::get("/catalogue/search").query(vec![("q", q.to_owned())]))
            .await
    }

    /// Products of one category.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn get_products_by_category(
        &self,
        category_id: &CategoryId,
    ) -> Result<ApiResponse<Vec<Product>>, ApiError> {
        let path = format!("/catalogue/category/{}", segment(category_id.as_str()));
        self.base.execute(Call::get(path)).await
    }

    /// Admin: create a product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the validation messages on bad input.
    #[instrument(skip_all, fields(name = %product.name))]
    pub async fn create_product(
        &self,
        product: &NewProduct,
    ) -> Result<ApiResponse<Product>, ApiError> {
        self.base
            .execute(Call::post("/catalogue/admin/products").json(product)?)
            .await
    }

    /// Admin: partially update a product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` for an unknown id or invalid fields.
    #[instrument(skip_all, fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        update: &ProductUpdate,
    ) -> Result<ApiResponse<Product>, ApiError> {
        let path = format!("/catalogue/admin/{}", segment(id.as_str()));
        self.base.execute(Call::patch(path).json(update)?).await
    }

    /// Admin: delete a product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` for an unknown id.
    #[instrument(skip_all, fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<ApiResponse<()>, ApiError> {
        let path = format!("/catalogue/admin/{}", segment(id.as_str()));
        self.base.execute_empty(Call::delete(path)).await
    }

    /// Admin: product listing including inactive products.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn get_admin_products(
        &self,
        query: &ProductQuery,
    ) -> Result<ApiResponse<DataListResponse<Product>>, ApiError> {
        self.base
            .execute(Call::get("/catalogue/admin/products").query(query.to_pairs()))
            .await
    }
}
