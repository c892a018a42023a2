//! Checkout, order history and admin order management.

use comptoir_core::{
    CreateOrderDto, Order, OrderId, OrderListResponse, OrderQuery, OrderStatus, OrderSummaryDto,
    UpdateOrderStatusDto,
};
use tracing::instrument;

use crate::error::ApiError;
use crate::resource::{ApiResponse, BaseResource, Call, segment};

/// `/orders` endpoints.
#[derive(Debug, Clone)]
pub struct OrderService {
    base: BaseResource,
}

impl OrderService {
    pub(crate) const fn new(base: BaseResource) -> Self {
        Self { base }
    }

    /// Turn the current cart into an order.
    ///
    /// Signed-in users check out through `/orders`; anonymous visitors
    /// through `/orders/anonymous` with their session token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` if the cart is empty or stock ran out.
    #[instrument(skip_all)]
    pub async fn create_order(
        &self,
        order: &CreateOrderDto,
    ) -> Result<ApiResponse<Order>, ApiError> {
        let identity = self.base.session().identity().await?;
        let path = if identity.is_bearer() {
            "/orders"
        } else {
            "/orders/anonymous"
        };
        self.base
            .execute(Call::post(path).json(order)?.identity(identity))
            .await
    }

    /// Orders of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` (401) when not signed in.
    pub async fn get_user_orders(
        &self,
        query: &OrderQuery,
    ) -> Result<ApiResponse<OrderListResponse>, ApiError> {
        self.base
            .execute(Call::get("/orders").query(query.to_pairs()))
            .await
    }

    /// Condensed order history.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` (401) when not signed in.
    pub async fn get_order_summaries(&self) -> Result<ApiResponse<Vec<OrderSummaryDto>>, ApiError> {
        self.base.execute(Call::get("/orders/summaries")).await
    }

    /// One of the signed-in user's orders.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` (404) for an unknown id.
    pub async fn get_order(&self, id: &OrderId) -> Result<ApiResponse<Order>, ApiError> {
        let path = format!("/orders/{}", segment(id.as_str()));
        self.base.execute(Call::get(path)).await
    }

    /// Cancel an order that has not shipped yet.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` if the backend refuses the cancellation.
    #[instrument(skip_all, fields(order_id = %id))]
    pub async fn cancel_order(&self, id: &OrderId) -> Result<ApiResponse<Order>, ApiError> {
        let path = format!("/orders/{}/cancel", segment(id.as_str()));
        self.base.execute(Call::patch(path)).await
    }

    /// Admin: every order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` (403) for non-admins.
    pub async fn get_all_orders(
        &self,
        query: &OrderQuery,
    ) -> Result<ApiResponse<OrderListResponse>, ApiError> {
        self.base
            .execute(Call::get("/orders/admin/all").query(query.to_pairs()))
            .await
    }

    /// Admin: move an order to `status`.
    ///
    /// Transition rules are enforced by the backend.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` for an illegal transition.
    #[instrument(skip_all, fields(order_id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<ApiResponse<Order>, ApiError> {
        let path = format!("/orders/{}/status", segment(id.as_str()));
        self.base
            .execute(Call::patch(path).json(&UpdateOrderStatusDto { status })?)
            .await
    }

    /// Admin: any order by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` (404) for an unknown id.
    pub async fn get_order_by_id(&self, id: &OrderId) -> Result<ApiResponse<Order>, ApiError> {
        let path = format!("/orders/admin/{}", segment(id.as_str()));
        self.base.execute(Call::get(path)).await
    }
}
