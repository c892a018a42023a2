//! Shopping cart.
//!
//! The backend exposes the same cart operations twice: under `/cart` for
//! signed-in users and under `/cart/anonymous` for session-token visitors.
//! Each call resolves the identity once, picks the matching prefix and
//! sends that same identity, so a path never disagrees with its header.

use comptoir_core::{AddToCartDto, Cart, CartItem, CartItemId, CartSummaryDto, UpdateCartItemDto};
use tracing::instrument;

use crate::error::ApiError;
use crate::resource::{ApiResponse, BaseResource, Call, segment};
use crate::session::Identity;

/// Which cart endpoints a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartScope {
    /// `/cart...`, owned by the signed-in user.
    User,
    /// `/cart/anonymous...`, owned by the session token.
    Anonymous,
}

impl CartScope {
    /// Scope matching `identity`.
    #[must_use]
    pub const fn for_identity(identity: &Identity) -> Self {
        match identity {
            Identity::Bearer(_) => Self::User,
            Identity::Session(_) => Self::Anonymous,
        }
    }

    const fn prefix(self) -> &'static str {
        match self {
            Self::User => "/cart",
            Self::Anonymous => "/cart/anonymous",
        }
    }

    fn path(self, suffix: &str) -> String {
        format!("{}{suffix}", self.prefix())
    }
}

/// `/cart` and `/cart/anonymous` endpoints.
#[derive(Debug, Clone)]
pub struct CartService {
    base: BaseResource,
}

impl CartService {
    pub(crate) const fn new(base: BaseResource) -> Self {
        Self { base }
    }

    async fn scoped(&self) -> Result<(CartScope, Identity), ApiError> {
        let identity = self.base.session().identity().await?;
        Ok((CartScope::for_identity(&identity), identity))
    }

    /// The current cart.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn get_cart(&self) -> Result<ApiResponse<Cart>, ApiError> {
        let (scope, identity) = self.scoped().await?;
        self.base
            .execute(Call::get(scope.path("")).identity(identity))
            .await
    }

    /// Add a product; the backend merges with an existing line.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` for an unknown product or insufficient
    /// stock.
    #[instrument(skip_all, fields(product_id = %item.product_id, quantity = item.quantity.get()))]
    pub async fn add_to_cart(&self, item: &AddToCartDto) -> Result<ApiResponse<CartItem>, ApiError> {
        let (scope, identity) = self.scoped().await?;
        self.base
            .execute(Call::post(scope.path("/add")).json(item)?.identity(identity))
            .await
    }

    /// Change the quantity of a cart line.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` for an unknown line.
    #[instrument(skip_all, fields(item_id = %id))]
    pub async fn update_cart_item(
        &self,
        id: &CartItemId,
        update: &UpdateCartItemDto,
    ) -> Result<ApiResponse<CartItem>, ApiError> {
        let (scope, identity) = self.scoped().await?;
        let path = scope.path(&format!("/{}/update", segment(id.as_str())));
        self.base
            .execute(Call::patch(path).json(update)?.identity(identity))
            .await
    }

    /// Remove a cart line.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` for an unknown line.
    #[instrument(skip_all, fields(item_id = %id))]
    pub async fn remove_cart_item(&self, id: &CartItemId) -> Result<ApiResponse<()>, ApiError> {
        let (scope, identity) = self.scoped().await?;
        let path = scope.path(&format!("/remove/{}", segment(id.as_str())));
        self.base
            .execute_empty(Call::delete(path).identity(identity))
            .await
    }

    /// Remove every line.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn empty_cart(&self) -> Result<ApiResponse<()>, ApiError> {
        let (scope, identity) = self.scoped().await?;
        self.base
            .execute_empty(Call::delete(scope.path("/empty")).identity(identity))
            .await
    }

    /// Unit count, value and distinct products.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn get_cart_summary(&self) -> Result<ApiResponse<CartSummaryDto>, ApiError> {
        let (scope, identity) = self.scoped().await?;
        self.base
            .execute(Call::get(scope.path("/summary")).identity(identity))
            .await
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_scope_follows_identity() {
        let bearer = Identity::Bearer(SecretString::from("abc"));
        let session = Identity::Session(Uuid::new_v4());
        assert_eq!(CartScope::for_identity(&bearer), CartScope::User);
        assert_eq!(CartScope::for_identity(&session), CartScope::Anonymous);
    }

    #[test]
    fn test_scope_paths() {
        assert_eq!(CartScope::User.path(""), "/cart");
        assert_eq!(CartScope::User.path("/remove/i1"), "/cart/remove/i1");
        assert_eq!(CartScope::Anonymous.path("/add"), "/cart/anonymous/add");
        assert_eq!(
            CartScope::Anonymous.path("/i1/update"),
            "/cart/anonymous/i1/update"
        );
    }
}
