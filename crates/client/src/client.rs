use std::sync::Arc;

use comptoir_core::User;
use tracing::info;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::resource::BaseResource;
use crate::services::{
    CartService, CategoryService, DashboardService, OrderService, ProductService, UserService,
};
use crate::session::{Identity, Session};
use crate::store::SessionStore;

/// Entry point to the backend API.
///
/// Aggregates the per-resource services. All of them resolve paths against
/// the same base URL and attach the identity held by one shared session.
///
/// The client is cheap to clone; clones share the connection pool and the
/// session state.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use comptoir_client::{ApiClient, ClientConfig, MemoryStore};
/// use comptoir_core::ProductQuery;
///
/// # async fn demo() -> Result<(), comptoir_client::ApiError> {
/// let client = ApiClient::new(ClientConfig::default(), Arc::new(MemoryStore::new()))?;
/// let page = client.products().get_products(&ProductQuery::default()).await?;
/// println!("{} products", page.data.meta.total);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: BaseResource,
    users: UserService,
    products: ProductService,
    categories: CategoryService,
    cart: CartService,
    orders: OrderService,
    dashboard: DashboardService,
}

impl ApiClient {
    /// Build a client and restore the session persisted in `store`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` or `ApiError::InvalidHeader` for a bad
    /// configuration, and `ApiError::Store` if the store cannot be read.
    pub fn new(config: ClientConfig, store: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        let session = Arc::new(Session::restore(store)?);
        let base = BaseResource::new(config, session)?;
        info!(base_url = %base.base_url(), "API client ready");
        Ok(Self::from_base(base))
    }

    fn from_base(base: BaseResource) -> Self {
        Self {
            users: UserService::new(base.clone()),
            products: ProductService::new(base.clone()),
            categories: CategoryService::new(base.clone()),
            cart: CartService::new(base.clone()),
            orders: OrderService::new(base.clone()),
            dashboard: DashboardService::new(base.clone()),
            base,
        }
    }

    /// A client for another base URL sharing this client's session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if `base_url` is not a valid URL.
    pub fn with_base_url(&self, base_url: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self::from_base(self.base.rebase(base_url)?))
    }

    /// Base URL every path is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base.base_url()
    }

    #[must_use]
    pub const fn users(&self) -> &UserService {
        &self.users
    }

    #[must_use]
    pub const fn products(&self) -> &ProductService {
        &self.products
    }

    #[must_use]
    pub const fn categories(&self) -> &CategoryService {
        &self.categories
    }

    #[must_use]
    pub const fn cart(&self) -> &CartService {
        &self.cart
    }

    #[must_use]
    pub const fn orders(&self) -> &OrderService {
        &self.orders
    }

    #[must_use]
    pub const fn dashboard(&self) -> &DashboardService {
        &self.dashboard
    }

    /// Use `token` as bearer token for subsequent requests.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Store` if the new state cannot be persisted.
    pub async fn set_auth_token(&self, token: impl Into<String>) -> Result<(), ApiError> {
        self.base.session().set_auth_token(token.into()).await
    }

    /// Replace the anonymous session id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Store` if the new state cannot be persisted.
    pub async fn set_session_token(&self, token: Uuid) -> Result<(), ApiError> {
        self.base.session().set_session_token(token).await
    }

    /// Drop the stored credentials without telling the backend.
    ///
    /// Use [`UserService::logout`] for a regular sign-out.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Store` if the new state cannot be persisted.
    pub async fn remove_auth_token(&self) -> Result<(), ApiError> {
        self.base.session().clear_auth().await
    }

    /// The identity the next request will carry.
    ///
    /// Creates the anonymous session id if there is neither a token nor a
    /// session id yet.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Store` if a new session id cannot be persisted.
    pub async fn identity(&self) -> Result<Identity, ApiError> {
        self.base.session().identity().await
    }

    /// Anonymous session id, if one was created.
    pub async fn session_token(&self) -> Option<Uuid> {
        self.base.session().session_token().await
    }

    /// User stored at sign-in.
    pub async fn current_user(&self) -> Option<User> {
        self.base.session().current_user().await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.base.session().is_authenticated().await
    }

    /// Signed in with a user whose role is admin.
    pub async fn is_admin(&self) -> bool {
        self.base.session().is_admin().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;
    use crate::store::{MemoryStore, StoredSession};

    #[tokio::test]
    async fn test_new_restores_persisted_token() {
        let store = Arc::new(MemoryStore::with_state(StoredSession {
            auth_token: Some("abc".to_string()),
            ..StoredSession::default()
        }));
        let client = ApiClient::new(ClientConfig::default(), store).unwrap();

        assert!(client.is_authenticated().await);
        assert!(!client.is_admin().await);
        let Identity::Bearer(token) = client.identity().await.unwrap() else {
            panic!("expected bearer identity");
        };
        assert_eq!(token.expose_secret(), "abc");
    }

    #[tokio::test]
    async fn test_set_and_remove_auth_token() {
        let store = Arc::new(MemoryStore::new());
        let client = ApiClient::new(ClientConfig::default(), store.clone()).unwrap();

        let session = Uuid::new_v4();
        client.set_session_token(session).await.unwrap();
        client.set_auth_token("tok").await.unwrap();
        assert!(client.identity().await.unwrap().is_bearer());
        assert_eq!(store.snapshot().unwrap().auth_token.as_deref(), Some("tok"));

        client.remove_auth_token().await.unwrap();
        assert!(!client.is_authenticated().await);
        let Identity::Session(id) = client.identity().await.unwrap() else {
            panic!("expected session identity");
        };
        assert_eq!(id, session);
        assert_eq!(client.session_token().await, Some(session));
    }

    #[tokio::test]
    async fn test_with_base_url_shares_session() {
        let client = ApiClient::new(ClientConfig::default(), Arc::new(MemoryStore::new())).unwrap();
        let other = client.with_base_url("https://api.boutique.sn").unwrap();
        assert_eq!(other.base_url(), "https://api.boutique.sn");

        other.set_auth_token("shared").await.unwrap();
        assert!(client.is_authenticated().await);
    }
}
