//! Integration tests for the identity contract.
//!
//! Every request carries exactly one identity header: `Authorization:
//! Bearer` while an access token is stored, otherwise `x-session-token`
//! with a UUID that is created once and persisted.
//!
//! Run with: cargo test -p comptoir-integration-tests --test identity

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use comptoir_client::{FileStore, Identity, MemoryStore, SessionStore};
use comptoir_core::{AddToCartDto, Email, LoginDto, ProductId, Quantity, UserRole};
use comptoir_integration_tests::{TestServer, auth_json, cart_item_json, user_json};
use serde_json::json;
use uuid::Uuid;

fn credentials() -> LoginDto {
    LoginDto {
        email: Email::parse("awa@boutique.sn").unwrap(),
        password: "motdepasse".to_owned(),
    }
}

fn add_one(product: &str) -> AddToCartDto {
    AddToCartDto {
        product_id: ProductId::new(product),
        quantity: Quantity::ONE,
    }
}

// ============================================================================
// Session token
// ============================================================================

#[tokio::test]
async fn test_first_cart_add_creates_and_persists_session_token() {
    let server = TestServer::spawn().await;
    server.ok(
        Method::POST,
        "/cart/anonymous/add",
        &cart_item_json("ci-1", "p-1", 1),
    );
    let store = Arc::new(MemoryStore::new());
    let client = server.client_with_store(store.clone());

    assert!(store.snapshot().unwrap().session_token.is_none());

    client.cart().add_to_cart(&add_one("p-1")).await.unwrap();

    let request = server.last_request();
    let sent = request.session_token().expect("session header must be a UUID");
    assert!(request.header("authorization").is_none());
    assert_eq!(store.snapshot().unwrap().session_token, Some(sent));
}

#[tokio::test]
async fn test_session_token_is_stable_across_calls() {
    let server = TestServer::spawn().await;
    server.ok(Method::GET, "/cart/anonymous", &json!({"id": "cart-1", "items": []}));
    let client = server.client();

    client.cart().get_cart().await.unwrap();
    client.cart().get_cart().await.unwrap();
    let _ = client.categories().get_categories().await;

    let tokens: Vec<Uuid> = server
        .requests()
        .iter()
        .map(|r| r.session_token().unwrap())
        .collect();
    assert_eq!(tokens.len(), 3);
    assert!(tokens.iter().all(|t| *t == tokens[0]));
}

#[tokio::test]
async fn test_session_token_survives_restart_with_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let server = TestServer::spawn().await;
    server.ok(Method::GET, "/cart/anonymous", &json!({"id": "cart-1", "items": []}));

    let first = server.client_with_store(Arc::new(FileStore::new(&path)));
    first.cart().get_cart().await.unwrap();
    let token = server.last_request().session_token().unwrap();
    drop(first);

    let second = server.client_with_store(Arc::new(FileStore::new(&path)));
    assert_eq!(second.session_token().await, Some(token));
    second.cart().get_cart().await.unwrap();
    assert_eq!(server.last_request().session_token(), Some(token));
}

#[tokio::test]
async fn test_clients_sharing_a_store_share_the_session() {
    let server = TestServer::spawn().await;
    server.ok(Method::GET, "/cart/anonymous", &json!({"id": "cart-1", "items": []}));
    let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::new());

    let first = server.client_with_store(store.clone());
    first.cart().get_cart().await.unwrap();

    let second = server.client_with_store(store);
    second.cart().get_cart().await.unwrap();

    let requests = server.requests();
    assert_eq!(requests[0].session_token(), requests[1].session_token());
}

#[tokio::test]
async fn test_concurrent_first_requests_agree_on_one_token() {
    let server = TestServer::spawn().await;
    server.ok(Method::GET, "/cart/anonymous", &json!({"id": "cart-1", "items": []}));
    let client = server.client();

    let calls = (0..6).map(|_| {
        let client = client.clone();
        tokio::spawn(async move { client.cart().get_cart().await.map(|_| ()) })
    });
    for call in calls {
        call.await.unwrap().unwrap();
    }

    let requests = server.requests();
    assert_eq!(requests.len(), 6);
    let first = requests[0].session_token();
    assert!(first.is_some());
    assert!(requests.iter().all(|r| r.session_token() == first));
}

#[tokio::test]
async fn test_explicit_session_token_is_sent() {
    let server = TestServer::spawn().await;
    server.ok(Method::GET, "/cart/anonymous", &json!({"id": "cart-1", "items": []}));
    let client = server.client();
    let token = Uuid::new_v4();

    client.set_session_token(token).await.unwrap();
    client.cart().get_cart().await.unwrap();

    assert_eq!(server.last_request().session_token(), Some(token));
}

// ============================================================================
// Bearer token
// ============================================================================

#[tokio::test]
async fn test_profile_with_token_sends_only_bearer() {
    let server = TestServer::spawn().await;
    server.ok(Method::GET, "/auth/profile", &user_json("u-1", "customer"));
    let client = server.client();

    client.set_auth_token("abc").await.unwrap();
    let profile = client.users().get_profile().await.unwrap();

    assert_eq!(profile.data.id.to_string(), "u-1");
    let request = server.last_request();
    assert_eq!(request.header("authorization"), Some("Bearer abc"));
    assert!(request.header("x-session-token").is_none());
}

#[tokio::test]
async fn test_empty_auth_token_keeps_anonymous_cart() {
    let server = TestServer::spawn().await;
    server.ok(Method::GET, "/cart/anonymous", &json!({"id": "cart-1", "items": []}));
    let client = server.client();

    client.set_auth_token("").await.unwrap();
    client.cart().get_cart().await.unwrap();

    let request = server.last_request();
    assert_eq!(request.path, "/cart/anonymous");
    assert!(request.header("authorization").is_none());
    assert!(request.session_token().is_some());
    assert!(!client.is_authenticated().await);
}

#[tokio::test]
async fn test_login_stores_credentials_and_switches_to_bearer() {
    let server = TestServer::spawn().await;
    server.ok(Method::POST, "/auth/signin", &auth_json("jwt-1", "admin"));
    server.ok(Method::GET, "/auth/profile", &user_json("u-1", "admin"));
    let store = Arc::new(MemoryStore::new());
    let client = server.client_with_store(store.clone());

    let response = client.users().login(&credentials()).await.unwrap();
    assert_eq!(response.data.access_token, "jwt-1");

    let signin = server.last_request();
    assert_eq!(
        signin.body,
        json!({"email": "awa@boutique.sn", "password": "motdepasse"})
    );

    assert!(client.is_authenticated().await);
    assert!(client.is_admin().await);
    assert_eq!(
        client.current_user().await.map(|u| u.role),
        Some(UserRole::Admin)
    );
    let saved = store.snapshot().unwrap();
    assert!(saved.auth_token.is_some());
    assert!(saved.refresh_token.is_some());

    client.users().get_profile().await.unwrap();
    let profile = server.last_request();
    assert_eq!(profile.header("authorization"), Some("Bearer jwt-1"));
    assert!(profile.header("x-session-token").is_none());
}

#[tokio::test]
async fn test_failed_login_keeps_anonymous_identity() {
    let server = TestServer::spawn().await;
    server.stub(
        Method::POST,
        "/auth/signin",
        StatusCode::UNAUTHORIZED,
        &json!({"statusCode": 401, "message": "Invalid credentials"}),
    );
    let client = server.client();

    let error = client.users().login(&credentials()).await.unwrap_err();

    assert!(error.is_unauthorized());
    assert_eq!(error.to_string(), "Invalid credentials");
    assert!(!client.is_authenticated().await);
    assert!(matches!(
        client.identity().await.unwrap(),
        Identity::Session(_)
    ));
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn test_logout_reverts_to_the_same_session_token() {
    let server = TestServer::spawn().await;
    server.ok(Method::GET, "/cart/anonymous", &json!({"id": "cart-1", "items": []}));
    server.ok(Method::POST, "/auth/signin", &auth_json("jwt-1", "customer"));
    server.stub_raw(Method::POST, "/auth/logout", StatusCode::CREATED, "");
    let client = server.client();

    client.cart().get_cart().await.unwrap();
    let anonymous = server.last_request().session_token().unwrap();

    client.users().login(&credentials()).await.unwrap();
    client.users().logout().await.unwrap();

    let logout = server.last_request();
    assert_eq!(logout.path, "/auth/logout");
    assert_eq!(logout.header("authorization"), Some("Bearer jwt-1"));

    assert!(!client.is_authenticated().await);
    assert!(client.current_user().await.is_none());

    client.cart().get_cart().await.unwrap();
    let after = server.last_request();
    assert!(after.header("authorization").is_none());
    assert_eq!(after.session_token(), Some(anonymous));
}

#[tokio::test]
async fn test_logout_clears_credentials_when_backend_fails() {
    let server = TestServer::spawn().await;
    server.stub(
        Method::POST,
        "/auth/logout",
        StatusCode::INTERNAL_SERVER_ERROR,
        &json!({"message": "boom"}),
    );
    let store = Arc::new(MemoryStore::new());
    let client = server.client_with_store(store.clone());
    client.set_auth_token("stale").await.unwrap();

    client.users().logout().await.unwrap();

    assert!(!client.is_authenticated().await);
    assert!(store.snapshot().unwrap().auth_token.is_none());
}

#[tokio::test]
async fn test_remove_auth_token_reverts_to_session() {
    let server = TestServer::spawn().await;
    let client = server.client();
    let before = match client.identity().await.unwrap() {
        Identity::Session(token) => token,
        Identity::Bearer(_) => panic!("fresh client must be anonymous"),
    };

    client.set_auth_token("abc").await.unwrap();
    assert!(client.identity().await.unwrap().is_bearer());

    client.remove_auth_token().await.unwrap();
    assert!(matches!(
        client.identity().await.unwrap(),
        Identity::Session(token) if token == before
    ));
}

// ============================================================================
// Refresh
// ============================================================================

#[tokio::test]
async fn test_refresh_without_stored_token_fails_locally() {
    let server = TestServer::spawn().await;
    let client = server.client();

    let error = client.users().refresh_token().await.unwrap_err();

    assert!(matches!(
        error,
        comptoir_client::ApiError::NotAuthenticated(_)
    ));
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_refresh_exchanges_stored_refresh_token() {
    let server = TestServer::spawn().await;
    server.ok(Method::POST, "/auth/signin", &auth_json("jwt-1", "customer"));
    server.ok(Method::POST, "/auth/refresh", &auth_json("jwt-2", "customer"));
    server.ok(Method::GET, "/auth/profile", &user_json("u-1", "customer"));
    let client = server.client();

    client.users().login(&credentials()).await.unwrap();
    client.users().refresh_token().await.unwrap();

    let refresh = server.last_request();
    assert_eq!(refresh.body, json!({"refreshToken": "refresh-jwt-1"}));

    client.users().get_profile().await.unwrap();
    assert_eq!(
        server.last_request().header("authorization"),
        Some("Bearer jwt-2")
    );
}
