//! Integration tests for the Comptoir client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p comptoir-integration-tests
//! ```
//!
//! Each test spawns a [`TestServer`]: an in-process axum backend bound to
//! an ephemeral port. It answers with canned responses registered per
//! method and path, and records every request so tests can assert on the
//! headers, paths and bodies the client sent.
//!
//! # Test Categories
//!
//! - `identity` - Bearer vs session-token headers and their persistence
//! - `errors` - Mapping of non-2xx responses and transport failures
//! - `endpoints` - Paths, query strings and bodies of every service

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use comptoir_client::{ApiClient, ClientConfig, MemoryStore, SessionStore};
use serde_json::{Value, json};
use url::form_urlencoded;
use uuid::Uuid;

/// Path prefix of the mock API, mirroring the real backend's `/api`.
const API_PREFIX: &str = "/api";

/// A request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    /// Path without the `/api` prefix.
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    /// JSON body, `Value::Null` when empty.
    pub body: Value,
}

impl RecordedRequest {
    /// Value of header `name`, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// The `x-session-token` header parsed as a UUID.
    #[must_use]
    pub fn session_token(&self) -> Option<Uuid> {
        self.header("x-session-token")
            .and_then(|value| value.parse().ok())
    }

    /// Decoded query pairs, in order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query.as_deref().map_or_else(Vec::new, |query| {
            form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect()
        })
    }
}

type StubKey = (Method, String);

#[derive(Clone, Default)]
struct Backend {
    stubs: Arc<Mutex<HashMap<StubKey, (StatusCode, String)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

async fn respond(
    State(backend): State<Backend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let full_path = uri.path().to_owned();
    let path = full_path
        .strip_prefix(API_PREFIX)
        .unwrap_or(&full_path)
        .to_owned();

    backend.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_owned),
        headers,
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    let stub = backend
        .stubs
        .lock()
        .unwrap()
        .get(&(method.clone(), path.clone()))
        .cloned();

    let (status, body) = stub.unwrap_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            json!({
                "statusCode": 404,
                "message": format!("Cannot {method} {full_path}"),
                "error": "Not Found"
            })
            .to_string(),
        )
    });

    (status, [(CONTENT_TYPE, "application/json")], body).into_response()
}

/// In-process mock backend.
pub struct TestServer {
    /// Base URL including the `/api` prefix.
    pub base_url: String,
    backend: Backend,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Bind an ephemeral port and start serving.
    pub async fn spawn() -> Self {
        let backend = Backend::default();
        let app = Router::new().fallback(respond).with_state(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}{API_PREFIX}");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            backend,
            handle,
        }
    }

    /// Answer `method path` with `status` and a raw body.
    pub fn stub_raw(&self, method: Method, path: &str, status: StatusCode, body: &str) {
        self.backend
            .stubs
            .lock()
            .unwrap()
            .insert((method, path.to_owned()), (status, body.to_owned()));
    }

    /// Answer `method path` with `status` and a JSON body.
    pub fn stub(&self, method: Method, path: &str, status: StatusCode, body: &Value) {
        self.stub_raw(method, path, status, &body.to_string());
    }

    /// Answer `method path` with 200 and a JSON body.
    pub fn ok(&self, method: Method, path: &str, body: &Value) {
        self.stub(method, path, StatusCode::OK, body);
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.backend.requests.lock().unwrap().clone()
    }

    /// The most recent request.
    #[must_use]
    pub fn last_request(&self) -> RecordedRequest {
        self.requests()
            .pop()
            .expect("the backend has not received any request")
    }

    /// Client pointed at this server over `store`.
    #[must_use]
    pub fn client_with_store(&self, store: Arc<dyn SessionStore>) -> ApiClient {
        ApiClient::new(ClientConfig::new(&self.base_url), store).expect("valid client config")
    }

    /// Client pointed at this server with a fresh in-memory session.
    #[must_use]
    pub fn client(&self) -> ApiClient {
        self.client_with_store(Arc::new(MemoryStore::new()))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A user record as the backend returns it.
#[must_use]
pub fn user_json(id: &str, role: &str) -> Value {
    json!({
        "id": id,
        "email": format!("{id}@boutique.sn"),
        "firstName": "Awa",
        "lastName": "Diop",
        "role": role,
        "createdAt": "2026-10-01T08:00:00Z"
    })
}

/// A sign-in response carrying `token`.
#[must_use]
pub fn auth_json(token: &str, role: &str) -> Value {
    json!({
        "user": user_json("u-1", role),
        "access_token": token,
        "refreshToken": format!("refresh-{token}")
    })
}

/// A catalogue product.
#[must_use]
pub fn product_json(id: &str, price: u32, stock: i64) -> Value {
    json!({
        "id": id,
        "name": format!("Produit {id}"),
        "description": "",
        "price": price,
        "stockQuantity": stock,
        "isActive": true,
        "categoryId": "c-1"
    })
}

/// A cart line.
#[must_use]
pub fn cart_item_json(id: &str, product_id: &str, quantity: u32) -> Value {
    json!({
        "id": id,
        "quantity": quantity,
        "cartId": "cart-1",
        "productId": product_id
    })
}

/// An order in `status`.
#[must_use]
pub fn order_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "totalAmount": 3000,
        "status": status,
        "userId": "u-1",
        "items": [
            {"id": "oi-1", "quantity": 2, "priceAtTime": 1500, "productId": "p-1"}
        ],
        "createdAt": "2026-10-05T09:00:00Z"
    })
}
