//! Request building and response handling shared by every service.
//!
//! Every call goes through [`BaseResource::execute`] (or
//! [`BaseResource::execute_empty`] for endpoints without a meaningful body):
//! build `base + path + query`, attach the single identity header, send,
//! then map the response.

use std::fmt;
use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ApiError, error_message};
use crate::session::{Identity, SESSION_TOKEN_HEADER, Session};

/// Message used when neither the body nor the status carries one.
const FALLBACK_ERROR_MESSAGE: &str = "Request failed";

/// A decoded 2xx response.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    /// Decoded body.
    pub data: T,
    /// HTTP status of the response.
    pub status: StatusCode,
    /// HTTP status text (e.g. `OK`, `Created`).
    pub message: String,
}

impl<T> ApiResponse<T> {
    /// Discard the status and keep the body.
    pub fn into_data(self) -> T {
        self.data
    }
}

/// One outgoing request, before the base URL and identity are applied.
#[derive(Debug)]
pub(crate) struct Call {
    method: Method,
    path: String,
    query: Vec<(&'static str, String)>,
    body: Option<Vec<u8>>,
    identity: Option<Identity>,
}

impl Call {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            identity: None,
        }
    }

    pub(crate) fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub(crate) fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub(crate) fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub(crate) fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Query-string pairs; unset filters are simply absent from `pairs`.
    pub(crate) fn query(mut self, pairs: Vec<(&'static str, String)>) -> Self {
        self.query = pairs;
        self
    }

    pub(crate) fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_vec(body).map_err(ApiError::Encode)?);
        Ok(self)
    }

    /// Send with an identity the caller already resolved, so that the path
    /// and the header agree.
    pub(crate) fn identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }
}

/// Percent-encode an id for use as a single path segment.
pub(crate) fn segment(id: &str) -> String {
    url::form_urlencoded::byte_serialize(id.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// HTTP plumbing shared by the services of one client.
///
/// Cheap to clone; clones share the connection pool and session state.
#[derive(Clone)]
pub(crate) struct BaseResource {
    inner: Arc<BaseResourceInner>,
}

struct BaseResourceInner {
    http: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
}

impl fmt::Debug for BaseResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseResource")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl BaseResource {
    /// Build the HTTP client from `config`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` for a malformed base URL and
    /// `ApiError::InvalidHeader` for an extra header that is malformed or
    /// tries to set an identity header.
    pub(crate) fn new(config: ClientConfig, session: Arc<Session>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::InvalidHeader(format!("{name}: {e}")))?;
            if name == AUTHORIZATION || name.as_str() == SESSION_TOKEN_HEADER {
                return Err(ApiError::InvalidHeader(format!(
                    "{name} is managed by the session and cannot be configured"
                )));
            }
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::InvalidHeader(format!("{name}: {e}")))?;
            headers.insert(name, value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        validate_base_url(&config.base_url)?;

        Ok(Self {
            inner: Arc::new(BaseResourceInner {
                http,
                base_url: config.base_url,
                session,
            }),
        })
    }

    /// Same connection pool and session, different base URL.
    pub(crate) fn rebase(&self, base_url: impl Into<String>) -> Result<Self, ApiError> {
        let base_url = base_url.into();
        validate_base_url(&base_url)?;

        Ok(Self {
            inner: Arc::new(BaseResourceInner {
                http: self.inner.http.clone(),
                base_url,
                session: Arc::clone(&self.inner.session),
            }),
        })
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub(crate) fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Send `call` and decode the body as `T`.
    ///
    /// An empty or unparseable 2xx body is decoded from `null`, so `T`
    /// must accept `null` (e.g. `Option<_>` or `()`) for such endpoints.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` for a non-2xx response, `ApiError::Decode`
    /// if the body does not match `T`, and `ApiError::Transport` if no
    /// response was received.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        call: Call,
    ) -> Result<ApiResponse<T>, ApiError> {
        let (status, body) = self.dispatch(call).await?;
        Ok(ApiResponse {
            data: decode_body(&body)?,
            status,
            message: status_text(status),
        })
    }

    /// Send `call` and ignore the response body.
    ///
    /// # Errors
    ///
    /// Same as [`Self::execute`], minus decoding.
    pub(crate) async fn execute_empty(&self, call: Call) -> Result<ApiResponse<()>, ApiError> {
        let (status, _) = self.dispatch(call).await?;
        Ok(ApiResponse {
            data: (),
            status,
            message: status_text(status),
        })
    }

    #[instrument(
        skip_all,
        fields(method = %call.method, path = %call.path, identity = tracing::field::Empty)
    )]
    async fn dispatch(&self, call: Call) -> Result<(StatusCode, String), ApiError> {
        let identity = match call.identity {
            Some(identity) => identity,
            None => self.inner.session.identity().await?,
        };
        tracing::Span::current().record("identity", identity.mode());

        let url = self.url(&call.path, &call.query)?;
        let (name, value) = identity.header()?;

        let mut request = self
            .inner
            .http
            .request(call.method, url)
            .header(name, value);
        if let Some(body) = call.body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            // An unreadable error body still gets the status text.
            let body = response.text().await.unwrap_or_default();
            let message = failure_message(status, &body);
            warn!(status = status.as_u16(), %message, "request rejected");
            return Err(ApiError::Status { status, message });
        }

        let body = response.text().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "request succeeded");
        Ok((status, body))
    }

    /// `base + path`, or `path` itself when it is already absolute, with
    /// the query pairs appended.
    fn url(&self, path: &str, query: &[(&'static str, String)]) -> Result<Url, ApiError> {
        let raw = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_owned()
        } else {
            format!("{}{path}", self.inner.base_url)
        };

        let mut url = Url::parse(&raw).map_err(|source| ApiError::InvalidUrl {
            url: raw.clone(),
            source,
        })?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}

fn validate_base_url(base_url: &str) -> Result<(), ApiError> {
    Url::parse(base_url)
        .map(|_| ())
        .map_err(|source| ApiError::InvalidUrl {
            url: base_url.to_owned(),
            source,
        })
}

fn status_text(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or_default().to_owned()
}

/// Server message, else status text, else a generic message.
fn failure_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(error_message)
        .or_else(|| status.canonical_reason().map(str::to_owned))
        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_owned())
}

fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let value = if body.trim().is_empty() {
        Value::Null
    } else {
        match serde_json::from_str(body) {
            Ok(value) => value,
            Err(error) => {
                warn!(%error, "response body is not JSON, treating it as null");
                Value::Null
            }
        }
    };
    serde_json::from_value(value).map_err(ApiError::Decode)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use comptoir_core::Product;

    use super::*;
    use crate::store::MemoryStore;

    fn resource(base_url: &str) -> BaseResource {
        let session = Arc::new(Session::restore(Arc::new(MemoryStore::new())).unwrap());
        BaseResource::new(ClientConfig::new(base_url), session).unwrap()
    }

    #[test]
    fn test_url_appends_path_verbatim() {
        let base = resource("http://localhost:3000/api");
        let url = base.url("/catalogue/p-1", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/catalogue/p-1");
    }

    #[test]
    fn test_url_keeps_absolute_paths() {
        let base = resource("http://localhost:3000/api");
        let url = base.url("https://cdn.boutique.sn/health", &[]).unwrap();
        assert_eq!(url.as_str(), "https://cdn.boutique.sn/health");
    }

    #[test]
    fn test_url_encodes_query_pairs() {
        let base = resource("http://localhost:3000/api");
        let url = base
            .url(
                "/catalogue/search",
                &[("q", "thé vert & menthe".to_string()), ("page", "2".to_string())],
            )
            .unwrap();
        assert_eq!(url.path(), "/api/catalogue/search");
        let pairs: Vec<_> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "thé vert & menthe".to_string()),
                ("page".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn test_url_without_query_has_no_question_mark() {
        let base = resource("http://localhost:3000/api");
        let url = base.url("/orders", &[]).unwrap();
        assert!(url.query().is_none());
    }

    #[test]
    fn test_segment_escapes_reserved_characters() {
        assert_eq!(segment("abc-123"), "abc-123");
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let session = Arc::new(Session::restore(Arc::new(MemoryStore::new())).unwrap());
        let err = BaseResource::new(ClientConfig::new("not a url"), session).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl { .. }));
    }

    #[test]
    fn test_rejects_identity_headers_in_config() {
        for name in ["Authorization", "x-session-token"] {
            let session = Arc::new(Session::restore(Arc::new(MemoryStore::new())).unwrap());
            let config = ClientConfig::new("http://localhost:3000/api").with_header(name, "x");
            let err = BaseResource::new(config, session).unwrap_err();
            assert!(matches!(err, ApiError::InvalidHeader(_)), "{name}");
        }
    }

    #[test]
    fn test_accepts_extra_headers_and_timeout() {
        let session = Arc::new(Session::restore(Arc::new(MemoryStore::new())).unwrap());
        let config = ClientConfig::new("http://localhost:3000/api")
            .with_header("x-client", "console")
            .with_timeout(Duration::from_secs(3));
        assert!(BaseResource::new(config, session).is_ok());
    }

    #[test]
    fn test_rebase_shares_session() {
        let base = resource("http://localhost:3000/api");
        let other = base.rebase("https://api.boutique.sn/v2").unwrap();
        assert_eq!(other.base_url(), "https://api.boutique.sn/v2");
        assert!(std::ptr::eq(base.session(), other.session()));
    }

    #[test]
    fn test_failure_message_prefers_server_message() {
        let body = r#"{"statusCode": 404, "message": "Product not found"}"#;
        assert_eq!(
            failure_message(StatusCode::NOT_FOUND, body),
            "Product not found"
        );
    }

    #[test]
    fn test_failure_message_falls_back_to_status_text() {
        assert_eq!(
            failure_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>"),
            "Internal Server Error"
        );
        assert_eq!(failure_message(StatusCode::UNAUTHORIZED, ""), "Unauthorized");
    }

    #[test]
    fn test_failure_message_without_reason_phrase() {
        let status = StatusCode::from_u16(599).unwrap();
        assert_eq!(failure_message(status, "{}"), "Request failed");
    }

    #[test]
    fn test_decode_empty_body_as_null() {
        assert!(decode_body::<()>("").is_ok());
        let missing: Option<Product> = decode_body("   ").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_decode_garbage_success_body_as_null() {
        let value: Option<Product> = decode_body("not json").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_decode_null_into_required_type_fails() {
        let err = decode_body::<Product>("").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
