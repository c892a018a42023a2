//! Auth/session state shared by every resource service.
//!
//! Exactly one identity is attached to each request:
//!
//! - `Authorization: Bearer <token>` when an auth token is stored, or
//! - `x-session-token: <uuid>` otherwise.
//!
//! The anonymous session id is created lazily on the first request that
//! needs it and persisted, so the same id is reused until the store is
//! wiped. Signing in does not remove it; it simply stops being sent while a
//! bearer token is present.

use std::sync::Arc;

use comptoir_core::{AuthResponse, User, UserRole};
use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::store::{SessionStore, StoredSession};

/// Header carrying the anonymous session id.
pub const SESSION_TOKEN_HEADER: &str = "x-session-token";

/// The identity a request is sent with.
#[derive(Debug, Clone)]
pub enum Identity {
    /// Signed-in user.
    Bearer(SecretString),
    /// Anonymous visitor.
    Session(Uuid),
}

impl Identity {
    /// Whether this is a signed-in identity.
    #[must_use]
    pub const fn is_bearer(&self) -> bool {
        matches!(self, Self::Bearer(_))
    }

    /// Short name for logs.
    #[must_use]
    pub const fn mode(&self) -> &'static str {
        match self {
            Self::Bearer(_) => "bearer",
            Self::Session(_) => "session",
        }
    }

    /// The single header that carries this identity.
    pub(crate) fn header(&self) -> Result<(HeaderName, HeaderValue), ApiError> {
        match self {
            Self::Bearer(token) => {
                let mut value =
                    HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                        .map_err(|_| {
                            ApiError::InvalidHeader(
                                "auth token contains characters not allowed in a header"
                                    .to_string(),
                            )
                        })?;
                value.set_sensitive(true);
                Ok((AUTHORIZATION, value))
            }
            Self::Session(id) => {
                let value = HeaderValue::from_str(&id.to_string())
                    .map_err(|e| ApiError::InvalidHeader(e.to_string()))?;
                Ok((HeaderName::from_static(SESSION_TOKEN_HEADER), value))
            }
        }
    }
}

/// In-memory copy of the persisted session, written through to the store.
pub(crate) struct Session {
    store: Arc<dyn SessionStore>,
    state: RwLock<StoredSession>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl Session {
    /// Load the persisted state from `store`.
    pub(crate) fn restore(store: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        let state = store.load()?;

        match (bearer_token(&state), &state.user) {
            (Some(_), Some(user)) => debug!(user_id = %user.id, "restored signed-in session"),
            (Some(_), None) => debug!("restored auth token without user details"),
            (None, _) => debug!(
                has_session_token = state.session_token.is_some(),
                "restored anonymous session"
            ),
        }

        Ok(Self {
            store,
            state: RwLock::new(state),
        })
    }

    /// Resolve the identity for the next request.
    ///
    /// Creates and persists the anonymous session id if none exists yet.
    /// Creation happens under the write lock so concurrent first requests
    /// agree on one id.
    pub(crate) async fn identity(&self) -> Result<Identity, ApiError> {
        {
            let state = self.state.read().await;
            if let Some(identity) = current_identity(&state) {
                return Ok(identity);
            }
        }

        let mut state = self.state.write().await;
        if let Some(identity) = current_identity(&state) {
            return Ok(identity);
        }

        let token = Uuid::new_v4();
        let mut next = state.clone();
        next.session_token = Some(token);
        self.store.save(&next)?;
        *state = next;

        debug!(session_token = %token, "created anonymous session");
        Ok(Identity::Session(token))
    }

    /// Store the credentials returned by sign-in, registration or refresh.
    pub(crate) async fn sign_in(&self, auth: &AuthResponse) -> Result<(), ApiError> {
        self.update(|state| {
            state.auth_token = Some(auth.access_token.clone());
            if auth.refresh_token.is_some() {
                state.refresh_token.clone_from(&auth.refresh_token);
            }
            state.user = Some(auth.user.clone());
        })
        .await?;

        info!(user_id = %auth.user.id, role = %auth.user.role, "signed in");
        Ok(())
    }

    /// Store a bearer token obtained out of band.
    pub(crate) async fn set_auth_token(&self, token: String) -> Result<(), ApiError> {
        self.update(|state| state.auth_token = Some(token)).await
    }

    /// Override the anonymous session id.
    pub(crate) async fn set_session_token(&self, token: Uuid) -> Result<(), ApiError> {
        self.update(|state| state.session_token = Some(token)).await
    }

    /// Forget the signed-in user; later requests use the session id again.
    pub(crate) async fn clear_auth(&self) -> Result<(), ApiError> {
        self.update(|state| {
            state.auth_token = None;
            state.refresh_token = None;
            state.user = None;
        })
        .await?;

        info!("signed out");
        Ok(())
    }

    pub(crate) async fn current_user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub(crate) async fn is_authenticated(&self) -> bool {
        bearer_token(&*self.state.read().await).is_some()
    }

    pub(crate) async fn is_admin(&self) -> bool {
        let state = self.state.read().await;
        bearer_token(&state).is_some()
            && state
                .user
                .as_ref()
                .is_some_and(|user| user.role == UserRole::Admin)
    }

    pub(crate) async fn refresh_token(&self) -> Option<SecretString> {
        self.state
            .read()
            .await
            .refresh_token
            .as_deref()
            .map(SecretString::from)
    }

    pub(crate) async fn session_token(&self) -> Option<Uuid> {
        self.state.read().await.session_token
    }

    /// Apply `change` and persist the result; memory is only updated once
    /// the store accepted the new state.
    async fn update(&self, change: impl FnOnce(&mut StoredSession)) -> Result<(), ApiError> {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        change(&mut next);
        self.store.save(&next)?;
        *state = next;
        Ok(())
    }
}

/// The stored access token, unless it is missing or blank.
fn bearer_token(state: &StoredSession) -> Option<&str> {
    state
        .auth_token
        .as_deref()
        .filter(|token| !token.trim().is_empty())
}

fn current_identity(state: &StoredSession) -> Option<Identity> {
    if let Some(token) = bearer_token(state) {
        return Some(Identity::Bearer(SecretString::from(token)));
    }
    state.session_token.map(Identity::Session)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn auth_response(token: &str, role: &str) -> AuthResponse {
        serde_json::from_value(serde_json::json!({
            "user": {"id": "u1", "email": "awa@boutique.sn", "role": role},
            "access_token": token,
            "refreshToken": "refresh-1"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_anonymous_identity_is_created_once_and_persisted() {
        let store = Arc::new(MemoryStore::new());
        let session = Session::restore(store.clone()).unwrap();

        let first = session.identity().await.unwrap();
        let second = session.identity().await.unwrap();

        let (Identity::Session(a), Identity::Session(b)) = (first, second) else {
            panic!("expected session identities");
        };
        assert_eq!(a, b);
        assert_eq!(store.snapshot().unwrap().session_token, Some(a));
    }

    #[tokio::test]
    async fn test_bearer_takes_priority_over_session_token() {
        let store = Arc::new(MemoryStore::with_state(StoredSession {
            auth_token: Some("abc".to_string()),
            session_token: Some(Uuid::new_v4()),
            ..StoredSession::default()
        }));
        let session = Session::restore(store).unwrap();

        let identity = session.identity().await.unwrap();
        let Identity::Bearer(token) = identity else {
            panic!("expected bearer identity");
        };
        assert_eq!(token.expose_secret(), "abc");
    }

    #[tokio::test]
    async fn test_blank_auth_token_falls_back_to_session_token() {
        let anonymous = Uuid::new_v4();
        let store = Arc::new(MemoryStore::with_state(StoredSession {
            auth_token: Some(String::new()),
            session_token: Some(anonymous),
            ..StoredSession::default()
        }));
        let session = Session::restore(store).unwrap();

        let identity = session.identity().await.unwrap();
        assert!(!identity.is_bearer());
        assert!(matches!(identity, Identity::Session(token) if token == anonymous));
        assert!(!session.is_authenticated().await);

        session.sign_in(&auth_response("  ", "admin")).await.unwrap();
        assert!(!session.identity().await.unwrap().is_bearer());
        assert!(!session.is_admin().await);
    }

    #[tokio::test]
    async fn test_sign_in_then_clear_reverts_to_same_session_token() {
        let store = Arc::new(MemoryStore::new());
        let session = Session::restore(store.clone()).unwrap();

        let Identity::Session(anonymous) = session.identity().await.unwrap() else {
            panic!("expected session identity");
        };

        session.sign_in(&auth_response("tok", "admin")).await.unwrap();
        assert!(session.identity().await.unwrap().is_bearer());
        assert!(session.is_admin().await);
        assert_eq!(
            session.refresh_token().await.unwrap().expose_secret(),
            "refresh-1"
        );

        session.clear_auth().await.unwrap();
        assert!(!session.is_authenticated().await);
        assert!(session.current_user().await.is_none());
        assert!(store.snapshot().unwrap().auth_token.is_none());

        let Identity::Session(after) = session.identity().await.unwrap() else {
            panic!("expected session identity after sign-out");
        };
        assert_eq!(after, anonymous);
    }

    #[tokio::test]
    async fn test_concurrent_first_requests_share_one_session_token() {
        let session = Arc::new(Session::restore(Arc::new(MemoryStore::new())).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let session = Arc::clone(&session);
                tokio::spawn(async move { session.identity().await.unwrap() })
            })
            .collect();

        let mut tokens = Vec::new();
        for handle in handles {
            if let Identity::Session(id) = handle.await.unwrap() {
                tokens.push(id);
            }
        }
        tokens.dedup();
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn test_bearer_header_is_sensitive() {
        let (name, value) = Identity::Bearer(SecretString::from("abc")).header().unwrap();
        assert_eq!(name, AUTHORIZATION);
        assert_eq!(value.to_str().unwrap(), "Bearer abc");
        assert!(value.is_sensitive());
    }

    #[test]
    fn test_bearer_header_rejects_newlines() {
        let err = Identity::Bearer(SecretString::from("abc\ndef"))
            .header()
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidHeader(_)));
    }
}
