//! Authentication, profile and admin user management.

use comptoir_core::{
    AuthResponse, DataListResponse, LoginDto, RefreshTokenDto, RegisterDto, UpdateProfileDto,
    UpdateUserRoleDto, User, UserId, UserQuery, UserRole,
};
use secrecy::ExposeSecret;
use tracing::{instrument, warn};

use crate::error::ApiError;
use crate::resource::{ApiResponse, BaseResource, Call, segment};

/// `/auth` and `/users` endpoints.
#[derive(Debug, Clone)]
pub struct UserService {
    base: BaseResource,
}

impl UserService {
    pub(crate) const fn new(base: BaseResource) -> Self {
        Self { base }
    }

    /// Sign in and store the returned credentials.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the server message on bad credentials.
    #[instrument(skip_all, fields(email = %credentials.email))]
    pub async fn login(
        &self,
        credentials: &LoginDto,
    ) -> Result<ApiResponse<AuthResponse>, ApiError> {
        let response: ApiResponse<AuthResponse> = self
            .base
            .execute(Call::post("/auth/signin").json(credentials)?)
            .await?;
        self.base.session().sign_in(&response.data).await?;
        Ok(response)
    }

    /// Create an account; the new user is signed in right away.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` if the backend rejects the registration.
    #[instrument(skip_all, fields(email = %registration.email))]
    pub async fn register(
        &self,
        registration: &RegisterDto,
    ) -> Result<ApiResponse<AuthResponse>, ApiError> {
        let response: ApiResponse<AuthResponse> = self
            .base
            .execute(Call::post("/auth/register").json(registration)?)
            .await?;
        self.base.session().sign_in(&response.data).await?;
        Ok(response)
    }

    /// Profile of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` (401) when not signed in.
    pub async fn get_profile(&self) -> Result<ApiResponse<User>, ApiError> {
        self.base.execute(Call::get("/auth/profile")).await
    }

    /// Change profile fields of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` if the backend rejects the update.
    pub async fn update_profile(
        &self,
        update: &UpdateProfileDto,
    ) -> Result<ApiResponse<User>, ApiError> {
        self.base
            .execute(Call::patch("/auth/profile").json(update)?)
            .await
    }

    /// Exchange the stored refresh token for new credentials.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotAuthenticated` if no refresh token is stored.
    #[instrument(skip(self))]
    pub async fn refresh_token(&self) -> Result<ApiResponse<AuthResponse>, ApiError> {
        let refresh_token = self
            .base
            .session()
            .refresh_token()
            .await
            .ok_or(ApiError::NotAuthenticated("no refresh token stored"))?;

        let body = RefreshTokenDto {
            refresh_token: refresh_token.expose_secret().to_owned(),
        };
        let response: ApiResponse<AuthResponse> = self
            .base
            .execute(Call::post("/auth/refresh").json(&body)?)
            .await?;
        self.base.session().sign_in(&response.data).await?;
        Ok(response)
    }

    /// Sign out.
    ///
    /// The backend is told first; local credentials are cleared even if
    /// that call fails.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Store` only if the cleared state cannot be saved.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        if let Err(error) = self.base.execute_empty(Call::post("/auth/logout")).await {
            warn!(%error, "backend logout failed, clearing local credentials anyway");
        }
        self.base.session().clear_auth().await
    }

    /// Admin: list users.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` (403) for non-admins.
    pub async fn get_all_users(
        &self,
        query: &UserQuery,
    ) -> Result<ApiResponse<DataListResponse<User>>, ApiError> {
        self.base
            .execute(Call::get("/users/admin/all").query(query.to_pairs()))
            .await
    }

    /// Admin: change a user's role.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` if the user does not exist or the caller
    /// is not an admin.
    #[instrument(skip_all, fields(user_id = %id))]
    pub async fn update_user_role(
        &self,
        id: &UserId,
        role: UserRole,
    ) -> Result<ApiResponse<User>, ApiError> {
        let path = format!("/users/admin/{}/role", segment(id.as_str()));
        self.base
            .execute(Call::patch(path).json(&UpdateUserRoleDto { role })?)
            .await
    }
}
