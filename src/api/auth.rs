use crate::error::Error;
use crate::gateway::Gateway;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, User};

/// Login, registration and profile endpoints.
///
/// Successful login and registration persist the credentials and profile in
/// the gateway's [`Session`](crate::Session).
pub struct AuthApi<'a> {
    pub(super) gateway: &'a Gateway,
}

impl AuthApi<'_> {
    /// Sign in and persist the returned credentials and profile.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequestFailed`] with field errors for bad credentials,
    /// and [`Error::Storage`] if the session cannot be persisted.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, Error> {
        let body = LoginRequest {
            username: username.to_owned(),
            password: password.to_owned(),
        };
        let response: AuthResponse = self.gateway.post("/auth/login/", &body).await?;
        self.gateway.session().establish(&response)?;
        tracing::info!(user_id = %response.user.id, role = %response.user.role, "Logged in");
        Ok(response.user)
    }

    /// Register a student account and sign in as it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequestFailed`] when the backend rejects a field
    /// (see [`Error::field_errors`]), and [`Error::Storage`] if the session
    /// cannot be persisted.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, Error> {
        let response: AuthResponse = self.gateway.post("/auth/register/", request).await?;
        self.gateway.session().establish(&response)?;
        tracing::info!(user_id = %response.user.id, "Registered");
        Ok(response.user)
    }

    /// Fetch the signed-in user's profile without caching it.
    ///
    /// # Errors
    ///
    /// Fails as [`Gateway::request`](crate::Gateway::request) does.
    pub async fn profile(&self) -> Result<User, Error> {
        self.gateway.get("/auth/profile/").await
    }

    /// Re-fetch the profile (e.g. after a wallet top-up) and cache it.
    ///
    /// # Errors
    ///
    /// Fails if the fetch fails or the profile cannot be cached.
    pub async fn refresh_profile(&self) -> Result<User, Error> {
        let user = self.profile().await?;
        self.gateway.session().set_user(&user)?;
        Ok(user)
    }

    /// Resume a stored session at start-up.
    ///
    /// Returns `None` when no credential is stored. If the stored credential
    /// no longer yields a profile the session is cleared and `None` returned.
    ///
    /// # Errors
    ///
    /// Only storage failures are returned; request failures end in `None`.
    pub async fn restore(&self) -> Result<Option<User>, Error> {
        let session = self.gateway.session();
        if session.access_token()?.is_none() {
            return Ok(None);
        }

        match self.profile().await {
            Ok(user) => {
                session.set_user(&user)?;
                Ok(Some(user))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to restore session");
                session.clear()?;
                Ok(None)
            }
        }
    }

    /// Forget both credentials and the cached profile.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the session cannot be cleared.
    pub fn logout(&self) -> Result<(), Error> {
        tracing::info!("Logged out");
        self.gateway.session().clear()
    }
}
