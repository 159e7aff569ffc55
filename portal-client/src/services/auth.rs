use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::api::{ApiClient, ApiError, ApiRequest, LOGIN_PATH, SessionEvent};
use crate::models::UserProfile;
use crate::utils::decode_user_profile;

#[derive(Debug, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub password: Secret<String>,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: Secret::new(password.into()),
        }
    }

    fn check(&self) -> Result<(), ApiError> {
        self.validate()?;
        if self.password.expose_secret().is_empty() {
            return Err(ApiError::InvalidRequest("password: must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Login answers with bare tokens; the profile comes from the claims.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    access: String,
    refresh: String,
}

/// Login and logout over the client's session store.
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a session.
    ///
    /// If the access token's claims cannot be decoded the tokens are still
    /// stored (with no user) and `TokenDecode` is returned.
    #[tracing::instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<UserProfile, ApiError> {
        credentials.check()?;

        let request = ApiRequest::post(LOGIN_PATH).body(json!({
            "email": credentials.email,
            "password": credentials.password.expose_secret(),
        }));
        let tokens: LoginResponse = self.client.send(request).await?;

        let session = self.client.session();
        let profile = match decode_user_profile(&tokens.access) {
            Ok(profile) => profile,
            Err(e) => {
                tracing::error!(error = %e, "Login succeeded but the access token could not be decoded");
                session.set_auth(tokens.access, tokens.refresh, None);
                self.client.refresh().reset().await;
                return Err(ApiError::TokenDecode(e.to_string()));
            }
        };

        session.set_auth(tokens.access, tokens.refresh, Some(profile.clone()));
        self.client.refresh().reset().await;
        self.client.events().emit(SessionEvent::Authenticated);

        tracing::info!(user_id = %profile.id, "Logged in");
        Ok(profile)
    }

    /// Local only: the backend keeps no session to revoke.
    pub async fn logout(&self) {
        self.client.session().clear_auth();
        self.client.refresh().mark_logged_out().await;
        self.client.events().emit(SessionEvent::LoggedOut);
        tracing::info!("Logged out");
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.client.session().state().user
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.session().state().is_authenticated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_validation() {
        assert!(Credentials::new("ana@example.com", "secret").check().is_ok());
        assert!(matches!(
            Credentials::new("not-an-email", "secret").check(),
            Err(ApiError::InvalidRequest(_))
        ));
        assert!(matches!(
            Credentials::new("ana@example.com", "").check(),
            Err(ApiError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let debug = format!("{:?}", Credentials::new("ana@example.com", "hunter2"));
        assert!(!debug.contains("hunter2"));
    }
}
