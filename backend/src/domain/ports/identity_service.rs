//! Driving port for the external identity service.
//!
//! The dashboard never verifies passwords or tokens itself. Page loaders ask
//! this port who a token belongs to; the connect handler asks it to exchange
//! credentials for tokens.

use async_trait::async_trait;

use crate::domain::{AccessToken, AuthSession, LoginCredentials, User, UserId};

use super::BackendServiceError;

/// Identity operations delegated to the backend service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// User owning `token`, or `None` when the token is unknown or expired.
    async fn get_user(&self, token: &AccessToken) -> Result<Option<User>, BackendServiceError>;

    /// Exchange credentials for a session.
    ///
    /// Wrong credentials surface as [`BackendServiceError::Unauthorized`].
    async fn sign_in(&self, credentials: &LoginCredentials)
    -> Result<AuthSession, BackendServiceError>;

    /// Revoke `token` at the service.
    async fn sign_out(&self, token: &AccessToken) -> Result<(), BackendServiceError>;
}

/// Email accepted by [`FixtureIdentityService`].
pub const FIXTURE_EMAIL: &str = "ada@example.com";
/// Password accepted by [`FixtureIdentityService`].
pub const FIXTURE_PASSWORD: &str = "password";
/// Access token issued by [`FixtureIdentityService`].
pub const FIXTURE_ACCESS_TOKEN: &str = "fixture-access-token";
const FIXTURE_USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

/// In-memory identity service used when no backend URL is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityService;

impl FixtureIdentityService {
    fn user() -> Result<User, BackendServiceError> {
        let id = UserId::new(FIXTURE_USER_ID)
            .map_err(|err| BackendServiceError::decode(format!("invalid fixture user id: {err}")))?;
        Ok(User::new(id, Some(FIXTURE_EMAIL.to_owned())))
    }
}

#[async_trait]
impl IdentityService for FixtureIdentityService {
    async fn get_user(&self, token: &AccessToken) -> Result<Option<User>, BackendServiceError> {
        if token.expose() == FIXTURE_ACCESS_TOKEN {
            Self::user().map(Some)
        } else {
            Ok(None)
        }
    }

    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthSession, BackendServiceError> {
        if credentials.email() != FIXTURE_EMAIL || credentials.password() != FIXTURE_PASSWORD {
            return Err(BackendServiceError::unauthorized("invalid login credentials"));
        }
        let access_token = AccessToken::new(FIXTURE_ACCESS_TOKEN)
            .ok_or_else(|| BackendServiceError::decode("blank fixture token"))?;
        Ok(AuthSession {
            access_token,
            refresh_token: None,
            user: Some(Self::user()?),
        })
    }

    async fn sign_out(&self, _token: &AccessToken) -> Result<(), BackendServiceError> {
        Ok(())
    }
}
