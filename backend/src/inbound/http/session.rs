//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The encrypted session cookie holds the tokens issued by the identity
//! service at sign-in. Handlers only see [`AccessToken`] values; the raw
//! strings never leave this module except to the cookie store.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{AccessToken, AuthSession, Error};

pub(crate) const ACCESS_TOKEN_KEY: &str = "access_token";
pub(crate) const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the tokens from a successful sign-in, replacing any earlier ones.
    pub fn persist_session(&self, auth: &AuthSession) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(ACCESS_TOKEN_KEY, auth.access_token.expose())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))?;
        match &auth.refresh_token {
            Some(token) => self
                .0
                .insert(REFRESH_TOKEN_KEY, token.expose())
                .map_err(|error| Error::internal(format!("failed to persist session: {error}"))),
            None => {
                self.0.remove(REFRESH_TOKEN_KEY);
                Ok(())
            }
        }
    }

    /// Access token from the session cookie, if one is present.
    ///
    /// A cookie whose token cannot be read is treated as no session.
    pub fn access_token(&self) -> Option<AccessToken> {
        match self.0.get::<String>(ACCESS_TOKEN_KEY) {
            Ok(raw) => raw.and_then(AccessToken::new),
            Err(error) => {
                warn!(%error, "unreadable access token in session cookie");
                None
            }
        }
    }

    /// Forget every token.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
