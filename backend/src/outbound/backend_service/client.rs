//! Reqwest-backed BaaS adapter.
//!
//! This adapter owns transport details only: URL construction, credentials,
//! timeout and HTTP error mapping, and JSON decoding into domain records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{
    NotificationDto, PasswordGrantDto, PersonDto, PersonTypeDto, TokenDto, UserDto, UserListDto,
};
use crate::domain::ports::{AdminQuery, BackendServiceError, IdentityService, PeopleQuery};
use crate::domain::{
    AccessToken, AuthSession, LoginCredentials, Notification, Person, PersonType, User,
};

const DEFAULT_USER_AGENT: &str = concat!("dashboard/", env!("CARGO_PKG_VERSION"));

/// Credentials and identity sent with every request.
pub struct BackendHttpIdentity {
    /// Public key sent as `apikey` on every call.
    pub anon_key: Zeroizing<String>,
    /// Privileged key for admin and table reads; the anon key is used when absent.
    pub service_key: Option<Zeroizing<String>>,
    /// HTTP user-agent.
    pub user_agent: String,
}

impl BackendHttpIdentity {
    /// Identity with the default user agent.
    pub fn new(anon_key: impl Into<String>, service_key: Option<String>) -> Self {
        Self {
            anon_key: Zeroizing::new(anon_key.into()),
            service_key: service_key.map(Zeroizing::new),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

/// BaaS client implementing [`IdentityService`], [`AdminQuery`], and
/// [`PeopleQuery`].
pub struct BackendHttpClient {
    client: Client,
    base: Url,
    identity: BackendHttpIdentity,
}

impl BackendHttpClient {
    /// Build a client with an explicit per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base: Url,
        timeout: Duration,
        identity: BackendHttpIdentity,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(identity.user_agent.as_str())
            .build()?;
        Ok(Self {
            client,
            base: with_trailing_slash(base),
            identity,
        })
    }

    fn url(&self, path: &str) -> Result<Url, BackendServiceError> {
        self.base
            .join(path)
            .map_err(|err| BackendServiceError::transport(format!("invalid URL for {path}: {err}")))
    }

    fn privileged_key(&self) -> &str {
        self.identity
            .service_key
            .as_deref()
            .map_or(self.identity.anon_key.as_str(), String::as_str)
    }

    fn request(&self, builder: RequestBuilder, bearer: &str) -> RequestBuilder {
        builder
            .header("apikey", self.identity.anon_key.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .bearer_auth(bearer)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, BackendServiceError> {
        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        serde_json::from_slice(body.as_ref()).map_err(|err| {
            BackendServiceError::decode(format!("invalid JSON payload: {err}"))
        })
    }

    async fn select_all<T: DeserializeOwned>(
        &self,
        table: &str,
    ) -> Result<Vec<T>, BackendServiceError> {
        let mut url = self.url(&format!("rest/v1/{table}"))?;
        url.query_pairs_mut().append_pair("select", "*");
        debug!(table, "fetching rows");
        self.fetch(self.request(self.client.get(url), self.privileged_key()))
            .await
    }
}

fn with_trailing_slash(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

fn decode_rows<D, T>(
    rows: Vec<D>,
    map: impl Fn(D) -> Result<T, String>,
) -> Result<Vec<T>, BackendServiceError> {
    rows.into_iter()
        .map(map)
        .collect::<Result<_, _>>()
        .map_err(BackendServiceError::decode)
}

#[async_trait]
impl IdentityService for BackendHttpClient {
    async fn get_user(&self, token: &AccessToken) -> Result<Option<User>, BackendServiceError> {
        let url = self.url("auth/v1/user")?;
        let result = self
            .fetch::<UserDto>(self.request(self.client.get(url), token.expose()))
            .await;
        match result {
            Ok(dto) => dto.into_domain().map(Some).map_err(BackendServiceError::decode),
            // Expired or revoked tokens mean "nobody is signed in".
            Err(BackendServiceError::Unauthorized { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthSession, BackendServiceError> {
        let mut url = self.url("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let grant = PasswordGrantDto {
            email: credentials.email(),
            password: credentials.password(),
        };
        let builder = self
            .request(self.client.post(url), self.identity.anon_key.as_str())
            .json(&grant);
        let dto = match self.fetch::<TokenDto>(builder).await {
            // The token endpoint answers 400 for a wrong password.
            Err(BackendServiceError::Rejected { message }) if message.starts_with("status 400") => {
                return Err(BackendServiceError::unauthorized(message));
            }
            other => other?,
        };
        dto.into_domain().map_err(BackendServiceError::decode)
    }

    async fn sign_out(&self, token: &AccessToken) -> Result<(), BackendServiceError> {
        let url = self.url("auth/v1/logout")?;
        let response = self
            .request(self.client.post(url), token.expose())
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }
}

#[async_trait]
impl AdminQuery for BackendHttpClient {
    async fn list_users(&self) -> Result<Vec<User>, BackendServiceError> {
        let url = self.url("auth/v1/admin/users")?;
        let dto: UserListDto = self
            .fetch(self.request(self.client.get(url), self.privileged_key()))
            .await?;
        dto.into_domain().map_err(BackendServiceError::decode)
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>, BackendServiceError> {
        let rows: Vec<NotificationDto> = self.select_all("notifications").await?;
        decode_rows(rows, NotificationDto::into_domain)
    }
}

#[async_trait]
impl PeopleQuery for BackendHttpClient {
    async fn list_people(&self) -> Result<Vec<Person>, BackendServiceError> {
        let rows: Vec<PersonDto> = self.select_all("people").await?;
        decode_rows(rows, PersonDto::into_domain)
    }

    async fn list_person_types(&self) -> Result<Vec<PersonType>, BackendServiceError> {
        let rows: Vec<PersonTypeDto> = self.select_all("person_types").await?;
        decode_rows(rows, PersonTypeDto::into_domain)
    }
}

fn map_transport_error(error: reqwest::Error) -> BackendServiceError {
    if error.is_timeout() {
        BackendServiceError::timeout(error.to_string())
    } else if error.is_decode() {
        BackendServiceError::decode(error.to_string())
    } else {
        BackendServiceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> BackendServiceError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            BackendServiceError::unauthorized(message)
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            BackendServiceError::timeout(message)
        }
        _ if status.is_client_error() => BackendServiceError::rejected(message),
        _ => BackendServiceError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network mapping helpers.

    use super::*;
    use rstest::rstest;

    fn client(base: &str, service_key: Option<&str>) -> BackendHttpClient {
        BackendHttpClient::new(
            Url::parse(base).expect("base url"),
            Duration::from_secs(1),
            BackendHttpIdentity::new("anon", service_key.map(str::to_owned)),
        )
        .expect("client builds")
    }

    #[rstest]
    #[case("https://baas.example.com", "https://baas.example.com/auth/v1/user")]
    #[case("https://example.com/project", "https://example.com/project/auth/v1/user")]
    #[case("https://example.com/project/", "https://example.com/project/auth/v1/user")]
    fn joins_paths_below_the_base(#[case] base: &str, #[case] expected: &str) {
        let url = client(base, None).url("auth/v1/user").expect("url");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    #[case(Some("service"), "service")]
    #[case(None, "anon")]
    fn privileged_calls_prefer_the_service_key(
        #[case] service_key: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(client("https://baas.example.com", service_key).privileged_key(), expected);
    }

    #[rstest]
    #[case::unauthorized(StatusCode::UNAUTHORIZED, "Unauthorized")]
    #[case::forbidden(StatusCode::FORBIDDEN, "Unauthorized")]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "Timeout")]
    #[case::not_found(StatusCode::NOT_FOUND, "Rejected")]
    #[case::bad_request(StatusCode::BAD_REQUEST, "Rejected")]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "Transport")]
    #[case::unavailable(StatusCode::SERVICE_UNAVAILABLE, "Transport")]
    fn maps_http_statuses_to_port_errors(#[case] status: StatusCode, #[case] expected: &str) {
        let error = map_status_error(status, b"{\"msg\":\"nope\"}");
        let matched = match expected {
            "Unauthorized" => matches!(error, BackendServiceError::Unauthorized { .. }),
            "Timeout" => matches!(error, BackendServiceError::Timeout { .. }),
            "Rejected" => matches!(error, BackendServiceError::Rejected { .. }),
            "Transport" => matches!(error, BackendServiceError::Transport { .. }),
            _ => panic!("unsupported test expectation: {expected}"),
        };
        assert!(matched, "{status} mapped to {error:?}");
    }

    #[rstest]
    fn status_message_includes_compact_body() {
        let error = map_status_error(StatusCode::BAD_REQUEST, b"{\n  \"msg\": \"bad\"\n}");
        assert_eq!(error.to_string(), "backend service rejected request: status 400: { \"msg\": \"bad\" }");
    }

    #[rstest]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(500);
        let preview = body_preview(body.as_bytes());
        assert_eq!(preview.len(), 163);
        assert!(preview.ends_with("..."));
    }

    #[rstest]
    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        // Port 9 (discard) on loopback is closed in test environments.
        let client = client("http://127.0.0.1:9", None);
        let error = client.list_people().await.expect_err("no server");
        assert!(
            matches!(
                error,
                BackendServiceError::Transport { .. } | BackendServiceError::Timeout { .. }
            ),
            "unexpected error {error:?}"
        );
    }
}
