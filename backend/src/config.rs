//! Dashboard settings loaded via OrthoConfig.
//!
//! Values layer as defaults < config file < `DASHBOARD_*` environment <
//! command line. Session cookie settings are read separately, see
//! [`crate::inbound::http::session_config`].

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::{LocaleSet, LocaleSetError};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_LOCALES: &str = "en,fr";
const DEFAULT_LOCALE: &str = "en";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

fn default_messages_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("messages")
}

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The bind address is not a socket address.
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        /// Configured value.
        value: String,
        /// Parser failure.
        #[source]
        source: std::net::AddrParseError,
    },
    /// The backend URL does not parse.
    #[error("invalid backend URL '{value}': {source}")]
    BackendUrl {
        /// Configured value.
        value: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
    /// A backend URL was given without the public key.
    #[error("DASHBOARD_ANON_KEY is required when DASHBOARD_BACKEND_URL is set")]
    MissingAnonKey,
    /// Backend calls would time out immediately.
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
    /// The locale list or default locale is invalid.
    #[error(transparent)]
    Locales(#[from] LocaleSetError),
}

/// Settings for the dashboard server.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DASHBOARD")]
pub struct DashboardSettings {
    /// Socket address to listen on.
    #[ortho_config(default = DEFAULT_BIND_ADDR.to_owned())]
    pub bind_addr: String,
    /// Locale tags in display order; `en,fr` when empty.
    ///
    /// The environment accepts a comma-separated list such as
    /// `DASHBOARD_LOCALES=en,fr` as well as a single tag.
    #[serde(default)]
    pub locales: Vec<String>,
    /// Locale used for `/` and for unconfigured locale segments.
    #[ortho_config(default = DEFAULT_LOCALE.to_owned())]
    pub default_locale: String,
    /// Directory holding `{locale}.json` message bundles.
    pub messages_dir: Option<PathBuf>,
    /// Base URL of the backend service; fixtures are used when absent.
    pub backend_url: Option<String>,
    /// Public API key sent with every backend request.
    pub anon_key: Option<String>,
    /// Privileged key for admin and table reads.
    pub service_key: Option<String>,
    /// Per-request timeout for backend calls, in seconds.
    #[ortho_config(default = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,
}

impl fmt::Debug for DashboardSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("DashboardSettings")
            .field("bind_addr", &self.bind_addr)
            .field("locales", &self.locales)
            .field("default_locale", &self.default_locale)
            .field("messages_dir", &self.messages_dir)
            .field("backend_url", &self.backend_url)
            .field("anon_key", &redact(&self.anon_key))
            .field("service_key", &redact(&self.service_key))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Where the backend lives and how to authenticate to it.
#[derive(Clone)]
pub struct BackendTarget {
    /// Base URL; `auth/v1` and `rest/v1` are resolved against it.
    pub url: Url,
    /// Public key sent as `apikey` on every call.
    pub anon_key: String,
    /// Privileged key for admin reads, when configured.
    pub service_key: Option<String>,
}

impl DashboardSettings {
    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.trim();
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Configured locales and the default, validated together.
    pub fn locale_set(&self) -> Result<LocaleSet, SettingsError> {
        let list = if self.locales.is_empty() {
            DEFAULT_LOCALES.to_owned()
        } else {
            self.locales.join(",")
        };
        Ok(LocaleSet::parse(&list, &self.default_locale)?)
    }

    /// Bundle directory, defaulting to the crate's `messages/`.
    pub fn messages_dir(&self) -> PathBuf {
        self.messages_dir
            .clone()
            .unwrap_or_else(default_messages_dir)
    }

    /// Backend request timeout; zero is rejected.
    pub fn request_timeout(&self) -> Result<Duration, SettingsError> {
        match self.request_timeout_secs {
            0 => Err(SettingsError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// Backend connection details, or `None` to run against fixtures.
    pub fn backend(&self) -> Result<Option<BackendTarget>, SettingsError> {
        let Some(raw) = self.backend_url.as_deref().map(str::trim).filter(|s| !s.is_empty())
        else {
            return Ok(None);
        };
        let url = Url::parse(raw).map_err(|source| SettingsError::BackendUrl {
            value: raw.to_owned(),
            source,
        })?;
        let anon_key = self
            .anon_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(SettingsError::MissingAnonKey)?;
        Ok(Some(BackendTarget {
            url,
            anon_key,
            service_key: self.service_key.clone().filter(|key| !key.trim().is_empty()),
        }))
    }
}
