//! HTTP server configuration object.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use dashboard::config::{BackendTarget, DashboardSettings, SettingsError};
use dashboard::domain::LocaleSet;
use dashboard::inbound::http::session_config::SessionSettings;

/// Everything needed to build the server, validated up front.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) locales: LocaleSet,
    pub(crate) messages_dir: PathBuf,
    pub(crate) backend: Option<BackendTarget>,
    pub(crate) request_timeout: Duration,
}

impl ServerConfig {
    /// Validate loaded settings and pair them with the session settings.
    pub fn from_settings(
        settings: &DashboardSettings,
        session: SessionSettings,
    ) -> Result<Self, SettingsError> {
        Ok(Self {
            session,
            bind_addr: settings.bind_addr()?,
            locales: settings.locale_set()?,
            messages_dir: settings.messages_dir(),
            backend: settings.backend()?,
            request_timeout: settings.request_timeout()?,
        })
    }

    /// Override the listen address.
    #[must_use]
    pub fn with_bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
