//! Builders for the HTTP state: real adapters when a backend is configured,
//! fixtures otherwise.

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use dashboard::domain::ports::{
    AdminQuery, FixtureAdminQuery, FixtureIdentityService, FixturePeopleQuery, IdentityService,
    PeopleQuery,
};
use dashboard::domain::{LocaleRouter, PageLoader};
use dashboard::inbound::http::state::HttpState;
use dashboard::outbound::backend_service::{BackendHttpClient, BackendHttpIdentity};
use dashboard::outbound::messages::FsMessageCatalogue;

use super::ServerConfig;

type Ports = (
    Arc<dyn IdentityService>,
    Arc<dyn AdminQuery>,
    Arc<dyn PeopleQuery>,
);

fn build_ports(config: &ServerConfig) -> std::io::Result<Ports> {
    let Some(target) = &config.backend else {
        warn!("no backend URL configured; serving fixture data");
        let identity: Arc<dyn IdentityService> = Arc::new(FixtureIdentityService);
        let admin: Arc<dyn AdminQuery> = Arc::new(FixtureAdminQuery);
        let people: Arc<dyn PeopleQuery> = Arc::new(FixturePeopleQuery);
        return Ok((identity, admin, people));
    };
    let identity = BackendHttpIdentity::new(target.anon_key.clone(), target.service_key.clone());
    let client = BackendHttpClient::new(target.url.clone(), config.request_timeout, identity)
        .map_err(|err| std::io::Error::other(format!("backend client: {err}")))?;
    info!(backend = %target.url, "using backend service");
    let client = Arc::new(client);
    let identity: Arc<dyn IdentityService> = client.clone();
    let admin: Arc<dyn AdminQuery> = client.clone();
    let people: Arc<dyn PeopleQuery> = client;
    Ok((identity, admin, people))
}

/// Assemble the shared handler state.
///
/// # Errors
/// Returns [`std::io::Error`] when the backend HTTP client cannot be built.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let catalogue = FsMessageCatalogue::new(config.messages_dir.clone());
    info!(dir = %catalogue.dir().display(), "reading message bundles");
    let (identity, admin, people) = build_ports(config)?;
    Ok(web::Data::new(HttpState::new(
        LocaleRouter::new(config.locales.clone(), Arc::new(catalogue)),
        PageLoader::new(identity, admin, people),
    )))
}
