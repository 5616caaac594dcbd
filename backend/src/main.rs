//! Dashboard entry-point: loads settings, wires adapters, and serves pages.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use dashboard::config::DashboardSettings;
use dashboard::inbound::http::health::HealthState;
use dashboard::inbound::http::session_config::{
    BuildMode, fingerprint::key_fingerprint, session_settings_from_env,
};
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = DashboardSettings::load_from_iter(std::env::args_os())
        .wrap_err("loading dashboard settings")?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("loading session settings")?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        secure = session.cookie_secure,
        ttl_minutes = session.ttl.whole_minutes(),
        "session key loaded"
    );

    let config =
        ServerConfig::from_settings(&settings, session).wrap_err("validating dashboard settings")?;
    info!(addr = %config.bind_addr(), "starting dashboard");

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config).wrap_err("starting server")?;
    let result = server.await;
    health_state.mark_unhealthy();
    result.wrap_err("server terminated")
}
