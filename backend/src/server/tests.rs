//! Tests for server construction and the assembled middleware stack.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite, time::Duration};
use actix_web::http::{StatusCode, header};
use actix_web::{test as actix_test, web};
use rstest::{fixture, rstest};

use dashboard::domain::LocaleSet;
use dashboard::inbound::http::session_config::SessionSettings;

use super::{AppDependencies, HealthState, ServerConfig, build_app, build_http_state, create_server};

#[fixture]
fn config() -> ServerConfig {
    ServerConfig {
        session: SessionSettings {
            key: Key::generate(),
            cookie_secure: false,
            same_site: SameSite::Lax,
            ttl: Duration::hours(2),
        },
        bind_addr: "127.0.0.1:0".parse().expect("addr"),
        locales: LocaleSet::parse("en,fr", "en").expect("locales"),
        messages_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("messages"),
        backend: None,
        request_timeout: std::time::Duration::from_secs(1),
    }
}

fn dependencies(config: &ServerConfig, health_state: web::Data<HealthState>) -> AppDependencies {
    AppDependencies {
        health_state,
        http_state: build_http_state(config).expect("state"),
        key: config.session.key.clone(),
        cookie_secure: config.session.cookie_secure,
        same_site: config.session.same_site,
        session_ttl: config.session.ttl,
    }
}

#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready(config: ServerConfig) {
    let health_state = web::Data::new(HealthState::new());
    assert!(!health_state.is_ready(), "state should start unready");

    let _server = create_server(health_state.clone(), config).expect("server should build");

    assert!(health_state.is_ready(), "server creation should mark readiness");
}

#[rstest]
#[case("/", "/fr/dashboard/account")]
#[case("/dashboard/people?view=grid", "/fr/dashboard/people?view=grid")]
#[actix_rt::test]
async fn stack_redirects_to_negotiated_locale(
    config: ServerConfig,
    #[case] uri: &str,
    #[case] location: &str,
) {
    let app = actix_test::init_service(build_app(dependencies(
        &config,
        web::Data::new(HealthState::new()),
    )))
    .await;
    let req = actix_test::TestRequest::get()
        .uri(uri)
        .insert_header((header::ACCEPT_LANGUAGE, "fr-CA,fr;q=0.9,en;q=0.5"))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
        Some(location)
    );
    assert!(res.headers().contains_key("trace-id"));
}

#[rstest]
#[actix_rt::test]
async fn stack_serves_pages_api_and_probes(config: ServerConfig) {
    let health_state = web::Data::new(HealthState::new());
    health_state.mark_ready();
    let app = actix_test::init_service(build_app(dependencies(&config, health_state))).await;

    for (uri, expected) in [
        ("/fr/dashboard/documentation", StatusCode::OK),
        ("/de/dashboard/documentation", StatusCode::NOT_FOUND),
        ("/en/dashboard/account", StatusCode::SEE_OTHER),
        ("/api/v1/locales", StatusCode::OK),
        ("/health/ready", StatusCode::OK),
        ("/health/live", StatusCode::OK),
    ] {
        let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), expected, "GET {uri}");
    }
}
