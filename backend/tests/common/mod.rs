//! Shared app assembly and port doubles for HTTP behaviour tests.
#![allow(
    dead_code,
    reason = "each test binary uses a different subset of these helpers"
)]

use std::sync::Arc;
use std::time::Duration;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::{BoxBody, EitherBody};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use async_trait::async_trait;
use tokio::sync::Barrier;

use dashboard::domain::ports::{
    AdminQuery, BackendServiceError, FixtureAdminQuery, FixtureIdentityService,
    FixtureMessageCatalogue, FixturePeopleQuery, IdentityService, MessageCatalogue,
    MessageCatalogueError, PeopleQuery,
};
use dashboard::domain::{
    Locale, LocaleRouter, LocaleSet, MessageBundle, Notification, PageLoader, Person, PersonType,
    User,
};
use dashboard::inbound::http::health::{HealthState, live, ready};
use dashboard::inbound::http::messages::{get_messages, list_locales};
use dashboard::inbound::http::pages::{
    account, admin, connect, connect_form, documentation, people, sign_out,
};
use dashboard::inbound::http::state::HttpState;
use dashboard::{LocaleRouting, Trace};

/// Ports behind the app under test.
pub struct Ports {
    pub catalogue: Arc<dyn MessageCatalogue>,
    pub identity: Arc<dyn IdentityService>,
    pub admin: Arc<dyn AdminQuery>,
    pub people: Arc<dyn PeopleQuery>,
}

impl Default for Ports {
    fn default() -> Self {
        Self {
            catalogue: Arc::new(FixtureMessageCatalogue),
            identity: Arc::new(FixtureIdentityService),
            admin: Arc::new(FixtureAdminQuery),
            people: Arc::new(FixturePeopleQuery),
        }
    }
}

/// Full middleware stack over the page, API, and probe handlers.
pub async fn init_app(
    ports: Ports,
) -> impl Service<Request, Response = ServiceResponse<EitherBody<BoxBody>>, Error = actix_web::Error>
{
    let locales = LocaleSet::parse("en,fr", "en").expect("locales");
    let router = LocaleRouter::new(locales, ports.catalogue);
    let state = HttpState::new(
        router.clone(),
        PageLoader::new(ports.identity, ports.admin, ports.people),
    );
    let health = HealthState::new();
    health.mark_ready();
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();

    actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(web::Data::new(health))
            .wrap(session)
            .wrap(LocaleRouting::new(router))
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .service(list_locales)
                    .service(get_messages),
            )
            .service(ready)
            .service(live)
            .service(account)
            .service(admin)
            .service(documentation)
            .service(people)
            .service(connect_form)
            .service(connect)
            .service(sign_out),
    )
    .await
}

pub async fn body_text<B: actix_web::body::MessageBody>(res: ServiceResponse<B>) -> String {
    let bytes = actix_test::read_body(res).await;
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub fn header<B>(res: &ServiceResponse<B>, name: &str) -> Option<String> {
    res.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// Serves the shipped bundles except for the listed locales.
pub struct PartialCatalogue {
    pub missing: Vec<&'static str>,
}

#[async_trait]
impl MessageCatalogue for PartialCatalogue {
    async fn load(&self, locale: &Locale) -> Result<MessageBundle, MessageCatalogueError> {
        if self.missing.contains(&locale.as_ref()) {
            return Err(MessageCatalogueError::missing(locale.to_string()));
        }
        FixtureMessageCatalogue.load(locale).await
    }
}

/// Admin query whose two fetches only complete while both are in flight.
pub struct RendezvousAdminQuery {
    barrier: Barrier,
}

impl RendezvousAdminQuery {
    pub fn new() -> Self {
        Self {
            barrier: Barrier::new(2),
        }
    }

    async fn rendezvous(&self) -> Result<(), BackendServiceError> {
        tokio::time::timeout(Duration::from_secs(2), self.barrier.wait())
            .await
            .map(|_| ())
            .map_err(|_| BackendServiceError::timeout("the other fetch never started"))
    }
}

#[async_trait]
impl AdminQuery for RendezvousAdminQuery {
    async fn list_users(&self) -> Result<Vec<User>, BackendServiceError> {
        self.rendezvous().await?;
        FixtureAdminQuery.list_users().await
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>, BackendServiceError> {
        self.rendezvous().await?;
        // Finish after the users fetch to show ordering does not matter.
        tokio::time::sleep(Duration::from_millis(20)).await;
        FixtureAdminQuery.list_notifications().await
    }
}

/// People query whose backend is down.
pub struct UnreachablePeopleQuery;

#[async_trait]
impl PeopleQuery for UnreachablePeopleQuery {
    async fn list_people(&self) -> Result<Vec<Person>, BackendServiceError> {
        Err(BackendServiceError::transport("connection refused"))
    }

    async fn list_person_types(&self) -> Result<Vec<PersonType>, BackendServiceError> {
        FixturePeopleQuery.list_person_types().await
    }
}
