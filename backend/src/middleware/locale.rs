//! Locale routing middleware.
//!
//! Runs on every request before routing:
//!
//! - infrastructure paths (`/api`, `/health`, docs, static files) pass
//!   through untouched;
//! - `/` and unprefixed dashboard paths redirect (307) to the same path under
//!   the locale negotiated from `Accept-Language`;
//! - everything else gets a [`RequestConfig`] for its first segment, stored in
//!   the request extensions for the page handlers.
//!
//! Resolution never rejects a request. Refusing unknown locales is the page
//! handlers' job (see [`LocaleRouter::guard`]).

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, AcceptLanguage, Preference};
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::{Locale, LocaleRouter};

/// First segments served without locale processing.
const PASS_THROUGH: &[&str] = &["api", "health", "docs", "api-docs", "static"];

/// First segments of pages that live under a locale prefix.
const UNPREFIXED_ROUTES: &[&str] = &["dashboard", "connect", "sign-out"];

/// Landing page below the locale prefix.
pub const LANDING_PATH: &str = "dashboard/account";

#[derive(Debug, PartialEq, Eq)]
enum Routing<'a> {
    PassThrough,
    /// Redirect to `/{negotiated}/{rest}`.
    Prefix(&'a str),
    /// Redirect a bare `/{locale}` to its landing page.
    Landing(&'a str),
    Localised(&'a str),
}

fn classify<'a>(path: &'a str, router: &LocaleRouter) -> Routing<'a> {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        return Routing::Prefix(LANDING_PATH);
    }
    let (first, rest) = trimmed.split_once('/').unwrap_or((trimmed, ""));
    if PASS_THROUGH.contains(&first) || first.contains('.') {
        return Routing::PassThrough;
    }
    if UNPREFIXED_ROUTES.contains(&first) {
        return Routing::Prefix(trimmed);
    }
    if rest.is_empty() && router.locales().contains(first) {
        return Routing::Landing(first);
    }
    Routing::Localised(first)
}

fn negotiate<'a>(req: &ServiceRequest, router: &'a LocaleRouter) -> &'a Locale {
    let ranked = req
        .request()
        .get_header::<AcceptLanguage>()
        .map(|accept| accept.ranked())
        .unwrap_or_default();
    let tags: Vec<String> = ranked
        .into_iter()
        .filter_map(|preference| match preference {
            Preference::Specific(tag) => Some(tag.to_string()),
            Preference::Any => None,
        })
        .collect();
    router.locales().negotiate(tags.iter().map(String::as_str))
}

fn redirect_target(locale: &Locale, rest: &str, query: &str) -> String {
    let mut target = format!("/{locale}/{rest}");
    if !query.is_empty() {
        target.push('?');
        target.push_str(query);
    }
    target
}

/// Middleware factory; wrap the app with it after [`crate::Trace`].
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use actix_web::App;
/// use dashboard::domain::ports::FixtureMessageCatalogue;
/// use dashboard::domain::{LocaleRouter, LocaleSet};
/// use dashboard::middleware::LocaleRouting;
///
/// let locales = LocaleSet::parse("en,fr", "en").expect("locales");
/// let router = LocaleRouter::new(locales, Arc::new(FixtureMessageCatalogue));
/// let _app = App::new().wrap(LocaleRouting::new(router));
/// ```
#[derive(Clone)]
pub struct LocaleRouting {
    router: LocaleRouter,
}

impl LocaleRouting {
    /// Route requests with `router`.
    pub fn new(router: LocaleRouter) -> Self {
        Self { router }
    }
}

impl<S, B> Transform<S, ServiceRequest> for LocaleRouting
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = LocaleRoutingMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LocaleRoutingMiddleware {
            service: Rc::new(service),
            router: self.router.clone(),
        }))
    }
}

/// Service wrapper produced by [`LocaleRouting`].
pub struct LocaleRoutingMiddleware<S> {
    service: Rc<S>,
    router: LocaleRouter,
}

impl<S, B> Service<ServiceRequest> for LocaleRoutingMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Classify on the path the router matches against, so an encoded
        // segment such as `%66r` is seen as `fr` here and in the guard.
        let path = req.match_info().unprocessed().to_owned();
        let target = match classify(&path, &self.router) {
            Routing::PassThrough => {
                let fut = self.service.call(req);
                return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
            }
            Routing::Prefix(rest) => {
                let locale = negotiate(&req, &self.router);
                // Redirect to the path as sent; the decoded form is only for
                // classification.
                let raw = req.path().trim_start_matches('/');
                let rest = if raw.is_empty() { rest } else { raw };
                redirect_target(locale, rest, req.query_string())
            }
            Routing::Landing(segment) => {
                let locale = self.router.locales().resolve(segment);
                redirect_target(locale, LANDING_PATH, req.query_string())
            }
            Routing::Localised(segment) => {
                let segment = segment.to_owned();
                let service = Rc::clone(&self.service);
                let router = self.router.clone();
                return Box::pin(async move {
                    match router.resolve_request_config(&segment).await {
                        Ok(config) => {
                            req.extensions_mut().insert(config);
                            service
                                .call(req)
                                .await
                                .map(ServiceResponse::map_into_left_body)
                        }
                        Err(error) => Ok(req.error_response(error).map_into_right_body()),
                    }
                });
            }
        };

        debug!(from = %path, to = %target, "redirecting to locale-prefixed path");
        let response = HttpResponse::TemporaryRedirect()
            .insert_header((header::LOCATION, target))
            .finish();
        Box::pin(ready(Ok(req.into_response(response).map_into_right_body())))
    }
}
