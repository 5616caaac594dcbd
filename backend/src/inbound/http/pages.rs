//! Dashboard page handlers.
//!
//! ```text
//! GET  /{locale}/dashboard/account
//! GET  /{locale}/dashboard/admin
//! GET  /{locale}/dashboard/documentation
//! GET  /{locale}/dashboard/people?view=list|grid
//! GET  /{locale}/connect
//! POST /{locale}/connect        email=...&password=...
//! POST /{locale}/sign-out
//! ```
//!
//! Every handler takes a [`LocalizedRequest`] first, so an unknown locale is
//! refused with 404 before any session lookup or backend fetch happens.

use actix_web::http::StatusCode;
use actix_web::http::header::{self, ContentType};
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use askama::Template;
use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::ports::BackendServiceError;
use crate::domain::{AccountPage, ClientViewport, Error, LocaleContext, LoginCredentials, ViewMode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::locale::LocalizedRequest;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::views::{
    AccountView, AdminView, ConnectView, DocumentationView, PeopleView, render,
};

const VIEWPORT_WIDTH_HINT: &str = "sec-ch-viewport-width";
const MOBILE_HINT: &str = "sec-ch-ua-mobile";
const CLIENT_HINTS: &str = "Sec-CH-Viewport-Width, Sec-CH-UA-Mobile";

fn html<T: Template>(status: StatusCode, view: &T) -> ApiResult<HttpResponse> {
    let body = render(view)?;
    Ok(HttpResponse::build(status)
        .content_type(ContentType::html())
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .body(body))
}

fn see_other(location: String) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

fn connect_path(context: &LocaleContext) -> String {
    context.path("connect")
}

/// Read the viewport hints a browser sends with the request.
fn client_viewport(req: &HttpRequest) -> ClientViewport {
    let headers = req.headers();
    let text = |name: &str| headers.get(name).and_then(|value| value.to_str().ok());
    let width = text(VIEWPORT_WIDTH_HINT)
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|width| width.is_finite() && *width >= 0.0)
        .map(|width| width.round() as u32);
    let mobile = text(MOBILE_HINT).is_some_and(|raw| raw.trim() == "?1")
        || text(header::USER_AGENT.as_str()).is_some_and(|agent| agent.contains("Mobi"));
    ClientViewport { width, mobile }
}

/// Signed-in user's account; anyone else is sent to the connect page.
#[get("/{locale}/dashboard/account")]
pub async fn account(
    request: LocalizedRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let token = session.access_token();
    match state.pages.load_account(token.as_ref()).await? {
        AccountPage::Render(user) => {
            html(StatusCode::OK, &AccountView::new(request.into_context(), &user))
        }
        AccountPage::RedirectToConnect => {
            if token.is_some() {
                session.purge();
            }
            Ok(see_other(connect_path(request.context())))
        }
    }
}

/// Users and notifications, fetched concurrently.
#[get("/{locale}/dashboard/admin")]
pub async fn admin(
    request: LocalizedRequest,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let page = state.pages.load_admin().await?;
    html(StatusCode::OK, &AdminView::new(request.into_context(), &page))
}

/// Documentation sections from the active bundle.
#[get("/{locale}/dashboard/documentation")]
pub async fn documentation(
    request: LocalizedRequest,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let page = state.pages.load_documentation(request.context());
    html(
        StatusCode::OK,
        &DocumentationView::new(request.into_context(), page.sections),
    )
}

/// Query string of the people page.
#[derive(Debug, Default, Deserialize)]
pub struct PeopleParams {
    /// `list` or `grid`; anything else is ignored.
    view: Option<String>,
}

/// People directory in list or grid layout.
#[get("/{locale}/dashboard/people")]
pub async fn people(
    request: LocalizedRequest,
    state: web::Data<HttpState>,
    params: web::Query<PeopleParams>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let requested = params.view.as_deref().and_then(ViewMode::parse);
    let mode = ViewMode::resolve(requested, client_viewport(&req));
    let page = state.pages.load_people().await?;
    let mut response = html(
        StatusCode::OK,
        &PeopleView::new(request.into_context(), &page, mode),
    )?;
    let headers = response.headers_mut();
    headers.insert(
        header::HeaderName::from_static("accept-ch"),
        header::HeaderValue::from_static(CLIENT_HINTS),
    );
    headers.insert(
        header::VARY,
        header::HeaderValue::from_static("Sec-CH-Viewport-Width, Sec-CH-UA-Mobile, User-Agent"),
    );
    Ok(response)
}

/// Sign-in form.
#[get("/{locale}/connect")]
pub async fn connect_form(request: LocalizedRequest) -> ApiResult<HttpResponse> {
    html(StatusCode::OK, &ConnectView::new(request.into_context(), "", None))
}

/// Sign-in form submission.
#[derive(Debug, Deserialize)]
pub struct ConnectForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

/// Sign in at the identity service and keep its tokens in the session.
#[post("/{locale}/connect")]
pub async fn connect(
    request: LocalizedRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<ConnectForm>,
) -> ApiResult<HttpResponse> {
    let ConnectForm { email, password } = form.into_inner();
    let credentials = match LoginCredentials::try_from_parts(&email, &password) {
        Ok(credentials) => credentials,
        Err(err) => {
            let key = format!("connect.errors.{}", err.code());
            let view = ConnectView::new(request.into_context(), email.trim(), Some(&key));
            return html(StatusCode::BAD_REQUEST, &view);
        }
    };

    match state.pages.identity().sign_in(&credentials).await {
        Ok(auth) => {
            session.persist_session(&auth)?;
            info!("user signed in");
            Ok(see_other(request.context().path("dashboard/account")))
        }
        Err(BackendServiceError::Unauthorized { .. }) => {
            let view = ConnectView::new(
                request.into_context(),
                credentials.email(),
                Some("connect.errors.invalid_credentials"),
            );
            html(StatusCode::UNAUTHORIZED, &view)
        }
        Err(err) => Err(Error::from(err)),
    }
}

/// End the session here and, best effort, at the identity service.
#[post("/{locale}/sign-out")]
pub async fn sign_out(
    request: LocalizedRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
) -> HttpResponse {
    if let Some(token) = session.access_token() {
        if let Err(err) = state.pages.identity().sign_out(&token).await {
            warn!(error = %err, "identity service sign-out failed; clearing local session anyway");
        }
    }
    session.purge();
    see_other(connect_path(request.context()))
}
