//! Layout guard for locale-prefixed pages.
//!
//! [`LocalizedRequest`] is the only way a page handler obtains its
//! [`LocaleContext`]. Extraction fails with 404 when the `{locale}` path
//! segment is not configured, so the handler body never runs and nothing is
//! rendered for it.

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::error;

use crate::domain::{Error, LocaleContext, RequestConfig};
use crate::inbound::http::state::HttpState;

/// Page request whose locale passed the guard.
#[derive(Debug, Clone)]
pub struct LocalizedRequest {
    context: LocaleContext,
}

impl LocalizedRequest {
    /// Translation context for the view.
    pub fn context(&self) -> &LocaleContext {
        &self.context
    }

    /// Give up the context to a view model.
    pub fn into_context(self) -> LocaleContext {
        self.context
    }
}

impl FromRequest for LocalizedRequest {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<HttpState>>().cloned() else {
            error!("HttpState missing from app data");
            return Box::pin(async { Err(Error::internal("HTTP state not configured")) });
        };
        let segment = req.match_info().get("locale").unwrap_or_default().to_owned();
        // The middleware has normally resolved the config already. Resolve
        // again when it is absent or was made for another locale.
        let resolved = req
            .extensions()
            .get::<RequestConfig>()
            .filter(|config| config.locale() == state.locales.locales().resolve(&segment))
            .cloned();
        Box::pin(async move {
            let config = match resolved {
                Some(config) => config,
                None => state.locales.resolve_request_config(&segment).await?,
            };
            let context = state.locales.guard(&segment, &config)?;
            Ok(Self { context })
        })
    }
}
